//! Temporary file helpers.

use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a fresh temporary file ending in `suffix` (e.g. ".yaml").
///
/// The file is removed when the returned handle is dropped.
pub fn temp_file_with(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("methane-mapper-")
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}
