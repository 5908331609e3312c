//! Static factory locations used by the source-attribution overlay.

use serde::{Deserialize, Serialize};

use crate::MapperResult;

/// One industrial site. Loaded once from a bundled catalog, never fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryRecord {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FactoryRecord {
    /// Parse a JSON array of `{name, lat, lng, type}` records.
    pub fn parse_json_catalog(content: &str) -> MapperResult<Vec<FactoryRecord>> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_catalog() {
        let json = r#"[{"name": "Permian Gas Plant", "lat": 31.9, "lng": -102.1, "type": "Gas Processing"}]"#;
        let records = FactoryRecord::parse_json_catalog(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, "Gas Processing");
    }

    #[test]
    fn test_parse_json_catalog_rejects_garbage() {
        assert!(FactoryRecord::parse_json_catalog("{not json").is_err());
    }
}
