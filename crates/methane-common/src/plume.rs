//! Point-source plume features.

use serde::{Deserialize, Serialize};

/// A detected or predicted methane plume.
///
/// Identity is `id`; features are never modified after they are received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlumeFeature {
    pub id: String,
    pub longitude: f64,
    pub latitude: f64,
    pub emission_rate_kg_per_hr: Option<f64>,
    pub is_predicted: bool,
}

impl PlumeFeature {
    /// Marker colour: predicted plumes blue, observed plumes red.
    pub fn marker_color(&self) -> &'static str {
        if self.is_predicted {
            "blue"
        } else {
            "red"
        }
    }
}
