//! Data layers, basemaps and the per-layer result union.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, MapperError, PlumeFeature};

/// The data layer currently selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Sentinel-5P concentration tiles.
    #[default]
    Heatmap,
    /// EMIT / Carbon Mapper point plumes.
    HighResPlumes,
    /// Model-predicted emission heatmap.
    Prediction,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [
        LayerKind::Heatmap,
        LayerKind::HighResPlumes,
        LayerKind::Prediction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Heatmap => "heatmap",
            LayerKind::HighResPlumes => "high_res_plumes",
            LayerKind::Prediction => "prediction",
        }
    }

    /// Heading shown above the map for this layer.
    pub fn title(&self) -> &'static str {
        match self {
            LayerKind::Heatmap => "Methane Heatmap",
            LayerKind::HighResPlumes => "EMIT Plume Data",
            LayerKind::Prediction => "AI Prediction Model",
        }
    }

    /// Whether a date change invalidates this layer's result.
    pub fn depends_on_date(&self) -> bool {
        matches!(self, LayerKind::Heatmap | LayerKind::Prediction)
    }

    /// Whether a threshold change invalidates this layer's result.
    pub fn depends_on_threshold(&self) -> bool {
        matches!(self, LayerKind::Heatmap)
    }

    /// Initial map position when the layer is opened.
    pub fn default_view(&self) -> MapView {
        match self {
            LayerKind::Heatmap => MapView::new(20.0, 0.0, 3),
            LayerKind::HighResPlumes | LayerKind::Prediction => MapView::new(20.0, 0.0, 2),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKind {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "heatmap" | "gee" | "sentinel" => Ok(LayerKind::Heatmap),
            "high_res_plumes" | "plumes" | "emit" | "carbon_mapper" => Ok(LayerKind::HighResPlumes),
            "prediction" | "predict" => Ok(LayerKind::Prediction),
            _ => Err(MapperError::UnknownLayer(s.to_string())),
        }
    }
}

/// Reference tiles drawn beneath the data layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basemap {
    #[default]
    Satellite,
    #[serde(alias = "light")]
    Roadmap,
}

impl Basemap {
    pub fn as_str(&self) -> &'static str {
        match self {
            Basemap::Satellite => "satellite",
            Basemap::Roadmap => "roadmap",
        }
    }

    /// XYZ tile URL template with a `{s}` subdomain placeholder.
    pub fn tile_template(&self) -> &'static str {
        match self {
            Basemap::Satellite => "https://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}",
            Basemap::Roadmap => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        }
    }

    pub fn subdomains(&self) -> &'static [&'static str] {
        match self {
            Basemap::Satellite => &["mt0", "mt1", "mt2", "mt3"],
            Basemap::Roadmap => &["a", "b", "c"],
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Basemap::Satellite => "© Google",
            Basemap::Roadmap => "© OpenStreetMap contributors",
        }
    }
}

impl fmt::Display for Basemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Basemap {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "satellite" => Ok(Basemap::Satellite),
            "roadmap" | "light" | "standard" => Ok(Basemap::Roadmap),
            _ => Err(MapperError::UnknownBasemap(s.to_string())),
        }
    }
}

/// Map centre and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
}

impl MapView {
    pub fn new(lat: f64, lon: f64, zoom: u8) -> Self {
        Self {
            center: [lat, lon],
            zoom,
        }
    }
}

/// Render-ready payload for the active layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum LayerResult {
    Heatmap {
        /// XYZ template exactly as returned by the API.
        tile_url_template: String,
    },
    Plumes {
        features: Vec<PlumeFeature>,
    },
    Prediction {
        image_url: String,
        bounds: BoundingBox,
    },
}

impl LayerResult {
    /// The layer that produces this variant.
    pub fn layer(&self) -> LayerKind {
        match self {
            LayerResult::Heatmap { .. } => LayerKind::Heatmap,
            LayerResult::Plumes { .. } => LayerKind::HighResPlumes,
            LayerResult::Prediction { .. } => LayerKind::Prediction,
        }
    }
}
