//! Render-ready snapshot of the controller.

use methane_common::{
    Basemap, BoundingBox, FactoryRecord, LayerKind, LayerResult, MapView, PlumeFeature,
    ViewParameters,
};
use serde::Serialize;

/// Everything a renderer needs, with no further decisions left to make.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub title: &'static str,
    pub params: ViewParameters,
    pub map_view: MapView,
    pub basemap: BasemapView,
    pub controls: ControlState,
    pub loading: bool,
    pub error: Option<String>,
    /// Only ever the active layer's result, and never while loading.
    pub layer: Option<LayerResult>,
    /// Empty unless the overlay is loaded, switched on and the heatmap is active.
    pub factories: Vec<FactoryRecord>,
    /// Why the factory overlay could not be loaded, if it could not.
    pub factories_error: Option<String>,
}

impl ViewModel {
    pub fn tile_url(&self) -> Option<&str> {
        match &self.layer {
            Some(LayerResult::Heatmap { tile_url_template }) => Some(tile_url_template.as_str()),
            _ => None,
        }
    }

    pub fn plumes(&self) -> &[PlumeFeature] {
        match &self.layer {
            Some(LayerResult::Plumes { features }) => features.as_slice(),
            _ => &[],
        }
    }

    pub fn prediction_overlay(&self) -> Option<(&str, BoundingBox)> {
        match &self.layer {
            Some(LayerResult::Prediction { image_url, bounds }) => Some((image_url.as_str(), *bounds)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BasemapView {
    pub name: &'static str,
    pub tile_template: &'static str,
    pub subdomains: &'static [&'static str],
    pub attribution: &'static str,
}

impl From<Basemap> for BasemapView {
    fn from(basemap: Basemap) -> Self {
        Self {
            name: basemap.as_str(),
            tile_template: basemap.tile_template(),
            subdomains: basemap.subdomains(),
            attribution: basemap.attribution(),
        }
    }
}

/// Which inputs are meaningful for the active layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub date_enabled: bool,
    pub threshold_enabled: bool,
    pub factories_enabled: bool,
}

impl ControlState {
    pub fn for_layer(layer: LayerKind) -> Self {
        Self {
            date_enabled: layer.depends_on_date(),
            threshold_enabled: layer.depends_on_threshold(),
            factories_enabled: layer == LayerKind::Heatmap,
        }
    }
}
