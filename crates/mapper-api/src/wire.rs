//! Response bodies as the API sends them.
//!
//! Every field is optional on the wire; deciding whether a decoded body is
//! usable data or a "no data" answer is left to the caller.

use methane_common::{BoundingBox, PlumeFeature};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Body of `GET /api/map`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TileResponse {
    #[serde(rename = "tileUrl", default)]
    pub tile_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TileResponse {
    /// The tile template, unless missing, null or blank.
    pub fn tile_url(&self) -> Option<&str> {
        self.tile_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Body of `GET /api/carbonmapper` and `GET /api/global-prediction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollectionResponse {
    /// An explicit `null` reads as no features.
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<WireFeature>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl FeatureCollectionResponse {
    /// Server-reported error text, if any.
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Convert to domain features, dropping any that lack an id or a position.
    pub fn into_plumes(self) -> Vec<PlumeFeature> {
        let total = self.features.len();
        let plumes: Vec<PlumeFeature> = self
            .features
            .into_iter()
            .filter_map(WireFeature::into_plume)
            .collect();
        if plumes.len() < total {
            warn!(
                skipped = total - plumes.len(),
                kept = plumes.len(),
                "Skipped malformed plume features"
            );
        }
        plumes
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A GeoJSON-like point feature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireFeature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<WireGeometry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: WireProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireGeometry {
    /// `[lon, lat]` for points; anything else is rejected during conversion.
    #[serde(default)]
    pub coordinates: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireProperties {
    #[serde(default)]
    pub plume_id: Option<Value>,
    #[serde(default)]
    pub emission_auto: Option<Value>,
    #[serde(default)]
    pub is_predicted: Option<bool>,
}

impl WireFeature {
    pub fn into_plume(self) -> Option<PlumeFeature> {
        let id = self
            .properties
            .plume_id
            .as_ref()
            .and_then(id_string)
            .or_else(|| self.id.as_ref().and_then(id_string))?;

        let (longitude, latitude) = match self.geometry?.coordinates {
            Value::Array(coords) if coords.len() == 2 => (coords[0].as_f64()?, coords[1].as_f64()?),
            _ => return None,
        };

        Some(PlumeFeature {
            id,
            longitude,
            latitude,
            emission_rate_kg_per_hr: self.properties.emission_auto.as_ref().and_then(Value::as_f64),
            is_predicted: self.properties.is_predicted.unwrap_or(false),
        })
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub heatmap_image: Option<String>,
    /// `[[lat, lon], [lat, lon]]`
    #[serde(default)]
    pub bounds: Option<[[f64; 2]; 2]>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PredictionResponse {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// Image URL and bounds when both are present.
    pub fn overlay(&self) -> Option<(&str, BoundingBox)> {
        let image = self.heatmap_image.as_deref().filter(|s| !s.is_empty())?;
        let corners = self.bounds?;
        match BoundingBox::from_valid_corners(corners) {
            Some(bounds) => Some((image, bounds)),
            None => {
                warn!(?corners, "Ignoring prediction overlay with out-of-range bounds");
                None
            }
        }
    }
}
