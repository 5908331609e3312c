//! Turning API answers into commit-ready outcomes.

use std::time::Duration;

use mapper_api::{
    ApiError, ApiResult, FeatureCollectionResponse, LayerQuery, MapperApi, PredictionResponse,
    TileResponse,
};
use methane_common::{LayerKind, LayerResult};
use tracing::warn;

pub const HEATMAP_NO_DATA: &str = "No heatmap data available for the selected date.";
pub const HEATMAP_TRANSPORT: &str = "Failed to load heatmap data.";
pub const PLUMES_NO_DATA: &str = "No EMIT plumes found.";
pub const PLUMES_TRANSPORT: &str = "Failed to load EMIT plumes.";
pub const PREDICTION_NO_DATA: &str = "Failed to generate prediction.";
pub const PREDICTION_TRANSPORT: &str = "Failed to connect to prediction API.";

/// What a finished fetch means for the view.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Data to display.
    Ready(LayerResult),
    /// The API answered but has nothing to show; carries the user-facing message.
    NoData(String),
    /// The request did not complete; carries a generic user-facing message.
    Transport(String),
}

impl FetchOutcome {
    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchOutcome::Ready(_) => "ready",
            FetchOutcome::NoData(_) => "no_data",
            FetchOutcome::Transport(_) => "transport",
        }
    }

    pub fn transport(layer: LayerKind) -> Self {
        let message = match layer {
            LayerKind::Heatmap => HEATMAP_TRANSPORT,
            LayerKind::HighResPlumes => PLUMES_TRANSPORT,
            LayerKind::Prediction => PREDICTION_TRANSPORT,
        };
        FetchOutcome::Transport(message.to_string())
    }

    pub fn from_tiles(resp: TileResponse) -> Self {
        match resp.tile_url() {
            Some(url) => FetchOutcome::Ready(LayerResult::Heatmap {
                tile_url_template: url.to_string(),
            }),
            None => FetchOutcome::NoData(
                non_blank(resp.message).unwrap_or_else(|| HEATMAP_NO_DATA.to_string()),
            ),
        }
    }

    /// Features win over an `error` field; an empty set is always no-data.
    pub fn from_plumes(resp: FeatureCollectionResponse) -> Self {
        let error = resp.error_message();
        let features = resp.into_plumes();
        if features.is_empty() {
            FetchOutcome::NoData(non_blank(error).unwrap_or_else(|| PLUMES_NO_DATA.to_string()))
        } else {
            FetchOutcome::Ready(LayerResult::Plumes { features })
        }
    }

    pub fn from_prediction(resp: PredictionResponse) -> Self {
        if let Some((image_url, bounds)) = resp.overlay() {
            return FetchOutcome::Ready(LayerResult::Prediction {
                image_url: image_url.to_string(),
                bounds,
            });
        }
        let message = if resp.is_error() {
            non_blank(resp.message)
        } else {
            None
        };
        FetchOutcome::NoData(message.unwrap_or_else(|| PREDICTION_NO_DATA.to_string()))
    }
}

fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

async fn request(api: &dyn MapperApi, query: &LayerQuery) -> ApiResult<FetchOutcome> {
    Ok(match query {
        LayerQuery::Heatmap(q) => FetchOutcome::from_tiles(api.heatmap_tiles(q).await?),
        LayerQuery::HighResPlumes => FetchOutcome::from_plumes(api.high_res_plumes().await?),
        LayerQuery::Prediction(req) => FetchOutcome::from_prediction(api.predict(req).await?),
    })
}

/// Run `query` against `api`, bounded by `timeout`. Never fails: transport
/// problems become [`FetchOutcome::Transport`].
pub async fn fetch_layer(
    api: &dyn MapperApi,
    query: &LayerQuery,
    timeout: Duration,
) -> FetchOutcome {
    let result = match tokio::time::timeout(timeout, request(api, query)).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout(timeout)),
    };

    result.unwrap_or_else(|err| {
        warn!(query = %query, error = %err, "Layer fetch failed");
        FetchOutcome::transport(query.layer())
    })
}
