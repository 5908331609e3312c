//! The fetch seam and its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{ApiError, ApiResult};
use crate::query::{
    HeatmapQuery, PredictionRequest, CARBON_MAPPER_PATH, GLOBAL_PREDICTION_PATH, MAP_PATH,
    PREDICT_PATH,
};
use crate::wire::{FeatureCollectionResponse, PredictionResponse, TileResponse};

/// Everything the layer controller needs from the remote API.
#[async_trait]
pub trait MapperApi: Send + Sync {
    /// `GET /api/map`
    async fn heatmap_tiles(&self, query: &HeatmapQuery) -> ApiResult<TileResponse>;

    /// `GET /api/carbonmapper`
    async fn high_res_plumes(&self) -> ApiResult<FeatureCollectionResponse>;

    /// `POST /api/predict`
    async fn predict(&self, request: &PredictionRequest) -> ApiResult<PredictionResponse>;

    /// `GET /api/global-prediction`
    async fn global_prediction(&self) -> ApiResult<FeatureCollectionResponse>;
}

/// Connection settings for [`HttpMapperApi`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// reqwest-backed API client.
pub struct HttpMapperApi {
    client: Client,
    base_url: String,
}

impl HttpMapperApi {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a JSON body whatever the status code; the API reports
    /// "no data" conditions in-band, sometimes with a non-2xx status.
    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(url = %url, status, bytes = body.len(), "Received API response");

        serde_json::from_str(&body).map_err(|source| ApiError::InvalidBody {
            url,
            status,
            source,
        })
    }
}

#[async_trait]
impl MapperApi for HttpMapperApi {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn heatmap_tiles(&self, query: &HeatmapQuery) -> ApiResult<TileResponse> {
        let response = self
            .client
            .get(self.url(MAP_PATH))
            .query(&query.query_pairs())
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn high_res_plumes(&self) -> ApiResult<FeatureCollectionResponse> {
        let response = self.client.get(self.url(CARBON_MAPPER_PATH)).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn predict(&self, request: &PredictionRequest) -> ApiResult<PredictionResponse> {
        let response = self
            .client
            .post(self.url(PREDICT_PATH))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn global_prediction(&self) -> ApiResult<FeatureCollectionResponse> {
        let response = self
            .client
            .get(self.url(GLOBAL_PREDICTION_PATH))
            .send()
            .await?;
        Self::decode(response).await
    }
}
