//! A scripted stand-in for the Methane Mapper API.
//!
//! Calls are recorded in order. In manual mode each call parks until the
//! test answers it with [`ScriptedApi::respond`], so tests decide the order
//! responses arrive in. In auto mode a handler answers immediately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use layer_controller::{ControllerSettings, LayerController};
use mapper_api::{
    ApiError, ApiResult, FeatureCollectionResponse, HeatmapQuery, MapperApi, PredictionRequest,
    PredictionResponse, TileResponse,
};
use methane_common::FactoryRecord;
use serde::de::DeserializeOwned;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Heatmap(HeatmapQuery),
    Plumes,
    Predict(PredictionRequest),
    GlobalPrediction,
}

#[derive(Debug, Clone)]
pub enum Reply {
    /// Decode this body into the endpoint's response type.
    Json(String),
    /// A body that is not JSON (e.g. an HTML error page).
    NotJson,
    /// Never answer.
    Hang,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Reply::Json(body.to_string())
    }

    pub fn tile(url: &str) -> Self {
        Reply::Json(serde_json::json!({ "tileUrl": url }).to_string())
    }
}

type Handler = Box<dyn Fn(&Call) -> Reply + Send + Sync>;

pub struct ScriptedApi {
    calls: Mutex<Vec<Call>>,
    parked: Mutex<HashMap<usize, oneshot::Sender<Reply>>>,
    handler: Option<Handler>,
}

impl ScriptedApi {
    pub fn manual() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            parked: Mutex::new(HashMap::new()),
            handler: None,
        })
    }

    pub fn auto(handler: impl Fn(&Call) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            parked: Mutex::new(HashMap::new()),
            handler: Some(Box::new(handler)),
        })
    }

    /// Same reply for every call.
    pub fn always(reply: Reply) -> Arc<Self> {
        Self::auto(move |_| reply.clone())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Yield to spawned fetch tasks until at least `n` calls have been made.
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..1000 {
            if self.call_count() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} calls, saw {:?}", n, self.calls());
    }

    /// Give spawned tasks a chance to run without expecting anything.
    pub async fn let_tasks_run(&self) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    /// Answer the parked call with index `index` (0-based, in issue order).
    pub fn respond(&self, index: usize, reply: Reply) {
        let tx = self
            .parked
            .lock()
            .unwrap()
            .remove(&index)
            .unwrap_or_else(|| panic!("call {} is not waiting for a reply", index));
        tx.send(reply).unwrap();
    }

    async fn dispatch<T: DeserializeOwned>(&self, call: Call, path: &str) -> ApiResult<T> {
        let reply = {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(call.clone());
                calls.len() - 1
            };
            match &self.handler {
                Some(handler) => handler(&call),
                None => {
                    let (tx, rx) = oneshot::channel();
                    self.parked.lock().unwrap().insert(index, tx);
                    rx.await.unwrap_or(Reply::Hang)
                }
            }
        };

        let body = match reply {
            Reply::Json(body) => body,
            Reply::NotJson => "<html>Internal Server Error</html>".to_string(),
            Reply::Hang => std::future::pending::<String>().await,
        };
        serde_json::from_str(&body).map_err(|source| ApiError::InvalidBody {
            url: path.to_string(),
            status: 200,
            source,
        })
    }
}

#[async_trait]
impl MapperApi for ScriptedApi {
    async fn heatmap_tiles(&self, query: &HeatmapQuery) -> ApiResult<TileResponse> {
        self.dispatch(Call::Heatmap(*query), "/api/map").await
    }

    async fn high_res_plumes(&self) -> ApiResult<FeatureCollectionResponse> {
        self.dispatch(Call::Plumes, "/api/carbonmapper").await
    }

    async fn predict(&self, request: &PredictionRequest) -> ApiResult<PredictionResponse> {
        self.dispatch(Call::Predict(*request), "/api/predict").await
    }

    async fn global_prediction(&self) -> ApiResult<FeatureCollectionResponse> {
        self.dispatch(Call::GlobalPrediction, "/api/global-prediction").await
    }
}

pub fn controller(api: &Arc<ScriptedApi>) -> LayerController {
    controller_with(api, ControllerSettings::default(), Vec::new())
}

pub fn controller_with(
    api: &Arc<ScriptedApi>,
    settings: ControllerSettings,
    factories: Vec<FactoryRecord>,
) -> LayerController {
    let api: Arc<dyn MapperApi> = api.clone();
    LayerController::new(api, settings, factories)
}
