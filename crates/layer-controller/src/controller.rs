//! The layer controller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use mapper_api::{HeatmapQuery, LayerQuery, MapperApi, PredictionRequest};
use metrics::counter;
use methane_common::{
    ChangeSet, FactoryRecord, LayerKind, LayerResult, MapperResult, ParameterUpdate,
    ViewParameters,
};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::factories::FactoryOverlay;
use crate::outcome::{fetch_layer, FetchOutcome};
use crate::request::{FetchTag, RequestState, Resolution, Sequencer};
use crate::view::{BasemapView, ControlState, ViewModel};

/// Tunables that are not user-selectable.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Upper bound on a single fetch; expiry is reported as a transport failure.
    pub request_timeout: Duration,
    /// `[lat, lon]` sent with prediction requests.
    pub prediction_center: [f64; 2],
    /// Date sent with prediction requests when the user has not picked one.
    pub default_prediction_date: NaiveDate,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            prediction_center: [20.0, 0.0],
            default_prediction_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap_or_default(),
        }
    }
}

/// What [`LayerController::apply`] did with a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Committed,
    /// Superseded or abandoned; state untouched.
    Discarded,
}

/// Owns the view parameters and reconciles asynchronous fetches into a
/// consistent view.
///
/// Fetches are spawned onto the current tokio runtime, so the mutating
/// operations must be called from within one. Results come back through
/// [`next_resolution`](Self::next_resolution) and only change state when
/// passed to [`apply`](Self::apply).
pub struct LayerController {
    api: Arc<dyn MapperApi>,
    settings: ControllerSettings,
    params: ViewParameters,
    request: RequestState,
    result: Option<LayerResult>,
    sequencer: Sequencer,
    in_flight: Option<FetchTag>,
    factories: FactoryOverlay,
    resolutions_tx: mpsc::UnboundedSender<Resolution>,
    resolutions_rx: mpsc::UnboundedReceiver<Resolution>,
}

impl LayerController {
    /// Create an idle controller with default parameters. Nothing is fetched
    /// until [`evaluate`](Self::evaluate) or a relevant parameter change.
    pub fn new(
        api: Arc<dyn MapperApi>,
        settings: ControllerSettings,
        factory_catalog: Vec<FactoryRecord>,
    ) -> Self {
        let (resolutions_tx, resolutions_rx) = mpsc::unbounded_channel();
        Self {
            api,
            settings,
            params: ViewParameters::default(),
            request: RequestState::default(),
            result: None,
            sequencer: Sequencer::default(),
            in_flight: None,
            factories: FactoryOverlay::new(factory_catalog),
            resolutions_tx,
            resolutions_rx,
        }
    }

    /// Replace the starting parameters without fetching.
    pub fn with_parameters(mut self, params: ViewParameters) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ViewParameters {
        &self.params
    }

    pub fn request_state(&self) -> &RequestState {
        &self.request
    }

    pub fn result(&self) -> Option<&LayerResult> {
        self.result.as_ref()
    }

    /// The most recently issued fetch, if it has not resolved yet.
    pub fn in_flight(&self) -> Option<&FetchTag> {
        self.in_flight.as_ref()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// The request the active layer needs under the current parameters.
    pub fn current_query(&self) -> LayerQuery {
        match self.params.active_layer {
            LayerKind::Heatmap => {
                LayerQuery::Heatmap(HeatmapQuery::new(self.params.threshold, self.params.date))
            }
            LayerKind::HighResPlumes => LayerQuery::HighResPlumes,
            LayerKind::Prediction => {
                let [lat, lon] = self.settings.prediction_center;
                LayerQuery::Prediction(PredictionRequest {
                    date: self.params.date.unwrap_or(self.settings.default_prediction_date),
                    lat,
                    lon,
                })
            }
        }
    }

    /// Merge `update` into the parameters and fetch if the active layer's
    /// query is affected.
    ///
    /// An invalid update is rejected as a whole and changes nothing.
    pub fn set_parameters(&mut self, update: ParameterUpdate) -> MapperResult<ChangeSet> {
        let previous_layer = self.params.active_layer;
        let mut changes = self.params.apply(&update)?;

        if changes.active_layer {
            self.leave_layer(previous_layer);
            if previous_layer == LayerKind::Heatmap && self.params.show_factories {
                self.params.show_factories = false;
                changes.show_factories = true;
            }
        }

        if changes.requires_fetch(self.params.active_layer) {
            self.evaluate();
        }

        Ok(changes)
    }

    /// The "Latest" action: forget the selected date.
    pub fn reset_to_latest(&mut self) -> MapperResult<ChangeSet> {
        self.set_parameters(ParameterUpdate::new().latest())
    }

    /// Clear everything belonging to `layer` and abandon its fetch.
    fn leave_layer(&mut self, layer: LayerKind) {
        if let Some(tag) = self.in_flight.take() {
            debug!(seq = tag.seq, layer = %layer, "Abandoning in-flight fetch on layer switch");
        }
        self.result = None;
        self.request = RequestState::default();
    }

    /// Issue the active layer's query, superseding any fetch still in flight.
    ///
    /// Also serves as the manual retry. Returns the tag of the new fetch.
    #[instrument(skip(self), fields(layer = %self.params.active_layer))]
    pub fn evaluate(&mut self) -> FetchTag {
        let tag = FetchTag {
            seq: self.sequencer.issue(),
            query: self.current_query(),
        };

        if let Some(previous) = self.in_flight.replace(tag) {
            debug!(superseded = previous.seq, by = tag.seq, "Superseding in-flight fetch");
        }
        self.request.loading = true;
        self.request.error = None;
        self.result = None;

        counter!("mapper_fetches_issued_total", "layer" => tag.layer().as_str()).increment(1);
        debug!(seq = tag.seq, query = %tag.query, "Issuing fetch");

        let api = Arc::clone(&self.api);
        let tx = self.resolutions_tx.clone();
        let timeout = self.settings.request_timeout;
        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = fetch_layer(api.as_ref(), &tag.query, timeout).await;
            // A closed channel only means the controller is gone.
            let _ = tx.send(Resolution {
                tag,
                outcome,
                elapsed: started.elapsed(),
            });
        });

        tag
    }

    /// Commit `resolution` if it answers the latest fetch for the current
    /// parameters; otherwise drop it without touching state.
    pub fn apply(&mut self, resolution: Resolution) -> Applied {
        let Resolution {
            tag,
            outcome,
            elapsed,
        } = resolution;
        let layer = tag.layer();

        let is_latest = self.in_flight.map(|t| t.seq) == Some(tag.seq);
        if !is_latest || tag.query != self.current_query() {
            counter!("mapper_fetches_discarded_total", "layer" => layer.as_str()).increment(1);
            debug!(
                seq = tag.seq,
                latest = self.sequencer.last_issued(),
                layer = %layer,
                "Discarding stale response"
            );
            return Applied::Discarded;
        }

        counter!(
            "mapper_fetches_committed_total",
            "layer" => layer.as_str(),
            "outcome" => outcome.kind()
        )
        .increment(1);

        self.in_flight = None;
        self.request.loading = false;

        match outcome {
            FetchOutcome::Ready(result) => {
                info!(
                    seq = tag.seq,
                    layer = %layer,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Layer data ready"
                );
                self.request.error = None;
                self.result = Some(result);
            }
            FetchOutcome::NoData(message) | FetchOutcome::Transport(message) => {
                info!(seq = tag.seq, layer = %layer, reason = %message, "Layer has nothing to show");
                self.result = None;
                self.request.error = Some(message);
            }
        }

        Applied::Committed
    }

    /// Wait for the next finished fetch, current or stale.
    pub async fn next_resolution(&mut self) -> Option<Resolution> {
        self.resolutions_rx.recv().await
    }

    /// Wait for the next finished fetch and apply it.
    pub async fn process_next(&mut self) -> Option<Applied> {
        let resolution = self.next_resolution().await?;
        Some(self.apply(resolution))
    }

    /// Process resolutions until the current fetch has been committed.
    pub async fn settle(&mut self) {
        while self.request.loading {
            if self.process_next().await.is_none() {
                break;
            }
        }
    }

    /// Show the bundled factory locations.
    ///
    /// Purely local and idempotent. With an empty catalog the error is
    /// surfaced as the view's `factories_error`, leaving the layer's
    /// result and request state alone.
    pub fn load_factories(&mut self) -> MapperResult<usize> {
        let count = self.factories.load()?;
        self.params.show_factories = true;
        debug!(count, "Factory overlay loaded");
        Ok(count)
    }

    pub fn factories(&self) -> &FactoryOverlay {
        &self.factories
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> ViewModel {
        let layer = self.params.active_layer;
        let controls = ControlState::for_layer(layer);
        let factories = if controls.factories_enabled && self.params.show_factories {
            self.factories.loaded().to_vec()
        } else {
            Vec::new()
        };

        ViewModel {
            title: layer.title(),
            params: self.params,
            map_view: layer.default_view(),
            basemap: BasemapView::from(self.params.basemap),
            controls,
            loading: self.request.loading,
            error: self.request.error.clone(),
            layer: self.result.clone(),
            factories,
            factories_error: self.factories.error().map(str::to_string),
        }
    }
}
