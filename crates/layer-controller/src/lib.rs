//! Map-layer state machine for the Methane Mapper dashboard.
//!
//! The [`LayerController`] owns the user's [`ViewParameters`], decides which
//! API request the active layer needs, issues it, and folds the answer into
//! a render-ready [`ViewModel`].
//!
//! Requests run as spawned tokio tasks and report back over a channel the
//! controller owns. Every request is tagged with a sequence number when it
//! is issued; only the answer to the most recent request for the active
//! layer is ever committed, whatever order answers arrive in.
//!
//! ```ignore
//! let mut controller = LayerController::new(api, ControllerSettings::default(), factories);
//! controller.set_parameters(ParameterUpdate::new().threshold(1950))?;
//! controller.settle().await;
//! println!("{:?}", controller.view().tile_url());
//! ```
//!
//! [`ViewParameters`]: methane_common::ViewParameters

pub mod controller;
pub mod factories;
pub mod outcome;
pub mod request;
pub mod view;

pub use controller::{Applied, ControllerSettings, LayerController};
pub use factories::FactoryOverlay;
pub use outcome::{fetch_layer, FetchOutcome};
pub use request::{FetchTag, RequestState, Resolution, Sequencer};
pub use view::{BasemapView, ControlState, ViewModel};
