//! Client side of the Methane Mapper HTTP API.
//!
//! The API is an external collaborator: it generates satellite tiles,
//! serves plume catalogs and runs the prediction model. This crate only
//! knows how to ask for those things and how to decode the answers:
//! - [`query`]: request construction (paths, query strings, bodies)
//! - [`wire`]: response bodies, including the "no data" shapes
//! - [`MapperApi`]: the async seam the layer controller fetches through
//! - [`HttpMapperApi`]: the reqwest implementation of that seam

pub mod client;
pub mod error;
pub mod query;
pub mod wire;

pub use client::{ClientConfig, HttpMapperApi, MapperApi};
pub use error::{ApiError, ApiResult};
pub use query::{HeatmapQuery, LayerQuery, PredictionRequest};
pub use wire::{FeatureCollectionResponse, PredictionResponse, TileResponse};
