//! Common types shared across the methane-mapper crates.

pub mod bbox;
pub mod error;
pub mod factory;
pub mod layer;
pub mod params;
pub mod plume;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{MapperError, MapperResult};
pub use factory::FactoryRecord;
pub use layer::{Basemap, LayerKind, LayerResult, MapView};
pub use params::{ChangeSet, ParameterUpdate, Threshold, ViewParameters};
pub use plume::PlumeFeature;
pub use time::{format_date, parse_date};
