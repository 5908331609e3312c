//! User-selectable view parameters and partial updates to them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Basemap, LayerKind, MapperError, MapperResult};

/// Sensitivity threshold in parts per billion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Threshold(u16);

impl Threshold {
    pub const MIN: u16 = 1850;
    pub const MAX: u16 = 2000;
    pub const DEFAULT: u16 = 1920;
    /// Slider increment; values between steps are still accepted.
    pub const STEP: u16 = 5;

    pub fn new(ppb: u16) -> MapperResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&ppb) {
            return Err(MapperError::invalid_parameter(
                "threshold",
                format!("{} ppb is outside [{}, {}]", ppb, Self::MIN, Self::MAX),
            ));
        }
        Ok(Self(ppb))
    }

    pub fn ppb(&self) -> u16 {
        self.0
    }

    /// One slider step up or down, clamped to the valid range.
    pub fn step(self, up: bool) -> Self {
        let ppb = if up {
            self.0.saturating_add(Self::STEP).min(Self::MAX)
        } else {
            self.0.saturating_sub(Self::STEP).max(Self::MIN)
        };
        Self(ppb)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u16> for Threshold {
    type Error = MapperError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Threshold::new(value)
    }
}

impl From<Threshold> for u16 {
    fn from(value: Threshold) -> Self {
        value.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the user can change about the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewParameters {
    pub active_layer: LayerKind,
    /// `None` means "latest available".
    pub date: Option<NaiveDate>,
    pub threshold: Threshold,
    pub basemap: Basemap,
    pub show_factories: bool,
}

impl ViewParameters {
    /// Validate and merge `update`, reporting which fields actually changed.
    ///
    /// Validation happens before anything is written, so a rejected update
    /// leaves the parameters untouched.
    pub fn apply(&mut self, update: &ParameterUpdate) -> MapperResult<ChangeSet> {
        let threshold = update.threshold.map(Threshold::new).transpose()?;

        let mut changes = ChangeSet::default();

        if let Some(layer) = update.active_layer {
            changes.active_layer = layer != self.active_layer;
            self.active_layer = layer;
        }
        if let Some(date) = update.date {
            changes.date = date != self.date;
            self.date = date;
        }
        if let Some(threshold) = threshold {
            changes.threshold = threshold != self.threshold;
            self.threshold = threshold;
        }
        if let Some(basemap) = update.basemap {
            changes.basemap = basemap != self.basemap;
            self.basemap = basemap;
        }
        if let Some(show) = update.show_factories {
            changes.show_factories = show != self.show_factories;
            self.show_factories = show;
        }

        Ok(changes)
    }
}

/// A partial set of parameter changes. Unset fields are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterUpdate {
    pub active_layer: Option<LayerKind>,
    /// `Some(None)` resets to "latest".
    pub date: Option<Option<NaiveDate>>,
    /// Raw ppb value, validated when applied.
    pub threshold: Option<u16>,
    pub basemap: Option<Basemap>,
    pub show_factories: Option<bool>,
}

impl ParameterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, layer: LayerKind) -> Self {
        self.active_layer = Some(layer);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(Some(date));
        self
    }

    pub fn latest(mut self) -> Self {
        self.date = Some(None);
        self
    }

    pub fn threshold(mut self, ppb: u16) -> Self {
        self.threshold = Some(ppb);
        self
    }

    pub fn basemap(mut self, basemap: Basemap) -> Self {
        self.basemap = Some(basemap);
        self
    }

    pub fn show_factories(mut self, show: bool) -> Self {
        self.show_factories = Some(show);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Which fields an applied update actually modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub active_layer: bool,
    pub date: bool,
    pub threshold: bool,
    pub basemap: bool,
    pub show_factories: bool,
}

impl ChangeSet {
    /// Whether the query for `layer` is affected by these changes.
    pub fn requires_fetch(&self, layer: LayerKind) -> bool {
        self.active_layer
            || (self.date && layer.depends_on_date())
            || (self.threshold && layer.depends_on_threshold())
    }

    pub fn any(&self) -> bool {
        self.active_layer || self.date || self.threshold || self.basemap || self.show_factories
    }
}
