//! The static factory overlay.
//!
//! Factory locations ship with the application; "loading" them is a local
//! state transition that never touches the network.

use methane_common::{FactoryRecord, MapperError, MapperResult};

#[derive(Debug, Clone, Default)]
pub struct FactoryOverlay {
    catalog: Vec<FactoryRecord>,
    loaded: Vec<FactoryRecord>,
    /// Last load failure; kept apart from the active layer's request state.
    error: Option<String>,
}

impl FactoryOverlay {
    pub fn new(catalog: Vec<FactoryRecord>) -> Self {
        Self {
            catalog,
            loaded: Vec::new(),
            error: None,
        }
    }

    /// Populate the overlay from the catalog. Idempotent.
    pub fn load(&mut self) -> MapperResult<usize> {
        if self.catalog.is_empty() {
            let err = MapperError::NoFactoryData;
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.error = None;
        self.loaded.clone_from(&self.catalog);
        Ok(self.loaded.len())
    }

    pub fn is_loaded(&self) -> bool {
        !self.loaded.is_empty()
    }

    pub fn loaded(&self) -> &[FactoryRecord] {
        &self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }
}
