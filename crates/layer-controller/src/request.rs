//! Request tagging and per-fetch state.

use std::time::Duration;

use mapper_api::LayerQuery;
use methane_common::LayerKind;
use serde::Serialize;

use crate::outcome::FetchOutcome;

/// Loading/error flags for the active layer's current fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Hands out monotonically increasing fetch sequence numbers, starting at 1.
#[derive(Debug, Default)]
pub struct Sequencer {
    last: u64,
}

impl Sequencer {
    pub fn issue(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    pub fn last_issued(&self) -> u64 {
        self.last
    }
}

/// Identity of an issued fetch: its sequence number and the exact query sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTag {
    pub seq: u64,
    pub query: LayerQuery,
}

impl FetchTag {
    pub fn layer(&self) -> LayerKind {
        self.query.layer()
    }
}

/// A finished fetch on its way back to the controller.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tag: FetchTag,
    pub outcome: FetchOutcome,
    pub elapsed: Duration,
}
