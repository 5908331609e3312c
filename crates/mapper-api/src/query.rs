//! Request construction for each API endpoint.

use std::fmt;

use chrono::NaiveDate;
use methane_common::{format_date, LayerKind, Threshold};
use serde::Serialize;

pub const MAP_PATH: &str = "/api/map";
pub const CARBON_MAPPER_PATH: &str = "/api/carbonmapper";
pub const PREDICT_PATH: &str = "/api/predict";
pub const GLOBAL_PREDICTION_PATH: &str = "/api/global-prediction";

/// Parameters of a heatmap tile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapQuery {
    pub threshold: Threshold,
    /// Omitted from the request when `None`; the server then picks the latest scene.
    pub date: Option<NaiveDate>,
}

impl HeatmapQuery {
    pub fn new(threshold: Threshold, date: Option<NaiveDate>) -> Self {
        Self { threshold, date }
    }

    /// Query string pairs, `threshold` first.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("threshold", self.threshold.to_string())];
        if let Some(date) = self.date {
            pairs.push(("date", format_date(date)));
        }
        pairs
    }

    /// Path plus query string, e.g. `/api/map?threshold=1920&date=2024-01-15`.
    pub fn path_and_query(&self) -> String {
        let query = self
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", MAP_PATH, query)
    }
}

/// JSON body of `POST /api/predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionRequest {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub lat: f64,
    pub lon: f64,
}

/// The request a layer needs for a given set of parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerQuery {
    Heatmap(HeatmapQuery),
    HighResPlumes,
    Prediction(PredictionRequest),
}

impl LayerQuery {
    pub fn layer(&self) -> LayerKind {
        match self {
            LayerQuery::Heatmap(_) => LayerKind::Heatmap,
            LayerQuery::HighResPlumes => LayerKind::HighResPlumes,
            LayerQuery::Prediction(_) => LayerKind::Prediction,
        }
    }
}

impl fmt::Display for LayerQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerQuery::Heatmap(q) => write!(f, "GET {}", q.path_and_query()),
            LayerQuery::HighResPlumes => write!(f, "GET {}", CARBON_MAPPER_PATH),
            LayerQuery::Prediction(req) => write!(
                f,
                "POST {} date={} lat={} lon={}",
                PREDICT_PATH,
                format_date(req.date),
                req.lat,
                req.lon
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heatmap_query_without_date() {
        let query = HeatmapQuery::new(Threshold::default(), None);
        assert_eq!(query.path_and_query(), "/api/map?threshold=1920");
    }

    #[test]
    fn test_heatmap_query_with_date() {
        let query = HeatmapQuery::new(
            Threshold::new(1855).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5),
        );
        assert_eq!(query.path_and_query(), "/api/map?threshold=1855&date=2024-01-05");
    }

    #[test]
    fn test_prediction_body() {
        let req = PredictionRequest {
            date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            lat: 20.0,
            lon: 0.0,
        };
        let json = serde_json::to_value(req).unwrap();
        assert_eq!(json["date"], "2023-06-01");
        assert_eq!(json["lat"], 20.0);
        assert_eq!(json["lon"], 0.0);
    }
}
