//! Canned API bodies and reference data.
//!
//! Bodies mirror what the Methane Mapper API actually returns, including
//! its no-data shapes.

/// `/api/map` bodies.
pub mod heatmap {
    pub const TILE_URL: &str =
        "https://earthengine.googleapis.com/v1/projects/demo/maps/abc123/tiles/{z}/{x}/{y}";

    pub const OK: &str = r#"{"tileUrl": "https://earthengine.googleapis.com/v1/projects/demo/maps/abc123/tiles/{z}/{x}/{y}"}"#;

    /// Server has no scene for the requested day.
    pub const NO_DATA: &str =
        r#"{"tileUrl": null, "message": "No data available for the selected date."}"#;

    /// Missing `tileUrl` and no message at all.
    pub const EMPTY_OBJECT: &str = "{}";
}

/// `/api/carbonmapper` and `/api/global-prediction` bodies.
pub mod plumes {
    pub const OK: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-103.95, 31.84]},
                "properties": {"plume_id": "emi20230815t170413p01", "emission_auto": 1250.5}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [54.19, 38.49]},
                "properties": {"plume_id": "emi20230902t081122p03", "emission_auto": null}
            }
        ]
    }"#;

    pub const EMPTY: &str = r#"{"features": []}"#;

    pub const ERROR: &str = r#"{"error": "Carbon Mapper catalog unavailable"}"#;

    /// Explicit `null` in place of the feature list.
    pub const NULL_FEATURES: &str = r#"{"features": null, "error": "upstream down"}"#;

    /// One usable feature, one without coordinates, one without any id.
    pub const PARTIALLY_MALFORMED: &str = r#"{
        "features": [
            {"geometry": {"coordinates": [10.0, 20.0]}, "properties": {"plume_id": 42}},
            {"geometry": {"coordinates": []}, "properties": {"plume_id": "no-coords"}},
            {"geometry": {"coordinates": [1.0, 2.0]}, "properties": {}}
        ]
    }"#;

    pub const GLOBAL_PREDICTION: &str = r#"{
        "features": [
            {
                "geometry": {"type": "Point", "coordinates": [-102.1, 31.9]},
                "properties": {"plume_id": "pred-0001", "emission_auto": 830.0, "is_predicted": true}
            },
            {
                "geometry": {"type": "Point", "coordinates": [-103.95, 31.84]},
                "properties": {"plume_id": "emi20230815t170413p01", "emission_auto": 1250.5, "is_predicted": false}
            }
        ]
    }"#;
}

/// `/api/predict` bodies.
pub mod prediction {
    pub const IMAGE_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

    pub const OK: &str = r#"{
        "status": "success",
        "heatmap_image": "data:image/png;base64,iVBORw0KGgo=",
        "bounds": [[10.0, -20.0], [30.0, 20.0]]
    }"#;

    pub const ERROR: &str = r#"{"status": "error", "message": "Model not loaded"}"#;

    /// An image whose bounds are not a valid lat/lon box.
    pub const BAD_BOUNDS: &str = r#"{
        "status": "success",
        "heatmap_image": "data:image/png;base64,iVBORw0KGgo=",
        "bounds": [[10.0, -20.0], [95.0, 20.0]]
    }"#;

    /// Neither an image nor an explicit error.
    pub const UNRECOGNIZED: &str = r#"{"status": "pending"}"#;
}

/// Factory catalog fixtures.
pub mod factories {
    pub const YAML: &str = r#"
- name: "Permian Gas Plant"
  lat: 31.9
  lng: -102.1
  type: "Gas Processing"
- name: "Turkmen Compressor Station"
  lat: 38.5
  lng: 54.2
  type: "Pipeline"
"#;

    pub const JSON: &str = r#"[
        {"name": "Permian Gas Plant", "lat": 31.9, "lng": -102.1, "type": "Gas Processing"},
        {"name": "Turkmen Compressor Station", "lat": 38.5, "lng": 54.2, "type": "Pipeline"}
    ]"#;
}
