//! Rendering of controller snapshots for the terminal.

use clap::ValueEnum;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use layer_controller::ViewModel;
use methane_common::{format_date, FactoryRecord, PlumeFeature};

/// How reports are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Data URLs are long; only their prefix is useful on a terminal.
const MAX_URL_WIDTH: usize = 72;

pub fn render(view: &ViewModel, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(view)),
        OutputFormat::Json => format_json(view),
    }
}

pub fn render_plumes(plumes: &[PlumeFeature], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(format_plume_table(plumes)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(plumes)?),
    }
}

/// Format a view as console tables.
pub fn format_table(view: &ViewModel) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![view.title.to_string(), String::new()]);

    let params = &view.params;
    table.add_row(vec!["Layer:".to_string(), params.active_layer.to_string()]);
    if view.controls.date_enabled {
        let date = params
            .date
            .map(format_date)
            .unwrap_or_else(|| "latest".to_string());
        table.add_row(vec!["Date:".to_string(), date]);
    }
    if view.controls.threshold_enabled {
        table.add_row(vec![
            "Threshold:".to_string(),
            format!("{} ppb", params.threshold),
        ]);
    }
    table.add_row(vec!["Basemap:".to_string(), view.basemap.name.to_string()]);
    table.add_row(vec![
        "View:".to_string(),
        format!(
            "[{:.1}, {:.1}] zoom {}",
            view.map_view.center[0], view.map_view.center[1], view.map_view.zoom
        ),
    ]);
    table.add_row(vec!["Status:".to_string(), status(view)]);
    if let Some(error) = &view.factories_error {
        table.add_row(vec!["Factories:".to_string(), format!("error: {}", error)]);
    }

    if let Some(url) = view.tile_url() {
        table.add_row(vec!["Tiles:".to_string(), truncate(url)]);
    }
    if let Some((image, bounds)) = view.prediction_overlay() {
        table.add_row(vec!["Overlay:".to_string(), truncate(image)]);
        let [[south, west], [north, east]] = bounds.corners();
        table.add_row(vec![
            "Bounds:".to_string(),
            format!("[{}, {}] - [{}, {}]", south, west, north, east),
        ]);
    }

    let mut out = table.to_string();
    if !view.plumes().is_empty() {
        out.push('\n');
        out.push_str(&format_plume_table(view.plumes()));
    }
    if !view.factories.is_empty() {
        out.push('\n');
        out.push_str(&format_factory_table(&view.factories));
    }
    out
}

/// Format a view as JSON.
pub fn format_json(view: &ViewModel) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

pub fn format_plume_table(plumes: &[PlumeFeature]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Plume", "Lat", "Lon", "Emission (kg/hr)", "Marker"]);

    for plume in plumes {
        table.add_row(vec![
            plume.id.clone(),
            format!("{:.4}", plume.latitude),
            format!("{:.4}", plume.longitude),
            plume
                .emission_rate_kg_per_hr
                .map(|rate| format!("{:.1}", rate))
                .unwrap_or_else(|| "N/A".to_string()),
            plume.marker_color().to_string(),
        ]);
    }

    table.to_string()
}

fn format_factory_table(factories: &[FactoryRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Factory", "Type", "Lat", "Lng"]);

    for factory in factories {
        table.add_row(vec![
            factory.name.clone(),
            factory.kind.clone(),
            format!("{:.4}", factory.lat),
            format!("{:.4}", factory.lng),
        ]);
    }

    table.to_string()
}

fn status(view: &ViewModel) -> String {
    match (&view.error, view.loading) {
        (_, true) => "loading".to_string(),
        (Some(error), false) => format!("error: {}", error),
        (None, false) if view.layer.is_some() => "ready".to_string(),
        (None, false) => "idle".to_string(),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_URL_WIDTH {
        s.to_string()
    } else {
        let head: String = s.chars().take(MAX_URL_WIDTH).collect();
        format!("{}...", head)
    }
}
