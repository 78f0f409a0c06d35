//! GTD Explorer - Terrorism Incident Dataset Explorer
//!
//! Loads an incident CSV, derives every chart table once, and opens an
//! interactive viewer with casualty, attack-type, and group views.

mod agg;
mod charts;
mod data;
mod gui;

use anyhow::Context;
use eframe::egui;

use data::{DatasetLoader, GROUP_COLUMN};
use gui::{ExplorerApp, ViewerData};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: gtd_explorer <incidents.csv>")?;

    // Any load or derivation failure here is fatal: either the full dataset
    // is ready before the window opens, or the session does not start.
    let mut loader = DatasetLoader::new();
    loader
        .load_csv(&path)
        .with_context(|| format!("failed to load dataset from {path}"))?;
    log::info!("loaded {} rows from {}", loader.get_row_count(), path);

    let has_groups = loader.has_column(GROUP_COLUMN);
    if !has_groups {
        log::info!("no {GROUP_COLUMN} column: group rankings view disabled");
    }

    let df = loader.get_dataframe().context("no dataset loaded")?;
    let viewer = ViewerData::build(df, has_groups)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("GTD Explorer"),
        ..Default::default()
    };

    eframe::run_native(
        "GTD Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(ExplorerApp::new(cc, viewer)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
