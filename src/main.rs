use std::path::Path;

use eframe::egui;
use gc_explorer::app::GcExplorerApp;
use gc_explorer::config::{DashboardConfig, CONFIG_FILE};

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GC Explorer – Genome Size & GC Content",
        options,
        Box::new(|_cc| Ok(Box::new(GcExplorerApp::new(config)))),
    )
}
