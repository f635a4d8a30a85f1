use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels, summary};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GcExplorerApp {
    pub state: AppState,
}

impl GcExplorerApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for GcExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and statistics ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

/// Charts and statistics, or the blocking error when nothing loaded.
fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.fatal {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(err).color(Color32::RED));
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("GC Content and Genome Size by Group");
            ui.label("Relationship between genome size (Mb) and GC content (%) for viruses, prokaryotes, and eukaryotes.");
            ui.separator();

            ui.heading("Genome size vs GC content");
            charts::scatter_plot(ui, state);
            ui.add_space(12.0);

            ui.heading("GC content distribution");
            charts::gc_box_plot(ui, state);
            ui.add_space(12.0);

            ui.heading("Genome size distribution");
            charts::size_histogram(ui, state);
            ui.add_space(12.0);

            ui.heading("Summary statistics");
            summary::summary_table(ui, state);
        });
}
