use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Group;
use crate::state::AppState;

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 40);

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Group multi-select ----
            let n_selected = state.selected.len();
            ui.strong(format!("Groups  ({n_selected}/{})", Group::ALL.len()));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            for group in Group::ALL {
                let mut checked = state.selected.contains(&group);
                let text = RichText::new(format!("{group}  ({})", state.row_count(group)))
                    .color(state.color_map.color_for(group));
                if ui.checkbox(&mut checked, text).changed() {
                    state.set_group_selected(group, checked);
                }
            }
            ui.separator();

            // ---- Axis scale ----
            ui.checkbox(&mut state.log_x, "Log scale (genome size axis)");
            ui.separator();

            // ---- Load warnings ----
            if !state.warnings.is_empty() {
                ui.strong("Warnings");
                for warning in &state.warnings {
                    ui.label(RichText::new(warning.to_string()).color(WARNING_COLOR));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export statistics…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(all) = &state.combined {
            ui.label(format!(
                "{} rows loaded, {} visible",
                all.len(),
                state.visible.len()
            ));
        }

        ui.separator();
        ui.label(format!("Data folder: {}", state.data_dir.display()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open data folder")
        .set_directory(&state.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.set_data_dir(dir);
        state.status_message = None;
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export statistics")
        .set_file_name("summary_statistics.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_summary(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export statistics: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
