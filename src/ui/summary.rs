use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use crate::stats::{Describe, Summary};

const HEADERS: [&str; 10] = [
    "Group", "Field", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
];

fn format_stat(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "NaN".to_string(),
    }
}

/// Render the grouped statistics table, or a warning when neither genome
/// size nor GC content is available.
pub fn summary_table(ui: &mut Ui, state: &AppState) {
    let rows = match &state.summary {
        Summary::Rows(rows) => rows,
        Summary::MissingColumns => {
            ui.label(
                RichText::new("Genome size and GC content columns were not found.")
                    .color(Color32::from_rgb(230, 160, 40)),
            );
            return;
        }
    };

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(120.0))
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 2)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(18.0, |mut cells| {
                    cells.col(|ui| {
                        ui.label(
                            RichText::new(row.group.label())
                                .color(state.color_map.color_for(row.group)),
                        );
                    });
                    cells.col(|ui| {
                        ui.label(row.field.canonical());
                    });
                    for (name, value) in Describe::entries(&row.stats) {
                        cells.col(|ui| {
                            let text = if name == "count" {
                                row.stats.count.to_string()
                            } else {
                                format_stat(value)
                            };
                            ui.label(text);
                        });
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_statistics_print_as_nan() {
        assert_eq!(format_stat(Some(3.14159)), "3.14");
        assert_eq!(format_stat(None), "NaN");
    }
}
