use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, MarkerShape, Plot, PlotPoint,
    Points,
};

use crate::data::model::{Group, Record, Table};
use crate::data::schema::SemanticField;
use crate::state::AppState;
use crate::stats::{BoxSummary, Histogram};
use crate::ui::axis::{format_value, log_axis_formatter, log_axis_spacer, AxisScale};

const CHART_HEIGHT: f32 = 340.0;

fn missing_column(ui: &mut Ui, field: SemanticField) {
    ui.label(format!("Column '{field}' was not found in any loaded file."));
}

/// Switch a plot's x axis to log10 ticks when requested.
fn with_x_scale<'a>(plot: Plot<'a>, scale: AxisScale) -> Plot<'a> {
    match scale {
        AxisScale::Linear => plot,
        AxisScale::Log10 => plot
            .x_grid_spacer(log_axis_spacer)
            .x_axis_formatter(log_axis_formatter),
    }
}

// ---------------------------------------------------------------------------
// Scatter: GC content vs genome size
// ---------------------------------------------------------------------------

/// A drawn point and the text shown when hovering it.
struct HoverPoint {
    group: Group,
    at: [f64; 2],
    text: String,
}

fn hover_text(record: &Record, size: f64, gc: f64, fields: &[SemanticField]) -> String {
    let mut text = format!(
        "{}\n{}: {}\n{}: {}",
        record.group,
        SemanticField::GenomeSize,
        format_value(size),
        SemanticField::GcContent,
        format_value(gc)
    );
    for field in fields {
        let value = record.get(field.canonical());
        let shown = match value.as_f64() {
            Some(v) => format_value(v),
            None if value.is_null() => "n/a".to_string(),
            None => value.to_string(),
        };
        text.push_str(&format!("\n{field}: {shown}"));
    }
    text
}

/// Render the scatter plot, one coloured series per group.
pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let table = &state.visible;
    let present = table.present_fields();
    for field in [SemanticField::GenomeSize, SemanticField::GcContent] {
        if !present.contains(&field) {
            missing_column(ui, field);
            return;
        }
    }

    let scale = AxisScale::from_flag(state.log_x);
    let hover_fields: Vec<SemanticField> = SemanticField::HOVER
        .into_iter()
        .filter(|f| present.contains(f))
        .collect();

    let mut series: BTreeMap<Group, Vec<[f64; 2]>> = BTreeMap::new();
    let mut hover: Vec<HoverPoint> = Vec::new();
    for record in &table.records {
        let (Some(size), Some(gc)) = (
            record.number(SemanticField::GenomeSize),
            record.number(SemanticField::GcContent),
        ) else {
            continue;
        };
        let Some(x) = scale.apply(size) else {
            continue;
        };
        series.entry(record.group).or_default().push([x, gc]);
        hover.push(HoverPoint {
            group: record.group,
            at: [x, gc],
            text: hover_text(record, size, gc, &hover_fields),
        });
    }

    let plot = Plot::new("scatter_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(SemanticField::GenomeSize.canonical())
        .y_axis_label(SemanticField::GcContent.canonical())
        .label_formatter(move |name: &str, value: &PlotPoint| {
            let found = hover.iter().find(|p| {
                p.group.label() == name && p.at[0] == value.x && p.at[1] == value.y
            });
            match found {
                Some(p) => p.text.clone(),
                None => format!(
                    "{}: {}\n{}: {}",
                    SemanticField::GenomeSize,
                    format_value(scale.invert(value.x)),
                    SemanticField::GcContent,
                    format_value(value.y)
                ),
            }
        });

    with_x_scale(plot, scale).show(ui, |plot_ui| {
        for (group, points) in series {
            plot_ui.points(
                Points::new(points)
                    .name(group.label())
                    .color(state.color_map.color_for(group))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(3.0),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Box plot: GC content per group
// ---------------------------------------------------------------------------

/// Render one box per group with its outliers.
pub fn gc_box_plot(ui: &mut Ui, state: &AppState) {
    let table = &state.visible;
    if !table.has_column(SemanticField::GcContent.canonical()) {
        missing_column(ui, SemanticField::GcContent);
        return;
    }

    let groups: Vec<Group> = table.groups().into_iter().collect();
    let labels: Vec<String> = groups.iter().map(|g| g.label().to_string()).collect();

    Plot::new("gc_box_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Group")
        .y_axis_label(SemanticField::GcContent.canonical())
        .x_axis_formatter(move |gm: GridMark, _range: &RangeInclusive<f64>| {
            let idx = gm.value.round();
            if (gm.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (pos, group) in groups.iter().enumerate() {
                let Some(summary) = BoxSummary::of(&table.values(*group, SemanticField::GcContent))
                else {
                    continue;
                };
                let color = state.color_map.color_for(*group);
                let x = pos as f64;

                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(
                        summary.lower_whisker,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.upper_whisker,
                    ),
                )
                .name(group.label())
                .box_width(0.5)
                .whisker_width(0.25)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(group.label()).color(color));

                if !summary.outliers.is_empty() {
                    let points: Vec<[f64; 2]> = summary.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .name(group.label())
                            .color(color)
                            .radius(2.5),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram: genome size per group
// ---------------------------------------------------------------------------

/// Genome-size values per group on the current scale.
fn size_series(table: &Table, scale: AxisScale) -> Vec<(Group, Vec<f64>)> {
    table
        .groups()
        .into_iter()
        .map(|g| {
            let values = table
                .values(g, SemanticField::GenomeSize)
                .into_iter()
                .filter_map(|v| scale.apply(v))
                .collect();
            (g, values)
        })
        .collect()
}

/// Render overlaid, translucent histograms on shared bins.
pub fn size_histogram(ui: &mut Ui, state: &AppState) {
    let table = &state.visible;
    if !table.has_column(SemanticField::GenomeSize.canonical()) {
        missing_column(ui, SemanticField::GenomeSize);
        return;
    }

    let scale = AxisScale::from_flag(state.log_x);
    let histogram = Histogram::build(&size_series(table, scale), state.config.histogram_bins);
    let opacity = state.config.histogram_opacity;

    let plot = Plot::new("size_histogram")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(SemanticField::GenomeSize.canonical())
        .y_axis_label("Count");

    with_x_scale(plot, scale).show(ui, |plot_ui| {
        let Some(hist) = &histogram else {
            return;
        };
        for (group, counts) in &hist.counts {
            let color = state.color_map.color_for(*group);
            let fill = state.color_map.translucent(*group, opacity);
            let bars: Vec<Bar> = counts
                .iter()
                .enumerate()
                .filter(|(_, c)| **c > 0)
                .map(|(i, &c)| {
                    Bar::new(hist.bin_center(i), c as f64)
                        .width(hist.bin_width)
                        .fill(fill)
                        .stroke(Stroke::new(0.5, color))
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name(group.label()).color(color));
        }
    });
}
