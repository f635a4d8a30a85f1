use std::ops::RangeInclusive;

use egui_plot::{GridInput, GridMark};

/// How genome-size values are placed on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log10,
}

impl AxisScale {
    pub fn from_flag(log: bool) -> Self {
        if log {
            AxisScale::Log10
        } else {
            AxisScale::Linear
        }
    }

    /// Plot coordinate for a data value. Non-positive values have no place on
    /// a log axis and are dropped.
    pub fn apply(self, v: f64) -> Option<f64> {
        match self {
            AxisScale::Linear => Some(v),
            AxisScale::Log10 if v > 0.0 => Some(v.log10()),
            AxisScale::Log10 => None,
        }
    }

    /// Data value for a plot coordinate.
    pub fn invert(self, x: f64) -> f64 {
        match self {
            AxisScale::Linear => x,
            AxisScale::Log10 => 10f64.powf(x),
        }
    }
}

/// Outermost decade a mark is generated for; beyond this `f64` runs out.
const DECADE_LIMIT: f64 = 300.0;
/// Widest span, in decades, that still gets sub-decade marks.
const DETAILED_DECADES: i32 = 30;

/// Decade and sub-decade grid marks for a log10-transformed axis. When zoomed
/// far out only every n-th decade is marked, so the mark count stays bounded.
pub fn log_axis_spacer(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    if !(min.is_finite() && max.is_finite()) {
        return vec![];
    }
    let lo = min.floor().max(-DECADE_LIMIT) as i32;
    let hi = max.ceil().min(DECADE_LIMIT) as i32;
    if lo > hi {
        return vec![];
    }

    if hi - lo > DETAILED_DECADES {
        let stride = (hi - lo) / DETAILED_DECADES;
        return (lo..=hi)
            .filter(|i| i % stride == 0)
            .map(|i| GridMark {
                value: i as f64,
                step_size: stride as f64,
            })
            .collect();
    }

    let mut marks = vec![];
    for i in lo..=hi {
        marks.extend(
            (10..100)
                .map(|j| {
                    let value = i as f64 + (j as f64).log10() - 1.0;
                    let step_size = if j == 10 {
                        1.0
                    } else if j % 10 == 0 {
                        0.1
                    } else {
                        0.01
                    };
                    GridMark { value, step_size }
                })
                .filter(|gm| (min..=max).contains(&gm.value)),
        );
    }
    marks
}

/// Label a log10 grid mark in original units.
pub fn log_axis_formatter(gm: GridMark, _bounds: &RangeInclusive<f64>) -> String {
    format_value(10f64.powf(gm.value))
}

/// Compact number formatting for tick labels and hover text.
pub fn format_value(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e6).contains(&a) {
        format!("{v:.2e}")
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_scale_drops_non_positive_values() {
        assert_eq!(AxisScale::Log10.apply(100.0), Some(2.0));
        assert_eq!(AxisScale::Log10.apply(0.0), None);
        assert_eq!(AxisScale::Log10.apply(-1.0), None);
        assert_eq!(AxisScale::Linear.apply(-1.0), Some(-1.0));
        assert!((AxisScale::Log10.invert(2.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn log_spacer_stays_bounded_when_zoomed_out() {
        let near = log_axis_spacer(GridInput {
            bounds: (-1.0, 2.0),
            base_step_size: 0.01,
        });
        assert!(near.iter().any(|m| m.value == 1.0 && m.step_size == 1.0));
        assert!(near.iter().any(|m| m.step_size == 0.01));

        let far = log_axis_spacer(GridInput {
            bounds: (-1e12, 1e12),
            base_step_size: 1e9,
        });
        assert!(!far.is_empty());
        assert!(far.len() <= 2 * DETAILED_DECADES as usize);
        assert!(far.iter().all(|m| m.value.fract() == 0.0));

        let broken = log_axis_spacer(GridInput {
            bounds: (f64::NEG_INFINITY, f64::NAN),
            base_step_size: 1.0,
        });
        assert!(broken.is_empty());
    }

    #[test]
    fn values_format_compactly() {
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(4641.7), "4642");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(2.5e7), "2.50e7");
    }
}
