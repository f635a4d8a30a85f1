use std::io;

use serde::Serialize;

use crate::data::model::{Group, Table};
use crate::data::schema::SemanticField;

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Count, mean, sample std, min, quartiles, and max of one column.
/// Undefined statistics (no values, or std of a single value) are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    /// Describe non-missing values.
    pub fn of(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Describe::default();
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });

        Describe {
            count,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    /// Round every statistic to two decimals.
    pub fn rounded(self) -> Self {
        let r = |v: Option<f64>| v.map(round2);
        Describe {
            count: self.count,
            mean: r(self.mean),
            std: r(self.std),
            min: r(self.min),
            q25: r(self.q25),
            median: r(self.median),
            q75: r(self.q75),
            max: r(self.max),
        }
    }

    /// Statistics in table order, paired with their column header.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Round to two decimals, ties to even.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Quantile of sorted data with linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Grouped summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub group: Group,
    pub field: SemanticField,
    pub stats: Describe,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// One row per (group, numeric field), groups in group order.
    Rows(Vec<SummaryRow>),
    /// Neither genome size nor GC content is present.
    MissingColumns,
}

/// Grouped descriptive statistics of the numeric fields present in `table`,
/// rounded to two decimals. Groups without rows are left out.
pub fn summarize(table: &Table) -> Summary {
    let present = table.present_fields();
    if !present.contains(&SemanticField::GenomeSize) && !present.contains(&SemanticField::GcContent)
    {
        return Summary::MissingColumns;
    }

    let mut rows = Vec::new();
    for group in table.groups() {
        for field in SemanticField::NUMERIC {
            if !present.contains(&field) {
                continue;
            }
            rows.push(SummaryRow {
                group,
                field,
                stats: Describe::of(&table.values(group, field)).rounded(),
            });
        }
    }
    Summary::Rows(rows)
}

/// Flat record written by the statistics export.
#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Field")]
    field: &'a str,
    count: usize,
    mean: Option<f64>,
    std: Option<f64>,
    min: Option<f64>,
    #[serde(rename = "25%")]
    q25: Option<f64>,
    #[serde(rename = "50%")]
    median: Option<f64>,
    #[serde(rename = "75%")]
    q75: Option<f64>,
    max: Option<f64>,
}

/// Write summary rows as CSV. Undefined statistics are empty cells.
pub fn write_summary_csv<W: io::Write>(rows: &[SummaryRow], out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        let s = &row.stats;
        writer.serialize(SummaryRecord {
            group: row.group.label(),
            field: row.field.canonical(),
            count: s.count,
            mean: s.mean,
            std: s.std,
            min: s.min,
            q25: s.q25,
            median: s.median,
            q75: s.q75,
            max: s.max,
        })?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Box plot summary
// ---------------------------------------------------------------------------

/// Quartiles, Tukey whiskers (most extreme values within 1.5 × IQR), and the
/// values beyond them.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn of(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = || {
            sorted
                .iter()
                .copied()
                .filter(move |v| (lo_fence..=hi_fence).contains(v))
        };
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins shared by every group, so bars overlay cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<(Group, Vec<usize>)>,
}

impl Histogram {
    /// Bin `series` into `bins` bins spanning the combined value range.
    /// Returns `None` when there are no values at all.
    pub fn build(series: &[(Group, Vec<f64>)], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let all = || series.iter().flat_map(|(_, v)| v.iter().copied());
        let min = all().min_by(f64::total_cmp)?;
        let max = all().max_by(f64::total_cmp)?;

        let (start, bin_width) = if max > min {
            (min, (max - min) / bins as f64)
        } else {
            (min - 0.5, 1.0)
        };
        let n_bins = if max > min { bins } else { 1 };

        let counts = series
            .iter()
            .map(|(group, values)| {
                let mut counts = vec![0usize; n_bins];
                for v in values {
                    let idx = ((v - start) / bin_width).floor() as usize;
                    counts[idx.min(n_bins - 1)] += 1;
                }
                (*group, counts)
            })
            .collect();

        Some(Histogram {
            start,
            bin_width,
            counts,
        })
    }

    pub fn bin_center(&self, idx: usize) -> f64 {
        self.start + (idx as f64 + 0.5) * self.bin_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::concat;
    use crate::data::model::{CellValue, RawTable};
    use crate::data::schema::normalize;

    fn table(group: Group, columns: &[&str], rows: &[&[&str]]) -> Table {
        normalize(
            RawTable {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows: rows
                    .iter()
                    .map(|r| r.iter().map(|s| CellValue::from_raw(s)).collect())
                    .collect(),
            }
            .tag(group),
        )
    }

    #[test]
    fn describe_matches_pandas_conventions() {
        let d = Describe::of(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(d.count, 4);
        assert_eq!(d.mean, Some(2.5));
        assert_eq!(d.min, Some(1.0));
        assert_eq!(d.q25, Some(1.75));
        assert_eq!(d.median, Some(2.5));
        assert_eq!(d.q75, Some(3.25));
        assert_eq!(d.max, Some(4.0));
        assert_eq!(d.rounded().std, Some(1.29));
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(1.2345), 1.23);

        // Mean of eight gene counts lands exactly on a tie.
        let d = Describe::of(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0]).rounded();
        assert_eq!(d.mean, Some(1.12));
    }

    #[test]
    fn describe_degenerate_inputs() {
        assert_eq!(Describe::of(&[]), Describe::default());
        let one = Describe::of(&[7.0]);
        assert_eq!(one.count, 1);
        assert_eq!(one.std, None);
        assert_eq!(one.median, Some(7.0));
    }

    #[test]
    fn missing_values_are_excluded_from_statistics() {
        let t = table(
            Group::Prokaryote,
            &["Size(Mb)", "GC%"],
            &[&["2.0", "40"], &["N/A", "50"], &["4.0", "60"]],
        );
        let Summary::Rows(rows) = summarize(&t) else {
            panic!("expected rows");
        };
        let size = rows
            .iter()
            .find(|r| r.field == SemanticField::GenomeSize)
            .unwrap();
        assert_eq!(size.stats.count, 2);
        assert_eq!(size.stats.mean, Some(3.0));
        assert_eq!(size.stats.std, Some(1.41));
    }

    #[test]
    fn summary_is_grouped_in_group_order() {
        let t = concat(vec![
            table(Group::Eukaryote, &["GC"], &[&["38.1"]]),
            table(Group::Virus, &["GC", "CDS"], &[&["41.23456", "12"], &["43", "8"]]),
        ]);
        let Summary::Rows(rows) = summarize(&t) else {
            panic!("expected rows");
        };
        let keys: Vec<(Group, SemanticField)> = rows.iter().map(|r| (r.group, r.field)).collect();
        assert_eq!(
            keys,
            vec![
                (Group::Virus, SemanticField::GcContent),
                (Group::Virus, SemanticField::GeneCount),
                (Group::Eukaryote, SemanticField::GcContent),
                (Group::Eukaryote, SemanticField::GeneCount),
            ]
        );
        assert_eq!(rows[0].stats.min, Some(41.23));
        assert_eq!(rows[3].stats.count, 0);
        assert_eq!(rows[3].stats.mean, None);
    }

    #[test]
    fn summary_needs_size_or_gc() {
        let t = table(Group::Virus, &["Name", "CDS"], &[&["Phage", "10"]]);
        assert_eq!(summarize(&t), Summary::MissingColumns);

        let only_size = table(Group::Virus, &["Size"], &[&["0.1"]]);
        assert!(matches!(summarize(&only_size), Summary::Rows(_)));
    }

    #[test]
    fn summary_of_empty_table_has_no_rows() {
        let t = table(Group::Virus, &["Size", "GC"], &[]);
        assert_eq!(summarize(&t), Summary::Rows(Vec::new()));
    }

    #[test]
    fn summary_csv_has_header_and_blank_undefined_cells() {
        let rows = vec![SummaryRow {
            group: Group::Virus,
            field: SemanticField::GcContent,
            stats: Describe::of(&[40.0]),
        }];
        let mut buf = Vec::new();
        write_summary_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Group,Field,count,mean,std,min,25%,50%,75%,max")
        );
        assert_eq!(
            lines.next(),
            Some("Virus,GC Content (%),1,40.0,,40.0,40.0,40.0,40.0,40.0")
        );
    }

    #[test]
    fn box_summary_separates_outliers() {
        let b = BoxSummary::of(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(b.q1, 2.0);
        assert_eq!(b.median, 3.0);
        assert_eq!(b.q3, 4.0);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 4.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert!(BoxSummary::of(&[]).is_none());
    }

    #[test]
    fn histogram_bins_are_shared_across_groups() {
        let series = vec![
            (Group::Virus, vec![0.0, 1.0, 2.0]),
            (Group::Eukaryote, vec![10.0]),
        ];
        let h = Histogram::build(&series, 10).unwrap();
        assert_eq!(h.start, 0.0);
        assert_eq!(h.bin_width, 1.0);
        assert_eq!(h.counts[0].1[..3], [1, 1, 1]);
        assert_eq!(h.counts[1].1[9], 1);
        assert_eq!(h.bin_center(0), 0.5);
        let total: usize = h.counts.iter().flat_map(|(_, c)| c.iter()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn histogram_of_constant_or_empty_input() {
        let h = Histogram::build(&[(Group::Virus, vec![5.0, 5.0])], 50).unwrap();
        assert_eq!(h.counts[0].1, vec![2]);
        assert_eq!(h.bin_center(0), 5.0);
        assert!(Histogram::build(&[(Group::Virus, vec![])], 50).is_none());
    }
}
