use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::SemanticField;

/// Column name under which the group tag is exposed to the UI and exports.
pub const GROUP_COLUMN: &str = "Group";

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. `Null` is the missing-value marker.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Null,
}

static NULL: CellValue = CellValue::Null;

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

/// Cell texts read as missing, in addition to the empty string. Matches the
/// default NA markers of common dataframe readers; comparison is exact.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

impl CellValue {
    /// Build a cell from raw delimited text. Empty cells and NA markers are
    /// missing.
    pub fn from_raw(s: &str) -> Self {
        if s.is_empty() || NA_TOKENS.contains(&s) {
            CellValue::Null
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// The numeric value, if this cell holds one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Coerce to a number. Anything that does not parse to a finite `f64`
    /// becomes `Null`; this never fails.
    pub fn coerce_numeric(&self) -> CellValue {
        let parsed = match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Null => None,
        };
        match parsed {
            Some(v) if v.is_finite() => CellValue::Number(v),
            _ => CellValue::Null,
        }
    }
}

// ---------------------------------------------------------------------------
// Group – the biological group a source file belongs to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Virus,
    Prokaryote,
    Eukaryote,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Virus, Group::Prokaryote, Group::Eukaryote];

    pub fn label(self) -> &'static str {
        match self {
            Group::Virus => "Virus",
            Group::Prokaryote => "Prokaryote",
            Group::Eukaryote => "Eukaryote",
        }
    }

    /// File name looked up in the data folder when no config overrides it.
    pub fn default_file(self) -> &'static str {
        match self {
            Group::Virus => "viruses.csv",
            Group::Prokaryote => "prokaryotes.csv",
            Group::Eukaryote => "eukaryotes.csv",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RawTable – a file as read, before tagging and normalization
// ---------------------------------------------------------------------------

/// Header plus positional rows, exactly as read from a source file.
/// Every row has `columns.len()` cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Attach the group label to every row, producing a [`Table`].
    pub fn tag(self, group: Group) -> Table {
        let RawTable { columns, rows } = self;
        let records = rows
            .into_iter()
            .map(|row| Record {
                group,
                cells: columns.iter().cloned().zip(row).collect(),
            })
            .collect();
        Table { columns, records }
    }
}

// ---------------------------------------------------------------------------
// Record / Table – tagged rows
// ---------------------------------------------------------------------------

/// One row. The group tag is a typed field, never a column, so column
/// resolution can not capture or rename it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub group: Group,
    pub cells: BTreeMap<String, CellValue>,
}

impl Record {
    /// Cell for `column`; absent columns read as missing.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&NULL)
    }

    pub fn number(&self, field: SemanticField) -> Option<f64> {
        self.get(field.canonical()).as_f64()
    }
}

/// An ordered schema plus its rows. The schema is kept independently of the
/// rows so that a filtered, empty table still reports its columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Semantic fields whose canonical column is present in the schema.
    pub fn present_fields(&self) -> BTreeSet<SemanticField> {
        SemanticField::ALL
            .into_iter()
            .filter(|f| self.has_column(f.canonical()))
            .collect()
    }

    /// Groups that have at least one row, in group order.
    pub fn groups(&self) -> BTreeSet<Group> {
        self.records.iter().map(|r| r.group).collect()
    }

    /// Non-missing values of a numeric field for one group, in row order.
    pub fn values(&self, group: Group, field: SemanticField) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| r.group == group)
            .filter_map(|r| r.number(field))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_numeric_maps_garbage_to_null() {
        assert_eq!(CellValue::from_raw(" 4.5 ").coerce_numeric(), CellValue::Number(4.5));
        assert_eq!(CellValue::from_raw("1e3").coerce_numeric(), CellValue::Number(1000.0));
        assert_eq!(CellValue::from_raw("N/A").coerce_numeric(), CellValue::Null);
        assert_eq!(CellValue::from_raw("NaN").coerce_numeric(), CellValue::Null);
        assert_eq!(CellValue::from_raw("inf").coerce_numeric(), CellValue::Null);
        assert_eq!(CellValue::from_raw("1,234").coerce_numeric(), CellValue::Null);
        assert_eq!(CellValue::from_raw("").coerce_numeric(), CellValue::Null);
        assert_eq!(CellValue::Number(f64::NAN).coerce_numeric(), CellValue::Null);
    }

    #[test]
    fn na_markers_are_missing_in_text_columns() {
        for raw in ["N/A", "NA", "null", "<NA>", "nan"] {
            assert!(CellValue::from_raw(raw).is_null(), "{raw}");
        }
        assert_eq!(CellValue::from_raw("human"), CellValue::Text("human".into()));
        assert_eq!(CellValue::from_raw("n.a."), CellValue::Text("n.a.".into()));
        assert_eq!(CellValue::from_raw(" NA "), CellValue::Text(" NA ".into()));
    }

    #[test]
    fn coerced_numbers_round_trip() {
        for raw in ["0.0123", "42", "-7.5", "3.14159265358979"] {
            let v = CellValue::from_raw(raw).coerce_numeric().as_f64().unwrap();
            assert_eq!(v.to_string().parse::<f64>().unwrap(), v);
        }
    }

    #[test]
    fn tag_sets_group_and_keeps_columns() {
        let raw = RawTable {
            columns: vec!["a".into(), "b".into()],
            rows: vec![
                vec![CellValue::from_raw("1"), CellValue::Null],
                vec![CellValue::from_raw("x"), CellValue::from_raw("y")],
            ],
        };
        let table = raw.tag(Group::Eukaryote);
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.len(), 2);
        assert!(table.records.iter().all(|r| r.group == Group::Eukaryote));
        assert_eq!(table.records[1].get("b"), &CellValue::Text("y".into()));
        assert!(table.records[0].get("missing").is_null());
    }
}
