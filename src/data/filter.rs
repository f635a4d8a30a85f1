use std::collections::BTreeSet;

use super::model::{Group, Table};

// ---------------------------------------------------------------------------
// Aggregation: row-wise union of tables
// ---------------------------------------------------------------------------

/// Concatenate tables in the order given.
///
/// The resulting schema is the union of all input schemas in first-seen
/// order; rows from a table lacking a column read that column as missing.
/// No deduplication, no sorting.
pub fn concat<I>(tables: I) -> Table
where
    I: IntoIterator<Item = Table>,
{
    let mut out = Table::default();
    for table in tables {
        for col in table.columns {
            if !out.columns.contains(&col) {
                out.columns.push(col);
            }
        }
        out.records.extend(table.records);
    }
    out
}

// ---------------------------------------------------------------------------
// Group filter
// ---------------------------------------------------------------------------

/// The groups selected in the side panel. Empty means nothing is shown.
pub type GroupSelection = BTreeSet<Group>;

/// Keep only rows whose group is selected. The schema is preserved even when
/// no rows survive.
pub fn filter_groups(table: &Table, selected: &GroupSelection) -> Table {
    Table {
        columns: table.columns.clone(),
        records: table
            .records
            .iter()
            .filter(|r| selected.contains(&r.group))
            .cloned()
            .collect(),
    }
}
