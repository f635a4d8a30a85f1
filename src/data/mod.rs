/// Data layer: core types, loading, normalization, and filtering.
///
/// Architecture:
/// ```text
///  viruses.csv / prokaryotes.csv / eukaryotes.csv
///        │
///        ▼
///   ┌──────────────┐
///   │ loader/cache  │  read file → RawTable, tag rows with Group
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  resolve synonyms → canonical columns, coerce numbers
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  concat groups, keep selected groups
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
