use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};

use super::error::{DataError, Result};
use super::model::{CellValue, Group, RawTable, Table};
use super::schema::normalize;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// One source file and the group its rows belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub group: Group,
    pub file: PathBuf,
}

impl SourceSpec {
    pub fn new(group: Group, file: impl Into<PathBuf>) -> Self {
        Self {
            group,
            file: file.into(),
        }
    }

    /// The three groups at their default file names.
    pub fn defaults() -> Vec<SourceSpec> {
        Group::ALL
            .into_iter()
            .map(|g| SourceSpec::new(g, g.default_file()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

/// A group that could not be read. Shown to the user, never fatal on its own.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    pub group: Group,
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} data could not be loaded ({}): {}",
            self.group,
            self.path.display(),
            self.message
        )
    }
}

/// Outcome of [`load_all`]: the normalized tables that loaded, in source
/// order, and one warning per source that did not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tables: Vec<(Group, Table)>,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn loaded_groups(&self) -> Vec<Group> {
        self.tables.iter().map(|(g, _)| *g).collect()
    }
}

/// Read, tag and normalize every source. A source that fails to read is
/// logged, recorded as a warning and left out; the others still load.
pub fn load_all(sources: &[SourceSpec], base_dir: &Path, cache: &mut SourceCache) -> LoadReport {
    let mut report = LoadReport::default();

    for source in sources {
        let path = base_dir.join(&source.file);
        match cache.read(&path) {
            Ok(raw) => {
                let table = normalize(raw.tag(source.group));
                log::info!(
                    "Loaded {} rows for {} from {} (columns {:?})",
                    table.len(),
                    source.group,
                    path.display(),
                    table.columns
                );
                report.tables.push((source.group, table));
            }
            Err(e) => {
                log::warn!("Failed to load {} from {}: {e}", source.group, path.display());
                report.warnings.push(LoadWarning {
                    group: source.group,
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

// ---------------------------------------------------------------------------
// Source cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl SourceKey {
    fn for_path(path: &Path) -> Self {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok();
        SourceKey { path, modified }
    }
}

/// Successful raw reads, keyed by file identity (path + modification time).
/// Lives as long as the application state; entries are never evicted.
/// Failed reads are not cached and are retried on the next load.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<SourceKey, RawTable>,
    disk_reads: usize,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the raw table for `path`, reading it only on a cache miss.
    pub fn read(&mut self, path: &Path) -> Result<RawTable> {
        let key = SourceKey::for_path(path);
        if let Some(raw) = self.entries.get(&key) {
            log::debug!("cache hit for {}", path.display());
            return Ok(raw.clone());
        }
        self.disk_reads += 1;
        let raw = read_table(path)?;
        self.entries.insert(key, raw.clone());
        Ok(raw)
    }

    /// Number of times a file was actually read from disk.
    pub fn disk_reads(&self) -> usize {
        self.disk_reads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// File readers
// ---------------------------------------------------------------------------

/// Read a tabular file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`           – comma-delimited text with a header row
/// * `.tsv` / `.tab`  – tab-delimited text with a header row
/// * `.parquet`       – any flat schema; every column becomes cells
pub fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_delimited(path, b','),
        "tsv" | "tab" => read_delimited(path, b'\t'),
        "parquet" | "pq" => read_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

/// Delimited text: header row, then one record per line. Short rows are
/// padded with missing cells; rows wider than the header are rejected.
fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.to_string()
        })
        .collect();
    if header.is_empty() || header.iter().all(|h| h.is_empty()) {
        return Err(DataError::MissingHeader);
    }
    let columns = dedupe_columns(header);
    let width = columns.len();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(DataError::RaggedRow {
                row: row_no + 1,
                expected: width,
                found: record.len(),
            });
        }
        let mut row: Vec<CellValue> = record.iter().map(CellValue::from_raw).collect();
        row.resize(width, CellValue::Null);
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

/// Repeated header names get a `.1`, `.2`, ... suffix so every column stays
/// addressable. Generated names are counted too, so a suffix that collides
/// with a real header is suffixed again (`GC, GC, GC.1` gives `GC.1.1`).
fn dedupe_columns(header: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::with_capacity(header.len());
    for mut name in header {
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{name}.{count}");
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), 1);
        out.push(name);
    }
    out
}

/// Parquet files written by Pandas (`df.to_parquet()`) or Polars
/// (`df.write_parquet()`). Numeric columns keep their numbers, strings stay
/// text, anything else is rendered to text.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let mut batch_rows: Vec<Vec<CellValue>> =
            vec![Vec::with_capacity(columns.len()); batch.num_rows()];
        for col in batch.columns() {
            for (row, cells) in batch_rows.iter_mut().enumerate() {
                cells.push(extract_cell(col, row)?);
            }
        }
        rows.extend(batch_rows);
    }

    Ok(RawTable {
        columns: dedupe_columns(columns),
        rows,
    })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::from_raw(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => CellValue::from_raw(col.as_string::<i64>().value(row)),
        DataType::Int8 => CellValue::Number(col.as_primitive::<Int8Type>().value(row) as f64),
        DataType::Int16 => CellValue::Number(col.as_primitive::<Int16Type>().value(row) as f64),
        DataType::Int32 => CellValue::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => CellValue::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::UInt8 => CellValue::Number(col.as_primitive::<UInt8Type>().value(row) as f64),
        DataType::UInt16 => CellValue::Number(col.as_primitive::<UInt16Type>().value(row) as f64),
        DataType::UInt32 => CellValue::Number(col.as_primitive::<UInt32Type>().value(row) as f64),
        DataType::UInt64 => CellValue::Number(col.as_primitive::<UInt64Type>().value(row) as f64),
        DataType::Float32 => {
            CellValue::Number(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Number(col.as_primitive::<Float64Type>().value(row)),
        _ => {
            let formatter = ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())?;
            CellValue::from_raw(&formatter.value(row).to_string())
        }
    };
    Ok(value)
}
