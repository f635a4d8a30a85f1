//! Canonical schema: semantic fields, their source-column synonyms, and the
//! normalizer that renames and coerces a tagged table onto them.

use std::fmt;

use super::model::Table;

/// One of the six meanings a source column may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemanticField {
    GenomeSize,
    GcContent,
    GeneCount,
    Organism,
    Taxon,
    Host,
}

impl SemanticField {
    pub const ALL: [SemanticField; 6] = [
        SemanticField::GenomeSize,
        SemanticField::GcContent,
        SemanticField::GeneCount,
        SemanticField::Organism,
        SemanticField::Taxon,
        SemanticField::Host,
    ];

    /// Fields summarised in the statistics table, in display order.
    pub const NUMERIC: [SemanticField; 3] = [
        SemanticField::GenomeSize,
        SemanticField::GcContent,
        SemanticField::GeneCount,
    ];

    /// Optional fields shown when hovering a scatter point.
    pub const HOVER: [SemanticField; 4] = [
        SemanticField::Organism,
        SemanticField::Taxon,
        SemanticField::Host,
        SemanticField::GeneCount,
    ];

    /// Column label after normalization. None of these is a synonym of a
    /// different field, so normalizing twice is a no-op.
    pub fn canonical(self) -> &'static str {
        match self {
            SemanticField::GenomeSize => "Genome Size (Mb)",
            SemanticField::GcContent => "GC Content (%)",
            SemanticField::GeneCount => "Gene Count",
            SemanticField::Organism => "Organism",
            SemanticField::Taxon => "Taxonomic Group",
            SemanticField::Host => "Host",
        }
    }

    /// Source column names accepted for this field, highest priority first.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            SemanticField::GenomeSize => &["Size(Mb)", "Size", "GenomeSize(Mb)", "Genome Size (Mb)"],
            SemanticField::GcContent => &["GC%", "GC", "GC content", "GC_content"],
            SemanticField::GeneCount => &["CDS", "GeneCount", "Genes"],
            SemanticField::Organism => &["#Organism Name", "Organism Name", "Organism", "Name"],
            SemanticField::Taxon => &["Organism Groups", "Group", "Taxon", "Taxonomic group"],
            SemanticField::Host => &["Host"],
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

// ---------------------------------------------------------------------------
// Column resolver
// ---------------------------------------------------------------------------

/// Return the first of `candidates` that appears in `available`.
///
/// Candidate order is authoritative: the position of a match inside
/// `available` does not matter. Absence is `None`, never an error.
pub fn resolve<'c, S: AsRef<str>>(available: &[S], candidates: &[&'c str]) -> Option<&'c str> {
    candidates
        .iter()
        .copied()
        .find(|cand| available.iter().any(|col| col.as_ref() == *cand))
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Rename recognised columns to their canonical labels and coerce numeric
/// fields. Unrecognised columns pass through untouched; unresolved fields are
/// simply absent.
pub fn normalize(mut table: Table) -> Table {
    let mut renames: Vec<(String, &'static str)> = Vec::new();
    for field in SemanticField::ALL {
        if let Some(source) = resolve(&table.columns, field.synonyms()) {
            log::debug!("column '{source}' -> '{}'", field.canonical());
            renames.push((source.to_string(), field.canonical()));
        }
    }

    // A pre-existing column that already carries a canonical label but lost
    // resolution to a higher-priority synonym would become a duplicate.
    let shadowed: Vec<&'static str> = renames
        .iter()
        .filter(|(source, target)| source != target && table.has_column(target))
        .map(|(_, target)| *target)
        .collect();
    for target in &shadowed {
        log::debug!("dropping shadowed column '{target}'");
    }

    table.columns = table
        .columns
        .into_iter()
        .filter(|c| !shadowed.contains(&c.as_str()))
        .map(|c| match renames.iter().find(|(source, _)| *source == c) {
            Some((_, target)) => target.to_string(),
            None => c,
        })
        .collect();

    for record in &mut table.records {
        for target in &shadowed {
            record.cells.remove(*target);
        }
        for (source, target) in &renames {
            if source == target {
                continue;
            }
            if let Some(value) = record.cells.remove(source) {
                record.cells.insert(target.to_string(), value);
            }
        }
        for field in SemanticField::NUMERIC {
            if let Some(cell) = record.cells.get_mut(field.canonical()) {
                *cell = cell.coerce_numeric();
            }
        }
    }

    table
}
