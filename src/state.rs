use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{concat, filter_groups, GroupSelection};
use crate::data::loader::{load_all, LoadWarning, SourceCache};
use crate::data::model::{Group, Table};
use crate::data::schema::SemanticField;
use crate::stats::{summarize, write_summary_csv, Summary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Folder the configured source files are resolved against.
    pub data_dir: PathBuf,

    /// Raw reads, kept for the lifetime of the state.
    cache: SourceCache,

    /// All loaded groups concatenated (None when nothing could be loaded).
    pub combined: Option<Table>,

    /// Per-group load failures from the last load.
    pub warnings: Vec<LoadWarning>,

    /// Blocking error: set when no group loaded, charts are not drawn.
    pub fatal: Option<String>,

    /// Groups ticked in the side panel.
    pub selected: GroupSelection,

    /// Log10 genome-size axis on the scatter and the histogram.
    pub log_x: bool,

    /// `combined` restricted to `selected` (cached).
    pub visible: Table,

    /// Grouped statistics of `visible` (cached).
    pub summary: Summary,

    pub color_map: ColorMap,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and run the pipeline once.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = Self {
            data_dir: config.data_dir.clone(),
            config,
            cache: SourceCache::new(),
            combined: None,
            warnings: Vec::new(),
            fatal: None,
            selected: Group::ALL.into_iter().collect(),
            log_x: false,
            visible: Table::default(),
            summary: Summary::Rows(Vec::new()),
            color_map: ColorMap::default(),
            status_message: None,
        };
        state.reload();
        state
    }

    /// Load every source (through the cache) and rebuild the combined table.
    pub fn reload(&mut self) {
        let report = load_all(&self.config.sources, &self.data_dir, &mut self.cache);
        self.warnings = report.warnings;

        if report.tables.is_empty() {
            log::error!("No dataset could be loaded from {}", self.data_dir.display());
            self.fatal = Some(format!(
                "No data files could be loaded. Place {} in {} or open another data folder.",
                self.expected_files(),
                self.data_dir.display()
            ));
            self.combined = None;
        } else {
            self.fatal = None;
            self.combined = Some(concat(report.tables.into_iter().map(|(_, t)| t)));
        }
        self.refilter();
    }

    /// Point the sources at another folder and reload.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        log::info!("Switching data folder to {}", dir.display());
        self.data_dir = dir;
        self.reload();
    }

    /// Recompute `visible` and `summary` after a control change.
    pub fn refilter(&mut self) {
        match &self.combined {
            Some(all) => {
                self.visible = filter_groups(all, &self.selected);
                self.summary = summarize(&self.visible);
            }
            None => {
                self.visible = Table::default();
                self.summary = Summary::Rows(Vec::new());
            }
        }
    }

    pub fn set_group_selected(&mut self, group: Group, selected: bool) {
        let changed = if selected {
            self.selected.insert(group)
        } else {
            self.selected.remove(&group)
        };
        if changed {
            self.refilter();
        }
    }

    pub fn select_all(&mut self) {
        self.selected = Group::ALL.into_iter().collect();
        self.refilter();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
        self.refilter();
    }

    /// Semantic fields available to the charts (e.g. for hover text).
    pub fn present_fields(&self) -> BTreeSet<SemanticField> {
        self.visible.present_fields()
    }

    /// Number of rows per group in the combined table.
    pub fn row_count(&self, group: Group) -> usize {
        self.combined
            .as_ref()
            .map(|t| t.records.iter().filter(|r| r.group == group).count())
            .unwrap_or(0)
    }

    /// Write the current statistics table as CSV.
    pub fn export_summary(&self, path: &Path) -> Result<()> {
        let Summary::Rows(rows) = &self.summary else {
            bail!("genome size and GC content columns are missing; nothing to export");
        };
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_summary_csv(rows, file).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} statistics rows to {}", rows.len(), path.display());
        Ok(())
    }

    fn expected_files(&self) -> String {
        self.config
            .sources
            .iter()
            .map(|s| s.file.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
