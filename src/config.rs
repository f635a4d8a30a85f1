use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::SourceSpec;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "gc-explorer.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Everything the dashboard reads at startup. Every key is optional in the
/// JSON file; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Folder the source files are resolved against.
    pub data_dir: PathBuf,
    /// One file per group, loaded (and concatenated) in this order.
    pub sources: Vec<SourceSpec>,
    pub histogram_bins: usize,
    /// Bar opacity in the overlaid histogram, 0.0–1.0.
    pub histogram_opacity: f32,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            sources: SourceSpec::defaults(),
            histogram_bins: 50,
            histogram_opacity: 0.6,
            window_size: [1280.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if it exists; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading {}", path.display()))
    }

    /// [`DashboardConfig::load`], falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for source in &self.sources {
            if !seen.insert(source.group) {
                bail!("group '{}' is listed more than once in sources", source.group);
            }
        }
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.histogram_opacity) {
            bail!("histogram_opacity must be between 0 and 1");
        }
        Ok(())
    }
}
