//! Reporter configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReportError, ReportResult};

/// Maximum width of exception messages before they are wrapped
pub const ENV_TRUNCATE_OUTPUT: &str = "STEPVIEW_TRUNCATE_OUTPUT";

/// Style overrides, e.g. `passed=green:failed=red,bold`
pub const ENV_COLORS: &str = "STEPVIEW_COLORS";

/// Any value disables colored output
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// Reporter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Root of the report output (results.json, results/, screenshots/)
    pub output_dir: PathBuf,

    /// Application public directory copied to results/public
    pub asset_root: Option<PathBuf>,

    /// Wrap exception messages at this many characters
    pub truncate_width: Option<usize>,

    /// Print snippets for undefined steps
    pub snippets: bool,

    /// Work-in-progress mode: passing scenarios are unexpected
    pub wip: bool,

    /// Print `# file:line` source comments
    pub source: bool,

    /// Buffer free-form messages until the step or table row ends
    pub buffer_messages: bool,

    /// Emit ANSI colors
    pub color: bool,

    /// Style overrides for the format table
    pub colors: Option<String>,

    /// Runner profiles repeated in rerun commands
    pub profiles: Vec<String>,

    /// Command used in the "Failing Scenarios" rerun lines
    pub rerun_command: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("stepview"),
            asset_root: None,
            truncate_width: None,
            snippets: true,
            wip: false,
            source: true,
            buffer_messages: false,
            color: true,
            colors: None,
            profiles: Vec::new(),
            rerun_command: "cucumber".to_string(),
        }
    }
}

impl ReporterConfig {
    /// Load configuration from file, falling back to defaults if absent
    pub fn load(path: &Path) -> ReportResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> ReportResult<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> ReportResult<()> {
        self.apply_vars(std::env::vars())
    }

    /// Apply overrides from `(name, value)` pairs
    pub fn apply_vars<I, K, V>(&mut self, vars: I) -> ReportResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_TRUNCATE_OUTPUT => {
                    let width = value.trim().parse::<usize>().map_err(|e| {
                        ReportError::Config(format!("{}={}: {}", ENV_TRUNCATE_OUTPUT, value, e))
                    })?;
                    self.truncate_width = Some(width).filter(|w| *w > 0);
                }
                ENV_COLORS => self.colors = Some(value.to_string()),
                ENV_NO_COLOR if !value.is_empty() => self.color = false,
                _ => {}
            }
        }
        Ok(())
    }
}
