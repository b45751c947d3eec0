//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/budget-tree/budget-tree.toml`
//! 3. Local config: `./budget-tree.toml`, or the file given with `-C`
//! 4. Environment variables: `BUDGET_TREE_*` prefix, `__` between section and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Layout, RootMode, DEFAULT_MIN_LEVELS};

const APP_NAME: &str = "budget-tree";
const CONFIG_FILE: &str = "budget-tree.toml";
const ENV_PREFIX: &str = "BUDGET_TREE";

/// Spreadsheet layout: where titles start and where amounts live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutSettings {
    /// First scanned column, 0-based (1 is column B)
    pub start_column: usize,
    /// Amount column, 0-based (10 is column K)
    pub amount_column: usize,
    /// Longest text treated as a bullet marker
    pub bullet_max_len: usize,
    /// Worksheet to read (default: first sheet)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let layout = Layout::default();
        Self {
            start_column: layout.start_column,
            amount_column: layout.amount_column,
            bullet_max_len: layout.bullet_max_len,
            sheet: None,
        }
    }
}

impl LayoutSettings {
    pub fn layout(&self) -> Layout {
        Layout {
            start_column: self.start_column,
            amount_column: self.amount_column,
            bullet_max_len: self.bullet_max_len,
        }
    }
}

/// Tree assembly options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeSettings {
    pub root_mode: RootMode,
}

/// Rendering and output placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Minimum number of `level_i` columns in flat tables
    pub min_levels: usize,
    /// Rows shown in the markdown sample table
    pub sample_rows: usize,
    pub currency_symbol: String,
    /// Directory for `run` outputs (default: next to the workbook)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            min_levels: DEFAULT_MIN_LEVELS,
            sample_rows: 20,
            currency_symbol: "₱".to_string(),
            out_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub start_column: Option<usize>,
    pub amount_column: Option<usize>,
    pub bullet_max_len: Option<usize>,
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTreeSettings {
    pub root_mode: Option<RootMode>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputSettings {
    pub min_levels: Option<usize>,
    pub sample_rows: Option<usize>,
    pub currency_symbol: Option<String>,
    pub out_dir: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
///
/// `None` means "not specified in this file", so lower layers show through.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutSettings,
    pub tree: RawTreeSettings,
    pub output: RawOutputSettings,
}

/// Unified configuration for budget-tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub tree: TreeSettings,
    pub output: OutputSettings,
}

/// Get the XDG config directory for budget-tree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Get the path of the local config file in the working directory.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Layout used by the hierarchy builder.
    pub fn layout(&self) -> Layout {
        self.layout.layout()
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = self.output.out_dir.as_deref() {
            self.output.out_dir = Some(expand_path(dir));
        }
    }

    /// Merge overlay config onto self (base); specified values win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let layout = &overlay.layout;
        let output = &overlay.output;
        Self {
            layout: LayoutSettings {
                start_column: layout.start_column.unwrap_or(self.layout.start_column),
                amount_column: layout.amount_column.unwrap_or(self.layout.amount_column),
                bullet_max_len: layout.bullet_max_len.unwrap_or(self.layout.bullet_max_len),
                sheet: layout.sheet.clone().or_else(|| self.layout.sheet.clone()),
            },
            tree: TreeSettings {
                root_mode: overlay.tree.root_mode.unwrap_or(self.tree.root_mode),
            },
            output: OutputSettings {
                min_levels: output.min_levels.unwrap_or(self.output.min_levels),
                sample_rows: output.sample_rows.unwrap_or(self.output.sample_rows),
                currency_symbol: output
                    .currency_symbol
                    .clone()
                    .unwrap_or_else(|| self.output.currency_symbol.clone()),
                out_dir: output.out_dir.clone().or_else(|| self.output.out_dir.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file (`-C`); must exist when given.
    ///   Without it, `./budget-tree.toml` is used if present.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        match local {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                Self::load_from(global.as_deref(), Some(path))
            }
            None => {
                let default_local = local_config_path();
                Self::load_from(global.as_deref(), Some(default_local.as_path()))
            }
        }
    }

    /// Load from explicit global and local files; missing files are skipped.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        for path in [global, local].into_iter().flatten() {
            if path.exists() {
                debug!("loading config: {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply BUDGET_TREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = get_usize(&config, "layout.start_column")? {
            settings.layout.start_column = val;
        }
        if let Some(val) = get_usize(&config, "layout.amount_column")? {
            settings.layout.amount_column = val;
        }
        if let Some(val) = get_usize(&config, "layout.bullet_max_len")? {
            settings.layout.bullet_max_len = val;
        }
        if let Ok(val) = config.get_string("layout.sheet") {
            settings.layout.sheet = Some(val);
        }
        if let Ok(val) = config.get_string("tree.root_mode") {
            settings.tree.root_mode = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("{ENV_PREFIX}_TREE__ROOT_MODE: {e}"),
            })?;
        }
        if let Some(val) = get_usize(&config, "output.min_levels")? {
            settings.output.min_levels = val;
        }
        if let Some(val) = get_usize(&config, "output.sample_rows")? {
            settings.output.sample_rows = val;
        }
        if let Ok(val) = config.get_string("output.currency_symbol") {
            settings.output.currency_symbol = val;
        }
        if let Ok(val) = config.get_string("output.out_dir") {
            settings.output.out_dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# budget-tree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/budget-tree/budget-tree.toml
#   Local:  ./budget-tree.toml (or -C <path>)
#   Env:    BUDGET_TREE_<SECTION>__<KEY>, e.g. BUDGET_TREE_LAYOUT__AMOUNT_COLUMN=10

[layout]
# First column scanned for titles, 0-based (1 = column B)
# start_column = 1

# Column holding amounts, 0-based (10 = column K)
# amount_column = 10

# Longest cell text recognized as a bullet marker ("a.", "12.", "1.0")
# bullet_max_len = 4

# Worksheet to read; the first sheet when unset
# sheet = "DPWH"

[tree]
# "synthetic": always wrap top-level rows in a "." root
# "auto": a single top-level row becomes the root
# root_mode = "synthetic"

[output]
# Minimum number of level_N columns in flat tables
# min_levels = 9

# Rows shown in the markdown sample
# sample_rows = 20

# currency_symbol = "₱"

# Directory for `run` outputs; next to the workbook when unset
# out_dir = "~/budgets/out"
"#
        .to_string()
    }
}

/// Integer env override; present but unparsable values are an error.
fn get_usize(config: &Config, key: &str) -> Result<Option<usize>, ApplicationError> {
    match config.get_string(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ApplicationError::Config {
                message: format!("{key} = {raw:?}: {e}"),
            }),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_match_the_standard_layout() {
        let settings = Settings::default();
        assert_eq!(settings.layout(), Layout::default());
        assert_eq!(settings.tree.root_mode, RootMode::Synthetic);
        assert_eq!(settings.output.min_levels, 9);
        assert_eq!(settings.output.currency_symbol, "₱");
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_values_are_kept() {
        let base = Settings::default();
        let overlay: RawSettings = toml::from_str(
            r#"
[layout]
amount_column = 12
sheet = "DPWH"

[tree]
root_mode = "auto"
"#,
        )
        .unwrap();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.layout.amount_column, 12);
        assert_eq!(merged.layout.start_column, 1);
        assert_eq!(merged.layout.sheet.as_deref(), Some("DPWH"));
        assert_eq!(merged.tree.root_mode, RootMode::Auto);
        assert_eq!(merged.output, OutputSettings::default());
    }

    #[test]
    fn given_tilde_in_out_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings::default();
        settings.output.out_dir = Some(PathBuf::from("~/budgets"));

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let out_dir = settings.output.out_dir.unwrap();
        assert!(out_dir.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.layout.amount_column.is_none());
    }
}
