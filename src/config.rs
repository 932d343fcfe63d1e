use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::SecondEigCli;
use crate::core::eigen::SolverOptions;
use crate::core::error::EigError;
use crate::core::matrix_reader::ReaderOptions;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputOptions {
    /// Fixed fractional digits; `None` prints the shortest round-trip form.
    pub precision: Option<usize>,
}

/// Everything a run needs: the config file merged with CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub input: ReaderOptions,
    pub solver: SolverOptions,
    pub output: OutputOptions,
    #[serde(skip)]
    pub debug: bool,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, EigError> {
        toml::from_str(text).map_err(|e| EigError::Config(e.to_string()))
    }

    /// CLI flags win over the file; `SECOND_EIG_DEBUG=1` counts as `--debug`.
    pub fn apply_cli(&mut self, args: &SecondEigCli) {
        if args.precision.is_some() {
            self.output.precision = args.precision;
        }
        self.debug = args.debug || std::env::var("SECOND_EIG_DEBUG").ok().as_deref() == Some("1");
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    // ~/.second_eig/config.toml
    dirs_next::home_dir().map(|h| h.join(".second_eig").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

/// An explicit `--config` must exist; the default location is optional.
pub fn load_settings(cli_path: &Option<PathBuf>) -> Result<Settings> {
    match resolve_config_path(cli_path) {
        Some(path) if cli_path.is_some() || path.is_file() => read_settings(&path),
        _ => Ok(Settings::default()),
    }
}

pub fn read_settings(path: &Path) -> Result<Settings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Read config {}", path.display()))?;
    Settings::from_toml_str(&text).with_context(|| format!("Parse config {}", path.display()))
}
