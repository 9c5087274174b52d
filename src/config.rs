//! Pipeline configuration.
//!
//! Sources, highest priority first:
//! 1. Command-line flags
//! 2. The JSON config file (`uiuc-airfoils.json` unless `--config` says otherwise)
//! 3. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "uiuc-airfoils.json";

/// Directories, worker count and solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Raw coordinate files as downloaded.
    pub coordinate_dir: PathBuf,
    /// Canonical coordinate files written by `preprocess`.
    pub processed_dir: PathBuf,
    /// XFOIL polar files written by `analyze`.
    pub polar_dir: PathBuf,
    pub summary_path: PathBuf,
    pub names_path: PathBuf,
    /// Airfoils that failed preprocessing or polar parsing.
    pub problematic_path: PathBuf,
    /// Airfoils whose polar came back empty.
    pub not_converged_path: PathBuf,
    pub workers: usize,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub solver: SolverConfig,
}

/// Flow condition and XFOIL settings for `analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub executable: PathBuf,
    pub reynolds: f64,
    pub mach: f64,
    pub alpha_start: f64,
    pub alpha_end: f64,
    pub alpha_step: f64,
    pub iterations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coordinate_dir: PathBuf::from("coordinate_data"),
            processed_dir: PathBuf::from("processed_coordinates"),
            polar_dir: PathBuf::from("polar_data"),
            summary_path: PathBuf::from("summary/summary_all.csv"),
            names_path: PathBuf::from("names_list/airfoil_names.txt"),
            problematic_path: PathBuf::from("names_list/problematic_airfoil.txt"),
            not_converged_path: PathBuf::from("names_list/not_converged.txt"),
            workers: 1,
            log_level: "info".to_string(),
            solver: SolverConfig::default(),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("xfoil"),
            reynolds: 3.5e6,
            mach: 0.117,
            alpha_start: 0.0,
            alpha_end: 10.0,
            alpha_step: 0.5,
            iterations: 100,
        }
    }
}

impl Config {
    /// Load from `path`; with no explicit path a missing default file
    /// means built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load_from_file(default)
                } else {
                    debug!("no {DEFAULT_CONFIG_PATH}, using built-in defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Pretty JSON with every field, printed by the `config` subcommand.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{ "workers": 4, "solver": { "reynolds": 1e6 } }"#).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.solver.reynolds, 1e6);
        assert_eq!(config.solver.mach, 0.117);
        assert_eq!(config.polar_dir, PathBuf::from("polar_data"));
    }

    #[test]
    fn dump_round_trips() {
        let config = Config::default();
        let parsed: Config = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/cfg.json"))).is_err());
    }
}
