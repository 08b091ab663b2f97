// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::find_in_parent;
use crate::load_config::resolve_config_path;
use crate::validation::{validate_precision, ValidTolerance};
use crate::yaml::load_yaml_with_env;
use anyhow::Context;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use rootfit_solver::{OverflowPolicy, ReconstructOptions, PIVOT_EPSILON};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "rootfit.config.yaml";
pub const ENV_PREFIX: &str = "ROOTFIT_";

/// How coefficients are printed
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `a0 = 1.00` lines
    #[default]
    Text,
    /// The whole reconstruction as JSON
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RootfitConfig {
    /// Decimal places for text output
    precision: usize,
    /// Absolute pivot tolerance for the solver
    tolerance: f64,
    overflow: OverflowPolicy,
    output: OutputFormat,
    /// Config file the values were read from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<PathBuf>,
}

impl Default for RootfitConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            tolerance: PIVOT_EPSILON,
            overflow: OverflowPolicy::default(),
            output: OutputFormat::default(),
            config_file: None,
        }
    }
}

impl RootfitConfig {
    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    pub fn reconstruct_options(&self) -> ReconstructOptions {
        ReconstructOptions {
            tolerance: self.tolerance,
            overflow: self.overflow,
        }
    }

    fn validate(self) -> Result<Self> {
        ValidTolerance::new(self.tolerance)?;
        validate_precision(self.precision)?;
        Ok(self)
    }
}

/// Values given on the command line; `None` leaves lower layers untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<OverflowPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFormat>,
}

#[derive(Serialize)]
struct FoundConfigFile {
    config_file: PathBuf,
}

/// Load the config, layering defaults, the YAML file, `ROOTFIT_*` env vars and CLI overrides.
///
/// A config file that was passed explicitly must exist; the default location
/// is optional.
pub fn load_config(cli_file: Option<String>, overrides: CliOverrides) -> Result<RootfitConfig> {
    let resolved = resolve_config_path(
        find_in_parent,        // finding strategy
        env::current_dir()?,   // cwd
        OsDirs::config_dir(),  // default config folder
        DEFAULT_CONFIG_NAME,   // hardcoded to rootfit.config.yaml
        cli_file.map(PathBuf::from),
    );

    let mut figment = Figment::from(Serialized::defaults(RootfitConfig::default()));

    if resolved.explicit || resolved.path.exists() {
        let loaded_yaml = load_yaml_with_env(&resolved.path).with_context(|| {
            format!("Could not load configuration file {}", resolved.path.display())
        })?;
        debug!(path = %resolved.path.display(), "loading configuration file");
        figment = figment
            .merge(Yaml::string(&loaded_yaml))
            .merge(Serialized::defaults(FoundConfigFile {
                config_file: resolved.path.clone(),
            }));
    }

    let config: RootfitConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).only(&["precision", "tolerance", "overflow", "output"]))
        .merge(Serialized::defaults(overrides))
        .extract()
        .context("Could not parse configuration")?;

    config.validate().context("Invalid configuration")
}

pub struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("rootfit"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
