// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{ConfigError, InterfaceFamily};

/// Default file written by a generic build when no output is given.
pub const DEFAULT_GENERIC_OUTPUT: &str = "out.v";

/// User-chosen packaging parameters. Field names match the keys accepted in
/// the `[synthesis]` table of a configuration file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub if_type: InterfaceFamily,
    pub ext_addrwidth: u32,
    /// Must be a power of two; not checked.
    pub ext_burstlength: u32,
    pub single_clock: bool,
    pub sim_addrwidth: u32,
    pub hperiod_ulogic: u32,
    pub hperiod_bus: u32,
    /// Generic builds: the output file. Packaged builds: the directory that
    /// receives the package tree.
    pub output: Option<PathBuf>,
    pub memimg: Option<PathBuf>,
    pub usertest: Option<PathBuf>,
    pub skip_not_found: bool,
    pub ignore_protocol_error: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            if_type: InterfaceFamily::Axi,
            ext_addrwidth: 32,
            ext_burstlength: 256,
            single_clock: false,
            sim_addrwidth: 27,
            hperiod_ulogic: 5,
            hperiod_bus: 5,
            output: None,
            memimg: None,
            usertest: None,
            skip_not_found: false,
            ignore_protocol_error: false,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    synthesis: BuildConfig,
}

impl BuildConfig {
    /// Parses the TOML form of a configuration file. Keys omitted from the
    /// `[synthesis]` table keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<BuildConfig, ConfigError> {
        toml::from_str::<ConfigFile>(text)
            .map(|file| file.synthesis)
            .map_err(|e| ConfigError::File {
                path: PathBuf::new(),
                reason: e.to_string(),
            })
    }

    pub fn from_toml_file(path: &Path) -> Result<BuildConfig, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|e| match e {
            ConfigError::File { reason, .. } => ConfigError::File {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Checks global consistency. Called once, before any analysis or I/O.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.single_clock && self.hperiod_ulogic != self.hperiod_bus {
            return Err(ConfigError::ClockPeriodMismatch {
                ulogic: self.hperiod_ulogic,
                bus: self.hperiod_bus,
            });
        }
        Ok(())
    }

    /// Where a packaged build creates its package directory.
    pub fn package_root(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// The file a generic build writes.
    pub fn generic_output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GENERIC_OUTPUT))
    }

    /// Effective settings keyed by name, in sorted order.
    pub fn settings(&self) -> BTreeMap<&'static str, String> {
        fn opt(path: &Option<PathBuf>) -> String {
            path.as_ref()
                .map_or_else(|| "None".to_string(), |p| p.display().to_string())
        }
        BTreeMap::from([
            ("ext_addrwidth", self.ext_addrwidth.to_string()),
            ("ext_burstlength", self.ext_burstlength.to_string()),
            ("hperiod_bus", self.hperiod_bus.to_string()),
            ("hperiod_ulogic", self.hperiod_ulogic.to_string()),
            ("if_type", self.if_type.to_string()),
            ("ignore_protocol_error", self.ignore_protocol_error.to_string()),
            ("memimg", opt(&self.memimg)),
            ("output", opt(&self.output)),
            ("sim_addrwidth", self.sim_addrwidth.to_string()),
            ("single_clock", self.single_clock.to_string()),
            ("skip_not_found", self.skip_not_found.to_string()),
            ("usertest", opt(&self.usertest)),
        ])
    }
}
