// SPDX-License-Identifier: Apache-2.0

//! Error types for the packaging pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Problems with the user's build configuration. These are always detected
/// before the analyzer runs and before anything is written.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "All clock periods should be same in single clock mode \
         (user logic half period {ulogic}, bus half period {bus})."
    )]
    ClockPeriodMismatch { ulogic: u32, bus: u32 },

    #[error("Interface type '{0}' is not supported.")]
    UnsupportedFamily(String),

    #[error("Could not read configuration file {path:?}: {reason}")]
    File { path: PathBuf, reason: String },
}

/// Failures reported by the structural analyzer.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Module definition '{0}' not found in Verilog sources.")]
    TopNotFound(String),

    #[error("Module(s) instantiated but not defined: {}", .0.join(", "))]
    ModulesNotFound(Vec<String>),

    #[error("Duplicate {kind} name '{name}' in module {module}.")]
    DuplicateName {
        module: String,
        kind: &'static str,
        name: String,
    },

    #[error("Malformed Verilog in module {module}: {reason}")]
    Syntax { module: String, reason: String },

    #[error("Preprocessing {file}: {reason}")]
    Preprocess { file: String, reason: String },
}

/// Failures while looking up or rendering a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template '{0}' not found.")]
    NotFound(String),

    #[error(transparent)]
    Tera(#[from] tera::Error),
}

/// Top-level error returned by [`crate::build`] and the assembler.
#[derive(Error, Debug)]
pub enum IpgenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IpgenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IpgenError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IpgenError>;
