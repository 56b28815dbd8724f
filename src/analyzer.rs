// SPDX-License-Identifier: Apache-2.0

//! Structural analysis of the user's HDL.
//!
//! The packaging pipeline only depends on the [`Analyzer`] trait. The crate
//! ships [`VerilogAnalyzer`], a lightweight analyzer for Verilog-2001
//! sources that understands module headers, parameter declarations and
//! instantiations, which is all packaging needs.

use std::path::{Path, PathBuf};

use crate::{ModuleInterface, Result};

mod expr;
mod preprocess;
mod verilog;
pub use verilog::VerilogAnalyzer;

/// One unit of HDL input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    /// In-memory source; `name` is only used in diagnostics.
    Text { name: String, text: String },
}

/// What to analyze: the sources and the name of the top module within them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub sources: Vec<Source>,
    pub top: String,
}

impl AnalysisRequest {
    pub fn from_files<P: AsRef<Path>>(top: impl AsRef<str>, files: &[P]) -> AnalysisRequest {
        AnalysisRequest {
            sources: files
                .iter()
                .map(|f| Source::File(f.as_ref().to_path_buf()))
                .collect(),
            top: top.as_ref().to_string(),
        }
    }

    /// Request over a single in-memory Verilog source.
    pub fn from_verilog(top: impl AsRef<str>, verilog: impl AsRef<str>) -> AnalysisRequest {
        AnalysisRequest {
            sources: vec![Source::Text {
                name: "<memory>".to_string(),
                text: verilog.as_ref().to_string(),
            }],
            top: top.as_ref().to_string(),
        }
    }
}

/// Result of analyzing the user's design.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub interface: ModuleInterface,
    /// Re-rendered HDL of the user logic, including every sub-module
    /// reachable from the top.
    pub hdl: String,
    /// Instantiated modules for which no definition was found, in
    /// first-seen order.
    pub not_found: Vec<String>,
}

/// Extracts a [`ModuleInterface`] and re-rendered HDL from user sources.
pub trait Analyzer {
    fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis>;
}

/// Preprocessor settings for [`VerilogAnalyzer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Directories searched by `` `include ``, after the directory of the
    /// including file.
    pub incdirs: Vec<PathBuf>,
    /// Macros defined before the first source is read, as `(name, value)`.
    pub defines: Vec<(String, String)>,
}
