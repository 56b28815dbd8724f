// SPDX-License-Identifier: Apache-2.0

//! Packages a user hardware module as an IP core.
//!
//! A build analyzes the user's Verilog, classifies the parameters and ports
//! of the top module and renders a wrapper, test scaffolding and the
//! metadata of one interface family (plain Verilog, AXI or Avalon) into a
//! fixed directory layout. [`build`] is the entry point.

mod analyzer;
mod assemble;
mod classify;
mod config;
mod error;
mod family;
mod interface;
mod io;
mod orchestrator;
pub mod profile;
pub mod render;
pub mod util;

pub use analyzer::{
    Analysis, AnalysisRequest, Analyzer, AnalyzerConfig, Source, VerilogAnalyzer,
};
pub use assemble::{assemble, materialize};
pub use classify::{
    Classification, ClassifiedParameter, ClassifiedPort, Classifier, DataType,
    AVALON_CONDUIT_PREFIX,
};
pub use config::{BuildConfig, DEFAULT_GENERIC_OUTPUT};
pub use error::{AnalysisError, ConfigError, IpgenError, Result, TemplateError};
pub use family::InterfaceFamily;
pub use interface::{
    BusResource, IoPort, ModuleInterface, ModuleInterfaceBuilder, Parameter, ParameterKind,
    Resources, Width,
};
pub use io::IO;
pub use orchestrator::{build, BuildState};
pub use profile::{profile_for, Artifact, ArtifactSet, Content, Design, Profile};
pub use render::{
    Boilerplate, BuiltinTemplates, DirTemplates, MemoryRegion, RenderContext, Renderer,
    TemplateName, TemplateSource,
};
