// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{AnalysisError, IO};

/// Whether a parameter can be overridden from outside the module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParameterKind {
    Parameter,
    Localparam,
}

/// A `parameter` or `localparam` of the user module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    /// Literal value expression as written, e.g. `32` or `"hello"`.
    pub value: String,
    /// Complete rendered declaration, e.g. `parameter W = 32;`.
    pub declaration: String,
}

impl Parameter {
    /// Creates a parameter, rendering its declaration from the pieces.
    /// `datatype` is an optional type keyword such as `integer`.
    pub fn new(
        name: impl AsRef<str>,
        kind: ParameterKind,
        datatype: Option<&str>,
        value: impl AsRef<str>,
    ) -> Parameter {
        let keyword = match kind {
            ParameterKind::Parameter => "parameter",
            ParameterKind::Localparam => "localparam",
        };
        let declaration = match datatype {
            Some(dt) => format!("{keyword} {dt} {} = {};", name.as_ref(), value.as_ref()),
            None => format!("{keyword} {} = {};", name.as_ref(), value.as_ref()),
        };
        Parameter {
            name: name.as_ref().to_string(),
            kind,
            value: value.as_ref().to_string(),
            declaration,
        }
    }
}

/// Width expression of a vector port, `[msb:lsb]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Width {
    pub msb: String,
    pub lsb: String,
}

impl Width {
    pub fn new(msb: impl AsRef<str>, lsb: impl AsRef<str>) -> Width {
        Width {
            msb: msb.as_ref().trim().to_string(),
            lsb: lsb.as_ref().trim().to_string(),
        }
    }

    /// Verilog range text, e.g. `[W-1:0]`.
    pub fn to_range(&self) -> String {
        format!("[{}:{}]", self.msb, self.lsb)
    }
}

/// An I/O port of the user module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IoPort {
    pub name: String,
    /// Direction together with the resolved numeric width.
    pub io: IO,
    /// Width expression as written; `None` for scalar ports.
    pub width: Option<Width>,
    pub signed: bool,
}

impl IoPort {
    pub fn scalar(name: impl AsRef<str>, io: IO) -> IoPort {
        IoPort {
            name: name.as_ref().to_string(),
            io,
            width: None,
            signed: false,
        }
    }

    pub fn vector(name: impl AsRef<str>, io: IO, width: Width) -> IoPort {
        IoPort {
            name: name.as_ref().to_string(),
            io,
            width: Some(width),
            signed: false,
        }
    }
}

/// A memory-mapped bus resource discovered in the user logic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BusResource {
    pub name: String,
    pub datawidth: usize,
    pub lite: bool,
}

impl BusResource {
    pub fn new(name: impl AsRef<str>, datawidth: usize, lite: bool) -> BusResource {
        BusResource {
            name: name.as_ref().to_string(),
            datawidth,
            lite,
        }
    }
}

/// Master and slave resources of a module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Resources {
    pub masters: Vec<BusResource>,
    pub slaves: Vec<BusResource>,
}

/// Analyzed contract of the user module: parameters, I/O ports and bus
/// resources, all in declaration order. Built through
/// [`ModuleInterfaceBuilder`], which enforces name uniqueness; immutable
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModuleInterface {
    name: String,
    parameters: IndexMap<String, Parameter>,
    io_ports: IndexMap<String, IoPort>,
    resources: Resources,
}

impl ModuleInterface {
    pub fn builder(name: impl AsRef<str>) -> ModuleInterfaceBuilder {
        ModuleInterfaceBuilder {
            name: name.as_ref().to_string(),
            parameters: IndexMap::new(),
            io_ports: IndexMap::new(),
            resources: Resources::default(),
            resource_names: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &IndexMap<String, Parameter> {
        &self.parameters
    }

    pub fn io_ports(&self) -> &IndexMap<String, IoPort> {
        &self.io_ports
    }

    pub fn masters(&self) -> &[BusResource] {
        &self.resources.masters
    }

    pub fn slaves(&self) -> &[BusResource] {
        &self.resources.slaves
    }
}

pub struct ModuleInterfaceBuilder {
    name: String,
    parameters: IndexMap<String, Parameter>,
    io_ports: IndexMap<String, IoPort>,
    resources: Resources,
    resource_names: HashSet<String>,
}

impl ModuleInterfaceBuilder {
    fn duplicate(&self, kind: &'static str, name: &str) -> AnalysisError {
        AnalysisError::DuplicateName {
            module: self.name.clone(),
            kind,
            name: name.to_string(),
        }
    }

    pub fn parameter(mut self, parameter: Parameter) -> Result<Self, AnalysisError> {
        if self.parameters.contains_key(&parameter.name) {
            return Err(self.duplicate("parameter", &parameter.name));
        }
        self.parameters.insert(parameter.name.clone(), parameter);
        Ok(self)
    }

    pub fn port(mut self, port: IoPort) -> Result<Self, AnalysisError> {
        if self.io_ports.contains_key(&port.name) {
            return Err(self.duplicate("port", &port.name));
        }
        self.io_ports.insert(port.name.clone(), port);
        Ok(self)
    }

    pub fn master(mut self, resource: BusResource) -> Result<Self, AnalysisError> {
        if !self.resource_names.insert(resource.name.clone()) {
            return Err(self.duplicate("resource", &resource.name));
        }
        self.resources.masters.push(resource);
        Ok(self)
    }

    pub fn slave(mut self, resource: BusResource) -> Result<Self, AnalysisError> {
        if !self.resource_names.insert(resource.name.clone()) {
            return Err(self.duplicate("resource", &resource.name));
        }
        self.resources.slaves.push(resource);
        Ok(self)
    }

    pub fn build(self) -> ModuleInterface {
        ModuleInterface {
            name: self.name,
            parameters: self.parameters,
            io_ports: self.io_ports,
            resources: self.resources,
        }
    }
}
