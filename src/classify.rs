// SPDX-License-Identifier: Apache-2.0

//! Turns the parameters and ports of a [`ModuleInterface`] into render-ready
//! records for one interface family.
//!
//! Classification never fails: anything that is not recognisably a string
//! or an integer is treated as a bit vector.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::{InterfaceFamily, IoPort, ModuleInterface, Parameter, ParameterKind};

static LOCALPARAM_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\blocalparam\b").unwrap());
static INTEGER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\binteger\b").unwrap());
static PLAIN_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?[0-9][0-9_]*$").unwrap());
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?[A-Za-z_][A-Za-z0-9_$]*").unwrap());

/// Prefix added to exported conduit ports of an Avalon wrapper.
pub const AVALON_CONDUIT_PREFIX: &str = "coe_";

/// Packaging datatype inferred for a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DataType {
    String,
    Integer,
    BitVector,
}

impl DataType {
    /// Datatype keyword in the vocabulary of `family`.
    pub fn tag(&self, family: InterfaceFamily) -> &'static str {
        match (family, self) {
            (InterfaceFamily::Avalon, DataType::String) => "STRING",
            (InterfaceFamily::Avalon, DataType::Integer) => "INTEGER",
            (InterfaceFamily::Avalon, DataType::BitVector) => "STD_LOGIC_VECTOR",
            (_, DataType::String) => "string",
            (_, DataType::Integer) => "integer",
            (_, DataType::BitVector) => "std_logic_vector",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifiedParameter {
    pub name: String,
    /// Default value, the literal text of the declaration.
    pub value: String,
    pub datatype: DataType,
    /// Datatype keyword for the target family.
    pub datatype_tag: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifiedPort {
    pub name: String,
    /// Direction tag for the target family (`I`/`O`/`IO` or
    /// `Input`/`Output`/`Inout`).
    pub direction: &'static str,
    /// Direction tag for IP-XACT port entries.
    pub ipxact_direction: &'static str,
    /// Resolved width in bits.
    pub width: usize,
    /// Resolved most-significant-bit index; `None` for scalar ports.
    pub msb: Option<usize>,
    /// Range text as written, e.g. `[W-1:0]`; empty for scalar ports.
    pub range: String,
    /// msb expression with every parameter reference rewritten to the
    /// IP-XACT parameter accessor. Only set when the expression refers to a
    /// parameter.
    pub msb_dependency: Option<String>,
}

/// Everything the templates need about the user module's interface, split
/// into the buckets the wrapper and descriptor documents use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// Externally configurable parameters, in declaration order.
    pub parameters: Vec<ClassifiedParameter>,
    pub ports: Vec<ClassifiedPort>,
    /// Parameter-list entries for the wrapper header (`parameter W = 32,`).
    pub def_parameters: Vec<String>,
    /// Configurable parameters redeclared as test-bench localparams
    /// (`localparam W = 32;`).
    pub def_bench_parameters: Vec<String>,
    /// Localparam declarations, verbatim.
    pub def_localparams: Vec<String>,
    /// Port declarations for the wrapper header.
    pub def_ioports: Vec<String>,
    /// Wire declarations for the test bench.
    pub def_wires: Vec<String>,
    /// Port names in declaration order.
    pub ioport_names: Vec<String>,
    /// Configurable parameter names in declaration order.
    pub parameter_names: Vec<String>,
}

/// Classifies parameters and ports for one interface family.
#[derive(Clone, Copy, Debug)]
pub struct Classifier {
    family: InterfaceFamily,
}

impl Classifier {
    pub fn new(family: InterfaceFamily) -> Classifier {
        Classifier { family }
    }

    pub fn family(&self) -> InterfaceFamily {
        self.family
    }

    /// Returns `true` if the parameter belongs in the localparam bucket.
    pub fn is_localparam(&self, parameter: &Parameter) -> bool {
        parameter.kind == ParameterKind::Localparam
            || LOCALPARAM_KEYWORD.is_match(&parameter.declaration)
    }

    pub fn datatype(&self, parameter: &Parameter) -> DataType {
        if parameter.value.contains('"') {
            DataType::String
        } else if PLAIN_INTEGER.is_match(parameter.value.trim())
            || INTEGER_KEYWORD.is_match(&parameter.declaration)
        {
            DataType::Integer
        } else {
            DataType::BitVector
        }
    }

    pub fn classify_parameter(&self, parameter: &Parameter) -> ClassifiedParameter {
        let datatype = self.datatype(parameter);
        ClassifiedParameter {
            name: parameter.name.clone(),
            value: parameter.value.clone(),
            datatype,
            datatype_tag: datatype.tag(self.family),
        }
    }

    /// Classifies a port. `parameters` is consulted to decide which
    /// identifiers of the width expression are parameter references.
    pub fn classify_port(
        &self,
        port: &IoPort,
        parameters: &IndexMap<String, Parameter>,
    ) -> ClassifiedPort {
        let direction = match self.family {
            InterfaceFamily::Axi => port.io.to_mpd_direction(),
            InterfaceFamily::Avalon => port.io.to_qsys_direction(),
            InterfaceFamily::Generic => port.io.to_verilog_direction(),
        };
        let width = port.io.width();
        let (msb, range, msb_dependency) = match &port.width {
            None => (None, String::new(), None),
            Some(w) => (
                Some(width.saturating_sub(1)),
                w.to_range(),
                ipxact_dependency(&w.msb, parameters),
            ),
        };
        ClassifiedPort {
            name: port.name.clone(),
            direction,
            ipxact_direction: port.io.to_ipxact_direction(),
            width,
            msb,
            range,
            msb_dependency,
        }
    }

    /// Port declaration as it appears in the wrapper header.
    pub fn port_declaration(&self, port: &IoPort) -> String {
        let name = match self.family {
            InterfaceFamily::Avalon => format!("{AVALON_CONDUIT_PREFIX}{}", port.name),
            _ => port.name.clone(),
        };
        let mut decl = format!("{} wire", port.io.to_verilog_direction());
        if port.signed {
            decl.push_str(" signed");
        }
        if let Some(width) = &port.width {
            decl.push(' ');
            decl.push_str(&width.to_range());
        }
        decl.push(' ');
        decl.push_str(&name);
        decl
    }

    /// Wire declaration for the test bench.
    pub fn wire_declaration(&self, port: &IoPort) -> String {
        let mut decl = String::from("wire");
        if port.signed {
            decl.push_str(" signed");
        }
        if let Some(width) = &port.width {
            decl.push(' ');
            decl.push_str(&width.to_range());
        }
        format!("{decl} {};", port.name)
    }

    /// Test-bench declaration of a configurable parameter. Only the leading
    /// keyword changes; the datatype and the value are kept as written.
    pub fn bench_declaration(&self, parameter: &Parameter) -> String {
        let decl = parameter
            .declaration
            .trim()
            .trim_end_matches([';', ','])
            .trim_end();
        let rest = decl
            .strip_prefix("parameter")
            .filter(|rest| rest.starts_with(|c: char| c.is_whitespace() || c == '['));
        match rest {
            Some(rest) => format!("localparam{rest};"),
            None => format!("localparam {} = {};", parameter.name, parameter.value),
        }
    }

    pub fn classify(&self, intf: &ModuleInterface) -> Classification {
        let mut result = Classification::default();

        for parameter in intf.parameters().values() {
            if self.is_localparam(parameter) {
                result.def_localparams.push(parameter.declaration.clone());
            } else {
                result
                    .def_parameters
                    .push(parameter.declaration.replace(';', ","));
                result
                    .def_bench_parameters
                    .push(self.bench_declaration(parameter));
                result.parameters.push(self.classify_parameter(parameter));
                result.parameter_names.push(parameter.name.clone());
            }
        }

        for port in intf.io_ports().values() {
            result
                .ports
                .push(self.classify_port(port, intf.parameters()));
            result.def_ioports.push(self.port_declaration(port));
            result.def_wires.push(self.wire_declaration(port));
            result.ioport_names.push(port.name.clone());
        }

        result
    }
}

/// Rewrites parameter references in `msb` to the IP-XACT accessor so the
/// packaging tool can re-evaluate the width at integration time.
fn ipxact_dependency(msb: &str, parameters: &IndexMap<String, Parameter>) -> Option<String> {
    let mut referenced = false;
    let replaced = IDENTIFIER.replace_all(msb, |caps: &Captures| {
        let ident = &caps[0];
        if parameters.contains_key(ident) {
            referenced = true;
            format!("(spirit:decode(id('MODELPARAM_VALUE.{ident}')))")
        } else {
            ident.to_string()
        }
    });
    let replaced = replaced.into_owned();
    referenced.then_some(replaced)
}
