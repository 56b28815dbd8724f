// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::LazyLock;

use indexmap::IndexMap;
use itertools::Itertools;
use regex::Regex;

use super::expr::evaluate;
use super::preprocess::Preprocessor;
use super::{Analysis, AnalysisRequest, Analyzer, AnalyzerConfig, Source};
use crate::{
    AnalysisError, BusResource, IO, IoPort, ModuleInterface, Parameter, ParameterKind, Result,
    Width,
};

static MODULE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:module|macromodule)\s+([A-Za-z_][A-Za-z0-9_$]*)").unwrap()
});
static MODULE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bendmodule\b").unwrap());
static PARAM_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^(?:(parameter|localparam)\s+)?((?:(?:signed|unsigned)\s+)?(?:(?:integer|real|realtime|time)\s+|\[[^\]]*\]\s*)?)([A-Za-z_][A-Za-z0-9_$]*)\s*=\s*(.+)$",
    )
    .unwrap()
});
static BODY_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^(parameter|localparam)\s+((?:(?:signed|unsigned)\s+)?(?:(?:integer|real|realtime|time)\s+|\[[^\]]*\]\s*)?)(.*)$",
    )
    .unwrap()
});
static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_$]*)\s*=\s*(.+)$").unwrap());
static PORT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^(?:(input|output|inout)\s+)?(?:(?:wire|reg|logic|tri|var|integer)\s+)?(signed\s+)?(\[[^\]]*\])?\s*(.*)$",
    )
    .unwrap()
});
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").unwrap());

const DEFAULT_RESOURCE_DATAWIDTH: usize = 32;

/// Words that can never name an instantiated module.
const KEYWORDS: &[&str] = &[
    "always", "assign", "automatic", "begin", "case", "casex", "casez", "deassign", "default",
    "disable", "else", "end", "endcase", "endfunction", "endgenerate", "endtask", "event", "for",
    "force", "forever", "fork", "function", "generate", "genvar", "if", "initial", "inout",
    "input", "integer", "join", "localparam", "logic", "module", "negedge", "output",
    "parameter", "posedge", "real", "reg", "release", "repeat", "return", "signed", "supply0",
    "supply1", "task", "time", "tri", "unsigned", "wait", "while", "wire",
];

/// Words that may directly precede a module instantiation.
const BLOCK_KEYWORDS: &[&str] = &[
    "begin",
    "end",
    "else",
    "generate",
    "endgenerate",
    "endcase",
    "endfunction",
    "endtask",
];

const GATE_PRIMITIVES: &[&str] = &[
    "and", "nand", "or", "nor", "xor", "xnor", "buf", "not", "bufif0", "bufif1", "notif0",
    "notif1", "pullup", "pulldown", "nmos", "pmos", "cmos", "rnmos", "rpmos", "rcmos", "tran",
    "rtran", "tranif0", "tranif1", "rtranif0", "rtranif1",
];

/// Module names that mark memory-mapped bus resources in the user logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResourceCell {
    Master,
    MasterLite,
    Slave,
    SlaveLite,
}

impl ResourceCell {
    fn from_module_name(name: &str) -> Option<ResourceCell> {
        match name {
            "ipgen_master_memory" => Some(ResourceCell::Master),
            "ipgen_master_lite_memory" => Some(ResourceCell::MasterLite),
            "ipgen_slave_memory" => Some(ResourceCell::Slave),
            "ipgen_slave_lite_memory" => Some(ResourceCell::SlaveLite),
            _ => None,
        }
    }

    fn is_master(&self) -> bool {
        matches!(self, ResourceCell::Master | ResourceCell::MasterLite)
    }

    fn is_lite(&self) -> bool {
        matches!(self, ResourceCell::MasterLite | ResourceCell::SlaveLite)
    }
}

#[derive(Clone, Debug)]
struct Instance {
    module: String,
    name: String,
    overrides: Option<String>,
}

/// One `module ... endmodule` definition found in the sources.
#[derive(Clone, Debug)]
struct ModuleSource {
    name: String,
    /// Full text from `module` through `endmodule`.
    text: String,
    /// Offset in `text` of the first character after the header's `;`.
    body_start: usize,
    /// Offset in `text` of `endmodule`.
    body_end: usize,
}

impl ModuleSource {
    fn body(&self) -> &str {
        &self.text[self.body_start..self.body_end]
    }
}

/// Parsed header of a module: parameters and ports in declaration order.
#[derive(Debug, Default)]
struct Header {
    parameters: Vec<Parameter>,
    port_list: Vec<String>,
    ansi: bool,
}

#[derive(Clone, Debug)]
struct PortDecl {
    name: String,
    direction: String,
    signed: bool,
    range: Option<(String, String)>,
}

/// Regex-driven analyzer for Verilog-2001 sources.
///
/// It reads module headers (ANSI and non-ANSI port styles), parameter and
/// localparam declarations, and module instantiations. Bodies are otherwise
/// treated as opaque text and copied through unchanged, minus comments.
#[derive(Clone, Debug, Default)]
pub struct VerilogAnalyzer {
    config: AnalyzerConfig,
}

impl VerilogAnalyzer {
    pub fn new(config: AnalyzerConfig) -> VerilogAnalyzer {
        VerilogAnalyzer { config }
    }

    fn load(&self, request: &AnalysisRequest) -> Result<Vec<ModuleSource>> {
        let mut pp = Preprocessor::new(&self.config);
        let mut modules = Vec::new();
        for source in &request.sources {
            let text = match source {
                Source::File(path) => pp.run_file(path)?,
                Source::Text { name, text } => pp.run_text(name, text)?,
            };
            modules.extend(split_modules(&text)?);
        }
        Ok(modules)
    }
}

impl Analyzer for VerilogAnalyzer {
    fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis> {
        let modules = self.load(request)?;

        let mut by_name: IndexMap<&str, &ModuleSource> = IndexMap::new();
        for module in &modules {
            if by_name.contains_key(module.name.as_str()) {
                log::warn!(
                    "Module {} is defined more than once; using the first definition",
                    module.name
                );
            } else {
                by_name.insert(&module.name, module);
            }
        }

        let top = *by_name
            .get(request.top.as_str())
            .ok_or_else(|| AnalysisError::TopNotFound(request.top.clone()))?;

        log::debug!("Analyzing top module {}", top.name);
        let header = parse_header(top)?;
        let mut builder = ModuleInterface::builder(&top.name);
        let mut env: HashMap<String, i64> = HashMap::new();

        let mut parameters = header.parameters;
        parameters.extend(parse_body_parameters(top.body()));
        for parameter in &parameters {
            if let Some(value) = evaluate(&parameter.value, &env) {
                env.insert(parameter.name.clone(), value);
            }
        }
        for parameter in parameters {
            builder = builder.parameter(parameter)?;
        }

        for decl in port_declarations(top, &header.port_list, header.ansi)? {
            builder = builder.port(decl.into_port(&top.name, &env))?;
        }

        let mut not_found: Vec<String> = Vec::new();
        let mut reachable: HashSet<&str> = HashSet::from([top.name.as_str()]);
        let mut queue: VecDeque<&ModuleSource> = VecDeque::from([top]);
        while let Some(module) = queue.pop_front() {
            let module_env = if module.name == top.name {
                env.clone()
            } else {
                parameter_env(module)
            };
            for inst in instances(module.body()) {
                if let Some(cell) = ResourceCell::from_module_name(&inst.module) {
                    let datawidth = resource_datawidth(&inst, &module_env);
                    log::debug!(
                        "Found {} resource {} ({datawidth} bits) in {}",
                        if cell.is_master() { "master" } else { "slave" },
                        inst.name,
                        module.name
                    );
                    let resource = BusResource::new(&inst.name, datawidth, cell.is_lite());
                    builder = if cell.is_master() {
                        builder.master(resource)?
                    } else {
                        builder.slave(resource)?
                    };
                } else if let Some(sub) = by_name.get(inst.module.as_str()) {
                    if reachable.insert(sub.name.as_str()) {
                        queue.push_back(*sub);
                    }
                } else if !GATE_PRIMITIVES.contains(&inst.module.as_str())
                    && !not_found.contains(&inst.module)
                {
                    not_found.push(inst.module.clone());
                }
            }
        }

        let hdl = modules
            .iter()
            .filter(|m| {
                reachable.contains(m.name.as_str())
                    && by_name
                        .get(m.name.as_str())
                        .is_some_and(|first| std::ptr::eq(*first, *m))
            })
            .map(|m| m.text.as_str())
            .join("\n\n");

        Ok(Analysis {
            interface: builder.build(),
            hdl: format!("{hdl}\n"),
            not_found,
        })
    }
}

impl PortDecl {
    fn into_port(self, module: &str, env: &HashMap<String, i64>) -> IoPort {
        let io = match self.direction.as_str() {
            "input" => IO::Input(1),
            "output" => IO::Output(1),
            _ => IO::InOut(1),
        };
        let mut port = match self.range {
            None => IoPort::scalar(&self.name, io),
            Some((msb, lsb)) => {
                let width = match (evaluate(&msb, env), evaluate(&lsb, env)) {
                    (Some(m), Some(l)) => usize::try_from(m.abs_diff(l) + 1).unwrap_or(1),
                    _ => {
                        log::warn!(
                            "Cannot resolve width [{msb}:{lsb}] of port {} in module {module}; \
                             assuming 1 bit",
                            self.name
                        );
                        1
                    }
                };
                IoPort::vector(&self.name, io.with_width(width), Width::new(msb, lsb))
            }
        };
        port.signed = self.signed;
        port
    }
}

/// Splits preprocessed text into module definitions.
fn split_modules(text: &str) -> Result<Vec<ModuleSource>> {
    let mut modules = Vec::new();
    let mut pos = 0;
    while let Some(caps) = MODULE_START.captures_at(text, pos) {
        let whole = caps.get(0).map_or(pos..pos, |m| m.range());
        let name = caps[1].to_string();
        let end = MODULE_END
            .find_at(text, whole.end)
            .ok_or_else(|| AnalysisError::Syntax {
                module: name.clone(),
                reason: "missing endmodule".to_string(),
            })?;
        let module_text = &text[whole.start..end.end()];
        let header_end = header_end(module_text, whole.end - whole.start).ok_or_else(|| {
            AnalysisError::Syntax {
                module: name.clone(),
                reason: "malformed module header".to_string(),
            }
        })?;
        modules.push(ModuleSource {
            name,
            text: module_text.to_string(),
            body_start: header_end,
            body_end: end.start() - whole.start,
        });
        pos = end.end();
    }
    Ok(modules)
}

/// Returns the offset just past the `;` that closes the module header.
fn header_end(text: &str, after_name: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = skip_ws(bytes, after_name);
    if bytes.get(i) == Some(&b'#') {
        i = skip_ws(bytes, i + 1);
        i = skip_ws(bytes, matching_close(bytes, i)? + 1);
    }
    if bytes.get(i) == Some(&b'(') {
        i = skip_ws(bytes, matching_close(bytes, i)? + 1);
    }
    (bytes.get(i) == Some(&b';')).then_some(i + 1)
}

fn parse_header(module: &ModuleSource) -> Result<Header> {
    let syntax = |reason: &str| AnalysisError::Syntax {
        module: module.name.clone(),
        reason: reason.to_string(),
    };
    let bytes = module.text.as_bytes();
    let name_end = MODULE_START
        .find(&module.text)
        .map_or(0, |m| m.end());
    let mut header = Header::default();

    let mut i = skip_ws(bytes, name_end);
    if bytes.get(i) == Some(&b'#') {
        let open = skip_ws(bytes, i + 1);
        let close = matching_close(bytes, open).ok_or_else(|| syntax("unbalanced parameter list"))?;
        header.parameters = parse_parameter_list(&module.text[open + 1..close])
            .map_err(|item| syntax(&format!("cannot parse parameter '{item}'")))?;
        i = skip_ws(bytes, close + 1);
    }
    if bytes.get(i) == Some(&b'(') {
        let close = matching_close(bytes, i).ok_or_else(|| syntax("unbalanced port list"))?;
        let ports = &module.text[i + 1..close];
        header.ansi = split_top_level(ports, b',')
            .first()
            .and_then(|first| PORT_DECL.captures(first.trim()))
            .is_some_and(|caps| caps.get(1).is_some());
        header.port_list = split_top_level(ports, b',')
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
    }
    Ok(header)
}

/// Parses the `#( ... )` list. Items without a keyword inherit the kind and
/// datatype of the preceding item. On failure returns the offending item.
fn parse_parameter_list(text: &str) -> std::result::Result<Vec<Parameter>, String> {
    let mut result = Vec::new();
    let mut kind = ParameterKind::Parameter;
    let mut datatype: Option<String> = None;
    for item in split_top_level(text, b',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let caps = PARAM_ITEM.captures(item).ok_or_else(|| item.to_string())?;
        if let Some(keyword) = caps.get(1) {
            kind = parameter_kind(keyword.as_str());
            datatype = None;
        }
        let dt = caps[2].trim();
        if !dt.is_empty() {
            datatype = Some(dt.to_string());
        }
        result.push(Parameter::new(
            &caps[3],
            kind,
            datatype.as_deref(),
            caps[4].trim(),
        ));
    }
    Ok(result)
}

/// `parameter` and `localparam` statements in a module body.
fn parse_body_parameters(body: &str) -> Vec<Parameter> {
    let mut result = Vec::new();
    for statement in split_top_level(body, b';') {
        let statement = strip_block_prefix(statement);
        let Some(caps) = BODY_PARAM.captures(statement) else {
            continue;
        };
        let kind = parameter_kind(&caps[1]);
        let datatype = Some(caps[2].trim())
            .filter(|dt| !dt.is_empty())
            .map(str::to_string);
        for assignment in split_top_level(&caps[3], b',') {
            if let Some(a) = ASSIGNMENT.captures(assignment.trim()) {
                result.push(Parameter::new(
                    &a[1],
                    kind,
                    datatype.as_deref(),
                    a[2].trim(),
                ));
            }
        }
    }
    result
}

fn parameter_kind(keyword: &str) -> ParameterKind {
    if keyword == "localparam" {
        ParameterKind::Localparam
    } else {
        ParameterKind::Parameter
    }
}

/// Default-valued parameter environment of a non-top module.
fn parameter_env(module: &ModuleSource) -> HashMap<String, i64> {
    let mut env = HashMap::new();
    let header = parse_header(module).unwrap_or_default();
    let body = parse_body_parameters(module.body());
    for parameter in header.parameters.iter().chain(body.iter()) {
        if let Some(value) = evaluate(&parameter.value, &env) {
            env.insert(parameter.name.clone(), value);
        }
    }
    env
}

/// Port declarations of `module` in header order.
fn port_declarations(
    module: &ModuleSource,
    port_list: &[String],
    ansi: bool,
) -> Result<Vec<PortDecl>> {
    let syntax = |item: &str| AnalysisError::Syntax {
        module: module.name.clone(),
        reason: format!("cannot parse port '{item}'"),
    };

    if ansi {
        let mut decls: Vec<PortDecl> = Vec::new();
        for item in port_list {
            let caps = PORT_DECL.captures(item).ok_or_else(|| syntax(item))?;
            let name = port_name(&caps[4]).ok_or_else(|| syntax(item))?;
            let decl = match (caps.get(1), decls.last()) {
                (Some(direction), _) => PortDecl {
                    name,
                    direction: direction.as_str().to_string(),
                    signed: caps.get(2).is_some(),
                    range: caps.get(3).and_then(|r| split_range(r.as_str())),
                },
                (None, Some(prev)) => PortDecl {
                    name,
                    ..prev.clone()
                },
                (None, None) => return Err(syntax(item).into()),
            };
            decls.push(decl);
        }
        return Ok(decls);
    }

    // Non-ANSI: the header lists names, directions come from the body.
    let mut found: HashMap<String, PortDecl> = HashMap::new();
    for statement in split_top_level(module.body(), b';') {
        let statement = strip_block_prefix(statement);
        if !["input", "output", "inout"]
            .iter()
            .any(|d| statement.starts_with(d))
        {
            continue;
        }
        let Some(caps) = PORT_DECL.captures(statement) else {
            continue;
        };
        let Some(direction) = caps.get(1) else {
            continue;
        };
        for name in split_top_level(&caps[4], b',') {
            let Some(name) = port_name(name) else {
                continue;
            };
            if port_list.contains(&name) && !found.contains_key(&name) {
                found.insert(
                    name.clone(),
                    PortDecl {
                        name,
                        direction: direction.as_str().to_string(),
                        signed: caps.get(2).is_some(),
                        range: caps.get(3).and_then(|r| split_range(r.as_str())),
                    },
                );
            }
        }
    }
    port_list
        .iter()
        .map(|name| {
            found.remove(name).ok_or_else(|| {
                AnalysisError::Syntax {
                    module: module.name.clone(),
                    reason: format!("port '{name}' has no direction declaration"),
                }
                .into()
            })
        })
        .collect()
}

/// Declared name, ignoring any initializer.
fn port_name(text: &str) -> Option<String> {
    let name = text.split('=').next()?.trim();
    IDENTIFIER.is_match(name).then(|| name.to_string())
}

/// `[msb:lsb]` into its two expressions.
fn split_range(range: &str) -> Option<(String, String)> {
    let inner = range.trim().strip_prefix('[')?.strip_suffix(']')?;
    let parts = split_top_level(inner, b':');
    match parts.as_slice() {
        [msb, lsb] => Some((msb.trim().to_string(), lsb.trim().to_string())),
        _ => None,
    }
}

/// Module instantiations in a module body, in source order.
fn instances(body: &str) -> Vec<Instance> {
    split_top_level(body, b';')
        .into_iter()
        .filter_map(parse_instance)
        .collect()
}

/// Recognises `module #(overrides) name [range] (connections)` at the end of
/// a statement.
fn parse_instance(statement: &str) -> Option<Instance> {
    let s = statement.trim_end();
    let bytes = s.as_bytes();
    if bytes.last() != Some(&b')') {
        return None;
    }
    let open = matching_open(bytes, bytes.len() - 1)?;
    let mut head = s[..open].trim_end();
    if head.ends_with(']') {
        head = head[..matching_open(head.as_bytes(), head.len() - 1)?].trim_end();
    }
    let (rest, name) = trailing_identifier(head)?;
    let mut head = rest.trim_end();

    let mut overrides = None;
    if head.ends_with(')') {
        let open = matching_open(head.as_bytes(), head.len() - 1)?;
        overrides = Some(head[open + 1..head.len() - 1].to_string());
        head = head[..open].trim_end().strip_suffix('#')?.trim_end();
    }
    let (rest, module) = trailing_identifier(head)?;

    if KEYWORDS.contains(&module) || KEYWORDS.contains(&name) || !at_statement_start(rest) {
        return None;
    }
    Some(Instance {
        module: module.to_string(),
        name: name.to_string(),
        overrides,
    })
}

/// True if `prefix` ends where a new module item may begin.
fn at_statement_start(prefix: &str) -> bool {
    let prefix = prefix.trim_end();
    if prefix.is_empty() {
        return true;
    }
    match trailing_identifier(prefix) {
        Some((before, word)) => {
            BLOCK_KEYWORDS.contains(&word) || before.trim_end().ends_with(':')
        }
        None => false,
    }
}

fn trailing_identifier(text: &str) -> Option<(&str, &str)> {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .last()
        .map(|(i, _)| i)?;
    let word = &text[start..];
    IDENTIFIER.is_match(word).then(|| (&text[..start], word))
}

/// Drops leading `begin`, `end`, `generate`, labels and similar words that
/// can precede a declaration within the same `;`-delimited chunk.
fn strip_block_prefix(statement: &str) -> &str {
    let mut s = statement.trim_start();
    loop {
        if let Some(rest) = s.strip_prefix(':') {
            let rest = rest.trim_start();
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
                .unwrap_or(rest.len());
            s = rest[len..].trim_start();
            continue;
        }
        let word_len = s
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(s.len());
        if BLOCK_KEYWORDS.contains(&&s[..word_len]) {
            s = s[word_len..].trim_start();
            continue;
        }
        return s;
    }
}

fn resource_datawidth(inst: &Instance, env: &HashMap<String, i64>) -> usize {
    let Some(overrides) = &inst.overrides else {
        return DEFAULT_RESOURCE_DATAWIDTH;
    };
    let items = split_top_level(overrides, b',');
    let expr = items.iter().enumerate().find_map(|(i, item)| {
        let item = item.trim();
        match item.strip_prefix('.') {
            Some(named) => {
                let (param, value) = named.split_once('(')?;
                (param.trim() == "W_D").then(|| value.trim_end().strip_suffix(')'))?.map(str::trim)
            }
            None => (i == 0 && !item.is_empty()).then_some(item),
        }
    });
    match expr {
        None => DEFAULT_RESOURCE_DATAWIDTH,
        Some(expr) => match evaluate(expr, env).and_then(|w| usize::try_from(w).ok()) {
            Some(width) => width,
            None => {
                log::warn!(
                    "Cannot resolve data width '{expr}' of resource {}; assuming {}",
                    inst.name,
                    DEFAULT_RESOURCE_DATAWIDTH
                );
                DEFAULT_RESOURCE_DATAWIDTH
            }
        },
    }
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    i
}

fn closing(open: u8) -> Option<u8> {
    match open {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        _ => None,
    }
}

/// Index of the bracket closing the one at `open`.
fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let close = closing(*bytes.get(open)?)?;
    let opener = bytes[open];
    let mut depth = 0usize;
    let mut in_string = false;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            in_string = b != b'"';
            continue;
        }
        if b == b'"' {
            in_string = true;
        } else if b == opener {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Index of the bracket opening the one at `close`.
fn matching_open(bytes: &[u8], close: usize) -> Option<usize> {
    let (opener, closer) = match *bytes.get(close)? {
        b')' => (b'(', b')'),
        b']' => (b'[', b']'),
        b'}' => (b'{', b'}'),
        _ => return None,
    };
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        if bytes[i] == closer {
            depth += 1;
        } else if bytes[i] == opener {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Splits on `sep` outside of brackets and string literals.
fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut start = 0;
    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            in_string = b != b'"';
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            _ if b == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
