// SPDX-License-Identifier: Apache-2.0

//! A small Verilog preprocessor: comment removal, object-like macros,
//! conditional compilation and `` `include ``.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{AnalysisError, AnalyzerConfig, IpgenError, Result};

static MACRO_USE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([A-Za-z_][A-Za-z0-9_$]*)").unwrap());

const MAX_INCLUDE_DEPTH: usize = 32;
const MAX_EXPANSION_DEPTH: usize = 16;

/// Directives that carry no information for structural analysis.
const IGNORED_DIRECTIVES: [&str; 7] = [
    "timescale",
    "default_nettype",
    "resetall",
    "celldefine",
    "endcelldefine",
    "nounconnected_drive",
    "unconnected_drive",
];

struct Conditional {
    active: bool,
    taken: bool,
    parent_active: bool,
}

/// Macro definitions persist from one source to the next, as they do
/// within a single compilation unit.
pub(crate) struct Preprocessor<'a> {
    config: &'a AnalyzerConfig,
    macros: HashMap<String, String>,
}

impl<'a> Preprocessor<'a> {
    pub(crate) fn new(config: &'a AnalyzerConfig) -> Preprocessor<'a> {
        Preprocessor {
            config,
            macros: config.defines.iter().cloned().collect(),
        }
    }

    pub(crate) fn run_file(&mut self, path: &Path) -> Result<String> {
        self.file(path, 0)
    }

    pub(crate) fn run_text(&mut self, name: &str, text: &str) -> Result<String> {
        self.text(name, text, None, 0)
    }

    fn file(&mut self, path: &Path, depth: usize) -> Result<String> {
        let text = std::fs::read_to_string(path).map_err(|e| IpgenError::io(path, e))?;
        self.text(&path.display().to_string(), &text, path.parent(), depth)
    }

    fn text(&mut self, name: &str, text: &str, dir: Option<&Path>, depth: usize) -> Result<String> {
        let error = |reason: String| AnalysisError::Preprocess {
            file: name.to_string(),
            reason,
        };

        let stripped = strip_comments(text);
        let mut stack: Vec<Conditional> = Vec::new();
        let mut out = String::with_capacity(stripped.len());
        let mut lines = stripped.lines();

        while let Some(line) = lines.next() {
            let active = stack.last().is_none_or(|c| c.active);
            if let Some(rest) = line.trim_start().strip_prefix('`') {
                let (directive, args) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(d, a)| (d, a.trim()));
                match directive {
                    "ifdef" | "ifndef" => {
                        let defined = self.macros.contains_key(args);
                        let cond = if directive == "ifdef" { defined } else { !defined };
                        stack.push(Conditional {
                            active: active && cond,
                            taken: cond,
                            parent_active: active,
                        });
                        continue;
                    }
                    "elsif" => {
                        let defined = self.macros.contains_key(args);
                        let top = stack
                            .last_mut()
                            .ok_or_else(|| error("`elsif without `ifdef".to_string()))?;
                        top.active = top.parent_active && !top.taken && defined;
                        top.taken |= defined;
                        continue;
                    }
                    "else" => {
                        let top = stack
                            .last_mut()
                            .ok_or_else(|| error("`else without `ifdef".to_string()))?;
                        top.active = top.parent_active && !top.taken;
                        top.taken = true;
                        continue;
                    }
                    "endif" => {
                        stack
                            .pop()
                            .ok_or_else(|| error("`endif without `ifdef".to_string()))?;
                        continue;
                    }
                    _ => {}
                }
                if !active {
                    continue;
                }
                match directive {
                    "define" => {
                        let mut body = args.to_string();
                        while body.ends_with('\\') {
                            body.pop();
                            match lines.next() {
                                Some(next) => {
                                    body.push('\n');
                                    body.push_str(next.trim());
                                }
                                None => break,
                            }
                        }
                        let (macro_name, value) = body
                            .split_once(char::is_whitespace)
                            .map_or((body.as_str(), ""), |(n, v)| (n, v.trim()));
                        if macro_name.is_empty() {
                            return Err(error("`define without a name".to_string()).into());
                        }
                        self.macros
                            .insert(macro_name.to_string(), value.to_string());
                        continue;
                    }
                    "undef" => {
                        self.macros.remove(args);
                        continue;
                    }
                    "include" => {
                        if depth >= MAX_INCLUDE_DEPTH {
                            return Err(error("`include nested too deeply".to_string()).into());
                        }
                        let target = args.trim_matches(|c| c == '"' || c == '<' || c == '>');
                        let path = self
                            .resolve_include(target, dir)
                            .ok_or_else(|| error(format!("cannot find include file {target}")))?;
                        log::debug!("Including {} from {name}", path.display());
                        out.push_str(&self.file(&path, depth + 1)?);
                        out.push('\n');
                        continue;
                    }
                    d if IGNORED_DIRECTIVES.contains(&d) => continue,
                    _ => {}
                }
            }
            if active {
                out.push_str(&self.expand(line, 0));
                out.push('\n');
            }
        }

        if !stack.is_empty() {
            return Err(error("unterminated `ifdef".to_string()).into());
        }
        Ok(out)
    }

    fn resolve_include(&self, target: &str, dir: Option<&Path>) -> Option<PathBuf> {
        dir.into_iter()
            .chain(self.config.incdirs.iter().map(PathBuf::as_path))
            .map(|d| d.join(target))
            .chain(std::iter::once(PathBuf::from(target)))
            .find(|p| p.is_file())
    }

    fn expand(&self, line: &str, depth: usize) -> String {
        if depth >= MAX_EXPANSION_DEPTH || !line.contains('`') {
            return line.to_string();
        }
        let expanded = MACRO_USE.replace_all(line, |caps: &Captures| {
            match self.macros.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        });
        if expanded == line {
            line.to_string()
        } else {
            self.expand(&expanded, depth + 1)
        }
    }
}

/// Replaces comments by whitespace, keeping line breaks so positions in
/// diagnostics stay meaningful. String literals are left untouched.
pub(crate) fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = ' ';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}
