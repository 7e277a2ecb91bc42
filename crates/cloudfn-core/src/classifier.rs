//! Function classifier
//!
//! Scans the top-level function definitions of a Python functions module and
//! infers each one's trigger kind from its parameter names and docstring.
//!
//! - a `request` (or `req`) parameter means an HTTP trigger
//! - `data`/`event` together with `context` means an event trigger; the
//!   docstring is then searched for a provider event phrase, first match wins
//!
//! Anything else is a plain helper and is not reported.

use crate::error::{FunctionError, Result};
use crate::model::TriggerKind;
use regex::Regex;
use std::sync::LazyLock;

static DEF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:async\s+)?def\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap()
});

const REQUEST_PARAMS: &[&str] = &["request", "req"];
const DATA_PARAMS: &[&str] = &["data", "event"];
const CONTEXT_PARAMS: &[&str] = &["context"];

/// Docstring phrases for event triggers, checked in order
const EVENT_PHRASES: &[(&str, TriggerKind)] = &[
    ("cloud storage", TriggerKind::Storage),
    ("firestore document on create", TriggerKind::FirestoreCreate),
    ("firestore document on update", TriggerKind::FirestoreUpdate),
    ("firestore document on delete", TriggerKind::FirestoreDelete),
    ("firestore document on write", TriggerKind::FirestoreWrite),
];

/// A top-level function definition found in the module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFunction {
    pub name: String,
    /// 1-based line of the `def`
    pub line: usize,
    pub params: Vec<String>,
    pub docstring: Option<String>,
}

impl ScannedFunction {
    pub fn has_param(&self, candidates: &[&str]) -> bool {
        self.params.iter().any(|p| candidates.contains(&p.as_str()))
    }
}

/// Enumerate public top-level functions of a module
///
/// Each malformed definition yields an error entry; scanning continues with
/// the next line.
pub fn scan_module(source: &str) -> Vec<Result<ScannedFunction>> {
    let lines: Vec<&str> = source.lines().collect();
    let mut results = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let Some(caps) = DEF_PATTERN.captures(lines[index]) else {
            index += 1;
            continue;
        };

        let name = caps[1].to_string();
        let line_no = index + 1;
        if name.starts_with('_') {
            index += 1;
            continue;
        }

        let params_start = caps.get(0).map(|m| m.end()).unwrap_or_default();
        let signature = match scan_signature(&lines, index, params_start) {
            Ok(signature) => signature,
            Err(reason) => {
                results.push(Err(malformed(&name, line_no, reason)));
                index += 1;
                continue;
            }
        };

        let docstring = match &signature.inline_body {
            Some(body) => {
                let mut body_lines = vec![body.as_str()];
                body_lines.extend_from_slice(&lines[signature.end_line + 1..]);
                scan_docstring(&body_lines, 0)
            }
            None => scan_docstring(&lines, signature.end_line + 1),
        };

        match docstring {
            Ok(docstring) => results.push(Ok(ScannedFunction {
                name,
                line: line_no,
                params: split_params(&signature.params),
                docstring,
            })),
            Err(reason) => results.push(Err(malformed(&name, line_no, reason))),
        }

        index = signature.end_line + 1;
    }

    results
}

/// Infer the trigger kind of a scanned function
///
/// Returns `None` for functions that are not cloud functions at all.
pub fn classify(function: &ScannedFunction) -> Option<TriggerKind> {
    if function.has_param(REQUEST_PARAMS) {
        return Some(TriggerKind::Http);
    }

    if function.has_param(DATA_PARAMS) && function.has_param(CONTEXT_PARAMS) {
        let docstring = function.docstring.as_deref().unwrap_or_default();
        return Some(classify_event(docstring));
    }

    None
}

/// Event trigger kind from docstring text
pub fn classify_event(docstring: &str) -> TriggerKind {
    let normalized = docstring
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    EVENT_PHRASES
        .iter()
        .find(|(phrase, _)| normalized.contains(phrase))
        .map(|(_, kind)| *kind)
        .unwrap_or(TriggerKind::Unknown)
}

fn malformed(name: &str, line: usize, reason: &str) -> FunctionError {
    FunctionError::MalformedDefinition {
        name: name.to_string(),
        line,
        reason: reason.to_string(),
    }
}

struct Signature {
    params: String,
    end_line: usize,
    /// Statement following the colon on the `def` line
    inline_body: Option<String>,
}

fn scan_signature(
    lines: &[&str],
    start_line: usize,
    start_col: usize,
) -> std::result::Result<Signature, &'static str> {
    let mut params = String::new();
    let mut depth = 1usize;
    let mut quote: Option<char> = None;

    for (offset, line) in lines[start_line..].iter().enumerate() {
        let text = if offset == 0 { &line[start_col..] } else { &line[..] };
        let mut chars = text.char_indices();

        while let Some((pos, c)) = chars.next() {
            if let Some(q) = quote {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
                params.push(c);
                continue;
            }

            match c {
                '#' => break,
                '"' | '\'' => quote = Some(c),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let rest = &text[pos + 1..];
                        let inline_body = rest
                            .split_once(':')
                            .map(|(_, body)| body.trim())
                            .filter(|body| !body.is_empty() && !body.starts_with('#'))
                            .map(str::to_string);
                        return Ok(Signature {
                            params,
                            end_line: start_line + offset,
                            inline_body,
                        });
                    }
                }
                _ => {}
            }
            params.push(c);
        }
        params.push('\n');
    }

    Err("unterminated parameter list")
}

/// Split a parameter list into bare parameter names
fn split_params(params: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in params.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                names.extend(param_name(&current));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    names.extend(param_name(&current));
    names
}

fn param_name(raw: &str) -> Option<String> {
    let name = raw
        .split([':', '='])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('*')
        .trim();

    if name.is_empty() || name == "/" || name == "self" {
        None
    } else {
        Some(name.to_string())
    }
}

fn scan_docstring(
    lines: &[&str],
    body_start: usize,
) -> std::result::Result<Option<String>, &'static str> {
    let Some((first_index, first_line)) = lines
        .iter()
        .enumerate()
        .skip(body_start)
        .map(|(i, l)| (i, l.trim()))
        .find(|(_, l)| !l.is_empty() && !l.starts_with('#'))
    else {
        return Ok(None);
    };

    let literal = first_line.trim_start_matches(['r', 'R', 'u', 'U']);
    let delimiter = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|d| literal.starts_with(d));
    let Some(delimiter) = delimiter else {
        return Ok(None);
    };
    // `r` prefix is only allowed directly before the quote
    if literal.len() + 1 < first_line.len() {
        return Ok(None);
    }

    let opened = &literal[delimiter.len()..];

    if delimiter.len() == 1 {
        let quote = delimiter.chars().next().unwrap_or('"');
        let mut escaped = false;
        for (pos, c) in opened.char_indices() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                return Ok(Some(opened[..pos].to_string()));
            }
        }
        return Err("unterminated docstring");
    }

    if let Some(end) = opened.find(delimiter) {
        return Ok(Some(opened[..end].to_string()));
    }

    let mut doc = String::from(opened);
    for line in &lines[first_index + 1..] {
        doc.push('\n');
        if let Some(end) = line.find(delimiter) {
            doc.push_str(&line[..end]);
            return Ok(Some(doc.trim().to_string()));
        }
        doc.push_str(line);
    }

    Err("unterminated docstring")
}
