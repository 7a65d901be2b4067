//! Manifest line grammar.
//!
//! Each non-blank, non-comment line is turned into exactly one [`Directive`]
//! (or ignored). Keywords are tested in a fixed order of precedence; any line
//! that carries a `:` but none of the keywords is a plain assignment.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{
    DOWNLOAD_SEPARATOR, TT_CHECK, TT_CMD, TT_DOWNLOAD, TT_EXCLUDE, TT_FOR, TT_INCLUDE, TT_MKDIR,
    TT_WHEN,
};
use crate::exclude::check_entry;

/// A single `key: value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
}

/// `when:<key> is <expected> do <then> [else <otherwise>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub key: String,
    pub expected: String,
    pub then: Assignment,
    pub otherwise: Option<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Assign(Assignment),
    Pattern { extension: String, template: String },
    Command(String),
    Exclude(Vec<String>),
    Check(String),
    Include(String),
    Download { url: String, destination: String },
    When(Condition),
    Mkdir(String),
}

fn when_regex() -> &'static Regex {
    static WHEN: OnceLock<Regex> = OnceLock::new();
    WHEN.get_or_init(|| {
        Regex::new(r"^(?P<key>.+?) is (?P<expected>.*?) do (?P<then>.+?)(?: else (?P<otherwise>.+))?$")
            .expect("when grammar is a valid regex")
    })
}

/// Parses one manifest line.
///
/// Returns `Ok(None)` for blank lines, comments and lines without any `:`.
///
/// # Errors
/// A message describing the violated sub-syntax of the recognised keyword.
pub fn parse_line(line: &str) -> Result<Option<Directive>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if let Some(rest) = line.strip_prefix(TT_FOR) {
        let (extension, template) = rest
            .split_once(':')
            .ok_or_else(|| "ill-formed pattern, use \"for <ext> : <command>\"".to_string())?;
        let extension = extension.trim();
        if extension.is_empty() {
            return Err("pattern is missing a file extension".to_string());
        }
        return Ok(Some(Directive::Pattern {
            extension: extension.to_string(),
            template: template.trim().to_string(),
        }));
    }

    if let Some(rest) = line.strip_prefix(TT_CMD) {
        return non_empty(rest, TT_CMD).map(|c| Some(Directive::Command(c)));
    }

    if let Some(rest) = line.strip_prefix(TT_EXCLUDE) {
        let entries: Vec<String> = rest
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        // Entries with variables are checked once expanded, after loading.
        for entry in entries.iter().filter(|entry| !entry.contains('$')) {
            check_entry(entry)?;
        }
        return Ok(Some(Directive::Exclude(entries)));
    }

    if let Some(rest) = line.strip_prefix(TT_CHECK) {
        return non_empty(rest, TT_CHECK).map(|c| Some(Directive::Check(c)));
    }

    if let Some(rest) = line.strip_prefix(TT_INCLUDE) {
        return non_empty(rest, TT_INCLUDE).map(|p| Some(Directive::Include(p)));
    }

    if let Some(rest) = line.strip_prefix(TT_DOWNLOAD) {
        let (url, destination) = rest
            .trim()
            .split_once(DOWNLOAD_SEPARATOR)
            .ok_or_else(|| "ill-formed download, use \"download:<url> in <path>\"".to_string())?;
        let (url, destination) = (url.trim(), destination.trim());
        if url.is_empty() || destination.is_empty() {
            return Err("download needs both a url and a destination".to_string());
        }
        return Ok(Some(Directive::Download {
            url: url.to_string(),
            destination: destination.to_string(),
        }));
    }

    if let Some(rest) = line.strip_prefix(TT_WHEN) {
        return parse_condition(rest.trim()).map(|c| Some(Directive::When(c)));
    }

    if let Some(rest) = line.strip_prefix(TT_MKDIR) {
        return non_empty(rest, TT_MKDIR).map(|p| Some(Directive::Mkdir(p)));
    }

    if line.contains(':') {
        return parse_assignment(line).map(|a| Some(Directive::Assign(a)));
    }

    Ok(None)
}

fn non_empty(rest: &str, keyword: &str) -> Result<String, String> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(format!("'{}' needs an operand", keyword));
    }
    Ok(rest.to_string())
}

/// Parses `key: value`, splitting on the first `:`.
pub fn parse_assignment(text: &str) -> Result<Assignment, String> {
    let (key, value) = text
        .split_once(':')
        .ok_or_else(|| format!("malformed assignment \"{}\", use \"<key>: <value>\"", text))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("assignment \"{}\" has an empty key", text));
    }
    Ok(Assignment { key: key.to_string(), value: value.trim().to_string() })
}

fn parse_condition(expr: &str) -> Result<Condition, String> {
    let captures = when_regex().captures(expr).ok_or_else(|| {
        "ill-formed when, use \"when:<key> is <value> do <key>: <value> [else <key>: <value>]\""
            .to_string()
    })?;

    let key = captures["key"].trim().to_string();
    let expected = captures["expected"].trim().to_string();
    let then = parse_assignment(captures["then"].trim())?;
    let otherwise = captures
        .name("otherwise")
        .map(|m| parse_assignment(m.as_str().trim()))
        .transpose()?;

    Ok(Condition { key, expected, then, otherwise })
}
