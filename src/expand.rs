//! `$name` substitution against the variable store.
//!
//! Expansion runs in passes. Each pass replaces every `$key` occurrence for
//! every key in the store, plus the dynamic tokens `$root` (the directory of
//! the active manifest) and `$builtins.random` (a fresh 16-character
//! alphanumeric token). Passes repeat until one produces no change, so values
//! may reference other variables. A cycle never settles, which is reported as
//! `YangError::ExpansionError` once the pass cap is reached.

use std::path::{Path, PathBuf};

use log::trace;
use rand::{distributions::Alphanumeric, Rng};

use crate::constants::{DEFAULT_MAX_PASSES, RANDOM_TOKEN, RANDOM_TOKEN_LEN, ROOT_TOKEN};
use crate::error::{YangError, YangResult};
use crate::vars::VariableStore;

#[derive(Debug, Clone)]
pub struct Expander {
    root: PathBuf,
    max_passes: usize,
}

impl Expander {
    /// Creates an expander resolving `$root` to `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf(), max_passes: DEFAULT_MAX_PASSES }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Expands `template` to a fixpoint.
    ///
    /// # Errors
    /// * `YangError::ExpansionError` if the text still changes after `max_passes` passes
    pub fn expand(&self, template: &str, vars: &VariableStore) -> YangResult<String> {
        let root = self.root.display().to_string();
        let mut current = template.to_string();

        for pass in 1..=self.max_passes {
            let next = substitute_pass(&current, vars, &root);
            if next == current {
                trace!("'{}' settled after {} passes", template, pass);
                return Ok(next);
            }
            current = next;
        }

        Err(YangError::ExpansionError {
            template: template.to_string(),
            passes: self.max_passes,
        })
    }

    /// Expands every element, preserving order.
    pub fn expand_list(&self, templates: &[String], vars: &VariableStore) -> YangResult<Vec<String>> {
        templates.iter().map(|t| self.expand(t, vars)).collect()
    }
}

/// One substitution pass, longest key first so that `$home` never
/// rewrites the prefix of `$homedir`.
fn substitute_pass(input: &str, vars: &VariableStore, root: &str) -> String {
    if !input.contains('$') {
        return input.to_string();
    }

    let random = if input.contains(&format!("${}", RANDOM_TOKEN)) {
        Some(random_token())
    } else {
        None
    };

    let mut tokens: Vec<(&str, &str)> = vars
        .iter()
        .filter(|(key, _)| !key.is_empty() && *key != ROOT_TOKEN && *key != RANDOM_TOKEN)
        .collect();
    tokens.push((ROOT_TOKEN, root));
    if let Some(random) = random.as_deref() {
        tokens.push((RANDOM_TOKEN, random));
    }
    tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = input.to_string();
    for (key, value) in tokens {
        let needle = format!("${}", key);
        if out.contains(&needle) {
            out = out.replace(&needle, value);
        }
    }
    out
}

/// A fresh mixed-case alphanumeric token.
pub fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_TOKEN_LEN)
        .map(char::from)
        .collect()
}
