//! Run configuration for the interpreter.
//! Collects invocation options and seeds the built-in variables every manifest can rely on.

use std::time::Duration;

use log::debug;

use crate::constants::DEFAULT_MAX_PASSES;
use crate::error::{YangError, YangResult};
use crate::vars::{is_reserved, parse_seed, VariableStore};

/// Options that shape a run but are not part of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Expansion passes allowed before giving up on a fixpoint
    pub max_passes: usize,
    /// Applied to every external command and download, if set
    pub timeout: Option<Duration>,
    /// Shell override for commands
    pub shell: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { max_passes: DEFAULT_MAX_PASSES, timeout: None, shell: None }
    }
}

/// Platform identifier in the form manifests compare against
/// (`win32`, `linux`, `darwin`); other systems pass through unchanged.
pub fn platform_id() -> &'static str {
    match std::env::consts::OS {
        "windows" => "win32",
        "macos" => "darwin",
        other => other,
    }
}

/// Built-in variables, seeded before any invocation override.
pub fn default_variables() -> VariableStore {
    let home = dirs::home_dir()
        .map(|path| path.display().to_string())
        .unwrap_or_default();

    let mut vars = VariableStore::new();
    vars.set("windows", "win32");
    vars.set("linux", "linux");
    vars.set("macos", "darwin");
    vars.set("platform", platform_id());
    vars.set("home", home);
    vars
}

/// Built-ins overlaid with the invocation's `key:value` and bare flags.
///
/// # Errors
/// * `YangError::VariableError` if a flag tries to seed `root` or `file`
pub fn seed_variables<S: AsRef<str>>(flags: &[S]) -> YangResult<VariableStore> {
    let mut vars = default_variables();
    for flag in flags {
        let (key, value) = parse_seed(flag.as_ref());
        if key.is_empty() {
            continue;
        }
        if is_reserved(&key) {
            return Err(YangError::VariableError(format!(
                "'{}' is a built-in variable and cannot be seeded",
                key
            )));
        }
        debug!("Seeding {} = '{}'", key, value);
        vars.set(key, value);
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let vars = default_variables();
        assert_eq!(vars.get("windows"), Some("win32"));
        assert_eq!(vars.get("linux"), Some("linux"));
        assert_eq!(vars.get("macos"), Some("darwin"));
        assert_eq!(vars.get("platform"), Some(platform_id()));
        assert!(vars.contains("home"));
    }

    #[test]
    fn test_seeds_override_builtins() {
        let vars = seed_variables(&["platform:win32", "fast"]).unwrap();
        assert_eq!(vars.get("platform"), Some("win32"));
        assert_eq!(vars.get("fast"), Some(""));
    }

    #[test]
    fn test_reserved_seed_rejected() {
        assert!(seed_variables(&["root:/tmp"]).is_err());
    }
}
