//! Exclusion rules for the main compilation pass.
//!
//! An entry containing glob metacharacters is matched against the path
//! relative to the walk base; any other entry is an absolute path prefix
//! matched component-wise.

use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;

use crate::error::{YangError, YangResult};

const GLOB_CHARS: [char; 4] = ['*', '?', '[', '{'];

#[derive(Debug, Clone)]
pub struct Exclusions {
    base: PathBuf,
    prefixes: Vec<PathBuf>,
    globs: GlobSet,
}

impl Exclusions {
    /// No exclusions at all; used for `include:` dependency trees.
    pub fn none() -> Self {
        Self { base: PathBuf::new(), prefixes: Vec::new(), globs: GlobSet::empty() }
    }

    /// Builds exclusion rules from already-expanded entries.
    ///
    /// # Arguments
    /// * `base` - Directory globs are matched relative to
    /// * `work_dir` - Directory relative prefixes are resolved against
    /// * `entries` - Expanded `exclude:` entries
    ///
    /// # Errors
    /// * `YangError::ExclusionError` if a glob pattern does not compile
    pub fn new<P: AsRef<Path>, W: AsRef<Path>>(
        base: P,
        work_dir: W,
        entries: &[String],
    ) -> YangResult<Self> {
        let mut prefixes = Vec::new();
        let mut builder = GlobSetBuilder::new();

        for entry in entries {
            if is_pattern(entry) {
                let glob = Glob::new(entry).map_err(|e| {
                    YangError::ExclusionError(format!("invalid pattern '{}': {}", entry, e))
                })?;
                builder.add(glob);
            } else {
                let prefix = absolutize(work_dir.as_ref(), Path::new(entry));
                debug!("Excluding prefix {}", prefix.display());
                prefixes.push(prefix);
            }
        }

        let globs = builder
            .build()
            .map_err(|e| YangError::ExclusionError(e.to_string()))?;

        Ok(Self { base: base.as_ref().to_path_buf(), prefixes, globs })
    }

    /// Whether `path` lies under any excluded prefix or matches any pattern.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.prefixes.iter().any(|prefix| path.starts_with(prefix)) {
            return true;
        }
        if self.globs.is_empty() {
            return false;
        }
        match path.strip_prefix(&self.base) {
            Ok(relative) => self.globs.is_match(relative),
            Err(_) => self.globs.is_match(path),
        }
    }
}

/// Whether an entry is a glob pattern rather than a path prefix.
pub fn is_pattern(entry: &str) -> bool {
    entry.contains(&GLOB_CHARS[..])
}

/// Checks that a glob entry compiles. Prefix entries always pass.
pub fn check_entry(entry: &str) -> Result<(), String> {
    if !is_pattern(entry) {
        return Ok(());
    }
    Glob::new(entry)
        .map(|_| ())
        .map_err(|e| format!("invalid exclude pattern '{}': {}", entry, e))
}

/// Resolves `path` against `base` and normalizes `.` and `..` lexically,
/// without requiring the path to exist.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
