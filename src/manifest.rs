//! Manifest loading.
//!
//! Loading happens in two passes. The syntax pass turns every line into a
//! [`Directive`] so that a malformed line anywhere aborts before anything
//! runs. The evaluation pass then applies the directives in order: it
//! mutates the variable store, fills the pattern table and the directive
//! lists, and performs the immediate `mkdir:` and `download:` side effects.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use url::Url;

use crate::constants::DEFAULT_MAX_PASSES;
use crate::directive::{parse_line, Assignment, Condition, Directive};
use crate::error::{YangError, YangResult};
use crate::exclude::{absolutize, check_entry};
use crate::expand::Expander;
use crate::fetch::Fetcher;
use crate::vars::VariableStore;

/// File extension → command template, in registration order.
pub type PatternTable = IndexMap<String, String>;

/// A directive together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLine {
    pub number: usize,
    pub directive: Directive,
}

/// Everything the pipeline runner needs, produced by [`Loader::load`].
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    pub manifest_path: PathBuf,
    /// Directory of the manifest; `$root` and the main compile pass
    pub manifest_dir: PathBuf,
    /// Directory relative include and exclude paths resolve against
    pub work_dir: PathBuf,
    pub vars: VariableStore,
    pub patterns: PatternTable,
    pub commands: Vec<String>,
    pub excludes: Vec<String>,
    pub includes: Vec<String>,
    pub checks: Vec<String>,
    pub expander: Expander,
}

impl PipelineSpec {
    fn new(
        manifest_path: PathBuf,
        manifest_dir: PathBuf,
        work_dir: PathBuf,
        vars: VariableStore,
        expander: Expander,
    ) -> Self {
        Self {
            manifest_path,
            manifest_dir,
            work_dir,
            vars,
            patterns: PatternTable::new(),
            commands: Vec::new(),
            excludes: Vec::new(),
            includes: Vec::new(),
            checks: Vec::new(),
            expander,
        }
    }
}

/// Runs the syntax pass over manifest text.
///
/// # Errors
/// * `YangError::ParseError` naming the first malformed line
pub fn parse_manifest(path: &Path, content: &str) -> YangResult<Vec<ManifestLine>> {
    let mut lines = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let number = index + 1;
        match parse_line(raw) {
            Ok(Some(directive)) => lines.push(ManifestLine { number, directive }),
            Ok(None) => {}
            Err(message) => {
                return Err(YangError::ParseError {
                    path: path.display().to_string(),
                    line: number,
                    message,
                })
            }
        }
    }
    Ok(lines)
}

/// Reads a manifest and evaluates it into a [`PipelineSpec`].
pub struct Loader<'a> {
    fetcher: &'a dyn Fetcher,
    work_dir: PathBuf,
    max_passes: usize,
}

impl<'a> Loader<'a> {
    /// Creates a loader resolving relative paths against the current directory.
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self {
            fetcher,
            work_dir: std::env::current_dir().unwrap_or_default(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_work_dir<P: AsRef<Path>>(mut self, work_dir: P) -> Self {
        self.work_dir = work_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Loads the manifest at `manifest_path` on top of `vars`.
    ///
    /// # Errors
    /// * `YangError::ManifestNotFound` if the manifest does not exist
    /// * `YangError::ParseError` for malformed lines, undefined `when` keys,
    ///   invalid exclude patterns and reassignment of `root` or `file`
    /// * `YangError::ExpansionError`, `YangError::DownloadError` and
    ///   `YangError::IoError` from immediate directives
    pub fn load<P: AsRef<Path>>(&self, manifest_path: P, vars: VariableStore) -> YangResult<PipelineSpec> {
        let manifest_path = absolutize(&self.work_dir, manifest_path.as_ref());
        if !manifest_path.is_file() {
            return Err(YangError::ManifestNotFound(manifest_path.display().to_string()));
        }

        debug!("Loading manifest {}", manifest_path.display());
        let content = fs::read_to_string(&manifest_path)?;
        let lines = parse_manifest(&manifest_path, &content)?;

        let manifest_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.work_dir.clone());
        let expander = Expander::new(&manifest_dir).with_max_passes(self.max_passes);

        let mut spec = PipelineSpec::new(
            manifest_path.clone(),
            manifest_dir,
            self.work_dir.clone(),
            vars,
            expander,
        );

        let mut deferred = Vec::new();
        for line in lines {
            if let Directive::Exclude(entries) = &line.directive {
                deferred.extend(
                    entries
                        .iter()
                        .filter(|entry| entry.contains('$'))
                        .map(|entry| (line.number, entry.clone())),
                );
            }
            self.evaluate(&mut spec, line)?;
        }

        // Variables are final now, so expanded patterns match what the main pass sees.
        for (number, entry) in deferred {
            let expanded = spec.expander.expand(&entry, &spec.vars)?;
            check_entry(&expanded).map_err(|message| YangError::ParseError {
                path: manifest_path.display().to_string(),
                line: number,
                message,
            })?;
        }

        debug!(
            "Loaded {} patterns, {} commands, {} includes, {} checks",
            spec.patterns.len(),
            spec.commands.len(),
            spec.includes.len(),
            spec.checks.len()
        );
        Ok(spec)
    }

    fn evaluate(&self, spec: &mut PipelineSpec, line: ManifestLine) -> YangResult<()> {
        let manifest = spec.manifest_path.display().to_string();
        let number = line.number;
        let parse_error = |message: String| YangError::ParseError {
            path: manifest.clone(),
            line: number,
            message,
        };
        // Variable errors are manifest mistakes; report them against the line.
        let at_line = |err: YangError| match err {
            YangError::VariableError(message) => parse_error(message),
            other => other,
        };

        match line.directive {
            Directive::Assign(Assignment { key, value }) => {
                spec.vars.assign(key, value).map_err(at_line)
            }
            Directive::Pattern { extension, template } => {
                spec.patterns.insert(extension, template);
                Ok(())
            }
            Directive::Command(command) => {
                spec.commands.push(command);
                Ok(())
            }
            Directive::Exclude(entries) => {
                spec.excludes.extend(entries);
                Ok(())
            }
            Directive::Check(command) => {
                spec.checks.push(command);
                Ok(())
            }
            Directive::Include(path) => {
                spec.includes.push(path);
                Ok(())
            }
            Directive::Download { url, destination } => {
                let url = spec.expander.expand(&url, &spec.vars)?;
                Url::parse(&url).map_err(|e| parse_error(format!("invalid url '{}': {}", url, e)))?;
                let destination = spec.expander.expand(&destination, &spec.vars)?;
                download(self.fetcher, &url, &absolutize(&self.work_dir, Path::new(&destination)))
            }
            Directive::When(condition) => {
                evaluate_condition(&spec.expander, &mut spec.vars, condition).map_err(at_line)
            }
            Directive::Mkdir(path) => {
                let path = spec.expander.expand(&path, &spec.vars)?;
                let path = absolutize(&self.work_dir, Path::new(&path));
                debug!("Creating directory {}", path.display());
                fs::create_dir_all(&path)?;
                Ok(())
            }
        }
    }
}

/// Applies the branch of `condition` selected by the key's expanded value.
///
/// The expected value is compared literally; it is not expanded.
///
/// # Errors
/// * `YangError::VariableError` if the key is undefined or the chosen action
///   assigns a reserved name
pub fn evaluate_condition(
    expander: &Expander,
    vars: &mut VariableStore,
    condition: Condition,
) -> YangResult<()> {
    let raw = vars.get(&condition.key).ok_or_else(|| {
        YangError::VariableError(format!(
            "making condition on undefined key \"{}\"",
            condition.key
        ))
    })?;
    let actual = expander.expand(raw, vars)?;

    let chosen = if actual == condition.expected { Some(condition.then) } else { condition.otherwise };
    match chosen {
        Some(action) => {
            println!(
                "* when: {}=\"{}\" → applying \"{}: {}\"",
                condition.key, actual, action.key, action.value
            );
            vars.assign(action.key, action.value)
        }
        None => {
            println!(
                "* when: condition \"{} is {}\" not met, skipping",
                condition.key, condition.expected
            );
            Ok(())
        }
    }
}

/// Downloads `url` to `destination` unless the destination already exists.
/// Parent directories are created first.
pub fn download(fetcher: &dyn Fetcher, url: &str, destination: &Path) -> YangResult<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    if destination.exists() {
        println!("* skipping download: {} already exists", destination.display());
        return Ok(());
    }

    println!("* downloading {} -> {}...", url, destination.display());
    fetcher.fetch(url, destination)?;
    info!("Downloaded {}", url);
    println!("* downloaded {}", url);
    Ok(())
}
