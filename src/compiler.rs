//! Pattern-driven directory compilation.
//!
//! Walks a directory tree in file-name order and runs the command template
//! of the first pattern whose extension the file's path ends with. The first
//! non-zero exit aborts the walk.

use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::constants::{FILENAME_TOKEN, FILE_TOKEN};
use crate::error::{YangError, YangResult};
use crate::exclude::Exclusions;
use crate::exec::Executor;
use crate::expand::Expander;
use crate::manifest::PatternTable;
use crate::vars::VariableStore;

pub struct Compiler<'a> {
    vars: &'a VariableStore,
    patterns: &'a PatternTable,
    expander: &'a Expander,
    executor: &'a dyn Executor,
}

impl<'a> Compiler<'a> {
    pub fn new(
        vars: &'a VariableStore,
        patterns: &'a PatternTable,
        expander: &'a Expander,
        executor: &'a dyn Executor,
    ) -> Self {
        Self { vars, patterns, expander, executor }
    }

    /// Finds the pattern a file compiles with; first registered match wins.
    pub fn match_pattern(&self, file: &Path) -> Option<(&'a str, &'a str)> {
        let name = file.to_string_lossy();
        let patterns: &'a PatternTable = self.patterns;
        patterns
            .iter()
            .find(|(extension, _)| name.ends_with(extension.as_str()))
            .map(|(extension, template)| (extension.as_str(), template.as_str()))
    }

    /// The shell command compiling `file` with `template`.
    pub fn render_command(&self, template: &str, file: &Path) -> YangResult<String> {
        let file = file.display().to_string();
        let command = self.expander.expand(template, self.vars)?;
        Ok(command.replace(FILENAME_TOKEN, &file).replace(FILE_TOKEN, &file))
    }

    /// Compiles every non-excluded file under `root`.
    ///
    /// # Returns
    /// * `YangResult<usize>` - Number of files compiled
    ///
    /// # Errors
    /// * `YangError::ExecutionError` carrying the first non-zero exit code;
    ///   no further file is tried
    pub fn compile_dir<P: AsRef<Path>>(&self, root: P, exclusions: &Exclusions) -> YangResult<usize> {
        let root = root.as_ref();
        let mut done_tasks = 0;

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let excluded = exclusions.is_excluded(entry.path());
                if excluded {
                    debug!("Skipping excluded {}", entry.path().display());
                }
                !excluded
            });

        for entry in walker {
            let entry = entry.map_err(|e| YangError::IoError(e.into()))?;
            // Symlinked files compile; symlinked directories are not descended.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let file = entry.path();
            let Some((extension, template)) = self.match_pattern(file) else {
                continue;
            };

            debug!("{} matches pattern '{}'", file.display(), extension);
            let command = self.render_command(template, file)?;
            println!("compiling file {}...", file.display());

            let code = self.executor.execute(&command)?;
            if code != 0 {
                println!("compilation for \"{}\" failed with code {}", file.display(), code);
                return Err(YangError::ExecutionError { command, code });
            }
            done_tasks += 1;
        }

        println!("* done {} in {}", done_tasks, root.display());
        Ok(done_tasks)
    }
}
