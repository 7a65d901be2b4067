//! Pipeline runner.
//!
//! Stages run strictly in order and the first failure ends the run:
//! 1. pre-build commands
//! 2. `include:` dependency trees, compiled without exclusions
//! 3. the manifest's own directory, minus the exclusions
//! 4. post-build checks

use std::path::Path;

use log::{debug, info};

use crate::compiler::Compiler;
use crate::error::{YangError, YangResult};
use crate::exclude::{absolutize, Exclusions};
use crate::exec::Executor;
use crate::manifest::PipelineSpec;

/// Task counts of a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: usize,
    pub compiled: usize,
    pub checks: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.commands + self.compiled + self.checks
    }
}

pub struct Pipeline<'a> {
    spec: &'a PipelineSpec,
    executor: &'a dyn Executor,
}

impl<'a> Pipeline<'a> {
    pub fn new(spec: &'a PipelineSpec, executor: &'a dyn Executor) -> Self {
        Self { spec, executor }
    }

    fn compiler(&self) -> Compiler<'a> {
        let spec: &'a PipelineSpec = self.spec;
        Compiler::new(&spec.vars, &spec.patterns, &spec.expander, self.executor)
    }

    /// Runs every stage.
    ///
    /// # Errors
    /// The first error of any stage; later stages never run and nothing
    /// already done is rolled back.
    pub fn run(&self) -> YangResult<RunSummary> {
        let commands = self.run_commands()?;
        let mut compiled = self.compile_includes()?;
        compiled += self.compile_main()?;
        let checks = self.run_checks()?;

        let summary = RunSummary { commands, compiled, checks };
        info!("Pipeline finished: {:?}", summary);
        Ok(summary)
    }

    /// Stage 1: pre-build commands in declaration order.
    pub fn run_commands(&self) -> YangResult<usize> {
        let spec = self.spec;
        let mut done_tasks = 0;
        for command in &spec.commands {
            let command = spec.expander.expand(command, &spec.vars)?;
            debug!("Running pre-build command '{}'", command);
            self.execute(command)?;
            done_tasks += 1;
        }
        Ok(done_tasks)
    }

    /// Stage 2: every `include:` tree with an empty exclusion list.
    pub fn compile_includes(&self) -> YangResult<usize> {
        let spec = self.spec;
        let compiler = self.compiler();
        let none = Exclusions::none();
        let mut compiled = 0;

        for include in &spec.includes {
            let expanded = spec.expander.expand(include, &spec.vars)?;
            let dir = absolutize(&spec.work_dir, Path::new(&expanded));
            if !dir.is_dir() {
                return Err(YangError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("include directory {} does not exist", dir.display()),
                )));
            }
            compiled += compiler.compile_dir(&dir, &none)?;
            println!("* done dependency {}", include);
        }
        Ok(compiled)
    }

    /// Stage 3: the manifest's directory with the expanded exclusions.
    pub fn compile_main(&self) -> YangResult<usize> {
        let spec = self.spec;
        let excludes = spec.expander.expand_list(&spec.excludes, &spec.vars)?;
        let exclusions = Exclusions::new(&spec.manifest_dir, &spec.work_dir, &excludes)?;
        self.compiler().compile_dir(&spec.manifest_dir, &exclusions)
    }

    /// Stage 4: post-build checks, reporting `[i/total]` progress.
    pub fn run_checks(&self) -> YangResult<usize> {
        let spec = self.spec;
        let total = spec.checks.len();
        let mut done_tasks = 0;

        for (index, check) in spec.checks.iter().enumerate() {
            let step = index + 1;
            let command = spec.expander.expand(check, &spec.vars)?;
            println!("* [{}/{}] checking...", step, total);
            if let Err(err) = self.execute(command) {
                println!("* [{}/{}] fail!", step, total);
                return Err(err);
            }
            done_tasks += 1;
            println!("* [{}/{}] done!", step, total);
        }

        println!("* {} checks done", done_tasks);
        Ok(done_tasks)
    }

    fn execute(&self, command: String) -> YangResult<()> {
        match self.executor.execute(&command)? {
            0 => Ok(()),
            code => Err(YangError::ExecutionError { command, code }),
        }
    }
}
