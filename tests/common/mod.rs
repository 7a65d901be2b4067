#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use yang::error::{YangError, YangResult};
use yang::exec::Executor;
use yang::fetch::Fetcher;

/// Records every command and answers with scripted exit codes.
#[derive(Default)]
pub struct RecordingExecutor {
    pub commands: RefCell<Vec<String>>,
    codes: HashMap<String, i32>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `command` exit with `code` instead of 0.
    pub fn failing(mut self, command: &str, code: i32) -> Self {
        self.codes.insert(command.to_string(), code);
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, command: &str) -> YangResult<i32> {
        self.commands.borrow_mut().push(command.to_string());
        Ok(self.codes.get(command).copied().unwrap_or(0))
    }
}

/// Writes a fixed body for every fetch and counts the calls.
#[derive(Default)]
pub struct StubFetcher {
    pub calls: RefCell<Vec<(String, PathBuf)>>,
    pub fail: bool,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> YangResult<()> {
        self.calls.borrow_mut().push((url.to_string(), destination.to_path_buf()));
        if self.fail {
            return Err(YangError::DownloadError {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        fs::write(destination, b"payload")?;
        Ok(())
    }
}

/// Creates `path` under `root` with empty content, including parents.
pub fn touch(root: &Path, path: &str) -> PathBuf {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&full, "").unwrap();
    full
}

/// Writes a manifest named `build.yang` into `dir`.
pub fn write_manifest(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("build.yang");
    fs::write(&path, content).unwrap();
    path
}
