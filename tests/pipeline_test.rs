mod common;

use common::{touch, write_manifest, RecordingExecutor, StubFetcher};
use tempfile::TempDir;
use yang::error::YangError;
use yang::manifest::{Loader, PipelineSpec};
use yang::pipeline::{Pipeline, RunSummary};
use yang::vars::VariableStore;

fn load(dir: &std::path::Path, manifest: &str) -> PipelineSpec {
    let path = write_manifest(dir, manifest);
    let fetcher = StubFetcher::new();
    Loader::new(&fetcher)
        .with_work_dir(dir)
        .load(path, VariableStore::new())
        .unwrap()
}

#[test_log::test]
fn test_commands_run_in_declared_order() {
    let temp_dir = TempDir::new().unwrap();
    let spec = load(
        temp_dir.path(),
        "cmd: step 1\ncmd: step 2\ncmd: step 3\ncmd: step 4\ncmd: step 5\n",
    );

    let executor = RecordingExecutor::new();
    let summary = Pipeline::new(&spec, &executor).run().unwrap();

    assert_eq!(
        executor.commands(),
        vec!["step 1", "step 2", "step 3", "step 4", "step 5"]
    );
    assert_eq!(summary, RunSummary { commands: 5, compiled: 0, checks: 0 });
}

#[test]
fn test_stage_order() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let deps = temp_dir.path().join("deps");
    let dep_file = touch(&deps, "dep.c");
    let main_file = touch(&project, "main.c");

    let spec = load(
        &project,
        &format!(
            "for .c : cc $file\n\
             check: verify $mode\n\
             include: {}\n\
             mode: fast\n\
             cmd: prepare\n",
            deps.display()
        ),
    );

    let executor = RecordingExecutor::new();
    let summary = Pipeline::new(&spec, &executor).run().unwrap();

    assert_eq!(
        executor.commands(),
        vec![
            "prepare".to_string(),
            format!("cc {}", dep_file.display()),
            format!("cc {}", main_file.display()),
            "verify fast".to_string(),
        ]
    );
    assert_eq!(summary.total(), 4);
}

#[test]
fn test_includes_ignore_exclusions() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("project");
    let generated = touch(&project, "gen/x.c");

    let spec = load(
        &project,
        &format!(
            "for .c : cc $file\nexclude: {}\ninclude: {}\n",
            project.join("gen").display(),
            project.join("gen").display()
        ),
    );

    let executor = RecordingExecutor::new();
    Pipeline::new(&spec, &executor).run().unwrap();

    assert_eq!(executor.commands(), vec![format!("cc {}", generated.display())]);
}

#[test]
fn test_failing_command_stops_later_stages() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "a.c");
    let spec = load(
        temp_dir.path(),
        "for .c : cc $file\ncmd: ok\ncmd: broken\ncmd: never\ncheck: never either\n",
    );

    let executor = RecordingExecutor::new().failing("broken", 7);
    let err = Pipeline::new(&spec, &executor).run().unwrap_err();

    assert_eq!(err.exit_code(), 7);
    assert_eq!(executor.commands(), vec!["ok", "broken"]);
}

#[test]
fn test_failing_check_reports_code() {
    let temp_dir = TempDir::new().unwrap();
    let spec = load(temp_dir.path(), "check: first\ncheck: second\ncheck: third\n");

    let executor = RecordingExecutor::new().failing("second", 3);
    let err = Pipeline::new(&spec, &executor).run().unwrap_err();

    assert!(matches!(err, YangError::ExecutionError { code: 3, .. }));
    assert_eq!(executor.commands(), vec!["first", "second"]);
}

#[test]
fn test_missing_include_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let spec = load(temp_dir.path(), "include: nowhere\ncheck: never\n");

    let executor = RecordingExecutor::new();
    let err = Pipeline::new(&spec, &executor).run().unwrap_err();

    assert!(matches!(err, YangError::IoError(_)));
    assert!(executor.commands().is_empty());
}

#[test]
fn test_relative_exclusions_resolve_against_work_dir() {
    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "third_party/lib.c");
    let kept = touch(temp_dir.path(), "app.c");
    let spec = load(temp_dir.path(), "vendor: third_party\nfor .c : cc $file\nexclude: ./$vendor\n");

    let executor = RecordingExecutor::new();
    let summary = Pipeline::new(&spec, &executor).run().unwrap();

    assert_eq!(executor.commands(), vec![format!("cc {}", kept.display())]);
    assert_eq!(summary.compiled, 1);
}

#[cfg(unix)]
#[test]
fn test_shell_executor_end_to_end() {
    use yang::exec::ShellExecutor;

    let temp_dir = TempDir::new().unwrap();
    touch(temp_dir.path(), "a.txt");
    let spec = load(
        temp_dir.path(),
        "for .txt : cp $file $file.bak\ncheck: test -f $root/a.txt.bak\n",
    );

    let summary = Pipeline::new(&spec, &ShellExecutor::new()).run().unwrap();
    assert_eq!(summary, RunSummary { commands: 0, compiled: 1, checks: 1 });
    assert!(temp_dir.path().join("a.txt.bak").is_file());
}
