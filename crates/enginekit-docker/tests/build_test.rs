mod common;

use std::path::{Path, PathBuf};

use common::{MockExecutor, call_log, failed, strings};
use enginekit_core::Platform;
use enginekit_docker::export::{BuildxExporter, ExportError};
use enginekit_docker::lint::{LintError, Linter};
use tempfile::TempDir;

/// Directory buildx was told to write the local export into.
fn local_dest(args: &[String]) -> PathBuf {
    let output = args
        .iter()
        .find_map(|a| a.strip_prefix("type=local,dest="))
        .expect("local --output");
    PathBuf::from(output)
}

// ── Client build ──

#[tokio::test]
async fn build_client_exports_target_stage_next_to_binary() {
    let tmp = TempDir::new().unwrap();
    let bin_path = tmp.path().join("bin").join("dagger");
    let log = call_log();
    let seen = log.clone();

    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming().times(1).returning(move |args| {
        seen.lock().unwrap().push(args.to_vec());
        let dest = local_dest(args);
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("dagger"), b"\x7fELF").unwrap();
        Ok(())
    });

    let exporter = BuildxExporter::with_executor(mock, ".", "Dockerfile");
    let platform: Platform = "darwin/arm64".parse().unwrap();
    let built = exporter
        .build_client("cli", &platform, &bin_path)
        .await
        .unwrap();

    assert_eq!(built, bin_path);
    assert!(built.is_file());

    let calls = log.lock().unwrap();
    let args = &calls[0];
    assert_eq!(&args[..2], ["buildx", "build"]);
    let target = args.iter().position(|a| a == "--target").unwrap();
    assert_eq!(args[target + 1], "cli");
    assert!(args.contains(&"darwin/arm64".to_owned()));
    assert!(!args.contains(&"--build-arg".to_owned()));
    assert_eq!(local_dest(args), tmp.path().join("bin"));
    assert_eq!(args.last().map(String::as_str), Some("."));
}

#[tokio::test]
async fn build_client_without_artifact_fails() {
    let tmp = TempDir::new().unwrap();
    let bin_path = tmp.path().join("bin").join("dagger");

    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming().returning(|_| Ok(()));

    let exporter = BuildxExporter::with_executor(mock, ".", "Dockerfile");
    let err = exporter
        .build_client("cli", &Platform::linux("amd64"), &bin_path)
        .await
        .unwrap_err();

    match err {
        ExportError::MissingArtifact { path } => assert_eq!(path, bin_path),
        other => panic!("expected MissingArtifact, got {other:?}"),
    }
}

#[tokio::test]
async fn build_client_bare_file_name_exports_to_working_dir() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|args| args.contains(&"type=local,dest=.".to_owned()))
        .times(1)
        .returning(|args| Err(failed(args, "ERROR: target stage \"cli\" could not be found\n")));

    let exporter = BuildxExporter::with_executor(mock, ".", "Dockerfile");
    let err = exporter
        .build_client("cli", &Platform::linux("amd64"), Path::new("dagger"))
        .await
        .unwrap_err();

    match err {
        ExportError::Build { source } => {
            assert!(source.output().unwrap().contains("could not be found"));
        }
        other => panic!("expected Build, got {other:?}"),
    }
}

// ── Lint ──

fn lint_args() -> Vec<String> {
    strings(&["golangci-lint", "run", "-v", "--timeout", "5m"])
}

#[tokio::test]
async fn lint_mounts_source_and_runs_image() {
    let tmp = TempDir::new().unwrap();
    let mount = format!("{}:/app", std::fs::canonicalize(tmp.path()).unwrap().display());
    let expected = strings(&[
        "run",
        "--rm",
        "-v",
        &mount,
        "-w",
        "/app",
        "golangci/golangci-lint:v1.51-alpine",
        "golangci-lint",
        "run",
        "-v",
        "--timeout",
        "5m",
    ]);

    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(move |args| args.to_vec() == expected)
        .times(1)
        .returning(|_| Ok(()));

    let linter = Linter::with_executor(mock, "golangci/golangci-lint:v1.51-alpine", lint_args());
    linter.lint(tmp.path()).await.unwrap();
}

#[tokio::test]
async fn lint_findings_are_reported() {
    let tmp = TempDir::new().unwrap();

    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming().returning(|args| {
        Err(failed(
            args,
            "engine/buildkit.go:42:2: ineffectual assignment to err (ineffassign)\n",
        ))
    });

    let linter = Linter::with_executor(mock, "golangci/golangci-lint:v1.51-alpine", lint_args());
    let err = linter.lint(tmp.path()).await.unwrap_err();

    assert!(matches!(err, LintError::Failed { .. }));
    assert!(err.output().unwrap().contains("ineffassign"));
}

#[tokio::test]
async fn lint_missing_source_runs_nothing() {
    let tmp = TempDir::new().unwrap();
    // no expectations: any executor call panics
    let linter = Linter::with_executor(
        MockExecutor::new(),
        "golangci/golangci-lint:v1.51-alpine",
        lint_args(),
    );

    let err = linter.lint(&tmp.path().join("missing")).await.unwrap_err();
    assert!(matches!(err, LintError::Source { .. }));
    assert!(err.output().is_none());
}
