use std::path::Path;

use core_lib::exec::{BuildStatus, BuildSteps, Step, runner::BuildRunner};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn steps(configure: &str, build: &str) -> BuildSteps {
    BuildSteps {
        configure: Step::new("configure", configure),
        build: Step::new("build", build),
    }
}

#[tokio::test]
async fn test_both_steps_succeed() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = BuildRunner::default()
        .run(
            dir.path(),
            &steps("touch configured", "sh -c 'test -f configured && touch built'"),
        )
        .await?;

    assert_eq!(result.status, BuildStatus::Success);
    assert!(dir.path().join("built").exists());
    Ok(())
}

#[tokio::test]
async fn test_configure_failure_skips_build() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = BuildRunner::default()
        .run(
            dir.path(),
            &steps(
                r#"sh -c "echo checking...; echo 'configure: error: no compiler' >&2; exit 1""#,
                "touch built",
            ),
        )
        .await?;

    assert_eq!(result.status, BuildStatus::ConfigureFailed);
    assert_eq!(result.stdout, "checking...\n");
    assert_eq!(result.stderr, "configure: error: no compiler\n");
    assert!(!dir.path().join("built").exists());
    Ok(())
}

#[tokio::test]
async fn test_build_failure_keeps_only_build_output() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = BuildRunner::default()
        .run(
            dir.path(),
            &steps(
                r#"sh -c "echo configure-out; echo configure-warning >&2""#,
                r#"sh -c "echo make-out; echo 'make: *** [all] Error 2' >&2; exit 2""#,
            ),
        )
        .await?;

    assert_eq!(result.status, BuildStatus::BuildFailed);
    assert_eq!(result.stdout, "make-out\n");
    assert_eq!(result.stderr, "make: *** [all] Error 2\n");
    assert!(!result.failure_output().contains("configure"));
    Ok(())
}

#[tokio::test]
async fn test_missing_executable_is_a_configure_failure() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = BuildRunner::default()
        .run(dir.path(), &steps("./bootstrap-configure", "touch built"))
        .await?;

    assert_eq!(result.status, BuildStatus::ConfigureFailed);
    assert!(result.stderr.contains("./bootstrap-configure"));
    assert!(!dir.path().join("built").exists());
    Ok(())
}

#[tokio::test]
async fn test_steps_run_in_source_directory() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = BuildRunner::default()
        .run(dir.path(), &steps("true", "sh -c 'pwd > where'"))
        .await?;

    assert_eq!(result.status, BuildStatus::Success);
    let recorded = std::fs::read_to_string(dir.path().join("where"))?;
    assert_eq!(
        Path::new(recorded.trim()).canonicalize()?,
        dir.path().canonicalize()?
    );
    Ok(())
}

#[tokio::test]
async fn test_step_timeout_is_a_build_failure() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = BuildRunner::new(Some(1))
        .run(dir.path(), &steps("true", "sleep 5"))
        .await?;

    assert_eq!(result.status, BuildStatus::BuildFailed);
    assert!(result.stderr.contains("timed out"));
    Ok(())
}

#[tokio::test]
async fn test_large_output_is_fully_captured() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let result = BuildRunner::default()
        .run(
            dir.path(),
            &steps("true", "sh -c 'seq 1 20000 >&2; exit 1'"),
        )
        .await?;

    assert_eq!(result.status, BuildStatus::BuildFailed);
    assert_eq!(result.stderr.lines().count(), 20000);
    assert_eq!(result.stderr.lines().last(), Some("20000"));
    Ok(())
}
