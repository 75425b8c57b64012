//! Gradle build system integration
//!
//! Wraps the Gradle wrapper and runs a build the way the release script
//! expects: preflight first, then signing selection, the optional clean,
//! the task itself, and finally the artifact rename.

use crate::artifact::{rename_after_task, ArtifactKind, RenameOutcome};
use crate::preflight::{check_prerequisites, ReleaseInputs};
use crate::signing::SigningConfig;
use crate::variant::BuildType;
use crate::version::version_code_for_task;
use serde::Serialize;
use std::path::Path;
use vocario_core::config::ProjectPaths;
use vocario_core::error::{Error, Result};
use vocario_core::process::{
    run_command_in_dir_with_env, run_command_streaming_in_dir, CommandResult,
};

/// Gradle wrapper for the current platform
pub fn gradle_wrapper() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "./gradlew"
    }
}

/// Run a Gradle task and capture its output
pub fn run_task(
    project_dir: &Path,
    task: &str,
    env: &[(String, String)],
) -> Result<CommandResult> {
    run_command_in_dir_with_env(gradle_wrapper(), &[task], project_dir, env)
}

/// Run a Gradle task with output streamed to the terminal
pub fn run_task_streaming(
    project_dir: &Path,
    task: &str,
    env: &[(String, String)],
) -> Result<i32> {
    run_command_streaming_in_dir(gradle_wrapper(), &[task], project_dir, env)
}

/// Clean build artifacts
pub fn clean(project_dir: &Path) -> Result<CommandResult> {
    run_task(project_dir, "clean", &[])
}

/// Lines of captured Gradle output kept in a failure report
const FAILURE_TAIL_LINES: usize = 20;

fn tail(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

/// One build invocation
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
    /// Resolved project locations
    pub paths: &'a ProjectPaths,
    /// Product name used for renamed artifacts
    pub app_name: &'a str,
    /// Build type; decides the signing identity
    pub build_type: BuildType,
    /// Packaging format; together with the build type picks the task
    pub kind: ArtifactKind,
    /// Explicit version code, otherwise read from pubspec.yaml
    pub version_code: Option<u32>,
    /// Run `clean` before the task
    pub clean: bool,
    /// Skip spawning Gradle; the rest of the pipeline still runs
    pub dry_run: bool,
    /// Stream Gradle output instead of capturing it
    pub stream_output: bool,
}

impl BuildRequest<'_> {
    /// Gradle task this request runs
    pub fn task(&self) -> &'static str {
        self.build_type.task(self.kind)
    }
}

/// What a build invocation did
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Task that was requested
    pub task: String,
    /// Signing configuration the task was built with
    pub signing: SigningConfig,
    /// Version code embedded in the renamed artifact
    pub version_code: u32,
    /// Gradle exit code, `None` on dry runs
    pub exit_code: Option<i32>,
    /// Post-build rename result
    pub rename: RenameOutcome,
}

fn task_failed(task: &str, code: i32, captured: Option<&CommandResult>) -> Error {
    let mut err = Error::gradle(format!("Gradle task {} failed with exit code {}", task, code))
        .with_suggestion("Re-run with --verbose to stream the Gradle output");
    if let Some(result) = captured {
        err = err.with_context(tail(&result.combined_output(), FAILURE_TAIL_LINES));
    }
    err
}

/// Run a build task end to end
///
/// Missing release prerequisites abort before anything else happens,
/// including the clean step and the pubspec lookup. A failing Gradle
/// task is an error; a failed rename is not.
pub fn run_build(request: &BuildRequest<'_>) -> Result<PipelineReport> {
    let paths = request.paths;
    let task = request.task();

    check_prerequisites(
        &ReleaseInputs {
            keystore_file: &paths.keystore_file,
            credentials_file: &paths.credentials_file,
        },
        &[task],
    )?;

    let signing = request
        .build_type
        .signing(&paths.keystore_file, &paths.credentials_file)?;
    let version_code = version_code_for_task(task, request.version_code, &paths.pubspec)?;
    tracing::info!(task, signing = signing.label(), version_code, "Starting build");

    let exit_code = if request.dry_run {
        tracing::info!(task, "Dry run, not invoking Gradle");
        None
    } else {
        if request.clean {
            tracing::info!("Cleaning Gradle outputs");
            let result = clean(&paths.android_dir)?;
            if !result.success {
                return Err(task_failed("clean", result.exit_code, Some(&result)));
            }
        }

        let env = signing.to_env();
        if request.stream_output {
            let code = run_task_streaming(&paths.android_dir, task, &env)?;
            if code != 0 {
                return Err(task_failed(task, code, None));
            }
            Some(code)
        } else {
            let result = run_task(&paths.android_dir, task, &env)?;
            if !result.success {
                return Err(task_failed(task, result.exit_code, Some(&result)));
            }
            Some(result.exit_code)
        }
    };

    let rename = rename_after_task(&paths.build_dir, task, request.app_name, version_code);

    Ok(PipelineReport {
        task: task.to_string(),
        signing,
        version_code,
        exit_code,
        rename,
    })
}
