//! Vocario Android CLI
//!
//! Release signing checks, artifact naming and build driver for the
//! Vocario Android app.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use vocario_android::artifact::{self, ArtifactKind, RenameOutcome};
use vocario_android::credentials::Credentials;
use vocario_android::gradle::{self, BuildRequest};
use vocario_android::preflight::{self, ReleaseInputs};
use vocario_android::signing::SigningConfig;
use vocario_android::variant::{BuildType, Variant};
use vocario_android::version;
use vocario_cli::output::{format_count, format_duration, format_size, Status};
use vocario_cli::{logging, progress};
use vocario_core::config::{Config, ProjectPaths};
use vocario_core::error::{exit_codes, Error};

#[derive(Parser)]
#[command(name = "vocario-android")]
#[command(about = "Release signing and artifact naming for Vocario Android")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Flutter project root
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show parsed signing credentials (passwords redacted)
    Credentials {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check release prerequisites for the given Gradle tasks
    Preflight {
        /// Requested task names
        #[arg(required = true)]
        tasks: Vec<String>,
    },

    /// Show which signing identity release builds will use
    Signing {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show application id, version and signing for a build type
    Variant {
        /// Build type: debug, release
        #[arg(long, default_value = "release")]
        build_type: String,
        /// Override the version code from pubspec.yaml
        #[arg(long)]
        version_code: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename the artifact a finished task produced
    Rename {
        /// Finished task: assembleRelease, bundleRelease
        #[arg(long)]
        task: String,
        /// Override the version code from pubspec.yaml
        #[arg(long)]
        version_code: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build project
    Build {
        /// Build configuration: debug, release
        #[arg(long, default_value = "debug")]
        configuration: String,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Clean before building
        #[arg(long)]
        clean: bool,
        /// Run checks and rename without invoking Gradle
        #[arg(long)]
        dry_run: bool,
        /// Override the version code from pubspec.yaml
        #[arg(long)]
        version_code: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List packaged artifacts in the build outputs
    Artifacts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose environment
    Doctor,
}

struct Context {
    config: Config,
    paths: ProjectPaths,
    verbose: u8,
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet);

    let config = match Config::load_in(&cli.project_dir, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => std::process::exit(report_error(&e)),
    };
    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    let ctx = Context {
        paths: config.resolve(&cli.project_dir),
        config,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let exit_code = match cli.command {
        Commands::Credentials { json } => run_credentials(&ctx, json),
        Commands::Preflight { tasks } => run_preflight(&ctx, &tasks),
        Commands::Signing { json } => run_signing(&ctx, json),
        Commands::Variant { build_type, version_code, json } => {
            run_variant(&ctx, &build_type, version_code, json)
        }
        Commands::Rename { task, version_code, json } => {
            run_rename(&ctx, &task, version_code, json)
        }
        Commands::Build { configuration, bundle, clean, dry_run, version_code, json } => {
            run_build(&ctx, &configuration, bundle, clean, dry_run, version_code, json)
        }
        Commands::Artifacts { json } => run_artifacts(&ctx, json),
        Commands::Doctor => run_doctor(&ctx),
    };

    std::process::exit(exit_code);
}

fn report_error(err: &Error) -> i32 {
    Status::error(&format!("[{}] {}", err.code, err.message));
    if let Some(context) = &err.context {
        for line in context.lines() {
            Status::hint(line);
        }
    }
    if let Some(suggestion) = &err.suggestion {
        Status::hint(suggestion);
    }
    err.exit_code()
}

fn fail(err: &Error, json: bool) -> i32 {
    if json {
        emit_json(&err.to_report());
        err.exit_code()
    } else {
        report_error(err)
    }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn emit_json<T: Serialize>(value: &T) -> i32 {
    match to_json(value) {
        Ok(text) => {
            println!("{}", text);
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("{:#}", e));
            exit_codes::FAILURE
        }
    }
}

fn load_signing(ctx: &Context) -> Result<(Credentials, SigningConfig), Error> {
    let credentials = Credentials::load(&ctx.paths.credentials_file)?;
    let signing = SigningConfig::select(&ctx.paths.keystore_file, &credentials);
    Ok((credentials, signing))
}

fn print_rename(outcome: &RenameOutcome) {
    match outcome {
        RenameOutcome::NotTriggered => {}
        RenameOutcome::Skipped { expected } => {
            Status::info(&format!("Nothing to rename at {}", expected.display()));
        }
        RenameOutcome::Renamed { kind, to, .. } => {
            let name = to
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Status::success(&format!("{} renamed to: {}", kind, name));
        }
        RenameOutcome::Failed { to, reason, .. } => {
            Status::warning(&format!("Could not rename to {}", to.display()));
            Status::hint(reason);
        }
    }
}

fn run_credentials(ctx: &Context, json: bool) -> i32 {
    let credentials = match Credentials::load(&ctx.paths.credentials_file) {
        Ok(c) => c,
        Err(e) => return fail(&e, json),
    };

    if json {
        let fields: serde_json::Map<String, serde_json::Value> = credentials
            .redacted()
            .into_iter()
            .map(|(field, value)| (field.key().to_string(), serde_json::Value::String(value)))
            .collect();
        return emit_json(&serde_json::json!({
            "path": ctx.paths.credentials_file,
            "exists": ctx.paths.credentials_file.exists(),
            "fields": fields,
        }));
    }

    Status::header("Credentials");
    Status::field("file", &ctx.paths.credentials_file.display().to_string());
    if credentials.is_empty() {
        Status::warning("No credentials found");
    }
    for (field, value) in credentials.redacted() {
        Status::field(field.key(), &value);
    }
    exit_codes::SUCCESS
}

fn run_preflight(ctx: &Context, tasks: &[String]) -> i32 {
    if !preflight::is_release_invocation(tasks) {
        Status::info("No release or bundle task requested, nothing to check");
        return exit_codes::SUCCESS;
    }

    let inputs = ReleaseInputs {
        keystore_file: &ctx.paths.keystore_file,
        credentials_file: &ctx.paths.credentials_file,
    };

    match preflight::check_prerequisites(&inputs, tasks) {
        Ok(()) => {
            Status::success("Release prerequisites present");
            exit_codes::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn run_signing(ctx: &Context, json: bool) -> i32 {
    let (credentials, signing) = match load_signing(ctx) {
        Ok(s) => s,
        Err(e) => return fail(&e, json),
    };

    if json {
        return emit_json(&signing);
    }

    Status::header("Release signing");
    match signing.identity() {
        Some(identity) => {
            Status::success("Release builds are signed with the upload keystore");
            Status::field("keystore", &identity.store_file.display().to_string());
            Status::field("key alias", &identity.key_alias);
        }
        None => {
            Status::warning("Release builds fall back to the debug signing identity");
            if !ctx.paths.keystore_file.exists() {
                Status::hint(&format!("Keystore missing: {}", ctx.paths.keystore_file.display()));
            }
            if credentials.is_empty() {
                Status::hint(&format!(
                    "No credentials in {}",
                    ctx.paths.credentials_file.display()
                ));
            }
        }
    }
    exit_codes::SUCCESS
}

fn run_variant(ctx: &Context, build_type: &str, version_code: Option<u32>, json: bool) -> i32 {
    let build_type: BuildType = match build_type.parse() {
        Ok(b) => b,
        Err(e) => return fail(&e, json),
    };

    let mut app_version = match version::read_pubspec_version(&ctx.paths.pubspec) {
        Ok(v) => v,
        Err(e) => return fail(&e, json),
    };
    if let Some(code) = version_code {
        app_version.code = code;
    }

    let signing = match load_signing(ctx) {
        Ok((_, s)) => s,
        Err(e) => return fail(&e, json),
    };

    let variant = Variant::resolve(build_type, &ctx.config.schema.app, &app_version, signing);

    if json {
        return emit_json(&variant);
    }

    Status::header(&format!("{} variant", variant.build_type));
    Status::field("application id", &variant.application_id);
    Status::field("version name", &variant.version_name);
    Status::field("version code", &variant.version_code.to_string());
    Status::field("signing", variant.signing.label());
    exit_codes::SUCCESS
}

fn run_rename(ctx: &Context, task: &str, version_code: Option<u32>, json: bool) -> i32 {
    if ArtifactKind::for_task(task).is_none() {
        if json {
            return emit_json(&RenameOutcome::NotTriggered);
        }
        Status::info(&format!("{} does not produce a renamable artifact", task));
        return exit_codes::SUCCESS;
    }

    let code = match version::version_code_for_task(task, version_code, &ctx.paths.pubspec) {
        Ok(c) => c,
        Err(e) => return fail(&e, json),
    };

    let outcome = artifact::rename_after_task(
        &ctx.paths.build_dir,
        task,
        &ctx.config.schema.app.name,
        code,
    );

    if json {
        return emit_json(&outcome);
    }
    print_rename(&outcome);
    exit_codes::SUCCESS
}

fn run_build(
    ctx: &Context,
    configuration: &str,
    bundle: bool,
    clean: bool,
    dry_run: bool,
    version_code: Option<u32>,
    json: bool,
) -> i32 {
    let build_type: BuildType = match configuration.parse() {
        Ok(b) => b,
        Err(e) => return fail(&e, json),
    };
    let kind = if bundle { ArtifactKind::Aab } else { ArtifactKind::Apk };
    let request = BuildRequest {
        paths: &ctx.paths,
        app_name: &ctx.config.schema.app.name,
        build_type,
        kind,
        version_code,
        clean,
        dry_run,
        stream_output: ctx.verbose > 0 && !json,
    };
    let task = request.task();

    let spinner = (!request.stream_output && !dry_run && !ctx.quiet && !json)
        .then(|| progress::spinner(&format!("Running {}...", task)));

    let started = Instant::now();
    let result = gradle::run_build(&request);

    if let Some(pb) = &spinner {
        progress::finish(pb);
    }

    match result {
        Ok(report) => {
            if json {
                return emit_json(&report);
            }
            Status::success(&format!(
                "{} finished in {} ({}-signed{})",
                task,
                format_duration(started.elapsed()),
                report.signing.label(),
                if dry_run { ", dry run" } else { "" }
            ));
            print_rename(&report.rename);
            exit_codes::SUCCESS
        }
        Err(e) => fail(&e, json),
    }
}

fn run_artifacts(ctx: &Context, json: bool) -> i32 {
    let files = artifact::list_artifacts(&ctx.paths.build_dir);

    if json {
        return emit_json(&files);
    }

    if files.is_empty() {
        Status::info(&format!(
            "No artifacts under {}",
            ctx.paths.build_dir.join("outputs").display()
        ));
        return exit_codes::SUCCESS;
    }

    Status::header(&format_count(files.len(), "artifact", "artifacts"));
    for file in &files {
        println!(
            "  {} {} {}",
            file.kind.to_string().bold(),
            file.path.display(),
            format!("({})", format_size(file.size)).dimmed()
        );
    }
    exit_codes::SUCCESS
}

fn run_doctor(ctx: &Context) -> i32 {
    use vocario_core::process::command_exists;

    println!("Environment Check");
    println!();

    let wrapper = ctx.paths.android_dir.join(gradle::gradle_wrapper());
    if wrapper.exists() {
        Status::success(&format!("gradle wrapper: {}", wrapper.display()));
    } else {
        Status::error(&format!("gradle wrapper: not found at {}", wrapper.display()));
    }

    if command_exists("java") {
        Status::success("java: installed");
    } else {
        Status::warning("java: not found");
    }

    if command_exists("flutter") {
        Status::success("flutter: installed");
    } else {
        Status::warning("flutter: not found");
    }

    match version::read_pubspec_version(&ctx.paths.pubspec) {
        Ok(v) => Status::success(&format!("version: {} ({})", v.name, v.code)),
        Err(e) => Status::warning(&format!("version: {}", e.message)),
    }

    if ctx.paths.keystore_file.exists() {
        Status::success("keystore: present");
    } else {
        Status::warning(&format!("keystore: missing at {}", ctx.paths.keystore_file.display()));
    }

    match load_signing(ctx) {
        Ok((credentials, signing)) => {
            if credentials.is_empty() {
                Status::warning("credentials: none found");
            } else {
                Status::success(&format!(
                    "credentials: {}",
                    format_count(credentials.len(), "field", "fields")
                ));
            }
            Status::info(&format!("release signing: {}", signing.label()));
        }
        Err(e) => Status::error(&format!("credentials: {}", e.message)),
    }

    exit_codes::SUCCESS
}
