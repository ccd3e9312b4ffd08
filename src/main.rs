mod cli;

use cli::Args;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process;
use topology_transform::adapters::outbound::console::StderrProgressReporter;
use topology_transform::adapters::outbound::environment::PathToolLocator;
use topology_transform::adapters::outbound::filesystem::{
    FileSystemAccessFactory, YamlModelReader,
};
use topology_transform::application::dto::{TransformationRequest, TransformationResponse};
use topology_transform::application::factories::BackendRegistry;
use topology_transform::application::use_cases::TransformModelUseCase;
use topology_transform::config::{discover_config, load_config_from_path, ConfigFile};
use topology_transform::ports::inbound::TransformationPort;
use topology_transform::shared::error::ExitCode;
use topology_transform::shared::Result;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT_DIR: &str = "output";

fn main() {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::TransformationFailed.as_i32());
        }
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug output
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let registry = BackendRegistry::with_defaults();
    if args.list_targets {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(ExitCode::Success);
    }

    let Some(model_path) = args.model.clone() else {
        anyhow::bail!("No model given.\n\n💡 Hint: Pass the model file with -m <model.yml>");
    };
    let config = load_config(&args, &model_path)?;
    let request = build_request(args, model_path, config)?;
    tracing::debug!(?request, "resolved transformation request");

    // Create adapters (Dependency Injection)
    let use_case = TransformModelUseCase::new(
        YamlModelReader::new(),
        FileSystemAccessFactory::new(request.source_dir.clone(), request.output_dir.clone()),
        PathToolLocator::new(),
        StderrProgressReporter::new(),
        registry,
    );

    let output_dir = request.output_dir.clone();
    let response = use_case.transform(request)?;
    print_summary(&response, &output_dir);

    if response.all_succeeded() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::TransformationFailed)
    }
}

/// An explicit `--config` must exist; otherwise look next to the model
fn load_config(args: &Args, model_path: &Path) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        return load_config_from_path(path);
    }
    let model_dir = model_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(discover_config(model_dir)?.unwrap_or_default())
}

/// Command-line flags override config values
fn build_request(
    args: Args,
    model_path: PathBuf,
    config: ConfigFile,
) -> Result<TransformationRequest> {
    let backend_options = config.backend_options();
    let targets = if args.targets.is_empty() {
        config.targets.unwrap_or_default()
    } else {
        args.targets
    };
    if targets.is_empty() {
        anyhow::bail!(
            "No targets requested.\n\n💡 Hint: Pass -t <target> or list targets in the config file (see --list-targets)"
        );
    }
    let output_dir = args
        .output
        .or(config.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut request = TransformationRequest::new(model_path, output_dir, targets)
        .with_verify_tools(args.verify_tools || config.verify_tools.unwrap_or(false))
        .with_backend_options(backend_options);
    if let Some(source_dir) = args.source.or(config.source_dir) {
        request = request.with_source_dir(source_dir);
    }
    Ok(request)
}

fn print_summary(response: &TransformationResponse, output_dir: &Path) {
    for outcome in &response.outcomes {
        match &outcome.error {
            None => println!(
                "{} {}: {} file(s) in {}{}",
                "✅".green(),
                outcome.target.bold(),
                outcome.written_files.len(),
                output_dir.join(&outcome.target).display(),
                outcome
                    .elapsed()
                    .map(|d| format!(" ({} ms)", d.num_milliseconds()))
                    .unwrap_or_default()
            ),
            Some(error) => println!("{} {}: {}", "❌".red(), outcome.target.bold(), error),
        }
    }
}
