use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use kindload::cluster;
use kindload::command::{CommandRunner, ProcessRunner};
use kindload::domain::{BuildOutput, BuiltTags};
use kindload::inventory::InventoryResolver;
use kindload::kubectl::KubectlCli;
use kindload::transfer::KindCli;
use kindload::{ImageLoader, KindLoadError};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kindload")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("kindload.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    let mut builder = env_logger::Builder::new();
    if let Some(level) = &config.log_level {
        builder.parse_filters(level);
    }
    builder
        .parse_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn runner(config: &Config) -> Arc<dyn CommandRunner> {
    Arc::new(ProcessRunner::new().timeout_ms(config.commands.timeout_ms))
}

/// The --kube-context flag, falling back to the configured context
fn select_kube_context(flag: Option<String>, config: &Config) -> Option<String> {
    flag.or_else(|| config.kubectl.context.clone())
}

fn kubectl(config: &Config, runner: Arc<dyn CommandRunner>, kube_context: Option<String>) -> KubectlCli {
    KubectlCli::new(runner)
        .binary(config.kubectl.binary.as_str())
        .kube_context(kube_context)
}

/// Close any pending progress line and report an interrupted load
fn report_cancelled(out: &mut dyn Write, elapsed: Duration) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Cancelled".red())?;
    writeln!(out, "Images loaded in {:?}", elapsed)?;
    out.flush()
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Load {
            artifacts,
            built_tags,
            built,
            cluster,
            kube_context,
        } => {
            handle_load_command(
                artifacts,
                built_tags.as_deref(),
                built,
                cluster.clone(),
                kube_context.clone(),
                config,
            )
            .await
        }
        Commands::Inventory { kube_context } => handle_inventory_command(kube_context.clone(), config).await,
        Commands::Detect { kube_context } => handle_detect_command(kube_context.clone(), config).await,
    }
}

fn read_built_tags(artifacts: &BuildOutput, built_tags: Option<&Path>, built: &[String]) -> Result<BuiltTags> {
    if built_tags.is_none() && built.is_empty() {
        info!("No built tags given, treating every artifact as built");
        return Ok(BuiltTags::from_artifacts(&artifacts.builds));
    }

    let mut tags = match built_tags {
        Some(path) => {
            let output = BuildOutput::from_file(path)
                .context(format!("Failed to read built tags from {}", path.display()))?;
            BuiltTags::from_artifacts(&output.builds)
        }
        None => BuiltTags::new(),
    };
    for tag in built {
        tags.insert(tag.as_str());
    }
    Ok(tags)
}

/// Cluster flag, then config, then the kube context
async fn resolve_cluster_name(cluster: Option<String>, config: &Config, kubectl: &KubectlCli, kube_context: Option<&str>) -> Result<String> {
    if let Some(name) = cluster.or_else(|| config.kind.cluster.clone()) {
        return Ok(name);
    }

    let context = match kube_context {
        Some(context) => context.to_string(),
        None => kubectl
            .current_context()
            .await
            .context("Failed to read the current kube context")?,
    };

    cluster::detect(&context)
        .map(str::to_string)
        .ok_or_else(|| eyre!("Kube context {:?} is not a kind cluster; pass --cluster", context))
}

async fn handle_load_command(
    artifacts: &Path,
    built_tags: Option<&Path>,
    built: &[String],
    cluster: Option<String>,
    kube_context: Option<String>,
    config: &Config,
) -> Result<()> {
    if config.kind.disable_load {
        println!("{}", "Loading images into kind is disabled".yellow());
        return Ok(());
    }

    let output = BuildOutput::from_file(artifacts)
        .context(format!("Failed to read artifacts from {}", artifacts.display()))?;
    let built = read_built_tags(&output, built_tags, built)?;

    let runner = runner(config);
    let kube_context = select_kube_context(kube_context, config);
    let kubectl = kubectl(config, runner.clone(), kube_context.clone());
    let cluster_name = resolve_cluster_name(cluster, config, &kubectl, kube_context.as_deref()).await?;
    info!("Loading into kind cluster {}", cluster_name);

    let kind = KindCli::new(runner).binary(config.kind.binary.as_str());
    let loader = ImageLoader::new(kubectl, kind);

    println!("Loading images into kind cluster nodes...");
    let start = Instant::now();
    let mut stdout = std::io::stdout();
    let report = tokio::select! {
        result = loader.load_images(&output.builds, &built, &cluster_name, &mut stdout) => result?,
        _ = tokio::signal::ctrl_c() => {
            report_cancelled(&mut std::io::stdout(), start.elapsed())?;
            return Err(KindLoadError::Cancelled.into());
        }
    };

    info!(
        "Loaded {} images, {} already present",
        report.loaded().len(),
        report.found().len()
    );
    Ok(())
}

async fn handle_inventory_command(kube_context: Option<String>, config: &Config) -> Result<()> {
    let kubectl = kubectl(config, runner(config), select_kube_context(kube_context, config));
    let inventory = kubectl.resolve().await?;
    for image in inventory.sorted() {
        println!("{}", image);
    }
    Ok(())
}

async fn handle_detect_command(kube_context: Option<String>, config: &Config) -> Result<()> {
    let kube_context = select_kube_context(kube_context, config);
    let kubectl = kubectl(config, runner(config), kube_context.clone());
    let context = match kube_context {
        Some(context) => context,
        None => kubectl.current_context().await?,
    };

    match cluster::detect(&context) {
        Some(name) => println!("{}", name),
        None => return Err(eyre!("Kube context {:?} is not a kind cluster", context)),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the configured level is known
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
