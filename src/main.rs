//! renovate-datasource - Renovate custom datasource generator CLI
//!
//! Commands:
//! - `generate k3s|redhat-catalog`: print or write one manifest
//! - `provider redhat-docker`: write one file per repository
//! - `all-providers`: run every registered provider
//! - `list-providers`: show registered provider names

use clap::Parser;
use renovate_datasource::batch::BatchRunner;
use renovate_datasource::cli::{CliArgs, Command, GenerateCommand, ProviderCommand};
use renovate_datasource::config::Config;
use renovate_datasource::error::DatasourceError;
use renovate_datasource::http::HttpClient;
use renovate_datasource::output::{emit, to_json_string, TextFormatter};
use renovate_datasource::pipeline::GenerateManifest;
use renovate_datasource::provider::{
    generate_output, FetchOptions, K3sProvider, Provider, RedHatCatalogProvider,
    RedHatDockerConfig, RedHatDockerProvider,
};
use renovate_datasource::registry::ProviderRegistry;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = args.config();
    match run(args.command, &config).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            report_error(&e, config.verbose);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise info when verbose, warn when not
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// Print a failure; domain errors and unexpected ones are labelled apart
fn report_error(err: &anyhow::Error, verbose: bool) {
    let formatter = TextFormatter::with_color(io::stderr().is_terminal());
    let label = if err.downcast_ref::<DatasourceError>().is_some() {
        "Error"
    } else {
        "Unexpected error"
    };

    let mut stderr = io::stderr().lock();
    let _ = formatter.format_error(label, &err.to_string(), &mut stderr);
    if verbose {
        for cause in err.chain().skip(1) {
            let _ = writeln!(stderr, "  caused by: {}", cause);
        }
    }
}

async fn run(command: Command, config: &Config) -> anyhow::Result<ExitCode> {
    match command {
        Command::Generate { provider } => generate(provider, config).await,
        Command::Provider { provider } => run_provider(provider, config).await,
        Command::AllProviders => {
            let registry = ProviderRegistry::with_builtin_providers()?;
            all_providers(&registry, config).await
        }
        Command::ListProviders => {
            let registry = ProviderRegistry::with_builtin_providers()?;
            list_providers(&registry)
        }
    }
}

/// Generate one manifest and write it to a file or stdout
async fn generate(command: GenerateCommand, config: &Config) -> anyhow::Result<ExitCode> {
    let client = HttpClient::with_timeout(config.timeout)?;
    let (provider, output): (Box<dyn Provider>, Option<PathBuf>) = match command {
        GenerateCommand::K3s {
            include_prereleases,
            output,
        } => (
            Box::new(K3sProvider::new(client, include_prereleases)) as Box<dyn Provider>,
            output,
        ),
        GenerateCommand::RedhatCatalog {
            image_path,
            registry,
            output,
        } => (
            Box::new(RedHatCatalogProvider::new(client, image_path, registry)) as Box<dyn Provider>,
            output,
        ),
    };

    tracing::info!(provider = provider.name(), "generating manifest");
    let manifest = GenerateManifest::new(provider.as_ref()).execute().await?;
    let content = to_json_string(&manifest, config.indent)?;

    let mut stdout = io::stdout().lock();
    emit(&content, output.as_deref(), &mut stdout)?;
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// Run one batch provider with the given repositories
async fn run_provider(command: ProviderCommand, config: &Config) -> anyhow::Result<ExitCode> {
    let provider_config = config.provider_config();
    match command {
        ProviderCommand::RedhatDocker { repositories } => {
            let provider =
                RedHatDockerProvider::new(RedHatDockerConfig::new(provider_config.clone()))?;
            let options = FetchOptions::with_targets(repositories);
            let written = generate_output(&provider, &provider_config, &options).await?;
            tracing::info!(
                files = written.len(),
                output_dir = %provider_config.output_dir.display(),
                "redhat-docker finished"
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Run every registered provider and print the summary
async fn all_providers(registry: &ProviderRegistry, config: &Config) -> anyhow::Result<ExitCode> {
    if registry.is_empty() {
        tracing::warn!("no providers registered");
        return Ok(ExitCode::SUCCESS);
    }

    let summary = BatchRunner::new(registry, config.provider_config())
        .with_progress(config.show_progress())
        .run()
        .await;

    let mut stdout = io::stdout().lock();
    TextFormatter::with_color(io::stdout().is_terminal()).format_summary(&summary, &mut stdout)?;
    stdout.flush()?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn list_providers(registry: &ProviderRegistry) -> anyhow::Result<ExitCode> {
    let names = registry.list_names();
    if names.is_empty() {
        tracing::warn!("no providers registered");
        return Ok(ExitCode::SUCCESS);
    }

    tracing::info!(count = names.len(), "registered providers");
    let mut stdout = io::stdout().lock();
    TextFormatter::with_color(io::stdout().is_terminal()).format_provider_list(&names, &mut stdout)?;
    Ok(ExitCode::SUCCESS)
}
