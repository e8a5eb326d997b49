mod cli;

use javscraper::config;
use javscraper::metadata::{MetadataRequest, MetadataService, ProviderOutcome, ReferenceToken};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use serde_json::json;
use std::path::Path;
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "javscraper=trace,javscraper_parser=debug,javscraper_common=debug".to_string()
        } else {
            "javscraper=info".to_string()
        }
    });

    // Logs go to stderr so --json output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search { name, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(search(&name, cli.config.as_deref(), json))
        }
        Commands::Fetch { name, token, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(fetch(name, token.as_deref(), cli.config.as_deref(), json))
        }
        Commands::Providers { json } => list_providers(cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("javscraper {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_service(config_path: Option<&Path>) -> Result<MetadataService> {
    let config = config::load_config_or_default(config_path)?;
    let (service, skipped) = MetadataService::from_config(config)?;
    for s in &skipped {
        tracing::debug!(provider = %s.name, reason = %s.reason, "Provider unavailable");
    }
    if service.registry().is_empty() {
        tracing::warn!("No metadata providers available; configure [[providers.json_api]] or [[providers.local]]");
    }
    Ok(service)
}

/// Request-wide cancellation token, cancelled on Ctrl-C.
fn request_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling provider queries");
            on_signal.cancel();
        }
    });
    cancel
}

async fn search(name: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let service = build_service(config_path)?;
    let cancel = request_token();

    let report = service.search_report(name, &cancel).await;
    let hits: Vec<_> = report
        .as_ref()
        .map(|r| r.records.iter().cloned().map(|rec| service.search_hit(rec)).collect())
        .unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    match report {
        None => println!("'{}' is not a recognizable identifier; nothing searched", name),
        Some(report) => {
            for p in &report.providers {
                let marker = match p.outcome {
                    ProviderOutcome::Found(_) => "✓",
                    ProviderOutcome::Empty => "-",
                    _ => "✗",
                };
                println!("{} {}: {}", marker, p.provider, p.outcome);
            }
            println!();
        }
    }

    if hits.is_empty() {
        println!("No results.");
    }
    for (i, hit) in hits.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, hit.name, hit.provider);
        if let Some(date) = hit.premiere_date {
            println!("   Released: {}", date);
        } else if let Some(year) = hit.production_year {
            println!("   Year: {}", year);
        }
        if let Some(ref url) = hit.image_url {
            println!("   Cover: {}", url);
        }
        println!("   Token: {}", hit.token);
    }

    Ok(())
}

async fn fetch(
    name: Option<String>,
    token: Option<&str>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let token = token
        .map(ReferenceToken::decode)
        .transpose()
        .context("Failed to decode --token")?;

    let service = build_service(config_path)?;
    let cancel = request_token();
    let request = MetadataRequest {
        name: name.unwrap_or_default(),
        token,
    };

    let Some(result) = service.get_metadata(&request, &cancel).await else {
        if json {
            println!("null");
        } else {
            println!("No metadata found.");
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", result.name);
    println!("  Provider: {}", result.provider);
    println!("  Original title: {}", result.original_title);
    if let Some(date) = result.premiere_date {
        println!("  Released: {}", date);
    }
    if let Some(ref set) = result.collection_name {
        println!("  Collection: {}", set);
    }
    if !result.studios.is_empty() {
        println!("  Studios: {}", result.studios.join(", "));
    }
    if !result.genres.is_empty() {
        println!("  Genres: {}", result.genres.join(", "));
    }
    for person in &result.people {
        println!("  {:?}: {}", person.kind, person.name);
    }
    if let Some(ref overview) = result.overview {
        println!("\n{}\n", overview);
    }
    println!("  Token: {}", result.token);

    Ok(())
}

fn list_providers(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let enabled = config.providers.enabled.clone();
    let (service, skipped) = MetadataService::from_config(config)?;
    let registry = service.registry();

    if json {
        let output = json!({
            "registered": registry.names(),
            "enabled": registry.enabled(&enabled).iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
            "skipped": skipped.iter().map(|s| json!({
                "name": s.name,
                "kind": s.kind,
                "reason": s.reason.to_string(),
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Providers (priority order):\n");
    if registry.is_empty() {
        println!("  (none)");
    }
    for (i, name) in registry.names().iter().enumerate() {
        let active = enabled.is_empty() || enabled.iter().any(|e| e == name);
        println!(
            "  {}. {}{}",
            i + 1,
            name,
            if active { "" } else { " [disabled]" }
        );
    }

    if !skipped.is_empty() {
        println!("\nSkipped:");
        for s in &skipped {
            println!("  ✗ {} ({}): {}", s.name, s.kind, s.reason);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            config::validate_config(&config)?;
            config
        }
    };

    println!("✓ Configuration is valid");
    println!("  Provider timeout: {}s", config.providers.timeout_secs);
    println!("  JSON API providers: {}", config.providers.json_api.len());
    println!("  Local providers: {}", config.providers.local.len());
    if config.providers.enabled.is_empty() {
        println!("  Enabled: all");
    } else {
        println!("  Enabled: {}", config.providers.enabled.join(", "));
    }
    println!(
        "  Cache: {}",
        if config.cache.enabled {
            config.cache.path.display().to_string()
        } else {
            "disabled".to_string()
        }
    );
    println!(
        "  Title format: {}",
        if config.metadata.title_format.is_empty() {
            "%num% %title%"
        } else {
            config.metadata.title_format.as_str()
        }
    );

    Ok(())
}
