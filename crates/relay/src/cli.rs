//! Command line interface
//!
//! | Command | Description |
//! |---------|-------------|
//! | `relay generate <PROMPT>` | Route one prompt through the fallback chain |
//! | `relay health [--probe]` | Per-provider health summary |
//! | `relay providers` | Configured priority order and registered backends |
//! | `relay check` | Validate configuration and credentials without network calls |
//! | `relay watch` | Stream routing events as JSON lines while probing |

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use relay_domain::error::RoutingError;
use relay_domain::value_objects::GenerationResponse;
use relay_infrastructure::config::loader::validate_app_config;
use relay_infrastructure::config::{
    AppConfig, ConfigLoader, CredentialResolver, validate_providers,
};
use relay_infrastructure::logging::init_logging;
use relay_infrastructure::{Relay, init_relay};
use tracing::info;

/// Command line interface for relay
#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(about = "Multi-provider LLM failover router with health monitoring")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Route one prompt through the fallback chain
    Generate {
        /// User prompt
        prompt: String,

        /// System prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Provider to try first regardless of its health
        #[arg(short, long)]
        provider: Option<String>,

        /// Overall deadline (e.g. `30s`, `2m`); defaults to the configured one
        #[arg(short, long, value_parser = humantime::parse_duration)]
        deadline: Option<Duration>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-provider health
    Health {
        /// Probe every provider once before reporting
        #[arg(long)]
        probe: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured providers in priority order
    Providers,

    /// Validate configuration and credentials
    Check,

    /// Stream routing events as JSON lines
    Watch {
        /// Stop after this long (runs until Ctrl-C otherwise)
        #[arg(long, value_parser = humantime::parse_duration)]
        duration: Option<Duration>,
    },
}

/// Load configuration, install logging and run the command
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;
    init_logging(config.logging.clone()).context("Failed to initialize logging")?;

    // One-shot commands probe explicitly or not at all
    if !matches!(cli.command, Command::Watch { .. }) {
        config.health.probe_enabled = false;
    }

    let stdout = std::io::stdout();
    execute(cli.command, config, &mut stdout.lock()).await
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load().context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    Ok(config)
}

/// Run `command` against `config`, writing results to `out`
pub async fn execute<W: Write>(command: Command, config: AppConfig, out: &mut W) -> Result<()> {
    match command {
        Command::Generate {
            prompt,
            system,
            provider,
            deadline,
            json,
        } => {
            let relay = init_relay(config).await?;
            let mut request = relay.request(prompt);
            if let Some(system) = system {
                request = request.with_system_prompt(system);
            }
            if let Some(provider) = provider {
                request = request.with_provider_override(provider);
            }
            if let Some(deadline) = deadline {
                request = request.with_timeout(deadline);
            }

            let outcome = relay.router().generate(request).await;
            relay.shutdown().await;
            match outcome {
                Ok(response) => print_response(&response, json, out),
                Err(error) => {
                    print_routing_error(&error, out)?;
                    bail!("request failed: {error}")
                }
            }
        }
        Command::Health { probe, json } => {
            let relay = init_relay(config).await?;
            if probe {
                let report = relay.monitor().probe_once().await;
                info!(
                    probed = report.probed,
                    succeeded = report.succeeded,
                    "Probe cycle finished in {}",
                    short(report.duration)
                );
            }
            print_health(&relay, json, out)?;
            relay.shutdown().await;
            Ok(())
        }
        Command::Providers => {
            let relay = init_relay(config).await?;
            print_providers(&relay, out)?;
            relay.shutdown().await;
            Ok(())
        }
        Command::Check => check(&config, out),
        Command::Watch { duration } => {
            let relay = init_relay(config).await?;
            watch(&relay, duration, out).await?;
            relay.shutdown().await;
            Ok(())
        }
    }
}

fn print_response<W: Write>(response: &GenerationResponse, json: bool, out: &mut W) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(response)?)?;
        return Ok(());
    }
    writeln!(out, "{}", response.content)?;
    writeln!(
        out,
        "-- {} ({}/{}) in {} via {}",
        response.provider.name,
        response.provider.backend_kind,
        response.provider.model_id,
        short(response.latency),
        response.fallback_chain_used.join(" -> ")
    )?;
    Ok(())
}

fn print_routing_error<W: Write>(error: &RoutingError, out: &mut W) -> Result<()> {
    let Some(aggregate) = error.aggregate() else {
        writeln!(out, "{error}")?;
        return Ok(());
    };
    if aggregate.is_empty() {
        writeln!(out, "no provider was attempted before the deadline")?;
    }
    for failure in &aggregate.failures {
        writeln!(
            out,
            "{:<16} {:<20} {}",
            failure.provider, failure.kind, failure.message
        )?;
    }
    if aggregate.deadline_exceeded {
        writeln!(out, "deadline exceeded")?;
    }
    Ok(())
}

fn print_health<W: Write>(relay: &Relay, json: bool, out: &mut W) -> Result<()> {
    let summary = relay.router().get_health_summary();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }
    writeln!(out, "{:<16} {:<10} {:>8} {:>14}  LAST ERROR", "PROVIDER", "STATUS", "FAILURES", "LAST CHECK")?;
    for (name, entry) in &summary {
        let age = entry
            .last_check_age
            .map_or_else(|| "never".to_string(), |age| format!("{} ago", short(age)));
        writeln!(
            out,
            "{:<16} {:<10} {:>8} {:>14}  {}",
            name,
            entry.status,
            entry.consecutive_failures,
            age,
            entry.last_error.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

fn print_providers<W: Write>(relay: &Relay, out: &mut W) -> Result<()> {
    let identities = relay.router().identities();
    for (rank, name) in relay.router().priority_order().iter().enumerate() {
        if let Some(identity) = identities.iter().find(|i| &i.name == name) {
            writeln!(
                out,
                "{}. {} ({}/{})",
                rank + 1,
                identity.name,
                identity.backend_kind,
                identity.model_id
            )?;
        }
    }
    for dropped in relay.dropped() {
        writeln!(out, "   {} dropped: {}", dropped.name, dropped.reason)?;
    }
    let backends: Vec<String> = relay_providers::list_providers()
        .into_iter()
        .map(|(kind, _)| kind.to_string())
        .collect();
    writeln!(out, "backends: {}", backends.join(", "))?;
    Ok(())
}

fn check<W: Write>(config: &AppConfig, out: &mut W) -> Result<()> {
    validate_app_config(config)?;
    let set = validate_providers(&config.providers, &CredentialResolver::from_env())?;
    for provider in &set.configs {
        writeln!(
            out,
            "ok       {} ({}/{}) priority={} timeout={}{}",
            provider.name(),
            provider.backend_kind(),
            provider.identity.model_id,
            provider.priority,
            short(provider.timeout),
            provider
                .credential_ref
                .as_deref()
                .map(|r| format!(" credential={r}"))
                .unwrap_or_default()
        )?;
    }
    for dropped in &set.dropped {
        writeln!(out, "dropped  {}: {}", dropped.name, dropped.reason)?;
    }
    Ok(())
}

async fn watch<W: Write>(relay: &Relay, duration: Option<Duration>, out: &mut W) -> Result<()> {
    let mut events = relay.subscribe_stream();
    let stop = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    };
    tokio::pin!(stop);

    loop {
        tokio::select! {
            () = &mut stop => break,
            event = events.next() => match event {
                Some(event) => {
                    writeln!(out, "{}", serde_json::to_string(&event)?)?;
                    out.flush()?;
                }
                None => break,
            },
        }
    }
    Ok(())
}

/// Duration rounded to milliseconds for display
fn short(duration: Duration) -> humantime::FormattedDuration {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    humantime::format_duration(Duration::from_millis(millis))
}
