use anyhow::{Context, Result};
use clap::Parser;
use payex_config::{Config, ConfigLoader};
use payex_core::ReconcilerBuilder;
use payex_service::alerts::run_alert_listener;
use payex_service::api;
use payex_service::cli::{Cli, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

	let log_level = cli
		.log_level
		.clone()
		.unwrap_or_else(|| config.service.log_level.clone());
	setup_tracing(&log_level)?;

	match cli.command {
		Some(Command::Start) | None => start_service(config).await,
		Some(Command::Validate) => validate_config(config),
	}
}

async fn start_service(config: Config) -> Result<()> {
	info!("Starting {}", config.service.name);

	let reconciler = ReconcilerBuilder::new(config.clone())
		.with_default_factories()
		.build()
		.context("Failed to build reconciler")?;
	let reconciler = Arc::new(reconciler);

	let alerts_handle = tokio::spawn(run_alert_listener(reconciler.event_bus().subscribe()));

	let host = config.service.http_host.clone();
	let port = config.service.http_port;
	let http_reconciler = reconciler.clone();
	let http_handle =
		tokio::spawn(async move { api::start_http_server(http_reconciler, host, port).await });

	info!("{} started", config.service.name);

	tokio::select! {
		_ = setup_shutdown_signal() => {
			info!("Shutdown signal received, stopping services...");
		}
		result = http_handle => {
			match result {
				Ok(Err(e)) => error!("HTTP server failed: {:#}", e),
				Err(e) => error!("HTTP server task panicked: {}", e),
				Ok(Ok(())) => {}
			}
		}
	}

	alerts_handle.abort();

	info!("{} stopped", config.service.name);
	Ok(())
}

fn validate_config(config: Config) -> Result<()> {
	ReconcilerBuilder::new(config.clone())
		.with_default_factories()
		.build()
		.context("Configuration is invalid")?;

	info!("Configuration is valid");
	info!("Service name: {}", config.service.name);
	info!("Storage backend: {}", config.storage.backend);
	info!("Enabled gateways:");
	for gateway in config.enabled_gateways() {
		info!("  {} ({}, {})", gateway.id, gateway.kind, gateway.implementation);
	}

	Ok(())
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.try_init()
		.context("Failed to install tracing subscriber")?;

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			error!("Failed to listen for Ctrl+C: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				error!("Failed to install SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
