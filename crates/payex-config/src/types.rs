//! Configuration types for the reconciler service.

use payex_types::GatewayKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Complete service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Service identity and HTTP settings
	pub service: ServiceSettings,
	/// Order store backend
	pub storage: StorageConfig,
	/// Event bus settings
	#[serde(default)]
	pub events: EventsConfig,
	/// Registered gateways, in resolution order
	#[serde(default)]
	pub gateways: Vec<GatewayConfig>,
}

impl Config {
	/// Gateways that are switched on, in declaration order.
	pub fn enabled_gateways(&self) -> impl Iterator<Item = &GatewayConfig> {
		self.gateways.iter().filter(|g| g.enabled)
	}
}

/// Service identity and HTTP settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
	/// Service name used in logs
	#[serde(default = "default_name")]
	pub name: String,
	/// Interface the HTTP API binds to
	#[serde(default = "default_host")]
	pub http_host: String,
	/// Port the HTTP API listens on
	#[serde(default = "default_port")]
	pub http_port: u16,
	/// Default log filter
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Order store backend selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Backend name, e.g. "memory" or "file"
	pub backend: String,
	/// Backend specific settings
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

/// Event bus settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
	/// Events buffered per subscriber before the oldest are dropped
	#[serde(default = "default_capacity")]
	pub capacity: usize,
}

impl Default for EventsConfig {
	fn default() -> Self {
		Self {
			capacity: default_capacity(),
		}
	}
}

/// A gateway registration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
	/// Payment method id the platform stores on orders
	pub id: String,
	/// PayEx product behind the gateway
	pub kind: GatewayKind,
	/// Client implementation, e.g. "px" or "static"
	pub implementation: String,
	#[serde(default = "default_true")]
	pub enabled: bool,
	/// Checkout fee, only honoured for invoice and factoring gateways
	#[serde(default)]
	pub fee: Decimal,
	#[serde(default)]
	pub fee_is_taxable: bool,
	#[serde(default)]
	pub fee_tax_class: String,
	/// Implementation specific settings
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

fn default_name() -> String {
	"payex-reconciler".to_string()
}

fn default_host() -> String {
	"0.0.0.0".to_string()
}

fn default_port() -> u16 {
	8080
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_capacity() -> usize {
	1000
}

fn default_true() -> bool {
	true
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::Table::new())
}
