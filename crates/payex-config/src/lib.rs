//! Configuration loading for the reconciler service.
//!
//! Configuration is read from a TOML file. `${VAR}` references are replaced
//! with environment variables before parsing, a handful of settings can be
//! overridden through prefixed environment variables, and the result is
//! validated before it is handed to the service.

use regex::Regex;
use std::collections::HashSet;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "PAYEX_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<Config, ConfigError> {
		let file_path = self
			.file_path
			.as_ref()
			.ok_or_else(|| ConfigError::FileNotFound("No configuration file specified".to_string()))?;

		let content = match tokio::fs::read_to_string(file_path).await {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(ConfigError::FileNotFound(file_path.clone()))
			}
			Err(e) => return Err(e.into()),
		};

		let mut config = Self::parse(&substitute_env_vars(&content)?)?;
		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	/// Parses and validates configuration from a TOML string, without
	/// environment substitution or overrides.
	pub fn from_toml(content: &str) -> Result<Config, ConfigError> {
		let config = Self::parse(content)?;
		validate_config(&config)?;
		Ok(config)
	}

	fn parse(content: &str) -> Result<Config, ConfigError> {
		toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
	}

	fn apply_env_overrides(&self, config: &mut Config) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.service.log_level = log_level;
		}

		if let Ok(host) = env::var(format!("{}HTTP_HOST", self.env_prefix)) {
			config.service.http_host = host;
		}

		if let Ok(http_port) = env::var(format!("{}HTTP_PORT", self.env_prefix)) {
			config.service.http_port = http_port
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid HTTP port: {}", e)))?;
		}

		Ok(())
	}
}

/// Replaces `${VAR_NAME}` references with the variable's value.
fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;
	let mut result = content.to_string();

	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let env_value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

		result = result.replace(full_match, &env_value);
	}

	Ok(result)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
	if config.service.http_port == 0 {
		return Err(ConfigError::ValidationError(
			"service.http_port must be non-zero".to_string(),
		));
	}

	if config.events.capacity == 0 {
		return Err(ConfigError::ValidationError(
			"events.capacity must be at least 1".to_string(),
		));
	}

	if config.storage.backend.trim().is_empty() {
		return Err(ConfigError::ValidationError(
			"storage.backend must be set".to_string(),
		));
	}

	let mut seen = HashSet::new();
	for gateway in config.enabled_gateways() {
		if gateway.id.trim().is_empty() {
			return Err(ConfigError::ValidationError(
				"Gateway id must not be empty".to_string(),
			));
		}
		if !seen.insert(gateway.id.as_str()) {
			return Err(ConfigError::ValidationError(format!(
				"Gateway '{}' is registered more than once",
				gateway.id
			)));
		}
		if !gateway.fee.is_zero() && gateway.kind.fee_title().is_none() {
			warn!(
				gateway = %gateway.id,
				kind = %gateway.kind,
				"Fee configured on a gateway kind that does not charge fees; ignoring"
			);
		}
	}

	if seen.is_empty() {
		return Err(ConfigError::ValidationError(
			"At least one gateway must be enabled".to_string(),
		));
	}

	Ok(())
}
