//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "payex-reconciler")]
#[command(about = "Captures and cancels authorized PayEx transactions", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
	/// Path to configuration file
	#[arg(short, long, value_name = "FILE", env = "PAYEX_CONFIG", default_value = "config/local.toml")]
	pub config: PathBuf,

	/// Log level override (trace, debug, info, warn, error)
	#[arg(short, long, env = "PAYEX_LOG_LEVEL")]
	pub log_level: Option<String>,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
	/// Start the reconciler service
	Start,
	/// Validate the configuration file and exit
	Validate,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_to_start() {
		let cli = Cli::try_parse_from(["payex-reconciler"]).unwrap();
		assert_eq!(cli.command, None);
		assert_eq!(cli.config, PathBuf::from("config/local.toml"));
	}

	#[test]
	fn test_validate_with_config() {
		let cli = Cli::try_parse_from([
			"payex-reconciler",
			"--config",
			"prod.toml",
			"--log-level",
			"debug",
			"validate",
		])
		.unwrap();
		assert_eq!(cli.command, Some(Command::Validate));
		assert_eq!(cli.config, PathBuf::from("prod.toml"));
		assert_eq!(cli.log_level.as_deref(), Some("debug"));
	}
}
