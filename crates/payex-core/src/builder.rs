use crate::{EventBus, ReconcileError, Reconciler};
use payex_config::Config;
use payex_gateway::{
	FeeSettings, GatewayError, GatewayInterface, GatewayService, RegisteredGateway,
};
use payex_storage::{OrderStoreInterface, OrderStoreService, StorageError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

// Type aliases for factory functions
type StoreFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError> + Send>;
type GatewayFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn GatewayInterface>, GatewayError> + Send>;

/// Assembles a [`Reconciler`] from configuration.
///
/// Storage backends and gateway clients are looked up by the names used in
/// the configuration (`storage.backend`, `gateways[].implementation`).
pub struct ReconcilerBuilder {
	config: Config,
	store_factories: HashMap<String, StoreFactory>,
	gateway_factories: HashMap<String, GatewayFactory>,
}

impl ReconcilerBuilder {
	/// Starts a builder with no factories registered.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			store_factories: HashMap::new(),
			gateway_factories: HashMap::new(),
		}
	}

	/// Registers a store factory under the `storage.backend` name it serves.
	pub fn with_store_factory<F>(mut self, name: &str, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError> + Send + 'static,
	{
		self.store_factories
			.insert(name.to_string(), Box::new(factory));
		self
	}

	/// Registers a gateway factory under an `implementation` name.
	///
	/// A later registration under the same name replaces the earlier one.
	pub fn with_gateway_factory<F>(mut self, name: &str, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn GatewayInterface>, GatewayError> + Send + 'static,
	{
		self.gateway_factories
			.insert(name.to_string(), Box::new(factory));
		self
	}

	/// Registers the bundled backends: `memory` and `file` stores, `px` and
	/// `static` gateways.
	pub fn with_default_factories(self) -> Self {
		use payex_gateway::implementations::{px, stub};
		use payex_storage::implementations::{file, memory};

		self.with_store_factory("memory", memory::create_store)
			.with_store_factory("file", file::create_store)
			.with_gateway_factory("px", px::create_gateway)
			.with_gateway_factory("static", stub::create_gateway)
	}

	pub fn build(self) -> Result<Reconciler, ReconcileError> {
		let storage = &self.config.storage;
		let factory = self.store_factories.get(&storage.backend).ok_or_else(|| {
			ReconcileError::Config(format!("Unknown storage backend '{}'", storage.backend))
		})?;
		let store = Arc::new(OrderStoreService::new(factory(&storage.config)?));

		let mut gateways = GatewayService::default();
		for gateway in self.config.enabled_gateways() {
			let factory = self
				.gateway_factories
				.get(&gateway.implementation)
				.ok_or_else(|| {
					ReconcileError::Config(format!(
						"Unknown implementation '{}' for gateway '{}'",
						gateway.implementation, gateway.id
					))
				})?;
			let client = factory(&gateway.config).map_err(|e| {
				ReconcileError::Config(format!("Gateway '{}': {}", gateway.id, e))
			})?;

			info!(
				gateway = %gateway.id,
				kind = %gateway.kind,
				implementation = %gateway.implementation,
				"Registered gateway"
			);
			gateways.register(
				RegisteredGateway::new(gateway.id.clone(), gateway.kind, Arc::from(client)).with_fee(
					FeeSettings {
						amount: gateway.fee,
						taxable: gateway.fee_is_taxable,
						tax_class: gateway.fee_tax_class.clone(),
					},
				),
			);
		}

		if gateways.is_empty() {
			return Err(ReconcileError::Config("No gateways configured".into()));
		}

		Ok(Reconciler::new(
			store,
			Arc::new(gateways),
			EventBus::new(self.config.events.capacity),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use payex_config::ConfigLoader;

	const CONFIG: &str = r#"
[service]

[storage]
backend = "memory"

[[gateways]]
id = "payex_payment"
kind = "payment"
implementation = "static"

[[gateways]]
id = "payex_invoice"
kind = "invoice"
implementation = "static"
fee = "19.00"
fee_is_taxable = true

[[gateways]]
id = "payex_wywallet"
kind = "wywallet"
implementation = "px"
enabled = false
"#;

	#[test]
	fn test_build_from_config() {
		let config = ConfigLoader::from_toml(CONFIG).unwrap();
		let reconciler = ReconcilerBuilder::new(config)
			.with_default_factories()
			.build()
			.unwrap();

		let ids: Vec<_> = reconciler.gateways().ids().collect();
		assert_eq!(ids, vec!["payex_payment", "payex_invoice"]);

		let fee = reconciler
			.gateways()
			.checkout_fee(Some("payex_invoice"), None)
			.unwrap();
		assert_eq!(fee.title, "Invoice Fee");
		assert!(fee.taxable);
	}

	#[test]
	fn test_unknown_backend() {
		let config = ConfigLoader::from_toml(&CONFIG.replace("\"memory\"", "\"redis\"")).unwrap();
		let err = ReconcilerBuilder::new(config)
			.with_default_factories()
			.build()
			.err()
			.unwrap();
		assert!(err.to_string().contains("redis"));
	}

	#[test]
	fn test_invalid_gateway_config() {
		let toml = r#"
[service]

[storage]
backend = "memory"

[[gateways]]
id = "broken"
kind = "payment"
implementation = "static"

[gateways.config]
error_code = 5
"#;
		let config = ConfigLoader::from_toml(toml).unwrap();
		let result = ReconcilerBuilder::new(config)
			.with_default_factories()
			.build();
		assert!(matches!(result, Err(ReconcileError::Config(msg)) if msg.contains("broken")));
	}
}
