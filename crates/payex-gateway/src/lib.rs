//! Payment gateway clients and the gateway registry.
//!
//! A gateway client executes the vendor's capture and cancel calls. Gateways
//! are registered once at startup under the payment method id the platform
//! stores on orders, together with their [`GatewayKind`]. Resolution is by
//! exact id, first registration wins.

use async_trait::async_trait;
use payex_types::{
	AmountError, CancelRequest, CaptureRequest, ConfigSchema, GatewayKind, GatewayResult, Order,
};
use std::sync::Arc;
use thiserror::Error;

pub mod factoring;
pub mod fees;

/// Re-export implementations
pub mod implementations {
	pub mod px;
	pub mod stub;
}

pub use fees::{CheckoutFee, FeeSettings};

/// Errors raised by gateway clients before a vendor result is available.
///
/// A call that reaches the vendor and comes back with a non-`OK` result is
/// not an error at this level; it is returned as a [`GatewayResult`].
#[derive(Debug, Error)]
pub enum GatewayError {
	/// The request could not be delivered or the response not read.
	#[error("Transport error: {0}")]
	Transport(String),
	/// The vendor answered with something that is not a result document.
	#[error("Protocol error: {0}")]
	Protocol(String),
	/// The gateway is misconfigured.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait implemented by every gateway client.
///
/// Calls are fire-once: implementations must not retry.
#[async_trait]
pub trait GatewayInterface: Send + Sync {
	/// Returns the configuration schema for this client.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Settles a previously authorized transaction (`Capture5`).
	async fn capture(&self, request: &CaptureRequest) -> Result<GatewayResult, GatewayError>;

	/// Voids a previously authorized transaction (`Cancel2`).
	async fn cancel(&self, request: &CancelRequest) -> Result<GatewayResult, GatewayError>;
}

/// A gateway client registered under a payment method id.
#[derive(Clone)]
pub struct RegisteredGateway {
	pub id: String,
	pub kind: GatewayKind,
	pub fee: FeeSettings,
	pub client: Arc<dyn GatewayInterface>,
}

impl RegisteredGateway {
	pub fn new(id: impl Into<String>, kind: GatewayKind, client: Arc<dyn GatewayInterface>) -> Self {
		Self {
			id: id.into(),
			kind,
			fee: FeeSettings::default(),
			client,
		}
	}

	pub fn with_fee(mut self, fee: FeeSettings) -> Self {
		self.fee = fee;
		self
	}

	/// Extra capture data for this gateway. Only factoring gateways send any.
	pub fn additional_values(&self, order: &Order) -> Result<String, AmountError> {
		match self.kind {
			GatewayKind::Factoring => factoring::additional_values(order),
			_ => Ok(String::new()),
		}
	}
}

impl std::fmt::Debug for RegisteredGateway {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegisteredGateway")
			.field("id", &self.id)
			.field("kind", &self.kind)
			.field("fee", &self.fee)
			.finish_non_exhaustive()
	}
}

/// Registry of the gateways available to the reconciler.
#[derive(Debug, Default)]
pub struct GatewayService {
	gateways: Vec<RegisteredGateway>,
}

impl GatewayService {
	/// Creates a registry from gateways given in resolution order.
	pub fn new(gateways: Vec<RegisteredGateway>) -> Self {
		Self { gateways }
	}

	/// Appends a gateway. Earlier registrations win on duplicate ids.
	pub fn register(&mut self, gateway: RegisteredGateway) {
		self.gateways.push(gateway);
	}

	/// Finds the gateway for a payment method id. Matching is exact; when
	/// several gateways share an id the first registered one is returned.
	pub fn resolve(&self, payment_method: &str) -> Option<&RegisteredGateway> {
		self.gateways.iter().find(|g| g.id == payment_method)
	}

	/// The first gateway of the given kind.
	///
	/// Cancels are always issued through the `Payment` gateway's client,
	/// whichever gateway processed the order.
	pub fn first_of_kind(&self, kind: GatewayKind) -> Option<&RegisteredGateway> {
		self.gateways.iter().find(|g| g.kind == kind)
	}

	/// Registered gateway ids in resolution order.
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.gateways.iter().map(|g| g.id.as_str())
	}

	pub fn is_empty(&self) -> bool {
		self.gateways.is_empty()
	}

	/// Picks the gateway a checkout is currently using: the chosen method if
	/// registered, else the store default if registered, else the first one.
	pub fn current(&self, chosen: Option<&str>, default: Option<&str>) -> Option<&RegisteredGateway> {
		chosen
			.and_then(|id| self.resolve(id))
			.or_else(|| default.and_then(|id| self.resolve(id)))
			.or_else(|| self.gateways.first())
	}

	/// Computes the checkout fee for the gateway a checkout is using.
	pub fn checkout_fee(&self, chosen: Option<&str>, default: Option<&str>) -> Option<CheckoutFee> {
		self.current(chosen, default).and_then(fees::checkout_fee)
	}
}
