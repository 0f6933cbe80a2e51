//! Deterministic gateway that answers every call from configuration.
//!
//! Used as the test double for the reconciler and for running the service
//! without vendor credentials. Every request is recorded so callers can
//! assert on what would have been sent.

use crate::{GatewayError, GatewayInterface};
use async_trait::async_trait;
use payex_types::{
	CancelRequest, CaptureRequest, ConfigSchema, Field, FieldType, GatewayResult, Schema,
	TransactionStatus, ValidationError, RESULT_OK,
};
use tokio::sync::Mutex;

/// A request received by the stub.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
	Capture(CaptureRequest),
	Cancel(CancelRequest),
}

/// Gateway returning fixed results without network access.
pub struct StaticGateway {
	code: String,
	description: String,
	error_code: String,
	/// Transaction number to report. Echoes the request's when unset.
	transaction_number: Option<String>,
	capture_status: String,
	cancel_status: String,
	calls: Mutex<Vec<GatewayCall>>,
}

impl StaticGateway {
	/// A stub that accepts every call, reporting captured or cancelled status.
	pub fn succeeding() -> Self {
		Self {
			code: RESULT_OK.to_string(),
			description: RESULT_OK.to_string(),
			error_code: RESULT_OK.to_string(),
			transaction_number: None,
			capture_status: TransactionStatus::Capture.code().to_string(),
			cancel_status: TransactionStatus::Cancel.code().to_string(),
			calls: Mutex::new(Vec::new()),
		}
	}

	/// A stub that rejects every call with the given error code.
	pub fn failing(error_code: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			error_code: error_code.into(),
			description: description.into(),
			..Self::succeeding()
		}
	}

	/// Overrides the transaction number reported back.
	pub fn with_transaction_number(mut self, number: impl Into<String>) -> Self {
		self.transaction_number = Some(number.into());
		self
	}

	/// Overrides the transaction status reported for captures.
	pub fn with_capture_status(mut self, status: impl Into<String>) -> Self {
		self.capture_status = status.into();
		self
	}

	/// Requests received so far, oldest first.
	pub async fn calls(&self) -> Vec<GatewayCall> {
		self.calls.lock().await.clone()
	}

	fn result(&self, transaction_number: &str, status: &str) -> GatewayResult {
		GatewayResult {
			code: self.code.clone(),
			description: self.description.clone(),
			error_code: self.error_code.clone(),
			transaction_number: self
				.transaction_number
				.clone()
				.unwrap_or_else(|| transaction_number.to_string()),
			transaction_status: status.to_string(),
		}
	}
}

#[async_trait]
impl GatewayInterface for StaticGateway {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(StaticGatewaySchema)
	}

	async fn capture(&self, request: &CaptureRequest) -> Result<GatewayResult, GatewayError> {
		self.calls
			.lock()
			.await
			.push(GatewayCall::Capture(request.clone()));
		Ok(self.result(&request.transaction_number, &self.capture_status))
	}

	async fn cancel(&self, request: &CancelRequest) -> Result<GatewayResult, GatewayError> {
		self.calls
			.lock()
			.await
			.push(GatewayCall::Cancel(request.clone()));
		Ok(self.result(&request.transaction_number, &self.cancel_status))
	}
}

/// Configuration schema for the static gateway. All fields are optional.
pub struct StaticGatewaySchema;

impl ConfigSchema for StaticGatewaySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(
			vec![],
			vec![
				Field::new("error_code", FieldType::String),
				Field::new("description", FieldType::String),
				Field::new("transaction_number", FieldType::String),
				Field::new("capture_status", FieldType::String),
			],
		)
		.validate(config)
	}
}

/// Factory function to create a static gateway from configuration.
///
/// Configuration parameters:
/// - `error_code`: Error code to answer with (default: "OK")
/// - `description`: Description to answer with (default: "OK")
/// - `transaction_number`: Fixed transaction number (default: echo the request)
/// - `capture_status`: Status reported for captures (default: "6")
pub fn create_gateway(config: &toml::Value) -> Result<Box<dyn GatewayInterface>, GatewayError> {
	StaticGatewaySchema
		.validate(config)
		.map_err(|e| GatewayError::Configuration(e.to_string()))?;

	let get = |key: &str| config.get(key).and_then(|v| v.as_str());

	let mut gateway = match get("error_code") {
		Some(code) if code != RESULT_OK => {
			StaticGateway::failing(code, get("description").unwrap_or(code))
		}
		_ => StaticGateway::succeeding(),
	};
	if let Some(number) = get("transaction_number") {
		gateway = gateway.with_transaction_number(number);
	}
	if let Some(status) = get("capture_status") {
		gateway = gateway.with_capture_status(status);
	}

	Ok(Box::new(gateway))
}
