//! PxOrder HTTP client.
//!
//! Speaks the vendor's form-encoded PxOrder endpoints. Every call is signed
//! with an MD5 hash over the parameter values in wire order followed by the
//! merchant's encryption key. Responses are XML documents, usually wrapped in
//! an entity-escaped `<string>` envelope.

use crate::{GatewayError, GatewayInterface};
use async_trait::async_trait;
use payex_types::{
	CancelRequest, CaptureRequest, ConfigSchema, Field, FieldType, GatewayResult, Schema,
	ValidationError,
};
use tracing::{debug, instrument};

const PRODUCTION_URL: &str = "https://external.payex.com";
const TEST_URL: &str = "https://external.externaltest.payex.com";

/// PxOrder client bound to one merchant account.
pub struct PxOrderGateway {
	client: reqwest::Client,
	base_url: String,
	account_number: String,
	encryption_key: String,
}

impl PxOrderGateway {
	pub fn new(
		base_url: impl Into<String>,
		account_number: impl Into<String>,
		encryption_key: impl Into<String>,
	) -> Self {
		Self {
			client: reqwest::Client::new(),
			base_url: base_url.into().trim_end_matches('/').to_string(),
			account_number: account_number.into(),
			encryption_key: encryption_key.into(),
		}
	}

	/// Computes the request hash for the given parameter values.
	fn hash(&self, values: &[&str]) -> String {
		let mut input = values.concat();
		input.push_str(&self.encryption_key);
		format!("{:x}", md5::compute(input.as_bytes()))
	}

	fn account<'a>(&'a self, requested: &'a str) -> &'a str {
		if requested.is_empty() {
			&self.account_number
		} else {
			requested
		}
	}

	async fn call(
		&self,
		method: &str,
		params: Vec<(&'static str, String)>,
	) -> Result<GatewayResult, GatewayError> {
		let values: Vec<&str> = params.iter().map(|(_, v)| v.as_str()).collect();
		let hash = self.hash(&values);

		let mut form = params;
		form.push(("hash", hash));

		let url = format!("{}/pxorder/pxorder.asmx/{}", self.base_url, method);
		debug!(%url, "Calling PxOrder");

		let response = self
			.client
			.post(&url)
			.form(&form)
			.send()
			.await
			.map_err(|e| GatewayError::Transport(format!("PxOrder.{}: {}", method, e)))?;

		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| GatewayError::Transport(format!("PxOrder.{}: {}", method, e)))?;

		if !status.is_success() {
			return Err(GatewayError::Transport(format!(
				"PxOrder.{} returned HTTP {}",
				method, status
			)));
		}

		parse_result(&body)
	}
}

/// Extracts the result fields from a PxOrder response document.
pub fn parse_result(body: &str) -> Result<GatewayResult, GatewayError> {
	let document = unescape(body);

	let required = |tag: &str| {
		element(&document, tag)
			.ok_or_else(|| GatewayError::Protocol(format!("response has no <{}> element", tag)))
	};

	Ok(GatewayResult {
		code: required("code")?,
		description: element(&document, "description").unwrap_or_default(),
		error_code: required("errorCode")?,
		transaction_number: element(&document, "transactionNumber").unwrap_or_default(),
		transaction_status: element(&document, "transactionStatus").unwrap_or_default(),
	})
}

/// Returns the text of the first `<tag>` element, if any.
fn element(document: &str, tag: &str) -> Option<String> {
	let open = format!("<{}>", tag);
	let close = format!("</{}>", tag);
	let start = document.find(&open)? + open.len();
	let end = document[start..].find(&close)? + start;
	Some(unescape(document[start..end].trim()))
}

fn unescape(text: &str) -> String {
	text.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&quot;", "\"")
		.replace("&apos;", "'")
		.replace("&amp;", "&")
}

#[async_trait]
impl GatewayInterface for PxOrderGateway {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(PxOrderSchema)
	}

	#[instrument(skip_all, fields(transaction = %request.transaction_number))]
	async fn capture(&self, request: &CaptureRequest) -> Result<GatewayResult, GatewayError> {
		let params = vec![
			("accountNumber", self.account(&request.account_number).to_string()),
			("transactionNumber", request.transaction_number.clone()),
			("amount", request.amount.to_string()),
			("orderId", request.order_id.clone()),
			("vatAmount", request.vat_amount.to_string()),
			("additionalValues", request.additional_values.clone()),
		];
		self.call("Capture5", params).await
	}

	#[instrument(skip_all, fields(transaction = %request.transaction_number))]
	async fn cancel(&self, request: &CancelRequest) -> Result<GatewayResult, GatewayError> {
		let params = vec![
			("accountNumber", self.account(&request.account_number).to_string()),
			("transactionNumber", request.transaction_number.clone()),
		];
		self.call("Cancel2", params).await
	}
}

/// Configuration schema for the PxOrder client.
pub struct PxOrderSchema;

impl ConfigSchema for PxOrderSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(
			vec![
				Field::new("account_number", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => Ok(()),
						_ => Err("account_number must be numeric".to_string()),
					}
				}),
				Field::new("encryption_key", FieldType::String),
			],
			vec![
				Field::new("base_url", FieldType::Url),
				Field::new("testmode", FieldType::Boolean),
			],
		)
		.validate(config)
	}
}

/// Factory function to create a PxOrder client from configuration.
///
/// Configuration parameters:
/// - `account_number`: Merchant account number
/// - `encryption_key`: Merchant encryption key used to sign requests
/// - `base_url`: Endpoint override
/// - `testmode`: Use the vendor's test environment (default: false)
pub fn create_gateway(config: &toml::Value) -> Result<Box<dyn GatewayInterface>, GatewayError> {
	PxOrderSchema
		.validate(config)
		.map_err(|e| GatewayError::Configuration(e.to_string()))?;

	let get = |key: &str| config.get(key).and_then(|v| v.as_str());
	let testmode = config
		.get("testmode")
		.and_then(|v| v.as_bool())
		.unwrap_or(false);
	let base_url = get("base_url").unwrap_or(if testmode { TEST_URL } else { PRODUCTION_URL });

	Ok(Box::new(PxOrderGateway::new(
		base_url,
		get("account_number").unwrap_or_default(),
		get("encryption_key").unwrap_or_default(),
	)))
}
