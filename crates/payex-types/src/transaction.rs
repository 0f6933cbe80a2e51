//! Vendor transaction values exchanged with the PxOrder API.
//!
//! Field names serialize to the exact parameter keys the vendor expects, so
//! these types can be handed to a wire client unchanged.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sentinel the vendor uses for a successful result field.
pub const RESULT_OK: &str = "OK";

/// Vendor transaction status code.
///
/// Codes are string-keyed so that codes introduced by the vendor later are
/// preserved instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
	Sale,
	Initialize,
	Credit,
	Authorize,
	Cancel,
	Failure,
	Capture,
	Other(String),
}

impl TransactionStatus {
	/// Parses a stored or reported code. Matching is exact, so padded values
	/// such as `" 3"` are kept as `Other`.
	pub fn from_code(code: &str) -> Self {
		match code {
			"0" => TransactionStatus::Sale,
			"1" => TransactionStatus::Initialize,
			"2" => TransactionStatus::Credit,
			"3" => TransactionStatus::Authorize,
			"4" => TransactionStatus::Cancel,
			"5" => TransactionStatus::Failure,
			"6" => TransactionStatus::Capture,
			other => TransactionStatus::Other(other.to_string()),
		}
	}

	pub fn code(&self) -> &str {
		match self {
			TransactionStatus::Sale => "0",
			TransactionStatus::Initialize => "1",
			TransactionStatus::Credit => "2",
			TransactionStatus::Authorize => "3",
			TransactionStatus::Cancel => "4",
			TransactionStatus::Failure => "5",
			TransactionStatus::Capture => "6",
			TransactionStatus::Other(code) => code,
		}
	}

	/// Whether a capture or cancel may be issued for a transaction in this
	/// status. Only authorized, unsettled transactions qualify.
	pub fn is_settleable(&self) -> bool {
		matches!(self, TransactionStatus::Authorize)
	}
}

impl fmt::Display for TransactionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

impl Serialize for TransactionStatus {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.code())
	}
}

impl<'de> Deserialize<'de> for TransactionStatus {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let code = String::deserialize(deserializer)?;
		Ok(TransactionStatus::from_code(&code))
	}
}

/// Errors raised while deriving wire amounts.
#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
	#[error("Amount {0} does not fit in minor units")]
	Overflow(Decimal),
}

/// Converts a decimal total into integer minor units.
///
/// The total is scaled by 100 and rounded half away from zero, so
/// `123.456` becomes `12346` and `0.125` becomes `13`.
pub fn to_minor_units(total: Decimal) -> Result<i64, AmountError> {
	total
		.checked_mul(Decimal::ONE_HUNDRED)
		.map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
		.and_then(|rounded| rounded.to_i64())
		.ok_or(AmountError::Overflow(total))
}

/// Parameters of a `Capture5` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
	/// Merchant account; left empty to let the client use its configured one.
	pub account_number: String,
	pub transaction_number: String,
	/// Amount to capture in minor units.
	pub amount: i64,
	pub order_id: String,
	/// Always zero.
	pub vat_amount: i64,
	/// Gateway specific extra data; empty unless the gateway is factoring.
	pub additional_values: String,
}

/// Parameters of a `Cancel2` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
	pub account_number: String,
	pub transaction_number: String,
}

/// Result of a capture or cancel call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResult {
	pub code: String,
	pub description: String,
	pub error_code: String,
	#[serde(default)]
	pub transaction_number: String,
	#[serde(default)]
	pub transaction_status: String,
}

impl GatewayResult {
	/// A result is successful only when code, description and error code all
	/// carry the vendor's `OK` sentinel.
	pub fn is_success(&self) -> bool {
		self.code == RESULT_OK && self.description == RESULT_OK && self.error_code == RESULT_OK
	}

	/// Builds a successful result, mostly useful for stubs.
	pub fn ok(transaction_number: impl Into<String>, transaction_status: impl Into<String>) -> Self {
		Self {
			code: RESULT_OK.to_string(),
			description: RESULT_OK.to_string(),
			error_code: RESULT_OK.to_string(),
			transaction_number: transaction_number.into(),
			transaction_status: transaction_status.into(),
		}
	}
}
