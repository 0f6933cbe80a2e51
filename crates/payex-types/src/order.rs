//! Order types as seen by the reconciler.
//!
//! Orders are owned by the e-commerce platform. The reconciler only reads them,
//! rewrites the transaction status metadata and appends audit notes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Metadata key holding the vendor transaction status code of an order.
pub const TRANSACTION_STATUS_META: &str = "_payex_transaction_status";

/// Opaque order identifier assigned by the platform.
pub type OrderId = String;

/// Lifecycle status of an order on the platform.
///
/// Only `OnHold`, `Processing`, `Completed` and `Cancelled` drive the
/// reconciler. Statuses it does not know are carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
	Pending,
	OnHold,
	Processing,
	Completed,
	Cancelled,
	Failed,
	Refunded,
	Other(String),
}

impl OrderStatus {
	pub fn as_str(&self) -> &str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::OnHold => "on-hold",
			OrderStatus::Processing => "processing",
			OrderStatus::Completed => "completed",
			OrderStatus::Cancelled => "cancelled",
			OrderStatus::Failed => "failed",
			OrderStatus::Refunded => "refunded",
			OrderStatus::Other(s) => s,
		}
	}
}

impl FromStr for OrderStatus {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		// The platform reports statuses with or without the "wc-" prefix.
		let s = s.strip_prefix("wc-").unwrap_or(s);
		Ok(match s {
			"pending" => OrderStatus::Pending,
			"on-hold" => OrderStatus::OnHold,
			"processing" => OrderStatus::Processing,
			"completed" => OrderStatus::Completed,
			"cancelled" => OrderStatus::Cancelled,
			"failed" => OrderStatus::Failed,
			"refunded" => OrderStatus::Refunded,
			other => OrderStatus::Other(other.to_string()),
		})
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for OrderStatus {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for OrderStatus {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Ok(s.parse().unwrap_or(OrderStatus::Other(s)))
	}
}

/// A single invoice line of an order.
///
/// Line items are only consumed by factoring captures, which must ship the
/// invoice lines to the vendor alongside the capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
	/// Product or fee description printed on the invoice.
	pub name: String,
	/// Quantity ordered.
	pub quantity: Decimal,
	/// Line total excluding tax.
	pub total: Decimal,
	/// Tax charged on the line.
	#[serde(default)]
	pub tax: Decimal,
}

/// Audit note appended to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNote {
	pub text: String,
	pub created_at: DateTime<Utc>,
}

impl OrderNote {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			created_at: Utc::now(),
		}
	}
}

/// An order snapshot as held by the order store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Platform-assigned identifier.
	pub id: OrderId,
	/// Identifier of the payment gateway that processed the order.
	pub payment_method: String,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Vendor-assigned transaction reference.
	#[serde(default)]
	pub transaction_id: String,
	/// Order total including tax and fees.
	pub total_amount: Decimal,
	/// ISO currency code, when the platform reports one.
	#[serde(default)]
	pub currency: Option<String>,
	/// Invoice lines.
	#[serde(default)]
	pub items: Vec<OrderLine>,
	/// Free-form key/value metadata.
	#[serde(default)]
	pub meta: HashMap<String, String>,
	/// Audit trail.
	#[serde(default)]
	pub notes: Vec<OrderNote>,
}

impl Order {
	/// Returns the stored transaction status code, treating an empty value
	/// as absent.
	pub fn transaction_status(&self) -> Option<&str> {
		self.meta
			.get(TRANSACTION_STATUS_META)
			.map(String::as_str)
			.filter(|s| !s.is_empty())
	}
}

/// Inbound command describing an order status change on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTransition {
	pub order_id: OrderId,
	pub from_status: OrderStatus,
	pub to_status: OrderStatus,
}

impl OrderTransition {
	pub fn new(order_id: impl Into<OrderId>, from: OrderStatus, to: OrderStatus) -> Self {
		Self {
			order_id: order_id.into(),
			from_status: from,
			to_status: to,
		}
	}
}
