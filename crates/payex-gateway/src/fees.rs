//! Checkout fee rules for invoice-type gateways.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::RegisteredGateway;

/// Fee configured on a gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeSettings {
	#[serde(default)]
	pub amount: Decimal,
	#[serde(default)]
	pub taxable: bool,
	#[serde(default)]
	pub tax_class: String,
}

/// Fee line to add to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutFee {
	pub gateway: String,
	pub title: String,
	pub amount: Decimal,
	pub taxable: bool,
	pub tax_class: String,
}

/// Returns the fee line for a gateway, if its kind charges one and the
/// configured amount is not negligible.
pub fn checkout_fee(gateway: &RegisteredGateway) -> Option<CheckoutFee> {
	let title = gateway.kind.fee_title()?;
	// Fees below one cent are treated as unset.
	if gateway.fee.amount.abs() < Decimal::new(1, 2) {
		return None;
	}

	Some(CheckoutFee {
		gateway: gateway.id.clone(),
		title: title.to_string(),
		amount: gateway.fee.amount,
		taxable: gateway.fee.taxable,
		tax_class: gateway.fee.tax_class.clone(),
	})
}
