//! Invoice line data sent with factoring captures.
//!
//! Factoring settlements must carry the invoice lines so the vendor can print
//! them on the invoice it issues. They travel URL-encoded inside the
//! `additionalValues` capture parameter.

use payex_types::{AmountError, Order, OrderLine};
use rust_decimal::Decimal;

/// Key under which the order lines are passed in `additionalValues`.
pub const ORDER_LINES_KEY: &str = "INVOICESALE_ORDERLINES";

/// Builds the `additionalValues` capture parameter for a factoring order.
pub fn additional_values(order: &Order) -> Result<String, AmountError> {
	Ok(format!(
		"{}={}",
		ORDER_LINES_KEY,
		url_encode(&order_lines_xml(order)?)
	))
}

/// Renders the order lines as the vendor's OnlineInvoice document.
///
/// Fails when a line's unit price, VAT rate or gross amount cannot be
/// represented.
pub fn order_lines_xml(order: &Order) -> Result<String, AmountError> {
	let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
	xml.push_str("<OnlineInvoice><OrderLines>");
	for line in &order.items {
		push_line(&mut xml, line)?;
	}
	xml.push_str("</OrderLines></OnlineInvoice>");
	Ok(xml)
}

fn push_line(xml: &mut String, line: &OrderLine) -> Result<(), AmountError> {
	let unit_price = if line.quantity.is_zero() {
		line.total
	} else {
		line.total
			.checked_div(line.quantity)
			.ok_or(AmountError::Overflow(line.total))?
	};
	let vat_rate = if line.total.is_zero() {
		Decimal::ZERO
	} else {
		line.tax
			.checked_div(line.total)
			.and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
			.ok_or(AmountError::Overflow(line.tax))?
	};
	let amount = line
		.total
		.checked_add(line.tax)
		.ok_or(AmountError::Overflow(line.total))?;

	xml.push_str("<OrderLine>");
	xml.push_str(&format!("<Product>{}</Product>", escape(&line.name)));
	xml.push_str(&format!("<Qty>{}</Qty>", line.quantity.normalize()));
	xml.push_str(&format!("<UnitPrice>{:.2}</UnitPrice>", unit_price));
	xml.push_str(&format!("<VatRate>{:.2}</VatRate>", vat_rate));
	xml.push_str(&format!("<VatAmount>{:.2}</VatAmount>", line.tax));
	xml.push_str(&format!("<Amount>{:.2}</Amount>", amount));
	xml.push_str("</OrderLine>");
	Ok(())
}

fn escape(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&apos;")
}

/// Form-style URL encoding, spaces become `+`.
fn url_encode(text: &str) -> String {
	urlencoding::encode(text).replace("%20", "+")
}
