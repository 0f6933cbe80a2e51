//! Reconciliation outcomes and the events published for them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{OrderId, SettlementAction};

/// Why a reconciliation request was skipped without a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
	/// The order carries no transaction status metadata.
	NoTransaction,
	/// No registered gateway matches the order's payment method.
	UnknownGateway { payment_method: String },
	/// The stored transaction status is not "authorized".
	NotAuthorized { status: String },
	/// The status transition does not call for a settlement.
	IgnoredTransition { from: String, to: String },
}

impl fmt::Display for SkipReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SkipReason::NoTransaction => write!(f, "no transaction status recorded"),
			SkipReason::UnknownGateway { payment_method } => {
				write!(f, "no gateway registered for '{}'", payment_method)
			}
			SkipReason::NotAuthorized { status } => {
				write!(f, "transaction status {} is not authorized", status)
			}
			SkipReason::IgnoredTransition { from, to } => {
				write!(f, "transition {} -> {} needs no settlement", from, to)
			}
		}
	}
}

/// Result of a reconciliation request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
	Skipped {
		#[serde(flatten)]
		reason: SkipReason,
	},
	Captured {
		transaction_number: String,
		transaction_status: String,
	},
	Cancelled {
		transaction_number: String,
		transaction_status: String,
	},
}

impl Outcome {
	pub fn skipped(reason: SkipReason) -> Self {
		Outcome::Skipped { reason }
	}

	pub fn settled(
		action: SettlementAction,
		transaction_number: String,
		transaction_status: String,
	) -> Self {
		match action {
			SettlementAction::Capture => Outcome::Captured {
				transaction_number,
				transaction_status,
			},
			SettlementAction::Cancel => Outcome::Cancelled {
				transaction_number,
				transaction_status,
			},
		}
	}

	pub fn is_skipped(&self) -> bool {
		matches!(self, Outcome::Skipped { .. })
	}
}

/// Events broadcast by the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReconcileEvent {
	Settled {
		order_id: OrderId,
		action: SettlementAction,
		transaction_number: String,
		transaction_status: String,
	},
	Skipped {
		order_id: OrderId,
		reason: SkipReason,
	},
	/// The vendor rejected a capture or cancel. The order's settlement
	/// metadata was left untouched and needs operator attention.
	SettlementFailed {
		order_id: OrderId,
		action: SettlementAction,
		error_code: String,
		description: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_outcome_json_shape() {
		let outcome = Outcome::settled(SettlementAction::Capture, "123456".into(), "6".into());
		let json = serde_json::to_value(&outcome).unwrap();
		assert_eq!(json["outcome"], "captured");
		assert_eq!(json["transaction_number"], "123456");

		let skipped = Outcome::skipped(SkipReason::NotAuthorized {
			status: "6".into(),
		});
		let json = serde_json::to_value(&skipped).unwrap();
		assert_eq!(json["outcome"], "skipped");
		assert_eq!(json["reason"], "not_authorized");
		assert_eq!(json["status"], "6");
	}
}
