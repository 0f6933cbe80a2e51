//! Operator-facing logging of reconciliation events.
//!
//! Settlement failures are never retried, so this listener is where they
//! surface: every failure is logged at error level with the vendor's error
//! code and description.

use payex_types::ReconcileEvent;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, error, info, warn};

/// Consumes events until the bus is closed. Returns the number of
/// settlement failures seen.
pub async fn run_alert_listener(mut events: Receiver<ReconcileEvent>) -> usize {
	let mut failures = 0;
	loop {
		match events.recv().await {
			Ok(ReconcileEvent::SettlementFailed {
				order_id,
				action,
				error_code,
				description,
			}) => {
				failures += 1;
				error!(
					order_id = %order_id,
					action = %action,
					error_code = %error_code,
					"Settlement failed, manual follow-up required: {}",
					description
				);
			}
			Ok(ReconcileEvent::Settled {
				order_id,
				action,
				transaction_number,
				..
			}) => {
				info!(order_id = %order_id, action = %action, transaction = %transaction_number, "Settled");
			}
			Ok(ReconcileEvent::Skipped { order_id, reason }) => {
				debug!(order_id = %order_id, %reason, "Skipped");
			}
			Err(RecvError::Lagged(missed)) => {
				warn!(missed, "Alert listener fell behind, events dropped");
			}
			Err(RecvError::Closed) => break,
		}
	}
	failures
}
