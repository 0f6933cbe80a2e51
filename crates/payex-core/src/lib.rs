//! Capture/cancel reconciliation for PayEx orders.
//!
//! The [`Reconciler`] reacts to order status transitions on the platform. When
//! an order leaves `on-hold` it looks up the order's stored vendor transaction
//! status and, if the transaction is still only authorized, captures it
//! through the gateway that processed the order or cancels it through the
//! payment gateway. The new transaction status and an audit note are then
//! recorded on the order.

use dashmap::DashMap;
use payex_gateway::{GatewayError, GatewayService, RegisteredGateway};
use payex_storage::{OrderStoreService, StorageError};
use payex_types::{
	to_minor_units, AmountError, CancelRequest, CaptureRequest, GatewayKind, GatewayResult, Order,
	OrderId, OrderStatus, OrderTransition, Outcome, ReconcileEvent, SettlementAction, SkipReason,
	TransactionStatus, TRANSACTION_STATUS_META,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

mod builder;
pub mod event_bus;

pub use builder::ReconcilerBuilder;
pub use event_bus::EventBus;

#[derive(Debug, Error)]
pub enum ReconcileError {
	#[error("Order not found: {0}")]
	OrderNotFound(OrderId),
	#[error("Storage error: {0}")]
	Storage(StorageError),
	#[error("Gateway error: {0}")]
	Gateway(#[from] GatewayError),
	#[error("Invalid amount: {0}")]
	Amount(#[from] AmountError),
	/// The vendor rejected the call. Order metadata was left unchanged.
	#[error("PxOrder.{}: {code} ({description})", .action.call_name())]
	SettlementFailed {
		action: SettlementAction,
		code: String,
		description: String,
	},
	/// The stored transaction status changed while the vendor call was in
	/// flight, so the vendor's new status was not recorded.
	#[error("Transaction status of order {0} changed during settlement")]
	Conflict(OrderId),
	#[error("Configuration error: {0}")]
	Config(String),
}

impl From<StorageError> for ReconcileError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound(id) => ReconcileError::OrderNotFound(id),
			other => ReconcileError::Storage(other),
		}
	}
}

/// Settles authorized PayEx transactions when orders leave `on-hold`.
pub struct Reconciler {
	store: Arc<OrderStoreService>,
	gateways: Arc<GatewayService>,
	event_bus: EventBus,
	/// Serializes the read, call, write sequence per order.
	locks: DashMap<OrderId, Arc<Mutex<()>>>,
}

impl Reconciler {
	/// Creates a reconciler over an order store and gateway registry.
	///
	/// Usually assembled from configuration through [`ReconcilerBuilder`].
	pub fn new(
		store: Arc<OrderStoreService>,
		gateways: Arc<GatewayService>,
		event_bus: EventBus,
	) -> Self {
		Self {
			store,
			gateways,
			event_bus,
			locks: DashMap::new(),
		}
	}

	/// Dispatches a platform status transition.
	///
	/// `on-hold` to `processing` or `completed` captures, `on-hold` to
	/// `cancelled` cancels. Every other transition is skipped.
	pub async fn handle_transition(
		&self,
		transition: &OrderTransition,
	) -> Result<Outcome, ReconcileError> {
		match (&transition.from_status, &transition.to_status) {
			(OrderStatus::OnHold, OrderStatus::Processing | OrderStatus::Completed) => {
				self.capture_payment(&transition.order_id).await
			}
			(OrderStatus::OnHold, OrderStatus::Cancelled) => {
				self.cancel_payment(&transition.order_id).await
			}
			(from, to) => Ok(self.skip(
				&transition.order_id,
				SkipReason::IgnoredTransition {
					from: from.to_string(),
					to: to.to_string(),
				},
			)),
		}
	}

	/// Captures the order's authorized transaction.
	pub async fn capture_payment(&self, order_id: &str) -> Result<Outcome, ReconcileError> {
		self.settle(order_id, SettlementAction::Capture).await
	}

	/// Cancels the order's authorized transaction.
	pub async fn cancel_payment(&self, order_id: &str) -> Result<Outcome, ReconcileError> {
		self.settle(order_id, SettlementAction::Cancel).await
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	pub fn store(&self) -> &OrderStoreService {
		&self.store
	}

	pub fn gateways(&self) -> &GatewayService {
		&self.gateways
	}

	async fn settle(
		&self,
		order_id: &str,
		action: SettlementAction,
	) -> Result<Outcome, ReconcileError> {
		let lock = OrderLock::acquire(&self.locks, order_id);
		let _held = lock.mutex.lock().await;
		self.settle_locked(order_id, action).await
	}

	#[instrument(skip_all, fields(order_id = %order_id, action = %action))]
	async fn settle_locked(
		&self,
		order_id: &str,
		action: SettlementAction,
	) -> Result<Outcome, ReconcileError> {
		let order = self.store.get_order(order_id).await?;
		let Some(stored) = order.transaction_status().map(str::to_string) else {
			return Ok(self.skip(order_id, SkipReason::NoTransaction));
		};

		let Some(gateway) = self.gateways.resolve(&order.payment_method) else {
			return Ok(self.skip(
				order_id,
				SkipReason::UnknownGateway {
					payment_method: order.payment_method.clone(),
				},
			));
		};

		if !TransactionStatus::from_code(&stored).is_settleable() {
			return Ok(self.skip(order_id, SkipReason::NotAuthorized { status: stored }));
		}

		let result = self.call_gateway(gateway, &order, action).await?;

		if !result.is_success() {
			error!(
				gateway = %gateway.id,
				"PxOrder.{}:{}({})",
				action.call_name(),
				result.error_code,
				result.description
			);
			self.event_bus.publish(ReconcileEvent::SettlementFailed {
				order_id: order_id.to_string(),
				action,
				error_code: result.error_code.clone(),
				description: result.description.clone(),
			});
			return Err(ReconcileError::SettlementFailed {
				action,
				code: result.error_code,
				description: result.description,
			});
		}

		let recorded = self
			.store
			.compare_and_set_meta(
				order_id,
				TRANSACTION_STATUS_META,
				Some(&stored),
				&result.transaction_status,
			)
			.await?;
		if !recorded {
			error!(
				transaction = %result.transaction_number,
				status = %result.transaction_status,
				"Vendor settled the transaction but the stored status changed concurrently"
			);
			return Err(ReconcileError::Conflict(order_id.to_string()));
		}

		self.store
			.add_note(order_id, action.audit_note(&result.transaction_number))
			.await?;

		info!(
			gateway = %gateway.id,
			transaction = %result.transaction_number,
			status = %result.transaction_status,
			"Transaction settled"
		);
		self.event_bus.publish(ReconcileEvent::Settled {
			order_id: order_id.to_string(),
			action,
			transaction_number: result.transaction_number.clone(),
			transaction_status: result.transaction_status.clone(),
		});

		Ok(Outcome::settled(
			action,
			result.transaction_number,
			result.transaction_status,
		))
	}

	async fn call_gateway(
		&self,
		gateway: &RegisteredGateway,
		order: &Order,
		action: SettlementAction,
	) -> Result<GatewayResult, ReconcileError> {
		let result = match action {
			SettlementAction::Capture => {
				let request = capture_request(gateway, order)?;
				gateway.client.capture(&request).await?
			}
			SettlementAction::Cancel => {
				let payment = self
					.gateways
					.first_of_kind(GatewayKind::Payment)
					.ok_or_else(|| {
						ReconcileError::Config(format!(
							"No payment gateway registered to cancel {} order {}",
							gateway.id, order.id
						))
					})?;
				let request = CancelRequest {
					account_number: String::new(),
					transaction_number: order.transaction_id.clone(),
				};
				payment.client.cancel(&request).await?
			}
		};
		Ok(result)
	}

	fn skip(&self, order_id: &str, reason: SkipReason) -> Outcome {
		debug!(order_id, %reason, "Nothing to settle");
		self.event_bus.publish(ReconcileEvent::Skipped {
			order_id: order_id.to_string(),
			reason: reason.clone(),
		});
		Outcome::skipped(reason)
	}
}

/// An order's entry in the lock table.
///
/// The entry is removed on drop once no other settlement holds it, which
/// includes unwinding out of a panicked gateway call.
struct OrderLock<'a> {
	locks: &'a DashMap<OrderId, Arc<Mutex<()>>>,
	order_id: &'a str,
	mutex: Arc<Mutex<()>>,
}

impl<'a> OrderLock<'a> {
	fn acquire(locks: &'a DashMap<OrderId, Arc<Mutex<()>>>, order_id: &'a str) -> Self {
		let mutex = locks.entry(order_id.to_string()).or_default().clone();
		Self {
			locks,
			order_id,
			mutex,
		}
	}
}

impl Drop for OrderLock<'_> {
	fn drop(&mut self) {
		// The table's copy plus ours.
		self.locks
			.remove_if(self.order_id, |_, mutex| Arc::strong_count(mutex) == 2);
	}
}

/// Builds the `Capture5` parameters for an order.
pub fn capture_request(
	gateway: &RegisteredGateway,
	order: &Order,
) -> Result<CaptureRequest, AmountError> {
	Ok(CaptureRequest {
		account_number: String::new(),
		transaction_number: order.transaction_id.clone(),
		amount: to_minor_units(order.total_amount)?,
		order_id: order.id.clone(),
		vat_amount: 0,
		additional_values: gateway.additional_values(order)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use futures::FutureExt;
	use payex_gateway::implementations::stub::{GatewayCall, StaticGateway, StaticGatewaySchema};
	use payex_gateway::GatewayInterface;
	use payex_storage::implementations::memory::MemoryOrderStore;
	use payex_types::{ConfigSchema, OrderLine};
	use std::panic::AssertUnwindSafe;
	use rust_decimal::Decimal;
	use std::collections::HashMap;
	use std::str::FromStr;

	fn order(id: &str, payment_method: &str, status: Option<&str>, total: &str) -> Order {
		let mut meta = HashMap::new();
		if let Some(status) = status {
			meta.insert(TRANSACTION_STATUS_META.to_string(), status.to_string());
		}
		Order {
			id: id.to_string(),
			payment_method: payment_method.to_string(),
			status: OrderStatus::OnHold,
			transaction_id: "123456".to_string(),
			total_amount: Decimal::from_str(total).unwrap(),
			currency: Some("SEK".to_string()),
			items: vec![OrderLine {
				name: "Widget".to_string(),
				quantity: Decimal::ONE,
				total: Decimal::from_str(total).unwrap(),
				tax: Decimal::ZERO,
			}],
			meta,
			notes: Vec::new(),
		}
	}

	struct Harness {
		reconciler: Reconciler,
		payment: Arc<StaticGateway>,
		factoring: Arc<StaticGateway>,
	}

	fn harness_with(orders: Vec<Order>, payment: StaticGateway) -> Harness {
		let payment = Arc::new(payment);
		let factoring = Arc::new(StaticGateway::succeeding());
		let gateways = GatewayService::new(vec![
			RegisteredGateway::new("payex_payment", GatewayKind::Payment, payment.clone()),
			RegisteredGateway::new("payex_factoring", GatewayKind::Factoring, factoring.clone()),
		]);
		let store = OrderStoreService::new(Box::new(MemoryOrderStore::with_orders(orders)));
		Harness {
			reconciler: Reconciler::new(Arc::new(store), Arc::new(gateways), EventBus::new(16)),
			payment,
			factoring,
		}
	}

	fn harness(orders: Vec<Order>) -> Harness {
		harness_with(orders, StaticGateway::succeeding())
	}

	async fn stored_status(h: &Harness, id: &str) -> Option<String> {
		h.reconciler
			.store()
			.get_meta(id, TRANSACTION_STATUS_META)
			.await
			.unwrap()
	}

	async fn notes(h: &Harness, id: &str) -> Vec<String> {
		let order = h.reconciler.store().get_order(id).await.unwrap();
		order.notes.into_iter().map(|n| n.text).collect()
	}

	#[tokio::test]
	async fn test_missing_or_empty_status_is_noop() {
		let h = harness(vec![
			order("1", "payex_payment", None, "100"),
			order("2", "payex_payment", Some(""), "100"),
		]);

		for id in ["1", "2"] {
			let capture = h.reconciler.capture_payment(id).await.unwrap();
			assert_eq!(capture, Outcome::skipped(SkipReason::NoTransaction));
			let cancel = h.reconciler.cancel_payment(id).await.unwrap();
			assert_eq!(cancel, Outcome::skipped(SkipReason::NoTransaction));
			assert!(notes(&h, id).await.is_empty());
		}
		assert_eq!(stored_status(&h, "2").await, Some(String::new()));
		assert!(h.payment.calls().await.is_empty());
	}

	#[tokio::test]
	async fn test_non_authorized_status_is_noop() {
		let h = harness(vec![
			order("1", "payex_payment", Some("6"), "100"),
			order("2", "payex_payment", Some("0"), "100"),
		]);

		for id in ["1", "2"] {
			assert!(h.reconciler.capture_payment(id).await.unwrap().is_skipped());
			assert!(h.reconciler.cancel_payment(id).await.unwrap().is_skipped());
		}
		assert_eq!(stored_status(&h, "1").await.as_deref(), Some("6"));
		assert!(h.payment.calls().await.is_empty());
	}

	#[tokio::test]
	async fn test_padded_status_is_noop() {
		let h = harness(vec![order("1", "payex_payment", Some(" 3"), "100")]);

		let outcome = h.reconciler.capture_payment("1").await.unwrap();
		assert_eq!(
			outcome,
			Outcome::skipped(SkipReason::NotAuthorized {
				status: " 3".to_string()
			})
		);
		assert!(h.reconciler.cancel_payment("1").await.unwrap().is_skipped());
		assert_eq!(stored_status(&h, "1").await.as_deref(), Some(" 3"));
		assert!(h.payment.calls().await.is_empty());
	}

	#[tokio::test]
	async fn test_unknown_gateway_is_noop() {
		let h = harness(vec![order("1", "payex", Some("3"), "100")]);

		let outcome = h.reconciler.capture_payment("1").await.unwrap();
		assert_eq!(
			outcome,
			Outcome::skipped(SkipReason::UnknownGateway {
				payment_method: "payex".to_string()
			})
		);
		assert_eq!(stored_status(&h, "1").await.as_deref(), Some("3"));
	}

	#[tokio::test]
	async fn test_capture_records_status_and_note() {
		let h = harness(vec![order("1", "payex_payment", Some("3"), "100")]);
		let mut events = h.reconciler.event_bus().subscribe();

		let outcome = h.reconciler.capture_payment("1").await.unwrap();
		assert_eq!(
			outcome,
			Outcome::Captured {
				transaction_number: "123456".to_string(),
				transaction_status: "6".to_string(),
			}
		);
		assert_eq!(stored_status(&h, "1").await.as_deref(), Some("6"));

		let notes = notes(&h, "1").await;
		assert_eq!(notes.len(), 1);
		assert!(notes[0].contains("123456"));

		assert!(matches!(
			events.recv().await.unwrap(),
			ReconcileEvent::Settled { action: SettlementAction::Capture, .. }
		));
	}

	#[tokio::test]
	async fn test_failed_capture_leaves_order_untouched() {
		let h = harness_with(
			vec![order("1", "payex_payment", Some("3"), "100")],
			StaticGateway::failing("FAIL", "Insufficient funds"),
		);
		let mut events = h.reconciler.event_bus().subscribe();

		let err = h.reconciler.capture_payment("1").await.unwrap_err();
		match err {
			ReconcileError::SettlementFailed {
				action,
				code,
				description,
			} => {
				assert_eq!(action, SettlementAction::Capture);
				assert_eq!(code, "FAIL");
				assert_eq!(description, "Insufficient funds");
			}
			other => panic!("unexpected error: {other}"),
		}

		assert_eq!(stored_status(&h, "1").await.as_deref(), Some("3"));
		assert!(notes(&h, "1").await.is_empty());
		assert!(matches!(
			events.recv().await.unwrap(),
			ReconcileEvent::SettlementFailed { error_code, .. } if error_code == "FAIL"
		));
	}

	#[tokio::test]
	async fn test_second_capture_is_noop() {
		let h = harness(vec![order("1", "payex_payment", Some("3"), "100")]);

		assert!(!h.reconciler.capture_payment("1").await.unwrap().is_skipped());
		let second = h.reconciler.capture_payment("1").await.unwrap();
		assert_eq!(
			second,
			Outcome::skipped(SkipReason::NotAuthorized {
				status: "6".to_string()
			})
		);
		assert_eq!(h.payment.calls().await.len(), 1);
		assert_eq!(notes(&h, "1").await.len(), 1);
	}

	#[tokio::test]
	async fn test_concurrent_captures_call_once() {
		let h = harness(vec![order("1", "payex_payment", Some("3"), "100")]);

		let (a, b) = futures::join!(
			h.reconciler.capture_payment("1"),
			h.reconciler.capture_payment("1")
		);
		let outcomes = [a.unwrap(), b.unwrap()];
		assert_eq!(outcomes.iter().filter(|o| o.is_skipped()).count(), 1);
		assert_eq!(h.payment.calls().await.len(), 1);
		assert!(h.reconciler.locks.is_empty());
	}

	#[tokio::test]
	async fn test_capture_amount_is_rounded_minor_units() {
		let h = harness(vec![order("42", "payex_payment", Some("3"), "123.456")]);

		h.reconciler.capture_payment("42").await.unwrap();

		let calls = h.payment.calls().await;
		let GatewayCall::Capture(request) = &calls[0] else {
			panic!("expected capture, got {:?}", calls[0]);
		};
		assert_eq!(request.amount, 12346);
		assert_eq!(request.vat_amount, 0);
		assert_eq!(request.order_id, "42");
		assert_eq!(request.transaction_number, "123456");
		assert_eq!(request.additional_values, "");
	}

	#[tokio::test]
	async fn test_factoring_capture_sends_order_lines() {
		let h = harness(vec![order("7", "payex_factoring", Some("3"), "250.00")]);

		h.reconciler.capture_payment("7").await.unwrap();

		let calls = h.factoring.calls().await;
		let GatewayCall::Capture(request) = &calls[0] else {
			panic!("expected capture, got {:?}", calls[0]);
		};
		assert!(request.additional_values.starts_with("INVOICESALE_ORDERLINES="));
		assert!(h.payment.calls().await.is_empty());
	}

	#[tokio::test]
	async fn test_unrepresentable_order_line_fails_before_calling() {
		let mut unrepresentable = order("7", "payex_factoring", Some("3"), "250.00");
		unrepresentable.items = vec![OrderLine {
			name: "Widget".to_string(),
			quantity: Decimal::from_str("0.5").unwrap(),
			total: Decimal::MAX,
			tax: Decimal::ZERO,
		}];
		let h = harness(vec![unrepresentable]);

		let err = h.reconciler.capture_payment("7").await.unwrap_err();
		assert!(matches!(err, ReconcileError::Amount(AmountError::Overflow(_))));
		assert!(h.factoring.calls().await.is_empty());
		assert_eq!(stored_status(&h, "7").await.as_deref(), Some("3"));
		assert!(h.reconciler.locks.is_empty());
	}

	struct PanickingGateway;

	#[async_trait]
	impl GatewayInterface for PanickingGateway {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			Box::new(StaticGatewaySchema)
		}

		async fn capture(&self, _request: &CaptureRequest) -> Result<GatewayResult, GatewayError> {
			panic!("client panicked during capture");
		}

		async fn cancel(&self, _request: &CancelRequest) -> Result<GatewayResult, GatewayError> {
			panic!("client panicked during cancel");
		}
	}

	#[tokio::test]
	async fn test_lock_entry_released_when_gateway_panics() {
		let gateways = GatewayService::new(vec![RegisteredGateway::new(
			"payex_payment",
			GatewayKind::Payment,
			Arc::new(PanickingGateway),
		)]);
		let store = OrderStoreService::new(Box::new(MemoryOrderStore::with_orders(vec![order(
			"1",
			"payex_payment",
			Some("3"),
			"100",
		)])));
		let reconciler = Reconciler::new(Arc::new(store), Arc::new(gateways), EventBus::new(16));

		let result = AssertUnwindSafe(reconciler.capture_payment("1"))
			.catch_unwind()
			.await;
		assert!(result.is_err());
		assert!(reconciler.locks.is_empty());

		let result = AssertUnwindSafe(reconciler.cancel_payment("1"))
			.catch_unwind()
			.await;
		assert!(result.is_err());
		assert!(reconciler.locks.is_empty());
	}

	#[tokio::test]
	async fn test_factoring_cancel_goes_through_payment_gateway() {
		let h = harness(vec![order("7", "payex_factoring", Some("3"), "250.00")]);

		let outcome = h.reconciler.cancel_payment("7").await.unwrap();
		assert!(matches!(outcome, Outcome::Cancelled { .. }));
		assert_eq!(stored_status(&h, "7").await.as_deref(), Some("4"));

		assert_eq!(
			h.payment.calls().await,
			vec![GatewayCall::Cancel(CancelRequest {
				account_number: String::new(),
				transaction_number: "123456".to_string(),
			})]
		);
		assert!(h.factoring.calls().await.is_empty());
	}

	#[tokio::test]
	async fn test_cancel_without_payment_gateway_fails() {
		let factoring = Arc::new(StaticGateway::succeeding());
		let gateways = GatewayService::new(vec![RegisteredGateway::new(
			"payex_factoring",
			GatewayKind::Factoring,
			factoring.clone(),
		)]);
		let store = OrderStoreService::new(Box::new(MemoryOrderStore::with_orders(vec![order(
			"7",
			"payex_factoring",
			Some("3"),
			"250.00",
		)])));
		let reconciler = Reconciler::new(Arc::new(store), Arc::new(gateways), EventBus::new(16));

		let err = reconciler.cancel_payment("7").await.unwrap_err();
		assert!(matches!(err, ReconcileError::Config(_)));
		assert!(factoring.calls().await.is_empty());
		assert_eq!(
			reconciler
				.store()
				.get_meta("7", TRANSACTION_STATUS_META)
				.await
				.unwrap()
				.as_deref(),
			Some("3")
		);
	}

	#[tokio::test]
	async fn test_cancel_records_status_and_note() {
		let h = harness(vec![order("1", "payex_payment", Some("3"), "100")]);

		let outcome = h.reconciler.cancel_payment("1").await.unwrap();
		assert!(matches!(outcome, Outcome::Cancelled { .. }));
		assert_eq!(stored_status(&h, "1").await.as_deref(), Some("4"));
		assert_eq!(
			notes(&h, "1").await,
			vec!["Transaction canceled. Transaction Id: 123456".to_string()]
		);

		let calls = h.payment.calls().await;
		assert_eq!(
			calls,
			vec![GatewayCall::Cancel(CancelRequest {
				account_number: String::new(),
				transaction_number: "123456".to_string(),
			})]
		);
	}

	#[tokio::test]
	async fn test_transitions_dispatch() {
		let h = harness(vec![
			order("1", "payex_payment", Some("3"), "10"),
			order("2", "payex_payment", Some("3"), "10"),
			order("3", "payex_payment", Some("3"), "10"),
			order("4", "payex_payment", Some("3"), "10"),
		]);

		let transition = |id: &str, from: OrderStatus, to: OrderStatus| {
			OrderTransition::new(id, from, to)
		};

		let outcome = h
			.reconciler
			.handle_transition(&transition("1", OrderStatus::OnHold, OrderStatus::Processing))
			.await
			.unwrap();
		assert!(matches!(outcome, Outcome::Captured { .. }));

		let outcome = h
			.reconciler
			.handle_transition(&transition("2", OrderStatus::OnHold, OrderStatus::Completed))
			.await
			.unwrap();
		assert!(matches!(outcome, Outcome::Captured { .. }));

		let outcome = h
			.reconciler
			.handle_transition(&transition("3", OrderStatus::OnHold, OrderStatus::Cancelled))
			.await
			.unwrap();
		assert!(matches!(outcome, Outcome::Cancelled { .. }));

		let outcome = h
			.reconciler
			.handle_transition(&transition("4", OrderStatus::Processing, OrderStatus::Completed))
			.await
			.unwrap();
		assert_eq!(
			outcome,
			Outcome::skipped(SkipReason::IgnoredTransition {
				from: "processing".to_string(),
				to: "completed".to_string(),
			})
		);
		assert_eq!(stored_status(&h, "4").await.as_deref(), Some("3"));
		assert_eq!(h.payment.calls().await.len(), 3);
	}

	#[tokio::test]
	async fn test_unknown_order() {
		let h = harness(Vec::new());
		assert!(matches!(
			h.reconciler.capture_payment("404").await,
			Err(ReconcileError::OrderNotFound(id)) if id == "404"
		));
	}
}
