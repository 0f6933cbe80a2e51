//! Order store access for the reconciler.
//!
//! The order store is owned by the e-commerce platform. This crate defines the
//! narrow set of operations the reconciler needs from it, single-field reads
//! and writes plus audit notes, and ships an in-memory and a file-backed
//! backend for running the reconciler standalone.

use async_trait::async_trait;
use payex_types::{Order, OrderNote};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during order store operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// The requested order does not exist.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Trait defining the interface of an order store backend.
///
/// Every operation touches a single field of a single order. No guarantee is
/// made across operations; callers that need one must use
/// [`compare_and_set_meta`](OrderStoreInterface::compare_and_set_meta).
#[async_trait]
pub trait OrderStoreInterface: Send + Sync {
	/// Loads the full order snapshot.
	async fn get_order(&self, order_id: &str) -> Result<Order, StorageError>;

	/// Inserts or replaces an order snapshot.
	async fn put_order(&self, order: &Order) -> Result<(), StorageError>;

	/// Reads a metadata value. Returns `None` when the key is not set.
	async fn get_meta(&self, order_id: &str, key: &str) -> Result<Option<String>, StorageError>;

	/// Writes a metadata value unconditionally.
	async fn set_meta(&self, order_id: &str, key: &str, value: &str) -> Result<(), StorageError>;

	/// Writes a metadata value only if its current value equals `expected`
	/// (`None` meaning unset). Returns whether the write happened.
	async fn compare_and_set_meta(
		&self,
		order_id: &str,
		key: &str,
		expected: Option<&str>,
		value: &str,
	) -> Result<bool, StorageError>;

	/// Appends an audit note to the order.
	async fn add_note(&self, order_id: &str, note: OrderNote) -> Result<(), StorageError>;
}

/// High-level order store service used by the reconciler.
pub struct OrderStoreService {
	backend: Box<dyn OrderStoreInterface>,
}

impl OrderStoreService {
	/// Wraps a backend created by one of the `create_store` factories.
	pub fn new(backend: Box<dyn OrderStoreInterface>) -> Self {
		Self { backend }
	}

	/// Loads the full order snapshot.
	pub async fn get_order(&self, order_id: &str) -> Result<Order, StorageError> {
		self.backend.get_order(order_id).await
	}

	/// Inserts or replaces an order snapshot.
	pub async fn put_order(&self, order: &Order) -> Result<(), StorageError> {
		self.backend.put_order(order).await
	}

	pub async fn get_meta(&self, order_id: &str, key: &str) -> Result<Option<String>, StorageError> {
		self.backend.get_meta(order_id, key).await
	}

	pub async fn set_meta(&self, order_id: &str, key: &str, value: &str) -> Result<(), StorageError> {
		self.backend.set_meta(order_id, key, value).await
	}

	pub async fn compare_and_set_meta(
		&self,
		order_id: &str,
		key: &str,
		expected: Option<&str>,
		value: &str,
	) -> Result<bool, StorageError> {
		self.backend
			.compare_and_set_meta(order_id, key, expected, value)
			.await
	}

	/// Appends a note with the current timestamp.
	pub async fn add_note(&self, order_id: &str, text: impl Into<String>) -> Result<(), StorageError> {
		self.backend.add_note(order_id, OrderNote::new(text)).await
	}
}
