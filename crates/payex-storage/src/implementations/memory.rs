//! In-memory order store.

use crate::{OrderStoreInterface, StorageError};
use async_trait::async_trait;
use dashmap::DashMap;
use payex_types::{Order, OrderNote};

/// In-memory order store keyed by order id.
///
/// Each operation holds the entry's shard lock for its duration, which makes
/// compare-and-set atomic within the process.
#[derive(Default)]
pub struct MemoryOrderStore {
	orders: DashMap<String, Order>,
}

impl MemoryOrderStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store seeded with the given orders.
	pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
		let store = Self::new();
		for order in orders {
			store.orders.insert(order.id.clone(), order);
		}
		store
	}
}

#[async_trait]
impl OrderStoreInterface for MemoryOrderStore {
	async fn get_order(&self, order_id: &str) -> Result<Order, StorageError> {
		self.orders
			.get(order_id)
			.map(|entry| entry.value().clone())
			.ok_or_else(|| StorageError::NotFound(order_id.to_string()))
	}

	async fn put_order(&self, order: &Order) -> Result<(), StorageError> {
		self.orders.insert(order.id.clone(), order.clone());
		Ok(())
	}

	async fn get_meta(&self, order_id: &str, key: &str) -> Result<Option<String>, StorageError> {
		let order = self
			.orders
			.get(order_id)
			.ok_or_else(|| StorageError::NotFound(order_id.to_string()))?;
		Ok(order.meta.get(key).cloned())
	}

	async fn set_meta(&self, order_id: &str, key: &str, value: &str) -> Result<(), StorageError> {
		let mut order = self
			.orders
			.get_mut(order_id)
			.ok_or_else(|| StorageError::NotFound(order_id.to_string()))?;
		order.meta.insert(key.to_string(), value.to_string());
		Ok(())
	}

	async fn compare_and_set_meta(
		&self,
		order_id: &str,
		key: &str,
		expected: Option<&str>,
		value: &str,
	) -> Result<bool, StorageError> {
		let mut order = self
			.orders
			.get_mut(order_id)
			.ok_or_else(|| StorageError::NotFound(order_id.to_string()))?;
		if order.meta.get(key).map(String::as_str) != expected {
			return Ok(false);
		}
		order.meta.insert(key.to_string(), value.to_string());
		Ok(true)
	}

	async fn add_note(&self, order_id: &str, note: OrderNote) -> Result<(), StorageError> {
		let mut order = self
			.orders
			.get_mut(order_id)
			.ok_or_else(|| StorageError::NotFound(order_id.to_string()))?;
		order.notes.push(note);
		Ok(())
	}
}

/// Factory function for the memory backend. The backend takes no settings.
pub fn create_store(_config: &toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError> {
	Ok(Box::new(MemoryOrderStore::new()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use payex_types::{OrderStatus, TRANSACTION_STATUS_META};
	use rust_decimal::Decimal;
	use std::collections::HashMap;

	fn order(id: &str) -> Order {
		Order {
			id: id.to_string(),
			payment_method: "payex_payment".to_string(),
			status: OrderStatus::OnHold,
			transaction_id: "123456".to_string(),
			total_amount: Decimal::new(12345, 2),
			currency: Some("SEK".to_string()),
			items: Vec::new(),
			meta: HashMap::from([(TRANSACTION_STATUS_META.to_string(), "3".to_string())]),
			notes: Vec::new(),
		}
	}

	#[tokio::test]
	async fn test_meta_and_notes() {
		let store = MemoryOrderStore::with_orders([order("1")]);

		assert_eq!(
			store.get_meta("1", TRANSACTION_STATUS_META).await.unwrap(),
			Some("3".to_string())
		);
		assert_eq!(store.get_meta("1", "_missing").await.unwrap(), None);

		store.set_meta("1", "_custom", "value").await.unwrap();
		store.add_note("1", OrderNote::new("hello")).await.unwrap();

		let stored = store.get_order("1").await.unwrap();
		assert_eq!(stored.meta.get("_custom").map(String::as_str), Some("value"));
		assert_eq!(stored.notes.len(), 1);
		assert_eq!(stored.notes[0].text, "hello");
	}

	#[tokio::test]
	async fn test_compare_and_set() {
		let store = MemoryOrderStore::with_orders([order("1")]);

		let swapped = store
			.compare_and_set_meta("1", TRANSACTION_STATUS_META, Some("3"), "6")
			.await
			.unwrap();
		assert!(swapped);

		let swapped = store
			.compare_and_set_meta("1", TRANSACTION_STATUS_META, Some("3"), "4")
			.await
			.unwrap();
		assert!(!swapped);
		assert_eq!(
			store.get_meta("1", TRANSACTION_STATUS_META).await.unwrap(),
			Some("6".to_string())
		);
	}

	#[tokio::test]
	async fn test_missing_order() {
		let store = MemoryOrderStore::new();
		assert!(matches!(
			store.get_order("404").await,
			Err(StorageError::NotFound(id)) if id == "404"
		));
		assert!(store.set_meta("404", "k", "v").await.is_err());
	}
}
