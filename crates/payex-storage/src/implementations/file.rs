//! File-backed order store.
//!
//! Each order is kept as one JSON document. Writes go to a temporary file that
//! is renamed over the previous document, and read-modify-write sequences are
//! serialized by a process-local lock.

use crate::{OrderStoreInterface, StorageError};
use async_trait::async_trait;
use payex_types::{ConfigSchema, Field, FieldType, Order, OrderNote, Schema, ValidationError};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

const DEFAULT_STORAGE_PATH: &str = "./data/orders";

/// File-based order store.
pub struct FileOrderStore {
	/// Base directory holding one `<order id>.json` per order.
	base_path: PathBuf,
	write_lock: Mutex<()>,
}

impl FileOrderStore {
	pub fn new(base_path: PathBuf) -> Self {
		Self {
			base_path,
			write_lock: Mutex::new(()),
		}
	}

	/// Maps an order id to its document path.
	///
	/// The id is percent-encoded, so distinct ids never share a file and
	/// path separators cannot escape the base directory.
	fn order_path(&self, order_id: &str) -> PathBuf {
		self.base_path
			.join(format!("{}.json", urlencoding::encode(order_id)))
	}

	async fn read(&self, order_id: &str) -> Result<Order, StorageError> {
		let path = self.order_path(order_id);
		let bytes = match fs::read(&path).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(StorageError::NotFound(order_id.to_string()))
			}
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	async fn write(&self, order: &Order) -> Result<(), StorageError> {
		let path = self.order_path(&order.id);
		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		let bytes =
			serde_json::to_vec_pretty(order).map_err(|e| StorageError::Serialization(e.to_string()))?;

		let temp_path = path.with_extension("json.tmp");
		fs::write(&temp_path, bytes)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

	/// Applies `update` to the stored order under the write lock. The order is
	/// only rewritten when `update` returns true.
	async fn modify<F>(&self, order_id: &str, update: F) -> Result<bool, StorageError>
	where
		F: FnOnce(&mut Order) -> bool + Send,
	{
		let _guard = self.write_lock.lock().await;
		let mut order = self.read(order_id).await?;
		if !update(&mut order) {
			return Ok(false);
		}
		self.write(&order).await?;
		Ok(true)
	}
}

#[async_trait]
impl OrderStoreInterface for FileOrderStore {
	async fn get_order(&self, order_id: &str) -> Result<Order, StorageError> {
		self.read(order_id).await
	}

	async fn put_order(&self, order: &Order) -> Result<(), StorageError> {
		let _guard = self.write_lock.lock().await;
		self.write(order).await
	}

	async fn get_meta(&self, order_id: &str, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.read(order_id).await?.meta.get(key).cloned())
	}

	async fn set_meta(&self, order_id: &str, key: &str, value: &str) -> Result<(), StorageError> {
		self.modify(order_id, |order| {
			order.meta.insert(key.to_string(), value.to_string());
			true
		})
		.await?;
		Ok(())
	}

	async fn compare_and_set_meta(
		&self,
		order_id: &str,
		key: &str,
		expected: Option<&str>,
		value: &str,
	) -> Result<bool, StorageError> {
		self.modify(order_id, |order| {
			if order.meta.get(key).map(String::as_str) != expected {
				return false;
			}
			order.meta.insert(key.to_string(), value.to_string());
			true
		})
		.await
	}

	async fn add_note(&self, order_id: &str, note: OrderNote) -> Result<(), StorageError> {
		self.modify(order_id, |order| {
			order.notes.push(note);
			true
		})
		.await?;
		Ok(())
	}
}

/// Configuration schema for the file backend.
pub struct FileStoreSchema;

impl ConfigSchema for FileStoreSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![], vec![Field::new("storage_path", FieldType::String)]).validate(config)
	}
}

/// Factory function to create the file backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for order documents (default: "./data/orders")
pub fn create_store(config: &toml::Value) -> Result<Box<dyn OrderStoreInterface>, StorageError> {
	FileStoreSchema
		.validate(config)
		.map_err(|e| StorageError::Backend(format!("Invalid file store configuration: {}", e)))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_STORAGE_PATH);

	tracing::debug!(path = %storage_path, "Using file order store");
	Ok(Box::new(FileOrderStore::new(PathBuf::from(storage_path))))
}
