//! Shared types for the PayEx settlement reconciler.
//!
//! This crate holds the data model exchanged between the order store, the
//! gateway clients and the reconciler: orders and their statuses, vendor
//! transaction status codes, capture/cancel request and result values,
//! gateway kinds, reconciliation events and configuration schemas.

pub mod events;
pub mod gateway;
pub mod order;
pub mod transaction;
pub mod validation;

pub use events::*;
pub use gateway::*;
pub use order::*;
pub use transaction::*;
pub use validation::*;
