//! Service wrapper for the PayEx reconciler.
//!
//! # Components
//!
//! - `api`: HTTP endpoints for platform webhooks and manual settlement
//! - `alerts`: operator-facing logging of reconciliation events
//! - `cli`: command-line interface

pub mod alerts;
pub mod api;
pub mod cli;
