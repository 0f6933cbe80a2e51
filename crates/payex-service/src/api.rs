//! HTTP API for the reconciler.
//!
//! The platform posts order status transitions to the webhook and pushes
//! order snapshots with `PUT /orders/{id}`. Operators can trigger a capture
//! or cancel by hand.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use payex_core::{ReconcileError, Reconciler};
use payex_gateway::CheckoutFee;
use payex_storage::StorageError;
use payex_types::{Order, OrderTransition, Outcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
	reconciler: Arc<Reconciler>,
}

/// Builds the API router.
pub fn router(reconciler: Arc<Reconciler>) -> Router {
	Router::new()
		.route("/health", get(health_check))
		.route("/webhooks/order-transition", post(order_transition))
		.route("/orders/{id}", get(get_order).put(put_order))
		.route("/orders/{id}/capture", post(capture_order))
		.route("/orders/{id}/cancel", post(cancel_order))
		.route("/checkout/fee", post(checkout_fee))
		.with_state(AppState { reconciler })
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
}

/// Serves the API until the task is aborted.
pub async fn start_http_server(
	reconciler: Arc<Reconciler>,
	host: String,
	port: u16,
) -> anyhow::Result<()> {
	let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
	info!("API server listening on {}:{}", host, port);
	axum::serve(listener, router(reconciler)).await?;
	Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

/// Request body for `POST /checkout/fee`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FeeRequest {
	/// Payment method the customer picked, if any.
	#[serde(default)]
	pub chosen_gateway: Option<String>,
	/// Store default payment method, if any.
	#[serde(default)]
	pub default_gateway: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeeResponse {
	pub fee: Option<CheckoutFee>,
}

struct ApiError {
	status: StatusCode,
	error: &'static str,
	message: String,
}

impl ApiError {
	fn bad_request(message: impl Into<String>) -> Self {
		Self {
			status: StatusCode::BAD_REQUEST,
			error: "BAD_REQUEST",
			message: message.into(),
		}
	}
}

impl From<ReconcileError> for ApiError {
	fn from(err: ReconcileError) -> Self {
		let (status, error) = match &err {
			ReconcileError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
			ReconcileError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
			ReconcileError::SettlementFailed { .. } => (StatusCode::BAD_GATEWAY, "SETTLEMENT_FAILED"),
			ReconcileError::Gateway(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR"),
			ReconcileError::Amount(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_AMOUNT"),
			ReconcileError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
			ReconcileError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
		};
		Self {
			status,
			error,
			message: err.to_string(),
		}
	}
}

impl From<StorageError> for ApiError {
	fn from(err: StorageError) -> Self {
		ReconcileError::from(err).into()
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		if self.status.is_server_error() {
			warn!(error = self.error, "{}", self.message);
		}
		let body = ErrorResponse {
			error: self.error.to_string(),
			message: self.message,
		};
		(self.status, Json(body)).into_response()
	}
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
	let gateways: Vec<&str> = state.reconciler.gateways().ids().collect();
	Json(serde_json::json!({
		"status": "ok",
		"gateways": gateways,
	}))
}

async fn order_transition(
	State(state): State<AppState>,
	Json(transition): Json<OrderTransition>,
) -> Result<Json<Outcome>, ApiError> {
	let outcome = state.reconciler.handle_transition(&transition).await?;
	Ok(Json(outcome))
}

async fn capture_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
	Ok(Json(state.reconciler.capture_payment(&id).await?))
}

async fn cancel_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Outcome>, ApiError> {
	Ok(Json(state.reconciler.cancel_payment(&id).await?))
}

async fn get_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
	Ok(Json(state.reconciler.store().get_order(&id).await?))
}

async fn put_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(order): Json<Order>,
) -> Result<StatusCode, ApiError> {
	if order.id != id {
		return Err(ApiError::bad_request(format!(
			"Order id '{}' does not match path '{}'",
			order.id, id
		)));
	}
	state.reconciler.store().put_order(&order).await?;
	Ok(StatusCode::NO_CONTENT)
}

async fn checkout_fee(
	State(state): State<AppState>,
	Json(request): Json<FeeRequest>,
) -> Json<FeeResponse> {
	let fee = state.reconciler.gateways().checkout_fee(
		request.chosen_gateway.as_deref(),
		request.default_gateway.as_deref(),
	);
	Json(FeeResponse { fee })
}
