//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use payments_types::{
    AppError, CheckoutRepository, ConfirmPaymentQuery, FailPaymentQuery, GatewayError, MemberId,
    PaymentDetails, PaymentGateway, PaymentRequest,
};

use crate::PaymentService;

/// Application state shared across handlers.
pub struct AppState<R: CheckoutRepository, G: PaymentGateway> {
    pub service: PaymentService<R, G>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(AppError::BadRequest(rejection.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::AmountMismatch { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::MemberNotFound(_) | AppError::OrderNotFound(_) => {
                (StatusCode::NOT_FOUND, self.0.to_string())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Gateway(GatewayError::Rejected { body, .. }) => {
                (StatusCode::BAD_GATEWAY, body.clone())
            }
            AppError::Gateway(e @ GatewayError::Transport(_)) => {
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

/// Start a payment for the calling member.
#[tracing::instrument(skip(state, req), fields(member_id = %member_id))]
pub async fn request_payment<R: CheckoutRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Extension(member_id): Extension<MemberId>,
    req: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let payment = state.service.request_payment(member_id, req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Gateway success redirect: verify, accept and relay the gateway's answer.
#[tracing::instrument(skip(state, query))]
pub async fn confirm_payment<R: CheckoutRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    query: Result<Query<ConfirmPaymentQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let body = state
        .service
        .confirm_payment(&query.payment_key, &query.order_id, query.amount)
        .await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    ))
}

/// Gateway fail redirect.
#[tracing::instrument(skip(state, query))]
pub async fn fail_payment<R: CheckoutRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    query: Result<Query<FailPaymentQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let payment = state
        .service
        .fail_payment(&query.order_id, &query.code, &query.message)
        .await?;
    Ok(Json(PaymentDetails::from(payment)))
}

/// Look up one of the calling member's payments by gateway key.
#[tracing::instrument(skip(state), fields(member_id = %member_id))]
pub async fn get_payment<R: CheckoutRepository, G: PaymentGateway>(
    State(state): State<Arc<AppState<R, G>>>,
    Extension(member_id): Extension<MemberId>,
    Path(payment_key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state.service.find_payment(member_id, &payment_key).await?;
    Ok(Json(PaymentDetails::from(payment)))
}
