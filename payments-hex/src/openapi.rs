//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use payments_types::domain::{MemberId, PaymentId, PaymentStatus, PaymentType};
use payments_types::dto::{
    ConfirmPaymentQuery, FailPaymentQuery, PaymentDetails, PaymentRequest, PaymentResponse,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::inbound::MEMBER_ID_HEADER;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Start a payment for the calling member
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "payments",
    request_body = PaymentRequest,
    security(("member_id" = [])),
    responses(
        (status = 201, description = "Pending payment created", body = PaymentResponse),
        (status = 400, description = "Invalid amount, order id or order name"),
        (status = 401, description = "Missing or invalid X-Member-Id header"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Order already has a payment")
    )
)]
async fn request_payment() {}

/// Gateway success redirect; confirms the payment with the gateway
#[utoipa::path(
    get,
    path = "/api/payments/success",
    tag = "callbacks",
    params(ConfirmPaymentQuery),
    responses(
        (status = 200, description = "Gateway response body, relayed verbatim", body = inline(serde_json::Value)),
        (status = 400, description = "Amount does not match the stored payment"),
        (status = 404, description = "No payment for the order"),
        (status = 502, description = "Gateway rejected the payment or was unreachable")
    )
)]
async fn confirm_payment() {}

/// Gateway fail redirect; records the failure reason
#[utoipa::path(
    get,
    path = "/api/payments/fail",
    tag = "callbacks",
    params(FailPaymentQuery),
    responses(
        (status = 200, description = "Payment after recording the failure", body = PaymentDetails),
        (status = 404, description = "No payment for the order")
    )
)]
async fn fail_payment() {}

/// Get one of the calling member's payments by gateway key
#[utoipa::path(
    get,
    path = "/api/payments/{payment_key}",
    tag = "payments",
    security(("member_id" = [])),
    params(
        ("payment_key" = String, Path, description = "Key issued by the gateway")
    ),
    responses(
        (status = 200, description = "Payment details", body = PaymentDetails),
        (status = 401, description = "Missing or invalid X-Member-Id header"),
        (status = 404, description = "Payment not found for this member")
    )
)]
async fn get_payment() {}

/// OpenAPI documentation for the Payments API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payments Service API",
        version = "1.0.0",
        description = "Creates pending payments for members and confirms them with the payment gateway.\n\n## Identity\n\nMember endpoints expect the caller's member id, set by the authenticating proxy:\n\n```\nX-Member-Id: 123e4567-e89b-12d3-a456-426614174000\n```\n\nThe gateway redirect callbacks need no header.",
        license(name = "MIT"),
    ),
    paths(
        health,
        request_payment,
        confirm_payment,
        fail_payment,
        get_payment,
    ),
    components(
        schemas(
            PaymentRequest,
            PaymentResponse,
            PaymentDetails,
            PaymentType,
            PaymentStatus,
            PaymentId,
            MemberId,
            ConfirmPaymentQuery,
            FailPaymentQuery,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "payments", description = "Payment requests and lookups"),
        (name = "callbacks", description = "Gateway redirect targets"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the member id header.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "member_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(MEMBER_ID_HEADER))),
            );
        }
    }
}
