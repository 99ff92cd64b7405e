//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Member, Payment, PaymentId, PaymentStatus, PaymentType};

// ─────────────────────────────────────────────────────────────────────────────
// Member DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a member (seeding only; members are managed elsewhere).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateMemberRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice")]
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to start a payment for an order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    pub payment_type: PaymentType,
    /// Amount in integer currency units
    #[schema(example = 5000)]
    pub amount: i64,
    /// Merchant-side order identifier
    #[schema(example = "order-20240101-0001")]
    pub order_id: String,
    #[schema(example = "Coffee beans 1kg")]
    pub order_name: String,
    /// Redirect after a successful payment (defaults to the configured URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    /// Redirect after a failed payment (defaults to the configured URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,
}

/// Response after creating a pending payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub payment_id: PaymentId,
    pub payment_type: PaymentType,
    #[schema(example = 5000)]
    pub amount: i64,
    pub order_id: String,
    pub order_name: String,
    #[schema(example = "alice@example.com")]
    pub customer_email: String,
    pub customer_name: String,
    /// Effective success redirect
    pub success_url: String,
    /// Effective fail redirect
    pub fail_url: String,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

impl PaymentResponse {
    /// Builds the response from a stored payment, its owner and the effective redirects.
    pub fn from_payment(
        payment: &Payment,
        owner: &Member,
        success_url: String,
        fail_url: String,
    ) -> Self {
        Self {
            payment_id: payment.id,
            payment_type: payment.payment_type,
            amount: payment.amount,
            order_id: payment.order_id.clone(),
            order_name: payment.order_name.clone(),
            customer_email: owner.email.clone(),
            customer_name: owner.name.clone(),
            success_url,
            fail_url,
            success: payment.success,
            created_at: payment.created_at,
        }
    }
}

/// Stored state of a payment, as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentDetails {
    pub payment_id: PaymentId,
    pub payment_type: PaymentType,
    pub amount: i64,
    pub order_id: String,
    pub order_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_key: Option<String>,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDetails {
    fn from(payment: Payment) -> Self {
        Self {
            payment_id: payment.id,
            payment_type: payment.payment_type,
            amount: payment.amount,
            status: payment.status(),
            order_id: payment.order_id,
            order_name: payment.order_name,
            payment_key: payment.payment_key,
            fail_reason: payment.fail_reason,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gateway redirect callbacks
// ─────────────────────────────────────────────────────────────────────────────

/// Query string of the gateway's success redirect.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConfirmPaymentQuery {
    /// Key issued by the gateway for this payment attempt
    pub payment_key: String,
    pub order_id: String,
    /// Amount the customer actually authorized
    pub amount: i64,
}

/// Query string of the gateway's fail redirect.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FailPaymentQuery {
    /// Gateway error code
    #[schema(example = "PAY_PROCESS_CANCELED")]
    pub code: String,
    pub message: String,
    pub order_id: String,
}
