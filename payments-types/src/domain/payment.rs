//! Payment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::member::MemberId;
use crate::error::DomainError;

/// Unique identifier for a Payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Creates a new random PaymentId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a PaymentId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Card,
    VirtualAccount,
    Transfer,
    MobilePhone,
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentType::Card => write!(f, "CARD"),
            PaymentType::VirtualAccount => write!(f, "VIRTUAL_ACCOUNT"),
            PaymentType::Transfer => write!(f, "TRANSFER"),
            PaymentType::MobilePhone => write!(f, "MOBILE_PHONE"),
        }
    }
}

impl std::str::FromStr for PaymentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CARD" => Ok(PaymentType::Card),
            "VIRTUAL_ACCOUNT" => Ok(PaymentType::VirtualAccount),
            "TRANSFER" => Ok(PaymentType::Transfer),
            "MOBILE_PHONE" => Ok(PaymentType::MobilePhone),
            other => Err(DomainError::ValidationError(format!(
                "Unknown payment type: {}",
                other
            ))),
        }
    }
}

/// Derived lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Created, waiting for the gateway callback
    Pending,
    /// Accepted by the gateway
    Confirmed,
    /// The gateway redirected to the fail URL
    Failed,
}

/// A payment attempt for one merchant order.
///
/// Rows are never deleted; a payment is mutated once when the gateway
/// accepts it (or once when the gateway reports a failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// Member who owns this payment
    pub owner: MemberId,
    pub payment_type: PaymentType,
    /// Amount in integer currency units
    pub amount: i64,
    /// Merchant-side order identifier (unique)
    pub order_id: String,
    pub order_name: String,
    /// Success redirect as requested (None = configured default)
    pub success_url: Option<String>,
    /// Fail redirect as requested (None = configured default)
    pub fail_url: Option<String>,
    /// Gateway-issued key, set once the gateway accepts the payment
    pub payment_key: Option<String>,
    /// True once the gateway confirmed the payment
    pub success: bool,
    /// Failure reported by the gateway fail redirect
    pub fail_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new pending payment.
    ///
    /// # Validation
    /// - Amount must be positive
    /// - Order id and order name cannot be blank
    pub fn new(
        owner: MemberId,
        payment_type: PaymentType,
        amount: i64,
        order_id: String,
        order_name: String,
        success_url: Option<String>,
        fail_url: Option<String>,
    ) -> Result<Self, DomainError> {
        if amount <= 0 {
            return Err(DomainError::NonPositiveAmount(amount));
        }
        if order_id.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Order id cannot be empty".into(),
            ));
        }
        if order_name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Order name cannot be empty".into(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: PaymentId::new(),
            owner,
            payment_type,
            amount,
            order_id,
            order_name,
            success_url,
            fail_url,
            payment_key: None,
            success: false,
            fail_reason: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Checks the amount reported by the gateway callback against the stored one.
    ///
    /// Strict integer equality; no tolerance.
    pub fn verify_amount(&self, amount: i64) -> Result<(), DomainError> {
        if self.amount != amount {
            return Err(DomainError::AmountMismatch {
                expected: self.amount,
                got: amount,
            });
        }
        Ok(())
    }

    /// Records the gateway acceptance.
    pub fn confirm(&mut self, payment_key: impl Into<String>) {
        self.payment_key = Some(payment_key.into());
        self.success = true;
        self.fail_reason = None;
        self.updated_at = Utc::now();
    }

    /// Records a failure reported by the gateway. Confirmed payments are left untouched.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.success {
            return;
        }
        self.fail_reason = Some(reason.into());
        self.updated_at = Utc::now();
    }

    /// Returns the lifecycle state derived from the stored fields.
    pub fn status(&self) -> PaymentStatus {
        if self.success {
            PaymentStatus::Confirmed
        } else if self.fail_reason.is_some() {
            PaymentStatus::Failed
        } else {
            PaymentStatus::Pending
        }
    }

    /// Reconstructs a payment from database fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: PaymentId,
        owner: MemberId,
        payment_type: PaymentType,
        amount: i64,
        order_id: String,
        order_name: String,
        success_url: Option<String>,
        fail_url: Option<String>,
        payment_key: Option<String>,
        success: bool,
        fail_reason: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            payment_type,
            amount,
            order_id,
            order_name,
            success_url,
            fail_url,
            payment_key,
            success,
            fail_reason,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(amount: i64) -> Payment {
        Payment::new(
            MemberId::new(),
            PaymentType::Card,
            amount,
            "order-1".to_string(),
            "Coffee beans".to_string(),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_new_payment_is_pending() {
        let payment = pending(1000);
        assert!(!payment.success);
        assert!(payment.payment_key.is_none());
        assert_eq!(payment.status(), PaymentStatus::Pending);
    }

    #[test]
    fn test_non_positive_amount_fails() {
        let result = Payment::new(
            MemberId::new(),
            PaymentType::Card,
            0,
            "order-1".into(),
            "Coffee".into(),
            None,
            None,
        );
        assert!(matches!(result, Err(DomainError::NonPositiveAmount(0))));
    }

    #[test]
    fn test_blank_order_id_fails() {
        let result = Payment::new(
            MemberId::new(),
            PaymentType::Card,
            100,
            " ".into(),
            "Coffee".into(),
            None,
            None,
        );
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_verify_amount() {
        let payment = pending(1000);
        assert!(payment.verify_amount(1000).is_ok());
        assert!(matches!(
            payment.verify_amount(900),
            Err(DomainError::AmountMismatch {
                expected: 1000,
                got: 900
            })
        ));
    }

    #[test]
    fn test_confirm_sets_key_and_flag() {
        let mut payment = pending(5000);
        payment.confirm("pk_123");
        assert_eq!(payment.payment_key.as_deref(), Some("pk_123"));
        assert!(payment.success);
        assert_eq!(payment.status(), PaymentStatus::Confirmed);
    }

    #[test]
    fn test_fail_does_not_touch_confirmed_payment() {
        let mut payment = pending(5000);
        payment.fail("PAY_PROCESS_CANCELED: user canceled");
        assert_eq!(payment.status(), PaymentStatus::Failed);

        payment.confirm("pk_123");
        payment.fail("LATE: ignored");
        assert_eq!(payment.status(), PaymentStatus::Confirmed);
        assert!(payment.fail_reason.is_none());
    }

    #[test]
    fn test_payment_type_round_trip_names() {
        for ty in [
            PaymentType::Card,
            PaymentType::VirtualAccount,
            PaymentType::Transfer,
            PaymentType::MobilePhone,
        ] {
            assert_eq!(ty.to_string().parse::<PaymentType>().unwrap(), ty);
        }
        assert!("CASH".parse::<PaymentType>().is_err());
    }
}
