//! Order delivery and payment-method attributes.
//!
//! Every concrete order shares the same delivery/payment block; the kind of
//! order is carried as a discriminant next to it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Card issuers accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardCompany {
    Hyundai,
    Samsung,
    Shinhan,
    Kookmin,
    Lotte,
    Bc,
    Hana,
    Woori,
    Nonghyup,
    Citi,
}

impl std::fmt::Display for CardCompany {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CardCompany::Hyundai => "HYUNDAI",
            CardCompany::Samsung => "SAMSUNG",
            CardCompany::Shinhan => "SHINHAN",
            CardCompany::Kookmin => "KOOKMIN",
            CardCompany::Lotte => "LOTTE",
            CardCompany::Bc => "BC",
            CardCompany::Hana => "HANA",
            CardCompany::Woori => "WOORI",
            CardCompany::Nonghyup => "NONGHYUP",
            CardCompany::Citi => "CITI",
        };
        write!(f, "{}", name)
    }
}

/// Card selected as the payment method of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CardInfo {
    pub company: CardCompany,
    /// Card number, possibly already partially masked with `*`
    #[schema(example = "1234-****-****-5678")]
    pub number: String,
}

impl CardInfo {
    /// Creates card info, rejecting numbers that cannot be a (masked) card number.
    pub fn new(company: CardCompany, number: impl Into<String>) -> Result<Self, DomainError> {
        let number = number.into().trim().to_string();

        let valid_chars = number
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '*'));
        let digits = number.chars().filter(char::is_ascii_digit).count();

        if !valid_chars || digits < 4 {
            return Err(DomainError::ValidationError(
                "Card number must contain at least 4 digits and only digits, spaces, '-' or '*'"
                    .into(),
            ));
        }

        Ok(Self { company, number })
    }

    /// Returns the number with every digit except the last four replaced by `*`.
    pub fn masked(&self) -> String {
        let digits = self.number.chars().filter(char::is_ascii_digit).count();
        let keep_from = digits.saturating_sub(4);

        let mut seen = 0;
        self.number
            .chars()
            .map(|c| {
                if c.is_ascii_digit() {
                    seen += 1;
                    if seen <= keep_from { '*' } else { c }
                } else {
                    c
                }
            })
            .collect()
    }
}

/// Delivery and payment-method attributes shared by every order kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderDetails {
    pub delivery_address: String,
    /// Ship to the member's default address instead of `delivery_address`
    pub use_default_address: bool,
    /// Charge the member's default payment method
    pub use_default_pay_method: bool,
    /// Present only when a card payment is selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardInfo>,
}

impl OrderDetails {
    /// Creates the order block.
    ///
    /// # Validation
    /// - Delivery address cannot be blank unless the default address is used
    pub fn new(
        delivery_address: String,
        use_default_address: bool,
        use_default_pay_method: bool,
        card: Option<CardInfo>,
    ) -> Result<Self, DomainError> {
        if !use_default_address && delivery_address.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Delivery address is required when the default address is not used".into(),
            ));
        }

        Ok(Self {
            delivery_address,
            use_default_address,
            use_default_pay_method,
            card,
        })
    }

    /// Returns true if a card payment method is selected.
    pub fn pays_by_card(&self) -> bool {
        self.card.is_some()
    }
}

/// Concrete kind of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    /// One-off purchase
    Standard,
    /// Recurring delivery
    Subscription,
}

/// An order: its kind plus the shared delivery/payment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub kind: OrderKind,
    #[serde(flatten)]
    pub details: OrderDetails,
}

impl Order {
    pub fn new(kind: OrderKind, details: OrderDetails) -> Self {
        Self { kind, details }
    }
}
