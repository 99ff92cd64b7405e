//! Member domain model.
//!
//! Members are owned by the account system; the payment flow only needs
//! their identity and contact details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a Member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    /// Creates a new random MemberId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MemberId from an existing UUID.
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

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MemberId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A registered customer who can own payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Login email, also used to scope payment lookups
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Creates a new member.
    ///
    /// # Validation
    /// - Email must be non-blank and contain `@`
    /// - Name cannot be empty
    pub fn new(email: String, name: String) -> Result<Self, DomainError> {
        let email = email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::ValidationError(format!(
                "Invalid member email: '{}'",
                email
            )));
        }
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Member name cannot be empty".into(),
            ));
        }

        Ok(Self {
            id: MemberId::new(),
            email,
            name,
            created_at: Utc::now(),
        })
    }

    /// Creates a member with all fields specified (for database reconstruction).
    pub fn from_parts(id: MemberId, email: String, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            name,
            created_at,
        }
    }
}
