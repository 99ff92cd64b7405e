//! Shared database row types for SQLite and PostgreSQL.
//!
//! PostgreSQL stores native UUID/TIMESTAMPTZ/BOOLEAN columns; SQLite stores
//! TEXT ids, RFC 3339 timestamps and integer flags. Each backend gets its own
//! row structs so both features can be enabled at once.

use payments_types::{PaymentType, RepoError};

/// Column list matching the payment row structs, for SELECTs.
pub const PAYMENT_COLUMNS: &str = "id, owner_id, payment_type, amount, order_id, order_name, \
     success_url, fail_url, payment_key, success, fail_reason, created_at, updated_at";

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_payment_type(s: &str) -> Result<PaymentType, RepoError> {
    s.parse()
        .map_err(|_| RepoError::Database(format!("Unknown payment type: {}", s)))
}

/// Maps sqlx errors, turning unique-constraint violations into `Conflict`.
pub fn map_db_error(err: sqlx::Error) -> RepoError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepoError::Conflict(db_err.message().to_string())
        }
        _ => RepoError::Database(err.to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
pub mod pg {
    use chrono::{DateTime, Utc};
    use sqlx::FromRow;
    use uuid::Uuid;

    use payments_types::{Member, MemberId, Payment, PaymentId, RepoError};

    use super::parse_payment_type;

    /// Member row from database.
    #[derive(FromRow)]
    pub struct DbMember {
        pub id: Uuid,
        pub email: String,
        pub name: String,
        pub created_at: DateTime<Utc>,
    }

    /// Payment row from database.
    #[derive(FromRow)]
    pub struct DbPayment {
        pub id: Uuid,
        pub owner_id: Uuid,
        pub payment_type: String,
        pub amount: i64,
        pub order_id: String,
        pub order_name: String,
        pub success_url: Option<String>,
        pub fail_url: Option<String>,
        pub payment_key: Option<String>,
        pub success: bool,
        pub fail_reason: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl DbMember {
        /// Convert database row to domain Member.
        pub fn into_domain(self) -> Result<Member, RepoError> {
            Ok(Member::from_parts(
                MemberId::from_uuid(self.id),
                self.email,
                self.name,
                self.created_at,
            ))
        }
    }

    impl DbPayment {
        /// Convert database row to domain Payment.
        pub fn into_domain(self) -> Result<Payment, RepoError> {
            Ok(Payment::from_parts(
                PaymentId::from_uuid(self.id),
                MemberId::from_uuid(self.owner_id),
                parse_payment_type(&self.payment_type)?,
                self.amount,
                self.order_id,
                self.order_name,
                self.success_url,
                self.fail_url,
                self.payment_key,
                self.success,
                self.fail_reason,
                self.created_at,
                self.updated_at,
            ))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
pub mod lite {
    use chrono::{DateTime, Utc};
    use sqlx::FromRow;

    use payments_types::{Member, MemberId, Payment, PaymentId, RepoError};

    use super::parse_payment_type;

    /// Member row from database.
    #[derive(FromRow)]
    pub struct DbMember {
        pub id: String,
        pub email: String,
        pub name: String,
        pub created_at: String,
    }

    /// Payment row from database.
    #[derive(FromRow)]
    pub struct DbPayment {
        pub id: String,
        pub owner_id: String,
        pub payment_type: String,
        pub amount: i64,
        pub order_id: String,
        pub order_name: String,
        pub success_url: Option<String>,
        pub fail_url: Option<String>,
        pub payment_key: Option<String>,
        pub success: i64,
        pub fail_reason: Option<String>,
        pub created_at: String,
        pub updated_at: String,
    }

    fn parse_uuid(s: &str) -> Result<uuid::Uuid, RepoError> {
        uuid::Uuid::parse_str(s).map_err(|e| RepoError::Database(e.to_string()))
    }

    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepoError> {
        Ok(DateTime::parse_from_rfc3339(s)
            .map_err(|e| RepoError::Database(e.to_string()))?
            .with_timezone(&Utc))
    }

    impl DbMember {
        /// Convert database row to domain Member.
        pub fn into_domain(self) -> Result<Member, RepoError> {
            Ok(Member::from_parts(
                MemberId::from_uuid(parse_uuid(&self.id)?),
                self.email,
                self.name,
                parse_timestamp(&self.created_at)?,
            ))
        }
    }

    impl DbPayment {
        /// Convert database row to domain Payment.
        pub fn into_domain(self) -> Result<Payment, RepoError> {
            Ok(Payment::from_parts(
                PaymentId::from_uuid(parse_uuid(&self.id)?),
                MemberId::from_uuid(parse_uuid(&self.owner_id)?),
                parse_payment_type(&self.payment_type)?,
                self.amount,
                self.order_id,
                self.order_name,
                self.success_url,
                self.fail_url,
                self.payment_key,
                self.success != 0,
                self.fail_reason,
                parse_timestamp(&self.created_at)?,
                parse_timestamp(&self.updated_at)?,
            ))
        }
    }
}
