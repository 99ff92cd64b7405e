//! Repository port traits.
//!
//! These are the primary ports in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory) implement them.

use crate::domain::{Member, MemberId, Payment, PaymentId};
use crate::dto::CreateMemberRequest;
use crate::error::RepoError;

/// Member lookup (the member store is owned by the account system).
#[async_trait::async_trait]
pub trait MemberRepository: Send + Sync + 'static {
    /// Creates a member. Fails with `Conflict` if the email is taken.
    async fn create_member(&self, req: CreateMemberRequest) -> Result<Member, RepoError>;

    /// Gets a member by ID.
    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, RepoError>;
}

/// Payment persistence.
///
/// Lookups return `Ok(None)` when nothing matches; absence is not an error.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Gets a payment by ID.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;

    /// Inserts or updates a payment (keyed by id) inside one database transaction.
    ///
    /// Fails with `Conflict` if another payment already uses the same order id.
    async fn save(&self, payment: &Payment) -> Result<Payment, RepoError>;

    /// Finds the payment for a merchant order id.
    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>, RepoError>;

    /// Finds a payment by its gateway key, scoped to the owner's email.
    async fn find_by_payment_key_and_owner_email(
        &self,
        payment_key: &str,
        email: &str,
    ) -> Result<Option<Payment>, RepoError>;
}

/// Everything the payment service needs from storage.
pub trait CheckoutRepository: MemberRepository + PaymentRepository {}

impl<T: MemberRepository + PaymentRepository> CheckoutRepository for T {}
