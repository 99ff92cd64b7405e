//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use payments_types::{
    CreateMemberRequest, Member, MemberId, MemberRepository, Payment, PaymentId,
    PaymentRepository, RepoError,
};

use crate::types::lite::{DbMember, DbPayment};
use crate::types::{PAYMENT_COLUMNS, map_db_error};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::debug!("SQLite schema ready");
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        for ddl in [
            include_str!("../migrations/0001_create_members.sql"),
            include_str!("../migrations/0002_create_payments.sql"),
        ] {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Member repository
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl MemberRepository for SqliteRepo {
    async fn create_member(&self, req: CreateMemberRequest) -> Result<Member, RepoError> {
        let member = Member::new(req.email, req.name).map_err(RepoError::Domain)?;

        sqlx::query(r#"INSERT INTO members (id, email, name, created_at) VALUES (?, ?, ?, ?)"#)
            .bind(member.id.to_string())
            .bind(&member.email)
            .bind(&member.name)
            .bind(member.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(member)
    }

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, RepoError> {
        let row: Option<DbMember> =
            sqlx::query_as(r#"SELECT id, email, name, created_at FROM members WHERE id = ?"#)
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbMember::into_domain).transpose()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment repository
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let sql = format!("SELECT {} FROM payments WHERE id = ?", PAYMENT_COLUMNS);

        let row: Option<DbPayment> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn save(&self, payment: &Payment) -> Result<Payment, RepoError> {
        tracing::debug!(payment_id = %payment.id, order_id = %payment.order_id, "Saving payment");

        let id_str = payment.id.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        // Only the confirmation fields change after creation.
        sqlx::query(
            r#"INSERT INTO payments (id, owner_id, payment_type, amount, order_id, order_name,
                                     success_url, fail_url, payment_key, success, fail_reason,
                                     created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (id) DO UPDATE SET
                   payment_key = excluded.payment_key,
                   success = excluded.success,
                   fail_reason = excluded.fail_reason,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&id_str)
        .bind(payment.owner.to_string())
        .bind(payment.payment_type.to_string())
        .bind(payment.amount)
        .bind(&payment.order_id)
        .bind(&payment.order_name)
        .bind(&payment.success_url)
        .bind(&payment.fail_url)
        .bind(&payment.payment_key)
        .bind(payment.success as i64)
        .bind(&payment.fail_reason)
        .bind(payment.created_at.to_rfc3339())
        .bind(payment.updated_at.to_rfc3339())
        .execute(&mut *db_tx)
        .await
        .map_err(map_db_error)?;

        let sql = format!("SELECT {} FROM payments WHERE id = ?", PAYMENT_COLUMNS);
        let row: DbPayment = sqlx::query_as(&sql)
            .bind(&id_str)
            .fetch_one(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        row.into_domain()
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>, RepoError> {
        let sql = format!("SELECT {} FROM payments WHERE order_id = ?", PAYMENT_COLUMNS);

        let row: Option<DbPayment> = sqlx::query_as(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn find_by_payment_key_and_owner_email(
        &self,
        payment_key: &str,
        email: &str,
    ) -> Result<Option<Payment>, RepoError> {
        let row: Option<DbPayment> = sqlx::query_as(
            r#"SELECT p.id, p.owner_id, p.payment_type, p.amount, p.order_id, p.order_name,
                      p.success_url, p.fail_url, p.payment_key, p.success, p.fail_reason,
                      p.created_at, p.updated_at
               FROM payments p
               JOIN members m ON m.id = p.owner_id
               WHERE p.payment_key = ? AND m.email = ?"#,
        )
        .bind(payment_key)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }
}
