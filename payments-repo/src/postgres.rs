//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use payments_types::{
    CreateMemberRequest, Member, MemberId, MemberRepository, Payment, PaymentId,
    PaymentRepository, RepoError,
};

use crate::types::pg::{DbMember, DbPayment};
use crate::types::{PAYMENT_COLUMNS, map_db_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    tracing::debug!("Applied migration {}", name);
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_members_pg.sql"),
        "0001",
    )
    .await?;

    execute_migration(
        pool,
        include_str!("../migrations/0002_create_payments_pg.sql"),
        "0002",
    )
    .await?;

    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Member repository
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl MemberRepository for PostgresRepo {
    async fn create_member(&self, req: CreateMemberRequest) -> Result<Member, RepoError> {
        let member = Member::new(req.email, req.name).map_err(RepoError::Domain)?;

        sqlx::query(r#"INSERT INTO members (id, email, name, created_at) VALUES ($1, $2, $3, $4)"#)
            .bind(member.id.into_uuid())
            .bind(&member.email)
            .bind(&member.name)
            .bind(member.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(member)
    }

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, RepoError> {
        let row: Option<DbMember> =
            sqlx::query_as(r#"SELECT id, email, name, created_at FROM members WHERE id = $1"#)
                .bind(id.into_uuid())
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
impl PaymentRepository for PostgresRepo {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let sql = format!("SELECT {} FROM payments WHERE id = $1", PAYMENT_COLUMNS);

        let row: Option<DbPayment> = sqlx::query_as(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn save(&self, payment: &Payment) -> Result<Payment, RepoError> {
        tracing::debug!(payment_id = %payment.id, order_id = %payment.order_id, "Saving payment");

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        // Only the confirmation fields change after creation.
        let sql = format!(
            r#"INSERT INTO payments (id, owner_id, payment_type, amount, order_id, order_name,
                                     success_url, fail_url, payment_key, success, fail_reason,
                                     created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               ON CONFLICT (id) DO UPDATE SET
                   payment_key = EXCLUDED.payment_key,
                   success = EXCLUDED.success,
                   fail_reason = EXCLUDED.fail_reason,
                   updated_at = EXCLUDED.updated_at
               RETURNING {}"#,
            PAYMENT_COLUMNS
        );

        let row: DbPayment = sqlx::query_as(&sql)
            .bind(payment.id.into_uuid())
            .bind(payment.owner.into_uuid())
            .bind(payment.payment_type.to_string())
            .bind(payment.amount)
            .bind(&payment.order_id)
            .bind(&payment.order_name)
            .bind(&payment.success_url)
            .bind(&payment.fail_url)
            .bind(&payment.payment_key)
            .bind(payment.success)
            .bind(&payment.fail_reason)
            .bind(payment.created_at)
            .bind(payment.updated_at)
            .fetch_one(&mut *db_tx)
            .await
            .map_err(map_db_error)?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        row.into_domain()
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Payment>, RepoError> {
        let sql = format!("SELECT {} FROM payments WHERE order_id = $1", PAYMENT_COLUMNS);

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
               WHERE p.payment_key = $1 AND m.email = $2"#,
        )
        .bind(payment_key)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }
}
