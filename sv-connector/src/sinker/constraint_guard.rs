use sqlx::{Pool, Postgres};

use sv_common::{log_info, log_warn};

pub const SUSPEND_CONSTRAINTS_SQL: &str = "SET session_replication_role = 'replica'";
pub const RESUME_CONSTRAINTS_SQL: &str = "SET session_replication_role = 'origin'";

/// The session-wide constraint toggle as a scoped resource: acquiring the
/// guard suspends enforcement, releasing it resumes enforcement.
///
/// The toggle is per session, the pool passed in must be capped at one
/// connection.
pub struct ConstraintGuard {
    conn_pool: Pool<Postgres>,
    released: bool,
}

impl ConstraintGuard {
    pub async fn suspend(conn_pool: Pool<Postgres>) -> anyhow::Result<Self> {
        sqlx::query(SUSPEND_CONSTRAINTS_SQL)
            .execute(&conn_pool)
            .await?;
        log_info!("foreign key and constraint enforcement suspended for this session");
        Ok(Self {
            conn_pool,
            released: false,
        })
    }

    pub async fn resume(mut self) -> anyhow::Result<()> {
        sqlx::query(RESUME_CONSTRAINTS_SQL)
            .execute(&self.conn_pool)
            .await?;
        self.released = true;
        log_info!("constraint enforcement resumed");
        Ok(())
    }
}

impl Drop for ConstraintGuard {
    fn drop(&mut self) {
        if !self.released {
            log_warn!(
                "constraint guard dropped without resume, \
                the database session may still have enforcement suspended"
            );
        }
    }
}
