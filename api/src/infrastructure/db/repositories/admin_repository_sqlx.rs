use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::admin_repository::AdminRepository;
use crate::domain::admins::admin::Admin;
use crate::infrastructure::db::PgPool;

pub struct SqlxAdminRepository {
    pub pool: PgPool,
}

impl SqlxAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_admin(r: PgRow) -> Admin {
    Admin {
        id: r.get("id"),
        email: r.get("email"),
        name: r.get("name"),
        role: r.get("role"),
        password_hash: r.try_get("password_hash").ok().flatten(),
        last_login_at: r.try_get("last_login_at").ok().flatten(),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl AdminRepository for SqlxAdminRepository {
    async fn create_admin(
        &self,
        email: &str,
        name: &str,
        role: &str,
        password_hash: &str,
    ) -> anyhow::Result<Admin> {
        let row = sqlx::query(
            r#"INSERT INTO admins (email, name, role, password_hash) VALUES ($1, $2, $3, $4)
               RETURNING id, email, name, role, password_hash, last_login_at, created_at"#,
        )
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_admin(row))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Admin>> {
        let row = sqlx::query(
            r#"SELECT id, email, name, role, password_hash, last_login_at, created_at
               FROM admins WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(map_admin))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Admin>> {
        let row = sqlx::query(
            r#"SELECT id, email, name, role, NULL::TEXT AS password_hash, last_login_at, created_at
               FROM admins WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(map_admin))
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE admins SET password_hash = $2 WHERE email = $1")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE admins SET last_login_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
