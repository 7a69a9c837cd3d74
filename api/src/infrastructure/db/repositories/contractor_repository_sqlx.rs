use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::dto::contractors::ApplicationSummary;
use crate::application::ports::contractor_repository::{
    ContractorRepository, MergeOutcome, MergeResult,
};
use crate::domain::contractors::contractor::{Contractor, NewContractor};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::enum_col;

const CONTRACTOR_COLUMNS: &str = "id, email, contractor_type, last_name, first_name, last_name_kana, \
    first_name_kana, company_name, company_name_kana, corporate_number, phone, postal_code, address, \
    id_card_front_url, id_card_back_url, registration_url, expiration_date, password_hash, \
    must_change_password, last_login_at, created_at, updated_at";

pub struct SqlxContractorRepository {
    pub pool: PgPool,
}

impl SqlxContractorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_contractor(r: &PgRow) -> anyhow::Result<Contractor> {
    Ok(Contractor {
        id: r.try_get("id")?,
        email: r.try_get("email")?,
        contractor_type: enum_col(r, "contractor_type")?,
        last_name: r.try_get("last_name")?,
        first_name: r.try_get("first_name")?,
        last_name_kana: r.try_get("last_name_kana")?,
        first_name_kana: r.try_get("first_name_kana")?,
        company_name: r.try_get("company_name")?,
        company_name_kana: r.try_get("company_name_kana")?,
        corporate_number: r.try_get("corporate_number")?,
        phone: r.try_get("phone")?,
        postal_code: r.try_get("postal_code")?,
        address: r.try_get("address")?,
        id_card_front_url: r.try_get("id_card_front_url")?,
        id_card_back_url: r.try_get("id_card_back_url")?,
        registration_url: r.try_get("registration_url")?,
        expiration_date: r.try_get("expiration_date")?,
        password_hash: r.try_get("password_hash")?,
        must_change_password: r.try_get("must_change_password")?,
        last_login_at: r.try_get("last_login_at")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait]
impl ContractorRepository for SqlxContractorRepository {
    async fn list_with_applications(
        &self,
    ) -> anyhow::Result<Vec<(Contractor, Vec<ApplicationSummary>)>> {
        let sql = format!("SELECT {CONTRACTOR_COLUMNS} FROM contractors ORDER BY created_at DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let contractors = rows
            .iter()
            .map(map_contractor)
            .collect::<anyhow::Result<Vec<_>>>()?;
        if contractors.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = contractors.iter().map(|c| c.id).collect();
        let app_rows = sqlx::query(
            r#"SELECT id, contractor_id, status, plan_type, line_count, created_at
               FROM applications WHERE contractor_id = ANY($1)
               ORDER BY created_at DESC"#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        let mut by_contractor: HashMap<Uuid, Vec<ApplicationSummary>> = HashMap::new();
        for r in &app_rows {
            let contractor_id: Uuid = r.try_get("contractor_id")?;
            by_contractor
                .entry(contractor_id)
                .or_default()
                .push(ApplicationSummary {
                    id: r.try_get("id")?,
                    status: enum_col(r, "status")?,
                    plan_type: r.try_get("plan_type")?,
                    line_count: r.try_get("line_count")?,
                    created_at: r.try_get("created_at")?,
                });
        }

        Ok(contractors
            .into_iter()
            .map(|c| {
                let apps = by_contractor.remove(&c.id).unwrap_or_default();
                (c, apps)
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Contractor>> {
        let sql = format!("SELECT {CONTRACTOR_COLUMNS} FROM contractors WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_contractor).transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Contractor>> {
        let sql = format!("SELECT {CONTRACTOR_COLUMNS} FROM contractors WHERE email = $1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_contractor).transpose()
    }

    async fn merge_applications(
        &self,
        seed: &NewContractor,
        application_ids: &[Uuid],
    ) -> anyhow::Result<MergeResult> {
        let mut tx = self.pool.begin().await?;
        let locked = sqlx::query("SELECT email FROM applications WHERE id = ANY($1) FOR UPDATE")
            .bind(application_ids.to_vec())
            .fetch_all(&mut *tx)
            .await?;
        if locked.len() != application_ids.len() {
            tx.rollback().await?;
            return Ok(MergeResult::Missing);
        }
        for row in &locked {
            let email: String = row.try_get("email")?;
            if email != seed.email {
                tx.rollback().await?;
                return Ok(MergeResult::EmailChanged);
            }
        }

        let inserted = sqlx::query(
            r#"INSERT INTO contractors (
                    email, contractor_type, last_name, first_name, last_name_kana, first_name_kana,
                    company_name, company_name_kana, corporate_number, phone, postal_code, address,
                    id_card_front_url, id_card_back_url, registration_url, expiration_date,
                    password_hash, must_change_password
                ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18)
                ON CONFLICT (email) DO NOTHING
                RETURNING id"#,
        )
        .bind(&seed.email)
        .bind(seed.contractor_type.as_str())
        .bind(seed.last_name.as_deref())
        .bind(seed.first_name.as_deref())
        .bind(seed.last_name_kana.as_deref())
        .bind(seed.first_name_kana.as_deref())
        .bind(seed.company_name.as_deref())
        .bind(seed.company_name_kana.as_deref())
        .bind(seed.corporate_number.as_deref())
        .bind(seed.phone.as_deref())
        .bind(seed.postal_code.as_deref())
        .bind(seed.address.as_deref())
        .bind(seed.id_card_front_url.as_deref())
        .bind(seed.id_card_back_url.as_deref())
        .bind(seed.registration_url.as_deref())
        .bind(seed.expiration_date)
        .bind(seed.password_hash.as_deref())
        .bind(seed.must_change_password)
        .fetch_optional(&mut *tx)
        .await?;

        let (contractor_id, created): (Uuid, bool) = match inserted {
            Some(row) => (row.get("id"), true),
            None => {
                let row = sqlx::query("SELECT id FROM contractors WHERE email = $1")
                    .bind(&seed.email)
                    .fetch_one(&mut *tx)
                    .await?;
                (row.get("id"), false)
            }
        };

        let res = sqlx::query(
            "UPDATE applications SET contractor_id = $1, updated_at = now() WHERE id = ANY($2)",
        )
        .bind(contractor_id)
        .bind(application_ids.to_vec())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(MergeResult::Merged(MergeOutcome {
            contractor_id,
            created,
            updated_applications: res.rows_affected(),
        }))
    }

    async fn set_password(
        &self,
        id: Uuid,
        password_hash: &str,
        must_change_password: bool,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE contractors
               SET password_hash = $2, must_change_password = $3, updated_at = now()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(must_change_password)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE contractors SET last_login_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
