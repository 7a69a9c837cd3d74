use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::application::ports::application_repository::{
    ApplicationFields, ApplicationFilter, ApplicationPatch, ApplicationRepository, BatchOutcome,
    StatusUpdate,
};
use crate::domain::applications::application::Application;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{
    SqlValue, contains_pattern, enum_col, push_value, update_builder,
};

pub(crate) const APPLICATION_COLUMNS: &str = "id, applicant_type, apply_type, last_name, first_name, \
    last_name_kana, first_name_kana, date_of_birth, company_name, company_name_kana, corporate_number, \
    established_date, representative_last_name, representative_first_name, representative_birth_date, \
    contact_last_name, contact_first_name, email, phone, postal_code, address, mnp_reservation_number, \
    mnp_expiry, current_carrier, plan_type, line_count, total_amount, id_card_front_url, id_card_back_url, \
    registration_url, status, verification_status, payment_status, comment1, comment2, expiration_date, \
    password_hash, contractor_id, created_at, updated_at, submitted_at";

pub struct SqlxApplicationRepository {
    pub pool: PgPool,
}

impl SqlxApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_application(r: &PgRow) -> anyhow::Result<Application> {
    Ok(Application {
        id: r.try_get("id")?,
        applicant_type: enum_col(r, "applicant_type")?,
        apply_type: enum_col(r, "apply_type")?,
        last_name: r.try_get("last_name")?,
        first_name: r.try_get("first_name")?,
        last_name_kana: r.try_get("last_name_kana")?,
        first_name_kana: r.try_get("first_name_kana")?,
        date_of_birth: r.try_get("date_of_birth")?,
        company_name: r.try_get("company_name")?,
        company_name_kana: r.try_get("company_name_kana")?,
        corporate_number: r.try_get("corporate_number")?,
        established_date: r.try_get("established_date")?,
        representative_last_name: r.try_get("representative_last_name")?,
        representative_first_name: r.try_get("representative_first_name")?,
        representative_birth_date: r.try_get("representative_birth_date")?,
        contact_last_name: r.try_get("contact_last_name")?,
        contact_first_name: r.try_get("contact_first_name")?,
        email: r.try_get("email")?,
        phone: r.try_get("phone")?,
        postal_code: r.try_get("postal_code")?,
        address: r.try_get("address")?,
        mnp_reservation_number: r.try_get("mnp_reservation_number")?,
        mnp_expiry: r.try_get("mnp_expiry")?,
        current_carrier: r.try_get("current_carrier")?,
        plan_type: r.try_get("plan_type")?,
        line_count: r.try_get("line_count")?,
        total_amount: r.try_get("total_amount")?,
        id_card_front_url: r.try_get("id_card_front_url")?,
        id_card_back_url: r.try_get("id_card_back_url")?,
        registration_url: r.try_get("registration_url")?,
        status: enum_col(r, "status")?,
        verification_status: enum_col(r, "verification_status")?,
        payment_status: enum_col(r, "payment_status")?,
        comment1: r.try_get("comment1")?,
        comment2: r.try_get("comment2")?,
        expiration_date: r.try_get("expiration_date")?,
        password_hash: r.try_get("password_hash")?,
        contractor_id: r.try_get("contractor_id")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
        submitted_at: r.try_get("submitted_at")?,
    })
}

type Values = Vec<(&'static str, SqlValue)>;

fn field_values(f: &ApplicationFields) -> Values {
    let mut out: Values = Vec::new();
    let text = |out: &mut Values, col: &'static str, v: &Option<String>| {
        if let Some(v) = v {
            out.push((col, SqlValue::Text(Some(v.clone()))));
        }
    };
    let date = |out: &mut Values, col: &'static str, v: Option<chrono::NaiveDate>| {
        if v.is_some() {
            out.push((col, SqlValue::Date(v)));
        }
    };

    if let Some(v) = f.applicant_type {
        out.push(("applicant_type", SqlValue::Text(Some(v.as_str().into()))));
    }
    if let Some(v) = f.apply_type {
        out.push(("apply_type", SqlValue::Text(Some(v.as_str().into()))));
    }
    text(&mut out, "last_name", &f.last_name);
    text(&mut out, "first_name", &f.first_name);
    text(&mut out, "last_name_kana", &f.last_name_kana);
    text(&mut out, "first_name_kana", &f.first_name_kana);
    date(&mut out, "date_of_birth", f.date_of_birth);
    text(&mut out, "company_name", &f.company_name);
    text(&mut out, "company_name_kana", &f.company_name_kana);
    text(&mut out, "corporate_number", &f.corporate_number);
    date(&mut out, "established_date", f.established_date);
    text(&mut out, "representative_last_name", &f.representative_last_name);
    text(&mut out, "representative_first_name", &f.representative_first_name);
    date(&mut out, "representative_birth_date", f.representative_birth_date);
    text(&mut out, "contact_last_name", &f.contact_last_name);
    text(&mut out, "contact_first_name", &f.contact_first_name);
    text(&mut out, "email", &f.email);
    text(&mut out, "phone", &f.phone);
    text(&mut out, "postal_code", &f.postal_code);
    text(&mut out, "address", &f.address);
    text(&mut out, "mnp_reservation_number", &f.mnp_reservation_number);
    date(&mut out, "mnp_expiry", f.mnp_expiry);
    text(&mut out, "current_carrier", &f.current_carrier);
    text(&mut out, "plan_type", &f.plan_type);
    if let Some(v) = f.line_count {
        out.push(("line_count", SqlValue::Int(v)));
    }
    if let Some(v) = f.total_amount {
        out.push(("total_amount", SqlValue::BigInt(v)));
    }
    text(&mut out, "id_card_front_url", &f.id_card_front_url);
    text(&mut out, "id_card_back_url", &f.id_card_back_url);
    text(&mut out, "registration_url", &f.registration_url);
    if let Some(v) = f.status {
        out.push(("status", SqlValue::Text(Some(v.as_str().into()))));
    }
    text(&mut out, "password_hash", &f.password_hash);
    if f.contractor_id.is_some() {
        out.push(("contractor_id", SqlValue::Uuid(f.contractor_id)));
    }
    if f.submitted_at.is_some() {
        out.push(("submitted_at", SqlValue::Timestamp(f.submitted_at)));
    }
    out
}

fn patch_values(p: &ApplicationPatch) -> Values {
    let mut out: Values = Vec::new();
    if let Some(v) = p.status {
        out.push(("status", SqlValue::Text(Some(v.as_str().into()))));
    }
    if let Some(v) = p.verification_status {
        out.push(("verification_status", SqlValue::Text(Some(v.as_str().into()))));
    }
    if let Some(v) = p.payment_status {
        out.push(("payment_status", SqlValue::Text(Some(v.as_str().into()))));
    }
    if let Some(v) = &p.comment1 {
        out.push(("comment1", SqlValue::Text(v.clone())));
    }
    if let Some(v) = &p.comment2 {
        out.push(("comment2", SqlValue::Text(v.clone())));
    }
    if let Some(v) = p.expiration_date {
        out.push(("expiration_date", SqlValue::Date(v)));
    }
    if let Some(v) = &p.plan_type {
        out.push(("plan_type", SqlValue::Text(Some(v.clone()))));
    }
    if let Some(v) = p.line_count {
        out.push(("line_count", SqlValue::Int(v)));
    }
    if let Some(v) = p.total_amount {
        out.push(("total_amount", SqlValue::BigInt(v)));
    }
    for (col, v) in [
        ("email", &p.email),
        ("phone", &p.phone),
        ("postal_code", &p.postal_code),
        ("address", &p.address),
    ] {
        if let Some(v) = v {
            out.push((col, SqlValue::Text(Some(v.clone()))));
        }
    }
    out
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ApplicationFilter) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(search) = filter.search.as_deref() {
        let pattern = contains_pattern(search);
        qb.push(" AND (");
        for (i, col) in ["last_name", "first_name", "company_name", "email", "phone"]
            .iter()
            .enumerate()
        {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push("COALESCE(")
                .push(*col)
                .push(", '') ILIKE ")
                .push_bind(pattern.clone());
        }
        qb.push(")");
    }
}

/// Form update that matches nothing once the row has left draft.
fn draft_update_query<'a>(id: Uuid, fields: &ApplicationFields) -> QueryBuilder<'a, Postgres> {
    let mut qb = update_builder("applications", id, field_values(fields));
    qb.push(" AND status = 'draft' RETURNING ")
        .push(APPLICATION_COLUMNS);
    qb
}

impl SqlxApplicationRepository {
    async fn fetch_all_where(&self, clause: &str, bind: &str) -> anyhow::Result<Vec<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE {clause} ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql).bind(bind).fetch_all(&self.pool).await?;
        rows.iter().map(map_application).collect()
    }
}

#[async_trait]
impl ApplicationRepository for SqlxApplicationRepository {
    async fn insert(&self, fields: &ApplicationFields) -> anyhow::Result<Application> {
        let values = field_values(fields);
        let mut qb: QueryBuilder<Postgres> = if values.is_empty() {
            QueryBuilder::new("INSERT INTO applications DEFAULT VALUES")
        } else {
            let mut qb = QueryBuilder::new("INSERT INTO applications (");
            let columns: Vec<&str> = values.iter().map(|(c, _)| *c).collect();
            qb.push(columns.join(", ")).push(") VALUES (");
            for (i, (_, value)) in values.into_iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                push_value(&mut qb, value);
            }
            qb.push(")");
            qb
        };
        qb.push(" RETURNING ").push(APPLICATION_COLUMNS);
        let row = qb.build().fetch_one(&self.pool).await?;
        map_application(&row)
    }

    async fn update_draft(
        &self,
        id: Uuid,
        fields: &ApplicationFields,
    ) -> anyhow::Result<Option<Application>> {
        let mut qb = draft_update_query(id, fields);
        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(map_application).transpose()
    }

    async fn apply_patch(
        &self,
        id: Uuid,
        patch: &ApplicationPatch,
    ) -> anyhow::Result<Option<Application>> {
        let mut qb = update_builder("applications", id, patch_values(patch));
        qb.push(" RETURNING ").push(APPLICATION_COLUMNS);
        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(map_application).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Application>> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_application).transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ANY($1) ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_application).collect()
    }

    async fn latest_draft_for_email(&self, email: &str) -> anyhow::Result<Option<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE email = $1 AND status = 'draft'
             ORDER BY updated_at DESC LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_application).transpose()
    }

    async fn latest_with_password_for_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE email = $1 AND status <> 'draft' AND password_hash IS NOT NULL
             ORDER BY created_at DESC LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_application).transpose()
    }

    async fn list(&self, filter: &ApplicationFilter) -> anyhow::Result<(Vec<Application>, i64)> {
        let mut count_q = QueryBuilder::<Postgres>::new("SELECT COUNT(*) AS total FROM applications");
        push_filter(&mut count_q, filter);
        let total: i64 = count_q.build().fetch_one(&self.pool).await?.try_get("total")?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications"
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(filter.offset)
            .push(" LIMIT ")
            .push_bind(filter.limit);
        let rows = qb.build().fetch_all(&self.pool).await?;
        let items = rows.iter().map(map_application).collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn list_non_draft(&self) -> anyhow::Result<Vec<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE status <> 'draft'
             ORDER BY email ASC, created_at DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(map_application).collect()
    }

    async fn list_for_contractor(&self, contractor_id: Uuid) -> anyhow::Result<Vec<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications
             WHERE contractor_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(contractor_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_application).collect()
    }

    async fn list_non_draft_for_email(&self, email: &str) -> anyhow::Result<Vec<Application>> {
        self.fetch_all_where("email = $1 AND status <> 'draft'", email)
            .await
    }

    async fn batch_update_statuses(
        &self,
        updates: &[StatusUpdate],
    ) -> anyhow::Result<BatchOutcome> {
        let mut tx = self.pool.begin().await?;
        for u in updates {
            let res = sqlx::query(
                r#"UPDATE applications
                   SET verification_status = COALESCE($2, verification_status),
                       payment_status = COALESCE($3, payment_status),
                       updated_at = now()
                   WHERE id = $1"#,
            )
            .bind(u.id)
            .bind(u.verification_status.map(|v| v.as_str()))
            .bind(u.payment_status.map(|v| v.as_str()))
            .execute(&mut *tx)
            .await?;
            if res.rows_affected() == 0 {
                tx.rollback().await.ok();
                return Ok(BatchOutcome::Missing(u.id));
            }
        }
        tx.commit().await?;
        Ok(BatchOutcome::Applied(updates.len() as u64))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "UPDATE applications SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
