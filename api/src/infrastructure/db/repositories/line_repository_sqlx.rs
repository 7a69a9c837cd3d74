use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::line_repository::{
    LinePatch, LineRepository, NewLine, ProvisionOutcome,
};
use crate::domain::lines::line::{Line, LineWithTags};
use crate::domain::tags::tag::Tag;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{SqlValue, enum_col, update_builder};

const LINE_COLUMNS: &str = "id, application_id, phone_number, iccid, line_status, shipment_date, \
    return_date, contract_month, sim_location_id, spare_tag_id, created_at, updated_at";

const LINE_WITH_TAGS: &str = r#"SELECT l.id, l.application_id, l.phone_number, l.iccid, l.line_status,
        l.shipment_date, l.return_date, l.contract_month, l.sim_location_id, l.spare_tag_id,
        l.created_at, l.updated_at,
        s.id AS s_id, s.name AS s_name, s.tag_type AS s_tag_type, s.color AS s_color,
        s.sort_order AS s_sort_order, s.created_at AS s_created_at, s.updated_at AS s_updated_at,
        p.id AS p_id, p.name AS p_name, p.tag_type AS p_tag_type, p.color AS p_color,
        p.sort_order AS p_sort_order, p.created_at AS p_created_at, p.updated_at AS p_updated_at
    FROM lines l
    LEFT JOIN tags s ON s.id = l.sim_location_id
    LEFT JOIN tags p ON p.id = l.spare_tag_id"#;

pub struct SqlxLineRepository {
    pub pool: PgPool,
}

impl SqlxLineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_line(r: &PgRow) -> anyhow::Result<Line> {
    Ok(Line {
        id: r.try_get("id")?,
        application_id: r.try_get("application_id")?,
        phone_number: r.try_get("phone_number")?,
        iccid: r.try_get("iccid")?,
        line_status: enum_col(r, "line_status")?,
        shipment_date: r.try_get("shipment_date")?,
        return_date: r.try_get("return_date")?,
        contract_month: r.try_get("contract_month")?,
        sim_location_id: r.try_get("sim_location_id")?,
        spare_tag_id: r.try_get("spare_tag_id")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

/// Reads the joined tag columns carrying `prefix`; a NULL id means no tag.
fn map_joined_tag(r: &PgRow, prefix: &str) -> anyhow::Result<Option<Tag>> {
    let col = |name: &str| format!("{prefix}{name}");
    let id: Option<Uuid> = r.try_get(col("id").as_str())?;
    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(Tag {
        id,
        name: r.try_get(col("name").as_str())?,
        tag_type: enum_col(r, &col("tag_type"))?,
        color: r.try_get(col("color").as_str())?,
        sort_order: r.try_get(col("sort_order").as_str())?,
        created_at: r.try_get(col("created_at").as_str())?,
        updated_at: r.try_get(col("updated_at").as_str())?,
    }))
}

fn map_line_with_tags(r: &PgRow) -> anyhow::Result<LineWithTags> {
    Ok(LineWithTags {
        line: map_line(r)?,
        sim_location: map_joined_tag(r, "s_")?,
        spare_tag: map_joined_tag(r, "p_")?,
    })
}

fn patch_values(p: &LinePatch) -> Vec<(&'static str, SqlValue)> {
    let mut out = Vec::new();
    if let Some(v) = &p.phone_number {
        out.push(("phone_number", SqlValue::Text(v.clone())));
    }
    if let Some(v) = &p.iccid {
        out.push(("iccid", SqlValue::Text(v.clone())));
    }
    if let Some(v) = p.line_status {
        out.push(("line_status", SqlValue::Text(Some(v.as_str().into()))));
    }
    if let Some(v) = p.shipment_date {
        out.push(("shipment_date", SqlValue::Date(v)));
    }
    if let Some(v) = p.return_date {
        out.push(("return_date", SqlValue::Date(v)));
    }
    if let Some(v) = &p.contract_month {
        out.push(("contract_month", SqlValue::Text(v.clone())));
    }
    if let Some(v) = p.sim_location_id {
        out.push(("sim_location_id", SqlValue::Uuid(v)));
    }
    if let Some(v) = p.spare_tag_id {
        out.push(("spare_tag_id", SqlValue::Uuid(v)));
    }
    out
}

#[async_trait]
impl LineRepository for SqlxLineRepository {
    async fn create(&self, line: &NewLine) -> anyhow::Result<Option<Line>> {
        let sql = format!(
            r#"INSERT INTO lines (application_id, phone_number, iccid, line_status, sim_location_id, spare_tag_id)
               SELECT a.id, $2, $3, $4, $5, $6 FROM applications a WHERE a.id = $1
               RETURNING {LINE_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(line.application_id)
            .bind(line.phone_number.as_deref())
            .bind(line.iccid.as_deref())
            .bind(line.line_status.as_str())
            .bind(line.sim_location_id)
            .bind(line.spare_tag_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_line).transpose()
    }

    async fn find_with_tags(&self, id: Uuid) -> anyhow::Result<Option<LineWithTags>> {
        let sql = format!("{LINE_WITH_TAGS} WHERE l.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_line_with_tags).transpose()
    }

    async fn list_for_application(
        &self,
        application_id: Uuid,
    ) -> anyhow::Result<Vec<LineWithTags>> {
        let sql = format!("{LINE_WITH_TAGS} WHERE l.application_id = $1 ORDER BY l.created_at ASC, l.id ASC");
        let rows = sqlx::query(&sql)
            .bind(application_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_line_with_tags).collect()
    }

    async fn list_for_applications(
        &self,
        application_ids: &[Uuid],
    ) -> anyhow::Result<Vec<LineWithTags>> {
        let sql = format!(
            "{LINE_WITH_TAGS} WHERE l.application_id = ANY($1) ORDER BY l.created_at ASC, l.id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(application_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_line_with_tags).collect()
    }

    async fn update(&self, id: Uuid, patch: &LinePatch) -> anyhow::Result<Option<Line>> {
        let mut qb = update_builder("lines", id, patch_values(patch));
        qb.push(" RETURNING ").push(LINE_COLUMNS);
        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(map_line).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM lines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn provision_for_application(
        &self,
        application_id: Uuid,
    ) -> anyhow::Result<Option<ProvisionOutcome>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT line_count FROM applications WHERE id = $1 FOR UPDATE")
            .bind(application_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            tx.rollback().await.ok();
            return Ok(None);
        };
        let target: i32 = row.get("line_count");
        let existing: i64 = sqlx::query("SELECT COUNT(*) AS n FROM lines WHERE application_id = $1")
            .bind(application_id)
            .fetch_one(&mut *tx)
            .await?
            .get("n");
        let missing = (i64::from(target.max(0)) - existing).max(0);
        if missing > 0 {
            sqlx::query(
                r#"INSERT INTO lines (application_id)
                   SELECT $1 FROM generate_series(1, $2::BIGINT)"#,
            )
            .bind(application_id)
            .bind(missing)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(Some(ProvisionOutcome {
            created: u32::try_from(missing)?,
            total: u32::try_from(existing + missing)?,
        }))
    }
}
