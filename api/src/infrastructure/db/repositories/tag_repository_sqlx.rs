use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::tag_repository::{
    NewTag, TagDelete, TagPatch, TagRepository, TagWrite,
};
use crate::domain::tags::tag::{Tag, TagType};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::enum_col;

const TAG_COLUMNS: &str = "id, name, tag_type, color, sort_order, created_at, updated_at";

pub struct SqlxTagRepository {
    pub pool: PgPool,
}

impl SqlxTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_tag(r: &PgRow) -> anyhow::Result<Tag> {
    Ok(Tag {
        id: r.try_get("id")?,
        name: r.try_get("name")?,
        tag_type: enum_col(r, "tag_type")?,
        color: r.try_get("color")?,
        sort_order: r.try_get("sort_order")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

/// Maps a unique-name violation to `NameTaken`, anything else to an error.
fn written(res: Result<Option<PgRow>, sqlx::Error>) -> anyhow::Result<TagWrite> {
    match res {
        Ok(Some(row)) => Ok(TagWrite::Written(map_tag(&row)?)),
        Ok(None) => Ok(TagWrite::NotFound),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(TagWrite::NameTaken),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn list_tags(&self, tag_type: Option<TagType>) -> anyhow::Result<Vec<Tag>> {
        let sql = format!(
            "SELECT {TAG_COLUMNS} FROM tags
             WHERE ($1::TEXT IS NULL OR tag_type = $1)
             ORDER BY sort_order ASC, name ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(tag_type.map(|t| t.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_tag).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tag>> {
        let sql = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_tag).transpose()
    }

    async fn create(&self, tag: &NewTag) -> anyhow::Result<TagWrite> {
        let sql = format!(
            "INSERT INTO tags (name, tag_type, color, sort_order) VALUES ($1, $2, $3, $4)
             RETURNING {TAG_COLUMNS}"
        );
        let res = sqlx::query(&sql)
            .bind(&tag.name)
            .bind(tag.tag_type.as_str())
            .bind(tag.color.as_deref())
            .bind(tag.sort_order)
            .fetch_optional(&self.pool)
            .await;
        written(res)
    }

    async fn update(&self, id: Uuid, patch: &TagPatch) -> anyhow::Result<TagWrite> {
        let sql = format!(
            "UPDATE tags SET
                name = COALESCE($2, name),
                tag_type = COALESCE($3, tag_type),
                color = CASE WHEN $4 THEN $5 ELSE color END,
                sort_order = COALESCE($6, sort_order),
                updated_at = now()
             WHERE id = $1
             RETURNING {TAG_COLUMNS}"
        );
        let res = sqlx::query(&sql)
            .bind(id)
            .bind(patch.name.as_deref())
            .bind(patch.tag_type.map(|t| t.as_str()))
            .bind(patch.color.is_some())
            .bind(patch.color.clone().flatten())
            .bind(patch.sort_order)
            .fetch_optional(&self.pool)
            .await;
        written(res)
    }

    async fn usage_count(&self, id: Uuid) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM lines WHERE sim_location_id = $1 OR spare_tag_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<TagDelete> {
        let res = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        match res {
            Ok(done) if done.rows_affected() > 0 => Ok(TagDelete::Deleted),
            Ok(_) => Ok(TagDelete::NotFound),
            // lines.sim_location_id / spare_tag_id are ON DELETE RESTRICT
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => Ok(TagDelete::InUse),
            Err(e) => Err(e.into()),
        }
    }
}
