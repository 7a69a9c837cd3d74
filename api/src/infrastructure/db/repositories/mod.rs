pub mod admin_repository_sqlx;
pub mod application_repository_sqlx;
pub mod contractor_repository_sqlx;
pub mod line_repository_sqlx;
pub mod tag_repository_sqlx;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::UnknownVariant;

/// Reads a TEXT column holding one of the domain's enum values.
pub(crate) fn enum_col<T>(row: &PgRow, column: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw: String = row.try_get(column)?;
    Ok(raw.parse()?)
}

/// A value bound into a dynamically built `SET` or `VALUES` list.
pub(crate) enum SqlValue {
    Text(Option<String>),
    Date(Option<NaiveDate>),
    Int(i32),
    BigInt(i64),
    Uuid(Option<Uuid>),
    Timestamp(Option<DateTime<Utc>>),
}

pub(crate) fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: SqlValue) {
    match value {
        SqlValue::Text(v) => qb.push_bind(v),
        SqlValue::Date(v) => qb.push_bind(v),
        SqlValue::Int(v) => qb.push_bind(v),
        SqlValue::BigInt(v) => qb.push_bind(v),
        SqlValue::Uuid(v) => qb.push_bind(v),
        SqlValue::Timestamp(v) => qb.push_bind(v),
    };
}

/// `UPDATE <table> SET updated_at = now(), col = $n, ... WHERE id = $m`
pub(crate) fn update_builder<'a>(
    table: &str,
    id: Uuid,
    values: Vec<(&'static str, SqlValue)>,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("UPDATE {table} SET updated_at = now()"));
    for (column, value) in values {
        qb.push(", ").push(column).push(" = ");
        push_value(&mut qb, value);
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb
}

/// Escapes LIKE wildcards and wraps the needle for a contains match.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
