//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! SQLite character store
//!
//! One row per character on the table maintained by the reconciler.
//! Statements are assembled from the canonical column list, so a column
//! added to the schema flows through insert, update and select without
//! further changes here. Text columns store non-string scalars as their
//! JSON text; the extras blob is one JSON object per row.

use super::CharacterStore;
use crate::error::StoreError;
use crate::store::reconcile;
use async_trait::async_trait;
use charsheet_common::resolver::{apply_update, into_record};
use charsheet_common::schema::{self, ColumnKind, EXTRAS_KEY};
use charsheet_common::{Fields, Resolved};
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>;

/// Character store backed by a SQLite database.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing connection pool. The schema is expected to have
    /// been reconciled already.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) a database file and reconcile its
    /// schema.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        reconcile::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn quoted(name: &str) -> String {
    format!("\"{}\"", name)
}

/// `SELECT id, <columns>, extras FROM characters` prefix shared by the
/// read paths.
fn select_sql() -> String {
    let columns: Vec<String> = schema::COLUMNS
        .iter()
        .map(|column| quoted(column.name))
        .collect();
    format!(
        "SELECT id, {}, {} FROM characters",
        columns.join(", "),
        quoted(EXTRAS_KEY)
    )
}

fn row_to_record(row: &SqliteRow) -> Result<Fields, sqlx::Error> {
    let mut record = Fields::new();
    record.insert(
        schema::ID_KEY.to_string(),
        Value::from(row.try_get::<i64, _>("id")?),
    );
    for column in schema::COLUMNS {
        let value = match column.kind {
            ColumnKind::Integer => row
                .try_get::<Option<i64>, _>(column.name)?
                .map_or(Value::Null, Value::from),
            ColumnKind::Boolean => row
                .try_get::<Option<bool>, _>(column.name)?
                .map_or(Value::Null, Value::from),
            ColumnKind::Text => row
                .try_get::<Option<String>, _>(column.name)?
                .map_or(Value::Null, Value::from),
        };
        record.insert(column.name.to_string(), value);
    }
    let extras = row
        .try_get::<Option<String>, _>(EXTRAS_KEY)?
        .and_then(|text| serde_json::from_str::<Value>(&text).ok())
        .filter(Value::is_object)
        .unwrap_or_else(|| Value::Object(Fields::new()));
    record.insert(EXTRAS_KEY.to_string(), extras);
    Ok(record)
}

/// Bind one column value according to its coercion class. Values reach
/// this point already coerced, so only the class's own shapes and Null
/// occur for integer and boolean columns.
fn bind_column<'q>(query: SqliteQuery<'q>, kind: ColumnKind, value: &Value) -> SqliteQuery<'q> {
    match kind {
        ColumnKind::Integer => query.bind(value.as_i64()),
        ColumnKind::Boolean => query.bind(value.as_bool()),
        ColumnKind::Text => match value {
            Value::Null => query.bind(None::<String>),
            Value::String(text) => query.bind(Some(text.clone())),
            other => query.bind(Some(other.to_string())),
        },
    }
}

fn extras_json(value: Option<&Value>) -> Result<String, StoreError> {
    match value {
        Some(extras) => Ok(serde_json::to_string(extras)?),
        None => Ok("{}".to_string()),
    }
}

#[async_trait]
impl CharacterStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Fields>, StoreError> {
        let sql = format!("{} ORDER BY id ASC", select_sql());
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(row_to_record(row)?);
        }
        Ok(records)
    }

    async fn get(&self, id: i64) -> Result<Option<Fields>, StoreError> {
        let sql = format!("{} WHERE id = ?", select_sql());
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn upsert(
        &self,
        id: Option<i64>,
        resolved: Resolved,
    ) -> Result<(Fields, bool), StoreError> {
        let existed = match id {
            Some(id) => self.get(id).await?.is_some(),
            None => false,
        };

        let names: Vec<String> = schema::COLUMNS
            .iter()
            .map(|column| quoted(column.name))
            .collect();
        let placeholders = vec!["?"; schema::COLUMNS.len() + 2].join(", ");
        let assignments: Vec<String> = schema::COLUMNS
            .iter()
            .map(|column| format!("{0} = excluded.{0}", quoted(column.name)))
            .collect();
        let extras_column = quoted(EXTRAS_KEY);
        let sql = format!(
            "INSERT INTO characters (id, {names}, {extras_column}) VALUES ({placeholders}) \
             ON CONFLICT(id) DO UPDATE SET {assignments}, \
             {extras_column} = excluded.{extras_column}",
            names = names.join(", "),
            placeholders = placeholders,
            assignments = assignments.join(", "),
        );

        let extras = extras_json(Some(&Value::Object(resolved.extras.clone())))?;
        let mut query = sqlx::query(&sql).bind(id);
        for column in schema::COLUMNS {
            let value = resolved.columns.get(column.name).unwrap_or(&Value::Null);
            query = bind_column(query, column.kind, value);
        }
        query = query.bind(extras);
        let result = query.execute(&self.pool).await?;

        let id = id.unwrap_or_else(|| result.last_insert_rowid());
        let record = match self.get(id).await? {
            Some(record) => record,
            None => into_record(id, &resolved),
        };
        Ok((record, !existed))
    }

    async fn update(&self, id: i64, resolved: Resolved) -> Result<Option<Fields>, StoreError> {
        let Some(mut record) = self.get(id).await? else {
            return Ok(None);
        };
        apply_update(&mut record, &resolved);

        let assignments: Vec<String> = schema::COLUMNS
            .iter()
            .map(|column| format!("{} = ?", quoted(column.name)))
            .collect();
        let sql = format!(
            "UPDATE characters SET {}, {} = ? WHERE id = ?",
            assignments.join(", "),
            quoted(EXTRAS_KEY),
        );

        let extras = extras_json(record.get(EXTRAS_KEY))?;
        let mut query = sqlx::query(&sql);
        for column in schema::COLUMNS {
            let value = record.get(column.name).unwrap_or(&Value::Null);
            query = bind_column(query, column.kind, value);
        }
        query.bind(extras).bind(id).execute(&self.pool).await?;

        Ok(Some(record))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
