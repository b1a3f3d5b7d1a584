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

//! Boot-time schema reconciliation
//!
//! The database a deployment runs against may have been provisioned by an
//! earlier, narrower release. Instead of migrations tooling, the service
//! self-heals the gap on boot: the canonical column set is compared against
//! the live table and every missing column is added with an additive ALTER.
//! Existing columns are never dropped or retyped. Each column is an
//! independent unit of work; a failed ALTER is logged and reconciliation
//! moves on (a concurrently starting process may simply have added the
//! column first). Only the base table is a hard precondition.

use charsheet_common::schema::{self, ColumnKind};
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::{info, warn};

/// Storage type for a coercion class.
fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Integer | ColumnKind::Boolean => "INTEGER",
        ColumnKind::Text => "TEXT",
    }
}

/// Ensure the characters table exists and carries every canonical column
/// plus the extras blob. Idempotent and safe to run from two processes at
/// once. An error here means the base table could not be created and the
/// service must not serve storage-backed routes.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE TABLE IF NOT EXISTS characters (id INTEGER PRIMARY KEY AUTOINCREMENT)")
        .execute(pool)
        .await?;

    let existing = table_columns(pool).await?;
    let mut added = 0usize;
    for column in schema::COLUMNS {
        if existing.contains(column.name) {
            continue;
        }
        if add_column(pool, column.name, sql_type(column.kind)).await {
            added += 1;
        }
    }
    if !existing.contains(schema::EXTRAS_KEY) && add_column(pool, schema::EXTRAS_KEY, "TEXT").await
    {
        added += 1;
    }

    info!("Schema reconciled, {} column(s) added", added);
    Ok(())
}

/// Add one column, tolerating failure. Returns whether the column was
/// added.
async fn add_column(pool: &SqlitePool, name: &str, sql_type: &str) -> bool {
    let statement = format!("ALTER TABLE characters ADD COLUMN \"{}\" {}", name, sql_type);
    match sqlx::query(&statement).execute(pool).await {
        Ok(_) => true,
        Err(err) => {
            warn!("Failed to add column {}, continuing: {}", name, err);
            false
        }
    }
}

/// Names of the columns currently on the characters table.
pub async fn table_columns(pool: &SqlitePool) -> Result<HashSet<String>, sqlx::Error> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM pragma_table_info('characters')")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|row| row.0).collect())
}
