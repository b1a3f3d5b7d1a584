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

//! Character storage abstraction and backends
//!
//! One trait, three backends: a process-scoped in-memory list, a flat JSON
//! file, and a SQLite table kept in shape by the schema reconciler. Routes
//! only ever see the trait, so backends swap without touching callers.

pub mod jsonfile;
pub mod memory;
pub mod reconcile;
pub mod sqlite;

use crate::error::StoreError;
use async_trait::async_trait;
use charsheet_common::schema::ID_KEY;
use charsheet_common::{Fields, Resolved};
use serde_json::Value;

pub use jsonfile::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage operations over character records. Each call maps to a single
/// backend operation; there is no cross-call coordination.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// All stored records, ascending by identifier.
    async fn list(&self) -> Result<Vec<Fields>, StoreError>;

    /// One record by identifier.
    async fn get(&self, id: i64) -> Result<Option<Fields>, StoreError>;

    /// Insert a fully resolved record. With no identifier one is assigned;
    /// with an identifier that already exists the record is replaced in
    /// place. Returns the stored record and whether it was newly created.
    async fn upsert(
        &self,
        id: Option<i64>,
        resolved: Resolved,
    ) -> Result<(Fields, bool), StoreError>;

    /// Merge a sparse update into an existing record. `None` when the
    /// identifier is unknown.
    async fn update(&self, id: i64, resolved: Resolved) -> Result<Option<Fields>, StoreError>;

    /// Remove a record. Returns whether it existed; removal of an unknown
    /// identifier is not an error.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// Identifier of a stored record. Stored records always carry one.
pub(crate) fn record_id(record: &Fields) -> Option<i64> {
    record.get(ID_KEY).and_then(Value::as_i64)
}

/// Next free identifier for the list-backed stores: highest in use plus
/// one, starting from 1.
pub(crate) fn next_id(records: &[Fields]) -> i64 {
    records
        .iter()
        .filter_map(record_id)
        .max()
        .map_or(1, |max| max + 1)
}
