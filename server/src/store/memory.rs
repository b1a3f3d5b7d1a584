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

//! In-memory character store
//!
//! Process-scoped list with no persistence; state is lost on restart.

use super::{CharacterStore, next_id, record_id};
use crate::error::StoreError;
use async_trait::async_trait;
use charsheet_common::resolver::{apply_update, into_record};
use charsheet_common::{Fields, Resolved};
use tokio::sync::RwLock;

/// Character store backed by a process-scoped list.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Fields>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Fields>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: i64) -> Result<Option<Fields>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| record_id(record) == Some(id))
            .cloned())
    }

    async fn upsert(
        &self,
        id: Option<i64>,
        resolved: Resolved,
    ) -> Result<(Fields, bool), StoreError> {
        let mut records = self.records.write().await;
        let id = id.unwrap_or_else(|| next_id(&records));
        let record = into_record(id, &resolved);
        match records
            .iter_mut()
            .find(|existing| record_id(existing) == Some(id))
        {
            Some(existing) => {
                *existing = record.clone();
                Ok((record, false))
            }
            None => {
                records.push(record.clone());
                records.sort_by_key(|record| record_id(record).unwrap_or_default());
                Ok((record, true))
            }
        }
    }

    async fn update(&self, id: i64, resolved: Resolved) -> Result<Option<Fields>, StoreError> {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|record| record_id(record) == Some(id))
        {
            Some(record) => {
                apply_update(record, &resolved);
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record_id(record) != Some(id));
        Ok(records.len() != before)
    }
}
