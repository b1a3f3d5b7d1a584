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

//! Flat-file character store
//!
//! The whole collection lives in one pretty-printed JSON array. Every
//! operation reads the file, works on the list, and writes the file back
//! under a single mutex. A missing file is an empty collection; a corrupt
//! file is logged and treated as empty rather than failing the request.

use super::{CharacterStore, next_id, record_id};
use crate::error::StoreError;
use async_trait::async_trait;
use charsheet_common::resolver::{apply_update, into_record};
use charsheet_common::{Fields, Resolved};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Character store backed by a flat JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes the read/modify/write cycle; the file itself is the
    /// only shared state.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store over the given file path. The file is created on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Fields>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice::<Vec<Fields>>(&bytes) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(
                    "Character file {} is unreadable, starting empty: {}",
                    self.path.display(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, records: &[Fields]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl CharacterStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<Fields>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        records.sort_by_key(|record| record_id(record).unwrap_or_default());
        Ok(records)
    }

    async fn get(&self, id: i64) -> Result<Option<Fields>, StoreError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?;
        Ok(records
            .into_iter()
            .find(|record| record_id(record) == Some(id)))
    }

    async fn upsert(
        &self,
        id: Option<i64>,
        resolved: Resolved,
    ) -> Result<(Fields, bool), StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let id = id.unwrap_or_else(|| next_id(&records));
        let record = into_record(id, &resolved);
        let created = match records
            .iter_mut()
            .find(|existing| record_id(existing) == Some(id))
        {
            Some(existing) => {
                *existing = record.clone();
                false
            }
            None => {
                records.push(record.clone());
                records.sort_by_key(|record| record_id(record).unwrap_or_default());
                true
            }
        };
        self.save(&records).await?;
        Ok((record, created))
    }

    async fn update(&self, id: i64, resolved: Resolved) -> Result<Option<Fields>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let updated = match records
            .iter_mut()
            .find(|record| record_id(record) == Some(id))
        {
            Some(record) => {
                apply_update(record, &resolved);
                Some(record.clone())
            }
            None => None,
        };
        if updated.is_some() {
            self.save(&records).await?;
        }
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|record| record_id(record) != Some(id));
        let existed = records.len() != before;
        if existed {
            self.save(&records).await?;
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_common::resolver::{resolve_for_insert, resolve_for_update};
    use serde_json::json;
    use tempfile::tempdir;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_collection() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("characters.json"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("characters.json");
        std::fs::write(&path, "not json at all").unwrap();
        let store = JsonFileStore::new(path);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("characters.json");
        {
            let store = JsonFileStore::new(&path);
            store
                .upsert(None, resolve_for_insert(&fields(json!({"name": "Mira"}))))
                .await
                .unwrap();
        }
        let reopened = JsonFileStore::new(&path);
        let records = reopened.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], json!("Mira"));
    }

    #[tokio::test]
    async fn test_update_and_delete_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("characters.json"));
        let (record, _) = store
            .upsert(None, resolve_for_insert(&fields(json!({"name": "Mira", "level": 1}))))
            .await
            .unwrap();
        let id = record["id"].as_i64().unwrap();

        let updated = store
            .update(id, resolve_for_update(&fields(json!({"level": 2}))))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["level"], json!(2));
        assert_eq!(updated["name"], json!("Mira"));

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }
}
