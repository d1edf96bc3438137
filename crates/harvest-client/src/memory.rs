//! In-process crop store.
//!
//! Behaves like the document store behind the REST service: ids are
//! assigned on create, updates replace the whole record, unknown ids are
//! `NotFound`. Backs the CLI's `--offline` mode and the ledger tests.

use harvest_core::{CropPayload, CropRecord};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::store::CropStore;

#[derive(Debug, Default)]
pub struct InMemoryCropStore {
    records: RwLock<Vec<CropRecord>>,
}

impl InMemoryCropStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store; records without an id receive one.
    pub fn with_records(records: impl IntoIterator<Item = CropRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| match record.id {
                Some(_) => record,
                None => record.with_id(Uuid::new_v4().to_string()),
            })
            .collect();

        InMemoryCropStore {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl CropStore for InMemoryCropStore {
    async fn fetch_crops(&self) -> ClientResult<Vec<CropRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn create_crop(&self, payload: &CropPayload) -> ClientResult<()> {
        let id = Uuid::new_v4().to_string();
        debug!(%id, crop = %payload.crop.name, "Storing crop in memory");
        self.records.write().await.push(payload.clone().into_record(id));
        Ok(())
    }

    async fn update_crop(&self, id: &str, payload: &CropPayload) -> ClientResult<()> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;

        *slot = payload.clone().into_record(id);
        Ok(())
    }

    async fn delete_crop(&self, id: &str) -> ClientResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(id));

        if records.len() == before {
            return Err(ClientError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::draft::CropDraft;
    use harvest_core::validation::FieldPath;
    use harvest_core::DraftChange;

    fn payload(name: &str) -> CropPayload {
        CropDraft::default()
            .apply(DraftChange::Set {
                field: FieldPath::CropName,
                value: name.to_string(),
            })
            .prepare()
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let store = InMemoryCropStore::new();
        store.create_crop(&payload("Padi")).await.unwrap();
        store.create_crop(&payload("Padi")).await.unwrap();

        let records = store.fetch_crops().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(CropRecord::is_persisted));
        assert_ne!(records[0].id, records[1].id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = InMemoryCropStore::with_records([CropRecord::default().with_id("a")]);

        store.update_crop("a", &payload("Jagung")).await.unwrap();
        let records = store.fetch_crops().await.unwrap();
        assert_eq!(records[0].crop.name, "Jagung");
        assert_eq!(records[0].id.as_deref(), Some("a"));

        store.delete_crop("a").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = InMemoryCropStore::new();
        assert_eq!(
            store.update_crop("zz", &payload("Padi")).await,
            Err(ClientError::NotFound("zz".into()))
        );
        assert_eq!(store.delete_crop("zz").await, Err(ClientError::NotFound("zz".into())));
    }

    #[tokio::test]
    async fn test_seeding_fills_missing_ids() {
        let store = InMemoryCropStore::with_records([CropRecord::default(), CropRecord::default().with_id("x")]);
        let records = store.fetch_crops().await.unwrap();
        assert!(records.iter().all(CropRecord::is_persisted));
        assert_eq!(records[1].id.as_deref(), Some("x"));
        assert_eq!(store.len().await, 2);
    }
}
