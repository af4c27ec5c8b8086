//! Override record operations over a blob store.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::models::{decode_stored, is_truthy, UpsertRequest};
use crate::store::BlobStore;
use crate::{Error, Result};

/// List, get, upsert and delete override records keyed by date.
#[derive(Clone)]
pub struct OverrideService {
    store: Arc<dyn BlobStore>,
}

impl OverrideService {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Every stored date mapped to its decoded value, ordered by key.
    pub async fn list_all(&self) -> Result<BTreeMap<String, Value>> {
        let keys = self.store.list().await?;
        let mut out = BTreeMap::new();

        for key in keys {
            let raw = self.store.get(&key).await?;
            out.insert(key, decode_stored(raw.as_deref()));
        }

        Ok(out)
    }

    /// The record for one date, `null` when absent or empty.
    pub async fn get_one(&self, date: &str) -> Result<Value> {
        let raw = self.store.get(date).await?;
        let value = decode_stored(raw.as_deref());
        Ok(if is_truthy(&value) { value } else { Value::Null })
    }

    /// Write the normalized record to every target date, returning the count.
    ///
    /// Writes run in order and stop at the first failure; dates before it
    /// stay written.
    pub async fn upsert(&self, request: &UpsertRequest) -> Result<usize> {
        let dates = request.target_dates();
        if dates.is_empty() {
            return Err(Error::Validation("date required".to_string()));
        }

        let record = request.record();
        let blob = serde_json::to_string(&record)?;
        let total = dates.len();

        for (saved, date) in dates.iter().enumerate() {
            if let Err(e) = self.store.set(date, blob.clone()).await {
                error!(date = %date, saved, total, "Override upsert stopped: {}", e);
                return Err(Error::Store(format!(
                    "failed to save {} after {} of {} dates: {}",
                    date, saved, total, e
                )));
            }
        }

        info!(total, closed = record.closed, "Saved override for {} date(s)", total);
        Ok(total)
    }

    /// Remove one date. Deleting an absent date succeeds.
    pub async fn delete(&self, date: Option<&str>) -> Result<()> {
        let date = date
            .filter(|d| !d.is_empty())
            .ok_or_else(|| Error::Validation("date required".to_string()))?;

        self.store.delete(date).await?;
        info!(date = %date, "Deleted override");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OverrideRecord;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;

    fn service() -> (OverrideService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (OverrideService::new(store.clone()), store)
    }

    fn request(body: Value) -> UpsertRequest {
        UpsertRequest::from_body(body.to_string().as_bytes())
    }

    #[tokio::test]
    async fn test_read_after_write() {
        let (service, _) = service();
        let saved = service
            .upsert(&request(json!({"date": "2024-07-04", "start": "08:00", "end": "12:00", "detail": "Short day"})))
            .await
            .unwrap();
        assert_eq!(saved, 1);

        let expected = OverrideRecord::open(Some("08:00".into()), Some("12:00".into()), "Short day");
        let value = service.get_one("2024-07-04").await.unwrap();
        assert_eq!(serde_json::from_value::<OverrideRecord>(value).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_in_full() {
        let (service, _) = service();
        service
            .upsert(&request(json!({"date": "2024-07-04", "start": "08:00", "detail": "a"})))
            .await
            .unwrap();
        service
            .upsert(&request(json!({"date": "2024-07-04", "closed": true})))
            .await
            .unwrap();

        let value = service.get_one("2024-07-04").await.unwrap();
        assert_eq!(value, json!({"closed": true, "start": null, "end": null, "detail": ""}));
    }

    #[tokio::test]
    async fn test_range_upsert_counts_duplicates() {
        let (service, store) = service();
        let saved = service
            .upsert(&request(json!({
                "date": "2024-01-02",
                "from": "2024-01-01",
                "to": "2024-01-03",
                "closed": true
            })))
            .await
            .unwrap();
        assert_eq!(saved, 4);
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_upsert_requires_date() {
        let (service, _) = service();
        let err = service.upsert(&request(json!({}))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == "date required"));
    }

    #[tokio::test]
    async fn test_get_missing_and_falsy_values() {
        let (service, store) = service();
        assert_eq!(service.get_one("2024-01-01").await.unwrap(), Value::Null);

        store.set("2024-01-02", "false".to_string()).await.unwrap();
        store.set("2024-01-03", "".to_string()).await.unwrap();
        assert_eq!(service.get_one("2024-01-02").await.unwrap(), Value::Null);
        assert_eq!(service.get_one("2024-01-03").await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_list_all_tolerates_bad_blobs() {
        let (service, store) = service();
        store.set("2024-01-01", r#"{"closed":true}"#.to_string()).await.unwrap();
        store.set("2024-01-02", "not json".to_string()).await.unwrap();
        store.set("2024-01-03", "".to_string()).await.unwrap();
        store.set("2024-01-04", "0".to_string()).await.unwrap();

        let all = service.list_all().await.unwrap();
        assert_eq!(all["2024-01-01"], json!({"closed": true}));
        assert_eq!(all["2024-01-02"], json!("not json"));
        assert_eq!(all["2024-01-03"], Value::Null);
        assert_eq!(all["2024-01-04"], json!(0));
    }

    #[tokio::test]
    async fn test_list_reflects_writes_and_deletes() {
        let (service, _) = service();
        service
            .upsert(&request(json!({"dates": ["2024-05-01", "2024-05-02", "2024-05-03"]})))
            .await
            .unwrap();
        service.delete(Some("2024-05-02")).await.unwrap();

        let keys: Vec<String> = service.list_all().await.unwrap().into_keys().collect();
        assert_eq!(keys, vec!["2024-05-01", "2024-05-03"]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_requires_date() {
        let (service, _) = service();
        assert!(service.delete(Some("1999-01-01")).await.is_ok());
        assert!(matches!(service.delete(None).await, Err(Error::Validation(_))));
        assert!(matches!(service.delete(Some("")).await, Err(Error::Validation(_))));
    }

    /// Store that fails writes once `fail_after` values are stored.
    struct FlakyStore {
        inner: MemoryStore,
        fail_after: usize,
    }

    #[async_trait]
    impl BlobStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<()> {
            if self.inner.list().await?.len() >= self.fail_after {
                return Err(Error::Store("quota exceeded".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn list(&self) -> Result<Vec<String>> {
            self.inner.list().await
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.inner.delete(key).await
        }
    }

    #[tokio::test]
    async fn test_partial_failure_names_failing_date() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            fail_after: 2,
        });
        let service = OverrideService::new(store.clone());

        let err = service
            .upsert(&request(json!({"from": "2024-01-01", "to": "2024-01-04"})))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("failed to save 2024-01-03 after 2 of 4 dates"));
        assert_eq!(store.list().await.unwrap(), vec!["2024-01-01", "2024-01-02"]);
    }
}
