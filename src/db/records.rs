//! In-process record tables.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::certificate::model::CertificateRecord;
use crate::service_report::model::ServiceRecord;

/// A record that can live in a `RecordTable`.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Record for CertificateRecord {
    fn id(&self) -> &str {
        &self.certificate_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for ServiceRecord {
    fn id(&self) -> &str {
        &self.service_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Records keyed by id. Cloning shares the underlying table.
#[derive(Clone)]
pub struct RecordTable<T: Record> {
    rows: Arc<RwLock<HashMap<String, T>>>,
}

impl<T: Record> Default for RecordTable<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Record> RecordTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn put(&self, record: T) {
        self.rows.write().insert(record.id().to_string(), record);
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.rows.read().get(id).cloned()
    }

    /// All records, oldest first.
    pub fn list(&self) -> Vec<T> {
        let mut all: Vec<T> = self.rows.read().values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        all
    }

    /// Apply `change` to the record under `id` and return the updated copy.
    pub fn update<F>(&self, id: &str, change: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write();
        let record = rows.get_mut(id)?;
        change(record);
        Some(record.clone())
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        self.rows.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_report::model::CreateServiceRequest;
    use chrono::TimeZone;

    fn record(id: &str, minute: u32) -> ServiceRecord {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0).unwrap();
        ServiceRecord::from_request(id.to_string(), CreateServiceRequest::default(), at)
    }

    #[test]
    fn test_list_is_ordered_by_creation() {
        let table = RecordTable::new();
        table.put(record("b", 5));
        table.put(record("a", 10));
        table.put(record("c", 1));

        let ids: Vec<String> = table.list().into_iter().map(|r| r.service_id).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_update_and_remove() {
        let table = RecordTable::new();
        table.put(record("a", 0));

        let updated = table
            .update("a", |r| r.status = Some("Closed".to_string()))
            .unwrap();
        assert_eq!(updated.status.as_deref(), Some("Closed"));
        assert!(table.update("missing", |_| {}).is_none());

        assert!(table.remove("a").is_some());
        assert!(table.is_empty());
    }
}
