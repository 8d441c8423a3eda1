//! In-process record store.

use tracing::warn;

use super::{IdScheme, RecordStore, StoreBackend, StoreError, StoreResult};
use crate::models::{Patient, PatientFields};

/// Ordered list of records with counter-based identifiers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Patient>,
    scheme: IdScheme,
    /// Highest counter identifier issued so far
    issued: u64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new(scheme: IdScheme) -> Self {
        Self::with_records(Vec::new(), scheme)
    }

    /// Create a store holding existing records, in the given order.
    pub fn with_records(records: Vec<Patient>, scheme: IdScheme) -> Self {
        let issued = records
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            .max(records.len() as u64);

        Self {
            records,
            scheme,
            issued,
        }
    }

    fn next_id(&mut self) -> String {
        match self.scheme {
            IdScheme::Sequential => {
                self.issued += 1;
                self.issued.to_string()
            }
            IdScheme::CurrentSize => {
                let id = (self.records.len() + 1).to_string();
                if self.records.iter().any(|p| p.id == id) {
                    warn!(id = %id, "current-size id scheme reissued a live identifier");
                }
                id
            }
        }
    }
}

impl RecordStore for MemoryStore {
    fn list(&self) -> StoreResult<Vec<Patient>> {
        Ok(self.records.clone())
    }

    fn insert(&mut self, fields: PatientFields) -> StoreResult<Patient> {
        let id = self.next_id();
        let patient = Patient::from_fields(id, fields);
        self.records.push(patient.clone());
        Ok(patient)
    }

    fn update(&mut self, id: &str, fields: PatientFields) -> StoreResult<Patient> {
        let patient = self
            .records
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patient.merge(fields);
        Ok(patient.clone())
    }

    fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.records.retain(|p| p.id != id);
        Ok(())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.records.len())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> PatientFields {
        PatientFields {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_assigns_counter_ids() {
        let mut store = MemoryStore::new(IdScheme::Sequential);
        let a = store.insert(named("A")).unwrap();
        let b = store.insert(named("B")).unwrap();

        assert_eq!(a.id, "1");
        assert_eq!(b.id, "2");
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_sequential_never_reuses_after_delete() {
        let mut store = MemoryStore::new(IdScheme::Sequential);
        for name in ["A", "B", "C"] {
            store.insert(named(name)).unwrap();
        }
        store.delete("2").unwrap();

        let d = store.insert(named("D")).unwrap();
        assert_eq!(d.id, "4");
    }

    #[test]
    fn test_current_size_reuses_live_id() {
        let mut store = MemoryStore::new(IdScheme::CurrentSize);
        for name in ["A", "B", "C"] {
            store.insert(named(name)).unwrap();
        }
        store.delete("1").unwrap();

        // len is 2 again, so the next id collides with "C"
        let d = store.insert(named("D")).unwrap();
        assert_eq!(d.id, "3");
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["2", "3", "3"]);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = MemoryStore::new(IdScheme::Sequential);
        let result = store.update("42", named("X"));
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == "42"));
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = MemoryStore::new(IdScheme::Sequential);
        store.insert(named("A")).unwrap();
        store.delete("nope").unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_with_records_continues_numbering() {
        let records = vec![
            Patient::from_fields("5".into(), named("A")),
            Patient::from_fields("9".into(), named("B")),
        ];
        let mut store = MemoryStore::with_records(records, IdScheme::Sequential);
        assert_eq!(store.insert(named("C")).unwrap().id, "10");
    }
}
