//! Patient record store.
//!
//! One [`RecordStore`] contract with two backends: [`MemoryStore`] keeps an
//! ordered list in process, [`Database`] keeps one JSON document per record
//! in SQLite. Callers must treat identifiers as opaque strings.

mod document;
mod memory;
mod seed;

pub use memory::*;
pub use seed::*;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::db::{Database, DbError};
use crate::models::{Patient, PatientFields};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Patient not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD contract shared by every backend.
pub trait RecordStore: Send {
    /// All current records in store order.
    fn list(&self) -> StoreResult<Vec<Patient>>;

    /// Store a new record under a freshly assigned identifier.
    fn insert(&mut self, fields: PatientFields) -> StoreResult<Patient>;

    /// Merge fields into the record with this identifier.
    fn update(&mut self, id: &str, fields: PatientFields) -> StoreResult<Patient>;

    /// Remove the record with this identifier. Unknown identifiers are a no-op.
    fn delete(&mut self, id: &str) -> StoreResult<()>;

    /// Number of current records.
    fn count(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    /// Short backend name for logs and health checks.
    fn backend(&self) -> StoreBackend;
}

/// Which backend holds the records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    /// Ordered list in process memory
    #[default]
    Memory,
    /// JSON documents in SQLite
    Document,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Document => "document",
        }
    }
}

/// Identifier scheme of the in-memory backend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IdScheme {
    /// One more than the highest identifier ever issued; never reuses ids
    #[default]
    Sequential,
    /// `len + 1`; may hand out an identifier that is still live after a delete
    CurrentSize,
}

/// Settings for opening a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    /// Database file for the document backend; in-memory SQLite when unset
    pub path: Option<PathBuf>,
    pub id_scheme: IdScheme,
    /// Pre-populate an empty store with the demo patients
    pub seed_demo: bool,
}

/// Open the configured backend.
pub fn open_store(settings: &StoreSettings) -> StoreResult<Box<dyn RecordStore>> {
    let store: Box<dyn RecordStore> = match settings.backend {
        StoreBackend::Memory => {
            let records = if settings.seed_demo {
                demo_patients()
            } else {
                Vec::new()
            };
            Box::new(MemoryStore::with_records(records, settings.id_scheme))
        }
        StoreBackend::Document => {
            let mut db = match &settings.path {
                Some(path) => Database::open(path)?,
                None => Database::open_in_memory()?,
            };
            if settings.seed_demo && db.count()? == 0 {
                for patient in demo_patients() {
                    db.insert(patient.into())?;
                }
            }
            Box::new(db)
        }
    };

    info!(
        backend = store.backend().as_str(),
        records = store.count()?,
        "record store opened"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory_seeded() {
        let settings = StoreSettings {
            seed_demo: true,
            ..Default::default()
        };
        let store = open_store(&settings).unwrap();
        assert_eq!(store.backend(), StoreBackend::Memory);
        assert_eq!(store.count().unwrap(), 56);
    }

    #[test]
    fn test_open_document_seeded_uses_opaque_ids() {
        let settings = StoreSettings {
            backend: StoreBackend::Document,
            seed_demo: true,
            ..Default::default()
        };
        let store = open_store(&settings).unwrap();
        let patients = store.list().unwrap();

        assert_eq!(patients.len(), 56);
        assert_eq!(patients[0].name, Some("PATIENT 1".into()));
        assert_eq!(patients[0].id.len(), 36);
    }

    #[test]
    fn test_settings_from_json() {
        let settings: StoreSettings =
            serde_json::from_str(r#"{"backend":"document","id_scheme":"current-size"}"#).unwrap();
        assert_eq!(settings.backend, StoreBackend::Document);
        assert_eq!(settings.id_scheme, IdScheme::CurrentSize);
        assert!(!settings.seed_demo);
    }
}
