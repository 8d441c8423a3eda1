//! Document-collection backend over the SQLite database.

use super::{RecordStore, StoreBackend, StoreError, StoreResult};
use crate::db::Database;
use crate::models::{Patient, PatientFields};

impl RecordStore for Database {
    fn list(&self) -> StoreResult<Vec<Patient>> {
        Ok(self.list_patients()?)
    }

    fn insert(&mut self, fields: PatientFields) -> StoreResult<Patient> {
        let patient = Patient::from_fields(uuid::Uuid::new_v4().to_string(), fields);
        self.insert_patient(&patient)?;
        Ok(patient)
    }

    fn update(&mut self, id: &str, fields: PatientFields) -> StoreResult<Patient> {
        self.merge_patient(id, fields)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    // Zero matched rows is reported as success.
    fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.delete_patient(id)?;
        Ok(())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.count_patients()?)
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Document
    }
}
