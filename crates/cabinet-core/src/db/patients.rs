//! Patient document operations.

use rusqlite::{params, Connection, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{Patient, PatientFields};

impl Database {
    /// Insert a new patient document.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        let document = serde_json::to_string(patient)?;
        self.conn.execute(
            "INSERT INTO patient_documents (id, document) VALUES (?1, ?2)",
            params![patient.id, document],
        )?;
        Ok(())
    }

    /// List all patients in insertion order.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM patient_documents ORDER BY seq")?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(serde_json::from_str(&row?)?);
        }
        Ok(patients)
    }

    /// Merge fields into a stored document in one transaction.
    ///
    /// Returns `None` when no document has that ID.
    pub fn merge_patient(&mut self, id: &str, fields: PatientFields) -> DbResult<Option<Patient>> {
        let tx = self.transaction()?;

        let Some(mut patient) = fetch_patient(&tx, id)? else {
            return Ok(None);
        };
        patient.merge(fields);

        let document = serde_json::to_string(&patient)?;
        tx.execute(
            r#"
            UPDATE patient_documents SET
                document = ?2,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![id, document],
        )?;
        tx.commit()?;

        Ok(Some(patient))
    }

    /// Delete a patient. Returns whether a document was removed.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patient_documents WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Count stored patients.
    pub fn count_patients(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patient_documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn fetch_patient(conn: &Connection, id: &str) -> DbResult<Option<Patient>> {
    let document: Option<String> = conn
        .query_row(
            "SELECT document FROM patient_documents WHERE id = ?",
            [id],
            |row| row.get(0),
        )
        .optional()?;

    document
        .map(|doc| serde_json::from_str(&doc))
        .transpose()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_patient(id: &str, name: &str) -> Patient {
        Patient::from_fields(
            id.to_string(),
            PatientFields {
                name: Some(name.into()),
                date_rdv: Some("2025-11-10".into()),
                status: Some("ATTENTE".into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_insert_and_fetch() {
        let db = setup_db();

        let mut patient = make_patient("p-1", "Lefebvre");
        patient.phone = Some(612345678.into());
        db.insert_patient(&patient).unwrap();

        let retrieved = fetch_patient(&db.conn, "p-1").unwrap().unwrap();
        assert_eq!(retrieved, patient);
        assert!(fetch_patient(&db.conn, "p-2").unwrap().is_none());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let db = setup_db();
        for (id, name) in [("z", "Zoe"), ("a", "Alain"), ("m", "Marc")] {
            db.insert_patient(&make_patient(id, name)).unwrap();
        }

        let names: Vec<_> = db
            .list_patients()
            .unwrap()
            .into_iter()
            .filter_map(|p| p.name)
            .collect();
        assert_eq!(names, ["Zoe", "Alain", "Marc"]);
    }

    #[test]
    fn test_merge_patient() {
        let mut db = setup_db();
        db.insert_patient(&make_patient("p-1", "Lefebvre")).unwrap();

        let updated = db
            .merge_patient(
                "p-1",
                PatientFields {
                    status: Some("PRESENT".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, Some("PRESENT".into()));
        assert_eq!(updated.name, Some("Lefebvre".into()));

        let stored = fetch_patient(&db.conn, "p-1").unwrap().unwrap();
        assert_eq!(stored, updated);

        assert!(db.merge_patient("missing", PatientFields::default()).unwrap().is_none());
    }

    #[test]
    fn test_delete_and_count() {
        let db = setup_db();
        db.insert_patient(&make_patient("p-1", "A")).unwrap();
        db.insert_patient(&make_patient("p-2", "B")).unwrap();
        assert_eq!(db.count_patients().unwrap(), 2);

        assert!(db.delete_patient("p-1").unwrap());
        assert!(!db.delete_patient("p-1").unwrap());
        assert_eq!(db.count_patients().unwrap(), 1);
    }
}
