//! SQLite schema definition.

/// Document collection schema.
///
/// Each patient is one JSON document keyed by an opaque identifier. `seq`
/// keeps insertion order stable for listing.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patient_documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    document TEXT NOT NULL,                      -- JSON Patient
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO patient_documents (id, document) VALUES (?, ?)",
            ["abc", "{}"],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO patient_documents (id, document) VALUES (?, ?)",
            ["abc", "{}"],
        );
        assert!(result.is_err());
    }
}
