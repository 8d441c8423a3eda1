//! Demo patients loaded into an empty store on request.

use serde_json::{Map, Value};

use crate::models::Patient;

/// Number of demo patients.
pub const DEMO_PATIENT_COUNT: usize = 56;

/// Build the demo patient list with counter identifiers "1".."56".
///
/// Appointments fall on the 10th of October (1-20), November (21-45) and
/// December (46-56) 2025.
pub fn demo_patients() -> Vec<Patient> {
    (1..=DEMO_PATIENT_COUNT)
        .map(|i| {
            let month = match i {
                1..=20 => "10",
                21..=45 => "11",
                _ => "12",
            };
            let time = if i % 3 == 0 {
                "09:00"
            } else if i % 2 == 0 {
                "14:30"
            } else {
                "11:15"
            };
            let status = if i % 2 == 0 { "PRESENT" } else { "ATTENTE" };
            let year_check = if i <= 27 { "2026" } else { "2025" };

            let mut extra = Map::new();
            extra.insert("year_check".to_string(), Value::from(year_check));

            Patient {
                id: i.to_string(),
                name: Some(Value::from(format!("PATIENT {}", i))),
                date_rdv: Value::from(format!("2025-{}-10", month)),
                time: Value::from(time),
                status: Some(Value::from(status)),
                kind: Some(Value::from("CONTRÔLE")),
                email: None,
                phone: None,
                extra,
            }
        })
        .collect()
}
