//! Patient models.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Appointment time used when a new record arrives without one.
pub const DEFAULT_APPOINTMENT_TIME: &str = "09:00";

/// A patient appointment record as held by the store.
///
/// Only `id` is typed. Every client field keeps the JSON value it arrived
/// with, so a numeric phone or an explicit `null` status round-trips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Store-assigned identifier (counter string or opaque token)
    pub id: String,
    /// Display name
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    /// Appointment date, kept as the client sent it (usually `YYYY-MM-DD`)
    #[serde(rename = "dateRDV", default)]
    pub date_rdv: Value,
    /// Appointment time of day (e.g. "14:30")
    #[serde(default)]
    pub time: Value,
    /// Status tag (e.g. "PRESENT", "ATTENTE")
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    /// Visit type tag (e.g. "CONTRÔLE")
    #[serde(rename = "type", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,
    /// Any other client-supplied fields, stored verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial patient record used for inserts and merge-updates.
///
/// A missing key leaves the target untouched; a key sent as `null` is
/// stored as `null`. A client-supplied `id` is accepted on the wire and
/// always discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientFields {
    #[serde(default, skip_serializing)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(rename = "dateRDV", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date_rdv: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(rename = "type", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Map a key that is present to `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Patient {
    /// Build a new record from client fields under the given identifier.
    ///
    /// A blank date or time (missing, `null`, `""`, `0`, `false`, empty
    /// container) is backfilled with today's date and
    /// [`DEFAULT_APPOINTMENT_TIME`].
    pub fn from_fields(id: String, fields: PatientFields) -> Self {
        let date_rdv = fields
            .date_rdv
            .filter(|d| !is_blank(d))
            .unwrap_or_else(|| Value::String(today()));
        let time = fields
            .time
            .filter(|t| !is_blank(t))
            .unwrap_or_else(|| Value::from(DEFAULT_APPOINTMENT_TIME));

        Self {
            id,
            name: fields.name,
            date_rdv,
            time,
            status: fields.status,
            kind: fields.kind,
            email: fields.email,
            phone: fields.phone,
            extra: fields.extra,
        }
    }

    /// Merge supplied fields into this record. The identifier never changes.
    pub fn merge(&mut self, fields: PatientFields) {
        if fields.name.is_some() {
            self.name = fields.name;
        }
        if let Some(date_rdv) = fields.date_rdv {
            self.date_rdv = date_rdv;
        }
        if let Some(time) = fields.time {
            self.time = time;
        }
        if fields.status.is_some() {
            self.status = fields.status;
        }
        if fields.kind.is_some() {
            self.kind = fields.kind;
        }
        if fields.email.is_some() {
            self.email = fields.email;
        }
        if fields.phone.is_some() {
            self.phone = fields.phone;
        }
        for (key, value) in fields.extra {
            self.extra.insert(key, value);
        }
    }

    /// Check whether the appointment date contains the given fragment.
    ///
    /// Non-string dates are matched against their JSON text.
    pub fn date_contains(&self, fragment: &str) -> bool {
        match &self.date_rdv {
            Value::String(date) => date.contains(fragment),
            other => other.to_string().contains(fragment),
        }
    }
}

/// Full field set of an existing record, e.g. for re-inserting seed data.
impl From<Patient> for PatientFields {
    fn from(patient: Patient) -> Self {
        PatientFields {
            id: None,
            name: patient.name,
            date_rdv: Some(patient.date_rdv),
            time: Some(patient.time),
            status: patient.status,
            kind: patient.kind,
            email: patient.email,
            phone: patient.phone,
            extra: patient.extra,
        }
    }
}

/// JSON falsiness: what counts as "not provided" for the backfilled fields.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Today's date in the `YYYY-MM-DD` form used by `dateRDV`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
