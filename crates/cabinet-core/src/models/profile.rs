//! Cabinet profile models.

use serde::{Deserialize, Serialize};

/// Metadata of the cabinet. Exactly one instance exists per process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CabinetProfile {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "telephone")]
    pub phone: String,
    /// Occupancy rate as a percent string (e.g. "28%")
    #[serde(rename = "taux_occupation")]
    pub occupancy_rate: String,
}

impl Default for CabinetProfile {
    fn default() -> Self {
        Self {
            name: "Cabinet Dentaire Efficience".to_string(),
            address: "12 Bis Avenue des Champs-Élysées, Paris".to_string(),
            phone: "01 45 67 89 10".to_string(),
            occupancy_rate: "10%".to_string(),
        }
    }
}

/// Partial profile sent by clients. Unset fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfilePatch {
    #[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "adresse", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "telephone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "taux_occupation", default, skip_serializing_if = "Option::is_none")]
    pub occupancy_rate: Option<String>,
}

impl CabinetProfile {
    /// Merge a partial update into the profile.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(rate) = patch.occupancy_rate {
            self.occupancy_rate = rate;
        }
    }
}
