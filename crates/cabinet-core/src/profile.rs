//! Cabinet profile holder.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CabinetProfile, ProfilePatch};

/// Chair capacity used for the occupancy rate.
pub const OCCUPANCY_CAPACITY: usize = 200;

/// Whether profile updates are kept.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileMode {
    /// Updates are merged into the held profile
    #[default]
    Mutable,
    /// The profile is a constant; updates are accepted and dropped
    Constant,
}

/// Holds the single cabinet profile.
#[derive(Debug, Clone)]
pub struct CabinetProfileHolder {
    profile: CabinetProfile,
    mode: ProfileMode,
    recompute_occupancy: bool,
}

impl CabinetProfileHolder {
    pub fn new(profile: CabinetProfile, mode: ProfileMode, recompute_occupancy: bool) -> Self {
        Self {
            profile,
            mode,
            recompute_occupancy,
        }
    }

    /// Current profile.
    ///
    /// With occupancy recomputation on, `taux_occupation` is refreshed from
    /// the record count and kept in the held profile.
    pub fn get(&mut self, record_count: usize) -> CabinetProfile {
        if self.recompute_occupancy {
            self.profile.occupancy_rate = occupancy_rate(record_count);
        }
        self.profile.clone()
    }

    /// Merge a partial update. No-op in [`ProfileMode::Constant`].
    pub fn update(&mut self, patch: ProfilePatch) {
        match self.mode {
            ProfileMode::Mutable => self.profile.apply(patch),
            ProfileMode::Constant => debug!("profile is constant, update dropped"),
        }
    }

    /// Cabinet name, without touching the occupancy rate.
    pub fn name(&self) -> &str {
        &self.profile.name
    }
}

/// `min(100, count / capacity * 100)` truncated to a whole percent.
pub fn occupancy_rate(record_count: usize) -> String {
    let percent = (record_count as f64 / OCCUPANCY_CAPACITY as f64 * 100.0).min(100.0);
    format!("{}%", percent.trunc() as u32)
}
