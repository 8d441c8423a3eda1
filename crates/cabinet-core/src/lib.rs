//! Cabinet Core Library
//!
//! Patient records, cabinet metadata, dashboard numbers, a canned chatbot and
//! chat-report export for a dental cabinet backend.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────── Clinic ────────────────┐
//!                 │              (one mutex)               │
//!                 │                                        │
//!   RecordStore ──┼──► StatsAggregator    ChatResponder    │
//!   (memory |     │                                        │
//!    document)  ──┼──► CabinetProfileHolder                │
//!                 │                                        │
//!                 │    ReportRenderer ──► PDF bytes        │
//!                 └────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: record store contract, in-memory backend, demo seed
//! - [`db`]: SQLite document collection (second store backend)
//! - [`models`]: domain types (Patient, CabinetProfile, ChatTurn)
//! - [`profile`]: cabinet profile holder and occupancy rate
//! - [`stats`]: dashboard statistics
//! - [`chat`]: keyword chatbot
//! - [`export`]: chat report layout and PDF writer

pub mod chat;
pub mod db;
pub mod export;
pub mod models;
pub mod profile;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use chat::ChatResponder;
pub use db::Database;
pub use export::{ReportRenderer, ReportSettings};
pub use models::{CabinetProfile, ChatRole, ChatTurn, Patient, PatientFields, ProfilePatch};
pub use profile::{CabinetProfileHolder, ProfileMode};
pub use stats::{DashboardReport, DashboardStats, MonthBucket, StatsAggregator};
pub use store::{open_store, IdScheme, MemoryStore, RecordStore, StoreBackend, StoreSettings};

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Report renderer unavailable")]
    RendererUnavailable,
}

pub type ClinicResult<T> = Result<T, ClinicError>;

impl From<store::StoreError> for ClinicError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::NotFound(id) => ClinicError::NotFound(id),
            store::StoreError::Storage(e) => ClinicError::Storage(e.to_string()),
        }
    }
}

impl From<db::DbError> for ClinicError {
    fn from(e: db::DbError) -> Self {
        ClinicError::Storage(e.to_string())
    }
}

impl From<export::ReportError> for ClinicError {
    fn from(e: export::ReportError) -> Self {
        match e {
            export::ReportError::RendererUnavailable => ClinicError::RendererUnavailable,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::Storage(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Settings
// =========================================================================

/// Initial cabinet profile and read behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub nom: String,
    pub adresse: String,
    pub telephone: String,
    /// Refresh `taux_occupation` from the record count on every read
    pub recompute_occupancy: bool,
    /// Defaults to `constant` for the document backend, `mutable` otherwise
    pub mode: Option<ProfileMode>,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        let profile = CabinetProfile::default();
        Self {
            nom: profile.name,
            adresse: profile.address,
            telephone: profile.phone,
            recompute_occupancy: true,
            mode: None,
        }
    }
}

/// Dashboard options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// Emit the Oct/Nov/Dec histogram next to the counters
    pub month_histogram: bool,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            month_histogram: true,
        }
    }
}

/// Everything needed to build a [`Clinic`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicSettings {
    pub store: StoreSettings,
    pub profile: ProfileSettings,
    pub stats: StatsSettings,
    pub report: ReportSettings,
}

// =========================================================================
// Main API Object
// =========================================================================

struct ClinicState {
    store: Box<dyn RecordStore>,
    profile: CabinetProfileHolder,
}

/// Thread-safe facade over the store and the derived views.
///
/// Every operation runs inside one critical section, so a read-modify-write
/// on the store never interleaves with another request.
pub struct Clinic {
    state: Mutex<ClinicState>,
    stats: StatsAggregator,
    chat: ChatResponder,
    reports: ReportRenderer,
}

impl Clinic {
    /// Open the configured store and build the clinic around it.
    pub fn open(settings: &ClinicSettings) -> ClinicResult<Self> {
        let store = open_store(&settings.store)?;
        Ok(Self::with_store(store, settings))
    }

    /// Build the clinic around an already opened store.
    pub fn with_store(store: Box<dyn RecordStore>, settings: &ClinicSettings) -> Self {
        let mode = settings.profile.mode.unwrap_or(match store.backend() {
            StoreBackend::Document => ProfileMode::Constant,
            StoreBackend::Memory => ProfileMode::Mutable,
        });
        let initial = CabinetProfile {
            name: settings.profile.nom.clone(),
            address: settings.profile.adresse.clone(),
            phone: settings.profile.telephone.clone(),
            ..CabinetProfile::default()
        };

        Self {
            state: Mutex::new(ClinicState {
                store,
                profile: CabinetProfileHolder::new(
                    initial,
                    mode,
                    settings.profile.recompute_occupancy,
                ),
            }),
            stats: StatsAggregator::new(settings.stats.month_histogram),
            chat: ChatResponder,
            reports: ReportRenderer::new(settings.report),
        }
    }

    /// Backend holding the records.
    pub fn backend(&self) -> ClinicResult<StoreBackend> {
        Ok(self.state.lock()?.store.backend())
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// List all patients in store order.
    pub fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        let state = self.state.lock()?;
        Ok(state.store.list()?)
    }

    /// Add a patient; the store assigns the identifier.
    pub fn add_patient(&self, fields: PatientFields) -> ClinicResult<Patient> {
        let mut state = self.state.lock()?;
        let patient = state.store.insert(fields)?;
        info!(id = %patient.id, "patient added");
        Ok(patient)
    }

    /// Merge fields into an existing patient.
    pub fn update_patient(&self, id: &str, fields: PatientFields) -> ClinicResult<Patient> {
        let mut state = self.state.lock()?;
        let patient = state.store.update(id, fields)?;
        info!(id = %id, "patient updated");
        Ok(patient)
    }

    /// Delete a patient. Unknown identifiers succeed.
    pub fn delete_patient(&self, id: &str) -> ClinicResult<()> {
        let mut state = self.state.lock()?;
        state.store.delete(id)?;
        info!(id = %id, "patient deleted");
        Ok(())
    }

    // =========================================================================
    // Cabinet Operations
    // =========================================================================

    /// Current cabinet profile.
    pub fn cabinet_info(&self) -> ClinicResult<CabinetProfile> {
        let mut state = self.state.lock()?;
        let count = state.store.count()?;
        Ok(state.profile.get(count))
    }

    /// Merge a partial profile update.
    pub fn update_cabinet(&self, patch: ProfilePatch) -> ClinicResult<()> {
        let mut state = self.state.lock()?;
        state.profile.update(patch);
        Ok(())
    }

    // =========================================================================
    // Dashboard & Chat
    // =========================================================================

    /// Dashboard counters and histogram.
    pub fn dashboard_stats(&self) -> ClinicResult<DashboardReport> {
        let state = self.state.lock()?;
        let records = state.store.list()?;
        Ok(self.stats.compute(&records))
    }

    /// Canned chatbot reply.
    pub fn chat(&self, message: &str) -> ClinicResult<String> {
        let state = self.state.lock()?;
        let total = state.store.count()? as u64;
        Ok(self.chat.respond(message, total, state.profile.name()))
    }

    /// Render a chat transcript as a one-page PDF.
    pub fn export_chat_report(&self, turns: &[ChatTurn]) -> ClinicResult<Vec<u8>> {
        let name = self.state.lock()?.profile.name().to_string();
        let bytes = self.reports.render(&name, turns)?;
        info!(turns = turns.len(), bytes = bytes.len(), "chat report rendered");
        Ok(bytes)
    }
}
