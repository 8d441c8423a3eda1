//! Dashboard statistics, recomputed on every request.

use serde::{Deserialize, Serialize};

use crate::models::Patient;

/// Revenue counted per patient, in euros.
pub const REVENUE_PER_PATIENT: u64 = 60;

/// Appointments shown for "today". Not derived from the records.
pub const RDV_TODAY: u64 = 3;

/// Month buckets as (label, date fragment).
const MONTH_BUCKETS: [(&str, &str); 3] = [("Oct", "-10-"), ("Nov", "-11-"), ("Déc", "-12-")];

/// Headline counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: u64,
    pub chiffre_affaires: u64,
    pub rdv_today: u64,
}

/// One point of the month histogram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthBucket {
    pub name: String,
    pub rdv: u64,
}

/// Counters plus the optional histogram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardReport {
    pub stats: DashboardStats,
    #[serde(rename = "graphData", skip_serializing_if = "Option::is_none")]
    pub graph_data: Option<Vec<MonthBucket>>,
}

/// Derives dashboard numbers from the current records.
#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator {
    month_histogram: bool,
}

impl StatsAggregator {
    pub fn new(month_histogram: bool) -> Self {
        Self { month_histogram }
    }

    /// Compute stats over the given records.
    pub fn compute(&self, records: &[Patient]) -> DashboardReport {
        let total = records.len() as u64;
        let stats = DashboardStats {
            total_patients: total,
            chiffre_affaires: revenue(total),
            rdv_today: RDV_TODAY,
        };

        let graph_data = self.month_histogram.then(|| month_histogram(records));

        DashboardReport { stats, graph_data }
    }
}

/// Revenue for a patient count.
pub fn revenue(total_patients: u64) -> u64 {
    total_patients * REVENUE_PER_PATIENT
}

/// Count records whose date string contains each month fragment.
///
/// Plain substring matching: "2026-01-15" lands in no bucket, and any date
/// carrying "-10-" counts toward October.
pub fn month_histogram(records: &[Patient]) -> Vec<MonthBucket> {
    MONTH_BUCKETS
        .iter()
        .map(|(name, fragment)| MonthBucket {
            name: name.to_string(),
            rdv: records.iter().filter(|p| p.date_contains(fragment)).count() as u64,
        })
        .collect()
}
