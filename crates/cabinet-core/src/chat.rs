//! Canned chatbot replies.

use crate::stats::revenue;

/// Fragments that route a message to the revenue answer.
const REVENUE_KEYWORDS: [&str; 2] = ["ca", "chiffre"];

/// Stateless keyword responder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatResponder;

impl ChatResponder {
    /// Reply to a message.
    ///
    /// Matching is by substring on the lower-cased message, so words that
    /// merely contain "ca" (e.g. "cabinet") also get the revenue answer.
    pub fn respond(&self, message: &str, total_patients: u64, cabinet_name: &str) -> String {
        let message = message.to_lowercase();

        if REVENUE_KEYWORDS.iter().any(|kw| message.contains(kw)) {
            format!(
                "Le CA actuel est de {} € pour {} patients.",
                revenue(total_patients),
                total_patients
            )
        } else {
            format!(
                "Je suis l'IA de {}. Comment puis-je vous aider ?",
                cabinet_name
            )
        }
    }
}
