//! Chat transcript export.

mod report;
#[cfg(feature = "pdf")]
mod pdf;

pub use report::*;
#[cfg(feature = "pdf")]
pub use pdf::*;
