//! Domain models for the cabinet backend.

mod chat;
mod patient;
mod profile;

pub use chat::*;
pub use patient::*;
pub use profile::*;
