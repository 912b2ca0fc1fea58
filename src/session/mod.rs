//! Session-oriented sketch API.

/// Recording slot.
pub mod capture;
/// The interactive sketch session.
pub mod sketch;
