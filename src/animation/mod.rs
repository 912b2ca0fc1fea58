//! Tick-driven radial reveal animation.

/// Per-session animation state machine.
pub mod driver;
