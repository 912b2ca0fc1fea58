//! Boundary model: sketches described as JSON.

/// `SketchConfig` loading, validation and scripted runs.
pub mod config;
