//! Sketch domain model: parameters, variants, clusters and the block generator.

/// Clusters and blocks.
pub mod cluster;
/// Procedural block sampling.
pub mod generator;
/// Visual parameters.
pub mod params;
/// Variant presets and settings.
pub mod variant;
