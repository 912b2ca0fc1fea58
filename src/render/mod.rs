//! Rectangle fill commands and the CPU rasterizer that turns them into frames.

/// Render backend trait and frame buffer type.
pub mod backend;
/// Per-frame rectangle commands.
pub mod commands;
/// `vello_cpu` backend.
pub mod cpu;
