//! Capture sinks.
//!
//! Sinks consume rendered frames in capture order, one per animation tick.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Numbered PNG image sequence sink.
pub mod png_seq;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
