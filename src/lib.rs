//! clusterbloom is a procedural sketch engine that grows clusters of rectangular blocks around
//! anchor points with a radial reveal animation.
//!
//! The public API is session-oriented:
//!
//! - Create a [`Sketch`] directly or from a [`SketchConfig`]
//! - Place anchors, adjust [`Params`] and start the animation
//! - Call [`Sketch::advance`] once per frame and paint the returned rectangles
//! - Optionally record every animation tick into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Tick-driven reveal animation.
pub mod animation;
/// Capture sinks.
pub mod encode;
/// Rasterization of frame commands.
pub mod render;
/// JSON sketch configuration and scripted runs.
pub mod scene;
/// Session-oriented sketch API.
pub mod session;
/// Parameters, variants, clusters and block generation.
pub mod sketch;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rgb8, Vec2};
pub use crate::foundation::error::{SketchError, SketchResult};

pub use crate::animation::driver::{AnimationDriver, SessionState, TickReport};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png_seq::{PngSequenceOpts, PngSequenceSink};
pub use crate::encode::sink::{FrameSink, InMemoryCapture, InMemorySink, SinkConfig};
pub use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
pub use crate::render::commands::{FrameCommands, RectCommand};
pub use crate::render::cpu::CpuBackend;
pub use crate::scene::config::{ScriptReport, SketchConfig, VariantDef};
pub use crate::session::capture::FinalizeOutcome;
pub use crate::session::sketch::{
    AnchorOutcome, IgnoreReason, RecordOutcome, Sketch, SketchOpts, StartOutcome, TickOutput,
};
pub use crate::sketch::cluster::{Block, Cluster};
pub use crate::sketch::params::Params;
pub use crate::sketch::variant::{Arming, BlockShape, Direction, Preset, Variant};
