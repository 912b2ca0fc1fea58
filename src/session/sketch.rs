use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::animation::driver::{AnimationDriver, SessionState};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, Point, Rgb8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
use crate::render::commands::{FrameCommands, RectCommand};
use crate::session::capture::{CaptureSlot, FinalizeOutcome};
use crate::sketch::cluster::Cluster;
use crate::sketch::params::Params;
use crate::sketch::variant::{Arming, Variant};

/// Session-wide settings that do not change while sketching.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SketchOpts {
    /// Drawing surface size.
    pub canvas: Canvas,
    /// Capture frame rate.
    pub fps: Fps,
    /// Seed of the block generator.
    pub seed: u64,
    /// Radius change per tick, in pixels.
    pub grow_speed: f64,
    /// Background fill.
    pub background: Rgb8,
    /// Rows at the top of the canvas reserved for UI; anchors there are ignored.
    pub reserved_band_px: u32,
}

impl Default for SketchOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1280,
                height: 720,
            },
            fps: Fps::default(),
            seed: 0,
            grow_speed: 2.0,
            background: Rgb8::new(255, 255, 255),
            reserved_band_px: 0,
        }
    }
}

/// Why a command was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The animation is running.
    Animating,
    /// The point lies outside the canvas.
    OutsideCanvas,
    /// The point lies in the reserved UI band.
    ReservedBand,
    /// The variant accepts no more anchors.
    AnchorLimit,
    /// No placed anchor is waiting to animate.
    NothingArmed,
    /// The variant needs exactly `required` anchors before starting.
    WrongAnchorCount {
        /// Anchors the variant requires.
        required: usize,
        /// Anchors currently placed.
        placed: usize,
    },
    /// A recording is already active.
    AlreadyRecording,
}

/// Result of [`Sketch::place_anchor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// A cluster was created at index `index`.
    Placed {
        /// Cluster index in placement order.
        index: usize,
        /// The variant started the animation right away.
        started: bool,
    },
    /// The anchor was dropped.
    Ignored(IgnoreReason),
}

/// Result of [`Sketch::start_animation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// The session is now animating.
    Started,
    /// Nothing changed.
    Ignored(IgnoreReason),
}

/// Result of [`Sketch::start_recording`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The sink was started and will receive one frame per animation tick.
    Started,
    /// The sink was dropped without being started.
    Ignored(IgnoreReason),
}

/// One frame of output from [`Sketch::advance`].
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutput {
    /// State after this frame.
    pub state: SessionState,
    /// Tick number within the current run, when the animation stepped.
    pub tick: Option<u64>,
    /// This frame completed the animation.
    pub completed: bool,
    /// Rectangles to paint.
    pub frame: FrameCommands,
    /// What happened to the recording on completion. `None` on every other frame.
    pub finalized: Option<FinalizeOutcome>,
}

/// Interactive sketch session.
///
/// Owns the parameters, the clusters, a seeded RNG and an optional recording. A host calls the
/// command methods in response to input and [`Sketch::advance`] once per frame.
pub struct Sketch {
    opts: SketchOpts,
    params: Params,
    driver: AnimationDriver,
    rng: ChaCha8Rng,
    capture: CaptureSlot,
    backend: Box<dyn RenderBackend>,
}

impl Sketch {
    /// Create an idle session.
    pub fn new(opts: SketchOpts, variant: Variant, params: Params) -> SketchResult<Self> {
        Canvas::new(opts.canvas.width, opts.canvas.height)?;
        Fps::new(opts.fps.num, opts.fps.den)?;
        params.validate()?;
        let driver = AnimationDriver::new(variant, opts.grow_speed)?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(opts.seed),
            opts,
            params,
            driver,
            capture: CaptureSlot::default(),
            backend: create_backend(BackendKind::Cpu),
        })
    }

    /// Session settings.
    pub fn opts(&self) -> &SketchOpts {
        &self.opts
    }

    /// Current canvas.
    pub fn canvas(&self) -> Canvas {
        self.opts.canvas
    }

    /// Current parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Variant settings.
    pub fn variant(&self) -> &Variant {
        self.driver.variant()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.driver.state()
    }

    /// Clusters in placement order.
    pub fn clusters(&self) -> &[Cluster] {
        self.driver.clusters()
    }

    /// Return `true` while a recording is active.
    pub fn is_recording(&self) -> bool {
        self.capture.is_active()
    }

    /// Place a cluster anchor at `p` (canvas pixels).
    pub fn place_anchor(&mut self, p: Point) -> AnchorOutcome {
        let guard = if self.state() == SessionState::Animating {
            Some(IgnoreReason::Animating)
        } else if !self.opts.canvas.contains(p) {
            Some(IgnoreReason::OutsideCanvas)
        } else if p.y < f64::from(self.opts.reserved_band_px) {
            Some(IgnoreReason::ReservedBand)
        } else if self
            .variant()
            .max_anchors()
            .is_some_and(|max| self.clusters().len() >= max)
        {
            Some(IgnoreReason::AnchorLimit)
        } else {
            None
        };
        if let Some(reason) = guard {
            tracing::debug!(x = p.x, y = p.y, ?reason, "anchor ignored");
            return AnchorOutcome::Ignored(reason);
        }

        let index = self.driver.add_cluster(p);
        let started = self.variant().arming == Arming::Immediate && self.driver.start();
        tracing::debug!(x = p.x, y = p.y, index, started, "anchor placed");
        AnchorOutcome::Placed { index, started }
    }

    /// Set the grid cell size for clusters generated from now on.
    pub fn set_block_size(&mut self, block_size: u32) -> SketchResult<()> {
        self.params.set_block_size(block_size)
    }

    /// Set the admission probability for clusters generated from now on.
    pub fn set_density(&mut self, density: f64) -> SketchResult<()> {
        self.params.set_density(density)
    }

    /// Set the fill color. Applies to the next rendered frame, including existing clusters.
    pub fn set_color(&mut self, color: Rgb8) {
        self.params.set_color(color);
    }

    /// Start animating the placed anchors.
    pub fn start_animation(&mut self) -> StartOutcome {
        let reason = match self.state() {
            SessionState::Animating => Some(IgnoreReason::Animating),
            SessionState::Idle => Some(IgnoreReason::NothingArmed),
            SessionState::Armed => match self.variant().arming {
                Arming::Exact(required) if self.clusters().len() != required => {
                    Some(IgnoreReason::WrongAnchorCount {
                        required,
                        placed: self.clusters().len(),
                    })
                }
                _ => None,
            },
        };
        if let Some(reason) = reason {
            tracing::debug!(?reason, "start ignored");
            return StartOutcome::Ignored(reason);
        }
        if self.driver.start() {
            StartOutcome::Started
        } else {
            StartOutcome::Ignored(IgnoreReason::NothingArmed)
        }
    }

    /// Attach a sink. Frames are captured on every animation tick until completion.
    ///
    /// Ignored while a recording is active.
    pub fn start_recording(&mut self, sink: Box<dyn FrameSink>) -> SketchResult<RecordOutcome> {
        let cfg = SinkConfig {
            width: self.opts.canvas.width,
            height: self.opts.canvas.height,
            fps: self.opts.fps,
        };
        if self.capture.start(sink, cfg)? {
            tracing::info!("recording started");
            Ok(RecordOutcome::Started)
        } else {
            tracing::debug!("recording already active");
            Ok(RecordOutcome::Ignored(IgnoreReason::AlreadyRecording))
        }
    }

    /// Drop every cluster, stop animating and abort an active recording.
    pub fn reset(&mut self) {
        self.driver.clear();
        self.capture.abort();
        tracing::debug!("session reset");
    }

    /// Change the canvas size. Implies [`Sketch::reset`].
    pub fn resize(&mut self, canvas: Canvas) -> SketchResult<()> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        self.reset();
        self.opts.canvas = canvas;
        Ok(())
    }

    /// Produce the next frame.
    ///
    /// While animating, this steps the animation once and captures the frame if recording. On
    /// the completing tick the recording is finalized.
    pub fn advance(&mut self) -> SketchResult<TickOutput> {
        let report = self.driver.tick(&self.params, &mut self.rng);
        let reveal_all = report.completed && self.variant().reveal_all_on_complete;
        let frame = self.frame_commands(reveal_all);

        if report.ticked
            && self.capture.is_active()
            && let Err(e) = self.capture_frame(&frame)
        {
            self.capture.abort();
            return Err(e);
        }

        let finalized = if report.completed {
            Some(self.capture.finalize()?)
        } else {
            None
        };

        Ok(TickOutput {
            state: self.state(),
            tick: report.ticked.then_some(self.driver.run_ticks()),
            completed: report.completed,
            frame,
            finalized,
        })
    }

    fn capture_frame(&mut self, frame: &FrameCommands) -> SketchResult<()> {
        let pixels = self.backend.render(self.opts.canvas, frame)?;
        self.capture.push(&pixels)
    }

    /// Rectangles for the current state without advancing.
    pub fn frame_commands(&self, reveal_all: bool) -> FrameCommands {
        let color = self.params.color;
        let rects = self
            .driver
            .drawn_blocks(reveal_all)
            .into_iter()
            .map(|(anchor, b)| RectCommand {
                center: anchor + b.position,
                width: b.width,
                height: b.height,
                color,
            })
            .collect();
        FrameCommands {
            background: self.opts.background,
            rects,
        }
    }

    /// Rasterize `frame` at the current canvas size.
    pub fn render(&mut self, frame: &FrameCommands) -> SketchResult<FrameRGBA> {
        self.backend.render(self.opts.canvas, frame)
    }

    /// Advance until the animation completes, calling `on_frame` for every output.
    ///
    /// Fails when the animation is not running or does not finish within `max_ticks`.
    pub fn run_to_completion(
        &mut self,
        max_ticks: u64,
        mut on_frame: impl FnMut(&TickOutput) -> SketchResult<()>,
    ) -> SketchResult<TickOutput> {
        if self.state() != SessionState::Animating {
            return Err(SketchError::validation(
                "run_to_completion requires a running animation",
            ));
        }
        for _ in 0..max_ticks {
            let out = self.advance()?;
            on_frame(&out)?;
            if out.completed {
                return Ok(out);
            }
        }
        Err(SketchError::validation(format!(
            "animation did not complete within {max_ticks} ticks"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/sketch.rs"]
mod tests;
