use std::io::Read;
use std::ops::ControlFlow;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps, Point, Rgb8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::session::capture::FinalizeOutcome;
use crate::session::sketch::{AnchorOutcome, Sketch, SketchOpts, StartOutcome, TickOutput};
use crate::sketch::params::Params;
use crate::sketch::variant::{Arming, BlockShape, Direction, Preset, Variant};

/// A sketch described as JSON: session settings, parameters and a scripted list of anchors.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SketchConfig {
    /// Drawing surface size.
    pub canvas: Canvas,
    /// Capture frame rate.
    #[serde(default)]
    pub fps: Fps,
    /// Generator seed.
    #[serde(default)]
    pub seed: u64,
    /// Variant preset and overrides.
    #[serde(default)]
    pub variant: VariantDef,
    /// Initial parameters.
    #[serde(default)]
    pub params: Params,
    /// Radius change per tick, in pixels.
    #[serde(default = "default_grow_speed")]
    pub grow_speed: f64,
    /// Background fill.
    #[serde(default = "default_background")]
    pub background: Rgb8,
    /// Rows at the top reserved for UI.
    #[serde(default)]
    pub reserved_band_px: u32,
    /// Anchors placed, in order, by a scripted run.
    #[serde(default)]
    pub anchors: Vec<Point>,
    /// Upper bound on ticks for a scripted run.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

fn default_grow_speed() -> f64 {
    SketchOpts::default().grow_speed
}

fn default_background() -> Rgb8 {
    SketchOpts::default().background
}

fn default_max_ticks() -> u64 {
    100_000
}

/// A preset with optional per-field overrides.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariantDef {
    /// Base preset.
    pub preset: Preset,
    /// Overrides the block shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<BlockShape>,
    /// Overrides the jitter multiplier; `0` disables jitter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter: Option<f64>,
    /// Overrides the per-cluster block cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<usize>,
    /// Overrides the radius direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Overrides the start behavior.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arming: Option<Arming>,
    /// Overrides the completing-frame reveal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_all_on_complete: Option<bool>,
}

impl VariantDef {
    /// Apply the overrides on top of the preset.
    pub fn resolve(&self) -> Variant {
        let mut v = Variant::preset(self.preset);
        if let Some(shape) = self.shape {
            v.shape = shape;
        }
        if let Some(j) = self.jitter {
            v.jitter = (j != 0.0).then_some(j);
        }
        if let Some(cap) = self.cap {
            v.cap = cap;
        }
        if let Some(direction) = self.direction {
            v.direction = direction;
        }
        if let Some(arming) = self.arming {
            v.arming = arming;
        }
        if let Some(reveal) = self.reveal_all_on_complete {
            v.reveal_all_on_complete = reveal;
        }
        v
    }
}

/// Summary of a scripted run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptReport {
    /// Ticks taken across all animation runs.
    pub ticks: u64,
    /// Animation runs that completed.
    pub completions: u32,
    /// Anchors the session refused.
    pub ignored_anchors: usize,
    /// Outcome of the first completion, which ends any recording.
    pub finalized: Option<FinalizeOutcome>,
    /// `true` when the callback stopped the run early.
    pub stopped: bool,
}

impl SketchConfig {
    /// Parse and validate a config from JSON.
    pub fn from_reader(r: impl Read) -> SketchResult<Self> {
        let cfg: Self =
            serde_json::from_reader(r).map_err(|e| SketchError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open sketch config '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Check every field.
    pub fn validate(&self) -> SketchResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        self.params.validate()?;
        self.variant.resolve().validate()?;
        if !(self.grow_speed.is_finite() && self.grow_speed > 0.0) {
            return Err(SketchError::validation(format!(
                "grow_speed must be a positive finite number, got {}",
                self.grow_speed
            )));
        }
        if self.reserved_band_px >= self.canvas.height {
            return Err(SketchError::validation(
                "reserved_band_px must leave part of the canvas usable",
            ));
        }
        if self.max_ticks == 0 {
            return Err(SketchError::validation("max_ticks must be > 0"));
        }
        if let Some(p) = self
            .anchors
            .iter()
            .find(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(SketchError::validation(format!(
                "anchor ({}, {}) is not a finite point",
                p.x, p.y
            )));
        }
        Ok(())
    }

    /// Session settings described by this config.
    pub fn opts(&self) -> SketchOpts {
        SketchOpts {
            canvas: self.canvas,
            fps: self.fps,
            seed: self.seed,
            grow_speed: self.grow_speed,
            background: self.background,
            reserved_band_px: self.reserved_band_px,
        }
    }

    /// Create an idle session with this config's settings and parameters.
    pub fn session(&self) -> SketchResult<Sketch> {
        Sketch::new(self.opts(), self.variant.resolve(), self.params)
    }

    /// Place the configured anchors and animate them to completion.
    ///
    /// Manually armed variants place every anchor and start once. Immediate variants animate each
    /// anchor to completion before placing the next. `on_frame` sees every ticked frame and may
    /// stop the run early. Attach a recording to `sketch` beforehand to capture the run.
    #[tracing::instrument(level = "debug", skip_all, fields(anchors = self.anchors.len()))]
    pub fn run(
        &self,
        sketch: &mut Sketch,
        mut on_frame: impl FnMut(&TickOutput) -> SketchResult<ControlFlow<()>>,
    ) -> SketchResult<ScriptReport> {
        if self.anchors.is_empty() {
            return Err(SketchError::validation("scripted run needs at least one anchor"));
        }
        let mut report = ScriptReport::default();

        if sketch.variant().arming == Arming::Immediate {
            for &p in &self.anchors {
                if !place(sketch, p, &mut report) {
                    continue;
                }
                if self.drive(sketch, &mut report, &mut on_frame)?.is_break() {
                    break;
                }
            }
            return Ok(report);
        }

        for &p in &self.anchors {
            place(sketch, p, &mut report);
        }
        match sketch.start_animation() {
            StartOutcome::Started => {
                let _ = self.drive(sketch, &mut report, &mut on_frame)?;
                Ok(report)
            }
            StartOutcome::Ignored(reason) => Err(SketchError::validation(format!(
                "scripted run could not start the animation: {reason:?}"
            ))),
        }
    }

    fn drive(
        &self,
        sketch: &mut Sketch,
        report: &mut ScriptReport,
        on_frame: &mut impl FnMut(&TickOutput) -> SketchResult<ControlFlow<()>>,
    ) -> SketchResult<ControlFlow<()>> {
        loop {
            if report.ticks >= self.max_ticks {
                return Err(SketchError::validation(format!(
                    "scripted run exceeded max_ticks ({})",
                    self.max_ticks
                )));
            }
            let out = sketch.advance()?;
            if out.tick.is_none() {
                return Ok(ControlFlow::Continue(()));
            }
            report.ticks += 1;
            if out.completed {
                report.completions += 1;
                if report.finalized.is_none() {
                    report.finalized = out.finalized;
                }
            }
            if on_frame(&out)?.is_break() {
                report.stopped = true;
                return Ok(ControlFlow::Break(()));
            }
            if out.completed {
                return Ok(ControlFlow::Continue(()));
            }
        }
    }
}

fn place(sketch: &mut Sketch, p: Point, report: &mut ScriptReport) -> bool {
    match sketch.place_anchor(p) {
        AnchorOutcome::Placed { .. } => true,
        AnchorOutcome::Ignored(reason) => {
            tracing::warn!(x = p.x, y = p.y, ?reason, "scripted anchor ignored");
            report.ignored_anchors += 1;
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
