use rand::Rng;

use crate::foundation::core::Point;
use crate::foundation::error::{SketchError, SketchResult};
use crate::sketch::cluster::{Block, Cluster};
use crate::sketch::generator::generate;
use crate::sketch::params::Params;
use crate::sketch::variant::Variant;

/// Session state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing pending.
    #[default]
    Idle,
    /// At least one ungenerated cluster is waiting for a start.
    Armed,
    /// Ticking.
    Animating,
}

/// What one call to [`AnimationDriver::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// A radius step was taken.
    pub ticked: bool,
    /// Clusters generated during this tick.
    pub generated: usize,
    /// This tick finished the animation.
    pub completed: bool,
}

/// Owns the clusters and advances them in lockstep.
///
/// All clusters share one `grow_speed` and one tick counter.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    variant: Variant,
    grow_speed: f64,
    clusters: Vec<Cluster>,
    state: SessionState,
    run_ticks: u64,
}

impl AnimationDriver {
    /// Create an idle driver. `grow_speed` is the radius change per tick in pixels.
    pub fn new(variant: Variant, grow_speed: f64) -> SketchResult<Self> {
        variant.validate()?;
        if !(grow_speed.is_finite() && grow_speed > 0.0) {
            return Err(SketchError::validation(format!(
                "grow_speed must be a positive finite number, got {grow_speed}"
            )));
        }
        Ok(Self {
            variant,
            grow_speed,
            clusters: Vec::new(),
            state: SessionState::Idle,
            run_ticks: 0,
        })
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Variant settings driving generation and reveal.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Radius change per tick.
    pub fn grow_speed(&self) -> f64 {
        self.grow_speed
    }

    /// Clusters in placement order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Ticks taken by the current (or last) run.
    pub fn run_ticks(&self) -> u64 {
        self.run_ticks
    }

    /// Add an ungenerated cluster. Arms an idle driver.
    pub(crate) fn add_cluster(&mut self, anchor: Point) -> usize {
        self.clusters.push(Cluster::new(anchor));
        if self.state == SessionState::Idle {
            self.state = SessionState::Armed;
        }
        self.clusters.len() - 1
    }

    /// Move `Armed -> Animating`. Returns `false` in any other state.
    pub(crate) fn start(&mut self) -> bool {
        if self.state != SessionState::Armed {
            return false;
        }
        self.state = SessionState::Animating;
        self.run_ticks = 0;
        tracing::info!(clusters = self.clusters.len(), "animation started");
        true
    }

    /// Drop every cluster and return to idle.
    pub(crate) fn clear(&mut self) {
        self.clusters.clear();
        self.state = SessionState::Idle;
        self.run_ticks = 0;
    }

    /// Advance one frame.
    ///
    /// Ungenerated clusters are populated first, then every radius steps once, then completion
    /// is checked across all clusters. Does nothing unless animating.
    pub fn tick<R: Rng + ?Sized>(&mut self, params: &Params, rng: &mut R) -> TickReport {
        if self.state != SessionState::Animating {
            return TickReport::default();
        }

        let mut generated = 0;
        for cluster in self.clusters.iter_mut().filter(|c| !c.is_generated()) {
            generate(cluster, params, &self.variant, rng);
            generated += 1;
        }

        let direction = self.variant.direction;
        for cluster in &mut self.clusters {
            cluster.step(direction, self.grow_speed);
        }
        self.run_ticks += 1;

        let completed = self.clusters.iter().all(|c| c.is_complete(direction));
        if completed {
            self.state = SessionState::Idle;
            tracing::info!(
                ticks = self.run_ticks,
                clusters = self.clusters.len(),
                "animation complete"
            );
        }

        TickReport {
            ticked: true,
            generated,
            completed,
        }
    }

    /// Blocks to draw, paired with their cluster anchor.
    ///
    /// With `reveal_all`, the radius filter is skipped.
    pub fn drawn_blocks(&self, reveal_all: bool) -> Vec<(Point, &Block)> {
        let direction = self.variant.direction;
        let mut out = Vec::new();
        for cluster in &self.clusters {
            let anchor = cluster.anchor();
            if reveal_all {
                out.extend(cluster.blocks().iter().map(|b| (anchor, b)));
            } else {
                out.extend(cluster.visible_blocks(direction).map(|b| (anchor, b)));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
