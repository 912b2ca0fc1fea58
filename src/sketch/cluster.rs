use crate::foundation::core::{Point, Vec2};
use crate::sketch::variant::Direction;

/// One generated rectangle, immutable once created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    /// Center offset from the cluster anchor, jitter included.
    pub position: Vec2,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Distance of the pre-jitter grid offset from the anchor. Reveal order key.
    pub distance_from_center: f64,
}

impl Block {
    /// Axis-aligned rectangle of this block for a cluster anchored at `anchor`.
    pub fn rect_at(&self, anchor: Point) -> kurbo::Rect {
        kurbo::Rect::from_center_size(anchor + self.position, (self.width, self.height))
    }
}

/// Return `true` when a block at `distance` is shown at `radius`.
pub fn is_visible(direction: Direction, distance: f64, radius: f64) -> bool {
    match direction {
        Direction::Grow => distance <= radius,
        Direction::Shrink => distance >= radius,
    }
}

/// Blocks grown or shrunk radially around one anchor.
#[derive(Clone, Debug)]
pub struct Cluster {
    anchor: Point,
    current_radius: f64,
    start_radius: f64,
    ticks: u64,
    extent: Option<f64>,
    blocks: Vec<Block>,
}

impl Cluster {
    /// Create an ungenerated cluster at `anchor`.
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            current_radius: 0.0,
            start_radius: 0.0,
            ticks: 0,
            extent: None,
            blocks: Vec::new(),
        }
    }

    /// Anchor position in canvas pixels.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Current reveal radius.
    pub fn current_radius(&self) -> f64 {
        self.current_radius
    }

    /// Generated blocks in generation order. Empty until generated.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Candidate disc radius captured at generation time.
    pub fn extent(&self) -> Option<f64> {
        self.extent
    }

    /// Return `true` once the generator has run for this cluster.
    ///
    /// A cluster whose generation admitted no block still counts as generated.
    pub fn is_generated(&self) -> bool {
        self.extent.is_some()
    }

    /// Number of radius steps taken so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn populate(&mut self, blocks: Vec<Block>, extent: f64, direction: Direction) {
        self.blocks = blocks;
        self.extent = Some(extent);
        self.start_radius = match direction {
            Direction::Grow => 0.0,
            Direction::Shrink => extent,
        };
        self.ticks = 0;
        self.current_radius = self.start_radius;
    }

    /// Move the radius one step of `grow_speed` in `direction`.
    ///
    /// The radius is derived from the step count rather than accumulated, so it never drifts.
    pub(crate) fn step(&mut self, direction: Direction, grow_speed: f64) {
        self.ticks += 1;
        let travelled = (self.ticks as f64) * grow_speed;
        self.current_radius = match direction {
            Direction::Grow => self.start_radius + travelled,
            Direction::Shrink => self.start_radius - travelled,
        };
    }

    /// Return `true` when the radius has reached its boundary.
    ///
    /// Ungenerated clusters are never complete.
    pub fn is_complete(&self, direction: Direction) -> bool {
        let Some(extent) = self.extent else {
            return false;
        };
        match direction {
            Direction::Grow => self.current_radius >= extent,
            Direction::Shrink => self.current_radius <= 0.0,
        }
    }

    /// Blocks shown at the current radius.
    pub fn visible_blocks(&self, direction: Direction) -> impl Iterator<Item = &Block> + '_ {
        let radius = self.current_radius;
        self.blocks
            .iter()
            .filter(move |b| is_visible(direction, b.distance_from_center, radius))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sketch/cluster.rs"]
mod tests;
