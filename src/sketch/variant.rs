use crate::foundation::error::{SketchError, SketchResult};

/// How block width/height are drawn, as multiples of the block size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockShape {
    /// Width and height drawn independently from `[min, max) * block_size`.
    Range {
        /// Lower multiplier (inclusive).
        min: f64,
        /// Upper multiplier (exclusive).
        max: f64,
    },
    /// Exactly `block_size` square.
    Square,
}

/// Direction the reveal radius travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Radius starts at 0 and grows; blocks with `distance <= radius` are shown.
    Grow,
    /// Radius starts at the extent and shrinks; blocks with `distance >= radius` are shown.
    Shrink,
}

/// When placed anchors turn into a running animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "anchors", rename_all = "snake_case")]
pub enum Arming {
    /// Anchors accumulate until `start_animation`.
    Manual,
    /// Every accepted anchor starts the animation right away.
    Immediate,
    /// Exactly this many anchors must be placed before `start_animation`; more are refused.
    Exact(usize),
}

/// Built-in sketch variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Ranged blocks growing outward from every anchor.
    #[default]
    Bloom,
    /// Wider size spread with positional jitter and a larger cap.
    Scatter,
    /// Uniform squares, animating on every click.
    Mosaic,
    /// Three anchors, jittered blocks.
    Triad,
    /// Shrinking radius: blocks appear from the outside in.
    Erode,
}

/// Full description of one sketch variant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Variant {
    /// Block size distribution.
    pub shape: BlockShape,
    /// Maximum positional jitter per axis, as a multiple of the block size.
    pub jitter: Option<f64>,
    /// Maximum number of blocks per cluster.
    pub cap: usize,
    /// Radius direction.
    pub direction: Direction,
    /// Start behavior.
    pub arming: Arming,
    /// Emit every block, unfiltered, on the tick that completes the animation.
    pub reveal_all_on_complete: bool,
}

impl Variant {
    /// Build the settings of a built-in preset.
    pub fn preset(preset: Preset) -> Self {
        let ranged = BlockShape::Range { min: 0.5, max: 1.5 };
        match preset {
            Preset::Bloom => Self {
                shape: ranged,
                jitter: None,
                cap: 100,
                direction: Direction::Grow,
                arming: Arming::Manual,
                reveal_all_on_complete: true,
            },
            Preset::Scatter => Self {
                shape: BlockShape::Range { min: 0.3, max: 1.8 },
                jitter: Some(0.3),
                cap: 200,
                direction: Direction::Grow,
                arming: Arming::Manual,
                reveal_all_on_complete: true,
            },
            Preset::Mosaic => Self {
                shape: BlockShape::Square,
                jitter: None,
                cap: 100,
                direction: Direction::Grow,
                arming: Arming::Immediate,
                reveal_all_on_complete: true,
            },
            Preset::Triad => Self {
                shape: ranged,
                jitter: Some(0.3),
                cap: 200,
                direction: Direction::Grow,
                arming: Arming::Exact(3),
                reveal_all_on_complete: true,
            },
            Preset::Erode => Self {
                shape: ranged,
                jitter: None,
                cap: 100,
                direction: Direction::Shrink,
                arming: Arming::Manual,
                reveal_all_on_complete: false,
            },
        }
    }

    /// Check ranges that the generator relies on.
    pub fn validate(&self) -> SketchResult<()> {
        if self.cap == 0 {
            return Err(SketchError::validation("variant cap must be > 0"));
        }
        if let BlockShape::Range { min, max } = self.shape
            && !(min.is_finite() && max.is_finite() && 0.0 < min && min < max)
        {
            return Err(SketchError::validation(format!(
                "block shape range must satisfy 0 < min < max, got [{min}, {max})"
            )));
        }
        if let Some(j) = self.jitter
            && !(j.is_finite() && j > 0.0)
        {
            return Err(SketchError::validation(format!(
                "jitter must be a positive finite multiplier, got {j}"
            )));
        }
        if self.arming == Arming::Exact(0) {
            return Err(SketchError::validation("exact arming needs at least one anchor"));
        }
        Ok(())
    }

    /// Maximum number of anchors a session accepts, if bounded.
    pub fn max_anchors(&self) -> Option<usize> {
        match self.arming {
            Arming::Exact(n) => Some(n),
            Arming::Manual | Arming::Immediate => None,
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl From<Preset> for Variant {
    fn from(p: Preset) -> Self {
        Self::preset(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sketch/variant.rs"]
mod tests;
