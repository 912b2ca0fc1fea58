use crate::foundation::core::Rgb8;
use crate::foundation::error::{SketchError, SketchResult};

/// Current visual parameters.
///
/// Changes only affect clusters generated afterwards; generated blocks never change. `color` is
/// applied at render time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    /// Pixel size of one grid cell.
    pub block_size: u32,
    /// Probability in `[0, 1]` that a candidate cell becomes a block.
    pub density: f64,
    /// Fill color for every block.
    pub color: Rgb8,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            block_size: 40,
            density: 0.6,
            color: Rgb8::new(0xc8, 0x96, 0xff),
        }
    }
}

impl Params {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> SketchResult<()> {
        check_block_size(self.block_size)?;
        check_density(self.density)?;
        Ok(())
    }

    /// Set the grid cell size. Zero is rejected.
    pub fn set_block_size(&mut self, block_size: u32) -> SketchResult<()> {
        check_block_size(block_size)?;
        self.block_size = block_size;
        Ok(())
    }

    /// Set the admission probability. Values outside `[0, 1]` (and NaN) are rejected.
    pub fn set_density(&mut self, density: f64) -> SketchResult<()> {
        check_density(density)?;
        self.density = density;
        Ok(())
    }

    /// Set the fill color.
    pub fn set_color(&mut self, color: Rgb8) {
        self.color = color;
    }

    /// Radius of the candidate disc around an anchor: `5 * block_size`.
    pub fn extent(&self) -> f64 {
        f64::from(self.block_size) * 5.0
    }
}

fn check_block_size(block_size: u32) -> SketchResult<()> {
    if block_size == 0 {
        return Err(SketchError::invalid_parameter("block_size must be > 0"));
    }
    Ok(())
}

fn check_density(density: f64) -> SketchResult<()> {
    if !(0.0..=1.0).contains(&density) {
        return Err(SketchError::invalid_parameter(format!(
            "density must be within [0, 1], got {density}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/sketch/params.rs"]
mod tests;
