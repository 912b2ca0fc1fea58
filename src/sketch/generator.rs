//! Procedural block sampling around an anchor.
//!
//! Candidates lie on a `(2 * GRID_HALF_SPAN + 1)^2` grid of block-size steps centered on the
//! anchor. A candidate is admitted when it lies strictly inside the disc of radius
//! `GRID_HALF_SPAN * block_size` and a uniform draw falls below the density. The scan runs in
//! raster order (x outer, y inner) and stops at the variant cap, so a capped cluster is
//! truncated on the far side of the scan rather than at its rim.

use rand::Rng;

use crate::foundation::core::Vec2;
use crate::sketch::cluster::{Block, Cluster};
use crate::sketch::params::Params;
use crate::sketch::variant::{BlockShape, Variant};

/// Grid cells on each side of the anchor.
pub const GRID_HALF_SPAN: i32 = 5;

/// Populate `cluster` once. Returns the number of blocks it holds.
///
/// Generated clusters are left untouched, whatever the current parameters are.
#[tracing::instrument(level = "debug", skip_all, fields(anchor = ?cluster.anchor()))]
pub fn generate<R: Rng + ?Sized>(
    cluster: &mut Cluster,
    params: &Params,
    variant: &Variant,
    rng: &mut R,
) -> usize {
    if cluster.is_generated() {
        return cluster.blocks().len();
    }
    let blocks = sample_blocks(params, variant, rng);
    let n = blocks.len();
    cluster.populate(blocks, params.extent(), variant.direction);
    tracing::debug!(blocks = n, extent = params.extent(), "generated cluster");
    n
}

/// Sample the blocks of one cluster, relative to its anchor.
pub fn sample_blocks<R: Rng + ?Sized>(params: &Params, variant: &Variant, rng: &mut R) -> Vec<Block> {
    let size = f64::from(params.block_size);
    let extent = params.extent();
    let mut blocks = Vec::with_capacity(variant.cap.min(grid_cells()));

    for i in -GRID_HALF_SPAN..=GRID_HALF_SPAN {
        for j in -GRID_HALF_SPAN..=GRID_HALF_SPAN {
            if blocks.len() >= variant.cap {
                return blocks;
            }

            let offset = Vec2::new(f64::from(i) * size, f64::from(j) * size);
            let d = offset.length_squared().sqrt();
            if d >= extent || rng.r#gen::<f64>() >= params.density {
                continue;
            }

            let (width, height) = match variant.shape {
                BlockShape::Range { min, max } => {
                    (rng.gen_range(min..max) * size, rng.gen_range(min..max) * size)
                }
                BlockShape::Square => (size, size),
            };
            let position = match variant.jitter {
                Some(jitter) => {
                    let amp = jitter * size;
                    offset + Vec2::new(rng.gen_range(-amp..amp), rng.gen_range(-amp..amp))
                }
                None => offset,
            };

            blocks.push(Block {
                position,
                width,
                height,
                distance_from_center: d,
            });
        }
    }
    blocks
}

fn grid_cells() -> usize {
    let side = (2 * GRID_HALF_SPAN + 1) as usize;
    side * side
}

#[cfg(test)]
#[path = "../../tests/unit/sketch/generator.rs"]
mod tests;
