use super::*;
use crate::foundation::core::Point;
use crate::sketch::variant::{Direction, Preset};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn params(block_size: u32, density: f64) -> Params {
    Params {
        block_size,
        density,
        ..Params::default()
    }
}

fn in_disc_cells() -> usize {
    let mut n = 0;
    for i in -GRID_HALF_SPAN..=GRID_HALF_SPAN {
        for j in -GRID_HALF_SPAN..=GRID_HALF_SPAN {
            if i * i + j * j < GRID_HALF_SPAN * GRID_HALF_SPAN {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn full_density_admits_every_cell_inside_the_disc() {
    assert_eq!(in_disc_cells(), 69);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let blocks = sample_blocks(&params(80, 1.0), &Variant::preset(Preset::Bloom), &mut rng);
    assert_eq!(blocks.len(), 69);
    for b in &blocks {
        assert!(b.distance_from_center < 400.0);
    }
    // (±3, ±4) and (±4, ±3) sit exactly on the rim and are excluded.
    assert!(blocks.iter().all(|b| b.distance_from_center != 400.0));
}

#[test]
fn zero_density_admits_nothing() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let blocks = sample_blocks(&params(40, 0.0), &Variant::preset(Preset::Scatter), &mut rng);
    assert!(blocks.is_empty());
}

#[test]
fn cap_truncates_in_raster_order() {
    let variant = Variant {
        cap: 10,
        ..Variant::preset(Preset::Bloom)
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let blocks = sample_blocks(&params(10, 1.0), &variant, &mut rng);
    assert_eq!(blocks.len(), 10);
    // Column x = -4 holds 5 cells, then the scan stops halfway down column x = -3.
    assert!(blocks.iter().all(|b| b.position.x < 0.0));
    assert_eq!(blocks.iter().filter(|b| b.position.x == -40.0).count(), 5);
    assert_eq!(blocks.iter().filter(|b| b.position.x == -30.0).count(), 5);
}

#[test]
fn distance_ignores_jitter() {
    let variant = Variant::preset(Preset::Scatter);
    let size = 20.0;
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let blocks = sample_blocks(&params(20, 1.0), &variant, &mut rng);
    assert_eq!(blocks.len(), 69);

    let mut any_jittered = false;
    for b in &blocks {
        let gx = (b.position.x / size).round() * size;
        let gy = (b.position.y / size).round() * size;
        assert!((b.position.x - gx).abs() <= 0.3 * size);
        assert!((b.position.y - gy).abs() <= 0.3 * size);
        let grid_distance = (gx * gx + gy * gy).sqrt();
        assert_eq!(b.distance_from_center, grid_distance);
        let jittered_distance = b.position.length();
        any_jittered |= jittered_distance != b.distance_from_center;
    }
    assert!(any_jittered);
}

#[test]
fn sizes_follow_the_variant_shape() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let blocks = sample_blocks(&params(50, 1.0), &Variant::preset(Preset::Scatter), &mut rng);
    for b in &blocks {
        assert!(b.width >= 0.3 * 50.0 && b.width < 1.8 * 50.0);
        assert!(b.height >= 0.3 * 50.0 && b.height < 1.8 * 50.0);
    }
    assert!(blocks.iter().any(|b| b.width != b.height));

    let blocks = sample_blocks(&params(50, 1.0), &Variant::preset(Preset::Mosaic), &mut rng);
    assert!(blocks.iter().all(|b| b.width == 50.0 && b.height == 50.0));
}

#[test]
fn seeded_generation_is_reproducible() {
    let p = params(30, 0.5);
    let v = Variant::preset(Preset::Triad);
    let a = sample_blocks(&p, &v, &mut ChaCha8Rng::seed_from_u64(42));
    let b = sample_blocks(&p, &v, &mut ChaCha8Rng::seed_from_u64(42));
    let c = sample_blocks(&p, &v, &mut ChaCha8Rng::seed_from_u64(43));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn generate_runs_once_per_cluster() {
    let v = Variant::preset(Preset::Bloom);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut cluster = Cluster::new(Point::new(200.0, 200.0));

    let n = generate(&mut cluster, &params(40, 1.0), &v, &mut rng);
    assert_eq!(n, 69);
    let before = cluster.blocks().to_vec();
    assert_eq!(cluster.extent(), Some(200.0));

    let n = generate(&mut cluster, &params(10, 0.1), &v, &mut rng);
    assert_eq!(n, 69);
    assert_eq!(cluster.blocks(), before.as_slice());
    assert_eq!(cluster.extent(), Some(200.0));
}

#[test]
fn shrink_generation_starts_at_the_extent() {
    let v = Variant::preset(Preset::Erode);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut cluster = Cluster::new(Point::ORIGIN);
    generate(&mut cluster, &params(40, 0.5), &v, &mut rng);
    assert_eq!(v.direction, Direction::Shrink);
    assert_eq!(cluster.current_radius(), 200.0);
}
