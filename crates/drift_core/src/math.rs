//! Math and randomness utilities
//!
//! Re-exports glam with the sampling helpers the spawner uses

pub use glam::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulation random number generator.
///
/// Seeded runs are reproducible; unseeded runs draw from OS entropy.
pub fn sim_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform sample in `[-half, half]`.
pub fn symmetric<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * half
}

/// Uniform point inside the axis-aligned cube of the given half-extent,
/// centered on the origin.
pub fn point_in_cube<R: Rng + ?Sized>(rng: &mut R, half_extent: f32) -> Vec3 {
    Vec3::new(
        symmetric(rng, half_extent),
        symmetric(rng, half_extent),
        symmetric(rng, half_extent),
    )
}

/// Rescale `v` so its length does not exceed `max`.
///
/// Zero and non-finite `max` leave `v` untouched.
pub fn clamp_length(v: Vec3, max: f32) -> Vec3 {
    let len = v.length();
    if max.is_finite() && max > 0.0 && len > max {
        v * (max / len)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_samples_stay_inside() {
        let mut rng = sim_rng(Some(7));
        for _ in 0..1000 {
            let p = point_in_cube(&mut rng, 25.0);
            assert!(p.abs().max_element() <= 25.0);
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a: Vec<f32> = {
            let mut rng = sim_rng(Some(42));
            (0..8).map(|_| symmetric(&mut rng, 1.0)).collect()
        };
        let b: Vec<f32> = {
            let mut rng = sim_rng(Some(42));
            (0..8).map(|_| symmetric(&mut rng, 1.0)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn clamp_length_keeps_direction() {
        let v = Vec3::new(30.0, 40.0, 0.0);
        let clamped = clamp_length(v, 20.0);
        assert!((clamped.length() - 20.0).abs() < 1e-4);
        assert!(clamped.normalize().abs_diff_eq(v.normalize(), 1e-6));
        assert_eq!(clamp_length(Vec3::ONE, 20.0), Vec3::ONE);
    }
}
