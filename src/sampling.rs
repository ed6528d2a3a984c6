use ::rand::Rng;
use macroquad::prelude::*;

/// Uniform point inside a disk of the given radius, centred on the origin.
///
/// The radius is drawn as `radius * sqrt(u)` so that samples have uniform
/// areal density instead of clustering near the centre.
pub fn point_in_disk(rng: &mut impl Rng, radius: f32) -> Vec2 {
    let radius = radius.max(0.0);
    let r = radius * rng.gen::<f32>().sqrt();
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    Vec2::from_angle(theta) * r
}

/// Initial particle velocity: any direction, speed bounded by `max_speed`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomVelocity {
    pub max_speed: f32,
}

impl RandomVelocity {
    pub fn new(max_speed: f32) -> Self {
        Self { max_speed }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Vec2 {
        point_in_disk(rng, self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SAMPLES: usize = 20_000;

    #[test]
    fn velocities_never_exceed_max_speed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let sampler = RandomVelocity::new(3.0);
        for _ in 0..SAMPLES {
            assert!(sampler.sample(&mut rng).length() <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn mean_radius_matches_uniform_disk() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let sampler = RandomVelocity::new(2.0);
        let mut sum_r = 0.0f64;
        let mut sum = Vec2::ZERO;
        for _ in 0..SAMPLES {
            let v = sampler.sample(&mut rng);
            sum_r += v.length() as f64;
            sum += v;
        }
        let mean_r = sum_r / SAMPLES as f64;
        // E[r] = 2/3 * R for a uniform disk, 1/2 * R for uniform-in-radius.
        assert!((mean_r - 2.0 * 2.0 / 3.0).abs() < 0.03, "mean r = {mean_r}");

        let mean = sum / SAMPLES as f32;
        assert!(mean.length() < 0.05, "mean = {mean:?}");
    }

    #[test]
    fn inner_half_radius_holds_a_quarter_of_samples() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let inside = (0..SAMPLES)
            .filter(|_| point_in_disk(&mut rng, 1.0).length() < 0.5)
            .count();
        let fraction = inside as f32 / SAMPLES as f32;
        assert!((fraction - 0.25).abs() < 0.02, "fraction = {fraction}");
    }

    #[test]
    fn zero_or_negative_speed_yields_rest() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(RandomVelocity::new(0.0).sample(&mut rng), Vec2::ZERO);
        assert_eq!(RandomVelocity::new(-4.0).sample(&mut rng), Vec2::ZERO);
    }
}
