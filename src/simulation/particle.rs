//! Particle pool and random-walk motion update
//!
//! Every particle is a short line segment from its previous to its current
//! position. Each frame the pool is advanced once; the strategies then draw the
//! segments the update left behind.

use cgmath::Point2;
use rand::Rng;

/// Age after which a particle is respawned at a random point
pub const MAX_AGE: u32 = 100;

/// Side length of the square the initial population is scattered over
pub const INITIAL_EXTENT: f64 = 1000.0;

/// Drawable area in logical units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are strictly positive
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Convert to whole device pixels, `None` when the result is empty
    pub fn device_pixels(&self, scale_factor: f64) -> Option<(u32, u32)> {
        let width = (self.width * scale_factor).round();
        let height = (self.height * scale_factor).round();
        if width >= 1.0 && height >= 1.0 {
            Some((width as u32, height as u32))
        } else {
            None
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(INITIAL_EXTENT, INITIAL_EXTENT)
    }
}

/// A single animated line segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Start of the segment drawn this frame
    pub previous: Point2<f64>,
    /// End of the segment drawn this frame
    pub current: Point2<f64>,
    pub age: u32,
    pub palette_index: usize,
}

impl Particle {
    /// Place the particle at a uniformly random point inside `bounds` and reset its age
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: Bounds) {
        let point = Point2::new(
            rng.random::<f64>() * bounds.width,
            rng.random::<f64>() * bounds.height,
        );
        self.previous = point;
        self.current = point;
        self.age = 0;
    }

    /// Move one random-walk step, keeping the old position as the segment start
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.previous = self.current;
        self.current.x += (rng.random::<f64>() - 0.5) * 2.0;
        self.current.y += (rng.random::<f64>() - 0.5) * 2.0;
        self.age += 1;
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            previous: Point2::new(0.0, 0.0),
            current: Point2::new(0.0, 0.0),
            age: 0,
            palette_index: 0,
        }
    }
}

/// Fixed-size particle population shared by every render strategy
#[derive(Clone, Debug)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    max_age: u32,
}

impl ParticlePool {
    /// Scatter `count` particles over the initial extent with staggered ages
    ///
    /// Staggering keeps respawns spread out instead of having the whole
    /// population expire on the same frame.
    pub fn new<R: Rng + ?Sized>(count: usize, max_age: u32, rng: &mut R) -> Self {
        let bounds = Bounds::default();
        let particles = (0..count)
            .map(|_| {
                let mut particle = Particle::default();
                particle.respawn(rng, bounds);
                particle.age = rng.random_range(0..max_age.max(1));
                particle
            })
            .collect();

        Self { particles, max_age }
    }

    /// Build a pool from explicit particles
    pub fn from_particles(particles: Vec<Particle>, max_age: u32) -> Self {
        Self { particles, max_age }
    }

    /// Advance every particle by one frame
    ///
    /// Expired particles respawn inside `bounds` with age 0 and a zero-length
    /// segment; all others take one random-walk step. Palette slots are handed
    /// out round-robin by processing order, not by any particle property.
    pub fn advance<R: Rng + ?Sized>(&mut self, bounds: Bounds, palette_size: usize, rng: &mut R) {
        let palette_size = palette_size.max(1);
        for (counter, particle) in self.particles.iter_mut().enumerate() {
            if particle.age > self.max_age {
                particle.respawn(rng, bounds);
            } else {
                particle.step(rng);
            }
            particle.palette_index = counter % palette_size;
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle_at(x: f64, y: f64, age: u32) -> Particle {
        Particle {
            previous: Point2::new(x, y),
            current: Point2::new(x, y),
            age,
            palette_index: 0,
        }
    }

    #[test]
    fn test_age_increments_or_resets() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = ParticlePool::new(500, MAX_AGE, &mut rng);
        let bounds = Bounds::new(640.0, 480.0);

        for _ in 0..250 {
            let before: Vec<u32> = pool.particles().iter().map(|p| p.age).collect();
            pool.advance(bounds, 8, &mut rng);
            for (old_age, particle) in before.iter().zip(pool.particles()) {
                if *old_age > MAX_AGE {
                    assert_eq!(particle.age, 0);
                } else {
                    assert_eq!(particle.age, old_age + 1);
                }
            }
        }
    }

    #[test]
    fn test_respawn_stays_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = Bounds::new(320.0, 200.0);
        let particles = (0..1000).map(|_| particle_at(5000.0, -5000.0, MAX_AGE + 1)).collect();
        let mut pool = ParticlePool::from_particles(particles, MAX_AGE);

        pool.advance(bounds, 8, &mut rng);

        for particle in pool.particles() {
            assert_eq!(particle.age, 0);
            assert!(particle.current.x >= 0.0 && particle.current.x < bounds.width);
            assert!(particle.current.y >= 0.0 && particle.current.y < bounds.height);
            assert_eq!(particle.previous, particle.current);
        }
    }

    #[test]
    fn test_step_is_bounded_random_walk() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = ParticlePool::from_particles(vec![particle_at(50.0, 50.0, 0); 200], MAX_AGE);

        pool.advance(Bounds::default(), 8, &mut rng);

        for particle in pool.particles() {
            assert_eq!(particle.previous, Point2::new(50.0, 50.0));
            assert!((particle.current.x - 50.0).abs() <= 1.0);
            assert!((particle.current.y - 50.0).abs() <= 1.0);
        }
    }

    #[test]
    fn test_palette_slots_are_round_robin() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = ParticlePool::new(20, MAX_AGE, &mut rng);
        pool.advance(Bounds::default(), 8, &mut rng);

        let slots: Vec<usize> = pool.particles().iter().map(|p| p.palette_index).collect();
        let expected: Vec<usize> = (0..20).map(|i| i % 8).collect();
        assert_eq!(slots, expected);
    }

    #[test]
    fn test_initial_population_is_staggered() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = ParticlePool::new(2000, MAX_AGE, &mut rng);

        assert_eq!(pool.len(), 2000);
        assert!(pool.particles().iter().all(|p| p.age < MAX_AGE));
        let distinct: std::collections::HashSet<u32> = pool.particles().iter().map(|p| p.age).collect();
        assert!(distinct.len() > 50);
    }

    /// Replays a fixed list of unit-interval draws
    ///
    /// Every value is a multiple of 1/8, so the f64 conversion is exact.
    struct ScriptedRng {
        draws: std::vec::IntoIter<f64>,
    }

    impl ScriptedRng {
        fn new(draws: &[f64]) -> Self {
            Self {
                draws: draws.to_vec().into_iter(),
            }
        }
    }

    impl rand::RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            let unit = self.draws.next().expect("script exhausted");
            ((unit * (1u64 << 53) as f64) as u64) << 11
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    fn golden_pool() -> ParticlePool {
        ParticlePool::from_particles(
            vec![
                particle_at(10.0, 20.0, 0),
                particle_at(100.0, 200.0, 42),
                particle_at(400.0, 300.0, MAX_AGE + 1),
                particle_at(799.5, 599.5, MAX_AGE),
            ],
            MAX_AGE,
        )
    }

    #[test]
    fn test_four_particle_golden_update() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut pool = golden_pool();
        // Two draws per particle in index order: step, step, respawn, step
        let mut rng = ScriptedRng::new(&[0.75, 0.25, 0.5, 0.875, 0.125, 0.5, 0.0, 0.625]);

        pool.advance(bounds, 8, &mut rng);

        let result = pool.particles();
        assert_eq!(result[0].previous, Point2::new(10.0, 20.0));
        assert_eq!(result[0].current, Point2::new(10.5, 19.5));
        assert_eq!(result[0].age, 1);

        assert_eq!(result[1].previous, Point2::new(100.0, 200.0));
        assert_eq!(result[1].current, Point2::new(100.0, 200.75));
        assert_eq!(result[1].age, 43);

        assert_eq!(result[2].previous, Point2::new(100.0, 300.0));
        assert_eq!(result[2].current, Point2::new(100.0, 300.0));
        assert_eq!(result[2].age, 0);

        assert_eq!(result[3].previous, Point2::new(799.5, 599.5));
        assert_eq!(result[3].current, Point2::new(798.5, 599.75));
        assert_eq!(result[3].age, MAX_AGE + 1);

        let slots: Vec<usize> = result.iter().map(|p| p.palette_index).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        assert!(rng.draws.next().is_none());
    }

    #[test]
    fn test_same_seed_gives_same_update() {
        let bounds = Bounds::new(800.0, 600.0);
        let run = |seed: u64| {
            let mut pool = golden_pool();
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..3 {
                pool.advance(bounds, 8, &mut rng);
            }
            pool.particles().to_vec()
        };

        assert_eq!(run(0x5eed), run(0x5eed));
        assert_ne!(run(0x5eed), run(0x5eee));
    }
}
