// The particle field simulator: owns the live particle collection and runs
// the per-frame update against the smoothed pointer position. One instance
// per canvas overlay; nothing here is shared or global.

use std::collections::VecDeque;

use rand::Rng;
use vecmath::{self, Vector2};

use crate::options::{FieldMode, FieldOptions, StepPolicy};
use crate::particle::Particle;

/// Fraction of the angular distance to the pointer covered per frame.
const ROTATION_EASE: f64 = 0.25;
/// Distance falloff constant in `attraction / (dist * FALLOFF + 1)`.
const FALLOFF: f64 = 0.02;
/// Applied to every particle's life when the pointer leaves the viewport.
const LEAVE_DAMPING: f64 = 0.7;

/// Rotate `current` a fixed fraction toward `target`, always taking the
/// short way around the circle (delta wrapped into (-pi, pi]).
pub fn approach_angle(current: f64, target: f64, fraction: f64) -> f64 {
    use std::f64::consts::PI;
    let mut delta = target - current;
    while delta > PI {
        delta -= 2.0 * PI;
    }
    while delta < -PI {
        delta += 2.0 * PI;
    }
    current + delta * fraction
}

pub struct ParticleField {
    particles: VecDeque<Particle>,
    bounds: [f64; 2],
    options: FieldOptions,
    policy: StepPolicy,
}

impl ParticleField {
    pub fn new(width: f64, height: f64, mode: FieldMode, options: FieldOptions) -> ParticleField {
        ParticleField {
            particles: VecDeque::with_capacity(options.max_particles),
            bounds: [width, height],
            options,
            policy: mode.policy(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Add a particle, evicting from the front (oldest first) if the field
    /// is already at capacity.
    pub fn spawn(&mut self, particle: Particle) {
        while self.particles.len() >= self.options.max_particles {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Spawn one jittered particle near the given point.
    pub fn spawn_near<R: Rng>(&mut self, x: f64, y: f64, rng: &mut R) {
        let p = Particle::at_pointer(
            x,
            y,
            self.options.base_size,
            self.options.size_variance,
            rng,
        );
        self.spawn(p);
    }

    /// Pointer-move spawn path, gated on the configured spawn chance.
    pub fn pointer_moved_spawn<R: Rng>(&mut self, x: f64, y: f64, rng: &mut R) -> bool {
        if rng.gen::<f64>() < self.options.spawn_chance {
            self.spawn_near(x, y, rng);
            true
        } else {
            false
        }
    }

    /// Initial burst population spread over the bounds, used by the
    /// stationary variant. Particles get a small random drift so the field
    /// isn't frozen before the attraction anchor takes hold.
    pub fn seed<R: Rng>(&mut self, rng: &mut R) {
        for _ in 0..self.options.max_particles {
            let x = rng.gen::<f64>() * self.bounds[0];
            let y = rng.gen::<f64>() * self.bounds[1];
            let size = self.options.base_size + rng.gen::<f64>() * self.options.size_variance;
            let mut p = Particle::new(x, y, size);
            p.vel = [
                (rng.gen::<f64>() - 0.5) * 0.6,
                (rng.gen::<f64>() - 0.5) * 0.6,
            ];
            p.rotation = rng.gen::<f64>() * std::f64::consts::PI * 2.0;
            self.spawn(p);
        }
    }

    /// One simulation frame against the smoothed pointer position.
    pub fn step(&mut self, pointer: [f64; 2]) {
        let options = self.options;
        let policy = self.policy;
        let bounds = self.bounds;

        for p in &mut self.particles {
            let to_pointer: Vector2<f64> = vecmath::vec2_sub(pointer, p.pos);
            let distance = vecmath::vec2_len(to_pointer);

            if distance > 0.0 {
                let heading = to_pointer[1].atan2(to_pointer[0]);
                p.rotation = approach_angle(p.rotation, heading, ROTATION_EASE);

                // Closer particles feel a relatively stronger pull.
                let pull = options.attraction * policy.attraction_scale
                    / (distance * FALLOFF + 1.0);
                let accel = vecmath::vec2_scale(vecmath::vec2_normalized(to_pointer), pull);
                p.vel = vecmath::vec2_add(p.vel, accel);
            }

            p.pos = vecmath::vec2_add(p.pos, p.vel);
            p.vel = vecmath::vec2_scale(p.vel, options.friction);

            if policy.life_decays {
                p.life -= options.fade_rate;
            }
            if policy.clamp_to_bounds {
                p.pos[0] = p.pos[0].max(0.0).min(bounds[0]);
                p.pos[1] = p.pos[1].max(0.0).min(bounds[1]);
            }
        }

        let max_travel = options.max_travel;
        self.particles.retain(|p| {
            let distance = vecmath::vec2_len(vecmath::vec2_sub(pointer, p.pos));
            p.life > 0.0 && distance <= max_travel
        });
    }

    /// Pointer-leave handler: accelerate the fade of every live particle so
    /// the field clears quickly. Applies the damping exactly once per call.
    /// Stationary particles keep their life fixed at 1.0, so the policy
    /// that disables decay also disables this.
    pub fn fade_out(&mut self) {
        if !self.policy.life_decays {
            return;
        }
        for p in &mut self.particles {
            p.life *= LEAVE_DAMPING;
        }
    }

    /// The viewport was resized; only the bounds metadata changes. Existing
    /// particles keep their absolute coordinates and fall to the normal
    /// despawn or clamp rules.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = [width, height];
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn desktop_field() -> ParticleField {
        ParticleField::new(
            800.0,
            600.0,
            FieldMode::PointerFollowing,
            FieldOptions::desktop(),
        )
    }

    #[test]
    fn population_never_exceeds_max() {
        let mut field = desktop_field();
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..500 {
            field.spawn_near(i as f64 * 100.0, 0.0, &mut rng);
        }
        assert_eq!(field.len(), 120);
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut field = desktop_field();
        for i in 0..500 {
            field.spawn(Particle::new(i as f64, 0.0, 2.0));
        }
        // 500 spawned, 120 kept: the survivors are exactly spawns 380..500.
        let first = field.iter().next().unwrap();
        assert_eq!(first.pos[0], 380.0);
        let last = field.iter().last().unwrap();
        assert_eq!(last.pos[0], 499.0);
    }

    #[test]
    fn life_decreases_by_fade_rate_each_frame() {
        let mut field = desktop_field();
        field.spawn(Particle::new(100.0, 100.0, 2.0));
        // Pointer sits on the particle, so it never travels out of range.
        field.step([100.0, 100.0]);
        let life = field.iter().next().unwrap().life;
        assert!((life - 0.99).abs() < 1e-12);
        field.step([100.0, 100.0]);
        let life = field.iter().next().unwrap().life;
        assert!((life - 0.98).abs() < 1e-12);
    }

    #[test]
    fn stationary_life_never_decays() {
        let mut field = ParticleField::new(
            800.0,
            600.0,
            FieldMode::Stationary,
            FieldOptions::touch(),
        );
        field.spawn(Particle::new(100.0, 100.0, 2.0));
        for _ in 0..200 {
            field.step([400.0, 300.0]);
        }
        assert_eq!(field.len(), 1);
        assert_eq!(field.iter().next().unwrap().life, 1.0);
    }

    #[test]
    fn particle_past_max_travel_is_removed() {
        let mut field = desktop_field();
        field.spawn(Particle::new(1000.0, 0.0, 2.0));
        // 1000px from the pointer, well past the 260px travel limit.
        field.step([0.0, 0.0]);
        assert_eq!(field.len(), 0);
    }

    #[test]
    fn stationary_clamps_to_bounds_instead_of_despawning() {
        let mut field = ParticleField::new(
            800.0,
            600.0,
            FieldMode::Stationary,
            FieldOptions::touch(),
        );
        field.spawn(Particle::new(900.0, -50.0, 2.0));
        field.step([400.0, 300.0]);
        assert_eq!(field.len(), 1);
        let p = field.iter().next().unwrap();
        assert!(p.pos[0] <= 800.0);
        assert!(p.pos[1] >= 0.0);
    }

    #[test]
    fn approach_angle_wraps_the_short_way() {
        let deg = std::f64::consts::PI / 180.0;
        // 170deg -> -170deg should pass through +-180, not back through 0.
        let next = approach_angle(170.0 * deg, -170.0 * deg, 0.5);
        assert!((next - 180.0 * deg).abs() < 1e-9);
        // And the mirror case.
        let next = approach_angle(-170.0 * deg, 170.0 * deg, 0.5);
        assert!((next + 180.0 * deg).abs() < 1e-9);
    }

    #[test]
    fn approach_angle_plain_case_is_a_lerp() {
        let next = approach_angle(0.0, 1.0, 0.25);
        assert!((next - 0.25).abs() < 1e-12);
    }

    #[test]
    fn fade_out_damps_each_life_exactly_once() {
        let mut field = desktop_field();
        for i in 0..4 {
            let mut p = Particle::new(i as f64, 0.0, 2.0);
            p.life = 0.1 + i as f64 * 0.2;
            field.spawn(p);
        }
        let before: Vec<f64> = field.iter().map(|p| p.life).collect();
        field.fade_out();
        let after: Vec<f64> = field.iter().map(|p| p.life).collect();
        for (b, a) in before.iter().zip(after.iter()) {
            assert!((a - b * 0.7).abs() < 1e-12);
        }
    }

    #[test]
    fn fade_out_leaves_stationary_life_at_full() {
        let mut field = ParticleField::new(
            800.0,
            600.0,
            FieldMode::Stationary,
            FieldOptions::touch(),
        );
        field.spawn(Particle::new(100.0, 100.0, 2.0));
        field.fade_out();
        field.fade_out();
        assert_eq!(field.iter().next().unwrap().life, 1.0);
    }

    #[test]
    fn resize_leaves_particle_state_untouched() {
        let mut field = desktop_field();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            field.spawn_near(200.0, 200.0, &mut rng);
        }
        let before: Vec<([f64; 2], [f64; 2], f64, f64)> = field
            .iter()
            .map(|p| (p.pos, p.vel, p.life, p.rotation))
            .collect();
        field.resize(1920.0, 1080.0);
        let after: Vec<([f64; 2], [f64; 2], f64, f64)> = field
            .iter()
            .map(|p| (p.pos, p.vel, p.life, p.rotation))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn spawn_chance_gates_pointer_spawns() {
        let mut options = FieldOptions::desktop();
        options.spawn_chance = 0.0;
        let mut field =
            ParticleField::new(800.0, 600.0, FieldMode::PointerFollowing, options);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!field.pointer_moved_spawn(10.0, 10.0, &mut rng));
        }
        assert_eq!(field.len(), 0);
    }

    #[test]
    fn seed_fills_to_capacity() {
        let mut field = ParticleField::new(
            800.0,
            600.0,
            FieldMode::Stationary,
            FieldOptions::touch(),
        );
        let mut rng = StdRng::seed_from_u64(3);
        field.seed(&mut rng);
        assert_eq!(field.len(), 40);
        for p in field.iter() {
            assert!(p.pos[0] >= 0.0 && p.pos[0] <= 800.0);
            assert!(p.pos[1] >= 0.0 && p.pos[1] <= 600.0);
        }
    }
}
