// Simple particle struct to keep track of individual position, velocity,
// rotation, size, and remaining life

use rand::Rng;

pub struct Particle {
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    /// Heading angle in radians, eased toward the pointer direction.
    pub rotation: f64,
    pub size: f64,
    /// Remaining life in [0, 1]; the particle is dropped at or below zero.
    pub life: f64,
}

impl Particle {
    pub fn new(pos_x: f64, pos_y: f64, size: f64) -> Particle {
        Particle {
            pos: [pos_x, pos_y],
            vel: [0.0, 0.0],
            rotation: 0.0,
            size,
            life: 1.0,
        }
    }

    /// A particle spawned near a pointer-move event, jittered so repeated
    /// events don't stack particles exactly on the cursor.
    pub fn at_pointer<R: Rng>(
        x: f64,
        y: f64,
        base_size: f64,
        size_variance: f64,
        rng: &mut R,
    ) -> Particle {
        const SPAWN_JITTER: f64 = 12.0;
        let offset_x = (rng.gen::<f64>() - 0.5) * 2.0 * SPAWN_JITTER;
        let offset_y = (rng.gen::<f64>() - 0.5) * 2.0 * SPAWN_JITTER;
        let size = base_size + rng.gen::<f64>() * size_variance;
        let mut p = Particle::new(x + offset_x, y + offset_y, size);
        p.rotation = rng.gen::<f64>() * std::f64::consts::PI * 2.0;
        p
    }
}
