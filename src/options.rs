// Tunables for the particle field, plus the device profile that picks
// between the pointer-following and stationary variants.

/// Everything about the field that differs between device classes or that
/// design wants to tweak in one place.
#[derive(Copy, Clone, Debug)]
pub struct FieldOptions {
    /// Hard cap on live particles; oldest are evicted first on overflow.
    pub max_particles: usize,
    pub base_size: f64,
    pub size_variance: f64,
    /// Multiplicative velocity decay applied every frame.
    pub friction: f64,
    /// Acceleration toward the pointer before distance falloff.
    pub attraction: f64,
    /// Chance that a single pointer-move event spawns a particle.
    pub spawn_chance: f64,
    /// Particles farther than this from the pointer are despawned.
    pub max_travel: f64,
    /// Per-frame life decrement (pointer-following variant only).
    pub fade_rate: f64,
    /// Fraction of the remaining distance the smoothed pointer covers
    /// each frame.
    pub smoothing: f64,
}

impl FieldOptions {
    pub fn desktop() -> FieldOptions {
        FieldOptions {
            max_particles: 120,
            base_size: 2.0,
            size_variance: 1.5,
            friction: 0.92,
            attraction: 0.6,
            spawn_chance: 0.4,
            max_travel: 260.0,
            fade_rate: 0.01,
            smoothing: 0.18,
        }
    }

    pub fn touch() -> FieldOptions {
        FieldOptions {
            max_particles: 40,
            base_size: 1.6,
            size_variance: 1.0,
            friction: 0.96,
            attraction: 0.25,
            spawn_chance: 0.0,
            max_travel: f64::INFINITY,
            fade_rate: 0.0,
            smoothing: 0.04,
        }
    }

    pub fn for_mode(mode: FieldMode) -> FieldOptions {
        match mode {
            FieldMode::PointerFollowing => FieldOptions::desktop(),
            FieldMode::Stationary => FieldOptions::touch(),
        }
    }
}

/// Device profile, decided once before the loop starts and never re-checked
/// inside the per-frame step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldMode {
    /// Desktop: particles chase the pointer and fade out.
    PointerFollowing,
    /// Touch or narrow viewport: a fixed population drifts around a
    /// center anchor and never expires.
    Stationary,
}

impl FieldMode {
    pub fn policy(self) -> StepPolicy {
        match self {
            FieldMode::PointerFollowing => StepPolicy {
                attraction_scale: 1.0,
                life_decays: true,
                clamp_to_bounds: false,
            },
            FieldMode::Stationary => StepPolicy {
                attraction_scale: 0.2,
                life_decays: false,
                clamp_to_bounds: true,
            },
        }
    }
}

/// The few knobs that actually differ between the two update variants.
/// Everything else in the per-frame step is shared.
#[derive(Copy, Clone, Debug)]
pub struct StepPolicy {
    pub attraction_scale: f64,
    pub life_decays: bool,
    pub clamp_to_bounds: bool,
}
