// Pointer attraction target: keeps the raw event position and a smoothed
// position that trails it, so raw pointer jitter never reaches the particles

pub struct PointerTracker {
    /// Latest position reported by a pointer-move event.
    pub target: [f64; 2],
    /// Smoothed position the particles actually chase.
    pub current: [f64; 2],
    smoothing: f64,
}

impl PointerTracker {
    /// Starts anchored at the viewport center so the stationary variant has
    /// a drift target before any pointer event arrives.
    pub fn new(width: f64, height: f64, smoothing: f64) -> Self {
        let center = [width / 2.0, height / 2.0];
        PointerTracker {
            target: center,
            current: center,
            smoothing,
        }
    }

    pub fn retarget(&mut self, x: f64, y: f64) {
        self.target = [x, y];
    }

    /// Move the smoothed position a fixed fraction of the remaining distance
    /// toward the raw target. Plain lerp, not a spring.
    pub fn settle(&mut self) {
        self.current[0] += (self.target[0] - self.current[0]) * self.smoothing;
        self.current[1] += (self.target[1] - self.current[1]) * self.smoothing;
    }
}
