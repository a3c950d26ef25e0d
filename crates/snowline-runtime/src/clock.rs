//! Frame clock with fixed-timestep accumulator

/// Longest frame the clock will account for, in seconds
const MAX_FRAME_TIME: f64 = 0.25;

/// Turns variable frame deltas into fixed locomotion steps
#[derive(Debug, Clone)]
pub struct GameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Clamped duration of the last frame in seconds
    pub delta_time: f64,
    /// Fixed step interval (default: 1/60 second)
    pub fixed_timestep: f64,
    accumulator: f64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: 1.0 / 60.0,
            accumulator: 0.0,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_timestep(hz: f64) -> Self {
        Self {
            fixed_timestep: 1.0 / hz,
            ..Self::default()
        }
    }

    /// Add an externally measured frame delta
    pub fn advance(&mut self, dt: f64) {
        self.delta_time = dt.clamp(0.0, MAX_FRAME_TIME);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
    }

    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.fixed_timestep
    }

    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.fixed_timestep;
    }

    /// Drain every whole fixed step, returning how many there were
    pub fn take_fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.should_fixed_update() {
            self.consume_fixed_step();
            steps += 1;
        }
        steps
    }
}
