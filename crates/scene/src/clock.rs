use serde::Serialize;

/// Minimum time between two honoured animation toggles, in seconds.
pub const TOGGLE_DEBOUNCE_SECS: f32 = 0.2;

/// Whether orbital motion is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnimationState {
    pub active: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self { active: true }
    }
}

/// Per-frame timing.
///
/// `animation_clock` only advances while the animation is active and is the
/// single input every orbital transform is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameClock {
    current_time: f32,
    last_frame: f32,
    delta_time: f32,
    animation_clock: f32,
    time_since_last_toggle: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            last_frame: 0.0,
            delta_time: 0.0,
            animation_clock: 0.0,
            // Start past the debounce window so the first press is honoured.
            time_since_last_toggle: 1.0,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` (seconds since start) and return the frame delta.
    pub fn tick(&mut self, now: f32, animation: &AnimationState) -> f32 {
        self.current_time = now;
        self.delta_time = now - self.last_frame;
        self.last_frame = now;

        self.time_since_last_toggle += self.delta_time;
        if animation.active {
            self.animation_clock += self.delta_time;
        }
        self.delta_time
    }

    /// Flip `animation` unless a toggle happened within the debounce window.
    /// Returns whether the flag changed.
    pub fn try_toggle(&mut self, animation: &mut AnimationState) -> bool {
        if self.time_since_last_toggle > TOGGLE_DEBOUNCE_SECS {
            animation.active = !animation.active;
            self.time_since_last_toggle = 0.0;
            true
        } else {
            false
        }
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn animation_clock(&self) -> f32 {
        self.animation_clock
    }

    pub fn time_since_last_toggle(&self) -> f32 {
        self.time_since_last_toggle
    }
}
