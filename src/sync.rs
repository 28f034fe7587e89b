use crate::engine::PlaybackEngine;

/// Keeps the position slider in step with the engine.
///
/// Driven by an external fixed-interval timer. Each [`tick`](Self::tick) is a
/// discrete poll: while the engine reports playing, its normalized position is
/// scaled to the slider range and stored; otherwise the value is left as is.
#[derive(Debug, Clone)]
pub struct PositionSync {
    running: bool,
    value: u32,
    max: u32,
}

impl PositionSync {
    pub fn new(max: u32) -> Self {
        PositionSync {
            running: false,
            value: 0,
            max,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last position written, in slider units.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Overrides the displayed value, e.g. after the user drags the slider.
    pub fn set_value(&mut self, value: u32) {
        self.value = value.min(self.max);
    }

    /// Upper bound of the slider range.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Polls the engine once. Returns the new slider value if it was updated.
    pub fn tick(&mut self, engine: &dyn PlaybackEngine) -> Option<u32> {
        if !self.running || !engine.is_playing() {
            return None;
        }

        let position = engine.position().clamp(0.0, 1.0);
        // truncation, not rounding
        self.value = (position * self.max as f64) as u32;
        Some(self.value)
    }

    /// Converts a slider value back to a normalized position.
    pub fn normalize(&self, value: u32) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        value.min(self.max) as f64 / self.max as f64
    }
}
