//! Time management utilities

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_fresh_timer_is_zeroed() {
        let timer = Timer::new();
        assert_eq!(timer.frame_count(), 0);
        assert_eq!(timer.delta_time(), 0.0);
        assert_eq!(timer.average_fps(), 0.0);
    }

    #[test]
    fn test_update_accumulates() {
        let mut timer = Timer::new();
        sleep(Duration::from_millis(5));
        timer.update();
        assert_eq!(timer.frame_count(), 1);
        assert!(timer.delta_time() > 0.0);
        assert!(timer.total_time() >= timer.delta_time());

        let after_first = timer.total_time();
        sleep(Duration::from_millis(5));
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() > after_first);
        assert!(timer.average_fps() > 0.0);
    }
}
