//! Lap counting, lap times, and per-lap money
//!
//! The track is split into four quadrant sections around the section
//! boundary; the lap counter only moves on the section 4 to section 1
//! crossing (the start line), forward or backward. Cutting across the
//! infield still has to pass through the sections in order, so it cannot
//! skip a lap.

use kart_engine::foundation::math::Vec3;

/// What the lap tracker saw this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapEvent {
    /// No start-line crossing
    None,
    /// Crossed the start line forward into a new lap
    Advanced,
    /// Backed over the start line into the previous lap
    Reversed,
}

/// Tracks the player's lap, lap times, and money earned per lap
#[derive(Debug, Clone)]
pub struct LapTracker {
    /// Quadrant boundary along x; z splits at 0
    boundary_x: f32,
    total_laps: u32,

    section: u8,
    current_lap: i32,
    lap_start: f32,
    lap_times: Vec<f32>,
    lap_money: Vec<u32>,
}

impl LapTracker {
    /// Start before the line (section 4, lap 0)
    pub fn new(boundary_x: f32, total_laps: u32) -> Self {
        Self {
            boundary_x,
            total_laps,
            section: 4,
            current_lap: 0,
            lap_start: 0.0,
            lap_times: vec![0.0; total_laps as usize],
            lap_money: vec![0; total_laps as usize],
        }
    }

    fn section_of(&self, position: Vec3) -> u8 {
        if position.x < self.boundary_x {
            if position.z > 0.0 {
                1
            } else {
                4
            }
        } else if position.z > 0.0 {
            2
        } else {
            3
        }
    }

    /// Update the section from the player position and handle start-line
    /// crossings. `race_time` is seconds since the race began.
    pub fn update(&mut self, position: Vec3, race_time: f32) -> LapEvent {
        let section = self.section_of(position);
        let mut event = LapEvent::None;

        if section == 1 && self.section == 4 {
            self.current_lap += 1;
            self.lap_start = race_time;
            event = LapEvent::Advanced;
        } else if section == 4 && self.section == 1 {
            self.current_lap -= 1;
            // Resume the previous lap's clock where it left off; laps past
            // the end of the race have no clock to resume
            if self.current_lap > 0 && self.current_lap <= self.total_laps as i32 {
                self.lap_start = race_time - self.lap_times[self.current_lap as usize - 1];
            }
            event = LapEvent::Reversed;
        }
        self.section = section;

        if self.current_lap > 0 && self.current_lap <= self.total_laps as i32 {
            self.lap_times[self.current_lap as usize - 1] = race_time - self.lap_start;
        }

        event
    }

    /// Credit coin money to the lap being driven; coins grabbed before the
    /// first or after the last lap are worth nothing
    pub fn award(&mut self, coins: u32, coin_value: u32) {
        if self.current_lap > 0 && self.current_lap <= self.total_laps as i32 {
            self.lap_money[self.current_lap as usize - 1] += coins * coin_value;
        }
    }

    /// Lap being driven; 0 before the start line
    pub fn current_lap(&self) -> i32 {
        self.current_lap
    }

    /// Current track section (1 through 4)
    pub fn section(&self) -> u8 {
        self.section
    }

    /// Whether every lap is complete
    pub fn finished(&self) -> bool {
        self.current_lap > self.total_laps as i32
    }

    /// Per-lap times in seconds (still counting for the lap being driven)
    pub fn lap_times(&self) -> &[f32] {
        &self.lap_times
    }

    /// Per-lap money
    pub fn lap_money(&self) -> &[u32] {
        &self.lap_money
    }

    /// Money across all laps
    pub fn total_money(&self) -> u32 {
        self.lap_money.iter().sum()
    }
}
