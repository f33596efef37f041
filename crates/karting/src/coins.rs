//! Coins scattered around the track
//!
//! Pickup is a circle test in the ground plane only, so a coin is collected
//! by driving over it regardless of the kart's height at that moment.

use kart_engine::foundation::math::Vec3;

/// The set of coins on the track and which of them are collected
#[derive(Debug, Clone)]
pub struct CoinField {
    positions: Vec<Vec3>,
    collected: Vec<bool>,
}

impl CoinField {
    /// Place coins at the given positions, all uncollected
    pub fn new(positions: Vec<Vec3>) -> Self {
        let collected = vec![false; positions.len()];
        Self {
            positions,
            collected,
        }
    }

    /// Coin positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Whether the given coin is collected
    pub fn is_collected(&self, coin: usize) -> bool {
        self.collected[coin]
    }

    /// Number of coins still on the track
    pub fn remaining(&self) -> usize {
        self.collected.iter().filter(|&&c| !c).count()
    }

    /// Collect every coin within `radius` of `position` in the XZ plane,
    /// returning how many were newly picked up
    pub fn collect_within(&mut self, position: Vec3, radius: f32) -> u32 {
        let mut picked = 0;
        for (coin, collected) in self.collected.iter_mut().enumerate() {
            if *collected {
                continue;
            }
            let dx = self.positions[coin].x - position.x;
            let dz = self.positions[coin].z - position.z;
            if dx * dx + dz * dz < radius * radius {
                *collected = true;
                picked += 1;
            }
        }
        picked
    }

    /// Restore every coin (new lap started)
    pub fn collect_none(&mut self) {
        self.collected.fill(false);
    }

    /// Mark every coin collected (player backed over the start line)
    pub fn collect_all(&mut self) {
        self.collected.fill(true);
    }
}
