//! Game configuration and the kart catalog

use kart_engine::config::Config;
use kart_engine::vehicle::VehicleTuning;
use serde::{Deserialize, Serialize};

/// Top-level game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Kart catalog, indexed by `gameplay.selected_kart`
    pub karts: Vec<KartStats>,
}

impl Config for GameConfig {}

/// Gameplay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameplayConfig {
    /// Laps in a race
    pub total_laps: u32,

    /// Money awarded per coin
    pub coin_value: u32,

    /// Fixed physics timestep (seconds)
    pub fixed_timestep: f32,

    /// Which catalog kart the player drives
    pub selected_kart: usize,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            total_laps: 3,
            coin_value: 10,
            fixed_timestep: 1.0 / 60.0,
            selected_kart: 0,
        }
    }
}

/// Handling stats for one catalog kart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KartStats {
    /// Display name
    pub name: String,

    /// Forward acceleration (units/s²)
    pub acceleration: f32,

    /// Top forward speed (units/s)
    pub max_speed: f32,

    /// Friction on grass (units/s², negative)
    pub grass_friction: f32,

    /// Shop price
    pub price: u32,

    /// Coin pickup radius in the ground plane
    pub pickup_radius: f32,

    /// Collider semi-axes (x, y, z)
    pub collider_radius: [f32; 3],
}

impl KartStats {
    /// Fold these stats into the baseline handling constants
    pub fn tuning(&self) -> VehicleTuning {
        VehicleTuning {
            acceleration_rate: self.acceleration,
            max_speed: self.max_speed,
            grass_friction: self.grass_friction,
            ..VehicleTuning::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gameplay: GameplayConfig::default(),
            karts: vec![
                KartStats {
                    name: "Standard".into(),
                    acceleration: 250.0,
                    max_speed: 420.0,
                    grass_friction: -500.0,
                    price: 0,
                    pickup_radius: 20.0,
                    collider_radius: [10.0, 5.0, 14.0],
                },
                KartStats {
                    name: "Racer".into(),
                    acceleration: 350.0,
                    max_speed: 560.0,
                    grass_friction: -500.0,
                    price: 300,
                    pickup_radius: 20.0,
                    collider_radius: [9.0, 4.0, 13.0],
                },
                KartStats {
                    name: "Offroader".into(),
                    acceleration: 250.0,
                    max_speed: 420.0,
                    grass_friction: -200.0,
                    price: 300,
                    pickup_radius: 50.0,
                    collider_radius: [14.0, 7.0, 18.0],
                },
                KartStats {
                    name: "Supreme".into(),
                    acceleration: 450.0,
                    max_speed: 630.0,
                    grass_friction: -250.0,
                    price: 1000,
                    pickup_radius: 30.0,
                    collider_radius: [10.0, 5.0, 14.0],
                },
            ],
        }
    }
}

impl GameConfig {
    /// Stats for the selected kart, falling back to the first catalog entry
    /// if the selection is out of range
    pub fn selected_kart(&self) -> &KartStats {
        self.karts
            .get(self.gameplay.selected_kart)
            .unwrap_or(&self.karts[0])
    }
}
