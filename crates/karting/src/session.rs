//! A running race: the world, the player kart, coins, and lap state

use kart_engine::foundation::math::{utils::safe_normalize, Vec3};
use kart_engine::materials::SurfaceMap;
use kart_engine::mesh::{MeshError, TriangleMesh};
use kart_engine::vehicle::{Controls, Vehicle};

use crate::coins::CoinField;
use crate::config::GameConfig;
use crate::laps::{LapEvent, LapTracker};
use crate::track::{self, Track};

/// One race in progress. Owns all simulation state; advance it with
/// [`RaceSession::update`] at a fixed timestep.
pub struct RaceSession {
    world: TriangleMesh,
    surfaces: SurfaceMap,
    kart: Vehicle,
    coins: CoinField,
    laps: LapTracker,
    pickup_radius: f32,
    coin_value: u32,
    race_time: f32,
}

impl RaceSession {
    /// Build the demo circuit and place the configured kart on its grid
    pub fn new(config: &GameConfig) -> Result<Self, MeshError> {
        let Track {
            mesh,
            surfaces,
            spawn,
            spawn_look,
            coins,
            section_boundary_x,
        } = track::build()?;

        let stats = config.selected_kart();
        let forward = safe_normalize(spawn_look - spawn);
        let up = Vec3::new(0.0, 1.0, 0.0);
        let right = safe_normalize(forward.cross(&up));
        let kart = Vehicle::new(
            stats.tuning(),
            Vec3::from(stats.collider_radius),
            spawn,
            spawn_look,
            up,
            right,
        );

        log::info!(
            "race ready: {} triangles, {} coins, driving '{}'",
            mesh.triangle_count(),
            coins.len(),
            stats.name
        );

        Ok(Self {
            world: mesh,
            surfaces,
            kart,
            coins: CoinField::new(coins),
            laps: LapTracker::new(section_boundary_x, config.gameplay.total_laps),
            pickup_radius: stats.pickup_radius,
            coin_value: config.gameplay.coin_value,
            race_time: 0.0,
        })
    }

    /// Advance the race one fixed timestep
    pub fn update(&mut self, controls: Controls, dt: f32) {
        self.race_time += dt;
        self.kart.step(&self.world, &self.surfaces, controls, dt);

        let picked = self
            .coins
            .collect_within(self.kart.position(), self.pickup_radius);
        if picked > 0 {
            self.laps.award(picked, self.coin_value);
            log::debug!(
                "picked up {picked} coin(s), lap money now {:?}",
                self.laps.lap_money()
            );
        }

        match self.laps.update(self.kart.position(), self.race_time) {
            LapEvent::Advanced => {
                log::info!(
                    "lap {} at {:.2}s",
                    self.laps.current_lap(),
                    self.race_time
                );
                // A fresh lap gets a fresh set of coins
                self.coins.collect_none();
            }
            LapEvent::Reversed => {
                log::info!("backed over the start line, lap {}", self.laps.current_lap());
                self.coins.collect_all();
            }
            LapEvent::None => {}
        }
    }

    /// Whether every lap has been driven
    pub fn finished(&self) -> bool {
        self.laps.finished()
    }

    /// Seconds since the race started
    pub fn race_time(&self) -> f32 {
        self.race_time
    }

    /// The player kart
    pub fn kart(&self) -> &Vehicle {
        &self.kart
    }

    /// Lap state
    pub fn laps(&self) -> &LapTracker {
        &self.laps
    }

    /// Coin state
    pub fn coins(&self) -> &CoinField {
        &self.coins
    }
}
