//! Kouch Karting, headless
//!
//! Runs a full race on the demo circuit with a waypoint autopilot standing
//! in for the player, logging progress as it goes. Useful as an integration
//! smoke test and as a reference for wiring the simulation into a frontend.

mod coins;
mod config;
mod laps;
mod session;
mod track;

use kart_engine::config::Config;
use kart_engine::foundation::math::Vec3;
use kart_engine::foundation::time::Timer;
use kart_engine::vehicle::Controls;

use crate::config::GameConfig;
use crate::session::RaceSession;

const CONFIG_PATH: &str = "karting.toml";

/// Hard stop for the demo if the autopilot somehow never finishes
const MAX_RACE_SECONDS: f32 = 600.0;

/// Clockwise circuit waypoints down the middle of each straight
const WAYPOINTS: [[f32; 2]; 4] = [
    [500.0, 1000.0],
    [2500.0, 1000.0],
    [2500.0, -1000.0],
    [500.0, -1000.0],
];

const WAYPOINT_REACHED: f32 = 150.0;

/// Steer toward the current waypoint, always at full throttle
fn autopilot(race: &RaceSession, waypoint: &mut usize) -> Controls {
    let position = race.kart().position();
    let [wx, wz] = WAYPOINTS[*waypoint];
    let dx = wx - position.x;
    let dz = wz - position.z;
    if dx * dx + dz * dz < WAYPOINT_REACHED * WAYPOINT_REACHED {
        *waypoint = (*waypoint + 1) % WAYPOINTS.len();
        return autopilot(race, waypoint);
    }

    let facing = race.kart().real_direction();
    // Positive means the waypoint is off to the left of the facing direction
    let side = dx * facing.z - dz * facing.x;

    let mut controls = Controls::ACCELERATE;
    if side > 10.0 {
        controls |= Controls::TURN_LEFT;
    } else if side < -10.0 {
        controls |= Controls::TURN_RIGHT;
    }
    controls
}

fn load_config() -> GameConfig {
    if std::path::Path::new(CONFIG_PATH).exists() {
        match GameConfig::load_from_file(CONFIG_PATH) {
            Ok(config) => return config,
            Err(e) => log::warn!("failed to load {CONFIG_PATH}: {e}, using defaults"),
        }
    }
    GameConfig::default()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    kart_engine::foundation::logging::init();

    let config = load_config();
    let dt = config.gameplay.fixed_timestep;
    let mut race = RaceSession::new(&config)?;
    let mut waypoint = 0;
    let mut next_report = 0.0_f32;
    let mut wall_clock = Timer::new();

    while !race.finished() && race.race_time() < MAX_RACE_SECONDS {
        wall_clock.update();
        let controls = autopilot(&race, &mut waypoint);
        race.update(controls, dt);

        if race.race_time() >= next_report {
            let p: Vec3 = race.kart().position();
            log::info!(
                "t={:6.1}s lap {} section {} speed {:6.1} money ${} at ({:7.1}, {:5.1}, {:7.1})",
                race.race_time(),
                race.laps().current_lap(),
                race.laps().section(),
                race.kart().speed(),
                race.laps().total_money(),
                p.x,
                p.y,
                p.z,
            );
            next_report += 5.0;
        }
    }

    if race.finished() {
        log::info!("race complete in {:.1}s", race.race_time());
        for (lap, (time, money)) in race
            .laps()
            .lap_times()
            .iter()
            .zip(race.laps().lap_money())
            .enumerate()
        {
            let minutes = (time / 60.0).floor();
            let seconds = time % 60.0;
            log::info!("  lap {}: {minutes:.0}:{seconds:05.2} ${money}", lap + 1);
        }
        log::info!("total money: ${}", race.laps().total_money());
        log::info!(
            "{} ticks in {:.2}s wall time ({:.0} ticks/s)",
            wall_clock.frame_count(),
            wall_clock.total_time(),
            wall_clock.average_fps()
        );
    } else {
        log::warn!(
            "race abandoned after {:.0}s on lap {}",
            race.race_time(),
            race.laps().current_lap()
        );
    }

    Ok(())
}
