//! Vehicle body integrator
//!
//! Owns a kart's position, orientation basis, and velocity, and advances
//! them one simulation tick at a time. Each tick runs a fixed stage order
//! (friction, gravity, velocity integration, collision, turning) where every
//! stage may mutate state the next stage reads, so the order is part of the
//! contract.
//!
//! Planar velocity and gravity velocity are kept separate so the collision
//! solver can resolve ground contact and driving motion independently (its
//! two-pass split). All rate constants are per-second and scaled by the
//! frame delta each tick.

use bitflags::bitflags;

use crate::collision::{collide_and_slide, SlideConfig, SlideOutcome, SlideQuery};
use crate::foundation::math::{
    constants::DEG_TO_RAD,
    utils::{opposites, safe_normalize},
    Vec3,
};
use crate::materials::{Surface, SurfaceMap};
use crate::mesh::TriangleMesh;

bitflags! {
    /// Discrete driver intents for one tick, supplied by the input layer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Controls: u8 {
        /// Accelerate forward
        const ACCELERATE = 1 << 0;
        /// Brake / reverse
        const BRAKE = 1 << 1;
        /// Steer left
        const TURN_LEFT = 1 << 2;
        /// Steer right
        const TURN_RIGHT = 1 << 3;
        /// Respawn at the last known-good pose
        const RESET = 1 << 4;
    }
}

/// Handling and response constants for a vehicle.
///
/// These are feel-tuned gameplay values, configuration rather than physical
/// invariants; defaults match the base kart.
#[derive(Debug, Clone, Copy)]
pub struct VehicleTuning {
    /// Forward acceleration (units/s²)
    pub acceleration_rate: f32,
    /// Braking acceleration (units/s², negative = opposite facing)
    pub braking_rate: f32,
    /// Top forward speed (units/s)
    pub max_speed: f32,
    /// Top reverse speed (units/s)
    pub max_reverse_speed: f32,
    /// Rolling friction on regular surfaces (units/s², negative)
    pub normal_friction: f32,
    /// Rolling friction on grass (units/s², negative, stronger)
    pub grass_friction: f32,
    /// Steering ramp when already turning that way (degrees/s²)
    pub turn_ramp: f32,
    /// Steering ramp when reversing the turn direction (degrees/s²)
    pub counter_turn_ramp: f32,
    /// Steering decay toward straight with no input (degrees/s²)
    pub turn_decay: f32,
    /// Steering rate cap (degrees/s)
    pub max_turn_rate: f32,
    /// Gravity acceleration along -y (units/s², negative)
    pub gravity: f32,
    /// Falling below this world y triggers a respawn
    pub altitude_floor: f32,
    /// Upward nudge applied when stuck or embedded (units)
    pub stuck_nudge: f32,
    /// A moving vehicle that advanced less than this is considered stuck
    pub stuck_threshold: f32,
    /// Speed set by a boost pad (units/s)
    pub boost_speed: f32,
    /// Upward gravity-velocity kick from a boost pad (units/s)
    pub boost_kick: f32,
    /// Speed of the backwards repulsion from a bounce pad (units/s)
    pub bounce_speed: f32,
    /// Upward gravity-velocity kick from a bounce pad (units/s)
    pub bounce_kick: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            acceleration_rate: 250.0,
            braking_rate: -500.0,
            max_speed: 420.0,
            max_reverse_speed: 100.0,
            normal_friction: -200.0,
            grass_friction: -500.0,
            turn_ramp: 160.0,
            counter_turn_ramp: 320.0,
            turn_decay: 320.0,
            max_turn_rate: 40.0,
            gravity: -500.0,
            altitude_floor: -300.0,
            stuck_nudge: 0.2,
            stuck_threshold: 0.05,
            boost_speed: 1000.0,
            boost_kick: 50.0,
            bounce_speed: 200.0,
            bounce_kick: 100.0,
        }
    }
}

/// Saved pose for respawning after a fall
#[derive(Debug, Clone, Copy)]
struct ResetPose {
    position: Vec3,
    direction: Vec3,
    up: Vec3,
    right: Vec3,
}

/// A drivable vehicle body colliding against the world mesh
#[derive(Debug, Clone)]
pub struct Vehicle {
    tuning: VehicleTuning,
    slide_config: SlideConfig,

    // Pose
    position: Vec3,
    look_at: Vec3,
    up: Vec3,
    right: Vec3,
    /// True travel direction, the basis the physics uses
    real_direction: Vec3,
    /// Exaggerated visual heading (steering looks sharper than it is)
    fake_direction: Vec3,

    // Motion
    velocity: Vec3,
    acceleration: Vec3,
    gravity_velocity: Vec3,
    /// Bounding-ellipsoid semi-axes for collision queries
    radius: Vec3,
    /// Signed steering rate, positive = left (degrees/s)
    turn_rate: f32,

    // Last collision outcome
    surface: Surface,
    on_ground: bool,
    on_road: bool,
    gravity_contact: bool,
    checked_collision: bool,

    // Steering intents for the current tick
    turning_left: bool,
    turning_right: bool,

    reset_pose: ResetPose,
}

impl Vehicle {
    /// Create a vehicle at the given pose.
    ///
    /// `radius` is the collider's semi-axis vector (half extents of the
    /// model, see [`crate::mesh::MeshExtents::half_extents`]); every
    /// component must be positive.
    pub fn new(
        tuning: VehicleTuning,
        radius: Vec3,
        position: Vec3,
        look_at: Vec3,
        up: Vec3,
        right: Vec3,
    ) -> Self {
        let direction = safe_normalize(look_at - position);
        Self {
            tuning,
            slide_config: SlideConfig::default(),
            position,
            look_at,
            up,
            right,
            real_direction: direction,
            fake_direction: direction,
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            gravity_velocity: Vec3::zeros(),
            radius,
            turn_rate: 0.0,
            surface: Surface::None,
            on_ground: false,
            on_road: true,
            gravity_contact: false,
            checked_collision: false,
            turning_left: false,
            turning_right: false,
            reset_pose: ResetPose {
                position,
                direction,
                up,
                right,
            },
        }
    }

    /// Advance the vehicle one simulation tick.
    ///
    /// Stage order matters and is fixed: controls, friction, gravity,
    /// velocity integration, collision + response, steering.
    pub fn step(
        &mut self,
        world: &TriangleMesh,
        surfaces: &SurfaceMap,
        controls: Controls,
        dt: f32,
    ) {
        self.apply_controls(controls, dt);
        self.apply_friction(dt);
        self.apply_gravity(dt);
        self.calculate_velocity();
        self.check_collisions_and_move(world, surfaces, dt);
        self.turn(dt);
    }

    /// Translate driver intents into acceleration and steering flags
    fn apply_controls(&mut self, controls: Controls, dt: f32) {
        if controls.contains(Controls::RESET) {
            self.reset();
        }
        if controls.contains(Controls::ACCELERATE) {
            self.accelerate(dt);
        }
        if controls.contains(Controls::BRAKE) {
            self.brake(dt);
        }
        if controls.contains(Controls::TURN_LEFT) {
            self.turning_left = true;
        }
        if controls.contains(Controls::TURN_RIGHT) {
            self.turning_right = true;
        }
    }

    /// Accelerate along the facing direction, unless already at top speed
    fn accelerate(&mut self, dt: f32) {
        if self.velocity.magnitude() < self.tuning.max_speed {
            self.acceleration =
                safe_normalize(self.real_direction) * self.tuning.acceleration_rate * dt;
        }
    }

    /// Brake by accelerating against the facing direction
    fn brake(&mut self, dt: f32) {
        self.acceleration = safe_normalize(self.real_direction) * self.tuning.braking_rate * dt;
    }

    /// Apply surface friction to the pending acceleration.
    ///
    /// Friction only acts when grounded, and only when coasting, steering,
    /// or rolling on grass above a third of top speed; a vehicle that never
    /// collided yet has no surface to rub against.
    fn apply_friction(&mut self, dt: f32) {
        let friction_rate = if self.checked_collision && self.on_ground {
            if self.surface == Surface::Grass {
                self.tuning.grass_friction
            } else {
                self.tuning.normal_friction
            }
        } else {
            0.0
        };

        let on_grass_rate = friction_rate == self.tuning.grass_friction
            && self.tuning.grass_friction != self.tuning.normal_friction;
        let speed = self.velocity.magnitude();

        let applies = speed != 0.0
            && (self.acceleration == Vec3::zeros()
                || ((self.turning_left || self.turning_right || on_grass_rate)
                    && speed > self.tuning.max_speed / 3.0));

        if applies {
            let mut friction = safe_normalize(self.real_direction) * friction_rate * dt;
            if !self.moving_forward() {
                friction = -friction;
            }
            self.acceleration += friction;
        }
    }

    /// Accumulate gravity while airborne.
    ///
    /// Goes into the separate gravity-velocity channel so the collision
    /// solver can resolve falling independently of driving motion.
    fn apply_gravity(&mut self, dt: f32) {
        if !self.checked_collision || !self.gravity_contact {
            self.gravity_velocity.y += self.tuning.gravity * dt;
        }
    }

    /// Fold the pending acceleration into velocity.
    ///
    /// Asymmetric on purpose: braking clamps to a stop instead of flipping
    /// direction within a tick, and reverse travel has its own lower cap.
    fn calculate_velocity(&mut self) {
        if self.velocity == Vec3::zeros() {
            self.velocity += self.acceleration;
        } else if self.moving_forward() {
            if opposites(&self.acceleration, &self.real_direction) {
                // Braking: never overshoot through zero
                if self.acceleration.magnitude() > self.velocity.magnitude() {
                    self.velocity = Vec3::zeros();
                } else {
                    self.velocity += self.acceleration;
                }
            } else {
                self.velocity += self.acceleration;
            }
        } else if !opposites(&self.acceleration, &self.real_direction) {
            // Braking while reversing
            if self.acceleration.magnitude() > self.velocity.magnitude() {
                self.velocity = Vec3::zeros();
            } else {
                self.velocity += self.acceleration;
            }
        } else if self.velocity.magnitude() < self.tuning.max_reverse_speed {
            self.velocity += self.acceleration;
        }

        self.acceleration = Vec3::zeros();
    }

    /// Run the collision solver and respond to its outcome.
    ///
    /// A completely stationary vehicle skips the query, which also means it
    /// keeps its previous ground/surface state until it moves again; the
    /// track does not move underneath a parked kart.
    fn check_collisions_and_move(&mut self, world: &TriangleMesh, surfaces: &SurfaceMap, dt: f32) {
        if self.velocity == Vec3::zeros() && self.gravity_velocity == Vec3::zeros() {
            return;
        }

        let query = SlideQuery {
            position: self.position,
            velocity: self.velocity * dt,
            gravity: self.gravity_velocity * dt,
            radius: self.radius,
            up_hint: self.up,
        };
        let outcome = collide_and_slide(world, &query, &self.slide_config);
        self.checked_collision = true;

        self.surface = outcome
            .triangle
            .map_or(Surface::None, |index| {
                surfaces.surface(world.triangles()[index].material)
            });

        if self.surface == Surface::Grass {
            // Leaving the road: remember the last on-road pose for respawns
            if self.on_road {
                self.reset_pose = ResetPose {
                    position: self.position,
                    direction: self.real_direction,
                    up: self.up,
                    right: self.right,
                };
            }
            self.on_road = false;
        } else if self.surface.is_road() {
            self.on_road = true;
        }

        self.respond(&outcome);
    }

    /// Apply the movement and surface effects from a collision outcome
    fn respond(&mut self, outcome: &SlideOutcome) {
        match self.surface {
            Surface::Bounce => {
                // Repelled backwards with a hop
                self.velocity = safe_normalize(self.velocity) * -self.tuning.bounce_speed;
                self.gravity_velocity.y = self.tuning.bounce_kick;
            }
            Surface::Boost => {
                // Launched forward with a small lift
                self.velocity = safe_normalize(self.velocity) * self.tuning.boost_speed;
                self.gravity_velocity.y = self.tuning.boost_kick;
            }
            _ => {}
        }

        let moved = (outcome.position - self.position).magnitude();
        self.position = outcome.position;

        // Anti-stuck: barely advancing while trying to move, or starting the
        // tick embedded, gets a small upward hop
        if (moved < self.tuning.stuck_threshold && self.velocity != Vec3::zeros())
            || outcome.embedded
        {
            self.position.y += self.tuning.stuck_nudge;
        }

        self.gravity_contact = outcome.grounded;
        if outcome.grounded && self.gravity_velocity.y <= 0.0 {
            // Landed: kill accumulated fall speed and conform to the slope
            self.gravity_velocity = Vec3::zeros();
            self.up = outcome.normal;
            self.on_ground = true;
        } else {
            self.up = Vec3::new(0.0, 1.0, 0.0);
            self.on_ground = false;
        }

        self.real_direction = safe_normalize(self.up.cross(&self.right));

        // Steer the velocity to follow the (possibly slope-adjusted) facing,
        // except while being repelled by a bounce pad
        if self.on_ground && self.surface != Surface::Bounce {
            let forward = self.moving_forward();
            let speed = self.velocity.magnitude();
            self.velocity = safe_normalize(self.real_direction) * speed;
            if !forward {
                self.velocity = -self.velocity;
            }
        }

        if self.position.y < self.tuning.altitude_floor {
            log::debug!("vehicle fell below the world at {:?}, respawning", self.position);
            self.reset();
        }
    }

    /// Update the steering rate and rotate the basis.
    ///
    /// The rotation is applied every tick regardless of input so the rate
    /// decays smoothly back to straight after the key is released.
    fn turn(&mut self, dt: f32) {
        if self.turning_left && !self.turning_right {
            if self.turn_rate < 0.0 {
                // Reversing the turn: ramp harder so it feels responsive
                self.turn_rate += self.tuning.counter_turn_ramp * dt;
            } else if self.turn_rate < self.tuning.max_turn_rate {
                self.turn_rate += self.tuning.turn_ramp * dt;
            }
        } else if self.turning_right && !self.turning_left {
            if self.turn_rate > 0.0 {
                self.turn_rate -= self.tuning.counter_turn_ramp * dt;
            } else if self.turn_rate > -self.tuning.max_turn_rate {
                self.turn_rate -= self.tuning.turn_ramp * dt;
            }
        } else {
            // No input (or both): decay toward straight
            let decay = self.tuning.turn_decay * dt;
            if self.turn_rate > decay {
                self.turn_rate -= decay;
            } else if self.turn_rate < -decay {
                self.turn_rate += decay;
            } else {
                self.turn_rate = 0.0;
            }
        }
        self.turning_left = false;
        self.turning_right = false;

        let reversing = !self.moving_forward();
        self.rotate_y(self.turn_rate * dt);
        if reversing {
            self.velocity = -self.velocity;
        }

        self.look_at = self.position + self.fake_direction;
    }

    /// Rotate the heading by the given angle (degrees) around the up axis.
    ///
    /// The visual heading turns ten times as far as the travel direction,
    /// which makes steering read clearly without the physics oversteering.
    fn rotate_y(&mut self, angle: f32) {
        let (sin, cos) = (angle * DEG_TO_RAD).sin_cos();
        self.real_direction = safe_normalize(self.real_direction * cos - self.right * sin);

        let (sin10, cos10) = (angle * 10.0 * DEG_TO_RAD).sin_cos();
        self.fake_direction = safe_normalize(self.real_direction * cos10 - self.right * sin10);

        self.velocity = self.real_direction * self.velocity.magnitude();
        self.right = safe_normalize(self.real_direction.cross(&self.up));
    }

    /// Whether the vehicle is traveling the way it faces
    pub fn moving_forward(&self) -> bool {
        !opposites(&self.velocity, &self.real_direction)
    }

    /// Respawn at the last known-good pose with all speed cancelled
    pub fn reset(&mut self) {
        self.position = self.reset_pose.position;
        self.real_direction = self.reset_pose.direction;
        self.up = self.reset_pose.up;
        self.right = self.reset_pose.right;
        self.on_road = true;
        self.velocity = Vec3::zeros();
    }

    /// Replace the vehicle's pose outright (session setup, cutscenes)
    pub fn set_pose(&mut self, position: Vec3, up: Vec3, look_at: Vec3, right: Vec3) {
        self.position = position;
        self.up = up;
        self.look_at = look_at;
        self.right = right;
        let direction = safe_normalize(look_at - position);
        self.real_direction = direction;
        self.fake_direction = direction;
    }

    /// Current world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity (units/s)
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Current gravity velocity (units/s)
    pub fn gravity_velocity(&self) -> Vec3 {
        self.gravity_velocity
    }

    /// Current speed (units/s)
    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Point the vehicle is looking at
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Up vector (conforms to the surface while grounded)
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Right vector
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// True travel direction
    pub fn real_direction(&self) -> Vec3 {
        self.real_direction
    }

    /// Exaggerated visual heading for rendering
    pub fn fake_direction(&self) -> Vec3 {
        self.fake_direction
    }

    /// Collider semi-axes
    pub fn radius(&self) -> Vec3 {
        self.radius
    }

    /// Surface under the vehicle at the last collision
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Whether the last collision found ground under the vehicle
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Whether the vehicle was last seen on the track proper
    pub fn on_road(&self) -> bool {
        self.on_road
    }

    /// Handling constants
    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    /// Override the collision solver constants (tests, special game modes)
    pub fn set_slide_config(&mut self, config: SlideConfig) {
        self.slide_config = config;
    }

    /// Directly set the velocity (session scripting)
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshBuilder;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    /// Large flat floor at y = 0; material 0 = Road, 1 = Grass, 2 = Boost,
    /// 3 = Bounce.
    fn world(material: u32) -> (TriangleMesh, SurfaceMap) {
        let mut builder = MeshBuilder::new();
        let a = builder.push_vertex(-5000.0, 0.0, -5000.0);
        let b = builder.push_vertex(5000.0, 0.0, -5000.0);
        let c = builder.push_vertex(5000.0, 0.0, 5000.0);
        let d = builder.push_vertex(-5000.0, 0.0, 5000.0);
        builder.push_triangle(a, b, c, material);
        builder.push_triangle(a, c, d, material);
        let mesh = builder.build().unwrap();
        let surfaces = SurfaceMap::from_names(&["Road", "Grass", "Boost", "Bounce"]);
        (mesh, surfaces)
    }

    fn kart_at(height: f32) -> Vehicle {
        Vehicle::new(
            VehicleTuning::default(),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, height, 0.0),
            Vec3::new(0.0, height, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        )
    }

    /// Step until the kart lands (bounded so a regression cannot hang tests)
    fn settle(kart: &mut Vehicle, mesh: &TriangleMesh, surfaces: &SurfaceMap) {
        for _ in 0..600 {
            kart.step(mesh, surfaces, Controls::empty(), DT);
            if kart.on_ground() {
                return;
            }
        }
        panic!("kart never landed");
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let (mesh, surfaces) = world(0);
        let mut kart = kart_at(10.0);
        settle(&mut kart, &mesh, &surfaces);

        assert!(kart.on_ground());
        assert_eq!(kart.surface(), Surface::Road);
        assert_eq!(kart.gravity_velocity(), Vec3::zeros());
        // Resting height: collider radius plus the solver's contact slack
        assert!(kart.position().y > 0.9 && kart.position().y < 1.7,
            "unexpected rest height {}", kart.position().y);
    }

    #[test]
    fn test_acceleration_and_top_speed() {
        let (mesh, surfaces) = world(0);
        let mut kart = kart_at(1.6);
        settle(&mut kart, &mesh, &surfaces);

        for _ in 0..2000 {
            kart.step(&mesh, &surfaces, Controls::ACCELERATE, DT);
        }
        let top = kart.speed();
        assert!(top > 100.0, "kart should get moving, speed {top}");
        // accelerate() stops adding past max_speed, so it may overshoot by
        // at most one tick's worth
        let limit = kart.tuning().max_speed + kart.tuning().acceleration_rate * DT;
        assert!(top <= limit, "speed {top} exceeded cap {limit}");
    }

    #[test]
    fn test_braking_clamps_to_zero() {
        let (mesh, surfaces) = world(0);
        let mut kart = kart_at(1.6);
        settle(&mut kart, &mesh, &surfaces);

        kart.set_velocity(kart.real_direction() * 1.0);
        // A braking tick at low speed must stop, not reverse
        kart.step(&mesh, &surfaces, Controls::BRAKE, DT);
        assert!(kart.moving_forward() || kart.speed() == 0.0);
        assert_relative_eq!(kart.speed(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_reverse_speed_capped() {
        let (mesh, surfaces) = world(0);
        let mut kart = kart_at(1.6);
        settle(&mut kart, &mesh, &surfaces);

        for _ in 0..2000 {
            kart.step(&mesh, &surfaces, Controls::BRAKE, DT);
        }
        assert!(!kart.moving_forward());
        let limit = kart.tuning().max_reverse_speed - kart.tuning().braking_rate * DT;
        assert!(kart.speed() <= limit, "reverse speed {} over cap", kart.speed());
    }

    #[test]
    fn test_coasting_friction_stops_the_kart() {
        let (mesh, surfaces) = world(0);
        let mut kart = kart_at(1.6);
        settle(&mut kart, &mesh, &surfaces);

        for _ in 0..120 {
            kart.step(&mesh, &surfaces, Controls::ACCELERATE, DT);
        }
        let cruising = kart.speed();
        assert!(cruising > 0.0);

        for _ in 0..2000 {
            kart.step(&mesh, &surfaces, Controls::empty(), DT);
            if kart.speed() == 0.0 {
                break;
            }
        }
        assert_relative_eq!(kart.speed(), 0.0, epsilon = 1e-2);
    }

    #[test]
    fn test_grass_slows_faster_than_road() {
        let (road, surfaces) = world(0);
        let (grass, _) = world(1);

        let mut road_kart = kart_at(1.6);
        settle(&mut road_kart, &road, &surfaces);
        road_kart.set_velocity(road_kart.real_direction() * 300.0);
        let mut grass_kart = road_kart.clone();

        // Same start, same contact timing; only the friction rate differs
        for _ in 0..240 {
            road_kart.step(&road, &surfaces, Controls::empty(), DT);
            grass_kart.step(&grass, &surfaces, Controls::empty(), DT);
        }
        assert!(grass_kart.speed() > 0.0 || road_kart.speed() > 0.0);
        assert!(
            grass_kart.speed() < road_kart.speed(),
            "grass speed {} should fall below road speed {}",
            grass_kart.speed(),
            road_kart.speed()
        );
    }

    #[test]
    fn test_boost_pad_launches_forward() {
        let (mesh, surfaces) = world(2);
        let mut kart = kart_at(1.6);
        settle(&mut kart, &mesh, &surfaces);

        kart.set_velocity(kart.real_direction() * 50.0);
        // Ground contact re-registers every few ticks as gravity rebuilds
        for _ in 0..20 {
            kart.step(&mesh, &surfaces, Controls::empty(), DT);
            if kart.surface() == Surface::Boost {
                break;
            }
        }

        assert_eq!(kart.surface(), Surface::Boost);
        assert_relative_eq!(kart.speed(), kart.tuning().boost_speed, epsilon = 1e-2);
        assert!(kart.moving_forward());
        assert_relative_eq!(
            kart.gravity_velocity().y,
            kart.tuning().boost_kick,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_bounce_pad_repels_backwards() {
        let (mesh, surfaces) = world(3);
        let mut kart = kart_at(1.6);
        settle(&mut kart, &mesh, &surfaces);

        kart.set_velocity(kart.real_direction() * 100.0);
        for _ in 0..20 {
            kart.step(&mesh, &surfaces, Controls::empty(), DT);
            if kart.surface() == Surface::Bounce {
                break;
            }
        }

        assert_eq!(kart.surface(), Surface::Bounce);
        assert!(!kart.moving_forward(), "bounce should reverse travel");
        assert_relative_eq!(kart.speed(), kart.tuning().bounce_speed, epsilon = 1e-2);
        assert_relative_eq!(
            kart.gravity_velocity().y,
            kart.tuning().bounce_kick,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_turn_rate_ramps_and_decays() {
        let (mesh, surfaces) = world(0);
        let mut kart = kart_at(1.6);
        settle(&mut kart, &mesh, &surfaces);
        kart.set_velocity(kart.real_direction() * 50.0);

        let before = kart.real_direction();
        for _ in 0..30 {
            kart.step(&mesh, &surfaces, Controls::ACCELERATE | Controls::TURN_LEFT, DT);
        }
        let after = kart.real_direction();
        assert!(
            before.dot(&after) < 0.9999,
            "heading should have rotated: dot {}",
            before.dot(&after)
        );

        // Released stick: the rate decays back to zero within a few ticks
        for _ in 0..60 {
            kart.step(&mesh, &surfaces, Controls::ACCELERATE, DT);
        }
        let settled = kart.real_direction();
        kart.step(&mesh, &surfaces, Controls::ACCELERATE, DT);
        assert_relative_eq!(settled.dot(&kart.real_direction()), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_falling_below_floor_respawns() {
        // No geometry at all: the kart falls forever until the altitude
        // floor trips and resets it to its spawn pose
        let mut builder = MeshBuilder::new();
        builder.push_triangle_positions(
            Vec3::new(9000.0, 0.0, 9000.0),
            Vec3::new(9001.0, 0.0, 9000.0),
            Vec3::new(9000.0, 0.0, 9001.0),
            0,
        );
        let mesh = builder.build().unwrap();
        let surfaces = SurfaceMap::from_names(&["Road"]);

        let spawn = Vec3::new(0.0, 10.0, 0.0);
        let mut kart = kart_at(10.0);
        let mut respawned = false;
        for _ in 0..2000 {
            kart.step(&mesh, &surfaces, Controls::empty(), DT);
            if kart.position() == spawn {
                respawned = true;
                break;
            }
            assert!(kart.position().y > kart.tuning().altitude_floor - 50.0);
        }
        assert!(respawned, "kart should have reset, got {:?}", kart.position());
    }

    #[test]
    fn test_idle_kart_skips_collision() {
        let (mesh, surfaces) = world(0);
        let mut kart = kart_at(1.6);
        settle(&mut kart, &mesh, &surfaces);

        // Grounded with zero velocity: position must not drift
        let rest = kart.position();
        for _ in 0..10 {
            kart.step(&mesh, &surfaces, Controls::empty(), DT);
        }
        assert_eq!(kart.position(), rest);
    }
}
