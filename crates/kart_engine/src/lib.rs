//! # Kart Engine
//!
//! A simulation core for kart-style racing games: triangle-mesh worlds,
//! swept-ellipsoid collide-and-slide collision resolution, and an
//! arcade vehicle body integrator with surface-dependent handling.
//!
//! ## Features
//!
//! - **Triangle Mesh World**: Indexed mesh model with per-triangle materials
//! - **Collide and Slide**: Swept unit-sphere collision in ellipsoid space,
//!   with sliding-plane response and bounded iteration
//! - **Vehicle Body**: Fixed-stage integrator with separate driving and
//!   gravity velocity channels
//! - **Surface Materials**: Road, grass, bounce, and boost responses
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kart_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut builder = MeshBuilder::new();
//!     builder.push_triangle_positions(
//!         Vec3::new(-100.0, 0.0, -100.0),
//!         Vec3::new(100.0, 0.0, -100.0),
//!         Vec3::new(0.0, 0.0, 100.0),
//!         0,
//!     );
//!     let world = builder.build()?;
//!     let surfaces = SurfaceMap::from_names(&["Road"]);
//!
//!     let mut kart = Vehicle::new(
//!         VehicleTuning::default(),
//!         Vec3::new(2.0, 1.0, 3.0),
//!         Vec3::new(0.0, 5.0, 0.0),
//!         Vec3::new(0.0, 5.0, 1.0),
//!         Vec3::new(0.0, 1.0, 0.0),
//!         Vec3::new(1.0, 0.0, 0.0),
//!     );
//!     kart.step(&world, &surfaces, Controls::ACCELERATE, 1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod collision;
pub mod config;
pub mod foundation;
pub mod materials;
pub mod mesh;
pub mod vehicle;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        collision::{collide_and_slide, SlideConfig, SlideOutcome, SlideQuery},
        config::{Config, ConfigError},
        foundation::{
            math::{Vec2, Vec3},
            time::Timer,
        },
        materials::{Surface, SurfaceMap},
        mesh::{MeshBuilder, MeshError, TriangleMesh},
        vehicle::{Controls, Vehicle, VehicleTuning},
    };
}
