//! Collision detection and response
//!
//! The solver sweeps a bounding ellipsoid against a static triangle mesh and
//! resolves blocked motion by sliding. See [`slide::collide_and_slide`] for
//! the entry point and [`espace`] for the coordinate transform that turns
//! the ellipsoid problem into a unit-sphere one.

pub mod espace;
pub mod slide;

pub use espace::{from_espace, to_espace, EspaceTriangle};
pub use slide::{collide_and_slide, SlideConfig, SlideOutcome, SlideQuery};
