//! Swept-sphere collide-and-slide solver
//!
//! Given a moving bounding ellipsoid (position + per-tick displacement) and a
//! static triangle mesh, finds the earliest swept contact, projects the
//! remaining motion onto the sliding plane at the contact, and repeats until
//! the residual motion collapses or the iteration cap is hit.
//!
//! Each query performs two passes: first the gravity component alone (which
//! doubles as ground detection), then the requested velocity starting from
//! the gravity-resolved position. All sweep math happens in ellipsoid space
//! (see [`crate::collision::espace`]) where the collider is a unit sphere.
//!
//! The solver raises no errors. Pathological inputs (zero radius components,
//! degenerate triangles) are excluded by construction: the mesh builder
//! validates geometry and the radius contract is asserted here.

use crate::collision::espace::{self, EspaceTriangle};
use crate::foundation::math::{utils::safe_normalize, Vec3};
use crate::mesh::TriangleMesh;

/// Tuning constants for the sliding loop
#[derive(Debug, Clone, Copy)]
pub struct SlideConfig {
    /// Contact slack in ellipsoid-space units: the collider is kept this far
    /// off any surface it hits, and sliding stops once the residual motion
    /// drops below it
    pub very_close_distance: f32,
    /// Hard cap on sliding iterations per pass; when exhausted the solver
    /// returns the best position found so far rather than looping
    pub max_iterations: u32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            very_close_distance: 0.5,
            max_iterations: 8,
        }
    }
}

/// One collision query: world-space pose and per-tick displacements
///
/// `velocity` and `gravity` are displacements for this tick, i.e. already
/// multiplied by the frame delta time by the caller.
#[derive(Debug, Clone, Copy)]
pub struct SlideQuery {
    /// Collider center in world space
    pub position: Vec3,
    /// Requested planar displacement for this tick
    pub velocity: Vec3,
    /// Gravity displacement for this tick, kept separate so ground contact
    /// can be detected independently of driving motion
    pub gravity: Vec3,
    /// Bounding-ellipsoid semi-axes; every component must be > 0
    pub radius: Vec3,
    /// Fallback surface normal reported when nothing is hit
    pub up_hint: Vec3,
}

/// Result of a collide-and-slide query
#[derive(Debug, Clone, Copy)]
pub struct SlideOutcome {
    /// Final collider center in world space after both passes
    pub position: Vec3,
    /// World-space face normal of the last surface hit, or the query's
    /// `up_hint` if nothing was hit
    pub normal: Vec3,
    /// Mesh index of the last triangle hit, if any
    pub triangle: Option<usize>,
    /// Whether the gravity-only pass found a collision (ground contact)
    pub grounded: bool,
    /// Whether the collider already overlapped geometry before moving
    pub embedded: bool,
    /// Whether any pass recorded a collision
    pub collided: bool,
    /// Total sliding iterations spent across both passes
    pub iterations: u32,
}

/// Nearest swept contact found in one sliding iteration
struct Contact {
    /// Distance along the motion until the sphere touches, in eSpace units
    distance: f32,
    /// Sphere/plane contact point used as the sliding-plane origin
    point: Vec3,
    /// Source triangle index in the mesh
    triangle: usize,
}

/// Mutable bookkeeping shared by both passes of one query
struct QueryState<'a> {
    triangles: &'a [EspaceTriangle],
    config: &'a SlideConfig,
    embedded: bool,
    hit_triangle: Option<usize>,
    iterations: u32,
}

impl QueryState<'_> {
    /// Sweep the unit sphere at `base` along `velocity` against every
    /// triangle and keep the nearest contact.
    ///
    /// Also performs the embedded side-check: a plane within unit distance
    /// whose triangle contains the collider's surface projection means the
    /// body started this step already penetrating.
    fn nearest_contact(&mut self, base: Vec3, velocity: Vec3) -> Option<Contact> {
        let mut nearest: Option<Contact> = None;

        for triangle in self.triangles {
            let signed_distance = triangle.signed_distance(&base);

            if signed_distance.abs() <= 1.0 {
                let surface_point = base - triangle.normal;
                if triangle.contains(&surface_point) {
                    self.embedded = true;
                }
            }

            // One-sided test: back faces never collide
            if !triangle.is_front_facing(&velocity) {
                continue;
            }

            let normal_dot_velocity = triangle.normal.dot(&velocity);

            // Motion parallel to the plane cannot cross it
            if normal_dot_velocity == 0.0 {
                continue;
            }

            // Interval during which the sphere surface overlaps the plane
            let mut t0 = (-1.0 - signed_distance) / normal_dot_velocity;
            let mut t1 = (1.0 - signed_distance) / normal_dot_velocity;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > 1.0 || t1 < 0.0 {
                continue;
            }

            // Where the sphere surface meets the plane at the start of the
            // overlap interval
            let contact_point = base - triangle.normal + velocity * t0;
            if !triangle.contains(&contact_point) {
                continue;
            }

            let distance = t0 * velocity.magnitude();
            if nearest.as_ref().map_or(true, |hit| distance < hit.distance) {
                nearest = Some(Contact {
                    distance,
                    point: contact_point,
                    triangle: triangle.source,
                });
            }
        }

        if let Some(contact) = &nearest {
            self.hit_triangle = Some(contact.triangle);
        }
        nearest
    }

    /// Run one full sliding pass from `base` along `velocity`.
    ///
    /// Returns the resolved eSpace position and whether any iteration of the
    /// pass collided.
    fn slide_pass(&mut self, mut base: Vec3, mut velocity: Vec3) -> (Vec3, bool) {
        let very_close = self.config.very_close_distance;
        let mut collided = false;

        for _ in 0..self.config.max_iterations {
            self.iterations += 1;

            let Some(mut contact) = self.nearest_contact(base, velocity) else {
                // Terminal: nothing in the way, take the full step
                return (base + velocity, collided);
            };
            collided = true;

            let destination = base + velocity;
            let mut new_base = base;

            if contact.distance >= very_close {
                // Advance to just short of the surface, and pull the contact
                // point back by the same slack so the sliding plane is not
                // skewed by the gap
                let direction = safe_normalize(velocity);
                new_base = base + direction * (contact.distance - very_close);
                contact.point -= direction * very_close;
            }

            // Sliding plane through the contact point, facing the collider
            let plane_origin = contact.point;
            let plane_normal = safe_normalize(new_base - contact.point);

            // Project the original destination onto the sliding plane; the
            // leftover from the contact point is the next iteration's motion
            let projected =
                destination - plane_normal * plane_normal.dot(&(destination - plane_origin));
            let new_velocity = projected - contact.point;

            if new_velocity.magnitude() < very_close {
                // Terminal: residual motion too small to matter
                return (new_base, collided);
            }

            base = new_base;
            velocity = new_velocity;
        }

        log::trace!(
            "slide pass exhausted {} iterations, stopping at current base",
            self.config.max_iterations
        );
        (base, collided)
    }
}

/// Resolve one tick of motion against the world mesh.
///
/// Runs the gravity pass for ground detection, then the velocity pass from
/// the gravity-resolved position, and maps the result back to world space.
pub fn collide_and_slide(
    mesh: &TriangleMesh,
    query: &SlideQuery,
    config: &SlideConfig,
) -> SlideOutcome {
    debug_assert!(
        query.radius.x > 0.0 && query.radius.y > 0.0 && query.radius.z > 0.0,
        "collider radius components must be positive"
    );

    // Per-query scratch: every triangle transformed once, shared by both
    // passes since the radius is constant within a query
    let triangles = espace::transform_mesh(mesh, query.radius);

    let mut state = QueryState {
        triangles: &triangles,
        config,
        embedded: false,
        hit_triangle: None,
        iterations: 0,
    };

    let base = espace::to_espace(query.position, query.radius);
    let gravity = espace::to_espace(query.gravity, query.radius);
    let (after_gravity, grounded) = state.slide_pass(base, gravity);

    let velocity = espace::to_espace(query.velocity, query.radius);
    let (resolved, velocity_hit) = state.slide_pass(after_gravity, velocity);

    SlideOutcome {
        position: espace::from_espace(resolved, query.radius),
        normal: state
            .hit_triangle
            .map_or(query.up_hint, |index| mesh.triangles()[index].normal),
        triangle: state.hit_triangle,
        grounded,
        embedded: state.embedded,
        collided: grounded || velocity_hit,
        iterations: state.iterations,
    }
}
