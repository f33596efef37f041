//! Ellipsoid-space ("eSpace") transform
//!
//! The collision solver tests an ellipsoid collider against triangles by
//! scaling the world non-uniformly with the collider's per-axis radius
//! vector. In the scaled space the ellipsoid becomes a unit sphere, so the
//! sweep math only ever deals with a sphere of radius 1.
//!
//! Transformed triangles are query-local values: they are produced from the
//! shared read-only mesh at the start of each query and thrown away after,
//! so two bodies can query the same mesh at the same time.

use crate::foundation::math::{utils::safe_normalize, Vec3};
use crate::mesh::TriangleMesh;

/// Angle-sum slack (radians from 2π) for the point-in-triangle test
pub const POINT_IN_TRIANGLE_TOLERANCE: f32 = 0.005;

/// Transform a world-space point or vector into ellipsoid space.
///
/// Radius components must be positive; a zero component would divide by
/// zero. The solver entry point asserts this for the whole query.
pub fn to_espace(v: Vec3, radius: Vec3) -> Vec3 {
    v.component_div(&radius)
}

/// Transform an ellipsoid-space point or vector back into world space.
pub fn from_espace(v: Vec3, radius: Vec3) -> Vec3 {
    v.component_mul(&radius)
}

/// A mesh triangle transformed into the ellipsoid space of one query
#[derive(Debug, Clone, Copy)]
pub struct EspaceTriangle {
    /// Transformed corner positions
    pub corners: [Vec3; 3],
    /// Unit plane normal in ellipsoid space
    pub normal: Vec3,
    /// Plane constant: `normal · p + plane_constant` is the signed distance
    pub plane_constant: f32,
    /// Index of the source triangle in the mesh
    pub source: usize,
}

impl EspaceTriangle {
    /// Transform mesh triangle `index` by the given radius vector
    pub fn from_mesh(mesh: &TriangleMesh, index: usize, radius: Vec3) -> Self {
        let [p0, p1, p2] = mesh.triangle_positions(&mesh.triangles()[index]);
        let corners = [
            to_espace(p0, radius),
            to_espace(p1, radius),
            to_espace(p2, radius),
        ];
        let normal = safe_normalize((corners[1] - corners[0]).cross(&(corners[2] - corners[0])));
        Self {
            corners,
            normal,
            plane_constant: -normal.dot(&corners[0]),
            source: index,
        }
    }

    /// Signed distance from a point to the triangle's plane
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.plane_constant
    }

    /// Whether the triangle faces the given motion vector.
    ///
    /// One-sided test matching the mesh winding: a triangle whose normal
    /// points along the velocity is a back face and is skipped.
    pub fn is_front_facing(&self, velocity: &Vec3) -> bool {
        self.normal.dot(velocity) <= 0.0
    }

    /// Whether a point on the triangle's plane lies inside the triangle.
    ///
    /// Angle-sum test: the angles from the point to consecutive corners sum
    /// to 2π (within [`POINT_IN_TRIANGLE_TOLERANCE`]) exactly when the point
    /// is interior.
    pub fn contains(&self, point: &Vec3) -> bool {
        let v0 = safe_normalize(point - self.corners[0]);
        let v1 = safe_normalize(point - self.corners[1]);
        let v2 = safe_normalize(point - self.corners[2]);

        let total = v0.dot(&v1).clamp(-1.0, 1.0).acos()
            + v1.dot(&v2).clamp(-1.0, 1.0).acos()
            + v2.dot(&v0).clamp(-1.0, 1.0).acos();

        (total - 2.0 * std::f32::consts::PI).abs() <= POINT_IN_TRIANGLE_TOLERANCE
    }
}

/// Transform every triangle of a mesh into ellipsoid space.
///
/// This is the per-query scratch buffer: built once per collision query and
/// shared by both the gravity and the velocity pass (the radius does not
/// change within a query).
pub fn transform_mesh(mesh: &TriangleMesh, radius: Vec3) -> Vec<EspaceTriangle> {
    (0..mesh.triangle_count())
        .map(|index| EspaceTriangle::from_mesh(mesh, index, radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshBuilder;
    use approx::assert_relative_eq;

    #[test]
    fn test_espace_round_trip() {
        let radius = Vec3::new(2.0, 0.5, 4.0);
        let p = Vec3::new(10.0, -3.0, 7.5);
        let back = from_espace(to_espace(p, radius), radius);
        assert_relative_eq!(back.x, p.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-5);
    }

    #[test]
    fn test_unit_radius_is_identity() {
        let radius = Vec3::new(1.0, 1.0, 1.0);
        let p = Vec3::new(3.0, 4.0, 5.0);
        assert_eq!(to_espace(p, radius), p);
    }

    fn floor_espace(radius: Vec3) -> EspaceTriangle {
        let mut builder = MeshBuilder::new();
        builder.push_triangle_positions(
            Vec3::new(-100.0, 0.0, -100.0),
            Vec3::new(100.0, 0.0, -100.0),
            Vec3::new(0.0, 0.0, 100.0),
            0,
        );
        let mesh = builder.build().unwrap();
        EspaceTriangle::from_mesh(&mesh, 0, radius)
    }

    #[test]
    fn test_signed_distance_scales_with_radius() {
        // With a y radius of 2, a point 4 above the floor is 2 units away in
        // ellipsoid space.
        let triangle = floor_espace(Vec3::new(1.0, 2.0, 1.0));
        let point = to_espace(Vec3::new(0.0, 4.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        assert_relative_eq!(triangle.signed_distance(&point), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_front_facing() {
        let triangle = floor_espace(Vec3::new(1.0, 1.0, 1.0));
        assert!(triangle.is_front_facing(&Vec3::new(0.0, -1.0, 0.0)));
        assert!(!triangle.is_front_facing(&Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_contains() {
        let triangle = floor_espace(Vec3::new(1.0, 1.0, 1.0));
        assert!(triangle.contains(&Vec3::new(0.0, 0.0, 0.0)));
        assert!(triangle.contains(&Vec3::new(20.0, 0.0, 10.0)));
        assert!(!triangle.contains(&Vec3::new(500.0, 0.0, 0.0)));
    }
}
