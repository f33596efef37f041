//! Math utilities and types
//!
//! Provides the fundamental math types used by the mesh, collision, and
//! vehicle modules.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Normalize a vector, returning zero for a zero-length input.
    ///
    /// The simulation treats normalizing a zero vector as a no-op rather
    /// than producing NaN components.
    pub fn safe_normalize(v: Vec3) -> Vec3 {
        v.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
    }

    /// Whether two vectors point away from each other (dot product <= 0).
    ///
    /// A zero vector is considered opposite to everything, which matches how
    /// the vehicle integrator treats a stationary body as "not moving
    /// forward".
    pub fn opposites(a: &Vec3, b: &Vec3) -> bool {
        a.dot(b) <= 0.0
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::utils::{opposites, safe_normalize};
    use super::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_safe_normalize_unit_length() {
        let v = safe_normalize(Vec3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(v.magnitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.x, 0.6, epsilon = 1e-6);
        assert_relative_eq!(v.z, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_safe_normalize_zero_is_noop() {
        let v = safe_normalize(Vec3::zeros());
        assert_eq!(v, Vec3::zeros());
        assert!(v.x.is_finite());
    }

    #[test]
    fn test_opposites() {
        let forward = Vec3::new(0.0, 0.0, 1.0);
        assert!(opposites(&forward, &Vec3::new(0.0, 0.0, -1.0)));
        assert!(!opposites(&forward, &Vec3::new(0.1, 0.0, 0.5)));
        // Perpendicular and zero vectors count as opposite
        assert!(opposites(&forward, &Vec3::new(1.0, 0.0, 0.0)));
        assert!(opposites(&forward, &Vec3::zeros()));
    }
}
