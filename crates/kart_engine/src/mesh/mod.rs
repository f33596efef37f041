//! Static triangle mesh data model
//!
//! A [`TriangleMesh`] is an immutable-after-build triangle soup: shared
//! vertex positions, per-triangle unit face normals, and a material id per
//! triangle. It is built once at load time through [`MeshBuilder`] and then
//! queried read-only by the collision solver, so one mesh can safely serve
//! many colliding bodies.
//!
//! Geometry validation happens here, at construction: the collision solver
//! assumes non-degenerate triangles and performs no checks of its own.

use crate::foundation::math::{utils::safe_normalize, Vec3};
use thiserror::Error;

/// Errors reported while building a mesh
#[derive(Debug, Error)]
pub enum MeshError {
    /// A triangle references a vertex index that does not exist
    #[error("triangle {triangle} references out-of-range vertex index {index}")]
    InvalidVertexIndex {
        /// Index of the offending triangle
        triangle: usize,
        /// The out-of-range vertex index
        index: u32,
    },

    /// A triangle has (near) zero area and therefore no usable face normal
    #[error("triangle {triangle} is degenerate (zero area)")]
    DegenerateTriangle {
        /// Index of the offending triangle
        triangle: usize,
    },
}

/// A single vertex of a mesh (world-space position)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in world space
    pub position: Vec3,
}

impl Vertex {
    /// Create a vertex at the given position
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
        }
    }
}

/// A triangular face referencing three shared vertices
///
/// Vertices are owned by the mesh; a vertex may belong to many triangles.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Indices of the three vertices in the parent mesh
    pub indices: [u32; 3],
    /// Unit face normal in world space (right-hand winding)
    pub normal: Vec3,
    /// Material id, resolved to a surface tag by the material table
    pub material: u32,
}

/// World-space bounding extents of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshExtents {
    /// Componentwise minimum over all referenced vertices
    pub min: Vec3,
    /// Componentwise maximum over all referenced vertices
    pub max: Vec3,
}

impl MeshExtents {
    /// Full size of the mesh along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half the size along each axis, usable as a bounding-ellipsoid radius
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }
}

/// An immutable triangle mesh queried by the collision solver
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    extents: MeshExtents,
}

impl TriangleMesh {
    /// All vertices of the mesh
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All triangles of the mesh
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// The three world-space corner positions of a triangle
    pub fn triangle_positions(&self, triangle: &Triangle) -> [Vec3; 3] {
        [
            self.vertices[triangle.indices[0] as usize].position,
            self.vertices[triangle.indices[1] as usize].position,
            self.vertices[triangle.indices[2] as usize].position,
        ]
    }

    /// World-space bounding extents
    pub fn extents(&self) -> MeshExtents {
        self.extents
    }
}

/// Incremental builder for [`TriangleMesh`]
///
/// Follows the importer flow: push vertices, then triangles referencing them
/// by index, then [`build`](Self::build) to validate and freeze the mesh.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    triangles: Vec<(u32, u32, u32, u32)>,
}

impl MeshBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex, returning its index
    pub fn push_vertex(&mut self, x: f32, y: f32, z: f32) -> u32 {
        self.vertices.push(Vertex::new(x, y, z));
        (self.vertices.len() - 1) as u32
    }

    /// Add a triangle over three vertex indices with a material id
    pub fn push_triangle(&mut self, i0: u32, i1: u32, i2: u32, material: u32) {
        self.triangles.push((i0, i1, i2, material));
    }

    /// Convenience: add a free-standing triangle from three positions
    pub fn push_triangle_positions(&mut self, p0: Vec3, p1: Vec3, p2: Vec3, material: u32) {
        let i0 = self.push_vertex(p0.x, p0.y, p0.z);
        let i1 = self.push_vertex(p1.x, p1.y, p1.z);
        let i2 = self.push_vertex(p2.x, p2.y, p2.z);
        self.push_triangle(i0, i1, i2, material);
    }

    /// Validate the geometry and freeze it into an immutable mesh
    ///
    /// Fails on out-of-range vertex indices and on zero-area triangles; both
    /// would produce NaN results inside a collision query.
    pub fn build(self) -> Result<TriangleMesh, MeshError> {
        let mut triangles = Vec::with_capacity(self.triangles.len());
        let mut min = Vec3::from_element(f32::MAX);
        let mut max = Vec3::from_element(f32::MIN);
        let mut any = false;

        for (n, (i0, i1, i2, material)) in self.triangles.iter().copied().enumerate() {
            for index in [i0, i1, i2] {
                if index as usize >= self.vertices.len() {
                    return Err(MeshError::InvalidVertexIndex { triangle: n, index });
                }
            }

            let p0 = self.vertices[i0 as usize].position;
            let p1 = self.vertices[i1 as usize].position;
            let p2 = self.vertices[i2 as usize].position;

            let cross = (p1 - p0).cross(&(p2 - p0));
            if cross.magnitude() <= f32::EPSILON {
                return Err(MeshError::DegenerateTriangle { triangle: n });
            }

            for p in [p0, p1, p2] {
                min = min.inf(&p);
                max = max.sup(&p);
                any = true;
            }

            triangles.push(Triangle {
                indices: [i0, i1, i2],
                normal: safe_normalize(cross),
                material,
            });
        }

        if !any {
            min = Vec3::zeros();
            max = Vec3::zeros();
        }

        Ok(TriangleMesh {
            vertices: self.vertices,
            triangles,
            extents: MeshExtents { min, max },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad_mesh() -> TriangleMesh {
        let mut builder = MeshBuilder::new();
        let a = builder.push_vertex(-1.0, 0.0, -1.0);
        let b = builder.push_vertex(1.0, 0.0, -1.0);
        let c = builder.push_vertex(1.0, 0.0, 1.0);
        let d = builder.push_vertex(-1.0, 0.0, 1.0);
        builder.push_triangle(a, b, c, 0);
        builder.push_triangle(a, c, d, 1);
        builder.build().expect("valid quad")
    }

    #[test]
    fn test_face_normals_are_unit_up() {
        let mesh = quad_mesh();
        assert_eq!(mesh.triangle_count(), 2);
        for triangle in mesh.triangles() {
            assert_relative_eq!(triangle.normal.magnitude(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(triangle.normal.y, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_extents() {
        let mesh = quad_mesh();
        let extents = mesh.extents();
        assert_eq!(extents.min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(extents.max, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(extents.half_extents(), Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let mut builder = MeshBuilder::new();
        let a = builder.push_vertex(0.0, 0.0, 0.0);
        let b = builder.push_vertex(1.0, 0.0, 0.0);
        let c = builder.push_vertex(2.0, 0.0, 0.0); // collinear
        builder.push_triangle(a, b, c, 0);
        assert!(matches!(
            builder.build(),
            Err(MeshError::DegenerateTriangle { triangle: 0 })
        ));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut builder = MeshBuilder::new();
        let a = builder.push_vertex(0.0, 0.0, 0.0);
        let b = builder.push_vertex(1.0, 0.0, 0.0);
        builder.push_triangle(a, b, 7, 0);
        assert!(matches!(
            builder.build(),
            Err(MeshError::InvalidVertexIndex {
                triangle: 0,
                index: 7
            })
        ));
    }

    #[test]
    fn test_shared_vertices() {
        let mesh = quad_mesh();
        // Both triangles reference vertices a and c
        assert_eq!(mesh.vertices().len(), 4);
        let first = mesh.triangles()[0].indices;
        let second = mesh.triangles()[1].indices;
        assert_eq!(first[0], second[0]);
        assert_eq!(first[2], second[1]);
    }
}
