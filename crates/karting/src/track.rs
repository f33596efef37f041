//! Procedural demo circuit
//!
//! A rectangular ring road on a grass apron: outer bounds 3000x3000 world
//! units centered on (1500, 0), a grass infield, a boost strip across the
//! back straight, and bounce walls fencing the apron edge. The start line
//! is where the west straight crosses z = 0, which matches the lap
//! tracker's quadrant boundary at x = 1500.

use kart_engine::foundation::math::Vec3;
use kart_engine::materials::SurfaceMap;
use kart_engine::mesh::{MeshBuilder, MeshError, TriangleMesh};

const ROAD: u32 = 0;
const GRASS: u32 = 1;
const BOOST: u32 = 2;
const BOUNCE: u32 = 3;

const WALL_HEIGHT: f32 = 200.0;
const COIN_HEIGHT: f32 = 15.0;

/// A built circuit with everything a session needs to start racing
#[derive(Debug)]
pub struct Track {
    /// Collision world
    pub mesh: TriangleMesh,
    /// Material index to surface mapping for the mesh
    pub surfaces: SurfaceMap,
    /// Player start position, in section 4 just before the start line
    pub spawn: Vec3,
    /// Point the player initially faces (down the west straight)
    pub spawn_look: Vec3,
    /// Coin placements around the ring
    pub coins: Vec<Vec3>,
    /// Quadrant boundary for the lap tracker
    pub section_boundary_x: f32,
}

/// Axis-aligned ground quad at y = 0, wound for a +y normal
fn push_ground(builder: &mut MeshBuilder, x0: f32, x1: f32, z0: f32, z1: f32, material: u32) {
    let a = Vec3::new(x0, 0.0, z0);
    let b = Vec3::new(x0, 0.0, z1);
    let c = Vec3::new(x1, 0.0, z1);
    let d = Vec3::new(x1, 0.0, z0);
    builder.push_triangle_positions(a, b, c, material);
    builder.push_triangle_positions(a, c, d, material);
}

/// Vertical wall along the edge a -> b; the normal faces the side that
/// cross(b - a, +y) points to
fn push_wall(builder: &mut MeshBuilder, a: Vec3, b: Vec3, material: u32) {
    let lift = Vec3::new(0.0, WALL_HEIGHT, 0.0);
    builder.push_triangle_positions(a, b, b + lift, material);
    builder.push_triangle_positions(a, b + lift, a + lift, material);
}

/// Build the demo circuit
pub fn build() -> Result<Track, MeshError> {
    let mut builder = MeshBuilder::new();

    // Ring road: outer square x 0..3000, z -1500..1500, infield cut out
    push_ground(&mut builder, 0.0, 1000.0, -1500.0, 1500.0, ROAD);
    push_ground(&mut builder, 1000.0, 2000.0, 500.0, 1500.0, ROAD);
    push_ground(&mut builder, 1000.0, 2000.0, -1500.0, -500.0, ROAD);

    // Back straight carries the boost strip
    push_ground(&mut builder, 2000.0, 3000.0, -1500.0, -200.0, ROAD);
    push_ground(&mut builder, 2000.0, 3000.0, -200.0, 200.0, BOOST);
    push_ground(&mut builder, 2000.0, 3000.0, 200.0, 1500.0, ROAD);

    // Grass infield and apron around the ring
    push_ground(&mut builder, 1000.0, 2000.0, -500.0, 500.0, GRASS);
    push_ground(&mut builder, -1000.0, 0.0, -2500.0, 2500.0, GRASS);
    push_ground(&mut builder, 3000.0, 4000.0, -2500.0, 2500.0, GRASS);
    push_ground(&mut builder, 0.0, 3000.0, 1500.0, 2500.0, GRASS);
    push_ground(&mut builder, 0.0, 3000.0, -2500.0, -1500.0, GRASS);

    // Bounce fence at the apron edge, normals facing the track
    push_wall(
        &mut builder,
        Vec3::new(-1000.0, 0.0, 2500.0),
        Vec3::new(-1000.0, 0.0, -2500.0),
        BOUNCE,
    );
    push_wall(
        &mut builder,
        Vec3::new(4000.0, 0.0, -2500.0),
        Vec3::new(4000.0, 0.0, 2500.0),
        BOUNCE,
    );
    push_wall(
        &mut builder,
        Vec3::new(3000.0, 0.0, 2500.0),
        Vec3::new(-1000.0, 0.0, 2500.0),
        BOUNCE,
    );
    push_wall(
        &mut builder,
        Vec3::new(-1000.0, 0.0, -2500.0),
        Vec3::new(3000.0, 0.0, -2500.0),
        BOUNCE,
    );

    let mesh = builder.build()?;
    let surfaces = SurfaceMap::from_names(&["Road", "Grass", "Boost", "Bounce"]);

    // Coins down the middle of each straight
    let mut coins = Vec::new();
    for z in [-1000.0, -600.0, 400.0, 800.0, 1200.0] {
        coins.push(Vec3::new(500.0, COIN_HEIGHT, z));
    }
    for x in [1200.0, 1500.0, 1800.0] {
        coins.push(Vec3::new(x, COIN_HEIGHT, 1000.0));
        coins.push(Vec3::new(x, COIN_HEIGHT, -1000.0));
    }
    for z in [600.0, 1000.0] {
        coins.push(Vec3::new(2500.0, COIN_HEIGHT, z));
    }

    Ok(Track {
        mesh,
        surfaces,
        spawn: Vec3::new(500.0, 30.0, -200.0),
        spawn_look: Vec3::new(500.0, 30.0, -199.0),
        coins,
        section_boundary_x: 1500.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kart_engine::materials::Surface;

    #[test]
    fn test_track_builds() {
        let track = build().unwrap();
        assert!(track.mesh.triangle_count() > 20);
        assert!(!track.coins.is_empty());
    }

    #[test]
    fn test_spawn_is_before_the_start_line() {
        let track = build().unwrap();
        assert!(track.spawn.x < track.section_boundary_x);
        assert!(track.spawn.z < 0.0);
    }

    #[test]
    fn test_all_materials_are_mapped() {
        let track = build().unwrap();
        let mut seen = [false; 4];
        for triangle in track.mesh.triangles() {
            seen[triangle.material as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(track.surfaces.surface(BOOST), Surface::Boost);
        assert_eq!(track.surfaces.surface(BOUNCE), Surface::Bounce);
    }

    #[test]
    fn test_walls_face_the_track() {
        let track = build().unwrap();
        let center = Vec3::new(1500.0, 0.0, 0.0);
        for triangle in track.mesh.triangles() {
            if triangle.material != BOUNCE {
                continue;
            }
            let [a, b, c] = track.mesh.triangle_positions(triangle);
            let centroid = (a + b + c) / 3.0;
            let inward = center - centroid;
            assert!(
                triangle.normal.dot(&inward) > 0.0,
                "wall at {centroid:?} faces away from the track"
            );
        }
    }

    #[test]
    fn test_ground_faces_up() {
        let track = build().unwrap();
        for triangle in track.mesh.triangles() {
            if triangle.material == BOUNCE {
                continue;
            }
            assert!(triangle.normal.y > 0.99);
        }
    }
}
