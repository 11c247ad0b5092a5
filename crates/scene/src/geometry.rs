use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Procedural geometry descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Rectangle in the XY plane facing +Z.
    Plane { width: f32, depth: f32 },
    /// Axis-aligned box centred on the origin.
    Box { width: f32, height: f32, depth: f32 },
    /// UV sphere centred on the origin.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Geometry {
    pub fn plane(width: f32, depth: f32) -> Self {
        Self::Plane { width, depth }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            width,
            height,
            depth,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius,
            width_segments: 32,
            height_segments: 16,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Plane { .. } => "plane",
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
        }
    }

    /// Generate triangle data, counter-clockwise front faces.
    pub fn build(&self) -> MeshData {
        match *self {
            Self::Plane { width, depth } => plane_mesh(width, depth),
            Self::Box {
                width,
                height,
                depth,
            } => box_mesh(width, height, depth),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere_mesh(radius, width_segments.max(3), height_segments.max(2)),
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[normal; 4]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

fn plane_mesh(width: f32, depth: f32) -> MeshData {
    let (hw, hd) = (width / 2.0, depth / 2.0);
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            Vec3::new(-hw, -hd, 0.0),
            Vec3::new(hw, -hd, 0.0),
            Vec3::new(hw, hd, 0.0),
            Vec3::new(-hw, hd, 0.0),
        ],
        Vec3::Z,
    );
    mesh
}

fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    let mut mesh = MeshData::default();
    #[rustfmt::skip]
    let faces = [
        ([[-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z]], Vec3::Z),
        ([[ x, -y, -z], [-x, -y, -z], [-x,  y, -z], [ x,  y, -z]], Vec3::NEG_Z),
        ([[ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z]], Vec3::X),
        ([[-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z]], Vec3::NEG_X),
        ([[-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z]], Vec3::Y),
        ([[-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z]], Vec3::NEG_Y),
    ];
    for (corners, normal) in faces {
        mesh.push_quad(corners.map(Vec3::from_array), normal);
    }
    mesh
}

fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let columns = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;
            let normal = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            mesh.positions.push(normal * radius);
            mesh.normals.push(normal);
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * columns + ix + 1;
            let b = iy * columns + ix;
            let c = (iy + 1) * columns + ix;
            let d = (iy + 1) * columns + ix + 1;
            // the pole rows collapse to a single triangle each
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_front_faces_outward(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.positions[tri[k] as usize]);
            let face = (b - a).cross(c - a);
            if face.length_squared() < 1e-12 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            let n = mesh.normals[tri[0] as usize];
            assert!(face.dot(n) > 0.0, "triangle {tri:?} winds against its normal");
            if n != Vec3::Z {
                assert!(centroid.dot(n) > 0.0);
            }
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let mesh = Geometry::plane(10.0, 10.0).build();
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.positions.iter().all(|p| p.x.abs() == 5.0 && p.z == 0.0));
        assert_front_faces_outward(&mesh);
    }

    #[test]
    fn box_extents_and_winding() {
        let mesh = Geometry::cuboid(0.5, 1.0, 0.5).build();
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 0.5);
        assert_front_faces_outward(&mesh);
    }

    #[test]
    fn sphere_vertices_on_radius() {
        let mesh = Geometry::sphere(0.25).build();
        assert_eq!(mesh.positions.len(), 33 * 17);
        // 2 triangles per cell minus one per cell on each pole row
        assert_eq!(mesh.triangle_count(), 32 * 16 * 2 - 32 * 2);
        for p in &mesh.positions {
            assert!((p.length() - 0.25).abs() < 1e-5);
        }
        assert_front_faces_outward(&mesh);
    }

    #[test]
    fn degenerate_sphere_segments_are_clamped() {
        let mesh = Geometry::Sphere {
            radius: 1.0,
            width_segments: 0,
            height_segments: 0,
        }
        .build();
        assert!(mesh.triangle_count() > 0);
    }
}
