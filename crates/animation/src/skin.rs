use diorama_common::Color;
use glam::{Mat4, Vec3};

/// Triangle mesh with optional per-vertex skin influences.
///
/// `joints`/`weights` are either empty (rigid mesh) or one entry per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedMesh {
    pub name: Option<String>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
    pub base_color: Color,
}

/// Vertex data after skinning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PosedVertices {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

impl SkinnedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_skinned(&self) -> bool {
        !self.joints.is_empty() && self.joints.len() == self.positions.len()
    }

    /// Bind-pose vertices, unchanged.
    pub fn bind_pose(&self) -> PosedVertices {
        PosedVertices {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
        }
    }

    /// Linear blend skinning over up to four influences per vertex.
    pub fn skin(&self, joint_matrices: &[Mat4]) -> PosedVertices {
        if !self.is_skinned() || joint_matrices.is_empty() {
            return self.bind_pose();
        }

        let mut out = PosedVertices {
            positions: Vec::with_capacity(self.positions.len()),
            normals: Vec::with_capacity(self.normals.len()),
        };

        for (i, &position) in self.positions.iter().enumerate() {
            let normal = self.normals.get(i).copied();
            let weights = self.weights.get(i).copied().unwrap_or([0.0; 4]);
            let total: f32 = weights.iter().sum();
            if total <= f32::EPSILON {
                out.positions.push(position);
                if let Some(n) = normal {
                    out.normals.push(n);
                }
                continue;
            }

            let mut skin = Mat4::ZERO;
            for (joint, weight) in self.joints[i].iter().zip(weights) {
                if weight == 0.0 {
                    continue;
                }
                if let Some(m) = joint_matrices.get(*joint as usize) {
                    skin += *m * (weight / total);
                }
            }

            out.positions.push(skin.transform_point3(position));
            if let Some(n) = normal {
                out.normals.push(skin.transform_vector3(n).normalize_or(n));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(joints: Vec<[u16; 4]>, weights: Vec<[f32; 4]>) -> SkinnedMesh {
        SkinnedMesh {
            name: Some("quad".into()),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            joints,
            weights,
            indices: vec![0, 1, 2, 2, 3, 0],
            base_color: Color::WHITE,
        }
    }

    #[test]
    fn rigid_mesh_is_unchanged() {
        let mesh = quad(vec![], vec![]);
        let posed = mesh.skin(&[Mat4::from_translation(Vec3::X)]);
        assert_eq!(posed.positions, mesh.positions);
        assert!(!mesh.is_skinned());
    }

    #[test]
    fn single_influence_follows_joint() {
        let mesh = quad(vec![[0, 0, 0, 0]; 4], vec![[1.0, 0.0, 0.0, 0.0]; 4]);
        let posed = mesh.skin(&[Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0))]);
        assert_eq!(posed.positions[0], Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(posed.normals[0], Vec3::Z);
    }

    #[test]
    fn split_influence_averages() {
        let mesh = quad(vec![[0, 1, 0, 0]; 4], vec![[0.5, 0.5, 0.0, 0.0]; 4]);
        let matrices = [
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        ];
        let posed = mesh.skin(&matrices);
        assert!(posed.positions[0].abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn weights_are_normalised() {
        let mesh = quad(vec![[0, 0, 0, 0]; 4], vec![[2.0, 0.0, 0.0, 0.0]; 4]);
        let posed = mesh.skin(&[Mat4::from_translation(Vec3::X)]);
        assert!(posed.positions[0].abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn zero_weight_vertex_stays_in_bind_pose() {
        let mut weights = vec![[1.0, 0.0, 0.0, 0.0]; 4];
        weights[2] = [0.0; 4];
        let mesh = quad(vec![[0, 0, 0, 0]; 4], weights);
        let posed = mesh.skin(&[Mat4::from_translation(Vec3::Y)]);
        assert_eq!(posed.positions[2], mesh.positions[2]);
        assert_ne!(posed.positions[0], mesh.positions[0]);
    }
}
