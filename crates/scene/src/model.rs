use diorama_animation::{PosedVertices, Pose, Skeleton, SkinnedMesh};

/// A skinned model placed in the scene.
///
/// `posed` mirrors `meshes` one-to-one. `generation` increases every time the
/// posed vertices change so renderers know when to re-upload.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    pub meshes: Vec<SkinnedMesh>,
    pub skeleton: Skeleton,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    posed: Vec<PosedVertices>,
    generation: u64,
}

impl ModelInstance {
    /// Create the instance in its rest pose.
    pub fn new(meshes: Vec<SkinnedMesh>, skeleton: Skeleton) -> Self {
        let rest = Pose::rest(&skeleton).joint_matrices(&skeleton);
        let posed = meshes.iter().map(|m| m.skin(&rest)).collect();
        Self {
            meshes,
            skeleton,
            cast_shadow: false,
            receive_shadow: false,
            posed,
            generation: 0,
        }
    }

    pub fn posed(&self) -> &[PosedVertices] {
        &self.posed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(SkinnedMesh::vertex_count).sum()
    }

    /// Re-skin every skinned mesh with `pose`.
    pub fn apply_pose(&mut self, pose: &Pose) {
        if self.skeleton.is_empty() {
            return;
        }
        let matrices = pose.joint_matrices(&self.skeleton);
        for (mesh, posed) in self.meshes.iter().zip(self.posed.iter_mut()) {
            if mesh.is_skinned() {
                *posed = mesh.skin(&matrices);
            }
        }
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_animation::Joint;
    use diorama_common::{Color, Transform};
    use glam::{Mat4, Vec3};

    fn instance() -> ModelInstance {
        let mesh = SkinnedMesh {
            name: None,
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            joints: vec![[0, 0, 0, 0]; 3],
            weights: vec![[1.0, 0.0, 0.0, 0.0]; 3],
            indices: vec![0, 1, 2],
            base_color: Color::WHITE,
        };
        let skeleton = Skeleton {
            joints: vec![Joint {
                name: None,
                parent: None,
                rest: Transform::default(),
                inverse_bind: Mat4::IDENTITY,
            }],
            root: Mat4::IDENTITY,
        };
        ModelInstance::new(vec![mesh], skeleton)
    }

    #[test]
    fn starts_in_rest_pose() {
        let model = instance();
        assert_eq!(model.generation(), 0);
        assert_eq!(model.posed()[0].positions, model.meshes[0].positions);
        assert_eq!(model.vertex_count(), 3);
    }

    #[test]
    fn apply_pose_moves_vertices_and_bumps_generation() {
        let mut model = instance();
        let mut pose = Pose::rest(&model.skeleton);
        pose.locals[0].position = Vec3::new(0.0, 0.0, 1.0);
        model.apply_pose(&pose);
        assert_eq!(model.generation(), 1);
        assert_eq!(model.posed()[0].positions[1], Vec3::new(1.0, 0.0, 1.0));
    }
}
