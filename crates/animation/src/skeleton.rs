use crate::clip::Sample;
use diorama_common::Transform;
use glam::Mat4;

/// One bone of a skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: Option<String>,
    pub parent: Option<usize>,
    /// Local transform in the bind (rest) pose.
    pub rest: Transform,
    pub inverse_bind: Mat4,
}

/// Joint hierarchy of a skinned model.
///
/// `root` is the global transform of the non-joint ancestors of the topmost
/// joints (typically an armature node).
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub joints: Vec<Joint>,
    pub root: Mat4,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self {
            joints: Vec::new(),
            root: Mat4::IDENTITY,
        }
    }
}

impl Skeleton {
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn find_joint(&self, name: &str) -> Option<usize> {
        self.joints
            .iter()
            .position(|j| j.name.as_deref() == Some(name))
    }

    /// Global matrices for the given local transforms. Parents may appear
    /// after their children in `joints`.
    pub fn global_matrices(&self, locals: &[Transform]) -> Vec<Mat4> {
        let mut globals: Vec<Option<Mat4>> = vec![None; self.joints.len()];
        for index in 0..self.joints.len() {
            self.resolve_global(index, locals, &mut globals, 0);
        }
        globals
            .into_iter()
            .map(|g| g.unwrap_or(Mat4::IDENTITY))
            .collect()
    }

    fn resolve_global(
        &self,
        index: usize,
        locals: &[Transform],
        globals: &mut [Option<Mat4>],
        depth: usize,
    ) -> Mat4 {
        if let Some(m) = globals[index] {
            return m;
        }
        let local = locals
            .get(index)
            .unwrap_or(&self.joints[index].rest)
            .matrix();
        // A malformed hierarchy with a cycle is cut at the root.
        let parent = match self.joints[index].parent {
            Some(p) if p < self.joints.len() && depth < self.joints.len() => {
                self.resolve_global(p, locals, globals, depth + 1)
            }
            _ => self.root,
        };
        let global = parent * local;
        globals[index] = Some(global);
        global
    }
}

/// Local transforms of every joint at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub locals: Vec<Transform>,
}

impl Pose {
    pub fn rest(skeleton: &Skeleton) -> Self {
        Self {
            locals: skeleton.joints.iter().map(|j| j.rest).collect(),
        }
    }

    /// Blend a sampled value into joint `joint`. `t == 1` replaces it.
    pub fn blend(&mut self, joint: usize, sample: Sample, t: f32) {
        let Some(local) = self.locals.get_mut(joint) else {
            return;
        };
        match sample {
            Sample::Translation(v) => local.position = local.position.lerp(v, t),
            Sample::Scale(v) => local.scale = local.scale.lerp(v, t),
            Sample::Rotation(q) => local.rotation = local.rotation.slerp(q, t).normalize(),
        }
    }

    /// Skinning matrices: global joint transform times inverse bind matrix.
    pub fn joint_matrices(&self, skeleton: &Skeleton) -> Vec<Mat4> {
        skeleton
            .global_matrices(&self.locals)
            .into_iter()
            .zip(&skeleton.joints)
            .map(|(global, joint)| global * joint.inverse_bind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn chain() -> Skeleton {
        // hips at y=1, spine one unit above; listed child-first on purpose
        let hips = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
        let spine = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
        Skeleton {
            joints: vec![
                Joint {
                    name: Some("Spine".into()),
                    parent: Some(1),
                    rest: spine,
                    inverse_bind: Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0)),
                },
                Joint {
                    name: Some("Hips".into()),
                    parent: None,
                    rest: hips,
                    inverse_bind: Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)),
                },
            ],
            root: Mat4::IDENTITY,
        }
    }

    #[test]
    fn globals_resolve_out_of_order_parents() {
        let skeleton = chain();
        let globals = skeleton.global_matrices(&Pose::rest(&skeleton).locals);
        let spine_origin = globals[0].transform_point3(Vec3::ZERO);
        assert!(spine_origin.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn rest_pose_gives_identity_skinning() {
        let skeleton = chain();
        let matrices = Pose::rest(&skeleton).joint_matrices(&skeleton);
        for m in matrices {
            assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
        }
    }

    #[test]
    fn root_transform_applies_to_top_joints() {
        let mut skeleton = chain();
        skeleton.root = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let globals = skeleton.global_matrices(&Pose::rest(&skeleton).locals);
        let hips = globals[1].transform_point3(Vec3::ZERO);
        assert!(hips.abs_diff_eq(Vec3::new(5.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn blend_replaces_and_mixes() {
        let skeleton = chain();
        let mut pose = Pose::rest(&skeleton);
        pose.blend(1, Sample::Translation(Vec3::new(0.0, 3.0, 0.0)), 1.0);
        assert_eq!(pose.locals[1].position, Vec3::new(0.0, 3.0, 0.0));
        pose.blend(1, Sample::Translation(Vec3::new(0.0, 1.0, 0.0)), 0.5);
        assert_eq!(pose.locals[1].position, Vec3::new(0.0, 2.0, 0.0));
        pose.blend(1, Sample::Rotation(Quat::from_rotation_y(1.0)), 1.0);
        assert!(pose.locals[1].rotation.abs_diff_eq(Quat::from_rotation_y(1.0), 1e-6));
    }

    #[test]
    fn blend_ignores_unknown_joint() {
        let skeleton = chain();
        let mut pose = Pose::rest(&skeleton);
        pose.blend(9, Sample::Scale(Vec3::splat(2.0)), 1.0);
        assert_eq!(pose, Pose::rest(&skeleton));
    }

    #[test]
    fn find_joint_by_name() {
        let skeleton = chain();
        assert_eq!(skeleton.find_joint("Hips"), Some(1));
        assert_eq!(skeleton.find_joint("Head"), None);
    }
}
