use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a node in the scene graph.
///
/// Handles are allocated sequentially by the scene and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotate around the local Y axis.
    pub fn rotate_y(&mut self, radians: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(radians)).normalize();
    }

    /// Rotate around the local X axis.
    pub fn rotate_x(&mut self, radians: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_x(radians)).normalize();
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decompose an affine matrix. Shear is dropped.
    pub fn from_matrix(m: Mat4) -> Self {
        let (scale, rotation, position) = m.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn rotate_y_accumulates() {
        let mut t = Transform::default();
        t.rotate_y(90f32.to_radians());
        t.rotate_y(90f32.to_radians());
        let forward = t.rotation * Vec3::Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn rotate_is_local() {
        // Pitch the frame first, then yaw: the yaw must use the pitched Y axis.
        let mut t = Transform::default();
        t.rotate_x(90f32.to_radians());
        t.rotate_y(90f32.to_radians());
        let expected = Quat::from_rotation_x(90f32.to_radians())
            * Quat::from_rotation_y(90f32.to_radians());
        assert!(t.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn matrix_round_trips_through_decompose() {
        let t = Transform {
            position: Vec3::new(2.0, 0.0, -1.0),
            rotation: Quat::from_rotation_y(1.0),
            scale: Vec3::splat(0.5),
        };
        let back = Transform::from_matrix(t.matrix());
        assert!(back.position.abs_diff_eq(t.position, 1e-5));
        assert!(back.scale.abs_diff_eq(t.scale, 1e-5));
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
