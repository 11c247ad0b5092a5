use glam::{Mat4, Quat, Vec3};

/// Perspective camera looking down its local -Z axis.
///
/// The projection matrix is cached and only recomputed by
/// [`PerspectiveCamera::update_projection_matrix`], so changes to `fov`,
/// `aspect`, `near` or `far` take effect after that call.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub rotation: Quat,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Orient the camera towards `target`. No-op when the camera sits on it.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() <= f32::EPSILON {
            tracing::debug!("look_at target {target} coincides with camera, keeping orientation");
            return;
        }
        let forward = forward.normalize();
        // looking straight up or down: pick another up vector
        let up = if forward.cross(Vec3::Y).length_squared() <= 1e-8 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_to_rh(self.position, forward, up);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }

    pub fn update_projection_matrix(&mut self) {
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            1.0
        };
        self.projection = Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far);
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}
