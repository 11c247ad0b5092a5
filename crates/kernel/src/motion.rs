use diorama_common::Transform;
use glam::Vec3;

/// Constant-rate rotation around an object's local Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub degrees_per_second: f32,
}

impl Spin {
    pub fn new(degrees_per_second: f32) -> Self {
        Self { degrees_per_second }
    }

    pub fn apply(&self, transform: &mut Transform, elapsed_seconds: f32) {
        let delta_radians = (self.degrees_per_second * elapsed_seconds).to_radians();
        transform.rotate_y(delta_radians);
    }
}

/// Back-and-forth motion along a direction at one unit per second.
///
/// The direction flips once the distance travelled since the last flip
/// reaches `distance_to_move`. The step that triggers the flip is still
/// applied in the old direction, and the overshoot is not carried over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shuttle {
    direction: Vec3,
    distance_moved: f32,
    distance_to_move: f32,
}

impl Shuttle {
    pub fn new(direction: Vec3, distance_to_move: f32) -> Self {
        Self {
            direction,
            distance_moved: 0.0,
            distance_to_move,
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn distance_moved(&self) -> f32 {
        self.distance_moved
    }

    /// Advance by `elapsed_seconds` and return the displacement to apply.
    pub fn step(&mut self, elapsed_seconds: f32) -> Vec3 {
        let delta = self.direction * elapsed_seconds;
        self.distance_moved += delta.length();
        if self.distance_moved >= self.distance_to_move {
            self.direction = -self.direction;
            self.distance_moved = 0.0;
        }
        delta
    }

    pub fn apply(&mut self, transform: &mut Transform, elapsed_seconds: f32) {
        transform.position += self.step(elapsed_seconds);
    }
}

impl Default for Shuttle {
    fn default() -> Self {
        Self::new(Vec3::Z, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn spin_half_turn_per_second() {
        let spin = Spin::new(180.0);
        let mut t = Transform::default();
        spin.apply(&mut t, 0.5);
        spin.apply(&mut t, 0.5);
        let expected = Quat::from_rotation_y(std::f32::consts::PI);
        assert!(t.rotation.abs_diff_eq(expected, 1e-5) || t.rotation.abs_diff_eq(-expected, 1e-5));
    }

    #[test]
    fn spin_zero_elapsed_is_identity() {
        let spin = Spin::new(180.0);
        let mut t = Transform::default();
        spin.apply(&mut t, 0.0);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn shuttle_flips_after_distance() {
        let mut shuttle = Shuttle::new(Vec3::Z, 3.0);
        let mut t = Transform::default();
        shuttle.apply(&mut t, 1.0);
        shuttle.apply(&mut t, 1.0);
        assert_eq!(shuttle.direction(), Vec3::Z);
        // third second reaches the distance: moves forward, then flips
        shuttle.apply(&mut t, 1.0);
        assert_eq!(t.position, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(shuttle.direction(), Vec3::NEG_Z);
        assert_eq!(shuttle.distance_moved(), 0.0);

        shuttle.apply(&mut t, 1.0);
        assert_eq!(t.position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn shuttle_overshoot_is_not_carried() {
        let mut shuttle = Shuttle::new(Vec3::Z, 3.0);
        let mut t = Transform::default();
        shuttle.apply(&mut t, 2.5);
        shuttle.apply(&mut t, 2.5);
        // 5 units forward in total, then the travel counter restarts at zero
        assert_eq!(t.position.z, 5.0);
        assert_eq!(shuttle.distance_moved(), 0.0);
        shuttle.apply(&mut t, 2.5);
        assert_eq!(t.position.z, 2.5);
        assert_eq!(shuttle.direction(), Vec3::NEG_Z);
    }

    #[test]
    fn shuttle_returns_to_start_with_even_steps() {
        let mut shuttle = Shuttle::new(Vec3::Z, 3.0);
        let mut t = Transform::from_position(Vec3::new(-1.0, 0.5, 0.0));
        for _ in 0..24 {
            shuttle.apply(&mut t, 0.25);
        }
        assert_eq!(t.position, Vec3::new(-1.0, 0.5, 0.0));
        assert_eq!(shuttle.direction(), Vec3::Z);
    }

    #[test]
    fn default_distance_is_two() {
        let mut shuttle = Shuttle::default();
        shuttle.step(2.0);
        assert_eq!(shuttle.direction(), Vec3::NEG_Z);
    }
}
