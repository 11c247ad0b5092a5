use crate::geometry::Geometry;
use crate::model::ModelInstance;
use diorama_common::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which faces of a mesh are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// Surface description. Only Blinn-Phong is supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Phong {
        color: Color,
        side: Side,
        shininess: f32,
    },
}

impl Material {
    pub fn phong(color: Color) -> Self {
        Self::Phong {
            color,
            side: Side::Front,
            shininess: 30.0,
        }
    }

    pub fn with_side(self, side: Side) -> Self {
        match self {
            Self::Phong {
                color, shininess, ..
            } => Self::Phong {
                color,
                side,
                shininess,
            },
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Phong { color, .. } => *color,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Self::Phong { side, .. } => *side,
        }
    }

    pub fn shininess(&self) -> f32 {
        match self {
            Self::Phong { shininess, .. } => *shininess,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Parallel light shining from `position` towards `target`.
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
        target: Vec3,
        cast_shadow: bool,
    },
    Ambient { color: Color, intensity: f32 },
}

impl Light {
    pub fn directional(color: Color, intensity: f32, position: Vec3) -> Self {
        Self::Directional {
            color,
            intensity,
            position,
            target: Vec3::ZERO,
            cast_shadow: false,
        }
    }

    pub fn ambient(color: Color) -> Self {
        Self::Ambient {
            color,
            intensity: 1.0,
        }
    }

    pub fn with_shadow(self, cast: bool) -> Self {
        match self {
            Self::Directional {
                color,
                intensity,
                position,
                target,
                ..
            } => Self::Directional {
                color,
                intensity,
                position,
                target,
                cast_shadow: cast,
            },
            ambient => ambient,
        }
    }
}

/// Payload of a scene node.
#[derive(Debug, Clone)]
pub enum SceneObject {
    Mesh {
        geometry: Geometry,
        material: Material,
        cast_shadow: bool,
        receive_shadow: bool,
    },
    Light(Light),
    /// X (red), Y (green) and Z (blue) axis lines from the origin.
    AxesHelper { size: f32 },
    Model(Box<ModelInstance>),
}

impl SceneObject {
    pub fn mesh(geometry: Geometry, material: Material) -> Self {
        Self::Mesh {
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mesh { geometry, .. } => geometry.kind(),
            Self::Light(Light::Directional { .. }) => "directional-light",
            Self::Light(Light::Ambient { .. }) => "ambient-light",
            Self::AxesHelper { .. } => "axes-helper",
            Self::Model(_) => "model",
        }
    }
}

/// Line segments of an axes helper: pairs of (position, color).
pub fn axes_lines(size: f32) -> [(Vec3, Color); 6] {
    let red = Color::rgb(1.0, 0.0, 0.0);
    let green = Color::rgb(0.0, 1.0, 0.0);
    let blue = Color::rgb(0.0, 0.0, 1.0);
    [
        (Vec3::ZERO, red),
        (Vec3::X * size, red),
        (Vec3::ZERO, green),
        (Vec3::Y * size, green),
        (Vec3::ZERO, blue),
        (Vec3::Z * size, blue),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phong_defaults() {
        let m = Material::phong(Color::WHITE);
        assert_eq!(m.side(), Side::Front);
        assert_eq!(m.shininess(), 30.0);
        assert_eq!(m.with_side(Side::Double).side(), Side::Double);
    }

    #[test]
    fn shadow_flag_only_on_directional() {
        let d = Light::directional(Color::WHITE, 0.6, Vec3::ONE).with_shadow(true);
        assert!(matches!(d, Light::Directional { cast_shadow: true, .. }));
        let a = Light::ambient(Color::WHITE).with_shadow(true);
        assert_eq!(a, Light::ambient(Color::WHITE));
    }

    #[test]
    fn axes_span_size() {
        let lines = axes_lines(3.0);
        assert_eq!(lines[1].0, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(lines[5].0, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn object_kinds() {
        let obj = SceneObject::mesh(Geometry::sphere(1.0), Material::phong(Color::BLACK));
        assert_eq!(obj.kind(), "sphere");
        assert_eq!(SceneObject::AxesHelper { size: 1.0 }.kind(), "axes-helper");
    }
}
