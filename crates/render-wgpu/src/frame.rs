use bytemuck::{Pod, Zeroable};
use diorama_common::{Color, Transform};
use diorama_scene::{Light, Material, PerspectiveCamera, Scene, SceneObject, Side, axes_lines};
use glam::{Mat4, Vec3};

pub const SHADOW_MAP_SIZE: u32 = 1024;
/// Half extent of the orthographic box the shadow map covers.
pub const SHADOW_EXTENT: f32 = 5.0;
pub const SHADOW_NEAR: f32 = 0.5;
pub const SHADOW_FAR: f32 = 500.0;
/// Directional lights beyond this count are not shaded.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Shininess used for model meshes, which carry no Phong material.
const MODEL_SHININESS: f32 = 30.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub ambient: [f32; 4],
    /// x: number of directional lights in use
    pub light_count: [u32; 4],
    /// xyz: direction towards the light, w: 1 on the shadow-casting light
    pub light_directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub light_colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Orthographic view-projection of a directional light shining from
/// `position` towards `target`.
pub(crate) fn light_view_projection(position: Vec3, target: Vec3) -> Mat4 {
    let direction = (target - position).normalize_or(Vec3::NEG_Y);
    let up = if direction.cross(Vec3::Y).length_squared() <= 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_to_rh(position, direction, up);
    let projection = Mat4::orthographic_rh(
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        SHADOW_NEAR,
        SHADOW_FAR,
    );
    projection * view
}

/// Per-frame uniforms: camera, summed ambient lights and up to
/// [`MAX_DIRECTIONAL_LIGHTS`] directional lights. The shadow map follows the
/// first directional light that casts shadows.
pub(crate) fn scene_uniforms(scene: &Scene, camera: &PerspectiveCamera) -> SceneUniforms {
    let mut ambient = Vec3::ZERO;
    let mut light_directions = [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS];
    let mut light_colors = [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS];
    let mut count = 0;
    let mut light_view_proj = Mat4::IDENTITY;
    let mut shadow_assigned = false;

    for (_, node) in scene.nodes() {
        match node.object {
            SceneObject::Light(Light::Ambient { color, intensity }) => {
                ambient += Vec3::from(color.to_linear()) * intensity;
            }
            SceneObject::Light(Light::Directional {
                color,
                intensity,
                position,
                target,
                cast_shadow,
            }) => {
                if count == MAX_DIRECTIONAL_LIGHTS {
                    tracing::debug!("directional light beyond {MAX_DIRECTIONAL_LIGHTS} ignored");
                    continue;
                }
                let casts = cast_shadow && !shadow_assigned;
                if casts {
                    light_view_proj = light_view_projection(position, target);
                    shadow_assigned = true;
                }
                let towards_light = (position - target).normalize_or(Vec3::Y);
                let shadow = if casts { 1.0 } else { 0.0 };
                light_directions[count] = towards_light.extend(shadow).to_array();
                light_colors[count] = (Vec3::from(color.to_linear()) * intensity)
                    .extend(1.0)
                    .to_array();
                count += 1;
            }
            _ => {}
        }
    }

    SceneUniforms {
        view_proj: camera.view_projection().to_cols_array_2d(),
        light_view_proj: light_view_proj.to_cols_array_2d(),
        camera_position: camera.position.extend(1.0).to_array(),
        ambient: ambient.extend(1.0).to_array(),
        light_count: [count as u32, 0, 0, 0],
        light_directions,
        light_colors,
    }
}

pub(crate) fn mesh_object_uniforms(
    transform: &Transform,
    material: &Material,
    receive_shadow: bool,
) -> ObjectUniforms {
    object_uniforms(
        transform,
        material.color(),
        material.shininess(),
        material.side() == Side::Double,
        receive_shadow,
    )
}

pub(crate) fn model_object_uniforms(
    transform: &Transform,
    color: Color,
    receive_shadow: bool,
) -> ObjectUniforms {
    object_uniforms(transform, color, MODEL_SHININESS, false, receive_shadow)
}

fn object_uniforms(
    transform: &Transform,
    color: Color,
    shininess: f32,
    double_sided: bool,
    receive_shadow: bool,
) -> ObjectUniforms {
    let flag = |on: bool| if on { 1.0 } else { 0.0 };
    let [r, g, b] = color.to_linear();
    ObjectUniforms {
        model: transform.matrix().to_cols_array_2d(),
        color: [r, g, b, 1.0],
        params: [shininess.max(1.0), flag(double_sided), flag(receive_shadow), 0.0],
    }
}

pub(crate) fn vertices(positions: &[Vec3], normals: &[Vec3]) -> Vec<Vertex> {
    positions
        .iter()
        .zip(normals.iter().chain(std::iter::repeat(&Vec3::Y)))
        .map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect()
}

/// Axes helper lines, already placed in world space.
pub(crate) fn axes_vertices(size: f32, transform: &Transform) -> Vec<LineVertex> {
    let matrix = transform.matrix();
    axes_lines(size)
        .into_iter()
        .map(|(position, color)| {
            let [r, g, b] = color.to_linear();
            LineVertex {
                position: matrix.transform_point3(position).to_array(),
                color: [r, g, b, 1.0],
            }
        })
        .collect()
}
