/// WGSL shader for lit meshes: Blinn-Phong over up to four directional
/// lights, an ambient term and a shadow map for the casting light.
pub const PHONG_SHADER: &str = r#"
struct SceneUniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    // x: number of directional lights
    light_count: vec4<u32>,
    // xyz: direction towards the light, w: 1 on the shadow-casting light
    light_directions: array<vec4<f32>, 4>,
    light_colors: array<vec4<f32>, 4>,
};

struct ObjectUniforms {
    model: mat4x4<f32>,
    color: vec4<f32>,
    // x: shininess, y: double sided, z: receives shadow
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: SceneUniforms;
@group(0) @binding(1)
var shadow_map: texture_depth_2d;
@group(0) @binding(2)
var shadow_sampler: sampler_comparison;

@group(1) @binding(0)
var<uniform> mesh: ObjectUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) light_space: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = mesh.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = (mesh.model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.light_space = frame.light_view_proj * world_pos;
    return out;
}

fn shadow_factor(light_space: vec4<f32>) -> f32 {
    let ndc = light_space.xyz / light_space.w;
    let uv = vec2<f32>(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5);
    if (uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 || ndc.z > 1.0) {
        return 1.0;
    }
    return textureSampleCompareLevel(shadow_map, shadow_sampler, uv, ndc.z - 0.002);
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front_facing: bool) -> @location(0) vec4<f32> {
    var normal = normalize(in.world_normal);
    if (!front_facing && mesh.params.y > 0.5) {
        normal = -normal;
    }

    let view_dir = normalize(frame.camera_position.xyz - in.world_position);
    var color = mesh.color.rgb * frame.ambient.rgb;

    for (var i = 0u; i < min(frame.light_count.x, 4u); i = i + 1u) {
        let light = frame.light_directions[i];
        let light_dir = normalize(light.xyz);
        let half_dir = normalize(light_dir + view_dir);

        var visibility = 1.0;
        if (light.w > 0.5 && mesh.params.z > 0.5) {
            visibility = shadow_factor(in.light_space);
        }

        let diffuse = max(dot(normal, light_dir), 0.0);
        let specular = pow(max(dot(normal, half_dir), 0.0), mesh.params.x) * 0.067;
        let direct = frame.light_colors[i].rgb * (mesh.color.rgb * diffuse + vec3<f32>(specular));
        color = color + direct * visibility;
    }
    return vec4<f32>(color, mesh.color.a);
}
"#;

/// Depth-only shader rendering shadow casters from the light.
pub const SHADOW_SHADER: &str = r#"
struct SceneUniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    light_count: vec4<u32>,
    light_directions: array<vec4<f32>, 4>,
    light_colors: array<vec4<f32>, 4>,
};

struct ObjectUniforms {
    model: mat4x4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: SceneUniforms;

@group(1) @binding(0)
var<uniform> mesh: ObjectUniforms;

@vertex
fn vs_shadow(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return frame.light_view_proj * mesh.model * vec4<f32>(position, 1.0);
}
"#;

/// WGSL shader for unlit colored lines (the axes helper).
pub const LINE_SHADER: &str = r#"
struct SceneUniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    light_count: vec4<u32>,
    light_directions: array<vec4<f32>, 4>,
    light_colors: array<vec4<f32>, 4>,
};

@group(0) @binding(0)
var<uniform> frame: SceneUniforms;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = frame.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
