use crate::{AssetError, ModelAsset};
use diorama_animation::{
    AnimationClip, Interpolation, Joint, Skeleton, SkinnedMesh, Track, TrackValues,
};
use diorama_common::{Color, Transform};
use glam::{Mat4, Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use std::collections::HashMap;

/// Node hierarchy flattened out of the document.
struct Hierarchy {
    parents: Vec<Option<usize>>,
    locals: Vec<Transform>,
}

impl Hierarchy {
    fn new(document: &gltf::Document) -> Self {
        let count = document.nodes().count();
        let mut parents = vec![None; count];
        let mut locals = vec![Transform::default(); count];
        for node in document.nodes() {
            for child in node.children() {
                parents[child.index()] = Some(node.index());
            }
            let (t, r, s) = node.transform().decomposed();
            locals[node.index()] = Transform {
                position: Vec3::from_array(t),
                rotation: Quat::from_array(r).normalize(),
                scale: Vec3::from_array(s),
            };
        }
        Self { parents, locals }
    }

    fn global(&self, node: usize) -> Mat4 {
        let mut m = self.locals[node].matrix();
        let mut current = self.parents[node];
        let mut guard = 0;
        while let Some(parent) = current {
            m = self.locals[parent].matrix() * m;
            current = self.parents[parent];
            guard += 1;
            if guard > self.parents.len() {
                break;
            }
        }
        m
    }
}

pub(crate) fn convert(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<ModelAsset, AssetError> {
    let hierarchy = Hierarchy::new(document);
    let (skeleton, joint_of_node) = read_skeleton(document, buffers, &hierarchy);
    let meshes = read_meshes(document, buffers, &hierarchy, !skeleton.is_empty())?;
    if meshes.is_empty() {
        return Err(AssetError::NoMeshes);
    }
    let clips = read_clips(document, buffers, &joint_of_node);
    Ok(ModelAsset {
        meshes,
        skeleton,
        clips,
    })
}

fn read_skeleton(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    hierarchy: &Hierarchy,
) -> (Skeleton, HashMap<usize, usize>) {
    let Some(skin) = document.skins().next() else {
        return (Skeleton::default(), HashMap::new());
    };
    if document.skins().count() > 1 {
        tracing::warn!("model has several skins; only the first is used");
    }

    let joint_nodes: Vec<usize> = skin.joints().map(|n| n.index()).collect();
    let joint_of_node: HashMap<usize, usize> = joint_nodes
        .iter()
        .enumerate()
        .map(|(joint, node)| (*node, joint))
        .collect();

    let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
    let inverse_binds: Vec<Mat4> = reader
        .read_inverse_bind_matrices()
        .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
        .unwrap_or_default();

    let names: HashMap<usize, String> = document
        .nodes()
        .filter_map(|n| n.name().map(|name| (n.index(), name.to_string())))
        .collect();

    let mut root = Mat4::IDENTITY;
    let mut root_found = false;
    let joints: Vec<Joint> = joint_nodes
        .iter()
        .enumerate()
        .map(|(joint, &node)| {
            let parent_node = hierarchy.parents[node];
            let parent = parent_node.and_then(|p| joint_of_node.get(&p).copied());
            if parent.is_none() && !root_found {
                root = parent_node.map(|p| hierarchy.global(p)).unwrap_or(Mat4::IDENTITY);
                root_found = true;
            }
            Joint {
                name: names.get(&node).cloned(),
                parent,
                rest: hierarchy.locals[node],
                inverse_bind: inverse_binds.get(joint).copied().unwrap_or(Mat4::IDENTITY),
            }
        })
        .collect();

    (Skeleton { joints, root }, joint_of_node)
}

fn read_meshes(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    hierarchy: &Hierarchy,
    has_skeleton: bool,
) -> Result<Vec<SkinnedMesh>, AssetError> {
    let mut meshes = Vec::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let skinned_node = has_skeleton && node.skin().is_some();
        let global = hierarchy.global(node.index());
        let mesh_name = mesh
            .name()
            .or(node.name())
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::warn!("skipping non-triangle primitive in {mesh_name}");
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or_else(|| AssetError::MissingAttribute {
                    mesh: mesh_name.clone(),
                    attribute: "POSITION",
                })?
                .map(Vec3::from_array)
                .collect();
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|i| i.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());
            let normals: Vec<Vec3> = reader
                .read_normals()
                .map(|n| n.map(Vec3::from_array).collect())
                .unwrap_or_else(|| smooth_normals(&positions, &indices));

            let mut joints: Vec<[u16; 4]> = Vec::new();
            let mut weights: Vec<[f32; 4]> = Vec::new();
            if skinned_node {
                if let (Some(j), Some(w)) = (reader.read_joints(0), reader.read_weights(0)) {
                    joints = j.into_u16().collect();
                    weights = w.into_f32().collect();
                }
            }

            let factor = primitive.material().pbr_metallic_roughness().base_color_factor();
            let mut out = SkinnedMesh {
                name: Some(mesh_name.clone()),
                positions,
                normals,
                joints,
                weights,
                indices,
                base_color: Color::from_linear([factor[0], factor[1], factor[2]]),
            };

            if !out.is_skinned() {
                // rigid meshes are baked into model space
                out.joints.clear();
                out.weights.clear();
                for p in &mut out.positions {
                    *p = global.transform_point3(*p);
                }
                for n in &mut out.normals {
                    *n = global.transform_vector3(*n).normalize_or(*n);
                }
            }
            meshes.push(out);
        }
    }
    Ok(meshes)
}

fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.into_iter().map(|n| n.normalize_or(Vec3::Y)).collect()
}

fn read_clips(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    joint_of_node: &HashMap<usize, usize>,
) -> Vec<AnimationClip> {
    document
        .animations()
        .map(|animation| {
            let name = animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("animation_{}", animation.index()));
            let tracks = animation
                .channels()
                .filter_map(|channel| {
                    let joint = *joint_of_node.get(&channel.target().node().index())?;
                    let interpolation = match channel.sampler().interpolation() {
                        gltf::animation::Interpolation::Step => Interpolation::Step,
                        gltf::animation::Interpolation::Linear => Interpolation::Linear,
                        gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
                    };
                    let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
                    let times: Vec<f32> = reader.read_inputs()?.collect();
                    let values = match reader.read_outputs()? {
                        ReadOutputs::Translations(v) => TrackValues::Translation(
                            keep_values(v.map(Vec3::from_array), interpolation),
                        ),
                        ReadOutputs::Scales(v) => {
                            TrackValues::Scale(keep_values(v.map(Vec3::from_array), interpolation))
                        }
                        ReadOutputs::Rotations(v) => TrackValues::Rotation(keep_values(
                            v.into_f32().map(|q| Quat::from_array(q).normalize()),
                            interpolation,
                        )),
                        ReadOutputs::MorphTargetWeights(_) => return None,
                    };
                    Some(Track {
                        target_joint: joint,
                        interpolation,
                        times,
                        values,
                    })
                })
                .collect();
            AnimationClip::new(name, tracks)
        })
        .collect()
}

/// Cubic spline outputs store (in-tangent, value, out-tangent) triples.
fn keep_values<T>(values: impl Iterator<Item = T>, interpolation: Interpolation) -> Vec<T> {
    match interpolation {
        Interpolation::CubicSpline => values.skip(1).step_by(3).collect(),
        Interpolation::Step | Interpolation::Linear => values.collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::load_model_from_slice;
    use crate::testing::skinned_triangle_glb;
    use diorama_animation::{AnimationMixer, Pose};
    use glam::Vec3;

    #[test]
    fn skeleton_root_comes_from_armature() {
        let model = load_model_from_slice(&skinned_triangle_glb()).unwrap();
        let joint = &model.skeleton.joints[0];
        assert_eq!(joint.name.as_deref(), Some("Hips"));
        assert_eq!(joint.parent, None);
        let origin = model.skeleton.root.transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rest_pose_reproduces_bind_positions() {
        let model = load_model_from_slice(&skinned_triangle_glb()).unwrap();
        let matrices = Pose::rest(&model.skeleton).joint_matrices(&model.skeleton);
        let posed = model.meshes[0].skin(&matrices);
        for (a, b) in posed.positions.iter().zip(&model.meshes[0].positions) {
            assert!(a.abs_diff_eq(*b, 1e-6));
        }
    }

    #[test]
    fn clip_drives_the_mesh() {
        let model = load_model_from_slice(&skinned_triangle_glb()).unwrap();
        let mut mixer = AnimationMixer::new(model.clips.clone());
        let idle = mixer.clip_action("Idle").unwrap();
        mixer.action_mut(idle).unwrap().play();
        mixer.update(0.5);
        let pose = mixer.pose(&model.skeleton);
        let posed = model.meshes[0].skin(&pose.joint_matrices(&model.skeleton));
        assert!(posed.positions[0].abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn material_factor_becomes_base_color() {
        let model = load_model_from_slice(&skinned_triangle_glb()).unwrap();
        assert_eq!(model.meshes[0].base_color.to_hex(), 0xff0000);
        assert!(model.meshes[0].is_skinned());
    }

    #[test]
    fn normals_fall_back_to_smooth() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = super::smooth_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals, vec![Vec3::Z; 3]);
    }
}
