use crate::WorldError;
use crate::loader::ModelLoad;
use crate::motion::{Shuttle, Spin};
use diorama_animation::AnimationMixer;
use diorama_assets::ModelAsset;
use diorama_common::{Color, NodeId, Transform};
use diorama_input::{CameraPreset, SceneAction, action_for_key};
use diorama_render::Engine;
use diorama_scene::{
    Geometry, Light, Material, ModelInstance, PerspectiveCamera, Scene, SceneNode, SceneObject,
    Side,
};
use glam::Vec3;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const CAMERA_FOV: f32 = 75.0;
pub const CAMERA_ASPECT: f32 = 2.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 1.0, 5.0);
pub const CAMERA_SCENE_POSITION: Vec3 = Vec3::new(2.0, 2.0, 5.0);

pub const LIGHT_POSITION: Vec3 = Vec3::new(10.0, 10.0, -4.0);
pub const LIGHT_INTENSITY: f32 = 0.6;
pub const AMBIENT_COLOR: u32 = 0x404040;
pub const AXES_SIZE: f32 = 3.0;

pub const FLOOR_SIZE: f32 = 10.0;
pub const BOX_NAME: &str = "Box1";
pub const BOX_POSITION: Vec3 = Vec3::new(0.0, 0.5, 0.0);
pub const BOX_DEGREES_PER_SECOND: f32 = 180.0;
pub const SPHERE_NAME: &str = "Sphere1";
pub const SPHERE_RADIUS: f32 = 0.25;
pub const SPHERE_POSITION: Vec3 = Vec3::new(-1.0, 0.5, 0.0);
pub const SPHERE_TRAVEL: f32 = 3.0;

pub const SOLDIER_NAME: &str = "Soldier";
pub const SOLDIER_PATH: &str = "Soldier.glb";
pub const SOLDIER_POSITION: Vec3 = Vec3::new(2.0, 0.0, 0.0);
pub const DEFAULT_CLIP: &str = "Idle";

/// The demo scene: a floor, a spinning box, a shuttling sphere and an
/// animated soldier, drawn through an [`Engine`].
#[derive(Debug)]
pub struct World<E: Engine> {
    engine: E,
    scene: Scene,
    camera: PerspectiveCamera,
    objects: BTreeMap<String, NodeId>,
    spin: Spin,
    shuttle: Shuttle,
    soldier: Option<NodeId>,
    mixer: Option<AnimationMixer>,
    model_path: Option<PathBuf>,
    pending_model: Option<ModelLoad>,
}

impl<E: Engine> World<E> {
    /// A world that loads the soldier from `Soldier.glb` on initialize.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            scene: Scene::new(),
            camera: PerspectiveCamera::new(CAMERA_FOV, CAMERA_ASPECT, CAMERA_NEAR, CAMERA_FAR),
            objects: BTreeMap::new(),
            spin: Spin::new(BOX_DEGREES_PER_SECOND),
            shuttle: Shuttle::new(Vec3::Z, SPHERE_TRAVEL),
            soldier: None,
            mixer: None,
            model_path: Some(PathBuf::from(SOLDIER_PATH)),
            pending_model: None,
        }
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Skip the background model load. A model can still be attached later
    /// with [`World::attach_model`].
    pub fn without_model(mut self) -> Self {
        self.model_path = None;
        self
    }

    pub fn initialize(&mut self) -> Result<(), WorldError> {
        self.engine.initialize()?;
        self.create_perspective_camera();
        self.set_up_scene();
        if let Some(path) = self.model_path.clone() {
            self.pending_model = Some(ModelLoad::spawn(path));
        }
        Ok(())
    }

    fn create_perspective_camera(&mut self) {
        self.camera.look_at(Vec3::ZERO);
        self.camera.set_position(CAMERA_START);
        self.camera.update_projection_matrix();
    }

    fn set_up_scene(&mut self) {
        self.scene.add(
            SceneNode::new(SceneObject::Light(
                Light::directional(Color::WHITE, LIGHT_INTENSITY, LIGHT_POSITION).with_shadow(true),
            ))
            .with_transform(Transform::from_position(LIGHT_POSITION)),
        );
        self.scene.add(SceneNode::new(SceneObject::Light(Light::ambient(
            Color::from_hex(AMBIENT_COLOR),
        ))));

        self.camera.set_position(CAMERA_SCENE_POSITION);
        self.camera.look_at(Vec3::ZERO);
        self.camera.update_projection_matrix();

        self.scene
            .add(SceneNode::new(SceneObject::AxesHelper { size: AXES_SIZE }));

        let mut floor = Transform::default();
        floor.rotate_x(90f32.to_radians());
        self.scene.add(
            SceneNode::new(shadowed_mesh(
                Geometry::plane(FLOOR_SIZE, FLOOR_SIZE),
                Material::phong(named_color("lightslategray")).with_side(Side::Double),
                false,
            ))
            .named("Floor")
            .with_transform(floor),
        );

        self.add_object(
            BOX_NAME,
            shadowed_mesh(
                Geometry::cuboid(0.5, 1.0, 0.5),
                Material::phong(named_color("forestgreen")),
                true,
            ),
            Transform::from_position(BOX_POSITION),
        );
        self.add_object(
            SPHERE_NAME,
            shadowed_mesh(
                Geometry::sphere(SPHERE_RADIUS),
                Material::phong(named_color("darkviolet")),
                true,
            ),
            Transform::from_position(SPHERE_POSITION),
        );
        tracing::info!("scene ready with {} nodes", self.scene.len());
    }

    fn add_object(&mut self, name: &str, object: SceneObject, transform: Transform) -> NodeId {
        let id = self
            .scene
            .add(SceneNode::new(object).named(name).with_transform(transform));
        self.objects.insert(name.to_string(), id);
        id
    }

    /// Advance everything by `elapsed_ms` milliseconds.
    pub fn update(&mut self, elapsed_ms: f64) {
        let seconds = (elapsed_ms / 1000.0) as f32;
        self.engine.update(elapsed_ms);

        let spin = self.spin;
        if let Some(node) = self.object_node_mut(BOX_NAME) {
            spin.apply(&mut node.transform, seconds);
        }
        let mut shuttle = self.shuttle;
        if let Some(node) = self.object_node_mut(SPHERE_NAME) {
            shuttle.apply(&mut node.transform, seconds);
        }
        self.shuttle = shuttle;

        self.poll_model();
        self.animate(seconds);
    }

    fn object_node_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        let id = self.objects.get(name).copied()?;
        self.scene.get_mut(id)
    }

    fn poll_model(&mut self) {
        let Some(load) = &self.pending_model else {
            return;
        };
        let Some(result) = load.poll() else {
            return;
        };
        let path = load.path().display().to_string();
        self.pending_model = None;
        match result {
            Ok(asset) => self.attach_model(asset),
            Err(e) => tracing::error!("could not load {path}: {e}; continuing without it"),
        }
    }

    fn animate(&mut self, seconds: f32) {
        let (Some(mixer), Some(id)) = (self.mixer.as_mut(), self.soldier) else {
            return;
        };
        mixer.update(seconds);
        if let Some(SceneNode {
            object: SceneObject::Model(model),
            ..
        }) = self.scene.get_mut(id)
        {
            let pose = mixer.pose(&model.skeleton);
            model.apply_pose(&pose);
        }
    }

    /// Hook called between update and render.
    pub fn pre_render(&mut self) {}

    pub fn render(&mut self) -> Result<(), WorldError> {
        self.engine.render(&self.scene, &mut self.camera)?;
        Ok(())
    }

    /// Handle a key press given by its character, e.g. `"r"` or `"3"`.
    pub fn key_down(&mut self, key: &str) {
        tracing::debug!("key down: {key}");
        match action_for_key(key) {
            Some(SceneAction::ActivateAnimation(clip)) => {
                self.activate_action_by_name(&clip);
            }
            Some(SceneAction::CameraPreset(preset)) => self.apply_camera_preset(preset),
            None => {}
        }
    }

    /// Stop every clip and play `name`. Returns `false`, leaving the current
    /// animation untouched, when no model is loaded or it has no such clip.
    pub fn activate_action_by_name(&mut self, name: &str) -> bool {
        let Some(mixer) = self.mixer.as_mut() else {
            tracing::warn!("no model loaded, ignoring animation {name}");
            return false;
        };
        if !mixer.clip_names().contains(&name) {
            tracing::warn!("model has no animation named {name}");
            return false;
        }
        mixer.stop_all_actions();
        if let Some(action) = mixer.clip_action(name).and_then(|id| mixer.action_mut(id)) {
            action.play();
        }
        tracing::debug!("playing {name}");
        true
    }

    pub fn apply_camera_preset(&mut self, preset: CameraPreset) {
        self.camera.set_position(preset.position());
        self.camera.look_at(preset.target());
        self.camera.update_projection_matrix();
    }

    /// Place a loaded model as the soldier and start its idle animation.
    /// Replaces a previously attached model.
    pub fn attach_model(&mut self, asset: ModelAsset) {
        if let Some(old) = self.soldier.take() {
            self.scene.remove(old);
            self.objects.remove(SOLDIER_NAME);
        }

        let ModelAsset {
            meshes,
            skeleton,
            clips,
        } = asset;
        let mut model = ModelInstance::new(meshes, skeleton);
        model.cast_shadow = true;

        let mut transform = Transform::from_position(SOLDIER_POSITION);
        transform.rotate_y(180f32.to_radians());
        let id = self.add_object(SOLDIER_NAME, SceneObject::Model(Box::new(model)), transform);
        self.soldier = Some(id);

        let mixer = AnimationMixer::new(clips);
        tracing::info!("model animations: {}", mixer.clip_names().join(", "));
        self.mixer = Some(mixer);
        self.activate_action_by_name(DEFAULT_CLIP);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Node registered under `name` (`Box1`, `Sphere1`, `Soldier`).
    pub fn object(&self, name: &str) -> Option<&SceneNode> {
        self.objects.get(name).and_then(|id| self.scene.get(*id))
    }

    pub fn soldier_loaded(&self) -> bool {
        self.soldier.is_some()
    }

    pub fn is_model_pending(&self) -> bool {
        self.pending_model.is_some()
    }

    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    pub fn active_clips(&self) -> Vec<String> {
        self.mixer
            .as_ref()
            .map(|m| m.active_clip_names().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Rotation of the box around Y, in degrees.
    pub fn box_rotation_degrees(&self) -> f32 {
        self.object(BOX_NAME)
            .map(|n| n.transform.rotation.to_euler(glam::EulerRot::YXZ).0.to_degrees())
            .unwrap_or(0.0)
    }

    pub fn sphere_position(&self) -> Option<Vec3> {
        self.object(SPHERE_NAME).map(|n| n.transform.position)
    }
}

fn shadowed_mesh(geometry: Geometry, material: Material, cast_shadow: bool) -> SceneObject {
    SceneObject::Mesh {
        geometry,
        material,
        cast_shadow,
        receive_shadow: true,
    }
}

fn named_color(name: &str) -> Color {
    Color::named(name).unwrap_or(Color::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_animation::{
        AnimationClip, Interpolation, Joint, Skeleton, SkinnedMesh, Track, TrackValues,
    };
    use diorama_render::DebugTextEngine;
    use glam::Mat4;
    use std::time::{Duration, Instant};

    fn world() -> World<DebugTextEngine> {
        let mut world = World::new(DebugTextEngine::new(800, 600)).without_model();
        world.initialize().unwrap();
        world
    }

    fn clip(name: &str) -> AnimationClip {
        AnimationClip::new(
            name,
            vec![Track {
                target_joint: 0,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0],
                values: TrackValues::Translation(vec![Vec3::ZERO, Vec3::Y]),
            }],
        )
    }

    fn soldier_asset() -> ModelAsset {
        let mesh = SkinnedMesh {
            name: Some("Body".into()),
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            joints: vec![[0, 0, 0, 0]; 3],
            weights: vec![[1.0, 0.0, 0.0, 0.0]; 3],
            indices: vec![0, 1, 2],
            base_color: Color::WHITE,
        };
        let skeleton = Skeleton {
            joints: vec![Joint {
                name: Some("Hips".into()),
                parent: None,
                rest: Transform::default(),
                inverse_bind: Mat4::IDENTITY,
            }],
            root: Mat4::IDENTITY,
        };
        ModelAsset {
            meshes: vec![mesh],
            skeleton,
            clips: ["Idle", "Run", "TPose", "Walk"].into_iter().map(clip).collect(),
        }
    }

    fn soldier_model(world: &World<DebugTextEngine>) -> &ModelInstance {
        match &world.object(SOLDIER_NAME).unwrap().object {
            SceneObject::Model(model) => model,
            other => panic!("expected model, got {}", other.kind()),
        }
    }

    #[test]
    fn initialize_builds_scene() {
        let world = world();
        // two lights, axes, floor, box, sphere
        assert_eq!(world.scene().len(), 6);
        assert_eq!(world.object(BOX_NAME).unwrap().transform.position, BOX_POSITION);
        assert_eq!(world.sphere_position(), Some(SPHERE_POSITION));
        assert!(world.engine().shadows_enabled());
        assert!(!world.soldier_loaded());
        assert!(!world.is_model_pending());

        let floor = world.scene().find_by_name("Floor").unwrap();
        match &world.scene().get(floor).unwrap().object {
            SceneObject::Mesh {
                material,
                receive_shadow,
                ..
            } => {
                assert_eq!(material.side(), Side::Double);
                assert_eq!(material.color(), Color::from_hex(0x778899));
                assert!(*receive_shadow);
            }
            other => panic!("floor is {}", other.kind()),
        }
    }

    #[test]
    fn camera_ends_at_scene_position() {
        let world = world();
        let camera = world.camera();
        assert_eq!(camera.position, CAMERA_SCENE_POSITION);
        assert_eq!(camera.fov, CAMERA_FOV);
        let expected = (Vec3::ZERO - CAMERA_SCENE_POSITION).normalize();
        assert!(camera.forward().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn box_spins_half_turn_per_second() {
        let mut world = world();
        world.update(250.0);
        assert!((world.box_rotation_degrees() - 45.0).abs() < 1e-3);
        world.update(250.0);
        assert!((world.box_rotation_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn sphere_turns_around_after_three_units() {
        let mut world = world();
        for _ in 0..12 {
            world.update(250.0);
        }
        assert_eq!(world.sphere_position(), Some(Vec3::new(-1.0, 0.5, 3.0)));
        world.update(250.0);
        assert_eq!(world.sphere_position(), Some(Vec3::new(-1.0, 0.5, 2.75)));
    }

    #[test]
    fn zero_elapsed_changes_nothing() {
        let mut world = world();
        world.update(0.0);
        assert_eq!(world.sphere_position(), Some(SPHERE_POSITION));
        assert_eq!(world.box_rotation_degrees(), 0.0);
    }

    #[test]
    fn render_goes_through_engine() {
        let mut world = world();
        world.pre_render();
        world.render().unwrap();
        assert_eq!(world.engine().frames(), 1);
        assert!(world.engine().last_frame().contains(BOX_NAME));
        assert!((world.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn render_before_initialize_fails() {
        let mut world = World::new(DebugTextEngine::new(10, 10)).without_model();
        assert!(matches!(world.render(), Err(WorldError::Render(_))));
    }

    #[test]
    fn attach_model_starts_idle() {
        let mut world = world();
        world.attach_model(soldier_asset());
        assert!(world.soldier_loaded());
        assert_eq!(world.active_clips(), vec!["Idle".to_string()]);

        let node = world.object(SOLDIER_NAME).unwrap();
        assert_eq!(node.transform.position, SOLDIER_POSITION);
        let (yaw, _, _) = node.transform.rotation.to_euler(glam::EulerRot::YXZ);
        assert!((yaw.abs() - std::f32::consts::PI).abs() < 1e-4);
        assert!(soldier_model(&world).cast_shadow);
    }

    #[test]
    fn animation_keys_switch_clips() {
        let mut world = world();
        world.attach_model(soldier_asset());
        world.key_down("r");
        assert_eq!(world.active_clips(), vec!["Run".to_string()]);
        world.key_down("T");
        assert_eq!(world.active_clips(), vec!["TPose".to_string()]);
        world.key_down("w");
        world.key_down("I");
        assert_eq!(world.active_clips(), vec!["Idle".to_string()]);
    }

    #[test]
    fn unknown_clip_keeps_current_animation() {
        let mut world = world();
        let mut asset = soldier_asset();
        asset.clips.retain(|c| c.name != "Run");
        world.attach_model(asset);
        assert!(!world.activate_action_by_name("Run"));
        assert_eq!(world.active_clips(), vec!["Idle".to_string()]);
    }

    #[test]
    fn animation_key_without_model_is_ignored() {
        let mut world = world();
        world.key_down("r");
        assert!(world.active_clips().is_empty());
        assert!(!world.activate_action_by_name("Idle"));
    }

    #[test]
    fn update_reskins_the_soldier() {
        let mut world = world();
        world.attach_model(soldier_asset());
        world.update(500.0);
        let model = soldier_model(&world);
        assert_eq!(model.generation(), 1);
        assert!(model.posed()[0].positions[0].abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-5));
    }

    #[test]
    fn attach_twice_replaces_soldier() {
        let mut world = world();
        world.attach_model(soldier_asset());
        world.attach_model(soldier_asset());
        let models = world
            .scene()
            .nodes()
            .filter(|(_, n)| matches!(n.object, SceneObject::Model(_)))
            .count();
        assert_eq!(models, 1);
    }

    #[test]
    fn camera_presets_look_at_origin() {
        let mut world = world();
        for preset in CameraPreset::ALL {
            world.key_down(preset.key());
            assert_eq!(world.camera().position, preset.position());
            let expected = (-preset.position()).normalize();
            assert!(world.camera().forward().abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn unbound_keys_do_nothing() {
        let mut world = world();
        let before = world.camera().clone();
        world.key_down("x");
        world.key_down("9");
        assert_eq!(world.camera(), &before);
    }

    #[test]
    fn missing_model_file_is_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = World::new(DebugTextEngine::new(64, 64))
            .with_model_path(dir.path().join("Soldier.glb"));
        world.initialize().unwrap();
        assert!(world.is_model_pending());

        let deadline = Instant::now() + Duration::from_secs(10);
        while world.is_model_pending() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            world.update(16.0);
        }
        assert!(!world.is_model_pending());
        assert!(!world.soldier_loaded());
        // the rest of the scene keeps running
        world.render().unwrap();
    }

    #[test]
    fn background_load_attaches_soldier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Soldier.glb");
        std::fs::write(&path, diorama_assets::testing::skinned_triangle_glb()).unwrap();

        let mut world = World::new(DebugTextEngine::new(64, 64)).with_model_path(path);
        world.initialize().unwrap();
        assert!(world.is_model_pending());

        let deadline = Instant::now() + Duration::from_secs(10);
        while !world.soldier_loaded() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            world.update(16.0);
        }
        assert!(world.soldier_loaded());
        assert!(!world.is_model_pending());
        assert_eq!(world.active_clips(), vec!["Idle".to_string()]);
        assert_eq!(world.scene().len(), 7);

        let node = world.object(SOLDIER_NAME).unwrap();
        assert_eq!(node.transform.position, SOLDIER_POSITION);
        world.render().unwrap();
    }
}
