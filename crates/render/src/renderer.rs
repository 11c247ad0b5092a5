use crate::engine::{
    DEFAULT_CAMERA_ASPECT, DrawingBuffer, Engine, RenderError, clear_color, resize_to_display,
};
use diorama_scene::{PerspectiveCamera, Scene, SceneObject};
use std::fmt::Write;

/// Headless engine that renders a text description of each frame.
///
/// Follows the same resize and camera contract as the GPU engine, which makes
/// it usable from the CLI and in tests.
#[derive(Debug)]
pub struct DebugTextEngine {
    buffer: DrawingBuffer,
    display: (u32, u32),
    camera_aspect: f32,
    initialized: bool,
    shadows_enabled: bool,
    frames: u64,
    elapsed_ms: f64,
    last_frame: String,
}

impl DebugTextEngine {
    /// `width`/`height` is the initial display size. The drawing buffer
    /// starts at 300x150 until the first render syncs it.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: DrawingBuffer::new(300, 150),
            display: (width, height),
            camera_aspect: DEFAULT_CAMERA_ASPECT,
            initialized: false,
            shadows_enabled: false,
            frames: 0,
            elapsed_ms: 0.0,
            last_frame: String::new(),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Total time reported through [`Engine::update`].
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn drawing_buffer(&self) -> DrawingBuffer {
        self.buffer
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    fn describe(&self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        let mut out = String::new();
        let p = camera.position;
        let f = camera.forward();
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{}, clear #{:06x}) ===",
            self.frames,
            self.buffer.width,
            self.buffer.height,
            clear_color().to_hex()
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) dir=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}",
            p.x, p.y, p.z, f.x, f.y, f.z, camera.fov, camera.aspect
        );
        let _ = writeln!(out, "Nodes: {}", scene.len());
        for (id, node) in scene.nodes() {
            let t = node.transform.position;
            let (yaw, _, _) = node.transform.rotation.to_euler(glam::EulerRot::YXZ);
            let extra = match &node.object {
                SceneObject::Model(model) => format!(" verts={}", model.vertex_count()),
                _ => String::new(),
            };
            let _ = writeln!(
                out,
                "  {id} {:<8} {:<18} pos=({:.2}, {:.2}, {:.2}) yaw={:.1}{extra}",
                node.name.as_deref().unwrap_or("-"),
                node.object.kind(),
                t.x,
                t.y,
                t.z,
                yaw.to_degrees()
            );
        }
        out
    }
}

impl Engine for DebugTextEngine {
    fn initialize(&mut self) -> Result<(), RenderError> {
        self.shadows_enabled = true;
        self.initialized = true;
        tracing::debug!("debug text engine initialized");
        Ok(())
    }

    fn update(&mut self, elapsed_ms: f64) {
        self.elapsed_ms += elapsed_ms;
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &mut PerspectiveCamera,
    ) -> Result<(), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }
        resize_to_display(
            &mut self.buffer,
            self.display,
            &mut self.camera_aspect,
            camera,
        );
        self.frames += 1;
        self.last_frame = self.describe(scene, camera);
        Ok(())
    }

    fn camera_aspect(&self) -> f32 {
        self.camera_aspect
    }

    fn set_display_size(&mut self, width: u32, height: u32) {
        self.display = (width, height);
    }
}
