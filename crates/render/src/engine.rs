use diorama_common::Color;
use diorama_scene::{PerspectiveCamera, Scene};

/// Background color used when clearing the frame.
pub const CLEAR_COLOR: u32 = 0x000000;

/// Camera aspect reported before the first resize check.
pub const DEFAULT_CAMERA_ASPECT: f32 = 2.0;

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("engine used before initialize()")]
    NotInitialized,
    #[error("no suitable graphics adapter")]
    NoAdapter,
    #[error("device request failed: {0}")]
    Device(String),
    #[error("surface error: {0}")]
    Surface(String),
}

/// A renderer wrapped with resize-on-demand behavior.
///
/// Engines never mutate the scene. They may adjust the camera aspect and
/// projection when the display size changes.
pub trait Engine {
    /// Prepare the renderer: clear color, shadow maps, GPU resources.
    fn initialize(&mut self) -> Result<(), RenderError>;

    /// Per-frame hook, called before the world updates its objects.
    fn update(&mut self, elapsed_ms: f64);

    /// Resize if the display changed, fix up the camera, then draw.
    fn render(
        &mut self,
        scene: &Scene,
        camera: &mut PerspectiveCamera,
    ) -> Result<(), RenderError>;

    /// Aspect ratio of the display at the last resize check.
    fn camera_aspect(&self) -> f32;

    /// Report the size the output is displayed at, in pixels.
    fn set_display_size(&mut self, width: u32, height: u32);
}

/// Tracks the drawing buffer size against the size it is displayed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingBuffer {
    pub width: u32,
    pub height: u32,
}

impl DrawingBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Adopt the display size. Returns `true` if the buffer had to change.
    pub fn sync_to_display(&mut self, display_width: u32, display_height: u32) -> bool {
        let need_resize = self.width != display_width || self.height != display_height;
        if need_resize {
            tracing::debug!(
                "drawing buffer {}x{} -> {}x{}",
                self.width,
                self.height,
                display_width,
                display_height
            );
            self.width = display_width;
            self.height = display_height;
        }
        need_resize
    }

    /// Width over height, with zero dimensions clamped to one pixel.
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

/// Shared resize step of [`Engine::render`].
///
/// Syncs `buffer` to the display, stores the display aspect in
/// `camera_aspect`, and on resize pushes it into the camera projection.
pub fn resize_to_display(
    buffer: &mut DrawingBuffer,
    display: (u32, u32),
    camera_aspect: &mut f32,
    camera: &mut PerspectiveCamera,
) -> bool {
    let resized = buffer.sync_to_display(display.0, display.1);
    *camera_aspect = buffer.aspect();
    if resized {
        camera.aspect = buffer.aspect();
        camera.update_projection_matrix();
    }
    resized
}

pub fn clear_color() -> Color {
    Color::from_hex(CLEAR_COLOR)
}
