use anyhow::Result;
use clap::Parser;
use diorama_kernel::{EngineLoop, World};
use diorama_render::Engine;
use diorama_render_wgpu::{Overlay, OverlayTarget, WgpuEngine};
use diorama_tools::{SceneInspector, SceneSummary};
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "diorama-desktop", about = "Diorama scene in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Model loaded as the soldier
    #[arg(long, default_value = "Soldier.glb")]
    model: PathBuf,

    /// Initial window width
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height
    #[arg(long, default_value = "720")]
    height: u32,
}

/// Tessellated egui output waiting to be drawn over the next frame.
struct PreparedUi {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// Draws the inspector panel on top of the scene.
#[derive(Default)]
struct EguiOverlay {
    renderer: Option<egui_wgpu::Renderer>,
    pending: Option<PreparedUi>,
}

impl Overlay for EguiOverlay {
    fn draw(&mut self, target: OverlayTarget<'_>) {
        let Some(ui) = self.pending.take() else {
            return;
        };
        let renderer = self.renderer.get_or_insert_with(|| {
            egui_wgpu::Renderer::new(target.device, target.format, None, 1, false)
        });
        let encoder = target.encoder;

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: target.size_in_pixels,
            pixels_per_point: ui.pixels_per_point,
        };
        for (id, image_delta) in &ui.textures_delta.set {
            renderer.update_texture(target.device, target.queue, *id, image_delta);
        }
        renderer.update_buffers(
            target.device,
            target.queue,
            encoder,
            &ui.paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            renderer.render(&mut pass, &ui.paint_jobs, &screen_descriptor);
        }
        for id in &ui.textures_delta.free {
            renderer.free_texture(id);
        }
    }
}

type DesktopLoop = EngineLoop<WgpuEngine<EguiOverlay>>;

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    engine_loop: Option<DesktopLoop>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    show_overlay: bool,
}

impl App {
    fn new(cli: Cli) -> Self {
        Self {
            cli,
            window: None,
            engine_loop: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            show_overlay: true,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Diorama")
            .with_inner_size(PhysicalSize::new(self.cli.width, self.cli.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| anyhow::anyhow!("create window: {e}"))?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let size = window.inner_size();
        let engine = WgpuEngine::with_overlay(
            instance,
            surface,
            (size.width, size.height),
            EguiOverlay::default(),
        );
        let world = World::new(engine).with_model_path(self.cli.model.clone());
        let mut engine_loop = EngineLoop::new(world);
        engine_loop.initialize()?;

        self.egui_winit = Some(egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        ));
        self.engine_loop = Some(engine_loop);
        self.window = Some(window);
        Ok(())
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::F1) => self.show_overlay = !self.show_overlay,
            Key::Character(text) => {
                if let Some(engine_loop) = &mut self.engine_loop {
                    engine_loop.world_mut().key_down(text.as_str());
                }
            }
            _ => {}
        }
    }

    /// Run egui for this frame and hand the result to the overlay.
    fn prepare_ui(&mut self) {
        let (Some(window), Some(egui_winit), Some(engine_loop)) =
            (&self.window, &mut self.egui_winit, &mut self.engine_loop)
        else {
            return;
        };

        let summary = SceneInspector::summary(engine_loop.world());
        let show = self.show_overlay;
        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if show {
                draw_ui(ctx, &summary);
            }
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        engine_loop.world_mut().engine_mut().overlay_mut().pending = Some(PreparedUi {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        });
    }
}

fn draw_ui(ctx: &EguiContext, summary: &SceneSummary) {
    egui::Window::new("Diorama")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            let [x, y, z] = summary.camera_position;
            ui.label(format!("Nodes: {}", summary.node_count));
            ui.label(format!(
                "Camera: ({x:.1}, {y:.1}, {z:.1})  aspect {:.2}",
                summary.camera_aspect
            ));
            ui.label(format!("Box1 yaw: {:.0}°", summary.box_rotation_degrees));
            if let Some([x, y, z]) = summary.sphere_position {
                ui.label(format!("Sphere1: ({x:.2}, {y:.2}, {z:.2})"));
            }
            ui.separator();
            if summary.soldier_loaded {
                ui.label(format!("Soldier: {}", summary.active_clips.join(", ")));
            } else {
                ui.label("Soldier: loading or unavailable");
            }
            ui.separator();
            ui.small("I/R/T/W: Idle, Run, TPose, Walk");
            ui.small("1-5: camera presets | F1: toggle panel");
        });
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            tracing::error!("failed to start: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(engine_loop) = &mut self.engine_loop {
                    engine_loop
                        .world_mut()
                        .engine_mut()
                        .set_display_size(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(&event);
            }
            WindowEvent::RedrawRequested => {
                self.prepare_ui();
                if let Some(engine_loop) = &mut self.engine_loop {
                    if let Err(e) = engine_loop.frame(Instant::now()) {
                        tracing::error!("frame failed: {e}");
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("diorama-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
