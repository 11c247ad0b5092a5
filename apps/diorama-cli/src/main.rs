use anyhow::Context;
use clap::{Parser, Subcommand};
use diorama_input::{CameraPreset, SceneAction, action_for_key};
use diorama_kernel::{EngineLoop, World};
use diorama_render::DebugTextEngine;
use diorama_tools::SceneInspector;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diorama-cli", about = "Headless tools for the diorama scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, scene layout and key bindings
    Info,
    /// Run the scene headlessly and print where everything ended up
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u32,
        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: f64,
        /// Keys pressed before the first frame, e.g. `r,2`
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Model to load as the soldier
        #[arg(short, long)]
        model: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Also print the last rendered frame
        #[arg(long)]
        show_frame: bool,
    },
    /// List the animation clips of a model
    Clips {
        /// Path to a .glb or .gltf file
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => info(),
        Commands::Simulate {
            frames,
            fps,
            keys,
            model,
            json,
            show_frame,
        } => simulate(frames, fps, &keys, model, json, show_frame)?,
        Commands::Clips { path } => clips(&path)?,
    }

    Ok(())
}

fn info() {
    println!("diorama-cli v{}", env!("CARGO_PKG_VERSION"));
    let mut world = World::new(DebugTextEngine::new(1280, 720)).without_model();
    match world.initialize() {
        Ok(()) => {
            for node in SceneInspector::list_nodes(world.scene()) {
                println!("  {node}");
            }
        }
        Err(e) => println!("scene setup failed: {e}"),
    }

    println!("keys:");
    for key in ["i", "r", "t", "w"] {
        if let Some(SceneAction::ActivateAnimation(clip)) = action_for_key(key) {
            println!("  {key}  play {clip}");
        }
    }
    for preset in CameraPreset::ALL {
        let p = preset.position();
        println!(
            "  {}  camera {:?} at ({}, {}, {})",
            preset.key(),
            preset,
            p.x,
            p.y,
            p.z
        );
    }
}

fn simulate(
    frames: u32,
    fps: f64,
    keys: &[String],
    model: Option<PathBuf>,
    json: bool,
    show_frame: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(fps > 0.0, "fps must be positive, got {fps}");

    let world = World::new(DebugTextEngine::new(1280, 720)).without_model();
    let mut engine_loop = EngineLoop::new(world);
    engine_loop.initialize()?;

    if let Some(path) = model {
        match diorama_assets::load_model(&path) {
            Ok(asset) => engine_loop.world_mut().attach_model(asset),
            Err(e) => tracing::error!("could not load {}: {e}; continuing without it", path.display()),
        }
    }

    for key in keys {
        engine_loop.world_mut().key_down(key.trim());
    }

    let elapsed_ms = 1000.0 / fps;
    for _ in 0..frames {
        engine_loop.frame_with_elapsed(elapsed_ms)?;
    }
    tracing::info!(
        "simulated {} frames ({:.2}s)",
        engine_loop.frames(),
        engine_loop.world().engine().elapsed_ms() / 1000.0
    );

    if show_frame {
        print!("{}", engine_loop.world().engine().last_frame());
    }
    let summary = SceneInspector::summary(engine_loop.world());
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn clips(path: &Path) -> anyhow::Result<()> {
    let model = diorama_assets::load_model(path)
        .with_context(|| format!("loading {}", path.display()))?;
    println!(
        "{}: {} meshes, {} vertices, {} joints",
        path.display(),
        model.meshes.len(),
        model.vertex_count(),
        model.skeleton.len()
    );
    for clip in &model.clips {
        println!(
            "  {:<12} {:>6.2}s  {} tracks",
            clip.name,
            clip.duration,
            clip.tracks.len()
        );
    }
    Ok(())
}
