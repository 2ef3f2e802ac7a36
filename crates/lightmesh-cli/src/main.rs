//! Lightmesh CLI - Headless mesh-gradient rendering

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lightmesh_core::glyph::{GlyphSet, build_glyph_field};
use lightmesh_engine::{
    EngineConfig, FixedRate, FrameClock, RenderSession, RenderedFrame, Scene, StopHandle,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lightmesh")]
#[command(about = "Mesh gradients from shaped light sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single frame to an image file
    Render {
        /// Scene file (JSON); uses the default layout if not provided
        #[arg(short, long)]
        scene: Option<PathBuf>,

        /// Output image file (.png)
        #[arg(short, long, default_value = "gradient.png")]
        output: PathBuf,

        /// Image width (defaults to the config)
        #[arg(long)]
        width: Option<u32>,

        /// Image height (defaults to the config)
        #[arg(long)]
        height: Option<u32>,

        /// Animation time in seconds
        #[arg(long, default_value = "0")]
        time: f32,

        /// Render with the GPU backend instead of the CPU
        #[arg(long)]
        gpu: bool,
    },

    /// Render a numbered PNG sequence
    Animate {
        /// Scene file (JSON); uses the default layout if not provided
        #[arg(short, long)]
        scene: Option<PathBuf>,

        /// Number of frames
        #[arg(long, default_value = "60")]
        frames: u64,

        /// Frames per second of animation time (defaults to the config)
        #[arg(long)]
        fps: Option<f32>,

        /// Output directory
        #[arg(short, long, default_value = "frames")]
        output: PathBuf,

        /// Image width (defaults to the config)
        #[arg(long)]
        width: Option<u32>,

        /// Image height (defaults to the config)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Write the wordmark distance field as a grayscale image
    Glyph {
        /// Output image file (.png)
        #[arg(short, long, default_value = "glyph.png")]
        output: PathBuf,
    },

    /// Print the default scene as JSON
    Scene {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = load_config(cli.config.as_deref())?;
    init_logging(&config.log_level);
    if let Some(e) = config_error {
        tracing::warn!("Ignoring config file: {:#}", e);
    }

    match cli.command {
        Commands::Render {
            scene,
            output,
            width,
            height,
            time,
            gpu,
        } => {
            let config = sized(config, width, height);
            run_render(config, scene.as_deref(), &output, time, gpu)?;
        }
        Commands::Animate {
            scene,
            frames,
            fps,
            output,
            width,
            height,
        } => {
            let mut config = sized(config, width, height);
            if let Some(fps) = fps {
                config = config.with_fps(fps);
            }
            config.validate()?;
            run_animate(config, scene.as_deref(), frames, &output)?;
        }
        Commands::Glyph { output } => {
            run_glyph(&output)?;
        }
        Commands::Scene { output } => {
            run_scene(output.as_deref())?;
        }
    }

    Ok(())
}

/// An explicit config path must load; the default location is optional
fn load_config(path: Option<&Path>) -> Result<(EngineConfig, Option<anyhow::Error>)> {
    if let Some(path) = path {
        return Ok((EngineConfig::load_from(path)?, None));
    }

    match EngineConfig::default_path().filter(|p| p.exists()) {
        Some(path) => match EngineConfig::load_from(&path) {
            Ok(config) => Ok((config, None)),
            Err(e) => Ok((EngineConfig::default(), Some(e))),
        },
        None => Ok((EngineConfig::default(), None)),
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn sized(config: EngineConfig, width: Option<u32>, height: Option<u32>) -> EngineConfig {
    let width = width.unwrap_or(config.width);
    let height = height.unwrap_or(config.height);
    config.with_size(width, height)
}

fn open_session(config: EngineConfig, scene: Option<&Path>) -> Result<RenderSession> {
    let session = RenderSession::new(config)?;
    let Some(path) = scene else {
        return Ok(session);
    };

    println!("Loading scene: {}", path.display());
    let scene = Scene::load(path)?;
    Ok(session.with_scene(scene))
}

fn run_render(
    config: EngineConfig,
    scene: Option<&Path>,
    output: &Path,
    time: f32,
    gpu: bool,
) -> Result<()> {
    let (width, height) = config.size();
    println!(
        "Rendering to {} ({}x{})...",
        output.display(),
        width,
        height
    );

    let session = open_session(config, scene)?;
    let snapshot = session.snapshot_at(time)?;

    let img = if gpu {
        let renderer = lightmesh_gpu::GpuRenderer::headless(session.glyph())?;
        renderer.render_to_image(&snapshot, width, height)?
    } else {
        session.render_snapshot(&snapshot)?
    };

    img.save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Saved to: {}", output.display());

    Ok(())
}

fn run_animate(config: EngineConfig, scene: Option<&Path>, frames: u64, output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let fps = config.fps;
    let session = open_session(config, scene)?.with_clock(FrameClock::Stepped { fps });

    println!(
        "Rendering {} frames at {} fps to {}...",
        frames,
        fps,
        output.display()
    );

    let mut signal = FixedRate::unthrottled().take(frames);
    let written = session.run_loop(&mut signal, &StopHandle::new(), |frame: &RenderedFrame| {
        let path = output.join(format!("frame_{:04}.png", frame.index));
        tracing::debug!("Writing {} (t = {:.3}s)", path.display(), frame.time);
        frame.image.save(&path)
    })?;

    println!("Wrote {} frames", written);
    Ok(())
}

fn run_glyph(output: &Path) -> Result<()> {
    println!("Building glyph distance field...");
    let field = build_glyph_field(&GlyphSet::wordmark())?;

    field
        .distance_image()
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Saved {}x{} field to: {}",
        field.width(),
        field.height(),
        output.display()
    );

    Ok(())
}

fn run_scene(output: Option<&Path>) -> Result<()> {
    let json = Scene::default_layout().to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
