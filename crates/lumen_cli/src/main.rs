//! `lumen`: render the demo scenes and models to PNG.

mod config;
mod models;
mod scenes;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lumen_core::{Color, FrameBuffer, ImageTexture};
use lumen_gl::{ClearMask, Gl};
use lumen_tracer::{PassStatus, RayTracer, TextureRegistry};

use config::RenderConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Software ray tracer and rasterizer", long_about = None)]
struct Cli {
    /// JSON render configuration; flags override its fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ray trace a scene
    Trace(TraceArgs),
    /// Rasterize a model
    Raster(RasterArgs),
    /// List scenes, models and procedural textures
    List,
}

#[derive(Args, Debug, Default)]
struct FrameArgs {
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Output pixels per framebuffer pixel
    #[arg(short = 's', long)]
    scale: Option<u32>,
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TraceArgs {
    /// Scene name
    scene: Option<String>,
    #[command(flatten)]
    frame: FrameArgs,
    /// Maximum ray generation
    #[arg(short, long)]
    depth: Option<u32>,
    #[arg(long)]
    no_bbox: bool,
    #[arg(long)]
    no_shadows: bool,
    /// Stop after this many milliseconds and keep the partial image
    #[arg(long)]
    time_limit: Option<u64>,
}

#[derive(Args, Debug)]
struct RasterArgs {
    /// Model name
    model: Option<String>,
    #[command(flatten)]
    frame: FrameArgs,
    /// Image sampled by textured models
    #[arg(short, long)]
    texture: Option<PathBuf>,
    /// Triangle outline color, e.g. "#000000"
    #[arg(long)]
    border: Option<String>,
    /// Recolor back-facing triangles
    #[arg(long)]
    winding: bool,
}

impl FrameArgs {
    fn apply(self, config: &mut RenderConfig, output: impl FnOnce(&mut RenderConfig) -> &mut PathBuf) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(scale) = self.scale {
            config.pixel_scale = scale;
        }
        if let Some(path) = self.output {
            *output(config) = path;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    match cli.command {
        Command::Trace(args) => {
            if let Some(scene) = args.scene {
                config.scene = scene;
            }
            args.frame.apply(&mut config, |c| &mut c.trace_output);
            if args.depth.is_some() {
                config.ray_depth = args.depth;
            }
            config.use_bounding_box &= !args.no_bbox;
            config.compute_shadows &= !args.no_shadows;
            if args.time_limit.is_some() {
                config.time_limit_ms = args.time_limit;
            }
            config.validate()?;

            let fb = trace(&config)?;
            save_png(&fb, config.pixel_scale, &config.trace_output)
        }
        Command::Raster(args) => {
            if let Some(model) = args.model {
                config.model = model;
            }
            args.frame.apply(&mut config, |c| &mut c.raster_output);
            if args.texture.is_some() {
                config.texture = args.texture;
            }
            if args.border.is_some() {
                config.border = args.border;
            }
            config.winding_debug |= args.winding;
            config.validate()?;

            let fb = rasterize(&config)?;
            save_png(&fb, config.pixel_scale, &config.raster_output)
        }
        Command::List => {
            println!("scenes:   {}", scenes::demo_scenes().list_scenes().join(", "));
            println!("models:   {}", models::model_names().collect::<Vec<_>>().join(", "));
            println!("textures: {}", TextureRegistry::with_defaults().names().join(", "));
            Ok(())
        }
    }
}

/// Ray trace `config.scene` into a new framebuffer.
fn trace(config: &RenderConfig) -> Result<FrameBuffer> {
    let mut registry = scenes::demo_scenes();
    let scene = registry
        .get_scene_mut(&config.scene)
        .with_context(|| format!("Unknown scene {:?}", config.scene))?;
    if let Some(depth) = config.ray_depth {
        scene.ray_depth = depth;
    }
    scene.use_bounding_box = config.use_bounding_box;
    scene.compute_shadows = config.compute_shadows;
    let scene = &*scene;

    let textures = TextureRegistry::with_defaults();
    let tracer = RayTracer::new();
    if let Some(limit) = config.time_limit_ms {
        let handle = tracer.cancel_handle();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(limit));
            handle.request_stop();
        });
    }

    log::info!(
        "Tracing {:?} at {}x{} (depth {})",
        config.scene,
        config.width,
        config.height,
        scene.ray_depth
    );

    let mut fb = FrameBuffer::new(config.width, config.height);
    let mut pass = tracer.begin(scene, &textures, fb.width, fb.height)?;
    let mut last_reported = 0;
    let mut progress = |percent: u32| {
        if percent >= last_reported + 10 || percent == 100 {
            log::info!("{percent}%");
            last_reported = percent;
        }
    };

    loop {
        match pass.render_rows(&mut fb, config.rows_per_chunk.max(1), &mut progress)? {
            PassStatus::InProgress => continue,
            PassStatus::Finished => break,
            PassStatus::Cancelled => {
                log::warn!("Time limit hit after {} of {} rows", pass.rows_done(), fb.height);
                break;
            }
        }
    }
    drop(pass);

    Ok(fb)
}

/// Rasterize `config.model` into a new framebuffer cleared to gray.
fn rasterize(config: &RenderConfig) -> Result<FrameBuffer> {
    let mut fb = FrameBuffer::new(config.width, config.height);
    let mut gl = Gl::new();
    gl.set_background_color(Color::new(128.0, 128.0, 128.0));
    gl.clear(&mut fb, ClearMask::COLOR | ClearMask::DEPTH);

    if let Some(hex) = &config.border {
        let color = Color::from_hex(hex).with_context(|| format!("Bad border color {hex:?}"))?;
        gl.set_border(Some(color));
    }
    gl.enable_winding_debug(config.winding_debug);
    if let Some(path) = &config.texture {
        let texture = ImageTexture::load(path).with_context(|| format!("Texture {}", path.display()))?;
        gl.bind_texture(texture);
    }

    let stats = models::draw_model(&config.model, &mut gl, &mut fb)?;
    log::info!(
        "Drew {:?}: {} triangles ({} back-facing), {} fragments",
        config.model,
        stats.triangles,
        stats.back_facing,
        stats.fragments
    );
    Ok(fb)
}

fn save_png(fb: &FrameBuffer, pixel_scale: u32, path: &Path) -> Result<()> {
    let (width, height) = (fb.real_width(pixel_scale), fb.real_height(pixel_scale));
    let image = image::RgbaImage::from_raw(width, height, fb.get_image_data(pixel_scale))
        .context("Framebuffer image has the wrong size")?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {} ({}x{})", path.display(), width, height);
    Ok(())
}
