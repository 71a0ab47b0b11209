//! Sketch preview - renders the demo frame and optionally saves it as PNG.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use render::{RenderConfig, Renderer};
use sketch::{demo_frame, vignette};

/// Render the demo sketch
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML renderer configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame width in drawing units
    #[arg(long)]
    width: Option<f64>,

    /// Frame height in drawing units
    #[arg(long)]
    height: Option<f64>,

    /// Root random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Apply the vignette shader on the GPU
    #[arg(long)]
    shader: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Save the frame to this PNG file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => RenderConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Sketch preview v{}", sketch::VERSION);

    let config = args.render_config()?;
    let mut renderer = Renderer::new(config.clone());
    if let Some(seed) = args.seed {
        renderer = renderer.with_seed(seed);
    }
    if args.shader {
        renderer = renderer.with_gpu().await.context("no GPU available for --shader")?;
    }
    info!(seed = renderer.seed(), width = config.width, height = config.height, "rendering");

    let mut frame = demo_frame(&config);
    if args.shader {
        frame = frame.with_shader(vignette(1.2));
    }

    let mut canvas = renderer.new_canvas()?;
    let listeners = renderer.render(&mut canvas, &frame).await?;
    info!(listeners = listeners.len(), "frame complete");

    if let Some(path) = &args.output {
        canvas.save_png(path)?;
        info!("Saved frame to: {}", path.display());
    }

    Ok(())
}
