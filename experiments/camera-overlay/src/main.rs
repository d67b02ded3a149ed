mod window;

use anyhow::Context;
use clap::Parser;
use limn_base::{init_logger, log_fatal};
use limn_pose::{ProcessEstimator, Threshold};
use limn_render::{RgbSurface, load_font};
use limn_session::{Session, SessionConfig, SessionError, TeardownReport};
use limn_video::V4l2Source;
use std::path::PathBuf;
use window::WindowPresenter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Live camera view with a pose overlay")]
struct Args {
    /// Session config (JSON). Unset fields take defaults.
    #[arg(short, long, env = "LIMN_CONFIG")]
    config: Option<PathBuf>,

    /// Camera device, e.g. /dev/video0
    #[arg(long)]
    device: Option<String>,

    /// Keypoints at or below this confidence are not drawn
    #[arg(long)]
    threshold: Option<f32>,

    /// Detector program speaking the stdio detection protocol
    #[arg(long)]
    detector: Option<String>,

    /// Argument passed to the detector, repeatable
    #[arg(long = "detector-arg", allow_hyphen_values = true)]
    detector_args: Vec<String>,

    /// Label font (TTF/OTF)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write logs into this directory instead of stdout
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn build_config(args: &Args) -> anyhow::Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(device) = &args.device {
        config.capture = config.capture.with_device(device.clone());
    }
    if let Some(threshold) = args.threshold {
        config.overlay.threshold = Threshold::new(threshold).context("invalid --threshold")?;
    }
    if let Some(program) = &args.detector {
        config.detector.program = program.clone();
        config.detector.args = args.detector_args.clone();
    }
    if let Some(font) = &args.font {
        config.overlay.font = Some(font.clone());
    }
    if let Some(dir) = &args.log_dir {
        config.log.dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: &SessionConfig) -> Result<TeardownReport, SessionError> {
    log::info!("loading pose model via {}", config.detector.program);
    let estimator =
        ProcessEstimator::load(&config.detector.program, &config.detector.args, &config.estimator)
            .await?;

    let mut surface = RgbSurface::new(config.canvas_size());
    match &config.overlay.font {
        Some(path) => surface = surface.with_font(load_font(path)?),
        None if config.overlay.labels => log::warn!("no label font configured, labels are skipped"),
        None => {}
    }

    let mut window = WindowPresenter::open("limn - ESC to exit", config.canvas_size())?;
    let mut source = V4l2Source::new();
    let session = Session::start(config, &mut source, estimator, surface).await?;
    session.run(&mut window).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    init_logger(&config.log).context("failed to initialize logging")?;

    log::info!(
        "canvas {}x{} at {} fps, threshold {}",
        config.canvas.width,
        config.canvas.height,
        config.fps,
        config.overlay.threshold.value()
    );

    match run(&config).await {
        Ok(report) => {
            log::info!("exiting, {} track(s) stopped", report.tracks);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            log_fatal!("{}", e);
        }
    }
}
