use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use lightmeter_core::capture::domain::frame_source::FrameSource;
use lightmeter_core::capture::infrastructure::camera_source::CameraSource;
use lightmeter_core::capture::infrastructure::image_file_source::ImageFileSource;
use lightmeter_core::capture::infrastructure::video_file_source::VideoFileSource;
use lightmeter_core::detection::domain::face_locator::DetectionParams;
use lightmeter_core::detection::infrastructure::rustface_locator::RustfaceLocator;
use lightmeter_core::display::domain::display_surface::DisplaySurface;
use lightmeter_core::display::infrastructure::headless_display::HeadlessDisplay;
use lightmeter_core::display::infrastructure::minifb_display::MinifbDisplay;
use lightmeter_core::lighting::lighting_estimator::LightingEstimator;
use lightmeter_core::overlay::overlay_renderer::OverlayRenderer;
use lightmeter_core::pipeline::annotate_image_use_case::AnnotateImageUseCase;
use lightmeter_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use lightmeter_core::pipeline::run_loop::{RunLoop, RunOptions};
use lightmeter_core::shared::constants::{
    DEFAULT_MIN_NEIGHBORS, DEFAULT_POLL_MS, DEFAULT_SCALE_STEP, EXIT_KEY, FACE_MODEL_NAME,
    FACE_MODEL_URL, IMAGE_EXTENSIONS, MIN_FACE_SIZE, WINDOW_TITLE,
};
use lightmeter_core::shared::model_resolver::{self, ProgressFn};

/// Live lighting classification from a camera, video or image.
#[derive(Parser)]
#[command(name = "lightmeter")]
struct Cli {
    /// Camera index to open when no --input is given.
    #[arg(long, default_value = "0")]
    camera: u32,

    /// Video or image file to analyse instead of the camera.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the annotated image here (image input only).
    #[arg(long)]
    output: Option<PathBuf>,

    /// SeetaFace frontal model file. Downloaded on first use if omitted.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Ratio between detection scales (> 1.0).
    #[arg(long, default_value_t = DEFAULT_SCALE_STEP)]
    scale_step: f32,

    /// Overlapping hits required before a face is accepted.
    #[arg(long, default_value_t = DEFAULT_MIN_NEIGHBORS)]
    min_neighbors: u32,

    /// Smallest face edge length in pixels.
    #[arg(long, default_value_t = MIN_FACE_SIZE)]
    min_face_size: u32,

    /// Run without a window (frames are processed and logged only).
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Milliseconds to wait for a key press after each frame.
    #[arg(long, default_value_t = DEFAULT_POLL_MS)]
    poll_ms: u64,

    /// Log a reading line every N frames.
    #[arg(long, default_value = "30")]
    log_every: usize,
}

impl Cli {
    fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            scale_step: self.scale_step,
            min_neighbors: self.min_neighbors,
            min_face_size: self.min_face_size,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    match cli.input.as_deref() {
        Some(input) if is_image(input) => run_image(&cli, input),
        _ => run_live(&cli),
    }
}

fn run_image(cli: &Cli, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = ImageFileSource::open(input)?;
    let estimator = build_estimator(cli)?;

    let mut use_case =
        AnnotateImageUseCase::new(Box::new(source), estimator, OverlayRenderer::default());
    let reading = use_case.execute(cli.output.as_deref())?;

    log::info!(
        "Lighting: {} ({:.2}, std {:.2})",
        reading.label,
        reading.brightness,
        reading.std_dev
    );
    if let Some(output) = &cli.output {
        log::info!("Output written to {}", output.display());
    }
    Ok(())
}

fn run_live(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Sources fail fast before the model is resolved or a window is opened.
    let source: Box<dyn FrameSource> = match &cli.input {
        Some(input) => Box::new(VideoFileSource::open(input)?),
        None => Box::new(CameraSource::open(cli.camera)?),
    };
    let estimator = build_estimator(cli)?;

    let display: Box<dyn DisplaySurface> = if cli.headless {
        Box::new(HeadlessDisplay::new())
    } else {
        Box::new(MinifbDisplay::new(WINDOW_TITLE))
    };

    let options = RunOptions {
        poll_timeout: Duration::from_millis(cli.poll_ms),
        exit_key: EXIT_KEY,
        max_frames: cli.max_frames,
    };

    if !cli.headless {
        log::info!("Press '{EXIT_KEY}' in the window to quit");
    }

    let summary = RunLoop::new(
        source,
        estimator,
        OverlayRenderer::default(),
        display,
        Box::new(StdoutPipelineLogger::new(cli.log_every)),
        options,
    )
    .run()?;

    match summary.last_reading {
        Some(reading) => log::info!(
            "Stopped ({:?}) after {} frames; last reading {} ({:.2})",
            summary.stop_reason,
            summary.frames,
            reading.label,
            reading.brightness
        ),
        None => log::info!("Stopped ({:?}) before any frame", summary.stop_reason),
    }
    Ok(())
}

fn build_estimator(cli: &Cli) -> Result<LightingEstimator, Box<dyn std::error::Error>> {
    let model_path = match &cli.model {
        Some(path) => path.clone(),
        None => {
            log::info!("Resolving model: {FACE_MODEL_NAME}");
            let (path, downloaded) = with_download_progress(|progress| {
                model_resolver::resolve(FACE_MODEL_NAME, FACE_MODEL_URL, None, Some(progress))
            });
            if downloaded {
                eprintln!();
            }
            path?
        }
    };

    let locator = RustfaceLocator::new(&model_path, cli.detection_params())?;
    Ok(LightingEstimator::new(Box::new(locator)))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if let Some(model) = &cli.model {
        if !model.exists() {
            return Err(format!("Model file not found: {}", model.display()).into());
        }
    }
    let image_input = cli.input.as_deref().is_some_and(is_image);
    if cli.output.is_some() && !image_input {
        return Err("--output is only supported for image input".into());
    }
    if cli.log_every == 0 {
        return Err("Log interval must be at least 1".into());
    }
    if cli.max_frames == Some(0) {
        return Err("Max frames must be at least 1".into());
    }
    cli.detection_params().validate()?;
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Runs `resolve` with a progress callback that prints to stderr. Also
/// returns whether any progress was printed, so the caller knows whether
/// the progress line needs terminating.
fn with_download_progress<T>(resolve: impl FnOnce(ProgressFn) -> T) -> (T, bool) {
    let reported = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&reported);
    let result = resolve(Box::new(move |downloaded: u64, total: u64| {
        seen.store(true, Ordering::Relaxed);
        download_progress(downloaded, total);
    }));
    (result, reported.load(Ordering::Relaxed))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
