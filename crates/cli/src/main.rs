mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use beauty_face_core::assets::domain::asset_store::AssetStore;
use beauty_face_core::assets::infrastructure::file_asset_store::FileAssetStore;
use beauty_face_core::assets::infrastructure::http_fetcher::HttpFetcher;
use beauty_face_core::assets::infrastructure::model_updater::{
    ModelUpdater, UpdateOutcome, UpdateProgress,
};
use beauty_face_core::cosmetics::domain::beauty_settings::{BeautySettings, Effect};
use beauty_face_core::cosmetics::infrastructure::cpu_cosmetic_renderer::CpuCosmeticRenderer;
use beauty_face_core::detection::infrastructure::detector_factory::create_detector;
use beauty_face_core::pipeline::detect_faces_use_case::DetectFacesUseCase;
use beauty_face_core::pipeline::frame_pump::ProgressFn;
use beauty_face_core::pipeline::infrastructure::threaded_frame_pump::ThreadedFramePump;
use beauty_face_core::pipeline::render_effects_use_case::RenderEffectsUseCase;
use beauty_face_core::video::infrastructure::image_file_writer::ImageFileWriter;
use beauty_face_core::video::infrastructure::image_sequence_reader::{
    is_supported_image, ImageSequenceReader,
};
use beauty_face_core::video::infrastructure::image_sequence_writer::ImageSequenceWriter;

use config::AppConfig;

/// Skin-colour face detection and camera beauty effects for still images.
#[derive(Parser)]
#[command(name = "beauty-face", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect faces and print one JSON line per frame.
    Detect {
        /// Input images or directories of images, processed as one sequence.
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// JSON config with `detection` and `beauty` sections.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Apply beauty effects and write the results to a directory.
    Render {
        /// Input images or directories of images, processed as one sequence.
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Directory for the rendered images (same file names as the inputs).
        #[arg(long)]
        output_dir: PathBuf,

        /// JSON config with `detection` and `beauty` sections.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Whitening strength (0.0-1.0).
        #[arg(long)]
        whiten: Option<f64>,

        /// Slim-face shading strength (0.0-1.0).
        #[arg(long)]
        slim_face: Option<f64>,

        /// Eye highlight strength (0.0-1.0).
        #[arg(long)]
        big_eyes: Option<f64>,

        /// Makeup strength (0.0-1.0).
        #[arg(long)]
        auto_makeup: Option<f64>,

        /// Draw the dog-face overlay.
        #[arg(long)]
        dog_face: bool,
    },

    /// Download or refresh the cached model files.
    UpdateModels {
        /// Mirror base URL; disables the built-in mirror list.
        #[arg(long)]
        base_url: Option<String>,

        /// Cache directory (defaults to the platform cache).
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Re-download even when the cached version is current.
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Detect { images, config } => run_detect(&images, config.as_deref()),
        Command::Render {
            images,
            output_dir,
            config,
            whiten,
            slim_face,
            big_eyes,
            auto_makeup,
            dog_face,
        } => {
            let overrides = [
                (Effect::Whiten, whiten),
                (Effect::SlimFace, slim_face),
                (Effect::BigEyes, big_eyes),
                (Effect::AutoMakeup, auto_makeup),
            ];
            run_render(&images, &output_dir, config.as_deref(), &overrides, dog_face)
        }
        Command::UpdateModels {
            base_url,
            dest,
            force,
        } => run_update_models(base_url, dest, force),
    }
}

fn run_detect(images: &[PathBuf], config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config)?;
    let inputs = collect_images(images)?;

    let detector = create_detector(None, config.detection);
    let source = Box::new(ImageSequenceReader::new(inputs));
    let mut use_case = DetectFacesUseCase::new(source, detector, None);

    for detections in use_case.execute()? {
        println!("{}", serde_json::to_string(&detections)?);
    }
    Ok(())
}

fn run_render(
    images: &[PathBuf],
    output_dir: &Path,
    config: Option<&Path>,
    overrides: &[(Effect, Option<f64>)],
    dog_face: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config)?;
    let settings = apply_overrides(config.beauty, overrides, dog_face)?;
    log::info!("Beauty filter: {}", settings.css_filter());

    let inputs = collect_images(images)?;
    let sink = ImageSequenceWriter::into_dir(Box::new(ImageFileWriter::new()), &inputs, output_dir);

    let total = inputs.len();
    let progress: ProgressFn = Box::new(move |current, _| {
        eprint!("\rRendering frame {current}/{total}");
        true
    });

    let mut use_case = RenderEffectsUseCase::new(
        Box::new(ImageSequenceReader::new(inputs)),
        Box::new(sink),
        create_detector(None, config.detection),
        Box::new(CpuCosmeticRenderer::new(settings)),
        Box::new(ThreadedFramePump::new()),
        Some(progress),
        None,
    );
    let summary = use_case.execute()?;
    eprintln!();
    log::info!(
        "Rendered {} images ({} with faces) into {}",
        summary.frames,
        summary.frames_with_faces,
        output_dir.display()
    );
    Ok(())
}

fn run_update_models(
    base_url: Option<String>,
    dest: Option<PathBuf>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = match dest {
        Some(dir) => FileAssetStore::new(dir),
        None => FileAssetStore::in_default_location()?,
    };
    let root = store.root().to_path_buf();
    let previous = store.metadata()?;
    if let Some(meta) = &previous {
        log::info!("Cached model version: {}", meta.version);
    }

    let fetcher = Box::new(HttpFetcher::new()?);
    let updater = match base_url {
        Some(url) => ModelUpdater::with_mirrors(fetcher, Box::new(store), vec![url]),
        None => ModelUpdater::new(fetcher, Box::new(store)),
    }
    .force(force);

    let outcome = updater.check_for_updates(&mut |p: &UpdateProgress| {
        eprint!("\r[{}/{}] {:<40}", p.completed, p.total, p.message);
    })?;
    eprintln!();

    match outcome {
        UpdateOutcome::UpToDate => println!("Models in {} are up to date", root.display()),
        UpdateOutcome::Updated { downloaded } => println!(
            "Downloaded {} files into {}",
            downloaded.len(),
            root.display()
        ),
    }
    Ok(())
}

fn apply_overrides(
    mut settings: BeautySettings,
    overrides: &[(Effect, Option<f64>)],
    dog_face: bool,
) -> Result<BeautySettings, Box<dyn std::error::Error>> {
    for &(effect, value) in overrides {
        if let Some(v) = value {
            if !(0.0..=1.0).contains(&v) {
                return Err(format!("{effect:?} strength must be between 0.0 and 1.0, got {v}").into());
            }
            settings.set(effect, v);
        }
    }
    settings.dog_face |= dog_face;
    Ok(settings)
}

/// Expands directories into their supported images (sorted by name) and
/// checks that every listed file exists.
fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut images = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_supported_image(p))
                .collect();
            entries.sort();
            images.extend(entries);
        } else if input.exists() {
            images.push(input.clone());
        } else {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if images.is_empty() {
        return Err("No input images found".into());
    }
    Ok(images)
}
