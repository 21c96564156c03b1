mod settings;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;

use tryon_core::catalog::domain::jewelry_catalog::JewelryCatalog;
use tryon_core::catalog::domain::jewelry_item::JewelryKind;
use tryon_core::catalog::infrastructure::catalog_file::load_or_builtin;
use tryon_core::detection::domain::landmark_provider::FaceDetection;
use tryon_core::detection::infrastructure::replay_landmark_provider::{
    ReplayFaceProvider, ReplayHandProvider,
};
use tryon_core::overlay::domain::manual_adjustment::AdjustAction;
use tryon_core::overlay::domain::overlay_registry::PlacedOverlay;
use tryon_core::session::live_session::{FrameOutcome, LiveSession, LiveSessionOptions};
use tryon_core::session::session_error::SessionError;
use tryon_core::session::session_logger::StdoutSessionLogger;
use tryon_core::session::upload_session::{FaceDimensions, UploadSession};
use tryon_core::shared::constants::IMAGE_EXTENSIONS;
use tryon_core::shared::geometry::{Size, Transform2D};
use tryon_core::video::domain::camera_source::CameraSource;
use tryon_core::video::infrastructure::image_file_reader::{read_image, ImageFileReader};
use tryon_core::video::infrastructure::replay_camera::ReplayCamera;

use settings::Settings;

/// Virtual jewelry try-on from face and hand landmarks.
#[derive(Parser)]
#[command(name = "tryon")]
struct Cli {
    /// Catalog JSON file (defaults to the built-in catalog).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Place jewelry on a single photo.
    Image {
        /// JSON array of face detections for the photo.
        #[arg(long)]
        landmarks: PathBuf,

        /// Jewelry ids to apply, in order.
        #[arg(long = "item", required = true)]
        items: Vec<String>,

        /// Photo file; its size is used as the natural size.
        #[arg(long)]
        image: Option<PathBuf>,

        /// Natural photo size as WIDTHxHEIGHT, when no photo is given.
        #[arg(long)]
        natural: Option<Size>,

        /// Container size as WIDTHxHEIGHT.
        #[arg(long)]
        container: Option<Size>,

        /// Nudges applied to the last item (comma-separated: up, down, left,
        /// right, zoom-in, zoom-out).
        #[arg(long, value_delimiter = ',')]
        adjust: Vec<AdjustAction>,
    },
    /// Replay recorded detections through the webcam loop.
    Live {
        /// JSON array of frames, each an array of face detections.
        #[arg(long)]
        frames: PathBuf,

        /// JSON array of frames, each an array of hand detections.
        #[arg(long)]
        hands: Option<PathBuf>,

        /// Jewelry ids to select, in order.
        #[arg(long = "item", required = true)]
        items: Vec<String>,

        /// Display size as WIDTHxHEIGHT.
        #[arg(long)]
        display: Option<Size>,

        /// Camera resolution as WIDTHxHEIGHT (defaults to the display size).
        #[arg(long)]
        source: Option<Size>,

        /// Photo shown as a single camera frame instead of blank frames.
        #[arg(long)]
        image: Option<PathBuf>,

        /// Real face width the live scale is measured against.
        #[arg(long)]
        reference_face_width: Option<f64>,
    },
    /// List catalog items and the landmarks each kind is anchored to.
    Catalog,
    /// Show the settings file, optionally writing the defaults to it.
    Config {
        #[arg(long)]
        init: bool,
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
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = Settings::load();
    let catalog_path = cli.catalog.clone().or_else(|| settings.catalog.clone());
    let catalog = load_or_builtin(catalog_path.as_deref())?;

    match cli.command {
        Command::Image {
            landmarks,
            items,
            image,
            natural,
            container,
            adjust,
        } => {
            let container = container.unwrap_or(settings.container);
            let source = match (image, natural) {
                (Some(path), _) => PhotoSource::File(path),
                (None, Some(size)) => PhotoSource::Size(size),
                (None, None) => return Err("Either --image or --natural is required".into()),
            };
            let report = run_image(catalog, container, &source, &landmarks, &items, &adjust)?;
            print_json(&report)
        }
        Command::Live {
            frames,
            hands,
            items,
            display,
            source,
            image,
            reference_face_width,
        } => {
            let display = display.unwrap_or(settings.display);
            let camera = match image {
                Some(path) => CameraInput::Photo(path),
                None => CameraInput::Replay(source.unwrap_or(display)),
            };
            let options = LiveSessionOptions {
                display: Some(display),
                reference_face_width: reference_face_width
                    .unwrap_or(settings.reference_face_width),
            };
            let reports = run_live(
                catalog,
                options,
                camera,
                &frames,
                hands.as_deref(),
                &items,
            )?;
            print_json(&reports)
        }
        Command::Catalog => print_json(&catalog_listing(&catalog)),
        Command::Config { init } => {
            if init {
                settings.save();
            }
            match Settings::config_path() {
                Some(path) => eprintln!("Settings file: {}", path.display()),
                None => eprintln!("No config directory on this platform"),
            }
            print_json(&settings)
        }
    }
}

enum PhotoSource {
    File(PathBuf),
    Size(Size),
}

#[derive(Serialize)]
struct ImageReport {
    natural: Option<Size>,
    container: Size,
    face: Option<FaceDimensions>,
    overlays: Vec<PlacedOverlay>,
    transforms: BTreeMap<JewelryKind, Transform2D>,
}

fn run_image(
    catalog: JewelryCatalog,
    container: Size,
    source: &PhotoSource,
    landmarks: &Path,
    items: &[String],
    adjust: &[AdjustAction],
) -> Result<ImageReport, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(landmarks)
        .map_err(|e| format!("Cannot read {}: {e}", landmarks.display()))?;
    let detections: Vec<FaceDetection> = serde_json::from_str(&json)?;

    let mut session = UploadSession::new(catalog, container);
    match source {
        PhotoSource::File(path) => {
            let frame = read_image(path)?;
            let mut provider = ReplayFaceProvider::from_frames(vec![detections]);
            session.load_image(&frame, &mut provider)?;
        }
        PhotoSource::Size(size) => {
            session.begin_image(*size);
            session.complete_detection(Ok(detections))?;
        }
    }

    for id in items {
        match session.apply(id) {
            Ok(()) if session.selected().is_none() => {
                log::warn!("'{id}' could not be placed: landmarks missing");
            }
            Ok(()) => {}
            Err(e @ SessionError::UnsupportedInUpload(_)) => log::warn!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }
    for action in adjust {
        if !session.adjust(*action) {
            log::warn!("Nothing selected to adjust");
            break;
        }
    }

    let transforms = JewelryKind::ALL
        .iter()
        .filter_map(|&kind| session.effective_transform(kind).map(|t| (kind, t)))
        .collect();

    Ok(ImageReport {
        natural: session.viewport().map(|v| v.natural_size()),
        container,
        face: session.face_dimensions(),
        overlays: session.overlays(),
        transforms,
    })
}

enum CameraInput {
    /// Blank frames at this resolution, one per replayed frame.
    Replay(Size),
    Photo(PathBuf),
}

#[derive(Serialize)]
struct FrameReport {
    outcome: FrameOutcome,
    overlays: Vec<PlacedOverlay>,
}

fn run_live(
    catalog: JewelryCatalog,
    options: LiveSessionOptions,
    camera: CameraInput,
    frames: &Path,
    hands: Option<&Path>,
    items: &[String],
) -> Result<Vec<FrameReport>, Box<dyn std::error::Error>> {
    let face_provider = ReplayFaceProvider::load(frames)?;
    let camera: Box<dyn CameraSource> = match camera {
        CameraInput::Replay(source) => Box::new(ReplayCamera::new(
            source.width.round() as u32,
            source.height.round() as u32,
            face_provider.frame_count(),
        )),
        CameraInput::Photo(path) => Box::new(ImageFileReader::new(path)),
    };

    let mut session = LiveSession::start(
        camera,
        Box::new(face_provider),
        catalog,
        options,
        Box::new(StdoutSessionLogger::new()),
    )?;
    if let Some(path) = hands {
        session = session.with_hand_provider(Box::new(ReplayHandProvider::load(path)?));
    }
    for id in items {
        session.select(id)?;
    }

    let mut reports = Vec::new();
    loop {
        match session.tick() {
            Ok(FrameOutcome::NoFrame | FrameOutcome::Stopped | FrameOutcome::Paused) => break,
            Ok(outcome) => reports.push(FrameReport {
                outcome,
                overlays: session.placements(),
            }),
            Err(SessionError::Detection(msg)) => log::warn!("Skipping frame: {msg}"),
            Err(e) => return Err(e.into()),
        }
    }
    session.stop();
    Ok(reports)
}

#[derive(Serialize)]
struct CatalogEntry<'a> {
    id: &'a str,
    kind: JewelryKind,
    path: &'a str,
    anchor_landmarks: &'static [usize],
}

fn catalog_listing(catalog: &JewelryCatalog) -> Vec<CatalogEntry<'_>> {
    catalog
        .items()
        .map(|item| CatalogEntry {
            id: &item.id,
            kind: item.kind,
            path: &item.image_path,
            anchor_landmarks: item.kind.anchor_landmarks(),
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.catalog {
        if !path.exists() {
            return Err(format!("Catalog file not found: {}", path.display()).into());
        }
    }
    match &cli.command {
        Command::Image {
            landmarks,
            image,
            natural,
            ..
        } => {
            if !landmarks.exists() {
                return Err(format!("Landmarks file not found: {}", landmarks.display()).into());
            }
            match (image, natural) {
                (Some(_), Some(_)) => {
                    return Err("--image and --natural are mutually exclusive".into());
                }
                (None, None) => return Err("Either --image or --natural is required".into()),
                (Some(path), None) if !is_image(path) => {
                    return Err(format!(
                        "Unsupported image type: {} (expected one of {})",
                        path.display(),
                        IMAGE_EXTENSIONS.join(", ")
                    )
                    .into());
                }
                _ => {}
            }
        }
        Command::Live {
            frames,
            hands,
            source,
            image,
            reference_face_width,
            ..
        } => {
            if !frames.exists() {
                return Err(format!("Frames file not found: {}", frames.display()).into());
            }
            if let Some(path) = image {
                if source.is_some() {
                    return Err("--image and --source are mutually exclusive".into());
                }
                if !is_image(path) {
                    return Err(format!("Unsupported image type: {}", path.display()).into());
                }
            }
            if let Some(path) = hands {
                if !path.exists() {
                    return Err(format!("Hands file not found: {}", path.display()).into());
                }
            }
            if let Some(w) = reference_face_width {
                if *w <= 0.0 {
                    return Err(
                        format!("Reference face width must be positive, got {w}").into()
                    );
                }
            }
        }
        Command::Catalog | Command::Config { .. } => {}
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
