use approx::assert_relative_eq;

use tryon_core::catalog::domain::jewelry_item::JewelryKind;
use tryon_core::catalog::infrastructure::catalog_file::load_catalog;
use tryon_core::detection::domain::landmark_provider::FaceLandmarkProvider;
use tryon_core::detection::infrastructure::replay_landmark_provider::ReplayFaceProvider;
use tryon_core::overlay::domain::manual_adjustment::AdjustAction;
use tryon_core::placement::domain::overlay_placement::{OverlaySlot, TransformOrigin};
use tryon_core::session::session_error::SessionError;
use tryon_core::session::upload_session::UploadSession;
use tryon_core::shared::geometry::Size;
use tryon_core::video::infrastructure::image_file_reader::read_image;

const FACE_JSON: &str = r#"[[{"landmarks": __POINTS__}]]"#;

fn face_json() -> String {
    let mut pts = vec![(0.5, 0.5); 468];
    pts[10] = (0.5, 0.2);
    pts[152] = (0.5, 0.6);
    pts[234] = (0.3, 0.4);
    pts[454] = (0.7, 0.4);
    pts[132] = (0.32, 0.5);
    pts[361] = (0.68, 0.5);
    let points: Vec<String> = pts
        .iter()
        .map(|(x, y)| format!(r#"{{"x": {x}, "y": {y}}}"#))
        .collect();
    FACE_JSON.replace("__POINTS__", &format!("[{}]", points.join(",")))
}

fn write_photo(dir: &std::path::Path, width: u32, height: u32) -> std::path::PathBuf {
    let path = dir.join("photo.png");
    image::RgbImage::new(width, height).save(&path).unwrap();
    path
}

#[test]
fn photo_with_letterbox_places_earrings_and_necklace() {
    let dir = tempfile::tempdir().unwrap();
    let frame = read_image(&write_photo(dir.path(), 200, 100)).unwrap();
    let mut provider = ReplayFaceProvider::from_json_frames(&face_json()).unwrap();

    // 200x100 into 500x500: scale 2.5, 125 px bars above and below.
    let mut session = UploadSession::new(
        tryon_core::catalog::domain::jewelry_catalog::JewelryCatalog::builtin(),
        Size::new(500.0, 500.0),
    );
    session.load_image(&frame, &mut provider).unwrap();
    session.apply("ear1").unwrap();
    session.apply("necklace1").unwrap();

    let overlays = session.overlays();
    assert_eq!(overlays.len(), 3);

    // face_w = 0.4 * 500 = 200, face_h = 0.4 * 250 = 100.
    let left = overlays[0].placement;
    assert_eq!(overlays[0].slot, OverlaySlot::LeftEarring);
    assert_relative_eq!(left.width, 28.0, epsilon = 1e-9);
    assert_relative_eq!(left.left, 160.0 - 14.0 - 5.0, epsilon = 1e-9);
    assert_relative_eq!(left.top, 125.0 + 125.0 - 14.0 + 6.0, epsilon = 1e-9);

    let necklace = overlays[2].placement;
    assert_eq!(necklace.origin, TransformOrigin::TopCenter);
    // min(200 * 1.45, 100 * 1.6) = 160
    assert_relative_eq!(necklace.width, 160.0, epsilon = 1e-9);
    assert_relative_eq!(necklace.height.unwrap(), 144.0, epsilon = 1e-9);
}

#[test]
fn manual_adjustment_follows_latest_item() {
    let dir = tempfile::tempdir().unwrap();
    let frame = read_image(&write_photo(dir.path(), 100, 100)).unwrap();
    let mut provider = ReplayFaceProvider::from_json_frames(&face_json()).unwrap();
    let mut session = UploadSession::new(
        tryon_core::catalog::domain::jewelry_catalog::JewelryCatalog::builtin(),
        Size::new(480.0, 600.0),
    );
    session.load_image(&frame, &mut provider).unwrap();

    session.apply("necklace2").unwrap();
    for action in ["up", "right", "zoom-in"] {
        assert!(session.adjust(action.parse::<AdjustAction>().unwrap()));
    }
    let adj = session.adjustment(JewelryKind::Necklace).unwrap();
    assert_relative_eq!(adj.x, 2.0);
    assert_relative_eq!(adj.y, -2.0);
    assert_relative_eq!(adj.scale, 1.05);

    session.apply("necklace1").unwrap();
    let adj = session.adjustment(JewelryKind::Necklace).unwrap();
    assert_relative_eq!(adj.scale, 1.0);
}

#[test]
fn photo_without_face_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let frame = read_image(&write_photo(dir.path(), 64, 64)).unwrap();
    let mut provider = ReplayFaceProvider::from_frames(vec![vec![]]);
    let mut session = UploadSession::new(
        tryon_core::catalog::domain::jewelry_catalog::JewelryCatalog::builtin(),
        Size::new(480.0, 600.0),
    );

    let err = session.load_image(&frame, &mut provider).unwrap_err();
    assert!(matches!(err, SessionError::NoFaceDetected));
    assert_eq!(err.to_string(), "No face detected.");
    provider.close();
}

#[test]
fn custom_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"{
            "earrings": {
                "hoop": {"id": "hoop", "path": "assets/hoop.png", "type": "earrings", "anchorPoints": [132, 361]}
            }
        }"#,
    )
    .unwrap();
    let catalog = load_catalog(&catalog_path).unwrap();

    let frame = read_image(&write_photo(dir.path(), 100, 100)).unwrap();
    let mut provider = ReplayFaceProvider::from_json_frames(&face_json()).unwrap();
    let mut session = UploadSession::new(catalog, Size::new(480.0, 600.0));
    session.load_image(&frame, &mut provider).unwrap();

    session.apply("hoop").unwrap();
    assert!(matches!(
        session.apply("ear1"),
        Err(SessionError::UnknownItem(_))
    ));
    assert_eq!(session.overlays().len(), 2);
}
