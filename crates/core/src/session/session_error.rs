use std::fmt;

use thiserror::Error;

use crate::catalog::domain::jewelry_item::JewelryKind;

/// Known causes of a failed camera or model start-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitFailureKind {
    CameraUnsupported,
    PermissionDenied,
    ModelLoad,
    Other,
}

/// Substrings of the failure description, checked in order and case-sensitively.
const CLASSIFIERS: [(&str, InitFailureKind); 3] = [
    ("MediaDevices", InitFailureKind::CameraUnsupported),
    ("permission", InitFailureKind::PermissionDenied),
    ("model", InitFailureKind::ModelLoad),
];

impl InitFailureKind {
    pub fn classify(detail: &str) -> Self {
        CLASSIFIERS
            .iter()
            .find(|(needle, _)| detail.contains(needle))
            .map_or(InitFailureKind::Other, |(_, kind)| *kind)
    }

    pub fn user_message(self) -> &'static str {
        match self {
            InitFailureKind::CameraUnsupported => {
                "Camera access is not supported or blocked in this browser."
            }
            InitFailureKind::PermissionDenied => {
                "Please allow camera permissions to use this feature."
            }
            InitFailureKind::ModelLoad => "Failed to load face detection model.",
            InitFailureKind::Other => "An error occurred while initializing the application.",
        }
    }
}

impl fmt::Display for InitFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

/// Everything a try-on session can refuse or fail with.
///
/// None of these is fatal: the caller shows the message and the session
/// stays usable.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{kind}")]
    Init { kind: InitFailureKind, detail: String },
    #[error("No face detected.")]
    NoFaceDetected,
    #[error("Please wait... Face detection in progress.")]
    DetectionInProgress,
    #[error("Please upload a valid image with a clear face.")]
    NoImageAnalyzed,
    #[error("unknown jewelry id '{0}'")]
    UnknownItem(String),
    #[error("{0} cannot be placed on an uploaded photo")]
    UnsupportedInUpload(JewelryKind),
    #[error("Error running face detection: {0}")]
    Detection(String),
}

impl SessionError {
    /// Wraps a start-up failure, classifying it for the user-facing message.
    pub fn init(detail: impl fmt::Display) -> Self {
        let detail = detail.to_string();
        SessionError::Init {
            kind: InitFailureKind::classify(&detail),
            detail,
        }
    }
}
