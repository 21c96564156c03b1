pub mod calibration;
pub mod catalog;
pub mod detection;
pub mod overlay;
pub mod placement;
pub mod session;
pub mod shared;
pub mod video;
