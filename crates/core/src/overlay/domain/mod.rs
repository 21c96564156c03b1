pub mod manual_adjustment;
pub mod overlay_registry;
pub mod view_transform;
