pub mod hand_placer;
pub mod image_placer;
pub mod live_earring_placer;
pub mod live_necklace_placer;
pub mod overlay_placement;
pub mod viewport;
