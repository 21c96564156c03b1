pub mod image_file_reader;
pub mod replay_camera;
