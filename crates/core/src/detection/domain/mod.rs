pub mod landmark_provider;
