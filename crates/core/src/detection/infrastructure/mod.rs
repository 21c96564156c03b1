pub mod replay_landmark_provider;
