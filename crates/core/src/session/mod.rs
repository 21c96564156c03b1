pub mod live_session;
pub mod session_error;
pub mod session_logger;
pub mod upload_session;
