// Library interface for the portfolio reel components

pub mod app;
pub mod assets;
pub mod config;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod playback_state;
pub mod services;
pub mod surface;
pub mod ui;
pub mod utils;

// Recording surface and synthetic clip helpers
pub mod test_fixtures;

// Re-export commonly used types
pub use config::AppConfig;
pub use controller::PlaybackController;
pub use error::{PlaybackRejected, ReelError, Result};
pub use playback_state::{Language, PlaybackState};
