//! Error types for the portfolio reel.
//!
//! Playback refusals are modelled separately from asset and configuration
//! failures: a refused start never escapes a state transition, it is only
//! reported.

use crate::assets::ClipId;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all reel operations.
#[derive(Error, Debug)]
pub enum ReelError {
    /// Clip loading errors
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Refused playback start
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackRejected),
}

/// Errors raised while reading a clip from disk.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to load narration '{path}': {source}")]
    NarrationLoadFailed { path: PathBuf, source: hound::Error },

    #[error("Invalid narration sample rate: {rate} Hz (must be 8kHz-192kHz)")]
    InvalidSampleRate { rate: u32 },

    #[error("Unsupported narration channel count: {channels} (only mono/stereo supported)")]
    UnsupportedChannels { channels: u16 },

    #[error("Empty narration track: {path}")]
    EmptyNarration { path: PathBuf },

    #[error("Failed to decode poster '{path}': {source}")]
    PosterDecodeFailed {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Invalid clip lookup pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file '{path}': {source}")]
    LoadFailed {
        path: Box<PathBuf>,
        source: std::io::Error,
    },

    #[error("Invalid config format in '{path}': {source}")]
    InvalidFormat {
        path: Box<PathBuf>,
        source: toml::de::Error,
    },

    #[error("Config validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Failed to save config to '{path}': {source}")]
    SaveFailed {
        path: Box<PathBuf>,
        source: std::io::Error,
    },

    #[error("Config serialization failed: {source}")]
    SerializationFailed { source: toml::ser::Error },
}

/// The host refused to start playback of a clip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("playback of {clip} clip rejected: {reason}")]
pub struct PlaybackRejected {
    pub clip: ClipId,
    pub reason: RejectReason,
}

/// Why a start request was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("autoplay policy only allows muted playback")]
    AudibleNotAllowed,

    #[error("autoplay policy blocks all playback")]
    Blocked,

    #[error("no audio output available ({0})")]
    AudioUnavailable(String),

    #[error("no clip source assigned")]
    NoSource,
}

/// Result type alias for reel operations
pub type Result<T, E = ReelError> = std::result::Result<T, E>;

impl ReelError {
    /// Short message suitable for logs read by whoever maintains the clips
    pub fn user_message(&self) -> String {
        match self {
            ReelError::Asset(e) => e.user_message(),
            ReelError::Config(e) => e.to_string(),
            ReelError::Playback(e) => format!("{}. {}", e, e.user_action()),
        }
    }
}

impl AssetError {
    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AssetError::NarrationLoadFailed { path, .. } => {
                format!("Could not open narration track '{}'", path.display())
            }
            AssetError::InvalidSampleRate { rate } => {
                format!("Narration track has unsupported sample rate: {} Hz", rate)
            }
            AssetError::UnsupportedChannels { channels } => {
                format!("Narration track has unsupported {} channels", channels)
            }
            AssetError::EmptyNarration { path } => {
                format!("Narration track '{}' is empty", path.display())
            }
            AssetError::PosterDecodeFailed { path, .. } => {
                format!("Could not read poster image '{}'", path.display())
            }
            AssetError::InvalidPattern { pattern, .. } => {
                format!("Clip name '{}' cannot be searched for", pattern)
            }
        }
    }
}

impl PlaybackRejected {
    /// A later user interaction issues a fresh start request, which may
    /// succeed where this one did not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.reason, RejectReason::NoSource)
    }

    /// Hint logged alongside the rejection
    pub fn user_action(&self) -> &'static str {
        match self.reason {
            RejectReason::AudibleNotAllowed | RejectReason::Blocked => {
                "Autoplay blocked. Click the video or a button to start."
            }
            RejectReason::AudioUnavailable(_) => "Check the audio output device and retry",
            RejectReason::NoSource => "Clip library is missing this clip",
        }
    }
}
