//! Playback view state
//!
//! The active clip is selected by a single [`PlaybackState`]; everything the
//! media surface needs (source, mute, loop) is derived from it.

use crate::assets::ClipId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which clip the stage is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    /// Muted resting loop
    #[default]
    Idle,
    /// Primary-language introduction, plays once with sound
    IntroPrimary,
    /// Secondary-language introduction, plays once with sound
    IntroSecondary,
    /// Muted hover reaction, plays once
    Reaction,
}

/// Introduction language selected by the language bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Primary,
    Secondary,
}

/// Media surface settings for one state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub clip: ClipId,
    pub muted: bool,
    pub looping: bool,
}

impl PlaybackState {
    pub const ALL: [PlaybackState; 4] = [
        Self::Idle,
        Self::IntroPrimary,
        Self::IntroSecondary,
        Self::Reaction,
    ];

    /// The intro state for a language
    pub fn intro(language: Language) -> Self {
        match language {
            Language::Primary => Self::IntroPrimary,
            Language::Secondary => Self::IntroSecondary,
        }
    }

    /// Surface settings for this state
    pub fn surface_config(self) -> SurfaceConfig {
        match self {
            Self::Idle => SurfaceConfig {
                clip: ClipId::Idle,
                muted: true,
                looping: true,
            },
            Self::IntroPrimary => SurfaceConfig {
                clip: ClipId::IntroPrimary,
                muted: false,
                looping: false,
            },
            Self::IntroSecondary => SurfaceConfig {
                clip: ClipId::IntroSecondary,
                muted: false,
                looping: false,
            },
            Self::Reaction => SurfaceConfig {
                clip: ClipId::Reaction,
                muted: true,
                looping: false,
            },
        }
    }

    /// Returns true for either introduction
    pub fn is_intro(self) -> bool {
        matches!(self, Self::IntroPrimary | Self::IntroSecondary)
    }

    /// Language of the intro being played, if any
    pub fn language(self) -> Option<Language> {
        match self {
            Self::IntroPrimary => Some(Language::Primary),
            Self::IntroSecondary => Some(Language::Secondary),
            Self::Idle | Self::Reaction => None,
        }
    }

    /// Short status line for the debug panel
    pub fn status_message(self) -> &'static str {
        match self {
            Self::Idle => "Idle loop",
            Self::IntroPrimary => "Primary intro",
            Self::IntroSecondary => "Secondary intro",
            Self::Reaction => "Hover reaction",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::IntroPrimary => write!(f, "IntroPrimary"),
            Self::IntroSecondary => write!(f, "IntroSecondary"),
            Self::Reaction => write!(f, "Reaction"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}
