//! Application configuration system with TOML persistence.
//!
//! Supports loading from file, command-line overrides, and sensible defaults.

use crate::assets::ClipId;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Clip locations
    pub clips: ClipsConfig,

    /// Playback configuration
    pub playback: PlaybackConfig,

    /// UI configuration
    pub ui: UiConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,

    /// Project buttons shown under the stage
    pub projects: Vec<ProjectLink>,
}

/// Where the four clips live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipsConfig {
    /// Directory holding every clip
    pub root: PathBuf,
    pub idle: ClipEntry,
    pub intro_primary: ClipEntry,
    pub intro_secondary: ClipEntry,
    pub reaction: ClipEntry,
}

/// One clip under the clip root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipEntry {
    /// File stem, without extension
    pub stem: String,

    /// Run time in seconds when the clip has no narration track
    pub fallback_duration_secs: f32,
}

/// Start policy applied by the clip surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoplayPolicy {
    /// Every start request is honoured
    #[default]
    Allow,
    /// Only muted clips may start
    MutedOnly,
    /// Every start request is refused
    Block,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub autoplay: AutoplayPolicy,

    /// Narration volume (0.0-1.0)
    pub narration_volume: f32,
}

/// Label of one language button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageLabel {
    /// Short region code drawn before the greeting
    pub flag: String,
    pub greeting: String,
    /// Highlight color while this intro plays, `#rrggbb`
    pub accent: String,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub window_title: String,

    /// Stage zoom factor; pushes burned-in watermarks off screen
    pub stage_zoom: f32,

    /// Text above the project grid
    pub tagline: String,

    pub primary: LanguageLabel,
    pub secondary: LanguageLabel,

    /// Enable debug panel
    pub show_debug_panel: bool,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable metrics collection
    pub enabled: bool,

    /// Histogram precision (significant value digits)
    pub histogram_precision: u8,

    /// Maximum histogram value in milliseconds
    pub histogram_max_ms: u64,
}

/// A project category button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub subtitle: String,
    /// Hover color, `#rrggbb`
    pub accent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clips: ClipsConfig::default(),
            playback: PlaybackConfig::default(),
            ui: UiConfig::default(),
            metrics: MetricsConfig::default(),
            projects: ProjectLink::defaults(),
        }
    }
}

impl Default for ClipsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("videos"),
            idle: ClipEntry::new("idle", 8.0),
            intro_primary: ClipEntry::new("intro_es", 20.0),
            intro_secondary: ClipEntry::new("intro_en", 20.0),
            reaction: ClipEntry::new("reaction", 3.0),
        }
    }
}

impl ClipsConfig {
    pub fn entry(&self, clip: ClipId) -> &ClipEntry {
        match clip {
            ClipId::Idle => &self.idle,
            ClipId::IntroPrimary => &self.intro_primary,
            ClipId::IntroSecondary => &self.intro_secondary,
            ClipId::Reaction => &self.reaction,
        }
    }
}

impl ClipEntry {
    fn new(stem: &str, fallback_duration_secs: f32) -> Self {
        Self {
            stem: stem.to_string(),
            fallback_duration_secs,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            autoplay: AutoplayPolicy::Allow,
            narration_volume: 0.8,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_title: "Portfolio".to_string(),
            stage_zoom: 1.05,
            tagline: "Explore my portfolio".to_string(),
            primary: LanguageLabel {
                flag: "ES".to_string(),
                greeting: "Hola, bienvenido".to_string(),
                accent: "#2563eb".to_string(),
            },
            secondary: LanguageLabel {
                flag: "EN".to_string(),
                greeting: "Hi, welcome".to_string(),
                accent: "#9333ea".to_string(),
            },
            show_debug_panel: cfg!(debug_assertions),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            histogram_precision: 2,
            histogram_max_ms: 10_000,
        }
    }
}

impl ProjectLink {
    fn new(label: &str, subtitle: &str, accent: &str) -> Self {
        Self {
            label: label.to_string(),
            subtitle: subtitle.to_string(),
            accent: accent.to_string(),
            url: None,
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Web Apps", "Next.js + Supabase", "#ffffff"),
            Self::new("WhatsApp API", "Meta Developer", "#16a34a"),
            Self::new("Power Apps", "Microsoft Fabric", "#db2777"),
            Self::new("PAIC.com.co", "Full SaaS", "#2563eb"),
            Self::new("n8n Workflows", "Automation", "#ea580c"),
            Self::new("AutoGen Agents", "Multi-Agent Systems", "#4f46e5"),
        ]
    }
}

impl fmt::Display for AutoplayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::MutedOnly => write!(f, "muted-only"),
            Self::Block => write!(f, "block"),
        }
    }
}

impl FromStr for AutoplayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(Self::Allow),
            "muted-only" => Ok(Self::MutedOnly),
            "block" => Ok(Self::Block),
            other => Err(format!(
                "unknown autoplay policy '{}' (expected allow, muted-only or block)",
                other
            )),
        }
    }
}

/// Parse a `#rrggbb` color into its components
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: Box::new(path.to_path_buf()),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::InvalidFormat {
            path: Box::new(path.to_path_buf()),
            source,
        })
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::SaveFailed {
                path: Box::new(path.to_path_buf()),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|source| ConfigError::SerializationFailed { source })?;

        std::fs::write(path, contents).map_err(|source| ConfigError::SaveFailed {
            path: Box::new(path.to_path_buf()),
            source,
        })
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|mut path| {
                path.push("portfolio-reel");
                path
            })
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for clip in ClipId::ALL {
            let entry = self.clips.entry(clip);
            if entry.stem.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    reason: format!("Clip '{}' has an empty file stem", clip),
                });
            }
            if !(entry.fallback_duration_secs > 0.0 && entry.fallback_duration_secs <= 3600.0) {
                return Err(ConfigError::ValidationFailed {
                    reason: format!(
                        "Clip '{}' fallback duration {}s out of range 0-3600s",
                        clip, entry.fallback_duration_secs
                    ),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.playback.narration_volume) {
            return Err(ConfigError::ValidationFailed {
                reason: format!(
                    "Narration volume {} out of range 0.0-1.0",
                    self.playback.narration_volume
                ),
            });
        }

        if !(1.0..=1.5).contains(&self.ui.stage_zoom) {
            return Err(ConfigError::ValidationFailed {
                reason: format!("Stage zoom {} out of range 1.0-1.5", self.ui.stage_zoom),
            });
        }

        let accents = [&self.ui.primary.accent, &self.ui.secondary.accent]
            .into_iter()
            .chain(self.projects.iter().map(|p| &p.accent));
        for accent in accents {
            if parse_hex_color(accent).is_none() {
                return Err(ConfigError::ValidationFailed {
                    reason: format!("Accent color '{}' is not #rrggbb", accent),
                });
            }
        }

        if self.metrics.histogram_precision > 5 {
            return Err(ConfigError::ValidationFailed {
                reason: format!(
                    "Histogram precision {} must be at most 5",
                    self.metrics.histogram_precision
                ),
            });
        }

        if self.metrics.histogram_max_ms < 2 {
            return Err(ConfigError::ValidationFailed {
                reason: "Histogram max must be at least 2ms".to_string(),
            });
        }

        Ok(())
    }
}
