//! Clip identifiers, location resolution and on-disk clip loading.
//!
//! A clip lives under the configured clip root as a file stem with optional
//! siblings: `<stem>.png|jpg|jpeg` for the poster frame and `<stem>.wav` for
//! the narration track. Neither is required; a clip with no narration runs
//! for its configured fallback duration.

use crate::config::{ClipEntry, ClipsConfig};
use crate::error::{AssetError, Result};
use egui::ColorImage;
use hound::{SampleFormat, WavReader};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Poster extensions in lookup priority order
const POSTER_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// The four clips the stage can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipId {
    Idle,
    IntroPrimary,
    IntroSecondary,
    Reaction,
}

impl ClipId {
    pub const ALL: [ClipId; 4] = [
        Self::Idle,
        Self::IntroPrimary,
        Self::IntroSecondary,
        Self::Reaction,
    ];
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::IntroPrimary => write!(f, "intro_primary"),
            Self::IntroSecondary => write!(f, "intro_secondary"),
            Self::Reaction => write!(f, "reaction"),
        }
    }
}

/// A resolved clip location, ready to be assigned to a media surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSource {
    pub clip: ClipId,
    /// Clip root joined with the clip's file stem (no extension)
    pub location: PathBuf,
    /// Run time used when the clip has no narration track
    pub fallback_duration: Duration,
}

impl ClipSource {
    /// Path of a sibling asset, e.g. `reaction` + `wav` -> `reaction.wav`
    pub fn sibling(&self, extension: &str) -> PathBuf {
        let mut name: OsString = self.location.clone().into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }
}

/// Resolves clip identifiers to locations under the clip root.
#[derive(Debug, Clone)]
pub struct ClipLibrary {
    root: PathBuf,
    entries: [ClipEntry; 4],
}

impl ClipLibrary {
    pub fn from_config(config: &ClipsConfig) -> Self {
        Self {
            root: config.root.clone(),
            entries: ClipId::ALL.map(|id| config.entry(id).clone()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, clip: ClipId) -> ClipSource {
        let entry = &self.entries[Self::slot(clip)];
        ClipSource {
            clip,
            location: self.root.join(&entry.stem),
            fallback_duration: Duration::from_secs_f32(entry.fallback_duration_secs.max(0.0)),
        }
    }

    fn slot(clip: ClipId) -> usize {
        match clip {
            ClipId::Idle => 0,
            ClipId::IntroPrimary => 1,
            ClipId::IntroSecondary => 2,
            ClipId::Reaction => 3,
        }
    }
}

/// Decoded narration track with interleaved `f32` samples.
///
/// Samples are shared through an `Arc` so handing the track to the audio
/// worker on every start does not copy the buffer.
#[derive(Debug, Clone)]
pub struct Narration {
    pub samples: Arc<[f32]>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Narration {
    /// Load and normalize a WAV narration track.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::NarrationLoadFailed`] if the file cannot be read,
    /// [`AssetError::UnsupportedChannels`] for more than two channels,
    /// [`AssetError::InvalidSampleRate`] outside 8kHz-192kHz and
    /// [`AssetError::EmptyNarration`] when there are no samples.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut reader =
            WavReader::open(path).map_err(|source| AssetError::NarrationLoadFailed {
                path: path.to_path_buf(),
                source,
            })?;

        let spec = reader.spec();

        if !(8000..=192_000).contains(&spec.sample_rate) {
            return Err(AssetError::InvalidSampleRate {
                rate: spec.sample_rate,
            }
            .into());
        }

        if spec.channels != 1 && spec.channels != 2 {
            return Err(AssetError::UnsupportedChannels {
                channels: spec.channels,
            }
            .into());
        }

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.unwrap_or(0.0))
                .collect(),
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.unwrap_or(0) as f32 / scale)
                    .collect()
            }
        };

        if samples.is_empty() {
            return Err(AssetError::EmptyNarration {
                path: path.to_path_buf(),
            }
            .into());
        }

        tracing::debug!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            samples = samples.len(),
            "Loaded narration track"
        );

        Ok(Self {
            samples: samples.into(),
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() as f64 / self.channels as f64;
        Duration::from_secs_f64(frames / self.sample_rate as f64)
    }
}

/// Find the poster image next to a clip location, if any.
///
/// Only `<stem>.<ext>` with a known poster extension counts; `idle.old.png`
/// is not a poster for `idle`. Extensions match regardless of case and are
/// ranked by [`POSTER_EXTENSIONS`] order.
pub fn find_poster(source: &ClipSource) -> Result<Option<PathBuf>> {
    let Some(stem) = source.location.file_name() else {
        return Ok(None);
    };
    let pattern = format!(
        "{}.*",
        glob::Pattern::escape(&source.location.to_string_lossy())
    );
    let paths = glob::glob(&pattern).map_err(|source| AssetError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })?;

    let best = paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.file_stem() == Some(stem) && path.is_file())
        .filter_map(|path| {
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            let rank = POSTER_EXTENSIONS.iter().position(|e| *e == ext)?;
            Some((rank, path))
        })
        .min();

    Ok(best.map(|(_, path)| path))
}

/// Decode a poster image into an egui image.
pub fn load_poster(path: &Path) -> Result<ColorImage> {
    let decoded = image::open(path).map_err(|source| AssetError::PosterDecodeFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// A clip read from disk by a surface reload.
pub struct LoadedClip {
    pub clip: ClipId,
    pub poster: Option<Arc<ColorImage>>,
    pub narration: Option<Narration>,
    pub duration: Duration,
}

impl LoadedClip {
    /// Read whatever assets exist for `source`.
    ///
    /// Missing or unreadable files are logged and skipped; the clip still
    /// plays for its fallback duration.
    pub fn load(source: &ClipSource) -> Self {
        let poster = match find_poster(source) {
            Ok(Some(path)) => match load_poster(&path) {
                Ok(image) => Some(Arc::new(image)),
                Err(e) => {
                    tracing::warn!(clip = %source.clip, "Poster unavailable: {}", e.user_message());
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(clip = %source.clip, location = %source.location.display(), "No poster found");
                None
            }
            Err(e) => {
                tracing::warn!(clip = %source.clip, "Poster lookup failed: {}", e.user_message());
                None
            }
        };

        let narration_path = source.sibling("wav");
        let narration = if narration_path.is_file() {
            match Narration::from_file(&narration_path) {
                Ok(track) => Some(track),
                Err(e) => {
                    tracing::warn!(clip = %source.clip, "Narration unavailable: {}", e.user_message());
                    None
                }
            }
        } else {
            None
        };

        let duration = narration
            .as_ref()
            .map(Narration::duration)
            .unwrap_or(source.fallback_duration);

        Self {
            clip: source.clip,
            poster,
            narration,
            duration,
        }
    }
}
