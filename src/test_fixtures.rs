//! Test fixtures for development and testing
//!
//! A recording [`MediaSurface`] that captures every call the controller makes,
//! and helpers that write small synthetic clip directories so tests do not
//! need committed media files.

use crate::assets::ClipSource;
use crate::error::{PlaybackRejected, RejectReason};
use crate::playback_state::SurfaceConfig;
use crate::surface::{MediaSurface, PlayRequest, PlayResolver, SurfaceEvent};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::path::Path;

/// A call received by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    SetSource(ClipSource),
    SetMuted(bool),
    SetLooping(bool),
    Reload,
    Play,
}

/// How [`RecordingSurface`] answers start requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayBehavior {
    /// Answer `Started` immediately
    Start,
    /// Answer `Rejected` immediately
    Reject(RejectReason),
    /// Hold the answer until [`RecordingSurface::settle_all`]
    Defer,
}

/// In-memory surface that records calls and tracks its current settings.
pub struct RecordingSurface {
    behavior: PlayBehavior,
    calls: Vec<SurfaceCall>,
    source: Option<ClipSource>,
    muted: bool,
    looping: bool,
    events: VecDeque<SurfaceEvent>,
    deferred: Vec<PlayResolver>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::with_behavior(PlayBehavior::Start)
    }
}

impl RecordingSurface {
    pub fn with_behavior(behavior: PlayBehavior) -> Self {
        Self {
            behavior,
            calls: Vec::new(),
            source: None,
            muted: false,
            looping: false,
            events: VecDeque::new(),
            deferred: Vec::new(),
        }
    }

    pub fn rejecting(reason: RejectReason) -> Self {
        Self::with_behavior(PlayBehavior::Reject(reason))
    }

    pub fn deferred() -> Self {
        Self::with_behavior(PlayBehavior::Defer)
    }

    pub fn set_behavior(&mut self, behavior: PlayBehavior) {
        self.behavior = behavior;
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Settings currently applied, as the controller would derive them
    pub fn current(&self) -> Option<SurfaceConfig> {
        self.source.as_ref().map(|source| SurfaceConfig {
            clip: source.clip,
            muted: self.muted,
            looping: self.looping,
        })
    }

    pub fn source(&self) -> Option<&ClipSource> {
        self.source.as_ref()
    }

    /// Queue a notification for the next `poll_event`
    pub fn push_event(&mut self, event: SurfaceEvent) {
        self.events.push_back(event);
    }

    /// Answer every deferred start request
    pub fn settle_all(&mut self, result: Result<(), PlaybackRejected>) {
        for resolver in self.deferred.drain(..) {
            resolver.settle(result.clone());
        }
    }
}

impl MediaSurface for RecordingSurface {
    fn set_source(&mut self, source: ClipSource) {
        self.calls.push(SurfaceCall::SetSource(source.clone()));
        self.source = Some(source);
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.push(SurfaceCall::SetMuted(muted));
        self.muted = muted;
    }

    fn set_looping(&mut self, looping: bool) {
        self.calls.push(SurfaceCall::SetLooping(looping));
        self.looping = looping;
    }

    fn reload(&mut self) {
        self.calls.push(SurfaceCall::Reload);
    }

    fn play(&mut self) -> PlayRequest {
        self.calls.push(SurfaceCall::Play);
        match &self.behavior {
            PlayBehavior::Start => PlayRequest::started(),
            PlayBehavior::Reject(reason) => match &self.source {
                Some(source) => PlayRequest::rejected(PlaybackRejected {
                    clip: source.clip,
                    reason: reason.clone(),
                }),
                None => PlayRequest::started(),
            },
            PlayBehavior::Defer => {
                let (resolver, request) = PlayRequest::pending();
                self.deferred.push(resolver);
                request
            }
        }
    }

    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        self.events.pop_front()
    }
}

/// Generate a pure sine wave at the given frequency
///
/// # Example
/// ```
/// use portfolio_reel::test_fixtures::generate_sine_wave;
/// let tone = generate_sine_wave(440.0, 1.0, 44100, 0.5);
/// assert_eq!(tone.len(), 44100);
/// ```
pub fn generate_sine_wave(
    frequency: f32,
    duration_secs: f32,
    sample_rate: u32,
    amplitude: f32,
) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Write a 16-bit PCM narration track
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

/// Write a solid-color poster; the format follows the file extension
pub fn write_poster(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    image.save(path).expect("save poster");
}

/// Create a temporary clip root containing `stem.wav` with a tone of the
/// given length for each `(stem, secs)` pair
pub fn create_clip_dir(clips: &[(&str, f32)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (stem, secs) in clips {
        let tone = generate_sine_wave(440.0, *secs, 8000, 0.3);
        write_wav(&dir.path().join(format!("{}.wav", stem)), &tone, 8000, 1);
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ClipId;
    use std::path::PathBuf;
    use std::time::Duration;

    fn source(clip: ClipId) -> ClipSource {
        ClipSource {
            clip,
            location: PathBuf::from("clips").join(clip.to_string()),
            fallback_duration: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_recording_surface_tracks_settings() {
        let mut surface = RecordingSurface::default();
        surface.set_source(source(ClipId::Reaction));
        surface.set_muted(true);
        surface.set_looping(false);

        assert_eq!(
            surface.current(),
            Some(SurfaceConfig {
                clip: ClipId::Reaction,
                muted: true,
                looping: false
            })
        );
        assert_eq!(surface.calls().len(), 3);
    }

    #[test]
    fn test_clip_dir_contains_tracks() {
        let dir = create_clip_dir(&[("idle", 0.25), ("reaction", 0.5)]);
        assert!(dir.path().join("idle.wav").is_file());
        assert!(dir.path().join("reaction.wav").is_file());
    }
}
