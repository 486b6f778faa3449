//! Desktop media surface: shows a clip's poster frame, runs a playback clock
//! over the clip's duration and hands audible narration to the audio worker.

use crate::assets::{ClipId, ClipSource, LoadedClip};
use crate::config::{AutoplayPolicy, PlaybackConfig};
use crate::error::{PlaybackRejected, RejectReason};
use crate::surface::{MediaSurface, PlayRequest, SurfaceEvent};
use egui::ColorImage;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "audio_playback")]
use crate::services::narration::{NarrationReply, NarrationWorker};
#[cfg(feature = "audio_playback")]
use crate::surface::PlayResolver;

/// Where the player is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// No source loaded
    Empty,
    /// Loaded, not running (fresh reload or refused start)
    Paused,
    /// Waiting for the narration output to confirm
    Starting,
    Playing,
    /// Non-looping clip ran out; holds its last frame
    Ended,
}

/// Start waiting on the narration worker
#[cfg(feature = "audio_playback")]
struct Starting {
    reply: NarrationReply,
    resolver: PlayResolver,
}

pub struct ClipPlayer {
    policy: AutoplayPolicy,
    source: Option<ClipSource>,
    muted: bool,
    looping: bool,
    clip: Option<LoadedClip>,
    status: PlayerStatus,
    started_at: Option<Instant>,
    events: VecDeque<SurfaceEvent>,
    /// Bumped on every reload so renderers know to refresh the frame
    generation: u64,
    #[cfg(feature = "audio_playback")]
    narrator: Option<NarrationWorker>,
    #[cfg(feature = "audio_playback")]
    starting: Option<Starting>,
}

impl ClipPlayer {
    /// Player with narration output, when the build supports it
    pub fn new(config: &PlaybackConfig) -> Self {
        #[allow(unused_mut)]
        let mut player = Self::silent(config.autoplay);

        #[cfg(feature = "audio_playback")]
        {
            player.narrator = match NarrationWorker::spawn(config.narration_volume) {
                Ok(worker) => Some(worker),
                Err(e) => {
                    tracing::warn!("Narration worker failed to start: {}", e);
                    None
                }
            };
        }

        #[cfg(not(feature = "audio_playback"))]
        tracing::info!("Built without audio playback; narration is skipped");

        player
    }

    /// Player that never produces sound; audible clips run visually only
    pub fn silent(policy: AutoplayPolicy) -> Self {
        Self {
            policy,
            source: None,
            muted: false,
            looping: false,
            clip: None,
            status: PlayerStatus::Empty,
            started_at: None,
            events: VecDeque::new(),
            generation: 0,
            #[cfg(feature = "audio_playback")]
            narrator: None,
            #[cfg(feature = "audio_playback")]
            starting: None,
        }
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_clip(&self) -> Option<ClipId> {
        self.source.as_ref().map(|s| s.clip)
    }

    pub fn poster(&self) -> Option<&Arc<ColorImage>> {
        self.clip.as_ref().and_then(|c| c.poster.as_ref())
    }

    pub fn duration(&self) -> Duration {
        self.clip.as_ref().map(|c| c.duration).unwrap_or_default()
    }

    /// Playback position at `now`
    pub fn position_at(&self, now: Instant) -> Duration {
        let duration = self.duration();
        match (self.status, self.started_at) {
            (PlayerStatus::Playing, Some(start)) => {
                let elapsed = now.saturating_duration_since(start);
                if self.looping && !duration.is_zero() {
                    Duration::from_secs_f64(elapsed.as_secs_f64() % duration.as_secs_f64())
                } else {
                    elapsed.min(duration)
                }
            }
            (PlayerStatus::Ended, _) => duration,
            _ => Duration::ZERO,
        }
    }

    pub fn position(&self) -> Duration {
        self.position_at(Instant::now())
    }

    /// Advance the player to `now`: settle a waiting start and detect the
    /// end of a non-looping clip.
    pub fn update_at(&mut self, now: Instant) {
        #[cfg(feature = "audio_playback")]
        self.settle_narration(now);

        if self.status != PlayerStatus::Playing || self.looping {
            return;
        }
        let Some(start) = self.started_at else {
            return;
        };
        if now.saturating_duration_since(start) >= self.duration() {
            self.status = PlayerStatus::Ended;
            self.stop_narration();
            self.events.push_back(SurfaceEvent::Ended);
            tracing::debug!(clip = ?self.current_clip(), "Clip ended");
        }
    }

    fn begin(&mut self, now: Instant) {
        self.status = PlayerStatus::Playing;
        self.started_at = Some(now);
    }

    fn reject(&self, reason: RejectReason) -> PlayRequest {
        PlayRequest::rejected(PlaybackRejected {
            clip: self.current_clip().unwrap_or(ClipId::Idle),
            reason,
        })
    }

    fn stop_narration(&mut self) {
        #[cfg(feature = "audio_playback")]
        {
            self.starting = None;
            if let Some(narrator) = &self.narrator {
                narrator.stop();
            }
        }
    }

    #[cfg(feature = "audio_playback")]
    fn settle_narration(&mut self, now: Instant) {
        use std::sync::mpsc::TryRecvError;

        let Some(starting) = self.starting.take() else {
            return;
        };
        let clip = self.current_clip().unwrap_or(ClipId::Idle);

        match starting.reply.try_recv() {
            Ok(Ok(())) => {
                self.begin(now);
                starting.resolver.resolve();
            }
            Ok(Err(reason)) => {
                self.status = PlayerStatus::Paused;
                starting.resolver.reject(PlaybackRejected { clip, reason });
            }
            Err(TryRecvError::Empty) => self.starting = Some(starting),
            Err(TryRecvError::Disconnected) => {
                self.status = PlayerStatus::Paused;
                starting.resolver.reject(PlaybackRejected {
                    clip,
                    reason: RejectReason::AudioUnavailable("narration worker stopped".to_string()),
                });
            }
        }
    }

    /// Hand audible narration to the worker; `None` when there is nothing
    /// to wait for
    #[cfg(feature = "audio_playback")]
    fn start_narration(&mut self) -> Option<PlayRequest> {
        if self.muted {
            return None;
        }
        let narrator = self.narrator.as_ref()?;
        let narration = self.clip.as_ref()?.narration.clone()?;

        let reply = narrator.play(narration, self.muted);
        let (resolver, request) = PlayRequest::pending();
        self.status = PlayerStatus::Starting;
        self.starting = Some(Starting { reply, resolver });
        Some(request)
    }

    #[cfg(not(feature = "audio_playback"))]
    fn start_narration(&mut self) -> Option<PlayRequest> {
        None
    }
}

impl MediaSurface for ClipPlayer {
    fn set_source(&mut self, source: ClipSource) {
        self.source = Some(source);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        #[cfg(feature = "audio_playback")]
        if self.status == PlayerStatus::Playing {
            if let Some(narrator) = &self.narrator {
                narrator.set_muted(muted);
            }
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn reload(&mut self) {
        self.stop_narration();
        self.events.clear();
        self.started_at = None;
        self.generation += 1;

        match &self.source {
            Some(source) => {
                let clip = LoadedClip::load(source);
                tracing::debug!(
                    clip = %source.clip,
                    duration_secs = clip.duration.as_secs_f32(),
                    poster = clip.poster.is_some(),
                    narration = clip.narration.is_some(),
                    "Clip loaded"
                );
                self.clip = Some(clip);
                self.status = PlayerStatus::Paused;
            }
            None => {
                self.clip = None;
                self.status = PlayerStatus::Empty;
            }
        }
    }

    fn play(&mut self) -> PlayRequest {
        if self.clip.is_none() {
            if self.source.is_none() {
                return self.reject(RejectReason::NoSource);
            }
            self.reload();
        }

        match self.policy {
            AutoplayPolicy::Block => return self.reject(RejectReason::Blocked),
            AutoplayPolicy::MutedOnly if !self.muted => {
                return self.reject(RejectReason::AudibleNotAllowed)
            }
            _ => {}
        }

        match self.status {
            PlayerStatus::Playing => return PlayRequest::started(),
            PlayerStatus::Starting => self.stop_narration(),
            PlayerStatus::Ended | PlayerStatus::Paused | PlayerStatus::Empty => {}
        }

        if let Some(request) = self.start_narration() {
            return request;
        }

        self.begin(Instant::now());
        PlayRequest::started()
    }

    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        self.update_at(Instant::now());
        self.events.pop_front()
    }
}


#[cfg(all(test, feature = "audio_playback"))]
mod narration_tests {
    use super::*;
    use crate::assets::ClipLibrary;
    use crate::config::AppConfig;
    use crate::controller::PlaybackController;
    use crate::metrics::PlaybackMetrics;
    use crate::playback_state::{Language, PlaybackState};
    use crate::services::narration::{NarrationCommand, NarrationWorker};
    use crate::surface::PlaySettlement;
    use crate::test_fixtures::create_clip_dir;
    use std::path::Path;
    use std::sync::mpsc::{channel, Receiver, Sender};

    type Reply = Sender<Result<(), RejectReason>>;

    fn library(root: &Path) -> ClipLibrary {
        let mut config = AppConfig::default();
        config.clips.root = root.to_path_buf();
        ClipLibrary::from_config(&config.clips)
    }

    /// Player whose narration commands land in the returned receiver
    fn narrated_player() -> (ClipPlayer, Receiver<NarrationCommand>) {
        let (tx, rx) = channel();
        let mut player = ClipPlayer::silent(AutoplayPolicy::Allow);
        player.narrator = Some(NarrationWorker::from_sender(tx));
        (player, rx)
    }

    /// Reply channel of the newest play command
    fn take_reply(rx: &Receiver<NarrationCommand>) -> Reply {
        rx.try_iter()
            .filter_map(|command| match command {
                NarrationCommand::Play { reply, .. } => Some(reply),
                _ => None,
            })
            .last()
            .expect("play command sent")
    }

    fn start_audible(player: &mut ClipPlayer, library: &ClipLibrary) -> PlayRequest {
        player.set_source(library.resolve(ClipId::IntroPrimary));
        player.set_muted(false);
        player.set_looping(false);
        player.reload();
        player.play()
    }

    #[test]
    fn test_confirmed_narration_starts_clock() {
        let dir = create_clip_dir(&[("intro_es", 0.5)]);
        let (mut player, rx) = narrated_player();

        let request = start_audible(&mut player, &library(dir.path()));
        assert_eq!(player.status(), PlayerStatus::Starting);
        assert_eq!(request.try_settle(), PlaySettlement::Pending);

        take_reply(&rx).send(Ok(())).expect("player listening");
        player.update_at(Instant::now());

        assert_eq!(player.status(), PlayerStatus::Playing);
        assert_eq!(request.try_settle(), PlaySettlement::Started);
    }

    #[test]
    fn test_missing_output_rejects_start() {
        let dir = create_clip_dir(&[("intro_es", 0.5)]);
        let (mut player, rx) = narrated_player();

        let request = start_audible(&mut player, &library(dir.path()));
        take_reply(&rx)
            .send(Err(RejectReason::AudioUnavailable("no output device".to_string())))
            .expect("player listening");
        player.update_at(Instant::now());

        assert_eq!(player.status(), PlayerStatus::Paused);
        assert_eq!(
            request.try_settle(),
            PlaySettlement::Rejected(PlaybackRejected {
                clip: ClipId::IntroPrimary,
                reason: RejectReason::AudioUnavailable("no output device".to_string()),
            })
        );
    }

    #[test]
    fn test_worker_disconnect_rejects_start() {
        let dir = create_clip_dir(&[("intro_es", 0.5)]);
        let (mut player, rx) = narrated_player();

        let request = start_audible(&mut player, &library(dir.path()));
        drop(take_reply(&rx));
        player.update_at(Instant::now());

        assert_eq!(player.status(), PlayerStatus::Paused);
        assert_eq!(
            request.try_settle(),
            PlaySettlement::Rejected(PlaybackRejected {
                clip: ClipId::IntroPrimary,
                reason: RejectReason::AudioUnavailable("narration worker stopped".to_string()),
            })
        );
    }

    #[test]
    fn test_muted_clip_skips_worker() {
        let dir = create_clip_dir(&[("reaction", 0.5)]);
        let (mut player, rx) = narrated_player();

        player.set_source(library(dir.path()).resolve(ClipId::Reaction));
        player.set_muted(true);
        player.set_looping(false);
        player.reload();

        assert_eq!(player.play().try_settle(), PlaySettlement::Started);
        assert!(rx
            .try_iter()
            .all(|command| !matches!(command, NarrationCommand::Play { .. })));
    }

    #[test]
    fn test_controller_keeps_state_on_audio_rejection() {
        let dir = create_clip_dir(&[("idle", 1.0), ("intro_es", 0.5)]);
        let (player, rx) = narrated_player();
        let mut controller =
            PlaybackController::mount(player, library(dir.path()), PlaybackMetrics::default());

        controller.request_intro(Language::Primary);
        assert!(controller.is_start_pending());

        take_reply(&rx)
            .send(Err(RejectReason::AudioUnavailable("no output device".to_string())))
            .expect("player listening");
        controller.pump();

        assert_eq!(controller.state(), PlaybackState::IntroPrimary);
        assert!(!controller.is_start_pending());
        assert_eq!(controller.metrics().rejections(), 1);
        assert_eq!(controller.surface().status(), PlayerStatus::Paused);
    }
}
