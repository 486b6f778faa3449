//! Playback controller
//!
//! Owns the [`PlaybackState`] and the media surface. Every state change
//! pushes the state's [`SurfaceConfig`](crate::playback_state::SurfaceConfig)
//! to the surface in a fixed order: source, mute, loop, reload, play.

use crate::assets::ClipLibrary;
use crate::metrics::PlaybackMetrics;
use crate::playback_state::{Language, PlaybackState};
use crate::surface::{MediaSurface, PlayRequest, PlaySettlement, SurfaceEvent};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Start request still waiting for the surface's answer
struct PendingStart {
    state: PlaybackState,
    request: PlayRequest,
    issued_at: Instant,
}

pub struct PlaybackController<S: MediaSurface> {
    state: PlaybackState,
    surface: S,
    library: ClipLibrary,
    pending: Option<PendingStart>,
    metrics: PlaybackMetrics,
}

impl<S: MediaSurface> PlaybackController<S> {
    /// Mount the controller: start in `Idle` and configure the surface for it.
    pub fn mount(surface: S, library: ClipLibrary, metrics: PlaybackMetrics) -> Self {
        let mut controller = Self {
            state: PlaybackState::Idle,
            surface,
            library,
            pending: None,
            metrics,
        };
        info!(root = %controller.library.root().display(), "Playback controller mounted");
        controller.apply();
        controller
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn metrics(&self) -> &PlaybackMetrics {
        &self.metrics
    }

    /// Returns true while a start request has not settled
    pub fn is_start_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Play an introduction, interrupting whatever is on stage.
    pub fn request_intro(&mut self, language: Language) {
        debug!(%language, from = %self.state, "Intro requested");
        self.transition_to(PlaybackState::intro(language));
    }

    /// Pointer entered a project button. Intros are never interrupted.
    pub fn on_pointer_enter(&mut self) {
        if self.state == PlaybackState::Idle {
            self.transition_to(PlaybackState::Reaction);
        }
    }

    /// Pointer left a project button.
    pub fn on_pointer_leave(&mut self) {
        if self.state == PlaybackState::Reaction {
            self.transition_to(PlaybackState::Idle);
        }
    }

    /// The surface finished a clip on its own.
    ///
    /// Only intros return to the idle loop; a reaction that runs out while
    /// still hovered stays on its last frame.
    pub fn on_clip_ended(&mut self) {
        if self.state.is_intro() {
            self.transition_to(PlaybackState::Idle);
        } else {
            debug!(state = %self.state, "Clip end ignored");
        }
    }

    /// Drain surface notifications and settle the outstanding start request.
    /// Call once per frame.
    pub fn pump(&mut self) {
        while let Some(event) = self.surface.poll_event() {
            match event {
                SurfaceEvent::Ended => self.on_clip_ended(),
            }
        }
        self.settle_start();
    }

    fn transition_to(&mut self, next: PlaybackState) {
        if next == self.state {
            return;
        }
        let previous = self.state;
        self.state = next;
        self.metrics.record_transition(previous, next);
        info!(from = %previous, to = %next, "Playback state changed");
        self.apply();
    }

    fn apply(&mut self) {
        let config = self.state.surface_config();
        let source = self.library.resolve(config.clip);
        debug!(
            clip = %config.clip,
            location = %source.location.display(),
            muted = config.muted,
            looping = config.looping,
            "Configuring surface"
        );

        self.surface.set_source(source);
        self.surface.set_muted(config.muted);
        self.surface.set_looping(config.looping);
        self.surface.reload();

        let request = self.surface.play();
        let previous = self.pending.replace(PendingStart {
            state: self.state,
            request,
            issued_at: Instant::now(),
        });
        if previous.is_some() {
            self.metrics.record_superseded();
            debug!("Unsettled start request superseded");
        }

        // Surfaces that answer synchronously are settled right away.
        self.settle_start();
    }

    fn settle_start(&mut self) {
        let Some(pending) = self.pending.as_ref() else {
            return;
        };

        match pending.request.try_settle() {
            PlaySettlement::Pending => {}
            PlaySettlement::Started => {
                self.metrics.record_started(pending.issued_at.elapsed());
                debug!(state = %pending.state, "Playback started");
                self.pending = None;
            }
            PlaySettlement::Rejected(e) => {
                self.metrics.record_rejection();
                if pending.state == PlaybackState::Idle {
                    debug!("Idle loop did not start: {}", e);
                } else {
                    warn!(
                        state = %pending.state,
                        recoverable = e.is_recoverable(),
                        "{}. {}",
                        e,
                        e.user_action()
                    );
                }
                self.pending = None;
            }
            PlaySettlement::Abandoned => {
                self.metrics.record_abandoned();
                debug!(state = %pending.state, "Start request abandoned by surface");
                self.pending = None;
            }
        }
    }
}

impl<S: MediaSurface> Drop for PlaybackController<S> {
    fn drop(&mut self) {
        info!("{}", self.metrics.summary().line());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::RejectReason;
    use crate::test_fixtures::{RecordingSurface, SurfaceCall};

    fn mount(surface: RecordingSurface) -> PlaybackController<RecordingSurface> {
        let library = ClipLibrary::from_config(&AppConfig::default().clips);
        PlaybackController::mount(surface, library, PlaybackMetrics::default())
    }

    #[test]
    fn test_mount_configures_idle() {
        let controller = mount(RecordingSurface::default());
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(
            controller.surface().current(),
            Some(PlaybackState::Idle.surface_config())
        );
    }

    #[test]
    fn test_side_effect_order() {
        let mut controller = mount(RecordingSurface::default());
        controller.surface_mut().clear_calls();

        controller.request_intro(Language::Primary);

        let calls = controller.surface().calls();
        assert_eq!(calls.len(), 5);
        assert!(matches!(calls[0], SurfaceCall::SetSource(_)));
        assert_eq!(calls[1], SurfaceCall::SetMuted(false));
        assert_eq!(calls[2], SurfaceCall::SetLooping(false));
        assert_eq!(calls[3], SurfaceCall::Reload);
        assert_eq!(calls[4], SurfaceCall::Play);
    }

    #[test]
    fn test_same_state_has_no_side_effects() {
        let mut controller = mount(RecordingSurface::default());
        controller.request_intro(Language::Secondary);
        controller.surface_mut().clear_calls();

        controller.request_intro(Language::Secondary);

        assert!(controller.surface().calls().is_empty());
        assert_eq!(controller.state(), PlaybackState::IntroSecondary);
    }

    #[test]
    fn test_rejection_leaves_state() {
        let mut controller = mount(RecordingSurface::rejecting(RejectReason::Blocked));
        controller.request_intro(Language::Primary);

        assert_eq!(controller.state(), PlaybackState::IntroPrimary);
        assert!(!controller.is_start_pending());
        assert_eq!(controller.metrics().rejections(), 2);
    }

    #[test]
    fn test_deferred_start_superseded() {
        let mut controller = mount(RecordingSurface::deferred());
        assert!(controller.is_start_pending());

        controller.on_pointer_enter();
        controller.on_pointer_leave();
        assert_eq!(controller.metrics().superseded(), 2);

        controller.surface_mut().settle_all(Ok(()));
        controller.pump();
        assert!(!controller.is_start_pending());
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_pump_routes_end_event() {
        let mut controller = mount(RecordingSurface::default());
        controller.request_intro(Language::Secondary);

        controller.surface_mut().push_event(SurfaceEvent::Ended);
        controller.pump();

        assert_eq!(controller.state(), PlaybackState::Idle);
    }
}
