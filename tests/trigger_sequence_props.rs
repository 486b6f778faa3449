//! Property tests over random trigger sequences.

use portfolio_reel::assets::ClipLibrary;
use portfolio_reel::config::AppConfig;
use portfolio_reel::controller::PlaybackController;
use portfolio_reel::error::RejectReason;
use portfolio_reel::metrics::PlaybackMetrics;
use portfolio_reel::playback_state::{Language, PlaybackState};
use portfolio_reel::surface::SurfaceEvent;
use portfolio_reel::test_fixtures::{PlayBehavior, RecordingSurface};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Intro(Language),
    Enter,
    Leave,
    Ended,
}

fn trigger() -> impl Strategy<Value = Trigger> {
    prop_oneof![
        Just(Trigger::Intro(Language::Primary)),
        Just(Trigger::Intro(Language::Secondary)),
        Just(Trigger::Enter),
        Just(Trigger::Leave),
        Just(Trigger::Ended),
    ]
}

fn behavior() -> impl Strategy<Value = PlayBehavior> {
    prop_oneof![
        Just(PlayBehavior::Start),
        Just(PlayBehavior::Defer),
        Just(PlayBehavior::Reject(RejectReason::Blocked)),
    ]
}

/// Reference transition function
fn expected_next(state: PlaybackState, trigger: Trigger) -> PlaybackState {
    match (state, trigger) {
        (_, Trigger::Intro(language)) => PlaybackState::intro(language),
        (PlaybackState::Idle, Trigger::Enter) => PlaybackState::Reaction,
        (PlaybackState::Reaction, Trigger::Leave) => PlaybackState::Idle,
        (PlaybackState::IntroPrimary | PlaybackState::IntroSecondary, Trigger::Ended) => {
            PlaybackState::Idle
        }
        (state, _) => state,
    }
}

proptest! {
    #[test]
    fn surface_always_matches_state(
        triggers in prop::collection::vec(trigger(), 0..64),
        play in behavior(),
    ) {
        let library = ClipLibrary::from_config(&AppConfig::default().clips);
        let mut controller = PlaybackController::mount(
            RecordingSurface::with_behavior(play),
            library,
            PlaybackMetrics::default(),
        );
        let mut model = PlaybackState::Idle;

        for trigger in triggers {
            match trigger {
                Trigger::Intro(language) => controller.request_intro(language),
                Trigger::Enter => controller.on_pointer_enter(),
                Trigger::Leave => controller.on_pointer_leave(),
                Trigger::Ended => {
                    controller.surface_mut().push_event(SurfaceEvent::Ended);
                    controller.pump();
                }
            }
            model = expected_next(model, trigger);

            prop_assert_eq!(controller.state(), model);
            prop_assert_eq!(
                controller.surface().current(),
                Some(model.surface_config())
            );
        }
    }
}
