//! Media surface seam between the playback controller and whatever renders
//! clips.
//!
//! Starting playback is asynchronous: [`MediaSurface::play`] hands back a
//! [`PlayRequest`] that settles later through a one-shot channel. Dropping
//! the request abandons it; the surface's late answer is discarded.

use crate::assets::ClipSource;
use crate::error::PlaybackRejected;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Notifications a surface raises on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A non-looping clip reached its natural end
    Ended,
}

/// Something that can show one clip at a time.
pub trait MediaSurface {
    fn set_source(&mut self, source: ClipSource);

    fn set_muted(&mut self, muted: bool);

    fn set_looping(&mut self, looping: bool);

    /// Re-read the current source and rewind to the start
    fn reload(&mut self);

    /// Ask the surface to start playing; the answer arrives later
    fn play(&mut self) -> PlayRequest;

    /// Next pending notification, if any
    fn poll_event(&mut self) -> Option<SurfaceEvent>;
}

/// Outcome of polling a [`PlayRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaySettlement {
    /// No answer yet
    Pending,
    Started,
    Rejected(PlaybackRejected),
    /// The surface dropped the request without answering
    Abandoned,
}

/// Pending answer to a start request.
#[derive(Debug)]
pub struct PlayRequest {
    rx: Receiver<Result<(), PlaybackRejected>>,
}

/// Surface side of a [`PlayRequest`].
#[derive(Debug)]
pub struct PlayResolver {
    tx: Sender<Result<(), PlaybackRejected>>,
}

impl PlayRequest {
    /// A request the surface will answer later
    pub fn pending() -> (PlayResolver, PlayRequest) {
        let (tx, rx) = channel();
        (PlayResolver { tx }, PlayRequest { rx })
    }

    /// A request that already started
    pub fn started() -> Self {
        let (resolver, request) = Self::pending();
        resolver.resolve();
        request
    }

    /// A request that was refused immediately
    pub fn rejected(error: PlaybackRejected) -> Self {
        let (resolver, request) = Self::pending();
        resolver.reject(error);
        request
    }

    pub fn try_settle(&self) -> PlaySettlement {
        match self.rx.try_recv() {
            Ok(Ok(())) => PlaySettlement::Started,
            Ok(Err(e)) => PlaySettlement::Rejected(e),
            Err(TryRecvError::Empty) => PlaySettlement::Pending,
            Err(TryRecvError::Disconnected) => PlaySettlement::Abandoned,
        }
    }
}

impl PlayResolver {
    // The requester may have moved on already; a failed send is fine.
    pub fn resolve(self) {
        let _ = self.tx.send(Ok(()));
    }

    pub fn reject(self, error: PlaybackRejected) {
        let _ = self.tx.send(Err(error));
    }

    pub fn settle(self, result: Result<(), PlaybackRejected>) {
        let _ = self.tx.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ClipId;
    use crate::error::RejectReason;

    #[test]
    fn test_pending_until_resolved() {
        let (resolver, request) = PlayRequest::pending();
        assert_eq!(request.try_settle(), PlaySettlement::Pending);
        resolver.resolve();
        assert_eq!(request.try_settle(), PlaySettlement::Started);
    }

    #[test]
    fn test_rejected_request() {
        let error = PlaybackRejected {
            clip: ClipId::IntroPrimary,
            reason: RejectReason::Blocked,
        };
        let request = PlayRequest::rejected(error.clone());
        assert_eq!(request.try_settle(), PlaySettlement::Rejected(error));
    }

    #[test]
    fn test_dropped_resolver_abandons() {
        let (resolver, request) = PlayRequest::pending();
        drop(resolver);
        assert_eq!(request.try_settle(), PlaySettlement::Abandoned);
    }

    #[test]
    fn test_late_answer_after_drop_is_silent() {
        let (resolver, request) = PlayRequest::pending();
        drop(request);
        resolver.reject(PlaybackRejected {
            clip: ClipId::Reaction,
            reason: RejectReason::Blocked,
        });
    }
}
