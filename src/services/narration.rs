//! Narration playback worker.
//!
//! The audio output stream lives on its own thread; the clip player talks
//! to it over a command channel and gets each start answered on a reply
//! channel.

use crate::assets::Narration;
use crate::error::RejectReason;
use rodio::Source;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A narration track fed to the mixer from the start, sharing the decoded
/// buffer with the clip it came from.
pub struct NarrationSource {
    samples: Arc<[f32]>,
    sample_rate: u32,
    channels: u16,
    cursor: usize,
}

impl From<&Narration> for NarrationSource {
    fn from(narration: &Narration) -> Self {
        Self {
            samples: Arc::clone(&narration.samples),
            sample_rate: narration.sample_rate,
            channels: narration.channels,
            cursor: 0,
        }
    }
}

impl Iterator for NarrationSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = *self.samples.get(self.cursor)?;
        self.cursor += 1;
        Some(sample)
    }
}

impl Source for NarrationSource {
    fn current_span_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.cursor)
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() as f64 / self.channels as f64;
        Some(Duration::from_secs_f64(frames / self.sample_rate as f64))
    }
}

/// Reply to a narration start
pub type NarrationReply = Receiver<Result<(), RejectReason>>;

pub(crate) enum NarrationCommand {
    Play {
        narration: Narration,
        muted: bool,
        reply: Sender<Result<(), RejectReason>>,
    },
    SetMuted(bool),
    Stop,
}

/// Handle to the narration thread. Dropping it stops playback and joins
/// the thread.
pub struct NarrationWorker {
    tx: Option<Sender<NarrationCommand>>,
    handle: Option<JoinHandle<()>>,
}

impl NarrationWorker {
    pub fn spawn(volume: f32) -> std::io::Result<Self> {
        let (tx, rx) = channel();
        let handle = thread::Builder::new()
            .name("narration".to_string())
            .spawn(move || run(rx, volume))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Handle whose commands go to `tx` instead of an audio thread
    #[cfg(test)]
    pub(crate) fn from_sender(tx: Sender<NarrationCommand>) -> Self {
        Self {
            tx: Some(tx),
            handle: None,
        }
    }

    /// Start a narration track, replacing any current one
    pub fn play(&self, narration: Narration, muted: bool) -> NarrationReply {
        let (reply, rx) = channel();
        self.send(NarrationCommand::Play {
            narration,
            muted,
            reply,
        });
        rx
    }

    pub fn set_muted(&self, muted: bool) {
        self.send(NarrationCommand::SetMuted(muted));
    }

    pub fn stop(&self) {
        self.send(NarrationCommand::Stop);
    }

    fn send(&self, command: NarrationCommand) {
        let delivered = self
            .tx
            .as_ref()
            .map(|tx| tx.send(command).is_ok())
            .unwrap_or(false);
        if !delivered {
            tracing::warn!("Narration worker is gone; command dropped");
        }
    }
}

impl Drop for NarrationWorker {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Narration worker panicked");
            }
        }
    }
}

fn run(rx: Receiver<NarrationCommand>, volume: f32) {
    let stream = match rodio::OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            stream.log_on_drop(false);
            tracing::info!("Narration output ready");
            Ok(stream)
        }
        Err(e) => {
            tracing::warn!("No audio output for narration: {}", e);
            Err(e.to_string())
        }
    };

    let mut sink: Option<rodio::Sink> = None;
    let level = |muted: bool| if muted { 0.0 } else { volume };

    while let Ok(command) = rx.recv() {
        match command {
            NarrationCommand::Play {
                narration,
                muted,
                reply,
            } => {
                if let Some(previous) = sink.take() {
                    previous.stop();
                }

                let result = match &stream {
                    Err(reason) => Err(RejectReason::AudioUnavailable(reason.clone())),
                    Ok(stream) => {
                        let new_sink = rodio::Sink::connect_new(stream.mixer());
                        new_sink.set_volume(level(muted));
                        new_sink.append(NarrationSource::from(&narration));
                        new_sink.play();
                        sink = Some(new_sink);
                        Ok(())
                    }
                };
                let _ = reply.send(result);
            }
            NarrationCommand::SetMuted(muted) => {
                if let Some(sink) = &sink {
                    sink.set_volume(level(muted));
                }
            }
            NarrationCommand::Stop => {
                if let Some(sink) = sink.take() {
                    sink.stop();
                }
            }
        }
    }

    tracing::debug!("Narration worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narration(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Narration {
        Narration {
            samples: samples.into(),
            sample_rate,
            channels,
        }
    }

    #[test]
    fn test_source_plays_whole_track() {
        let track = narration(vec![0.1, 0.2, 0.3, 0.4], 8000, 1);
        let mut source = NarrationSource::from(&track);
        assert_eq!(source.current_span_len(), Some(4));

        source.next();
        assert_eq!(source.current_span_len(), Some(3));
        let rest: Vec<f32> = source.collect();
        assert_eq!(rest, vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_source_shares_buffer() {
        let track = narration(vec![0.0; 32], 8000, 2);
        let _source = NarrationSource::from(&track);
        assert_eq!(Arc::strong_count(&track.samples), 2);
    }

    #[test]
    fn test_source_duration_matches_track() {
        let track = narration(vec![0.0; 16000], 8000, 2);
        let source = NarrationSource::from(&track);
        assert_eq!(source.total_duration(), Some(track.duration()));
        assert_eq!(source.total_duration(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_send_after_worker_gone_is_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        let worker = NarrationWorker::from_sender(tx);
        worker.stop();
        let reply = worker.play(narration(vec![0.0; 8], 8000, 1), false);
        assert!(reply.recv().is_err());
    }
}
