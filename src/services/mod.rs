pub mod clip_player;
#[cfg(feature = "audio_playback")]
pub mod narration;

pub use clip_player::{ClipPlayer, PlayerStatus};
