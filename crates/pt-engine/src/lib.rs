//! Playback engine for the ptplay ProTracker player.
//!
//! Turns a [`pt_ir::Module`] into 16-bit stereo: a sequencer walks the
//! order list row by row, each channel resamples its instrument at the
//! current period, and the channels are mixed with hard Amiga panning.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod channel;
mod config;
mod frame;
mod generator;
pub mod period;
mod resampler;
mod sequencer;
mod tempo;
mod vibrato;

pub use channel::{sample_with_volume, ChannelAudioGenerator, MAX_VOLUME, PCM8_FULL_SCALE};
pub use config::{PlaybackConfig, DEFAULT_SAMPLE_RATE};
pub use frame::Frame;
pub use generator::AudioGenerator;
pub use resampler::{Resampler, SampleView};
pub use sequencer::{Advance, Arrangement, RowRef, SongCursor, SongPosition};
pub use tempo::{Tempo, DEFAULT_BPM, DEFAULT_TICKS_PER_ROW, ROWS_PER_BEAT};
pub use vibrato::{Vibrato, SINE_TABLE};
