//! Playback configuration.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default output sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Options for an [`AudioGenerator`](crate::AudioGenerator).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Replacement order list; `None` plays the module's own
    pub order_list: Option<Vec<u8>>,
    /// Channels to hear; empty means all
    pub solo_channels: Vec<usize>,
    /// Emit one extra frame per `generate_next_samples` call (inclusive
    /// loop bound)
    pub legacy_extra_frame: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            order_list: None,
            solo_channels: Vec::new(),
            legacy_extra_frame: false,
        }
    }
}

impl PlaybackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_order_list(mut self, order: &[u8]) -> Self {
        self.order_list = Some(order.to_vec());
        self
    }

    pub fn with_solo_channels(mut self, channels: &[usize]) -> Self {
        self.solo_channels = channels.to_vec();
        self
    }

    pub fn with_legacy_extra_frame(mut self, enabled: bool) -> Self {
        self.legacy_extra_frame = enabled;
        self
    }

    /// Returns true if `channel` should be heard.
    pub fn is_audible(&self, channel: usize) -> bool {
        self.solo_channels.is_empty() || self.solo_channels.contains(&channel)
    }
}
