//! Instrument (sample) definitions.

use alloc::vec::Vec;
use arrayvec::ArrayString;

/// A sampled instrument.
///
/// Sample data is mono, one value per frame, in signed 8-bit PCM units
/// (nominally -128..=127). Loop start and length are in words (2 frames),
/// as stored by ProTracker.
#[derive(Clone, Debug)]
pub struct Instrument {
    /// Instrument name
    pub name: ArrayString<22>,
    /// Sample frames
    pub data: Vec<f32>,
    /// Default fine-tune (-8 to +7, eighths of a semitone)
    pub fine_tune: i8,
    /// Default volume (0-64)
    pub volume: u8,
    /// Loop start in words
    pub loop_start: u32,
    /// Loop length in words (1 or less = not looped)
    pub loop_length: u32,
}

impl Default for Instrument {
    fn default() -> Self {
        Self {
            name: ArrayString::new(),
            data: Vec::new(),
            fine_tune: 0,
            volume: 64,
            loop_start: 0,
            loop_length: 0,
        }
    }
}

impl Instrument {
    /// Create a new empty instrument.
    pub fn new(name: &str) -> Self {
        let mut inst = Self::default();
        let _ = inst.name.try_push_str(name);
        inst
    }

    /// Create an instrument from signed 8-bit PCM bytes.
    pub fn from_pcm8(name: &str, pcm: &[i8]) -> Self {
        let mut inst = Self::new(name);
        inst.data = pcm.iter().map(|&b| b as f32).collect();
        inst
    }

    /// Set the default volume (clamped to 64).
    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = volume.min(64);
        self
    }

    /// Set the default fine-tune.
    pub fn with_fine_tune(mut self, fine_tune: i8) -> Self {
        self.fine_tune = fine_tune;
        self
    }

    /// Set the loop region (both in words).
    pub fn with_loop(mut self, start: u32, length: u32) -> Self {
        self.loop_start = start;
        self.loop_length = length;
        self
    }

    /// Number of sample frames.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the instrument has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the instrument repeats.
    pub fn is_looped(&self) -> bool {
        self.loop_length > 1
    }

    /// Loop start in frames.
    pub fn loop_start_frame(&self) -> usize {
        self.loop_start as usize * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_flag_needs_length_above_one() {
        assert!(!Instrument::new("a").with_loop(0, 1).is_looped());
        assert!(Instrument::new("a").with_loop(0, 2).is_looped());
    }

    #[test]
    fn loop_start_is_in_words() {
        let inst = Instrument::new("a").with_loop(5, 10);
        assert_eq!(inst.loop_start_frame(), 10);
    }

    #[test]
    fn from_pcm8_widens_bytes() {
        let inst = Instrument::from_pcm8("kick", &[-128, 0, 127]);
        assert_eq!(inst.data, [-128.0, 0.0, 127.0]);
        assert_eq!(inst.len(), 3);
        assert_eq!(inst.name.as_str(), "kick");
    }

    #[test]
    fn volume_is_clamped() {
        assert_eq!(Instrument::new("a").with_volume(90).volume, 64);
    }
}
