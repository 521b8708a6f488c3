//! Vibrato oscillator driven by the ProTracker 64-step sine table.

/// One period of `255 * sin`, in 64 steps.
pub const SINE_TABLE: [i16; 64] = [
    0, 24, 49, 74, 97, 120, 141, 161, 180, 197, 212, 224, 235, 244, 250, 253,
    255, 253, 250, 244, 235, 224, 212, 197, 180, 161, 141, 120, 97, 74, 49, 24,
    0, -24, -49, -74, -97, -120, -141, -161, -180, -197, -212, -224, -235, -244, -250, -253,
    -255, -253, -250, -244, -235, -224, -212, -197, -180, -161, -141, -120, -97, -74, -49, -24,
];

/// Per-channel vibrato state.
///
/// Rate and depth are sticky: a zero nibble keeps the previous value.
/// The phase runs in output samples so the waveform is smooth within a tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vibrato {
    rate: u8,
    depth: u8,
    phase: f64,
    samples_per_cycle: f64,
}

impl Vibrato {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate(&self) -> u8 {
        self.rate
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Update rate and depth from effect nibbles. Returns true if the rate changed.
    pub fn set_params(&mut self, rate: u8, depth: u8) -> bool {
        if depth > 0 {
            self.depth = depth;
        }
        if rate > 0 && rate != self.rate {
            self.rate = rate;
            return true;
        }
        false
    }

    /// Recompute the cycle length after a tempo or rate change.
    ///
    /// The rate is in 64ths of a cycle per tick, so one row covers
    /// `rate * ticks_per_row / 64` cycles.
    pub fn retune(&mut self, samples_per_row: u32, ticks_per_row: u8) {
        let cycles_per_row = self.rate as f64 * ticks_per_row as f64 / SINE_TABLE.len() as f64;
        self.samples_per_cycle = if cycles_per_row > 0.0 {
            samples_per_row as f64 / cycles_per_row
        } else {
            0.0
        };
        if self.samples_per_cycle > 0.0 && self.phase >= self.samples_per_cycle {
            self.phase = libm::fmod(self.phase, self.samples_per_cycle);
        }
    }

    /// Restart the waveform at zero (new note).
    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    /// Samples in one full vibrato cycle (0 when idle).
    pub fn samples_per_cycle(&self) -> f64 {
        self.samples_per_cycle
    }

    /// Period offset at the current phase.
    pub fn pitch_offset(&self) -> f64 {
        if self.samples_per_cycle <= 0.0 || self.depth == 0 {
            return 0.0;
        }
        let samples_per_step = self.samples_per_cycle / SINE_TABLE.len() as f64;
        let index = (libm::floor(self.phase / samples_per_step) as usize).min(SINE_TABLE.len() - 1);
        SINE_TABLE[index] as f64 * self.depth as f64 / 128.0
    }

    /// Move the phase forward by one output sample.
    pub fn advance(&mut self) {
        if self.samples_per_cycle <= 0.0 {
            return;
        }
        self.phase += 1.0;
        if self.phase >= self.samples_per_cycle {
            self.phase -= self.samples_per_cycle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_odd_symmetric() {
        for i in 0..32 {
            assert_eq!(SINE_TABLE[i], -SINE_TABLE[i + 32]);
        }
        assert_eq!(SINE_TABLE[16], 255);
        assert_eq!(SINE_TABLE[48], -255);
    }

    #[test]
    fn zero_nibbles_keep_previous_params() {
        let mut v = Vibrato::new();
        assert!(v.set_params(4, 8));
        assert!(!v.set_params(0, 0));
        assert_eq!((v.rate(), v.depth()), (4, 8));
        assert!(!v.set_params(0, 3));
        assert_eq!((v.rate(), v.depth()), (4, 3));
        assert!(v.set_params(6, 0));
        assert_eq!((v.rate(), v.depth()), (6, 3));
    }

    #[test]
    fn cycle_length_follows_rate_and_row() {
        let mut v = Vibrato::new();
        v.set_params(4, 8);
        // 4/64 cycle per tick × 6 ticks = 0.375 cycles per row.
        v.retune(5292, 6);
        assert!((v.samples_per_cycle() - 5292.0 / 0.375).abs() < 1e-9);
    }

    #[test]
    fn offset_follows_sine_table() {
        let mut v = Vibrato::new();
        v.set_params(16, 8);
        // 16/64 × 4 ticks = 1 cycle per 64-sample row → one sample per step.
        v.retune(64, 4);
        assert_eq!(v.pitch_offset(), 0.0);
        for _ in 0..16 {
            v.advance();
        }
        assert_eq!(v.pitch_offset(), 255.0 * 8.0 / 128.0);
        for _ in 0..32 {
            v.advance();
        }
        assert_eq!(v.pitch_offset(), -255.0 * 8.0 / 128.0);
        for _ in 0..16 {
            v.advance();
        }
        assert_eq!(v.pitch_offset(), 0.0);
    }

    #[test]
    fn idle_vibrato_has_no_offset() {
        let mut v = Vibrato::new();
        v.retune(5292, 6);
        v.advance();
        assert_eq!(v.pitch_offset(), 0.0);
    }
}
