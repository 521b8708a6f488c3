//! Tempo and tick timing.

/// Rows per beat in ProTracker timing.
pub const ROWS_PER_BEAT: u32 = 4;

/// Default BPM for a new song.
pub const DEFAULT_BPM: u8 = 125;

/// Default ticks per row for a new song.
pub const DEFAULT_TICKS_PER_ROW: u8 = 6;

/// Current song speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tempo {
    /// Beats per minute (32-255)
    pub bpm: u8,
    /// Ticks per row (1-31)
    pub ticks_per_row: u8,
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            ticks_per_row: DEFAULT_TICKS_PER_ROW,
        }
    }
}

impl Tempo {
    /// Output samples per tick, truncated to whole samples.
    ///
    /// A row is a quarter beat: `rate / (bpm / 60) / 4 / ticks_per_row`,
    /// evaluated as one division so whole results stay exact.
    pub fn samples_per_tick(&self, sample_rate: u32) -> u32 {
        if self.bpm == 0 || self.ticks_per_row == 0 {
            return 0;
        }
        let ticks_per_minute = self.bpm as f64 * ROWS_PER_BEAT as f64 * self.ticks_per_row as f64;
        (sample_rate as f64 * 60.0 / ticks_per_minute) as u32
    }

    /// Output samples per row.
    pub fn samples_per_row(&self, sample_rate: u32) -> u32 {
        self.samples_per_tick(sample_rate) * self.ticks_per_row as u32
    }
}
