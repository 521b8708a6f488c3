//! Pattern, channel and row types.

use alloc::vec::Vec;

use crate::effects::{Effect, EffectType};

/// Every ProTracker pattern has exactly this many rows.
pub const ROWS_PER_PATTERN: usize = 64;

/// Hard stereo placement of a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Panning {
    #[default]
    Left,
    Right,
}

impl Panning {
    /// Classic Amiga layout: L R R L, repeating.
    pub fn amiga(channel: usize) -> Self {
        if channel % 4 == 0 || channel % 4 == 3 {
            Panning::Left
        } else {
            Panning::Right
        }
    }
}

/// One channel's slot in one pattern row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Row {
    /// Instrument number (0 = keep current, 1-based otherwise)
    pub instrument: u8,
    /// Amiga period (0 = no new note)
    pub pitch: u16,
    /// Effect tag
    pub effect: EffectType,
    /// High effect nibble
    pub x: u8,
    /// Low effect nibble
    pub y: u8,
}

impl Row {
    /// Create a row carrying a note and no effect.
    pub const fn new(instrument: u8, pitch: u16) -> Self {
        Self {
            instrument,
            pitch,
            effect: EffectType::Unknown,
            x: 0,
            y: 0,
        }
    }

    /// Create a row carrying only an effect.
    pub const fn effect_only(effect: EffectType, x: u8, y: u8) -> Self {
        Self::new(0, 0).with_effect(effect, x, y)
    }

    /// Replace this row's effect column.
    pub const fn with_effect(mut self, effect: EffectType, x: u8, y: u8) -> Self {
        self.effect = effect;
        self.x = x;
        self.y = y;
        self
    }

    /// Decode the effect column.
    pub fn decoded_effect(&self) -> Effect {
        Effect::decode(self.effect, self.x, self.y)
    }

    /// Returns true if the row is completely empty.
    pub fn is_empty(&self) -> bool {
        self.instrument == 0 && self.pitch == 0 && self.decoded_effect() == Effect::None
    }
}

/// One channel column of a pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pub panning: Panning,
    pub rows: [Row; ROWS_PER_PATTERN],
}

impl Channel {
    /// Create an empty channel column.
    pub fn new(panning: Panning) -> Self {
        Self {
            panning,
            rows: [Row::default(); ROWS_PER_PATTERN],
        }
    }
}

/// A 64-row block of rows across all channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub channels: Vec<Channel>,
}

impl Pattern {
    /// Create an empty pattern with Amiga panning.
    pub fn new(num_channels: usize) -> Self {
        Self {
            channels: (0..num_channels).map(|i| Channel::new(Panning::amiga(i))).collect(),
        }
    }

    /// Number of channels in this pattern.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Get a reference to a row.
    pub fn row(&self, row: usize, channel: usize) -> &Row {
        &self.channels[channel].rows[row]
    }

    /// Get a mutable reference to a row.
    pub fn row_mut(&mut self, row: usize, channel: usize) -> &mut Row {
        &mut self.channels[channel].rows[row]
    }

    /// Iterate over one row across every channel.
    pub fn rows_at(&self, row: usize) -> impl Iterator<Item = &Row> + '_ {
        self.channels.iter().map(move |c| &c.rows[row])
    }
}
