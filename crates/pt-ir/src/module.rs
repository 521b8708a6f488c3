//! Module (song) structure and validation.

use alloc::vec::Vec;
use arrayvec::ArrayString;

use crate::instrument::Instrument;
use crate::pattern::Pattern;

/// Maximum order-list length in a ProTracker module.
pub const MAX_ORDER_POSITIONS: usize = 128;

/// Reasons a module cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("order list is empty")]
    EmptyOrderList,
    #[error("song has {positions} positions but the order list holds {order_len}")]
    InvalidSongLength { positions: usize, order_len: usize },
    #[error("order position {position} references missing pattern {pattern}")]
    MissingPattern { position: usize, pattern: u8 },
    #[error("pattern {pattern} has no channels")]
    NoChannels { pattern: usize },
    #[error("pattern {pattern} has {found} channels, expected {expected}")]
    ChannelCountMismatch { pattern: usize, expected: usize, found: usize },
    #[error("pattern {pattern} row {row} channel {channel} uses missing instrument {instrument}")]
    MissingInstrument { pattern: usize, row: usize, channel: usize, instrument: u8 },
    #[error("instrument {instrument} loop starts at frame {start} past its {len} frames")]
    LoopOutOfRange { instrument: usize, start: usize, len: usize },
    #[error("solo channel {channel} out of range ({channels} channels)")]
    SoloChannelOutOfRange { channel: usize, channels: usize },
}

/// A complete module as produced by a loader.
#[derive(Clone, Debug, Default)]
pub struct Module {
    /// Song title
    pub title: ArrayString<20>,
    /// Pattern indices in play order
    pub order_list: Vec<u8>,
    /// How many order-list entries are part of the song
    pub number_of_song_positions: usize,
    /// Pattern pool
    pub patterns: Vec<Pattern>,
    /// Instruments, referenced 1-based from rows
    pub instruments: Vec<Instrument>,
}

impl Module {
    /// Create an empty module.
    pub fn new(title: &str) -> Self {
        let mut module = Self::default();
        let _ = module.title.try_push_str(title);
        module
    }

    /// Set the order list; every entry is part of the song.
    pub fn with_order(mut self, order: &[u8]) -> Self {
        self.order_list = order.to_vec();
        self.number_of_song_positions = order.len();
        self
    }

    /// Number of channels (taken from the first pattern).
    pub fn num_channels(&self) -> usize {
        self.patterns.first().map_or(0, Pattern::num_channels)
    }

    /// Check that the module can be played with the given order list.
    ///
    /// `order` overrides the module's own order list; its whole length is
    /// the song length.
    pub fn validate_with_order(&self, order: Option<&[u8]>) -> Result<(), ModuleError> {
        let (order, positions) = match order {
            Some(o) => (o, o.len()),
            None => (self.order_list.as_slice(), self.number_of_song_positions),
        };

        if order.is_empty() {
            return Err(ModuleError::EmptyOrderList);
        }
        if positions == 0 || positions > order.len() || positions > MAX_ORDER_POSITIONS {
            return Err(ModuleError::InvalidSongLength {
                positions,
                order_len: order.len(),
            });
        }
        for (position, &pattern) in order[..positions].iter().enumerate() {
            if pattern as usize >= self.patterns.len() {
                return Err(ModuleError::MissingPattern { position, pattern });
            }
        }

        self.validate_patterns()?;
        self.validate_instruments()
    }

    /// Check the module with its own order list.
    pub fn validate(&self) -> Result<(), ModuleError> {
        self.validate_with_order(None)
    }

    fn validate_patterns(&self) -> Result<(), ModuleError> {
        let expected = self.num_channels();
        for (index, pattern) in self.patterns.iter().enumerate() {
            let found = pattern.num_channels();
            if found == 0 {
                return Err(ModuleError::NoChannels { pattern: index });
            }
            if found != expected {
                return Err(ModuleError::ChannelCountMismatch {
                    pattern: index,
                    expected,
                    found,
                });
            }
            for (channel, column) in pattern.channels.iter().enumerate() {
                for (row, cell) in column.rows.iter().enumerate() {
                    if cell.instrument as usize > self.instruments.len() {
                        return Err(ModuleError::MissingInstrument {
                            pattern: index,
                            row,
                            channel,
                            instrument: cell.instrument,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_instruments(&self) -> Result<(), ModuleError> {
        for (index, inst) in self.instruments.iter().enumerate() {
            if inst.is_looped() && inst.loop_start_frame() >= inst.len() {
                return Err(ModuleError::LoopOutOfRange {
                    instrument: index,
                    start: inst.loop_start_frame(),
                    len: inst.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Row;

    fn module() -> Module {
        let mut m = Module::new("test").with_order(&[0, 1, 0]);
        m.patterns = vec![Pattern::new(4), Pattern::new(4)];
        m.instruments = vec![Instrument::from_pcm8("a", &[0; 16])];
        m
    }

    #[test]
    fn valid_module_passes() {
        assert_eq!(module().validate(), Ok(()));
        assert_eq!(module().num_channels(), 4);
    }

    #[test]
    fn empty_order_list_rejected() {
        let m = Module { order_list: vec![], ..module() };
        assert_eq!(m.validate(), Err(ModuleError::EmptyOrderList));
    }

    #[test]
    fn song_length_must_fit_order_list() {
        let m = Module { number_of_song_positions: 4, ..module() };
        assert!(matches!(m.validate(), Err(ModuleError::InvalidSongLength { .. })));
        let m = Module { number_of_song_positions: 0, ..module() };
        assert!(matches!(m.validate(), Err(ModuleError::InvalidSongLength { .. })));
    }

    #[test]
    fn entries_past_song_length_are_not_checked() {
        let mut m = module();
        m.order_list.push(99);
        assert_eq!(m.validate(), Ok(()));
    }

    #[test]
    fn missing_pattern_rejected() {
        let m = module();
        assert_eq!(
            m.validate_with_order(Some(&[0, 2])),
            Err(ModuleError::MissingPattern { position: 1, pattern: 2 })
        );
    }

    #[test]
    fn channel_mismatch_rejected() {
        let mut m = module();
        m.patterns.push(Pattern::new(8));
        assert_eq!(
            m.validate(),
            Err(ModuleError::ChannelCountMismatch { pattern: 2, expected: 4, found: 8 })
        );
    }

    #[test]
    fn missing_instrument_rejected() {
        let mut m = module();
        *m.patterns[1].row_mut(7, 3) = Row::new(2, 428);
        assert_eq!(
            m.validate(),
            Err(ModuleError::MissingInstrument { pattern: 1, row: 7, channel: 3, instrument: 2 })
        );
    }

    #[test]
    fn loop_past_end_rejected() {
        let mut m = module();
        m.instruments[0] = Instrument::from_pcm8("a", &[0; 16]).with_loop(8, 4);
        assert!(matches!(m.validate(), Err(ModuleError::LoopOutOfRange { instrument: 0, .. })));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = ModuleError::MissingPattern { position: 3, pattern: 9 };
        assert_eq!(err.to_string(), "order position 3 references missing pattern 9");
    }
}
