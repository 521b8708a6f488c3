//! Song position tracking: orders, patterns, rows, ticks and samples.

use alloc::borrow::Cow;

use pt_ir::{Effect, Module, Pattern, ROWS_PER_PATTERN};

/// A row within the song.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRef {
    /// Order-list position
    pub order: usize,
    /// Pattern index
    pub pattern: usize,
    /// Row within the pattern (0-63)
    pub row: usize,
}

/// Snapshot of the playback position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SongPosition {
    pub order: usize,
    pub pattern: usize,
    pub row: usize,
    pub tick: u8,
    pub sample: u32,
}

/// The patterns of a module in play order.
#[derive(Clone, Debug)]
pub struct Arrangement<'m> {
    patterns: &'m [Pattern],
    order: Cow<'m, [u8]>,
    positions: usize,
}

impl<'m> Arrangement<'m> {
    /// Use `order` in place of the module's own order list when given.
    pub fn new(module: &'m Module, order: Option<&[u8]>) -> Self {
        match order {
            Some(order) => Self {
                patterns: &module.patterns,
                positions: order.len(),
                order: Cow::Owned(order.to_vec()),
            },
            None => Self {
                patterns: &module.patterns,
                positions: module.number_of_song_positions,
                order: Cow::Borrowed(&module.order_list),
            },
        }
    }

    /// Number of order-list entries that are part of the song.
    pub fn positions(&self) -> usize {
        self.positions
    }

    /// Pattern index at an order-list position.
    pub fn pattern_at(&self, order: usize) -> usize {
        self.order[order] as usize
    }

    pub fn pattern(&self, index: usize) -> &'m Pattern {
        &self.patterns[index]
    }

    /// First row of the song.
    pub fn start(&self) -> RowRef {
        RowRef {
            order: 0,
            pattern: self.pattern_at(0),
            row: 0,
        }
    }

    /// The row that plays after `current`, or `None` when the song ends.
    ///
    /// A row ends its pattern when it is row 63 or any channel carries a
    /// pattern break or position jump. If several channels carry the same
    /// global effect, the highest channel wins. Ending the pattern on the
    /// last order position ends the song.
    pub fn next_row(&self, current: RowRef) -> Option<RowRef> {
        let mut break_row = None;
        let mut jump = None;
        let mut ends_pattern = current.row + 1 >= ROWS_PER_PATTERN;
        for row in self.patterns[current.pattern].rows_at(current.row) {
            let effect = row.decoded_effect();
            ends_pattern |= effect.ends_pattern();
            match effect {
                Effect::PatternBreak(target) => break_row = Some(target as usize),
                Effect::PositionJump(target) => jump = Some(target as usize),
                _ => {}
            }
        }

        if !ends_pattern {
            return Some(RowRef {
                row: current.row + 1,
                ..current
            });
        }
        if current.order + 1 >= self.positions {
            return None;
        }

        let order = jump.unwrap_or(current.order + 1);
        if order >= self.positions {
            log::debug!("position jump to {} is past the song end", order);
            return None;
        }
        if let Some(row) = break_row {
            log::debug!(
                "pattern break at order {} row {} → row {}",
                current.order,
                current.row,
                row
            );
        }
        if jump.is_some() {
            log::debug!("position jump at order {} → order {}", current.order, order);
        }

        Some(RowRef {
            order,
            pattern: self.pattern_at(order),
            row: break_row.unwrap_or(0),
        })
    }
}

/// What changed when the cursor moved forward one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Still inside the same tick
    Sample,
    /// A new tick of the same row began
    Tick,
    /// A new row began
    Row,
    /// The song just ended
    Ended,
}

/// Sequencer state: the current and upcoming row plus tick/sample counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongCursor {
    /// `None` once the song has ended
    current: Option<RowRef>,
    next: Option<RowRef>,
    tick: u8,
    sample: u32,
}

impl SongCursor {
    /// Start at the first row and look one row ahead.
    pub fn new(arrangement: &Arrangement<'_>) -> Self {
        let current = arrangement.start();
        Self {
            current: Some(current),
            next: arrangement.next_row(current),
            tick: 0,
            sample: 0,
        }
    }

    pub fn current(&self) -> Option<RowRef> {
        self.current
    }

    /// The row queued to play after the current one.
    pub fn next(&self) -> Option<RowRef> {
        self.next
    }

    pub fn tick(&self) -> u8 {
        self.tick
    }

    pub fn sample(&self) -> u32 {
        self.sample
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Returns true at the first sample of a tick.
    pub fn at_tick_start(&self) -> bool {
        self.sample == 0
    }

    pub fn position(&self) -> Option<SongPosition> {
        self.current.map(|at| SongPosition {
            order: at.order,
            pattern: at.pattern,
            row: at.row,
            tick: self.tick,
            sample: self.sample,
        })
    }

    /// Move forward one output sample.
    pub fn advance(
        &mut self,
        arrangement: &Arrangement<'_>,
        samples_per_tick: u32,
        ticks_per_row: u8,
    ) -> Advance {
        if self.current.is_none() {
            return Advance::Ended;
        }

        self.sample += 1;
        if self.sample < samples_per_tick {
            return Advance::Sample;
        }
        self.sample = 0;
        self.tick += 1;
        if self.tick < ticks_per_row {
            return Advance::Tick;
        }
        self.tick = 0;

        self.current = self.next;
        match self.current {
            Some(at) => {
                log::trace!("order {} pattern {} row {}", at.order, at.pattern, at.row);
                self.next = arrangement.next_row(at);
                Advance::Row
            }
            None => {
                log::debug!("song ended");
                self.next = None;
                Advance::Ended
            }
        }
    }
}
