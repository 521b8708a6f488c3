//! Module data model for the ptplay ProTracker engine.
//!
//! A loader fills these types from a module file; the playback engine
//! borrows them read-only.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod effects;
mod instrument;
mod module;
mod pattern;

pub use effects::{Effect, EffectType, MAX_BREAK_ROW, MAX_JUMP_POSITION, SPEED_TEMPO_THRESHOLD};
pub use instrument::Instrument;
pub use module::{Module, ModuleError, MAX_ORDER_POSITIONS};
pub use pattern::{Channel, Panning, Pattern, Row, ROWS_PER_PATTERN};
