//! ptplay: a ProTracker module playback engine.
//!
//! Build a [`Module`] (from a loader or by hand), hand it to an
//! [`AudioGenerator`] and pull interleaved 16-bit stereo from it:
//!
//! ```
//! use ptplay::{AudioGenerator, Instrument, Module, Pattern, PlaybackConfig, Row};
//!
//! let mut module = Module::new("demo").with_order(&[0]);
//! module.instruments.push(Instrument::from_pcm8("blip", &[0, 64, 127, 64, 0, -64, -127, -64]));
//! let mut pattern = Pattern::new(4);
//! *pattern.row_mut(0, 0) = Row::new(1, 428);
//! module.patterns.push(pattern);
//!
//! let mut generator = AudioGenerator::new(&module, PlaybackConfig::default())?;
//! let block = generator.generate_next_samples(0);
//! assert_eq!(block.len(), 2 * generator.samples_per_tick() as usize);
//! # Ok::<(), ptplay::ModuleError>(())
//! ```

pub use pt_engine as engine;
pub use pt_ir as ir;

pub use pt_engine::{AudioGenerator, Frame, PlaybackConfig, SongPosition, Tempo};
pub use pt_ir::{Effect, EffectType, Instrument, Module, ModuleError, Panning, Pattern, Row};
