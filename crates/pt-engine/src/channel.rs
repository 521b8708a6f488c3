//! Per-channel note and effect state.

use pt_ir::{Effect, Instrument, Panning, Row};

use crate::period::{clamp_period, fine_tune_period, shift_semitones};
use crate::resampler::Resampler;
use crate::tempo::Tempo;
use crate::vibrato::Vibrato;

/// Divisor that maps 8-bit PCM levels onto [-1, 1].
pub const PCM8_FULL_SCALE: f32 = 128.0;

/// Maximum channel volume.
pub const MAX_VOLUME: u8 = 64;

/// Period change below which the resampler step is left alone.
const PITCH_EPSILON: f64 = 1e-3;

/// Scale a sample by a 0-64 volume. Full volume is an exact pass-through.
pub fn sample_with_volume(sample: f32, volume: u8) -> f32 {
    if volume >= MAX_VOLUME {
        sample
    } else {
        sample * volume as f32 / MAX_VOLUME as f32
    }
}

/// One tracker channel: the current note, its effect state and a resampler.
///
/// Row data arrives through [`set_row_data`](Self::set_row_data) at the start
/// of each row, tick updates through
/// [`apply_per_tick_effects`](Self::apply_per_tick_effects), and audio is
/// pulled one frame at a time with [`next_sample`](Self::next_sample).
#[derive(Clone, Debug)]
pub struct ChannelAudioGenerator<'a> {
    sample_rate: u32,
    tempo: Tempo,
    panning: Panning,
    resampler: Resampler<'a>,
    /// Current instrument and its 0-based index
    instrument: Option<(usize, &'a Instrument)>,
    instrument_playing: bool,

    // Pitch state (Amiga periods)
    /// Target note after fine-tune
    specified_pitch: f64,
    /// Pitch after slides and arpeggio
    actual_pitch: f64,
    /// Pitch the resampler step was last computed for
    sounding_pitch: f64,

    /// Current volume (0-64)
    volume: u8,
    effect: Effect,

    // Effect memory
    /// Last slide-to-note speed (period units per tick)
    slide_to_note_step: u8,
    vibrato: Vibrato,
}

impl<'a> ChannelAudioGenerator<'a> {
    pub fn new(panning: Panning, sample_rate: u32, tempo: Tempo) -> Self {
        Self {
            sample_rate,
            tempo,
            panning,
            resampler: Resampler::new(),
            instrument: None,
            instrument_playing: false,
            specified_pitch: 0.0,
            actual_pitch: 0.0,
            sounding_pitch: 0.0,
            volume: MAX_VOLUME,
            effect: Effect::None,
            slide_to_note_step: 0,
            vibrato: Vibrato::new(),
        }
    }

    // --- Accessors ---

    pub fn panning(&self) -> Panning {
        self.panning
    }

    pub fn set_panning(&mut self, panning: Panning) {
        self.panning = panning;
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn specified_pitch(&self) -> f64 {
        self.specified_pitch
    }

    pub fn actual_pitch(&self) -> f64 {
        self.actual_pitch
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn is_instrument_playing(&self) -> bool {
        self.instrument_playing
    }

    /// 1-based number of the current instrument (0 = none).
    pub fn instrument_number(&self) -> u8 {
        self.instrument.map_or(0, |(index, _)| index as u8 + 1)
    }

    pub fn resampler(&self) -> &Resampler<'a> {
        &self.resampler
    }

    pub fn vibrato(&self) -> &Vibrato {
        &self.vibrato
    }

    /// Silence the channel until the next note.
    pub fn stop(&mut self) {
        self.instrument_playing = false;
    }

    /// Follow a speed or BPM change (vibrato timing depends on both).
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
        self.retune_vibrato();
    }

    fn retune_vibrato(&mut self) {
        let samples_per_row = self.tempo.samples_per_row(self.sample_rate);
        self.vibrato.retune(samples_per_row, self.tempo.ticks_per_row);
    }

    // --- Row data ---

    /// Take a new row: instrument first, then pitch, then the effect.
    ///
    /// # Panics
    ///
    /// Panics if the row names an instrument that is not in `instruments`.
    /// Modules are validated before playback, so this is an invariant.
    pub fn set_row_data(&mut self, row: &Row, instruments: &'a [Instrument]) {
        let effect = row.decoded_effect();

        // Arpeggio only ever offsets from the base note.
        if matches!(self.effect, Effect::Arpeggio { .. }) {
            self.actual_pitch = self.specified_pitch;
        }

        if row.instrument != 0 {
            self.set_instrument(row.instrument as usize - 1, row.pitch != 0, &effect, instruments);
        }
        if row.pitch != 0 {
            self.set_pitch(row.pitch, &effect);
        }
        self.set_effect(effect);
    }

    fn set_instrument(
        &mut self,
        index: usize,
        has_pitch: bool,
        effect: &Effect,
        instruments: &'a [Instrument],
    ) {
        let instrument = &instruments[index];
        let changed = self.instrument.map_or(true, |(current, _)| current != index);

        if changed {
            if !has_pitch {
                self.stop();
            }
            self.resampler.bind(instrument);
            // Only a plain slide-to-note keeps the waveform position; the
            // volume-slide variant restarts it even though its pitch ties.
            if !matches!(effect, Effect::SlideToNote(_)) {
                self.resampler.restart();
            }
        }
        self.instrument = Some((index, instrument));
        self.volume = instrument.volume.min(MAX_VOLUME);
    }

    fn set_pitch(&mut self, pitch: u16, effect: &Effect) {
        let fine_tune = match effect {
            Effect::SetFineTune(fine_tune) => *fine_tune,
            _ => self.instrument.map_or(0, |(_, inst)| inst.fine_tune),
        };
        self.specified_pitch = fine_tune_period(pitch as f64, fine_tune as i32);

        if effect.is_slide_to_note() && self.instrument_playing {
            return;
        }

        self.actual_pitch = self.specified_pitch;
        self.resampler.restart();
        self.vibrato.reset_phase();
        self.instrument_playing = true;
        self.update_step(self.actual_pitch);
        log::trace!(
            "note on: instrument {} period {:.2}",
            self.instrument_number(),
            self.actual_pitch
        );
    }

    fn set_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SlideToNote(step) if step > 0 => self.slide_to_note_step = step,
            Effect::Vibrato { rate, depth } => {
                if self.vibrato.set_params(rate, depth) {
                    self.retune_vibrato();
                }
            }
            _ => {}
        }
        self.effect = effect;
    }

    // --- Effects ---

    /// Effects evaluated once, before the row's first sample.
    pub fn apply_start_of_row_effects(&mut self) {
        match self.effect {
            Effect::FineVolumeSlideUp(amount) => {
                self.volume = (self.volume + amount).min(MAX_VOLUME);
            }
            Effect::FineVolumeSlideDown(amount) => {
                self.volume = self.volume.saturating_sub(amount);
            }
            Effect::SetVolume(volume) => self.volume = volume.min(MAX_VOLUME),
            Effect::InstrumentOffset(frames) => self.resampler.set_offset(frames),
            Effect::None
            | Effect::Arpeggio { .. }
            | Effect::PitchSlideUp(_)
            | Effect::PitchSlideDown(_)
            | Effect::SlideToNote(_)
            | Effect::Vibrato { .. }
            | Effect::SlideToNoteVolumeSlide(_)
            | Effect::VibratoVolumeSlide(_)
            | Effect::SetFineTune(_)
            | Effect::VolumeSlide(_)
            | Effect::PositionJump(_)
            | Effect::PatternBreak(_)
            | Effect::SetTicksPerRow(_)
            | Effect::SetBpm(_) => {}
        }
    }

    /// Effects evaluated on every tick but the first of a row.
    pub fn apply_per_tick_effects(&mut self, tick: u8) {
        if tick == 0 {
            return;
        }
        if let Some(delta) = self.effect.volume_slide() {
            self.slide_volume(delta);
        }
        match self.effect {
            Effect::SlideToNote(_) | Effect::SlideToNoteVolumeSlide(_) => self.slide_to_note(),
            Effect::PitchSlideUp(amount) => self.slide_pitch(-(amount as f64)),
            Effect::PitchSlideDown(amount) => self.slide_pitch(amount as f64),
            Effect::Arpeggio { x, y } => {
                if self.specified_pitch > 0.0 {
                    self.actual_pitch = match tick % 3 {
                        0 => self.specified_pitch,
                        1 => shift_semitones(self.specified_pitch, x),
                        _ => shift_semitones(self.specified_pitch, y),
                    };
                }
            }
            Effect::None
            | Effect::VolumeSlide(_)
            | Effect::VibratoVolumeSlide(_)
            | Effect::Vibrato { .. }
            | Effect::SetFineTune(_)
            | Effect::SetVolume(_)
            | Effect::FineVolumeSlideUp(_)
            | Effect::FineVolumeSlideDown(_)
            | Effect::InstrumentOffset(_)
            | Effect::PositionJump(_)
            | Effect::PatternBreak(_)
            | Effect::SetTicksPerRow(_)
            | Effect::SetBpm(_) => {}
        }
    }

    fn slide_volume(&mut self, delta: i8) {
        self.volume = (self.volume as i16 + delta as i16).clamp(0, MAX_VOLUME as i16) as u8;
    }

    /// Move the sounding pitch toward the target without overshooting.
    fn slide_to_note(&mut self) {
        if self.specified_pitch <= 0.0 {
            return;
        }
        let step = self.slide_to_note_step as f64;
        self.actual_pitch = if self.actual_pitch < self.specified_pitch {
            (self.actual_pitch + step).min(self.specified_pitch)
        } else {
            (self.actual_pitch - step).max(self.specified_pitch)
        };
    }

    /// Shift both target and sounding pitch (pitch slide up/down).
    fn slide_pitch(&mut self, delta: f64) {
        if self.specified_pitch <= 0.0 {
            return;
        }
        self.specified_pitch = clamp_period(self.specified_pitch + delta);
        self.actual_pitch = self.specified_pitch;
    }

    fn update_step(&mut self, pitch: f64) {
        self.resampler.recalculate_step(pitch, self.sample_rate);
        self.sounding_pitch = pitch;
    }

    // --- Rendering ---

    /// Produce the next stereo frame in [-1, 1] per side.
    pub fn next_sample(&mut self) -> (f32, f32) {
        if !self.instrument_playing || !self.resampler.is_bound() {
            return (0.0, 0.0);
        }

        let vibrating = self.effect.is_vibrato();
        let pitch = if vibrating {
            self.actual_pitch + self.vibrato.pitch_offset()
        } else {
            self.actual_pitch
        };
        if libm::fabs(pitch - self.sounding_pitch) > PITCH_EPSILON {
            self.update_step(pitch);
        }

        let sample = self.resampler.interpolated_sample() / PCM8_FULL_SCALE;
        let sample = sample_with_volume(sample, self.volume);

        if vibrating {
            self.vibrato.advance();
        }

        match self.panning {
            Panning::Left => (sample, 0.0),
            Panning::Right => (0.0, sample),
        }
    }
}
