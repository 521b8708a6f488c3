//! Amiga period math.
//!
//! Pitch is carried as a period (inverse frequency). Smaller periods play
//! faster; the resampler turns a period into a per-output-sample step.

/// PAL Amiga clock rate in Hz.
pub const PAL_CLOCK_RATE: f64 = 7_093_789.2;

/// Frequency ratio of one fine-tune unit (1/8 semitone).
pub const FINE_TUNE_RATIO: f64 = 1.007246412;

/// Fine-tune units per semitone.
pub const FINE_TUNE_PER_SEMITONE: i32 = 8;

/// Lowest allowed period (highest pitch, B-3).
pub const PERIOD_MIN: f64 = 113.0;

/// Highest allowed period (lowest pitch, C-1).
pub const PERIOD_MAX: f64 = 856.0;

/// Clamp a period to the slide range.
pub fn clamp_period(period: f64) -> f64 {
    period.clamp(PERIOD_MIN, PERIOD_MAX)
}

/// Apply a fine-tune (in eighths of a semitone) to a period.
///
/// Positive fine-tune raises pitch, so the period shrinks.
pub fn fine_tune_period(period: f64, fine_tune: i32) -> f64 {
    period / libm::pow(FINE_TUNE_RATIO, fine_tune as f64)
}

/// Raise a period by whole semitones.
pub fn shift_semitones(period: f64, semitones: u8) -> f64 {
    fine_tune_period(period, semitones as i32 * FINE_TUNE_PER_SEMITONE)
}

/// Resampler step for a period at the given output rate.
///
/// Returns 0 for a zero period or sample rate.
pub fn period_to_step(period: f64, sample_rate: u32) -> f64 {
    if period <= 0.0 || sample_rate == 0 {
        return 0.0;
    }
    (PAL_CLOCK_RATE / (period * 2.0)) / sample_rate as f64
}
