//! Sample playback with a fractional read cursor.

use pt_ir::Instrument;

use crate::period::period_to_step;

/// Read-only view of an instrument's frames with loop-aware bounds.
#[derive(Clone, Copy, Debug)]
pub struct SampleView<'a> {
    data: &'a [f32],
    loop_start: usize,
    looped: bool,
}

impl<'a> SampleView<'a> {
    pub fn new(instrument: &'a Instrument) -> Self {
        Self {
            data: &instrument.data,
            loop_start: instrument.loop_start_frame(),
            looped: instrument.is_looped(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Frame at `index`, or `None` past the end.
    pub fn at(&self, index: usize) -> Option<f32> {
        self.data.get(index).copied()
    }

    /// The frame that follows `index`.
    ///
    /// Past the end this is the loop start for looped instruments, and
    /// silence otherwise.
    pub fn following(&self, index: usize) -> f32 {
        match self.data.get(index + 1) {
            Some(&v) => v,
            None if self.looped => self.data.get(self.loop_start).copied().unwrap_or(0.0),
            None => 0.0,
        }
    }

    /// Fold a cursor that ran past the end back into the loop region.
    /// Non-looped cursors are returned unchanged.
    pub fn wrap(&self, cursor: f64) -> f64 {
        let len = self.data.len() as f64;
        if !self.looped || cursor < len {
            return cursor;
        }
        let start = self.loop_start as f64;
        let wrapped = start + (cursor - len);
        if wrapped < len {
            wrapped
        } else {
            start + libm::fmod(wrapped - start, len - start)
        }
    }
}

/// Fractional cursor into one instrument's sample data.
#[derive(Clone, Debug, Default)]
pub struct Resampler<'a> {
    samples: Option<SampleView<'a>>,
    cursor: f64,
    step: f64,
}

impl<'a> Resampler<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to another instrument, keeping the cursor.
    pub fn bind(&mut self, instrument: &'a Instrument) {
        self.samples = Some(SampleView::new(instrument));
    }

    pub fn is_bound(&self) -> bool {
        self.samples.is_some()
    }

    /// Move the cursor back to the start of the instrument.
    pub fn restart(&mut self) {
        self.cursor = 0.0;
    }

    /// Place the cursor at a frame offset.
    pub fn set_offset(&mut self, frames: u32) {
        self.cursor = frames as f64;
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Set the per-output-sample advance directly.
    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }

    /// Derive the step from a period and the output rate.
    pub fn recalculate_step(&mut self, pitch: f64, sample_rate: u32) {
        self.step = period_to_step(pitch, sample_rate);
    }

    /// Read one output sample and advance the cursor.
    ///
    /// The rise between neighbouring frames is spread evenly over the
    /// number of output samples that land in that span, counting the steps
    /// already taken since the left frame and those still needed to reach
    /// the right one.
    pub fn interpolated_sample(&mut self) -> f32 {
        let Some(view) = self.samples else {
            return 0.0;
        };
        if self.cursor >= view.len() as f64 {
            return 0.0;
        }

        let index = libm::floor(self.cursor) as usize;
        let sample = view.at(index).unwrap_or(0.0);
        let rise = view.following(index) - sample;

        let value = if self.step > 0.0 && rise != 0.0 {
            let frac = self.cursor - index as f64;
            let taken = libm::floor(frac / self.step);
            let remaining = libm::ceil((1.0 - frac) / self.step);
            let run = taken + remaining;
            if run > 0.0 {
                sample + rise * (taken / run) as f32
            } else {
                sample
            }
        } else {
            sample
        };

        self.cursor = view.wrap(self.cursor + self.step);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument(data: &[f32]) -> Instrument {
        let mut inst = Instrument::new("test");
        inst.data = data.to_vec();
        inst
    }

    #[test]
    fn unbound_resampler_is_silent() {
        let mut r = Resampler::new();
        r.set_step(1.0);
        assert_eq!(r.interpolated_sample(), 0.0);
        assert!(!r.is_bound());
    }

    #[test]
    fn unit_step_reads_frames_exactly() {
        let inst = instrument(&[0.0, 100.0, 200.0, 0.0]);
        let mut r = Resampler::new();
        r.bind(&inst);
        r.set_step(1.0);

        let out: Vec<f32> = (0..6).map(|_| r.interpolated_sample()).collect();
        assert_eq!(out, [0.0, 100.0, 200.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn looped_instrument_wraps_to_loop_start() {
        let inst = instrument(&[10.0, 20.0, 30.0, 40.0]).with_loop(0, 4);
        let mut r = Resampler::new();
        r.bind(&inst);
        r.set_step(1.0);
        r.set_offset(3);

        assert_eq!(r.interpolated_sample(), 40.0);
        assert_eq!(r.cursor(), 0.0);
        assert_eq!(r.interpolated_sample(), inst.data[inst.loop_start_frame()]);
    }

    #[test]
    fn loop_wraps_into_mid_sample_region() {
        let inst = instrument(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).with_loop(1, 2);
        let mut r = Resampler::new();
        r.bind(&inst);
        r.set_step(1.5);
        r.set_offset(5);
        r.interpolated_sample();
        // 5 + 1.5 = 6.5 → loop start (2) + 0.5
        assert!((r.cursor() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn slow_step_spreads_rise_evenly() {
        let inst = instrument(&[0.0, 100.0]);
        let mut r = Resampler::new();
        r.bind(&inst);
        r.set_step(0.25);

        let out: Vec<f32> = (0..4).map(|_| r.interpolated_sample()).collect();
        assert_eq!(out, [0.0, 25.0, 50.0, 75.0]);
    }

    #[test]
    fn unaligned_phase_still_spreads_over_the_run() {
        let inst = instrument(&[0.0, 100.0, 100.0]);
        let mut r = Resampler::new();
        r.bind(&inst);
        r.set_step(0.25);
        r.cursor = 0.1;

        let out: Vec<f32> = (0..4).map(|_| r.interpolated_sample()).collect();
        assert_eq!(out, [0.0, 25.0, 50.0, 75.0]);
    }

    #[test]
    fn non_looped_tail_fades_to_silence() {
        let inst = instrument(&[80.0]);
        let mut r = Resampler::new();
        r.bind(&inst);
        r.set_step(0.5);
        assert_eq!(r.interpolated_sample(), 80.0);
        assert_eq!(r.interpolated_sample(), 40.0);
        assert_eq!(r.interpolated_sample(), 0.0);
    }

    #[test]
    fn looped_tail_leads_into_loop_start() {
        let inst = instrument(&[0.0, 80.0, 0.0, 40.0]).with_loop(0, 2);
        let view = SampleView::new(&inst);
        assert_eq!(view.following(3), 0.0);
        let inst = instrument(&[5.0, 80.0, 0.0, 40.0]).with_loop(1, 1);
        assert_eq!(SampleView::new(&inst).following(3), 0.0);
        let inst = instrument(&[5.0, 80.0, 60.0, 40.0]).with_loop(1, 2);
        assert_eq!(SampleView::new(&inst).following(3), 60.0);
    }

    #[test]
    fn step_from_period() {
        let mut r = Resampler::new();
        r.recalculate_step(428.0, 44100);
        assert!((r.step() - 7_093_789.2 / 856.0 / 44100.0).abs() < 1e-12);
    }

    #[test]
    fn offset_past_end_is_silent() {
        let inst = instrument(&[1.0; 16]);
        let mut r = Resampler::new();
        r.bind(&inst);
        r.set_step(1.0);
        r.set_offset(256);
        assert_eq!(r.interpolated_sample(), 0.0);
    }
}
