//! Song playback: sequencing rows and mixing channels into frames.

use alloc::vec;
use alloc::vec::Vec;

use pt_ir::{Effect, Module, ModuleError, Panning};

use crate::channel::ChannelAudioGenerator;
use crate::config::PlaybackConfig;
use crate::frame::Frame;
use crate::sequencer::{Advance, Arrangement, SongCursor, SongPosition};
use crate::tempo::Tempo;

/// Plays a [`Module`] into interleaved 16-bit stereo.
///
/// Each output sample runs the same steps: at the first sample of a row
/// the new row data is handed to the channels, at the first sample of
/// every later tick the per-tick effects run, then all audible channels
/// are mixed and the song position moves forward.
///
/// ```ignore
/// let mut generator = AudioGenerator::new(&module, PlaybackConfig::default())?;
/// while generator.song_still_active() {
///     let block = generator.generate_next_samples(0);
///     sink.write(&block);
/// }
/// ```
pub struct AudioGenerator<'m> {
    module: &'m Module,
    arrangement: Arrangement<'m>,
    channels: Vec<ChannelAudioGenerator<'m>>,
    /// Per-channel solo mask
    audible: Vec<bool>,
    cursor: SongCursor,
    tempo: Tempo,
    sample_rate: u32,
    samples_per_tick: u32,
    legacy_extra_frame: bool,
}

impl<'m> AudioGenerator<'m> {
    /// Validate `module` and prepare playback from its first row.
    pub fn new(module: &'m Module, config: PlaybackConfig) -> Result<Self, ModuleError> {
        module.validate_with_order(config.order_list.as_deref())?;

        let num_channels = module.num_channels();
        if let Some(&channel) = config.solo_channels.iter().find(|&&ch| ch >= num_channels) {
            return Err(ModuleError::SoloChannelOutOfRange {
                channel,
                channels: num_channels,
            });
        }

        let arrangement = Arrangement::new(module, config.order_list.as_deref());
        let first = arrangement.pattern(arrangement.pattern_at(0));
        let tempo = Tempo::default();

        let channels = (0..num_channels)
            .map(|ch| {
                let panning = first.channels.get(ch).map_or(Panning::amiga(ch), |c| c.panning);
                ChannelAudioGenerator::new(panning, config.sample_rate, tempo)
            })
            .collect();
        let audible = (0..num_channels).map(|ch| config.is_audible(ch)).collect();
        let cursor = SongCursor::new(&arrangement);

        log::debug!(
            "playing '{}': {} channels, {} positions, {} Hz",
            module.title,
            num_channels,
            arrangement.positions(),
            config.sample_rate
        );

        Ok(Self {
            module,
            arrangement,
            channels,
            audible,
            cursor,
            tempo,
            sample_rate: config.sample_rate,
            samples_per_tick: tempo.samples_per_tick(config.sample_rate),
            legacy_extra_frame: config.legacy_extra_frame,
        })
    }

    /// Returns true until the last row of the song has finished.
    pub fn song_still_active(&self) -> bool {
        self.cursor.is_active()
    }

    pub fn position(&self) -> Option<SongPosition> {
        self.cursor.position()
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn samples_per_tick(&self) -> u32 {
        self.samples_per_tick
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelAudioGenerator<'m>> {
        self.channels.get(index)
    }

    /// Render a block of interleaved stereo samples.
    ///
    /// `count` is in frames. Zero means "up to the end of the current
    /// tick". Once the song has ended the block is a single silent frame;
    /// a block that crosses the end is padded with silence.
    pub fn generate_next_samples(&mut self, count: usize) -> Vec<i16> {
        if !self.song_still_active() {
            return vec![0, 0];
        }

        let mut frames = if count == 0 {
            self.samples_per_tick.saturating_sub(self.cursor.sample()) as usize
        } else {
            count
        };
        if self.legacy_extra_frame {
            frames += 1;
        }

        let mut out = Vec::with_capacity(frames * 2);
        for _ in 0..frames {
            let frame = self.next_frame();
            out.push(frame.left);
            out.push(frame.right);
        }
        out
    }

    /// Fill an interleaved stereo buffer in place.
    ///
    /// Returns the number of frames rendered before the song ended; the
    /// rest of the buffer is zeroed, including a trailing odd sample.
    pub fn fill(&mut self, out: &mut [i16]) -> usize {
        let mut rendered = 0;
        let mut pairs = out.chunks_exact_mut(2);
        for pair in &mut pairs {
            if self.song_still_active() {
                let frame = self.next_frame();
                pair[0] = frame.left;
                pair[1] = frame.right;
                rendered += 1;
            } else {
                pair[0] = 0;
                pair[1] = 0;
            }
        }
        pairs.into_remainder().fill(0);
        rendered
    }

    /// Render up to `max_frames` frames, stopping early at the song end.
    pub fn render_frames(&mut self, max_frames: usize) -> Vec<Frame> {
        let mut frames = Vec::new();
        while frames.len() < max_frames && self.song_still_active() {
            frames.push(self.next_frame());
        }
        frames
    }

    /// Render one frame and advance the song by one sample.
    pub fn next_frame(&mut self) -> Frame {
        if !self.song_still_active() {
            return Frame::silence();
        }

        if self.cursor.at_tick_start() {
            match self.cursor.tick() {
                0 => self.apply_new_row_data(),
                tick => self.apply_per_tick_effects(tick),
            }
        }

        let frame = self.mix();
        if self.cursor.advance(&self.arrangement, self.samples_per_tick, self.tempo.ticks_per_row)
            == Advance::Ended
        {
            log::info!("'{}' finished", self.module.title);
        }
        frame
    }

    fn apply_new_row_data(&mut self) {
        let Some(at) = self.cursor.current() else {
            return;
        };
        let pattern = self.arrangement.pattern(at.pattern);

        // Speed changes are global and take effect from this row.
        let mut tempo = self.tempo;
        for row in pattern.rows_at(at.row) {
            match row.decoded_effect() {
                Effect::SetTicksPerRow(0) => {
                    log::warn!(
                        "ignoring zero ticks per row at pattern {} row {}",
                        at.pattern,
                        at.row
                    );
                }
                Effect::SetTicksPerRow(ticks) => tempo.ticks_per_row = ticks,
                Effect::SetBpm(bpm) => tempo.bpm = bpm,
                _ => {}
            }
        }
        if tempo != self.tempo {
            self.set_tempo(tempo);
        }

        let module = self.module;
        let instruments = &module.instruments;
        for ((channel, column), &audible) in self
            .channels
            .iter_mut()
            .zip(&pattern.channels)
            .zip(&self.audible)
        {
            if !audible {
                continue;
            }
            channel.set_panning(column.panning);
            channel.set_row_data(&column.rows[at.row], instruments);
            channel.apply_start_of_row_effects();
        }
    }

    fn set_tempo(&mut self, tempo: Tempo) {
        log::debug!("tempo {} bpm, {} ticks per row", tempo.bpm, tempo.ticks_per_row);
        self.tempo = tempo;
        self.samples_per_tick = tempo.samples_per_tick(self.sample_rate);
        for channel in &mut self.channels {
            channel.set_tempo(tempo);
        }
    }

    fn apply_per_tick_effects(&mut self, tick: u8) {
        for (channel, &audible) in self.channels.iter_mut().zip(&self.audible) {
            if audible {
                channel.apply_per_tick_effects(tick);
            }
        }
    }

    fn mix(&mut self) -> Frame {
        let mut left = 0.0;
        let mut right = 0.0;
        for (channel, &audible) in self.channels.iter_mut().zip(&self.audible) {
            if audible {
                let (l, r) = channel.next_sample();
                left += l;
                right += r;
            }
        }
        Frame::from_mix(left, right)
    }
}
