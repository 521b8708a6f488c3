//! Effect command types for tracker rows.

/// Effect tag as stored in a row, before its nibbles are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EffectType {
    /// Unrecognised command or empty effect column
    #[default]
    Unknown,
    Arpeggio,
    PitchSlideUp,
    PitchSlideDown,
    SlideToNote,
    Vibrato,
    SlideToNoteWithVolumeSlide,
    VibratoWithVolumeSlide,
    InstrumentOffset,
    VolumeSlide,
    PositionJump,
    SetVolume,
    PatternBreak,
    FineVolumeSlideUp,
    FineVolumeSlideDown,
    SetFineTune,
    ChangeSpeed,
}

/// Highest row a pattern break may target.
pub const MAX_BREAK_ROW: u8 = 63;

/// Highest order-list position a position jump may target.
pub const MAX_JUMP_POSITION: u8 = 127;

/// BPM threshold for the speed command: below it sets ticks per row.
pub const SPEED_TEMPO_THRESHOLD: u8 = 32;

/// Decoded effect with its parameters.
///
/// Built from an [`EffectType`] and the row's X/Y nibbles via
/// [`Effect::decode`]. The playback engine matches on this exhaustively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    None,

    // === Pitch ===
    /// Cycle between note, note+x and note+y semitones each tick
    Arpeggio { x: u8, y: u8 },
    /// Decrease the period by amount per tick
    PitchSlideUp(u8),
    /// Increase the period by amount per tick
    PitchSlideDown(u8),
    /// Slide toward the target note; 0 reuses the previous step
    SlideToNote(u8),
    /// Vibrato; a zero nibble keeps the previous rate/depth
    Vibrato { rate: u8, depth: u8 },
    /// Continue slide-to-note while sliding volume
    SlideToNoteVolumeSlide(i8),
    /// Continue vibrato while sliding volume
    VibratoVolumeSlide(i8),
    /// Per-note fine-tune override (-8 to +7)
    SetFineTune(i8),

    // === Volume ===
    /// Volume delta per tick (positive = up)
    VolumeSlide(i8),
    /// Set channel volume (0-64)
    SetVolume(u8),
    /// Raise volume once at row start
    FineVolumeSlideUp(u8),
    /// Lower volume once at row start
    FineVolumeSlideDown(u8),

    // === Sample ===
    /// Start the note at this frame offset
    InstrumentOffset(u32),

    // === Song flow ===
    /// Jump to order-list position
    PositionJump(u8),
    /// Break to row in the next pattern
    PatternBreak(u8),
    /// Set ticks per row
    SetTicksPerRow(u8),
    /// Set beats per minute
    SetBpm(u8),
}

impl Effect {
    /// Interpret an effect tag and its two 4-bit parameters.
    pub fn decode(kind: EffectType, x: u8, y: u8) -> Effect {
        let x = x & 0x0F;
        let y = y & 0x0F;
        let byte = (x << 4) | y;

        match kind {
            EffectType::Unknown => Effect::None,
            EffectType::Arpeggio if byte == 0 => Effect::None,
            EffectType::Arpeggio => Effect::Arpeggio { x, y },
            EffectType::PitchSlideUp => Effect::PitchSlideUp(byte),
            EffectType::PitchSlideDown => Effect::PitchSlideDown(byte),
            EffectType::SlideToNote => Effect::SlideToNote(byte),
            EffectType::Vibrato => Effect::Vibrato { rate: x, depth: y },
            EffectType::SlideToNoteWithVolumeSlide => {
                Effect::SlideToNoteVolumeSlide(nibbles_to_slide(x, y))
            }
            EffectType::VibratoWithVolumeSlide => {
                Effect::VibratoVolumeSlide(nibbles_to_slide(x, y))
            }
            EffectType::InstrumentOffset => {
                Effect::InstrumentOffset(x as u32 * 4096 + y as u32 * 256)
            }
            EffectType::VolumeSlide => Effect::VolumeSlide(nibbles_to_slide(x, y)),
            EffectType::PositionJump => Effect::PositionJump(byte.min(MAX_JUMP_POSITION)),
            EffectType::SetVolume => Effect::SetVolume(byte.min(64)),
            EffectType::PatternBreak => Effect::PatternBreak((x * 10 + y).min(MAX_BREAK_ROW)),
            EffectType::FineVolumeSlideUp => Effect::FineVolumeSlideUp(y),
            EffectType::FineVolumeSlideDown => Effect::FineVolumeSlideDown(y),
            EffectType::SetFineTune => {
                Effect::SetFineTune(if y >= 8 { y as i8 - 16 } else { y as i8 })
            }
            EffectType::ChangeSpeed if byte < SPEED_TEMPO_THRESHOLD => Effect::SetTicksPerRow(byte),
            EffectType::ChangeSpeed => Effect::SetBpm(byte),
        }
    }

    /// Returns true for effects that tie into the current note instead of
    /// restarting it.
    pub fn is_slide_to_note(&self) -> bool {
        matches!(self, Effect::SlideToNote(_) | Effect::SlideToNoteVolumeSlide(_))
    }

    /// Returns true for effects that run the vibrato oscillator.
    pub fn is_vibrato(&self) -> bool {
        matches!(self, Effect::Vibrato { .. } | Effect::VibratoVolumeSlide(_))
    }

    /// Per-tick volume delta, if this effect slides volume.
    pub fn volume_slide(&self) -> Option<i8> {
        match self {
            Effect::VolumeSlide(d)
            | Effect::VibratoVolumeSlide(d)
            | Effect::SlideToNoteVolumeSlide(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns true for effects that end the current pattern.
    pub fn ends_pattern(&self) -> bool {
        matches!(self, Effect::PatternBreak(_) | Effect::PositionJump(_))
    }
}

/// Convert volume slide nibbles to a signed delta. X wins when both are set.
fn nibbles_to_slide(x: u8, y: u8) -> i8 {
    if x > 0 {
        x as i8
    } else {
        -(y as i8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_arpeggio_is_no_effect() {
        assert_eq!(Effect::decode(EffectType::Arpeggio, 0, 0), Effect::None);
        assert_eq!(
            Effect::decode(EffectType::Arpeggio, 3, 7),
            Effect::Arpeggio { x: 3, y: 7 }
        );
    }

    #[test]
    fn pattern_break_is_decimal_and_clamped() {
        assert_eq!(Effect::decode(EffectType::PatternBreak, 1, 6), Effect::PatternBreak(16));
        assert_eq!(Effect::decode(EffectType::PatternBreak, 9, 9), Effect::PatternBreak(63));
    }

    #[test]
    fn position_jump_is_hex_and_clamped() {
        assert_eq!(Effect::decode(EffectType::PositionJump, 0, 5), Effect::PositionJump(5));
        assert_eq!(Effect::decode(EffectType::PositionJump, 0xF, 0xF), Effect::PositionJump(127));
    }

    #[test]
    fn change_speed_splits_at_32() {
        assert_eq!(Effect::decode(EffectType::ChangeSpeed, 0, 6), Effect::SetTicksPerRow(6));
        assert_eq!(Effect::decode(EffectType::ChangeSpeed, 1, 0xF), Effect::SetTicksPerRow(31));
        assert_eq!(Effect::decode(EffectType::ChangeSpeed, 2, 0), Effect::SetBpm(32));
        assert_eq!(Effect::decode(EffectType::ChangeSpeed, 7, 0xD), Effect::SetBpm(125));
    }

    #[test]
    fn set_volume_clamps_to_64() {
        assert_eq!(Effect::decode(EffectType::SetVolume, 4, 0), Effect::SetVolume(64));
        assert_eq!(Effect::decode(EffectType::SetVolume, 0xF, 0xF), Effect::SetVolume(64));
        assert_eq!(Effect::decode(EffectType::SetVolume, 2, 0), Effect::SetVolume(32));
    }

    #[test]
    fn fine_tune_nibble_is_signed() {
        assert_eq!(Effect::decode(EffectType::SetFineTune, 0, 7), Effect::SetFineTune(7));
        assert_eq!(Effect::decode(EffectType::SetFineTune, 0, 8), Effect::SetFineTune(-8));
        assert_eq!(Effect::decode(EffectType::SetFineTune, 0, 0xF), Effect::SetFineTune(-1));
    }

    #[test]
    fn instrument_offset_in_frames() {
        assert_eq!(
            Effect::decode(EffectType::InstrumentOffset, 1, 2),
            Effect::InstrumentOffset(4096 + 512)
        );
    }

    #[test]
    fn volume_slide_prefers_up_nibble() {
        assert_eq!(Effect::decode(EffectType::VolumeSlide, 4, 0), Effect::VolumeSlide(4));
        assert_eq!(Effect::decode(EffectType::VolumeSlide, 0, 3), Effect::VolumeSlide(-3));
        assert_eq!(
            Effect::decode(EffectType::VibratoWithVolumeSlide, 0, 2).volume_slide(),
            Some(-2)
        );
    }

    #[test]
    fn effect_classes() {
        assert!(Effect::SlideToNote(0).is_slide_to_note());
        assert!(Effect::SlideToNoteVolumeSlide(1).is_slide_to_note());
        assert!(!Effect::Vibrato { rate: 1, depth: 1 }.is_slide_to_note());
        assert!(Effect::VibratoVolumeSlide(-1).is_vibrato());
        assert!(Effect::PatternBreak(0).ends_pattern());
        assert!(!Effect::SetVolume(0).ends_pattern());
    }
}
