//! Reader tunables and start-up options.

use crate::speech::{SpeechRate, VoicePreference};

pub const RATE_STEP_PCT: u16 = 10;
pub const WORD_ECHO_RATE_PCT: u16 = 80;
pub const SETTLE_BEFORE_ADVANCE_MS: u64 = 800;
pub const SETTLE_AFTER_ADVANCE_MS: u64 = 400;

/// Child-friendly English voices, best first.
pub const DEFAULT_VOICES: [&str; 4] = [
    "Samantha",
    "Google US English",
    "Microsoft Aria Online (Natural) - English (United States)",
    "Karen",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReaderConfig {
    pub rate: SpeechRate,
    pub min_rate: SpeechRate,
    pub max_rate: SpeechRate,
    pub rate_step_pct: u16,
    /// Single-word narration speed relative to `rate`, in percent.
    pub word_echo_rate_pct: u16,
    /// Pause after a panel finishes before switching panels in read-all mode.
    pub settle_before_advance_ms: u64,
    /// Pause after the switch before narration starts.
    pub settle_after_advance_ms: u64,
    pub voices: VoicePreference<'static>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            rate: SpeechRate::DEFAULT,
            min_rate: SpeechRate::MIN,
            max_rate: SpeechRate::MAX,
            rate_step_pct: RATE_STEP_PCT,
            word_echo_rate_pct: WORD_ECHO_RATE_PCT,
            settle_before_advance_ms: SETTLE_BEFORE_ADVANCE_MS,
            settle_after_advance_ms: SETTLE_AFTER_ADVANCE_MS,
            voices: VoicePreference::new(&DEFAULT_VOICES),
        }
    }
}

impl ReaderConfig {
    /// Swap inverted bounds and pull `rate` inside them.
    pub fn normalized(mut self) -> Self {
        if self.max_rate < self.min_rate {
            core::mem::swap(&mut self.max_rate, &mut self.min_rate);
        }
        self.rate = self.rate.clamp(self.min_rate, self.max_rate);
        self.rate_step_pct = self.rate_step_pct.max(1);
        self
    }

    pub fn clamp_rate(&self, rate: SpeechRate) -> SpeechRate {
        rate.clamp(self.min_rate, self.max_rate)
    }
}

/// Options supplied by the page that opened the reader.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StartupOptions {
    /// Start reading the whole story right after load.
    pub auto_read_all: bool,
    pub rate: Option<SpeechRate>,
    /// 1-based panel to open on; ignored when out of range.
    pub start_panel: Option<u16>,
}
