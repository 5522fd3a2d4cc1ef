//! Deterministic timed speech platform.
//!
//! Emits one word boundary every `word_ms / rate` milliseconds and an end
//! event after the last word. Used by the host front end when no real voice
//! is wired up, and by tests that need timing without audio.

use crate::error::SpeechFault;

use super::{BackendEvent, BackendEventKind, BoundaryUnit, NarrationHandle, SpeechBackend, Utterance};

pub const DEFAULT_WORD_MS: u32 = 380;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Playback {
    handle: NarrationHandle,
    words: u16,
    emitted: u16,
    started_ms: u64,
    interval_ms: u64,
    paused_at_ms: Option<u64>,
}

impl Playback {
    fn due_at(&self, unit: u16) -> u64 {
        self.started_ms + unit as u64 * self.interval_ms
    }
}

#[derive(Clone, Debug)]
pub struct SimulatedSpeech {
    available: bool,
    voices: &'static [&'static str],
    word_ms: u32,
    playback: Option<Playback>,
    interrupted: Option<NarrationHandle>,
    paused: bool,
    last_voice: Option<&'static str>,
    started: u32,
}

impl SimulatedSpeech {
    pub const fn new(voices: &'static [&'static str]) -> Self {
        Self {
            available: true,
            voices,
            word_ms: DEFAULT_WORD_MS,
            playback: None,
            interrupted: None,
            paused: false,
            last_voice: None,
            started: 0,
        }
    }

    /// A platform that has no speech capability at all.
    pub const fn unavailable() -> Self {
        let mut speech = Self::new(&[]);
        speech.available = false;
        speech
    }

    pub const fn with_word_ms(mut self, word_ms: u32) -> Self {
        self.word_ms = if word_ms == 0 { 1 } else { word_ms };
        self
    }

    pub fn is_speaking(&self) -> bool {
        self.playback.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Interval between word boundaries at `rate`.
    pub fn interval_ms(&self, utterance: &Utterance<'_>) -> u64 {
        (self.word_ms as u64 * 100 / utterance.rate.percent().max(1) as u64).max(1)
    }

    /// Voice chosen for the most recent utterance, `None` for engine default.
    pub fn last_voice(&self) -> Option<&'static str> {
        self.last_voice
    }

    pub fn utterances_started(&self) -> u32 {
        self.started
    }
}

impl SpeechBackend for SimulatedSpeech {
    type Error = core::convert::Infallible;

    fn is_available(&self) -> bool {
        self.available
    }

    fn has_voice(&self, name: &str) -> bool {
        self.voices.contains(&name)
    }

    fn start(
        &mut self,
        handle: NarrationHandle,
        utterance: &Utterance<'_>,
        now_ms: u64,
    ) -> Result<(), Self::Error> {
        if let Some(previous) = self.playback.take() {
            self.interrupted = Some(previous.handle);
        }

        self.last_voice = utterance
            .voice
            .and_then(|name| self.voices.iter().copied().find(|voice| *voice == name));
        self.started = self.started.saturating_add(1);
        self.playback = Some(Playback {
            handle,
            words: utterance.text.split_whitespace().count().min(u16::MAX as usize) as u16,
            emitted: 0,
            started_ms: now_ms,
            interval_ms: self.interval_ms(utterance),
            paused_at_ms: self.paused.then_some(now_ms),
        });
        Ok(())
    }

    fn cancel(&mut self, _now_ms: u64) {
        if let Some(playback) = self.playback.take() {
            self.interrupted = Some(playback.handle);
        }
    }

    fn pause(&mut self, now_ms: u64) {
        self.paused = true;
        if let Some(playback) = self.playback.as_mut()
            && playback.paused_at_ms.is_none()
        {
            playback.paused_at_ms = Some(now_ms);
        }
    }

    fn resume(&mut self, now_ms: u64) {
        self.paused = false;
        if let Some(playback) = self.playback.as_mut()
            && let Some(paused_at) = playback.paused_at_ms.take()
        {
            playback.started_ms += now_ms.saturating_sub(paused_at);
        }
    }

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<BackendEvent>, Self::Error> {
        if let Some(handle) = self.interrupted.take() {
            return Ok(Some(BackendEvent {
                handle,
                kind: BackendEventKind::Error(SpeechFault::Interrupted),
            }));
        }

        let Some(playback) = self.playback.as_mut() else {
            return Ok(None);
        };
        if playback.paused_at_ms.is_some() {
            return Ok(None);
        }

        if playback.emitted < playback.words {
            if now_ms < playback.due_at(playback.emitted) {
                return Ok(None);
            }
            playback.emitted += 1;
            return Ok(Some(BackendEvent {
                handle: playback.handle,
                kind: BackendEventKind::Boundary(BoundaryUnit::Word),
            }));
        }

        if now_ms < playback.due_at(playback.words) {
            return Ok(None);
        }

        let handle = playback.handle;
        self.playback = None;
        Ok(Some(BackendEvent {
            handle,
            kind: BackendEventKind::End,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::SpeechRate;

    fn utterance(text: &str, percent: u16) -> Utterance<'_> {
        Utterance {
            text,
            rate: SpeechRate::from_percent(percent),
            voice: None,
        }
    }

    fn drain(speech: &mut SimulatedSpeech, now_ms: u64) -> Vec<BackendEventKind> {
        let mut kinds = Vec::new();
        while let Ok(Some(event)) = speech.poll_event(now_ms) {
            kinds.push(event.kind);
        }
        kinds
    }

    #[test]
    fn emits_one_boundary_per_word_then_end() {
        let mut speech = SimulatedSpeech::new(&[]).with_word_ms(100);
        speech
            .start(NarrationHandle(1), &utterance("one two three", 100), 0)
            .unwrap();

        let word = BackendEventKind::Boundary(BoundaryUnit::Word);
        assert_eq!(drain(&mut speech, 0), vec![word]);
        assert_eq!(drain(&mut speech, 150), vec![word]);
        assert_eq!(drain(&mut speech, 199), Vec::new());
        assert_eq!(drain(&mut speech, 299), vec![word]);
        assert_eq!(drain(&mut speech, 300), vec![BackendEventKind::End]);
        assert!(!speech.is_speaking());
    }

    #[test]
    fn faster_rate_shortens_interval() {
        let speech = SimulatedSpeech::new(&[]).with_word_ms(300);
        assert_eq!(speech.interval_ms(&utterance("a", 100)), 300);
        assert_eq!(speech.interval_ms(&utterance("a", 150)), 200);
        assert_eq!(speech.interval_ms(&utterance("a", 50)), 600);
    }

    #[test]
    fn pause_holds_position_until_resume() {
        let mut speech = SimulatedSpeech::new(&[]).with_word_ms(100);
        speech
            .start(NarrationHandle(1), &utterance("one two", 100), 0)
            .unwrap();
        assert_eq!(drain(&mut speech, 0).len(), 1);

        speech.pause(50);
        assert!(drain(&mut speech, 1_000).is_empty());

        speech.resume(1_000);
        assert!(drain(&mut speech, 1_049).is_empty());
        assert_eq!(
            drain(&mut speech, 1_050),
            vec![BackendEventKind::Boundary(BoundaryUnit::Word)]
        );
    }

    #[test]
    fn cancel_reports_interruption_for_the_old_utterance() {
        let mut speech = SimulatedSpeech::new(&[]);
        speech
            .start(NarrationHandle(4), &utterance("hello there", 100), 0)
            .unwrap();
        speech.cancel(10);

        assert_eq!(
            speech.poll_event(10).unwrap(),
            Some(BackendEvent {
                handle: NarrationHandle(4),
                kind: BackendEventKind::Error(SpeechFault::Interrupted),
            })
        );
        assert_eq!(speech.poll_event(10_000).unwrap(), None);
    }
}
