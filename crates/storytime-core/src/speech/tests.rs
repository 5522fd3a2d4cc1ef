use std::collections::VecDeque;

use super::*;

#[derive(Default)]
struct ManualSpeech {
    available: bool,
    refuse_start: bool,
    voices: Vec<&'static str>,
    started: Vec<(NarrationHandle, SpeechRate, Option<String>)>,
    canceled: u32,
    paused: bool,
    queued: VecDeque<BackendEvent>,
}

impl ManualSpeech {
    fn new() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    fn push(&mut self, handle: NarrationHandle, kind: BackendEventKind) {
        self.queued.push_back(BackendEvent { handle, kind });
    }

    fn word(&mut self, handle: NarrationHandle) {
        self.push(handle, BackendEventKind::Boundary(BoundaryUnit::Word));
    }
}

impl SpeechBackend for ManualSpeech {
    type Error = ();

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
        _now_ms: u64,
    ) -> Result<(), Self::Error> {
        if self.refuse_start {
            return Err(());
        }
        self.started
            .push((handle, utterance.rate, utterance.voice.map(str::to_owned)));
        Ok(())
    }

    fn cancel(&mut self, _now_ms: u64) {
        self.canceled += 1;
    }

    fn pause(&mut self, _now_ms: u64) {
        self.paused = true;
    }

    fn resume(&mut self, _now_ms: u64) {
        self.paused = false;
    }

    fn poll_event(&mut self, _now_ms: u64) -> Result<Option<BackendEvent>, Self::Error> {
        Ok(self.queued.pop_front())
    }
}

fn drain(adapter: &mut SpeechAdapter<ManualSpeech>) -> Vec<NarrationEvent> {
    let mut events = Vec::new();
    while let Some(event) = adapter.poll(0) {
        events.push(event);
    }
    events
}

fn speak(adapter: &mut SpeechAdapter<ManualSpeech>, text: &str) -> NarrationHandle {
    adapter.speak(text, SpeechRate::DEFAULT, &VoicePreference::none(), 0)
}

#[test]
fn boundaries_are_numbered_per_utterance_and_sentences_skipped() {
    let mut adapter = SpeechAdapter::new(ManualSpeech::new());
    let handle = speak(&mut adapter, "one two");

    let backend = adapter.backend_mut();
    backend.word(handle);
    backend.push(handle, BackendEventKind::Boundary(BoundaryUnit::Sentence));
    backend.word(handle);
    backend.push(handle, BackendEventKind::End);

    let kinds: Vec<_> = drain(&mut adapter).into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NarrationEventKind::UnitBoundary { ordinal: 0 },
            NarrationEventKind::UnitBoundary { ordinal: 1 },
            NarrationEventKind::Completed,
        ]
    );
    assert_eq!(adapter.status(handle), Some(NarrationStatus::Completed));
    assert_eq!(adapter.active_handle(), None);
}

#[test]
fn cancel_discards_late_boundaries_and_reports_canceled() {
    let mut adapter = SpeechAdapter::new(ManualSpeech::new());
    let handle = speak(&mut adapter, "one two three");
    adapter.backend_mut().word(handle);
    assert_eq!(drain(&mut adapter).len(), 1);

    adapter.cancel(handle, 5);
    adapter.backend_mut().word(handle);
    adapter.backend_mut().word(handle);
    adapter.backend_mut().push(handle, BackendEventKind::End);

    let events = drain(&mut adapter);
    assert_eq!(
        events,
        vec![NarrationEvent {
            handle,
            kind: NarrationEventKind::Canceled
        }]
    );
    assert_eq!(adapter.status(handle), Some(NarrationStatus::Canceled));
    assert_eq!(adapter.backend().canceled, 1);

    adapter.cancel(handle, 6);
    assert_eq!(adapter.backend().canceled, 1);
}

#[test]
fn speak_supersedes_the_active_utterance() {
    let mut adapter = SpeechAdapter::new(ManualSpeech::new());
    let first = speak(&mut adapter, "first");
    let second = speak(&mut adapter, "second");
    assert_ne!(first, second);

    adapter.backend_mut().word(first);
    adapter.backend_mut().word(second);

    assert_eq!(
        drain(&mut adapter),
        vec![
            NarrationEvent {
                handle: first,
                kind: NarrationEventKind::Canceled
            },
            NarrationEvent {
                handle: second,
                kind: NarrationEventKind::UnitBoundary { ordinal: 0 }
            },
        ]
    );
    assert_eq!(adapter.status(second), Some(NarrationStatus::Active));
}

#[test]
fn burst_of_speaks_keeps_the_newest_terminals_in_order() {
    let mut adapter = SpeechAdapter::new(ManualSpeech::new());
    let handles: Vec<_> = (0..PENDING_TERMINALS + 2)
        .map(|_| speak(&mut adapter, "again"))
        .collect();

    let events = drain(&mut adapter);
    let superseded = &handles[..handles.len() - 1];
    let kept = &superseded[superseded.len() - PENDING_TERMINALS..];
    assert_eq!(
        events,
        kept.iter()
            .map(|&handle| NarrationEvent {
                handle,
                kind: NarrationEventKind::Canceled
            })
            .collect::<Vec<_>>()
    );
    assert_eq!(adapter.active_handle(), handles.last().copied());
    assert!(drain(&mut adapter).is_empty());
}

#[test]
fn platform_interruption_is_a_cancel_not_an_error() {
    let mut adapter = SpeechAdapter::new(ManualSpeech::new());
    let handle = speak(&mut adapter, "hello");
    adapter
        .backend_mut()
        .push(handle, BackendEventKind::Error(SpeechFault::Interrupted));

    assert_eq!(drain(&mut adapter)[0].kind, NarrationEventKind::Canceled);
}

#[test]
fn unavailable_platform_yields_errored_terminal() {
    let mut backend = ManualSpeech::new();
    backend.available = false;
    let mut adapter = SpeechAdapter::new(backend);
    let handle = speak(&mut adapter, "hello");

    assert_eq!(
        drain(&mut adapter),
        vec![NarrationEvent {
            handle,
            kind: NarrationEventKind::Errored(SpeechFault::SynthesisUnavailable)
        }]
    );
    assert!(adapter.backend().started.is_empty());

    let mut refusing = ManualSpeech::new();
    refusing.refuse_start = true;
    let mut adapter = SpeechAdapter::new(refusing);
    let handle = speak(&mut adapter, "hello");
    assert_eq!(adapter.status(handle), Some(NarrationStatus::Errored));
}

#[test]
fn mid_utterance_failure_is_reported_once() {
    let mut adapter = SpeechAdapter::new(ManualSpeech::new());
    let handle = speak(&mut adapter, "hello there");
    adapter.backend_mut().word(handle);
    adapter
        .backend_mut()
        .push(handle, BackendEventKind::Error(SpeechFault::AudioHardware));
    adapter.backend_mut().push(handle, BackendEventKind::End);

    let kinds: Vec<_> = drain(&mut adapter).into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NarrationEventKind::UnitBoundary { ordinal: 0 },
            NarrationEventKind::Errored(SpeechFault::AudioHardware),
        ]
    );
}

#[test]
fn voice_preference_falls_back_to_engine_default() {
    let mut backend = ManualSpeech::new();
    backend.voices = vec!["Daniel", "Samantha"];
    let mut adapter = SpeechAdapter::new(backend);

    let preferred = ["Karen", "Samantha"];
    adapter.speak("hi", SpeechRate::DEFAULT, &VoicePreference::new(&preferred), 0);
    adapter.speak("hi", SpeechRate::DEFAULT, &VoicePreference::new(&["Karen"]), 0);

    let voices: Vec<_> = adapter
        .backend()
        .started
        .iter()
        .map(|(_, _, voice)| voice.clone())
        .collect();
    assert_eq!(voices, vec![Some("Samantha".to_owned()), None]);
}

#[test]
fn pause_and_resume_are_forwarded_once() {
    let mut adapter = SpeechAdapter::new(ManualSpeech::new());
    adapter.pause(0);
    adapter.pause(1);
    assert!(adapter.is_paused());
    assert!(adapter.backend().paused);

    adapter.resume(2);
    assert!(!adapter.is_paused());
    assert!(!adapter.backend().paused);
}

#[test]
fn rate_is_clamped_to_user_range_and_scaled_for_echo() {
    assert_eq!(SpeechRate::from_percent(10), SpeechRate::MIN);
    assert_eq!(SpeechRate::from_percent(400), SpeechRate::MAX);
    assert_eq!(SpeechRate::from_multiplier(1.2).percent(), 120);
    assert_eq!(SpeechRate::from_multiplier(f32::NAN), SpeechRate::MIN);
    assert_eq!(SpeechRate::from_percent(100).scaled(80).percent(), 80);
    assert_eq!(SpeechRate::MIN.scaled(80).percent(), 40);
}
