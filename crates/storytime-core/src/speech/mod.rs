//! Speech engine adapter.
//!
//! A [`SpeechBackend`] is the raw platform narration capability. The
//! [`SpeechAdapter`] wraps it and enforces the narration contract the reader
//! relies on:
//! - one audible utterance at a time (`speak` supersedes the active one),
//! - boundary events are numbered per utterance, left to right,
//! - exactly one terminal event per handle,
//! - nothing but the `Canceled` terminal is delivered after a cancel.

pub mod simulated;

use heapless::Deque;
use log::{debug, trace, warn};

use crate::error::SpeechFault;

const PENDING_TERMINALS: usize = 8;

/// Speaking speed as a percentage of the engine's normal rate.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct SpeechRate(u16);

impl SpeechRate {
    pub const MIN: Self = Self(50);
    pub const MAX: Self = Self(150);
    pub const DEFAULT: Self = Self(90);
    /// Floor for derived rates such as single-word echo.
    const FLOOR_PCT: u16 = 10;

    /// Rate clamped into the user-adjustable range.
    pub const fn from_percent(percent: u16) -> Self {
        if percent < Self::MIN.0 {
            Self::MIN
        } else if percent > Self::MAX.0 {
            Self::MAX
        } else {
            Self(percent)
        }
    }

    pub fn from_multiplier(multiplier: f32) -> Self {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Self::MIN;
        }
        Self::from_percent((multiplier * 100.0 + 0.5).min(u16::MAX as f32) as u16)
    }

    pub const fn percent(self) -> u16 {
        self.0
    }

    pub fn multiplier(self) -> f32 {
        self.0 as f32 / 100.0
    }

    /// This rate multiplied by `factor_pct`/100. Not clamped to the user range.
    pub const fn scaled(self, factor_pct: u16) -> Self {
        let scaled = (self.0 as u32 * factor_pct as u32 / 100) as u16;
        if scaled < Self::FLOOR_PCT {
            Self(Self::FLOOR_PCT)
        } else {
            Self(scaled)
        }
    }
}

impl Default for SpeechRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Ordered list of voice names to try; empty means engine default.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VoicePreference<'a> {
    preferred: &'a [&'a str],
}

impl<'a> VoicePreference<'a> {
    pub const fn none() -> Self {
        Self { preferred: &[] }
    }

    pub const fn new(preferred: &'a [&'a str]) -> Self {
        Self { preferred }
    }

    /// First preferred voice the backend has installed.
    pub fn resolve<B: SpeechBackend>(&self, backend: &B) -> Option<&'a str> {
        self.preferred
            .iter()
            .copied()
            .find(|name| backend.has_voice(name))
    }
}

/// Identity of one narration request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NarrationHandle(u32);

impl NarrationHandle {
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// What the backend is asked to say.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Utterance<'a> {
    pub text: &'a str,
    pub rate: SpeechRate,
    pub voice: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundaryUnit {
    Word,
    Sentence,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackendEventKind {
    Boundary(BoundaryUnit),
    End,
    Error(SpeechFault),
}

/// Raw event reported by a platform for one utterance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BackendEvent {
    pub handle: NarrationHandle,
    pub kind: BackendEventKind,
}

/// Platform narration capability. The platform is one global voice: starting
/// an utterance or cancelling affects whatever is currently audible.
pub trait SpeechBackend {
    type Error: core::fmt::Debug;

    fn is_available(&self) -> bool {
        true
    }

    fn has_voice(&self, _name: &str) -> bool {
        false
    }

    fn start(
        &mut self,
        handle: NarrationHandle,
        utterance: &Utterance<'_>,
        now_ms: u64,
    ) -> Result<(), Self::Error>;

    fn cancel(&mut self, now_ms: u64);

    fn pause(&mut self, now_ms: u64);

    fn resume(&mut self, now_ms: u64);

    fn poll_event(&mut self, now_ms: u64) -> Result<Option<BackendEvent>, Self::Error>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NarrationStatus {
    Active,
    Completed,
    Errored,
    Canceled,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NarrationEventKind {
    /// Narration reached the start of unit `ordinal` (0-based).
    UnitBoundary { ordinal: u16 },
    Completed,
    Canceled,
    Errored(SpeechFault),
}

impl NarrationEventKind {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::UnitBoundary { .. })
    }

    const fn status(self) -> NarrationStatus {
        match self {
            Self::UnitBoundary { .. } => NarrationStatus::Active,
            Self::Completed => NarrationStatus::Completed,
            Self::Canceled => NarrationStatus::Canceled,
            Self::Errored(_) => NarrationStatus::Errored,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NarrationEvent {
    pub handle: NarrationHandle,
    pub kind: NarrationEventKind,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ActiveUtterance {
    handle: NarrationHandle,
    units_spoken: u16,
}

/// Contract-enforcing wrapper over a [`SpeechBackend`].
pub struct SpeechAdapter<B: SpeechBackend> {
    backend: B,
    next_id: u32,
    active: Option<ActiveUtterance>,
    last_finished: Option<(NarrationHandle, NarrationStatus)>,
    terminals: Deque<NarrationEvent, PENDING_TERMINALS>,
    paused: bool,
}

impl<B: SpeechBackend> SpeechAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            next_id: 1,
            active: None,
            last_finished: None,
            terminals: Deque::new(),
            paused: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn active_handle(&self) -> Option<NarrationHandle> {
        self.active.map(|active| active.handle)
    }

    /// Start narrating `text`. Never fails: a platform that cannot speak
    /// yields a handle whose terminal event is `Errored`.
    pub fn speak(
        &mut self,
        text: &str,
        rate: SpeechRate,
        voice: &VoicePreference<'_>,
        now_ms: u64,
    ) -> NarrationHandle {
        if let Some(active) = self.active {
            debug!(
                "speech: supersede handle={} by new utterance",
                active.handle.id()
            );
            self.cancel(active.handle, now_ms);
        }

        let handle = NarrationHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);

        if !self.backend.is_available() {
            warn!("speech: platform unavailable handle={}", handle.id());
            self.finish(handle, NarrationEventKind::Errored(SpeechFault::SynthesisUnavailable));
            return handle;
        }

        let utterance = Utterance {
            text,
            rate,
            voice: voice.resolve(&self.backend),
        };
        match self.backend.start(handle, &utterance, now_ms) {
            Ok(()) => {
                debug!(
                    "speech: start handle={} rate_pct={} voice={:?} words={}",
                    handle.id(),
                    rate.percent(),
                    utterance.voice,
                    text.split_whitespace().count()
                );
                self.active = Some(ActiveUtterance {
                    handle,
                    units_spoken: 0,
                });
                if self.paused {
                    self.backend.pause(now_ms);
                }
            }
            Err(err) => {
                warn!("speech: start failed handle={} err={:?}", handle.id(), err);
                self.finish(handle, NarrationEventKind::Errored(SpeechFault::SynthesisUnavailable));
            }
        }

        handle
    }

    /// Stop `handle` if it is still audible. Its terminal event becomes
    /// `Canceled` and no further boundary events are delivered for it.
    pub fn cancel(&mut self, handle: NarrationHandle, now_ms: u64) {
        let Some(active) = self.active.filter(|active| active.handle == handle) else {
            trace!("speech: cancel ignored handle={} not active", handle.id());
            return;
        };

        self.backend.cancel(now_ms);
        self.active = None;
        debug!(
            "speech: canceled handle={} units_spoken={}",
            handle.id(),
            active.units_spoken
        );
        self.finish(handle, NarrationEventKind::Canceled);
    }

    pub fn pause(&mut self, now_ms: u64) {
        if !self.paused {
            self.paused = true;
            self.backend.pause(now_ms);
        }
    }

    pub fn resume(&mut self, now_ms: u64) {
        if self.paused {
            self.paused = false;
            self.backend.resume(now_ms);
        }
    }

    /// Status of the active or most recently finished narration.
    pub fn status(&self, handle: NarrationHandle) -> Option<NarrationStatus> {
        if self.active.is_some_and(|active| active.handle == handle) {
            return Some(NarrationStatus::Active);
        }

        self.last_finished
            .filter(|(finished, _)| *finished == handle)
            .map(|(_, status)| status)
    }

    /// Next event for any handle, oldest first.
    pub fn poll(&mut self, now_ms: u64) -> Option<NarrationEvent> {
        if let Some(event) = self.terminals.pop_front() {
            return Some(event);
        }

        loop {
            match self.backend.poll_event(now_ms) {
                Ok(Some(raw)) => {
                    if let Some(event) = self.accept(raw) {
                        return Some(event);
                    }
                }
                Ok(None) => return None,
                Err(err) => {
                    warn!("speech: backend poll failed err={:?}", err);
                    let active = self.active.take()?;
                    let kind = NarrationEventKind::Errored(SpeechFault::SynthesisFailed);
                    self.last_finished = Some((active.handle, kind.status()));
                    return Some(NarrationEvent {
                        handle: active.handle,
                        kind,
                    });
                }
            }
        }
    }

    fn accept(&mut self, raw: BackendEvent) -> Option<NarrationEvent> {
        let Some(active) = self
            .active
            .as_mut()
            .filter(|active| active.handle == raw.handle)
        else {
            trace!(
                "speech: drop stale event handle={} kind={:?}",
                raw.handle.id(),
                raw.kind
            );
            return None;
        };

        let kind = match raw.kind {
            BackendEventKind::Boundary(BoundaryUnit::Word) => {
                let ordinal = active.units_spoken;
                active.units_spoken = active.units_spoken.saturating_add(1);
                return Some(NarrationEvent {
                    handle: raw.handle,
                    kind: NarrationEventKind::UnitBoundary { ordinal },
                });
            }
            BackendEventKind::Boundary(BoundaryUnit::Sentence) => return None,
            BackendEventKind::End => NarrationEventKind::Completed,
            BackendEventKind::Error(fault) if fault.is_cancellation() => {
                NarrationEventKind::Canceled
            }
            BackendEventKind::Error(fault) => {
                warn!("speech: handle={} failed fault={}", raw.handle.id(), fault);
                NarrationEventKind::Errored(fault)
            }
        };

        self.active = None;
        self.last_finished = Some((raw.handle, kind.status()));
        Some(NarrationEvent {
            handle: raw.handle,
            kind,
        })
    }

    fn finish(&mut self, handle: NarrationHandle, kind: NarrationEventKind) {
        self.last_finished = Some((handle, kind.status()));
        let event = NarrationEvent { handle, kind };
        if self.terminals.is_full()
            && let Some(dropped) = self.terminals.pop_front()
        {
            warn!(
                "speech: terminal queue full, dropped handle={} kind={:?}",
                dropped.handle.id(),
                dropped.kind
            );
        }
        let _ = self.terminals.push_back(event);
    }
}

#[cfg(test)]
mod tests;
