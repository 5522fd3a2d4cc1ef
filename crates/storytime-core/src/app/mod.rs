//! Reader state machine: narration control, word highlighting and panel
//! navigation over one owned [`ReaderState`].

use core::fmt::Write;

use heapless::{String as HeaplessString, Vec as HeaplessVec};
use log::{debug, info, trace, warn};

use crate::{
    error::ReaderError,
    input::{InputProvider, Key, ReaderInput, SwipeDirection},
    present::{Presenter, ReaderSnapshot, WordState},
    settings::{ReaderConfig, StartupOptions},
    speech::{
        NarrationEvent, NarrationEventKind, NarrationHandle, SpeechAdapter, SpeechBackend,
        SpeechRate,
    },
    story::{MAX_PANEL_WORDS, PanelSource},
};

const ANNOUNCE_BYTES: usize = 48;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoChange,
    Changed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadingMode {
    Idle,
    ReadingSingle,
    ReadingAll,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NarrationPart {
    /// Panel text, highlight-tracked.
    Primary,
    /// Character line narrated after the panel text.
    Secondary,
}

/// One in-flight "speak this text" operation owned by the reader.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct NarrationSession {
    handle: NarrationHandle,
    panel: u16,
    part: NarrationPart,
    rate: SpeechRate,
    units_spoken: u16,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Idle,
    Speaking(NarrationSession),
    /// Read-all: panel finished, waiting before switching panels.
    SettlingBeforeAdvance { due_ms: u64 },
    /// Read-all: panel shown, waiting before narration starts.
    SettlingBeforeSpeech { due_ms: u64 },
}

impl Phase {
    fn shifted(self, delta_ms: u64) -> Self {
        match self {
            Self::SettlingBeforeAdvance { due_ms } => Self::SettlingBeforeAdvance {
                due_ms: due_ms.saturating_add(delta_ms),
            },
            Self::SettlingBeforeSpeech { due_ms } => Self::SettlingBeforeSpeech {
                due_ms: due_ms.saturating_add(delta_ms),
            },
            other => other,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ReaderState {
    current_panel: u16,
    mode: ReadingMode,
    phase: Phase,
    rate: SpeechRate,
    /// Untracked single-word narration started by tapping a word.
    word_echo: Option<NarrationHandle>,
}

pub struct StoryReader<ST, SB, IN, PR>
where
    ST: PanelSource,
    SB: SpeechBackend,
    IN: InputProvider,
    PR: Presenter,
{
    story: ST,
    speech: SpeechAdapter<SB>,
    input: IN,
    presenter: PR,
    config: ReaderConfig,
    state: ReaderState,
    highlights: WordHighlights,
    indicator_visible: bool,
    completion_visible: bool,
    hidden_since_ms: Option<u64>,
    changed: bool,
}

include!("view.rs");
include!("input.rs");
include!("narration.rs");
include!("navigation.rs");
include!("highlight.rs");
