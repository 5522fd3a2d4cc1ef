//! Error taxonomy shared by the story store, the speech adapter and the reader.

use thiserror::Error;

/// Errors raised while operating the reader.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ReaderError {
    /// Navigation asked for a panel outside `1..=total`. Never reachable from
    /// user input; the requested operation is dropped.
    #[error("panel {index} not found (story has {total} panels)")]
    PanelNotFound { index: u16, total: u16 },
    /// The speech platform does not exist or refused to start.
    #[error("narration unavailable")]
    NarrationUnavailable,
    /// The speech platform failed in the middle of an utterance.
    #[error("narration failed: {0}")]
    NarrationFailed(SpeechFault),
}

impl From<SpeechFault> for ReaderError {
    fn from(fault: SpeechFault) -> Self {
        if fault.is_unavailable() {
            Self::NarrationUnavailable
        } else {
            Self::NarrationFailed(fault)
        }
    }
}

/// Problems found while loading static story content.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum StoryError {
    #[error("story has no panels")]
    Empty,
    #[error("story has {count} panels, at most {max} supported")]
    TooManyPanels { count: usize, max: usize },
    #[error("panel {index} has no words")]
    EmptyPanel { index: u16 },
    #[error("panel {index} has more than {max} words")]
    TooManyWords { index: u16, max: usize },
}

/// Failure reasons reported by a speech platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SpeechFault {
    #[error("canceled")]
    Canceled,
    #[error("interrupted")]
    Interrupted,
    #[error("audio output busy")]
    AudioBusy,
    #[error("audio hardware error")]
    AudioHardware,
    #[error("network error")]
    Network,
    #[error("synthesis unavailable")]
    SynthesisUnavailable,
    #[error("synthesis failed")]
    SynthesisFailed,
    #[error("language unavailable")]
    LanguageUnavailable,
    #[error("voice unavailable")]
    VoiceUnavailable,
    #[error("text too long")]
    TextTooLong,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("not allowed")]
    NotAllowed,
}

impl SpeechFault {
    /// Faults that are the platform's way of reporting our own cancel.
    pub const fn is_cancellation(self) -> bool {
        matches!(self, Self::Canceled | Self::Interrupted)
    }

    pub const fn is_unavailable(self) -> bool {
        matches!(self, Self::SynthesisUnavailable | Self::NotAllowed)
    }
}
