//! Presentation gateway: commands the reader issues to the surface, plus the
//! read-only snapshot the surface may query.

use crate::{app::ReadingMode, speech::SpeechRate};

/// Highlight state of one word.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WordState {
    #[default]
    None,
    Current,
    Spoken,
}

/// Outward commands. Implementations only draw; they never call back into
/// the reader.
pub trait Presenter {
    /// Show panel `index` of `total`.
    fn render_panel(&mut self, index: u16, total: u16);

    fn set_word_state(&mut self, panel: u16, word: u16, state: WordState);

    fn set_reading_indicator(&mut self, visible: bool);

    fn set_completion_visible(&mut self, visible: bool);

    fn set_back_enabled(&mut self, enabled: bool);

    /// Assistive-technology live-region announcement.
    fn announce(&mut self, message: &str);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReaderSnapshot {
    pub panel: u16,
    pub total_panels: u16,
    pub mode: ReadingMode,
    pub rate: SpeechRate,
    pub paused: bool,
    pub completion_visible: bool,
}
