use std::{fmt, io::Write};

use log::{trace, warn};
use storytime_core::{
    present::{Presenter, WordState},
    story::{PanelSource, StaticStory},
};

/// Terminal stand-in for the picture-book page.
pub(super) struct ConsolePresenter<W: Write> {
    story: StaticStory<'static>,
    out: W,
    panel: u16,
    words: Vec<WordState>,
}

impl<W: Write> ConsolePresenter<W> {
    pub(super) fn new(story: StaticStory<'static>, out: W) -> Self {
        Self {
            story,
            out,
            panel: 0,
            words: Vec::new(),
        }
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = self.out.write_fmt(args).and_then(|()| self.out.flush()) {
            warn!("ui: console write failed: {}", err);
        }
    }

    /// Panel text with `[current]` and `spoken~` markers.
    fn marked_line(&self) -> String {
        let Ok(panel) = self.story.panel(self.panel) else {
            return String::new();
        };

        let mut line = String::new();
        for (word, state) in panel.words().zip(self.words.iter()) {
            if !line.is_empty() {
                line.push(' ');
            }
            match state {
                WordState::None => line.push_str(word),
                WordState::Current => {
                    line.push('[');
                    line.push_str(word);
                    line.push(']');
                }
                WordState::Spoken => {
                    line.push_str(word);
                    line.push('~');
                }
            }
        }
        line
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render_panel(&mut self, index: u16, total: u16) {
        self.panel = index;
        let secondary = match self.story.panel(index) {
            Ok(panel) => {
                self.words = vec![WordState::None; panel.word_count() as usize];
                panel.secondary_text().map(str::to_owned)
            }
            Err(err) => {
                warn!("ui: {}", err);
                self.words.clear();
                None
            }
        };

        self.emit(format_args!("\n=== Panel {index} of {total} ===\n"));
        let line = self.marked_line();
        self.emit(format_args!("  {line}\n"));
        if let Some(secondary) = secondary {
            self.emit(format_args!("  \"{secondary}\"\n"));
        }
    }

    fn set_word_state(&mut self, panel: u16, word: u16, state: WordState) {
        if panel != self.panel {
            trace!("ui: marker for panel={} while panel={} shown", panel, self.panel);
            return;
        }
        let Some(slot) = self.words.get_mut(word as usize) else {
            return;
        };
        *slot = state;

        // Redraw only on forward progress; clearing happens before a re-render.
        if state != WordState::None {
            let line = self.marked_line();
            self.emit(format_args!("  {line}\n"));
        }
    }

    fn set_reading_indicator(&mut self, visible: bool) {
        let label = if visible { "reading..." } else { "idle" };
        self.emit(format_args!("  ({label})\n"));
    }

    fn set_completion_visible(&mut self, visible: bool) {
        if visible {
            self.emit(format_args!("\n  *** The End ***\n"));
        }
    }

    fn set_back_enabled(&mut self, enabled: bool) {
        trace!("ui: back enabled={}", enabled);
    }

    fn announce(&mut self, message: &str) {
        self.emit(format_args!("  > {message}\n"));
    }
}

#[cfg(test)]
mod tests {
    use storytime_core::story::bundled_story;

    use super::*;

    fn presenter() -> ConsolePresenter<Vec<u8>> {
        ConsolePresenter::new(bundled_story().unwrap(), Vec::new())
    }

    fn text(presenter: &ConsolePresenter<Vec<u8>>) -> String {
        String::from_utf8_lossy(presenter.output()).into_owned()
    }

    #[test]
    fn render_prints_header_text_and_character_line() {
        let mut presenter = presenter();
        presenter.render_panel(1, 6);

        let out = text(&presenter);
        assert!(out.contains("=== Panel 1 of 6 ==="));
        assert!(out.contains("Pip is a little robot who lives on a hill."));
        assert!(out.contains("\"Beep beep! Good morning!\""));
    }

    #[test]
    fn word_markers_show_progress() {
        let mut presenter = presenter();
        presenter.render_panel(2, 6);
        presenter.set_word_state(2, 0, WordState::Spoken);
        presenter.set_word_state(2, 1, WordState::Current);

        assert!(text(&presenter).contains("One~ [windy] day Pip"));
    }

    #[test]
    fn markers_for_other_panels_are_ignored() {
        let mut presenter = presenter();
        presenter.render_panel(2, 6);
        let before = text(&presenter);

        presenter.set_word_state(1, 0, WordState::Current);
        presenter.set_word_state(2, 40, WordState::Current);

        assert_eq!(text(&presenter), before);
    }

    #[test]
    fn completion_and_announcements() {
        let mut presenter = presenter();
        presenter.set_completion_visible(true);
        presenter.announce("The end! Great reading!");

        let out = text(&presenter);
        assert!(out.contains("*** The End ***"));
        assert!(out.contains("> The end! Great reading!"));
    }
}
