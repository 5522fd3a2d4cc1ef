/// Per-word highlight markers of the panel on screen.
#[derive(Clone, Debug, Eq, PartialEq)]
struct WordHighlights {
    panel: u16,
    states: HeaplessVec<WordState, MAX_PANEL_WORDS>,
}

impl WordHighlights {
    const fn new() -> Self {
        Self {
            panel: 0,
            states: HeaplessVec::new(),
        }
    }

    fn reset(&mut self, panel: u16, word_count: u16) {
        self.panel = panel;
        self.states.clear();
        for _ in 0..(word_count as usize).min(MAX_PANEL_WORDS) {
            let _ = self.states.push(WordState::None);
        }
    }

    fn len(&self) -> u16 {
        self.states.len() as u16
    }

    fn get(&self, word: u16) -> WordState {
        self.states
            .get(word as usize)
            .copied()
            .unwrap_or(WordState::None)
    }

    /// Set `word` to `state`; returns `true` when the marker changed.
    fn set(&mut self, word: u16, state: WordState) -> bool {
        match self.states.get_mut(word as usize) {
            Some(slot) if *slot != state => {
                *slot = state;
                true
            }
            _ => false,
        }
    }
}

impl<ST, SB, IN, PR> StoryReader<ST, SB, IN, PR>
where
    ST: PanelSource,
    SB: SpeechBackend,
    IN: InputProvider,
    PR: Presenter,
{
    fn mark_word(&mut self, word: u16, state: WordState) {
        if self.highlights.set(word, state) {
            self.presenter
                .set_word_state(self.highlights.panel, word, state);
            self.changed = true;
        }
    }

    /// Narration reached unit `ordinal` of the panel text.
    fn highlight_unit(&mut self, panel: u16, ordinal: u16) {
        if panel != self.highlights.panel {
            trace!(
                "narration: boundary for panel={} while panel={} shown",
                panel, self.highlights.panel
            );
            return;
        }
        if ordinal >= self.highlights.len() {
            trace!(
                "narration: boundary ordinal={} past last word ({}) ignored",
                ordinal,
                self.highlights.len()
            );
            return;
        }

        for word in 0..ordinal {
            if self.highlights.get(word) != WordState::Spoken {
                self.mark_word(word, WordState::Spoken);
            }
        }
        self.mark_word(ordinal, WordState::Current);
    }

    /// Primary narration ended: nothing stays "current".
    fn settle_highlights(&mut self) {
        for word in 0..self.highlights.len() {
            if self.highlights.get(word) == WordState::Current {
                self.mark_word(word, WordState::Spoken);
            }
        }
    }

    fn clear_highlights(&mut self) {
        for word in 0..self.highlights.len() {
            self.mark_word(word, WordState::None);
        }
    }

    /// Markers of the panel on screen, in word order.
    pub fn word_states(&self) -> &[WordState] {
        &self.highlights.states
    }
}
