impl<ST, SB, IN, PR> StoryReader<ST, SB, IN, PR>
where
    ST: PanelSource,
    SB: SpeechBackend,
    IN: InputProvider,
    PR: Presenter,
{
    /// Jump to panel `target`. Ignored when `target` is the current panel or
    /// outside the story. Returns `true` when the panel changed.
    pub fn go_to(&mut self, target: u16, now_ms: u64) -> bool {
        let total = self.story.total_panels();
        if target == self.state.current_panel {
            trace!("nav: go_to target={} already shown", target);
            return false;
        }
        if !self.story.contains(target) {
            debug!("nav: go_to target={} outside 1..={} ignored", target, total);
            return false;
        }

        let reading_all = self.state.mode == ReadingMode::ReadingAll;
        debug!(
            "nav: go_to {} -> {}/{} mode={:?}",
            self.state.current_panel, target, total, self.state.mode
        );
        self.show_panel(target, now_ms);

        if reading_all {
            // Skipping around during read-all keeps reading from the new panel.
            self.state.phase = Phase::SettlingBeforeSpeech {
                due_ms: now_ms.saturating_add(self.config.settle_after_advance_ms),
            };
        } else {
            self.state.mode = ReadingMode::Idle;
            self.state.phase = Phase::Idle;
            self.set_indicator(false);
        }
        true
    }

    /// Advance one panel, or raise story-complete at the last panel.
    pub fn next(&mut self, now_ms: u64) {
        let current = self.state.current_panel;
        if current < self.story.total_panels() {
            self.go_to(current + 1, now_ms);
            return;
        }

        if self.state.mode == ReadingMode::ReadingAll {
            debug!("nav: next at last panel ignored while reading all");
            return;
        }

        self.halt(now_ms);
        self.raise_story_complete();
    }

    pub fn previous(&mut self, now_ms: u64) {
        let current = self.state.current_panel;
        if current > 1 {
            self.go_to(current - 1, now_ms);
        } else {
            trace!("nav: previous at first panel ignored");
        }
    }

    /// Leave any reading mode, hide the celebration and go back to panel 1.
    pub fn restart(&mut self, now_ms: u64) {
        info!("nav: restart from panel={} mode={:?}", self.state.current_panel, self.state.mode);
        self.halt(now_ms);
        self.set_completion(false);
        self.go_to(1, now_ms);
    }

    pub fn go_to_first(&mut self, now_ms: u64) {
        self.go_to(1, now_ms);
    }

    pub fn go_to_last(&mut self, now_ms: u64) {
        let last = self.story.total_panels();
        self.go_to(last, now_ms);
    }

    pub fn can_go_back(&self) -> bool {
        self.state.current_panel > 1
    }

    /// Switch the visible panel. Cancels narration and clears every marker;
    /// the caller decides the phase that follows.
    fn show_panel(&mut self, target: u16, now_ms: u64) {
        self.cancel_audio(now_ms);
        self.clear_highlights();
        self.set_completion(false);
        self.state.current_panel = target;
        self.notify_panel_changed();
    }

    fn notify_panel_changed(&mut self) {
        let index = self.state.current_panel;
        let total = self.story.total_panels();
        let word_count = match self.story.panel(index) {
            Ok(panel) => panel.word_count(),
            Err(err) => {
                warn!("nav: {}", err);
                0
            }
        };

        self.highlights.reset(index, word_count);
        self.presenter.render_panel(index, total);
        self.presenter.set_back_enabled(index > 1);
        self.announce_fmt(format_args!("Panel {} of {}", index, total));
        self.changed = true;
    }

    fn raise_story_complete(&mut self) {
        info!("nav: story complete panels={}", self.story.total_panels());
        // Pressing next again at the end replays the celebration.
        self.completion_visible = false;
        self.set_completion(true);
        self.presenter.announce("The end! Great reading!");
    }
}
