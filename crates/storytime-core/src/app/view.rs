impl<ST, SB, IN, PR> StoryReader<ST, SB, IN, PR>
where
    ST: PanelSource,
    SB: SpeechBackend,
    IN: InputProvider,
    PR: Presenter,
{
    pub fn new(story: ST, speech: SB, input: IN, presenter: PR, config: ReaderConfig) -> Self {
        let config = config.normalized();

        Self {
            story,
            speech: SpeechAdapter::new(speech),
            input,
            presenter,
            config,
            state: ReaderState {
                current_panel: 1,
                mode: ReadingMode::Idle,
                phase: Phase::Idle,
                rate: config.rate,
                word_echo: None,
            },
            highlights: WordHighlights::new(),
            indicator_visible: false,
            completion_visible: false,
            hidden_since_ms: None,
            changed: false,
        }
    }

    /// Show the opening panel and apply page start-up options.
    pub fn start(&mut self, options: StartupOptions, now_ms: u64) {
        if let Some(rate) = options.rate {
            self.state.rate = self.config.clamp_rate(rate);
        }

        let total = self.story.total_panels();
        let opening = options
            .start_panel
            .filter(|panel| self.story.contains(*panel))
            .unwrap_or(1);
        info!(
            "reader: start panels={} opening={} rate_pct={} auto_read_all={}",
            total,
            opening,
            self.state.rate.percent(),
            options.auto_read_all
        );

        self.state.current_panel = opening;
        self.notify_panel_changed();
        self.presenter.set_reading_indicator(false);
        self.presenter.set_completion_visible(false);

        if options.auto_read_all {
            self.read_all(now_ms);
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        self.process_inputs(now_ms);
        self.process_narration(now_ms);
        self.process_deadlines(now_ms);

        if core::mem::take(&mut self.changed) {
            TickResult::Changed
        } else {
            TickResult::NoChange
        }
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        ReaderSnapshot {
            panel: self.state.current_panel,
            total_panels: self.story.total_panels(),
            mode: self.state.mode,
            rate: self.state.rate,
            paused: self.hidden_since_ms.is_some(),
            completion_visible: self.completion_visible,
        }
    }

    pub fn current_panel(&self) -> u16 {
        self.state.current_panel
    }

    pub fn mode(&self) -> ReadingMode {
        self.state.mode
    }

    pub fn rate(&self) -> SpeechRate {
        self.state.rate
    }

    pub fn speech(&self) -> &SpeechAdapter<SB> {
        &self.speech
    }

    pub fn presenter(&self) -> &PR {
        &self.presenter
    }

    fn set_indicator(&mut self, visible: bool) {
        if self.indicator_visible == visible {
            return;
        }
        self.indicator_visible = visible;
        self.presenter.set_reading_indicator(visible);
        self.changed = true;
    }

    fn set_completion(&mut self, visible: bool) {
        if self.completion_visible == visible {
            return;
        }
        self.completion_visible = visible;
        self.presenter.set_completion_visible(visible);
        self.changed = true;
    }

    fn announce_fmt(&mut self, args: core::fmt::Arguments<'_>) {
        let mut message = HeaplessString::<ANNOUNCE_BYTES>::new();
        if message.write_fmt(args).is_err() {
            trace!("reader: announcement truncated");
        }
        self.presenter.announce(&message);
    }
}
