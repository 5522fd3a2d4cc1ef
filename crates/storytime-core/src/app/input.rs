impl<ST, SB, IN, PR> StoryReader<ST, SB, IN, PR>
where
    ST: PanelSource,
    SB: SpeechBackend,
    IN: InputProvider,
    PR: Presenter,
{
    fn process_inputs(&mut self, now_ms: u64) {
        loop {
            match self.input.poll_event() {
                Ok(Some(event)) => self.handle_input(event, now_ms),
                Ok(None) => break,
                Err(_) => {
                    warn!("input: provider failed; skipping this tick");
                    break;
                }
            }
        }
    }

    /// Apply one gateway event.
    pub fn handle_input(&mut self, event: ReaderInput, now_ms: u64) {
        debug!(
            "input: {:?} panel={} mode={:?}",
            event, self.state.current_panel, self.state.mode
        );

        match event {
            ReaderInput::Next => self.next(now_ms),
            ReaderInput::Previous => self.previous(now_ms),
            ReaderInput::GoTo(target) => {
                self.go_to(target, now_ms);
            }
            ReaderInput::ReadCurrent => self.read_current(now_ms),
            ReaderInput::Stop => self.stop(now_ms),
            ReaderInput::ReadAll => self.read_all(now_ms),
            ReaderInput::Restart => self.restart(now_ms),
            ReaderInput::SetRate(percent) => self.set_rate(SpeechRate::from_percent(percent)),
            ReaderInput::WordActivated { panel, word } => self.activate_word(panel, word, now_ms),
            ReaderInput::Swipe(SwipeDirection::Left) => self.next(now_ms),
            ReaderInput::Swipe(SwipeDirection::Right) => self.previous(now_ms),
            ReaderInput::KeyPress(key) => self.apply_key(key, now_ms),
            ReaderInput::VisibilityChanged { hidden } => self.set_hidden(hidden, now_ms),
        }
    }

    fn apply_key(&mut self, key: Key, now_ms: u64) {
        match key {
            Key::ArrowRight | Key::PageDown => self.next(now_ms),
            Key::ArrowLeft | Key::PageUp => self.previous(now_ms),
            Key::Home => self.go_to_first(now_ms),
            Key::End => self.go_to_last(now_ms),
            Key::Enter => self.read_current(now_ms),
            Key::Space => {
                if self.is_reading() {
                    self.stop(now_ms);
                } else {
                    self.read_current(now_ms);
                }
            }
            Key::Escape => self.stop(now_ms),
            Key::Char(ch) => match ch.to_ascii_lowercase() {
                'r' => self.read_current(now_ms),
                's' => self.stop(now_ms),
                'a' => self.read_all(now_ms),
                '+' | '=' => self.adjust_rate(true),
                '-' | '_' => self.adjust_rate(false),
                digit @ '1'..='9' => {
                    self.go_to(digit as u16 - '0' as u16, now_ms);
                }
                other => trace!("input: unmapped key {:?}", other),
            },
        }
    }
}
