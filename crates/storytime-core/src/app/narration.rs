impl<ST, SB, IN, PR> StoryReader<ST, SB, IN, PR>
where
    ST: PanelSource,
    SB: SpeechBackend,
    IN: InputProvider,
    PR: Presenter,
{
    /// Narrate the panel on screen once.
    pub fn read_current(&mut self, now_ms: u64) {
        self.interrupt(now_ms);
        self.set_completion(false);
        self.state.mode = ReadingMode::ReadingSingle;
        self.presenter.announce("Reading");
        self.begin_panel_narration(now_ms);
    }

    /// Narrate the whole story from panel 1, advancing automatically.
    pub fn read_all(&mut self, now_ms: u64) {
        self.interrupt(now_ms);
        self.set_completion(false);
        self.state.mode = ReadingMode::ReadingAll;
        self.set_indicator(true);
        self.presenter.announce("Reading the whole story");
        info!(
            "narration: read all from panel={} rate_pct={}",
            self.state.current_panel,
            self.state.rate.percent()
        );

        if self.state.current_panel == 1 {
            self.begin_panel_narration(now_ms);
        } else {
            self.show_panel(1, now_ms);
            self.state.phase = Phase::SettlingBeforeSpeech {
                due_ms: now_ms.saturating_add(self.config.settle_after_advance_ms),
            };
        }
    }

    /// Silence everything, whatever is audible, and return to idle.
    pub fn stop(&mut self, now_ms: u64) {
        let was_active = self.state.mode != ReadingMode::Idle || self.state.word_echo.is_some();
        self.halt(now_ms);
        if was_active {
            info!("narration: stopped panel={}", self.state.current_panel);
            self.presenter.announce("Stopped");
        }
    }

    pub fn is_reading(&self) -> bool {
        self.state.mode != ReadingMode::Idle
    }

    /// New rate for the next narration; in-flight narration keeps its rate.
    pub fn set_rate(&mut self, rate: SpeechRate) {
        let rate = self.config.clamp_rate(rate);
        if rate != self.state.rate {
            debug!(
                "narration: rate_pct {} -> {}",
                self.state.rate.percent(),
                rate.percent()
            );
            self.state.rate = rate;
            self.changed = true;
        }
    }

    pub fn adjust_rate(&mut self, increase: bool) {
        let step = self.config.rate_step_pct;
        let percent = self.state.rate.percent();
        let next = if increase {
            percent.saturating_add(step)
        } else {
            percent.saturating_sub(step)
        };
        self.set_rate(SpeechRate::from_percent(next));
    }

    /// Speak one tapped word, slower and without highlight tracking.
    pub fn activate_word(&mut self, panel: u16, word: u16, now_ms: u64) {
        if panel != self.state.current_panel {
            debug!(
                "narration: word tap panel={} word={} not on screen (panel={})",
                panel, word, self.state.current_panel
            );
            return;
        }

        let word_count = match self.story.panel(panel) {
            Ok(found) => found.word_count(),
            Err(err) => {
                warn!("narration: {}", err);
                0
            }
        };
        if word >= word_count {
            debug!("narration: word tap panel={} word={} out of range", panel, word);
            return;
        }

        if self.state.mode != ReadingMode::Idle {
            self.halt(now_ms);
        } else {
            self.cancel_audio(now_ms);
        }

        let rate = self.state.rate.scaled(self.config.word_echo_rate_pct);
        let Some(text) = self.story.panel(panel).ok().and_then(|found| found.word(word)) else {
            return;
        };
        let handle = self.speech.speak(text, rate, &self.config.voices, now_ms);
        debug!(
            "narration: word echo panel={} word={} rate_pct={} handle={}",
            panel,
            word,
            rate.percent(),
            handle.id()
        );
        self.state.word_echo = Some(handle);
    }

    /// Hidden surfaces pause narration and freeze read-all deadlines.
    pub fn set_hidden(&mut self, hidden: bool, now_ms: u64) {
        match (hidden, self.hidden_since_ms) {
            (true, None) => {
                debug!("narration: surface hidden, pausing mode={:?}", self.state.mode);
                self.hidden_since_ms = Some(now_ms);
                self.speech.pause(now_ms);
                self.changed = true;
            }
            (false, Some(since)) => {
                let hidden_for = now_ms.saturating_sub(since);
                debug!("narration: surface visible after {}ms, resuming", hidden_for);
                self.hidden_since_ms = None;
                self.state.phase = self.state.phase.shifted(hidden_for);
                self.speech.resume(now_ms);
                self.changed = true;
            }
            _ => {}
        }
    }

    /// Cancel whatever is audible and clear markers. Mode is left to the caller.
    fn interrupt(&mut self, now_ms: u64) {
        self.cancel_audio(now_ms);
        self.clear_highlights();
        self.state.phase = Phase::Idle;
    }

    /// Cancel the active session and any word echo.
    fn cancel_audio(&mut self, now_ms: u64) {
        if let Phase::Speaking(session) = self.state.phase {
            debug!(
                "narration: cancel panel={} part={:?} handle={} units_spoken={}",
                session.panel,
                session.part,
                session.handle.id(),
                session.units_spoken
            );
            self.speech.cancel(session.handle, now_ms);
            self.state.phase = Phase::Idle;
        }
        if let Some(handle) = self.state.word_echo.take() {
            self.speech.cancel(handle, now_ms);
        }
    }

    /// Back to idle from any state.
    fn halt(&mut self, now_ms: u64) {
        self.interrupt(now_ms);
        self.state.mode = ReadingMode::Idle;
        self.set_indicator(false);
    }

    fn begin_panel_narration(&mut self, now_ms: u64) {
        let panel = self.state.current_panel;
        let text = match self.story.panel(panel) {
            Ok(found) => found.text(),
            Err(err) => {
                warn!("narration: {}", err);
                self.halt(now_ms);
                return;
            }
        };

        let rate = self.state.rate;
        let handle = self.speech.speak(text, rate, &self.config.voices, now_ms);
        info!(
            "narration: start panel={} mode={:?} rate_pct={} handle={}",
            panel,
            self.state.mode,
            rate.percent(),
            handle.id()
        );
        self.state.phase = Phase::Speaking(NarrationSession {
            handle,
            panel,
            part: NarrationPart::Primary,
            rate,
            units_spoken: 0,
        });
        self.set_indicator(true);
    }

    fn process_narration(&mut self, now_ms: u64) {
        while let Some(event) = self.speech.poll(now_ms) {
            self.apply_narration_event(event, now_ms);
        }
    }

    fn apply_narration_event(&mut self, event: NarrationEvent, now_ms: u64) {
        if self.state.word_echo == Some(event.handle) {
            if event.kind.is_terminal() {
                trace!("narration: word echo finished kind={:?}", event.kind);
                self.state.word_echo = None;
            }
            return;
        }

        let Phase::Speaking(mut session) = self.state.phase else {
            trace!(
                "narration: discard event handle={} kind={:?} phase={:?}",
                event.handle.id(),
                event.kind,
                self.state.phase
            );
            return;
        };
        if session.handle != event.handle {
            trace!(
                "narration: discard stale handle={} active={}",
                event.handle.id(),
                session.handle.id()
            );
            return;
        }

        match event.kind {
            NarrationEventKind::UnitBoundary { ordinal } => {
                session.units_spoken = session.units_spoken.saturating_add(1);
                self.state.phase = Phase::Speaking(session);
                if session.part == NarrationPart::Primary {
                    self.highlight_unit(session.panel, ordinal);
                }
            }
            NarrationEventKind::Completed => self.finish_session(session, now_ms),
            NarrationEventKind::Errored(fault) => {
                warn!(
                    "narration: panel={} part={:?} {}; back to idle",
                    session.panel,
                    session.part,
                    ReaderError::from(fault)
                );
                self.halt(now_ms);
            }
            NarrationEventKind::Canceled => {
                debug!(
                    "narration: platform canceled panel={} handle={}",
                    session.panel,
                    session.handle.id()
                );
                self.state.phase = Phase::Idle;
                self.halt(now_ms);
            }
        }
    }

    fn finish_session(&mut self, session: NarrationSession, now_ms: u64) {
        debug!(
            "narration: completed panel={} part={:?} units_spoken={} rate_pct={}",
            session.panel,
            session.part,
            session.units_spoken,
            session.rate.percent()
        );
        self.state.phase = Phase::Idle;

        if session.part == NarrationPart::Primary {
            self.settle_highlights();
            let secondary = self
                .story
                .panel(session.panel)
                .ok()
                .and_then(|panel| panel.secondary_text());
            if let Some(secondary) = secondary {
                let handle = self
                    .speech
                    .speak(secondary, self.state.rate, &self.config.voices, now_ms);
                self.state.phase = Phase::Speaking(NarrationSession {
                    handle,
                    panel: session.panel,
                    part: NarrationPart::Secondary,
                    rate: self.state.rate,
                    units_spoken: 0,
                });
                return;
            }
        }

        self.panel_narration_done(now_ms);
    }

    fn panel_narration_done(&mut self, now_ms: u64) {
        if self.state.mode != ReadingMode::ReadingAll {
            self.state.mode = ReadingMode::Idle;
            self.set_indicator(false);
            return;
        }

        if self.state.current_panel < self.story.total_panels() {
            self.state.phase = Phase::SettlingBeforeAdvance {
                due_ms: now_ms.saturating_add(self.config.settle_before_advance_ms),
            };
            return;
        }

        info!("narration: read all finished");
        self.state.mode = ReadingMode::Idle;
        self.set_indicator(false);
        self.raise_story_complete();
    }

    fn process_deadlines(&mut self, now_ms: u64) {
        if self.hidden_since_ms.is_some() {
            return;
        }

        match self.state.phase {
            Phase::SettlingBeforeAdvance { due_ms } if now_ms >= due_ms => {
                let next = self.state.current_panel + 1;
                debug!("narration: auto-advance to panel={}", next);
                self.show_panel(next, now_ms);
                self.state.phase = Phase::SettlingBeforeSpeech {
                    due_ms: now_ms.saturating_add(self.config.settle_after_advance_ms),
                };
            }
            Phase::SettlingBeforeSpeech { due_ms } if now_ms >= due_ms => {
                self.begin_panel_narration(now_ms);
            }
            _ => {}
        }
    }
}
