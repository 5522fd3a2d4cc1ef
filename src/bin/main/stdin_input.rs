use std::io::{self, BufRead};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, warn};
use storytime_core::{
    input::{Key, ReaderInput, SwipeDirection},
    speech::SpeechRate,
};
use thiserror::Error;

pub(super) const HELP: &str = "commands: next | back | go N | read | stop | all | restart | \
rate X | word N | swipe left|right | key NAME | hide | show | quit";

/// Multipliers above this are read as percentages (`rate 120`).
const MAX_RATE_MULTIPLIER: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Command {
    Reader(ReaderInput),
    /// 1-based word of the panel on screen.
    WordTap(u16),
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub(super) enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

pub(super) fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();

    let command = match head.to_ascii_lowercase().as_str() {
        "next" | "n" => Command::Reader(ReaderInput::Next),
        "back" | "prev" | "previous" | "p" => Command::Reader(ReaderInput::Previous),
        "go" => Command::Reader(ReaderInput::GoTo(number(arg, "go", "a panel number")?)),
        "read" => Command::Reader(ReaderInput::ReadCurrent),
        "stop" => Command::Reader(ReaderInput::Stop),
        "all" => Command::Reader(ReaderInput::ReadAll),
        "restart" => Command::Reader(ReaderInput::Restart),
        "rate" => Command::Reader(ReaderInput::SetRate(rate(arg)?.percent())),
        "word" => {
            let word = number(arg, "word", "a word number from 1")?;
            if word == 0 {
                return Err(CommandError::BadArgument {
                    command: "word",
                    expected: "a word number from 1",
                });
            }
            Command::WordTap(word)
        }
        "swipe" => Command::Reader(ReaderInput::Swipe(swipe(arg)?)),
        "key" => Command::Reader(ReaderInput::KeyPress(key(arg)?)),
        "hide" => Command::Reader(ReaderInput::VisibilityChanged { hidden: true }),
        "show" => Command::Reader(ReaderInput::VisibilityChanged { hidden: false }),
        "quit" | "exit" | "q" => Command::Quit,
        _ => return Err(CommandError::Unknown(head.to_owned())),
    };
    Ok(Some(command))
}

fn number(arg: Option<&str>, command: &'static str, expected: &'static str) -> Result<u16, CommandError> {
    arg.and_then(|value| value.parse().ok())
        .ok_or(CommandError::BadArgument { command, expected })
}

fn rate(arg: Option<&str>) -> Result<SpeechRate, CommandError> {
    let value: f32 = arg
        .and_then(|value| value.parse().ok())
        .filter(|value: &f32| value.is_finite() && *value > 0.0)
        .ok_or(CommandError::BadArgument {
            command: "rate",
            expected: "a multiplier such as 1.2",
        })?;

    if value <= MAX_RATE_MULTIPLIER {
        Ok(SpeechRate::from_multiplier(value))
    } else {
        Ok(SpeechRate::from_percent(value.min(u16::MAX as f32) as u16))
    }
}

fn swipe(arg: Option<&str>) -> Result<SwipeDirection, CommandError> {
    match arg.map(str::to_ascii_lowercase).as_deref() {
        Some("left") => Ok(SwipeDirection::Left),
        Some("right") => Ok(SwipeDirection::Right),
        _ => Err(CommandError::BadArgument {
            command: "swipe",
            expected: "`left` or `right`",
        }),
    }
}

fn key(arg: Option<&str>) -> Result<Key, CommandError> {
    let bad = CommandError::BadArgument {
        command: "key",
        expected: "a key name such as `space` or a single character",
    };
    let Some(name) = arg else {
        return Err(bad);
    };

    let key = match name.to_ascii_lowercase().as_str() {
        "left" | "arrowleft" => Key::ArrowLeft,
        "right" | "arrowright" => Key::ArrowRight,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "home" => Key::Home,
        "end" => Key::End,
        "enter" | "return" => Key::Enter,
        "space" => Key::Space,
        "escape" | "esc" => Key::Escape,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Key::Char(ch),
                _ => return Err(bad),
            }
        }
    };
    Ok(key)
}

/// Forward parsed lines until the reader goes away or input ends.
fn forward_lines<R: BufRead>(lines: R, tx: &Sender<Command>) {
    for line in lines.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("input: stdin read failed: {}", err);
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(command)) => {
                if tx.send(command).is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(err) => {
                println!("{err}");
                println!("{HELP}");
            }
        }
    }

    debug!("input: stdin closed");
    let _ = tx.send(Command::Quit);
}

/// Terminal input: a reader thread parses lines, the host loop drains them
/// in arrival order.
pub(super) struct StdinInput {
    rx: Receiver<Command>,
}

impl StdinInput {
    pub(super) fn spawn() -> io::Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        std::thread::Builder::new()
            .name("stdin".into())
            .spawn(move || forward_lines(io::stdin().lock(), &tx))?;
        Ok(Self::from_receiver(rx))
    }

    fn from_receiver(rx: Receiver<Command>) -> Self {
        Self { rx }
    }

    /// Next pending command; a closed stdin reads as `Quit`.
    pub(super) fn poll_command(&mut self) -> Option<Command> {
        match self.rx.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Command::Quit),
        }
    }
}

impl Command {
    /// Reader input for this command, with word taps bound to the panel on
    /// screen at dispatch time. `None` for `Quit`.
    pub(super) fn into_input(self, panel_on_screen: u16) -> Option<ReaderInput> {
        match self {
            Self::Reader(event) => Some(event),
            Self::WordTap(word) => Some(ReaderInput::WordActivated {
                panel: panel_on_screen,
                word: word.saturating_sub(1),
            }),
            Self::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_and_reading_commands() {
        assert_eq!(
            parse_command("next"),
            Ok(Some(Command::Reader(ReaderInput::Next)))
        );
        assert_eq!(
            parse_command("  Back "),
            Ok(Some(Command::Reader(ReaderInput::Previous)))
        );
        assert_eq!(
            parse_command("go 4"),
            Ok(Some(Command::Reader(ReaderInput::GoTo(4))))
        );
        assert_eq!(
            parse_command("all"),
            Ok(Some(Command::Reader(ReaderInput::ReadAll)))
        );
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn rate_accepts_multiplier_or_percent() {
        assert_eq!(
            parse_command("rate 1.2"),
            Ok(Some(Command::Reader(ReaderInput::SetRate(120))))
        );
        assert_eq!(
            parse_command("rate 75"),
            Ok(Some(Command::Reader(ReaderInput::SetRate(75))))
        );
        assert_eq!(
            parse_command("rate 9"),
            Ok(Some(Command::Reader(ReaderInput::SetRate(50))))
        );
        assert!(parse_command("rate fast").is_err());
    }

    #[test]
    fn gestures_keys_and_visibility() {
        assert_eq!(
            parse_command("swipe LEFT"),
            Ok(Some(Command::Reader(ReaderInput::Swipe(SwipeDirection::Left))))
        );
        assert_eq!(
            parse_command("key space"),
            Ok(Some(Command::Reader(ReaderInput::KeyPress(Key::Space))))
        );
        assert_eq!(
            parse_command("key +"),
            Ok(Some(Command::Reader(ReaderInput::KeyPress(Key::Char('+')))))
        );
        assert_eq!(
            parse_command("hide"),
            Ok(Some(Command::Reader(ReaderInput::VisibilityChanged {
                hidden: true
            })))
        );
        assert!(parse_command("key spacebar").is_err());
        assert!(parse_command("swipe up").is_err());
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(
            parse_command("dance"),
            Err(CommandError::Unknown("dance".to_owned()))
        );
        assert!(matches!(
            parse_command("go"),
            Err(CommandError::BadArgument { command: "go", .. })
        ));
        assert!(parse_command("word 0").is_err());
    }

    #[test]
    fn commands_arrive_in_order_with_taps_bound_at_dispatch() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut input = StdinInput::from_receiver(rx);

        forward_lines("word 3\nnext\nbogus\nword 1\nquit\n".as_bytes(), &tx);

        let mut panel = 1;
        let mut dispatched = Vec::new();
        while let Some(command) = input.poll_command() {
            let Some(event) = command.into_input(panel) else {
                break;
            };
            if event == ReaderInput::Next {
                panel += 1;
            }
            dispatched.push(event);
        }

        assert_eq!(
            dispatched,
            vec![
                ReaderInput::WordActivated { panel: 1, word: 2 },
                ReaderInput::Next,
                ReaderInput::WordActivated { panel: 2, word: 0 },
            ]
        );
    }

    #[test]
    fn closed_stdin_reads_as_quit() {
        let (tx, rx) = crossbeam_channel::unbounded::<Command>();
        let mut input = StdinInput::from_receiver(rx);
        drop(tx);

        assert_eq!(input.poll_command(), Some(Command::Quit));
    }
}
