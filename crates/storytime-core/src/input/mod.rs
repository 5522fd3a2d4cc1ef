//! Input abstraction layer: everything the presentation surface can ask of
//! the reader.

pub mod mock;

/// Minimum horizontal travel for a touch gesture to count as a swipe.
pub const SWIPE_MIN_DISTANCE: i32 = 50;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Touch gesture measured from touch start to touch end.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Swipe {
    pub dx: i32,
    pub dy: i32,
}

impl Swipe {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Direction of a mostly horizontal gesture that travelled far enough.
    pub fn direction(self) -> Option<SwipeDirection> {
        let horizontal = self.dx.saturating_abs();
        if horizontal < SWIPE_MIN_DISTANCE || horizontal <= self.dy.saturating_abs() {
            return None;
        }

        Some(if self.dx < 0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }
}

/// Keyboard keys the reader reacts to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Char(char),
}

/// Logical actions consumed by the reader.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReaderInput {
    Next,
    Previous,
    GoTo(u16),
    ReadCurrent,
    Stop,
    ReadAll,
    Restart,
    /// New speaking rate in percent; applies to the next narration.
    SetRate(u16),
    /// A single word was tapped or activated.
    WordActivated { panel: u16, word: u16 },
    Swipe(SwipeDirection),
    KeyPress(Key),
    /// The hosting surface became hidden (`true`) or visible again.
    VisibilityChanged { hidden: bool },
}

impl ReaderInput {
    /// Build a swipe input from a raw touch delta, if it qualifies.
    pub fn from_touch(swipe: Swipe) -> Option<Self> {
        swipe.direction().map(Self::Swipe)
    }
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<ReaderInput>, Self::Error>;
}
