use super::{InputProvider, ReaderInput};

/// Input source for surfaces that never send anything, e.g. an unattended
/// auto-read session.
#[derive(Default, Debug, Clone, Copy)]
pub struct MockInput;

impl MockInput {
    pub const fn new() -> Self {
        Self
    }
}

impl InputProvider for MockInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<ReaderInput>, Self::Error> {
        Ok(None)
    }
}
