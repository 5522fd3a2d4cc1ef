#![cfg_attr(not(test), no_std)]

//! Narration, highlighting and panel navigation core for the storytime reader.
//!
//! The core is driven by a host loop through [`app::StoryReader::tick`] and
//! never touches a clock, an audio device or a UI toolkit directly.

pub mod app;
pub mod error;
pub mod input;
pub mod present;
pub mod settings;
pub mod speech;
pub mod story;

pub use error::{ReaderError, SpeechFault, StoryError};
