//! Panel store: the ordered, immutable panels of one story.

mod bundled;
mod text_utils;

use heapless::Vec as HeaplessVec;

use crate::error::{ReaderError, StoryError};

pub use bundled::{BUNDLED_STORY, bundled_story};

pub const MAX_PANELS: usize = 32;
pub const MAX_PANEL_WORDS: usize = 48;

/// Authoring form of one panel before it is tokenized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PanelScript<'a> {
    pub text: &'a str,
    pub secondary_text: Option<&'a str>,
}

impl<'a> PanelScript<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            secondary_text: None,
        }
    }

    pub const fn with_secondary(mut self, secondary_text: &'a str) -> Self {
        self.secondary_text = Some(secondary_text);
        self
    }
}

/// Byte range of one speakable word inside a panel's text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct WordSpan {
    start: usize,
    end: usize,
}

/// One narrated unit of the story.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Panel<'a> {
    index: u16,
    text: &'a str,
    secondary_text: Option<&'a str>,
    words: HeaplessVec<WordSpan, MAX_PANEL_WORDS>,
}

impl<'a> Panel<'a> {
    fn from_script(index: u16, script: &PanelScript<'a>) -> Result<Self, StoryError> {
        let mut words = HeaplessVec::new();
        let mut cursor = 0usize;

        while let Some((start, end)) = text_utils::next_word_at(script.text, cursor) {
            words
                .push(WordSpan { start, end })
                .map_err(|_| StoryError::TooManyWords {
                    index,
                    max: MAX_PANEL_WORDS,
                })?;
            cursor = end;
        }

        if words.is_empty() {
            return Err(StoryError::EmptyPanel { index });
        }

        Ok(Self {
            index,
            text: script.text,
            secondary_text: script
                .secondary_text
                .filter(|secondary| !secondary.trim().is_empty()),
            words,
        })
    }

    /// 1-based position in the story.
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn secondary_text(&self) -> Option<&'a str> {
        self.secondary_text
    }

    pub fn word_count(&self) -> u16 {
        self.words.len() as u16
    }

    pub fn word(&self, word_index: u16) -> Option<&'a str> {
        let text = self.text;
        self.words
            .get(word_index as usize)
            .map(|span| &text[span.start..span.end])
    }

    pub fn words(&self) -> Words<'a, '_> {
        Words {
            text: self.text,
            spans: self.words.iter(),
        }
    }
}

/// Words of a panel in narration order.
#[derive(Clone, Debug)]
pub struct Words<'a, 'p> {
    text: &'a str,
    spans: core::slice::Iter<'p, WordSpan>,
}

impl<'a> Iterator for Words<'a, '_> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.spans.next().map(|span| &self.text[span.start..span.end])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl ExactSizeIterator for Words<'_, '_> {}

/// Read-only access to a loaded story.
pub trait PanelSource {
    fn total_panels(&self) -> u16;

    /// Panel by 1-based index.
    fn panel(&self, index: u16) -> Result<&Panel<'_>, ReaderError>;

    fn words_of(&self, index: u16) -> Result<Words<'_, '_>, ReaderError> {
        self.panel(index).map(|panel| panel.words())
    }

    fn contains(&self, index: u16) -> bool {
        (1..=self.total_panels()).contains(&index)
    }
}

/// Story backed by static panel scripts.
#[derive(Clone, Debug)]
pub struct StaticStory<'a> {
    panels: HeaplessVec<Panel<'a>, MAX_PANELS>,
}

impl<'a> StaticStory<'a> {
    pub fn new(scripts: &[PanelScript<'a>]) -> Result<Self, StoryError> {
        if scripts.is_empty() {
            return Err(StoryError::Empty);
        }
        if scripts.len() > MAX_PANELS {
            return Err(StoryError::TooManyPanels {
                count: scripts.len(),
                max: MAX_PANELS,
            });
        }

        let mut panels = HeaplessVec::new();
        for (offset, script) in scripts.iter().enumerate() {
            let panel = Panel::from_script(offset as u16 + 1, script)?;
            if panels.push(panel).is_err() {
                return Err(StoryError::TooManyPanels {
                    count: scripts.len(),
                    max: MAX_PANELS,
                });
            }
        }

        Ok(Self { panels })
    }
}

impl PanelSource for StaticStory<'_> {
    fn total_panels(&self) -> u16 {
        self.panels.len() as u16
    }

    fn panel(&self, index: u16) -> Result<&Panel<'_>, ReaderError> {
        index
            .checked_sub(1)
            .and_then(|offset| self.panels.get(offset as usize))
            .ok_or(ReaderError::PanelNotFound {
                index,
                total: self.total_panels(),
            })
    }
}

#[cfg(test)]
mod tests;
