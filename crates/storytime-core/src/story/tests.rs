use super::*;

#[test]
fn every_bundled_panel_tokenizes_like_whitespace_split() {
    let story = bundled_story().unwrap();
    assert_eq!(story.total_panels(), 6);

    for index in 1..=story.total_panels() {
        let panel = story.panel(index).unwrap();
        let expected: Vec<&str> = panel.text().split_whitespace().collect();
        let words: Vec<&str> = story.words_of(index).unwrap().collect();

        assert_eq!(panel.index(), index);
        assert_eq!(words, expected);
        assert_eq!(panel.word_count() as usize, expected.len());
        assert_eq!(panel.word(0), expected.first().copied());
    }
}

#[test]
fn panel_lookup_outside_story_is_not_found() {
    let story = bundled_story().unwrap();

    assert_eq!(
        story.panel(0).err(),
        Some(ReaderError::PanelNotFound { index: 0, total: 6 })
    );
    assert_eq!(
        story.panel(7).err(),
        Some(ReaderError::PanelNotFound { index: 7, total: 6 })
    );
    assert!(story.words_of(9).is_err());
    assert!(!story.contains(0));
    assert!(story.contains(6));
}

#[test]
fn secondary_text_is_kept_only_when_speakable() {
    let scripts = [
        PanelScript::new("Hello there.").with_secondary("Hi!"),
        PanelScript::new("Second panel.").with_secondary("   "),
    ];
    let story = StaticStory::new(&scripts).unwrap();

    assert_eq!(story.panel(1).unwrap().secondary_text(), Some("Hi!"));
    assert_eq!(story.panel(2).unwrap().secondary_text(), None);
}

#[test]
fn rejects_stories_that_do_not_fit_the_store() {
    assert_eq!(StaticStory::new(&[]).err(), Some(StoryError::Empty));
    assert_eq!(
        StaticStory::new(&[PanelScript::new("ok"), PanelScript::new("  ")]).err(),
        Some(StoryError::EmptyPanel { index: 2 })
    );

    let long_text = "la ".repeat(MAX_PANEL_WORDS + 1);
    let scripts = [PanelScript::new(long_text.as_str())];
    assert_eq!(
        StaticStory::new(&scripts).err(),
        Some(StoryError::TooManyWords {
            index: 1,
            max: MAX_PANEL_WORDS
        })
    );

    let many = [PanelScript::new("word"); MAX_PANELS + 1];
    assert_eq!(
        StaticStory::new(&many).err(),
        Some(StoryError::TooManyPanels {
            count: MAX_PANELS + 1,
            max: MAX_PANELS
        })
    );
}
