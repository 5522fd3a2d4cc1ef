use super::{PanelScript, StaticStory};
use crate::error::StoryError;

/// Six-panel picture story shipped with the reader.
pub const BUNDLED_STORY: [PanelScript<'static>; 6] = [
    PanelScript::new("Pip is a little robot who lives on a hill.")
        .with_secondary("Beep beep! Good morning!"),
    PanelScript::new("One windy day Pip sees a red kite in the sky."),
    PanelScript::new("The kite gets stuck high up in a big tree.")
        .with_secondary("Oh no! My kite!"),
    PanelScript::new("Pip stretches and stretches, but the tree is too tall."),
    PanelScript::new("A friendly bird flies up and gives the string a tug.")
        .with_secondary("Tweet! Here you go!"),
    PanelScript::new("Pip and the bird fly the kite together until sunset.")
        .with_secondary("Thank you, friend!"),
];

pub fn bundled_story() -> Result<StaticStory<'static>, StoryError> {
    StaticStory::new(&BUNDLED_STORY)
}
