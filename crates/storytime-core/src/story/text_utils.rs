/// Byte range of the next whitespace-delimited token at or after `cursor`.
pub(super) fn next_word_at(text: &str, cursor: usize) -> Option<(usize, usize)> {
    let rest = text.get(cursor..)?;
    let start = cursor + rest.find(|ch: char| !ch.is_whitespace())?;
    let end = text[start..]
        .find(char::is_whitespace)
        .map_or(text.len(), |offset| start + offset);

    Some((start, end))
}

#[cfg(test)]
fn count_words(text: &str) -> usize {
    let mut count = 0usize;
    let mut cursor = 0usize;

    while let Some((_, end)) = next_word_at(text, cursor) {
        count += 1;
        cursor = end;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_follow_whitespace_split() {
        let text = "  Pip\tsaw a\u{a0}big   red kite! ";
        let mut cursor = 0;
        let mut tokens = Vec::new();
        while let Some((start, end)) = next_word_at(text, cursor) {
            tokens.push(&text[start..end]);
            cursor = end;
        }

        assert_eq!(tokens, text.split_whitespace().collect::<Vec<_>>());
        assert_eq!(count_words(text), tokens.len());
    }

    #[test]
    fn blank_text_has_no_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t "), 0);
        assert_eq!(next_word_at("abc", 10), None);
    }
}
