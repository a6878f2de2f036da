//! First-sentence extraction for package summaries.

/// Longest synopsis kept, in characters.
const MAX_SYNOPSIS_CHARS: usize = 120;

/// Returns the first sentence of a documentation body.
///
/// Leading blank lines and Markdown headings are skipped. The first paragraph
/// is joined onto one line with runs of whitespace (tabs included) collapsed,
/// then cut after the first period that ends the text or is followed by a
/// space. The result is capped at 120 characters.
#[must_use]
pub fn synopsis(text: &str) -> String {
    let paragraph = text
        .lines()
        .map(str::trim)
        .skip_while(|line| line.is_empty() || line.starts_with('#'))
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let collapsed = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
    let sentence = first_sentence(&collapsed);
    truncate_chars(sentence, MAX_SYNOPSIS_CHARS)
}

fn first_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if ch != '.' {
            continue;
        }
        match chars.peek() {
            None | Some((_, ' ')) => return text.get(..=index).unwrap_or(text),
            Some(_) => {}
        }
    }
    text
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
