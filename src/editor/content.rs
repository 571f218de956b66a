pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or_else(|| text.len())
}

pub(crate) fn insert_char_at(text: &mut String, offset: usize, ch: char) {
    let clamped_offset = offset.min(char_len(text));
    let byte_idx = char_to_byte_idx(text, clamped_offset);
    text.insert(byte_idx, ch);
}

pub(crate) fn remove_char_at(text: &mut String, offset: usize) -> bool {
    if offset >= char_len(text) {
        return false;
    }
    let start = char_to_byte_idx(text, offset);
    let end = char_to_byte_idx(text, offset + 1);
    text.replace_range(start..end, "");
    true
}

/// Cuts `text` at the char offset and returns everything after it.
pub(crate) fn split_text_at(text: &mut String, offset: usize) -> String {
    let byte_idx = char_to_byte_idx(text, offset.min(char_len(text)));
    text.split_off(byte_idx)
}

/// Maps non-breaking spaces to regular spaces and trims the result.
pub(crate) fn normalized_content(text: &str) -> String {
    text.replace('\u{00A0}', " ").trim().to_string()
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod content_tests;
