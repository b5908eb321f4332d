//! Codepoint <-> byte offset conversion

/// Byte offset of the `char_offset`-th codepoint, clamped to the end of `text`
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Codepoint offset of a byte offset that lies on a char boundary
pub fn byte_to_char(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}
