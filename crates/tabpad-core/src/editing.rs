//! Tab-key indentation

use tabpad_search::{char_to_byte, Selection};

pub const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub text: String,
    /// Caret after the edit, as a codepoint offset
    pub caret: usize,
}

/// Replace the selection with one indent and put the caret after it
pub fn indent(text: &str, selection: Selection) -> TextEdit {
    let selection = selection.normalized();
    let start = char_to_byte(text, selection.start);
    let end = char_to_byte(text, selection.end);

    let mut buffer = String::with_capacity(text.len() + INDENT.len());
    buffer.push_str(&text[..start]);
    buffer.push_str(INDENT);
    buffer.push_str(&text[end..]);

    TextEdit {
        text: buffer,
        caret: selection.start + INDENT.len(),
    }
}

/// Remove one indent (four spaces, or a tab) from the start of the caret's
/// line, if the line up to the caret starts with one.
pub fn unindent(text: &str, caret: usize) -> Option<TextEdit> {
    let caret_byte = char_to_byte(text, caret);
    let line_start = text[..caret_byte].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &text[line_start..caret_byte];

    let removed = if line.starts_with(INDENT) {
        INDENT.len()
    } else if line.starts_with('\t') {
        1
    } else {
        return None;
    };

    let mut buffer = String::with_capacity(text.len());
    buffer.push_str(&text[..line_start]);
    buffer.push_str(&text[line_start + removed..]);

    Some(TextEdit {
        text: buffer,
        caret: caret - removed,
    })
}
