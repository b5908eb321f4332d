//! Status bar figures

use serde::Serialize;

/// Caret position and buffer size. Line and column are 1-based; all counts
/// are in codepoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub line: usize,
    pub column: usize,
    pub chars: usize,
    pub lines: usize,
}

impl TextStats {
    pub fn compute(text: &str, cursor: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        let mut chars = 0;
        let mut lines = 1;

        for ch in text.chars() {
            let before_cursor = chars < cursor;
            chars += 1;

            if ch == '\n' {
                lines += 1;
                if before_cursor {
                    line += 1;
                    column = 1;
                }
            } else if before_cursor {
                column += 1;
            }
        }

        Self {
            line,
            column,
            chars,
            lines,
        }
    }
}
