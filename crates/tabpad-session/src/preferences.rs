//! Editor preferences persisted with the session

use serde::{Deserialize, Serialize};

pub const FONT_SIZE_MIN: u32 = 8;
pub const FONT_SIZE_MAX: u32 = 32;
pub const DEFAULT_FONT_SIZE: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub word_wrap: bool,
    /// Font size in pixels, always within [FONT_SIZE_MIN, FONT_SIZE_MAX]
    pub font_size: u32,
}

impl Preferences {
    pub fn clamp_font_size(size: i64) -> u32 {
        size.clamp(FONT_SIZE_MIN as i64, FONT_SIZE_MAX as i64) as u32
    }

    /// Set the font size, returning the clamped value that was applied
    pub fn set_font_size(&mut self, size: i64) -> u32 {
        self.font_size = Self::clamp_font_size(size);
        self.font_size
    }

    pub fn step_font_size(&mut self, delta: i64) -> u32 {
        self.set_font_size(self.font_size as i64 + delta)
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            word_wrap: false,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_clamped() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.set_font_size(100), FONT_SIZE_MAX);
        assert_eq!(prefs.set_font_size(-3), FONT_SIZE_MIN);
        assert_eq!(prefs.set_font_size(20), 20);
    }

    #[test]
    fn test_step_stops_at_bounds() {
        let mut prefs = Preferences {
            word_wrap: false,
            font_size: FONT_SIZE_MAX,
        };
        assert_eq!(prefs.step_font_size(1), FONT_SIZE_MAX);
        assert_eq!(prefs.step_font_size(-1), FONT_SIZE_MAX - 1);
    }
}
