//! Visual themes

use serde::{Deserialize, Serialize};

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Blue,
    Forest,
    Zen,
}

impl Theme {
    /// All themes in cycling order
    pub const ALL: [Theme; 3] = [Theme::Blue, Theme::Forest, Theme::Zen];

    /// Stable name, used for persistence
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Blue => "blue",
            Theme::Forest => "forest",
            Theme::Zen => "zen",
        }
    }

    /// Look a theme up by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Next theme in the cycle
    pub fn next(self) -> Self {
        match self {
            Theme::Blue => Theme::Forest,
            Theme::Forest => Theme::Zen,
            Theme::Zen => Theme::Blue,
        }
    }

    /// Background colour as `(r, g, b)`
    pub fn background(self) -> (u8, u8, u8) {
        match self {
            Theme::Blue => (0x0a, 0x16, 0x28),
            Theme::Forest => (0x0d, 0x1f, 0x14),
            Theme::Zen => (0x1a, 0x1a, 0x2e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        let mut theme = Theme::Blue;
        for _ in 0..Theme::ALL.len() {
            theme = theme.next();
        }
        assert_eq!(theme, Theme::Blue);
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Theme::from_name("forest"), Some(Theme::Forest));
        assert_eq!(Theme::from_name("neon"), None);
    }
}
