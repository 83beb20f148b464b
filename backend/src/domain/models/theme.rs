/// Effective presentation theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Stable string form used as the persisted preference value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Parse a persisted preference value. Anything unrecognized is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ThemeMode::Dark)
    }
}

/// Theme state as seen by the rest of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    pub dark_mode: bool,
    /// Set once the user has chosen a theme; system preference changes stop
    /// being authoritative from then on.
    pub explicit: bool,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            dark_mode: false,
            explicit: false,
        }
    }
}
