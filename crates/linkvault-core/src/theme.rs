use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::local_state::LocalState;

/// Key the preference is stored under in the local state file
pub const THEME_KEY: &str = "theme";

/// Light or dark output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only the exact stored spellings are accepted
    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for the control that switches away from this theme
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Light => "Dark mode",
            Theme::Dark => "Light mode",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                title: Color::rgb(0x0f172a),
                link: Color::rgb(0x047857),
                tag: Color::rgb(0x047857),
                muted: Color::rgb(0x64748b),
                error: Color::rgb(0xbe123c),
            },
            Theme::Dark => Palette {
                title: Color::rgb(0xf8fafc),
                link: Color::rgb(0x6ee7b7),
                tag: Color::rgb(0xa7f3d0),
                muted: Color::rgb(0x94a3b8),
                error: Color::rgb(0xfecdd3),
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colors used when printing bookmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: Color,
    pub link: Color,
    pub tag: Color,
    pub muted: Color,
    pub error: Color,
}

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

/// Best guess at the desktop's color scheme.
///
/// Checks `GTK_THEME` first, then the terminal's `COLORFGBG`. Light when
/// neither says anything.
pub fn detect_system_theme() -> Theme {
    let gtk_theme = std::env::var("GTK_THEME").ok();
    let colorfgbg = std::env::var("COLORFGBG").ok();
    detect_from(gtk_theme.as_deref(), colorfgbg.as_deref())
}

fn detect_from(gtk_theme: Option<&str>, colorfgbg: Option<&str>) -> Theme {
    if let Some(gtk_theme) = gtk_theme {
        return if gtk_theme.to_lowercase().contains("dark") {
            Theme::Dark
        } else {
            Theme::Light
        };
    }

    // "fg;bg" or "fg;default;bg"; ANSI backgrounds 0-6 and 8 are dark
    if let Some(bg) = colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
    {
        return if bg < 7 || bg == 8 {
            Theme::Dark
        } else {
            Theme::Light
        };
    }

    Theme::Light
}

/// The persisted theme choice
pub struct ThemePreference {
    state: LocalState,
    current: Theme,
}

impl ThemePreference {
    /// Use the stored theme if there is a valid one, otherwise the system's
    pub fn load(state: LocalState) -> Self {
        Self::load_with(state, detect_system_theme)
    }

    fn load_with(state: LocalState, detect: impl FnOnce() -> Theme) -> Self {
        let current = match state.get(THEME_KEY).and_then(Theme::parse) {
            Some(theme) => theme,
            None => {
                let detected = detect();
                debug!("No stored theme, using system preference: {}", detected);
                detected
            }
        };

        Self { state, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip light/dark and persist the result
    pub fn toggle(&mut self) -> crate::Result<Theme> {
        let next = self.current.toggled();
        self.set(next)?;
        Ok(next)
    }

    pub fn set(&mut self, theme: Theme) -> crate::Result<()> {
        self.state.set(THEME_KEY, theme.as_str())?;
        self.current = theme;
        debug!("Theme set to {}", theme);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("Dark"), None);
        assert_eq!(Theme::parse("solarized"), None);
    }

    #[test]
    fn test_toggle_label() {
        assert_eq!(Theme::Light.toggle_label(), "Dark mode");
        assert_eq!(Theme::Dark.toggle_label(), "Light mode");
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn test_detect_from_environment() {
        assert_eq!(detect_from(Some("Adwaita:dark"), None), Theme::Dark);
        assert_eq!(detect_from(Some("Adwaita"), Some("15;0")), Theme::Light);
        assert_eq!(detect_from(None, Some("15;0")), Theme::Dark);
        assert_eq!(detect_from(None, Some("0;default;15")), Theme::Light);
        assert_eq!(detect_from(None, Some("garbage")), Theme::Light);
        assert_eq!(detect_from(None, None), Theme::Light);
    }

    #[test]
    fn test_stored_theme_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        LocalState::open(&path).unwrap().set(THEME_KEY, "dark").unwrap();

        let pref = ThemePreference::load(LocalState::open(&path).unwrap());
        assert_eq!(pref.current(), Theme::Dark);
    }

    #[test]
    fn test_invalid_stored_value_falls_back_to_system() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        for stored in ["Dark", "solarized", ""] {
            LocalState::open(&path).unwrap().set(THEME_KEY, stored).unwrap();

            let pref = ThemePreference::load_with(LocalState::open(&path).unwrap(), || {
                detect_from(None, Some("15;0"))
            });
            assert_eq!(pref.current(), Theme::Dark, "stored {:?}", stored);

            let pref = ThemePreference::load_with(LocalState::open(&path).unwrap(), || {
                detect_from(None, None)
            });
            assert_eq!(pref.current(), Theme::Light, "stored {:?}", stored);
        }
    }

    #[test]
    fn test_corrupt_state_file_uses_system_theme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let pref = ThemePreference::load(LocalState::open_or_empty(&path));
        assert_eq!(pref.current(), detect_system_theme());

        let pref = ThemePreference::load_with(LocalState::open_or_empty(&path), || Theme::Dark);
        assert_eq!(pref.current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let mut state = LocalState::open(&path).unwrap();
        state.set(THEME_KEY, "light").unwrap();

        let mut pref = ThemePreference::load(state);
        assert_eq!(pref.toggle().unwrap(), Theme::Dark);

        let reopened = LocalState::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY), Some("dark"));

        pref.set(Theme::Light).unwrap();
        let reopened = LocalState::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY), Some("light"));
    }

    #[test]
    fn test_palette_hex() {
        let c = Color::rgb(0x047857);
        assert_eq!(c, Color::new(0x04, 0x78, 0x57));
        assert_ne!(Theme::Light.palette(), Theme::Dark.palette());
    }
}
