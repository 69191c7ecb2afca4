use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use ratatui::style::Color;
use tracing::warn;

pub const DEFAULT_THEME: &str = "dark";
pub const THEMES: [&str; 2] = ["dark", "light"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub panel: Color,
    pub accent: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub highlight: Color,
    pub on_accent: Color,
    pub error: Color,
}

const DARK: Palette = Palette {
    bg: Color::Rgb(14, 16, 14),
    panel: Color::Rgb(20, 22, 20),
    accent: Color::Rgb(0, 245, 150),
    border: Color::Rgb(0, 205, 110),
    text: Color::Rgb(230, 230, 230),
    muted: Color::Rgb(136, 136, 136),
    highlight: Color::Rgb(0, 255, 255),
    on_accent: Color::Rgb(0, 0, 0),
    error: Color::Rgb(255, 85, 85),
};

const LIGHT: Palette = Palette {
    bg: Color::Rgb(246, 246, 242),
    panel: Color::Rgb(232, 234, 228),
    accent: Color::Rgb(0, 120, 70),
    border: Color::Rgb(0, 150, 90),
    text: Color::Rgb(24, 24, 24),
    muted: Color::Rgb(110, 110, 110),
    highlight: Color::Rgb(0, 95, 160),
    on_accent: Color::Rgb(255, 255, 255),
    error: Color::Rgb(190, 20, 20),
};

impl Palette {
    /// Unknown names fall back to the dark palette.
    pub fn for_theme(name: &str) -> Palette {
        match name {
            "light" => LIGHT,
            _ => DARK,
        }
    }
}

pub fn next_theme(current: &str) -> &'static str {
    let idx = THEMES.iter().position(|t| *t == current);
    match idx {
        Some(idx) => THEMES[(idx + 1) % THEMES.len()],
        None => THEMES[0],
    }
}

pub trait ThemeStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&mut self, theme: &str) -> Result<()>;
}

/// Reads the stored preference, defaulting when nothing usable is stored.
pub fn load_theme(store: &dyn ThemeStore) -> String {
    match store.load() {
        Ok(Some(theme)) => theme,
        Ok(None) => DEFAULT_THEME.to_string(),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "failed to read theme preference");
            DEFAULT_THEME.to_string()
        }
    }
}

/// Stores the theme name as the whole content of a single file.
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()));
            }
        };
        let theme = raw.trim();
        Ok((!theme.is_empty()).then(|| theme.to_string()))
    }

    fn save(&mut self, theme: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create config directory")?;
        }
        fs::write(&self.path, theme)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThemeStore::new(dir.path().join("theme"));
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(load_theme(&store), "dark");
    }

    #[test]
    fn saved_theme_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("theme");
        let mut store = FileThemeStore::new(path.clone());
        store.save("light").unwrap();
        let reopened = FileThemeStore::new(path);
        assert_eq!(load_theme(&reopened), "light");
    }

    #[test]
    fn blank_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(load_theme(&FileThemeStore::new(path)), "dark");
    }

    #[test]
    fn unreadable_path_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be
        let store = FileThemeStore::new(dir.path().to_path_buf());
        assert_eq!(load_theme(&store), "dark");
    }

    #[test]
    fn cycling_and_unknown_names() {
        assert_eq!(next_theme("dark"), "light");
        assert_eq!(next_theme("light"), "dark");
        assert_eq!(next_theme("cupcake"), "dark");
        assert_eq!(Palette::for_theme("cupcake"), Palette::for_theme("dark"));
        assert_ne!(Palette::for_theme("light"), Palette::for_theme("dark"));
    }
}
