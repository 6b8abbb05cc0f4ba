use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use coursepane_core::layout::{
    WidthRange, DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH, DEFAULT_SIDEBAR_WIDTH,
};
use coursepane_core::locator::{ArticleBase, DEFAULT_ARTICLE_BASE};

/// Application settings, persisted to `~/.config/coursepane/settings.json`.
///
/// `#[serde(default)]` fills fields missing from an older file with their
/// `Default` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Window ───────────────────────────────────────────────────────────
    pub window_width: i32,
    pub window_height: i32,
    pub sidebar_width: i32,
    pub sidebar_min_width: i32,
    pub sidebar_max_width: i32,

    // ── Content ──────────────────────────────────────────────────────────
    /// Base that article locators are built under.
    pub article_base_url: String,
    /// JSON file with the course tree. Empty means the bundled sample.
    pub content_file: String,

    // ── Appearance ───────────────────────────────────────────────────────
    pub color_scheme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window_width: 1100,
            window_height: 720,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH as i32,
            sidebar_min_width: DEFAULT_MIN_WIDTH as i32,
            sidebar_max_width: DEFAULT_MAX_WIDTH as i32,

            article_base_url: String::from(DEFAULT_ARTICLE_BASE),
            content_file: String::new(),

            color_scheme: String::from("default"),
        }
    }
}

impl Settings {
    pub fn width_range(&self) -> WidthRange {
        WidthRange::new(
            f64::from(self.sidebar_min_width),
            f64::from(self.sidebar_max_width),
        )
    }

    /// The configured article base, or the default when it does not parse.
    pub fn article_base(&self) -> ArticleBase {
        match ArticleBase::parse(&self.article_base_url) {
            Ok(base) => base,
            Err(e) => {
                log::warn!("{}; using {}", e, DEFAULT_ARTICLE_BASE);
                ArticleBase::default()
            }
        }
    }

    pub fn content_path(&self) -> Option<PathBuf> {
        let trimmed = self.content_file.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

fn settings_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    let app_dir = config_dir.join("coursepane");
    let _ = std::fs::create_dir_all(&app_dir);
    app_dir.join("settings.json")
}

pub fn load() -> Settings {
    let path = settings_path();
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed settings file {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn save(settings: &Settings) {
    let path = settings_path();
    if let Ok(json) = serde_json::to_string_pretty(settings) {
        if let Err(e) = std::fs::write(&path, json) {
            log::warn!("Failed to save settings to {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"sidebar_width": 300}"#).unwrap();
        assert_eq!(settings.sidebar_width, 300);
        assert_eq!(settings.window_width, 1100);
        assert_eq!(settings.article_base_url, "https://example.com");
        assert_eq!(settings.content_path(), None);
    }

    #[test]
    fn invalid_base_falls_back_to_default() {
        let settings = Settings {
            article_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.article_base(), ArticleBase::default());
    }

    #[test]
    fn width_range_comes_from_bounds() {
        let settings = Settings::default();
        assert_eq!(settings.width_range(), WidthRange::new(150.0, 400.0));
    }
}
