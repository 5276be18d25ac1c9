use std::env;

use serde::{Deserialize, Serialize};

use self::bookmarks::BookmarkConfig;
use self::lexicon::LexiconConfig;
use self::render::RenderConfig;
use self::translator::TranslatorConfig;

pub mod bookmarks;
pub mod lexicon;
pub mod locale;
pub mod render;
pub mod translator;

fn default_event_capacity() -> usize {
    64
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub lexicon: LexiconConfig,
    pub bookmarks: BookmarkConfig,
    pub translator: TranslatorConfig,
    pub render: RenderConfig,

    /// Capacity of the UI <-> app event channels
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lexicon: LexiconConfig::default(),
            bookmarks: BookmarkConfig::default(),
            translator: TranslatorConfig::default(),
            render: RenderConfig::default(),

            event_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables that are set
    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var("LEXA_WORDS") {
            self.lexicon.path = path;
        }

        if let Ok(path) = env::var("LEXA_BOOKMARKS_DB") {
            self.bookmarks.db_path = path;
        }

        if let Ok(markup) = env::var("LEXA_MARKUP") {
            self.render.markup = markup;
        }

        if let Ok(api_key) = env::var("DEEPL_API_KEY")
            && !api_key.is_empty()
        {
            self.translator.api_key = api_key;
            self.translator.enabled = true;
        }

        if let Ok(api_url) = env::var("DEEPL_API_URL") {
            self.translator.api_url = api_url;
        }

        if let Ok(lang) = env::var("LEXA_TARGET_LANG") {
            self.translator.to_lang = lang.to_lowercase();
        }

        self.translator.timeout_ms = env::var("TRANSLATE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.translator.timeout_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"lexicon": {"path": "data/words.json"}, "translator": {"to_lang": "fr"}}"#,
        )
        .unwrap();

        assert_eq!(config.lexicon.path, "data/words.json");
        assert!(config.lexicon.additional_paths.is_empty());
        assert_eq!(config.bookmarks.db_path, "bookmarks.db");
        assert_eq!(config.translator.to_lang, "fr");
        assert_eq!(config.translator.from_lang, "en");
        assert_eq!(config.translator.timeout_ms, 10_000);
        assert_eq!(config.render.markup, "plain");
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn new_applies_environment_overrides() {
        // SAFETY: no other test in this crate reads these variables
        unsafe {
            env::set_var("LEXA_BOOKMARKS_DB", "/tmp/lexa-env.db");
            env::set_var("TRANSLATE_TIMEOUT_MS", "2500");
        }
        let config = Config::new();
        unsafe {
            env::remove_var("LEXA_BOOKMARKS_DB");
            env::remove_var("TRANSLATE_TIMEOUT_MS");
        }

        assert_eq!(config.bookmarks.db_path, "/tmp/lexa-env.db");
        assert_eq!(config.translator.timeout_ms, 2500);
        assert_eq!(config.lexicon.path, Config::default().lexicon.path);
    }

    #[test]
    fn translator_needs_key_and_flag() {
        let mut config = Config::default();
        assert!(!config.translator.is_usable());

        config.translator.enabled = true;
        assert!(!config.translator.is_usable());

        config.translator.api_key = "secret".to_string();
        assert!(config.translator.is_usable());
    }
}
