use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use lexa_config::Config;

/// Picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "lexa.json";

fn read_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file =
        File::open(path).with_context(|| format!("cannot open config {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

/// Config file (or defaults) with environment overrides applied
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    let path = explicit.or_else(|| fallback.exists().then_some(fallback));

    let Some(path) = path else {
        tracing::debug!("No config file, using defaults");
        return Ok(Config::new());
    };

    let mut config = read_config_file(path)?;
    config.apply_env();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{"lexicon": {"path": "data/words.json", "additional_paths": ["extra.json"]},
                "render": {"markup": "html"},
                "event_capacity": 8}"#,
        )
        .unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.lexicon.path, "data/words.json");
        assert_eq!(config.lexicon.additional_paths, vec!["extra.json"]);
        assert_eq!(config.render.markup, "html");
        assert_eq!(config.event_capacity, 8);
        assert_eq!(config.bookmarks.db_path, "bookmarks.db");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(err.to_string().contains("cannot open config"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
