use crate::card::host::{CardConfig, stub_config};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "fixtures-tui";
const CONFIG_FILE: &str = "card.json";

/// `$XDG_CONFIG_HOME/fixtures-tui/card.json`, then `~/.config/...`, then the
/// working directory.
pub fn default_config_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join(APP_DIR).join(CONFIG_FILE);
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE);
    }
    PathBuf::from(CONFIG_FILE)
}

/// The saved card config, or the stub config when nothing was saved yet.
pub fn load_card_config(path: &Path) -> Result<CardConfig, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stub_config()),
        Err(e) => return Err(format!("read config failed: {e}")),
    };
    serde_json::from_str(&content).map_err(|e| format!("parse config failed: {e}"))
}

pub fn save_card_config(path: &Path, config: &CardConfig) -> Result<(), String> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
    }
    let payload = serde_json::to_string_pretty(config)
        .map_err(|e| format!("serialize config failed: {e}"))?;
    std::fs::write(path, payload).map_err(|e| format!("write config failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_stub_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_card_config(&dir.path().join("card.json")).unwrap();
        assert_eq!(config, stub_config());
    }

    #[test]
    fn saved_config_round_trips_through_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("card.json");
        let mut config = CardConfig::for_entity("sensor.laliga");
        config.team_id = Some("529".into());

        save_card_config(&path, &config).unwrap();
        assert_eq!(load_card_config(&path).unwrap(), config);
    }

    #[test]
    fn hand_written_config_with_numbers_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.json");
        std::fs::write(&path, r#"{"entity": "sensor.laliga", "teamId": 541}"#).unwrap();

        let config = load_card_config(&path).unwrap();
        assert_eq!(config.tracked_team_id(), 541);
        assert_eq!(config.league, None);
    }

    #[test]
    fn corrupt_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.json");
        std::fs::write(&path, "{ nope").unwrap();
        let err = load_card_config(&path).unwrap_err();
        assert!(err.starts_with("parse config failed"));
    }
}
