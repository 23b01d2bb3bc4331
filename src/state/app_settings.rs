use crate::card::Zone;
use crate::state::config_store::default_config_path;
use chrono::FixedOffset;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_STATES_PATH: &str = "states.json";
const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub states_path: PathBuf,
    pub config_path: PathBuf,
    pub refresh_interval: Duration,
    pub zone: Zone,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            states_path: PathBuf::from(DEFAULT_STATES_PATH),
            config_path: default_config_path(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            zone: Zone::Local,
        }
    }
}

impl AppSettings {
    /// Defaults overridden by `FIXTURES_STATES_JSON`, `FIXTURES_REFRESH_SECS`,
    /// `FIXTURES_UTC_OFFSET` and `FIXTURES_LOG`.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty("FIXTURES_STATES_JSON") {
            settings.states_path = PathBuf::from(path);
        }
        if let Some(secs) = non_empty("FIXTURES_REFRESH_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            settings.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(offset) = non_empty("FIXTURES_UTC_OFFSET")
            .and_then(|v| FixedOffset::from_str(v.trim()).ok())
        {
            settings.zone = Zone::Fixed(offset);
        }
        settings.log_level =
            non_empty("FIXTURES_LOG").and_then(|v| LevelFilter::from_str(v.trim()).ok());
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.states_path, PathBuf::from(DEFAULT_STATES_PATH));
        assert_eq!(s.refresh_interval, Duration::from_secs(DEFAULT_REFRESH_SECS));
        assert_eq!(s.log_level, None);
    }

    #[test]
    fn environment_overrides() {
        let s = settings(&[
            ("FIXTURES_STATES_JSON", "/tmp/states.json"),
            ("FIXTURES_REFRESH_SECS", "5"),
            ("FIXTURES_LOG", "debug"),
            ("FIXTURES_UTC_OFFSET", "+02:00"),
        ]);
        assert_eq!(s.states_path, PathBuf::from("/tmp/states.json"));
        assert_eq!(s.refresh_interval, Duration::from_secs(5));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
        assert_eq!(s.zone, Zone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap()));
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let s = settings(&[
            ("FIXTURES_STATES_JSON", "  "),
            ("FIXTURES_REFRESH_SECS", "0"),
            ("FIXTURES_LOG", "loud"),
            ("FIXTURES_UTC_OFFSET", "CEST"),
        ]);
        assert_eq!(s.states_path, PathBuf::from(DEFAULT_STATES_PATH));
        assert_eq!(s.refresh_interval, Duration::from_secs(DEFAULT_REFRESH_SECS));
        assert_eq!(s.log_level, None);
        assert_eq!(s.zone, Zone::Local);
    }
}
