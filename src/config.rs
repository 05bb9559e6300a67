use std::path::PathBuf;

use log::LevelFilter;

/// Runtime settings for the command-line front end.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite file holding the `questions` and `scores` collections
    pub database_path: PathBuf,
    /// Directory for dated log files; console only when unset
    pub log_dir: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("quiz.sqlite"),
            log_dir: Some(PathBuf::from("log")),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let default = Self::default();
        Self {
            database_path: lookup("QUIZ_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.database_path),
            log_dir: match lookup("QUIZ_LOG_DIR") {
                Some(dir) if dir.trim().is_empty() => None,
                Some(dir) => Some(PathBuf::from(dir)),
                None => default.log_dir,
            },
            log_level: lookup("QUIZ_LOG_LEVEL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.log_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.database_path, PathBuf::from("quiz.sqlite"));
        assert_eq!(config.log_dir, Some(PathBuf::from("log")));
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[
            ("QUIZ_DATABASE_PATH", "/tmp/q.db"),
            ("QUIZ_LOG_DIR", ""),
            ("QUIZ_LOG_LEVEL", "debug"),
        ]);
        assert_eq!(config.database_path, PathBuf::from("/tmp/q.db"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_unparseable_level_falls_back() {
        let config = config_from(&[("QUIZ_LOG_LEVEL", "loud")]);
        assert_eq!(config.log_level, LevelFilter::Info);
    }
}
