//! Runtime configuration loaded from `asteroids.toml`.
//!
//! Every key is optional; missing keys fall back to [`Config::default`]. The
//! file itself is optional too. Set `ASTEROIDS_CONFIG` to read a different
//! path. Gameplay tuning is not configurable; speeds and scores are fixed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, GameResult};

pub const DEFAULT_CONFIG_PATH: &str = "asteroids.toml";
pub const CONFIG_ENV_VAR: &str = "ASTEROIDS_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plain-text file holding the best score.
    pub high_score_path: PathBuf,
    /// Log output; the terminal UI owns stdout and stderr.
    pub log_file: PathBuf,
    /// Frame pacing target in milliseconds.
    pub tick_rate_ms: u64,
    /// Fixed RNG seed for reproducible asteroid fields.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            high_score_path: PathBuf::from("assets/highscore.txt"),
            log_file: PathBuf::from("asteroids.log"),
            tick_rate_ms: 16,
            seed: None,
        }
    }
}

impl Config {
    /// Config path from the environment, or the default next to the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> GameResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(GameError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(text)?;
        config.tick_rate_ms = config.tick_rate_ms.max(1);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let config = Config::parse("seed = 7\nhigh_score_path = \"hs.txt\"").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.high_score_path, PathBuf::from("hs.txt"));
        assert_eq!(config.tick_rate_ms, 16);
    }

    #[test]
    fn test_zero_tick_rate_is_raised() {
        assert_eq!(Config::parse("tick_rate_ms = 0").unwrap().tick_rate_ms, 1);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("asteroids.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asteroids.toml");
        fs::write(&path, "tick_rate_ms = \"fast\"").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(GameError::ConfigParse { .. })
        ));
    }
}
