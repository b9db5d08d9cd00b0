//! Startup and persistence errors.
//!
//! Everything here is fatal at startup (missing or corrupt high-score file,
//! malformed config). The one runtime case, a failed high-score write, is
//! logged by the session and play continues.

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GameError {
    /// The high-score file could not be read.
    HighScoreRead { path: PathBuf, source: io::Error },

    /// The high-score file did not hold a single decimal integer.
    HighScoreParse { path: PathBuf, contents: String },

    /// Overwriting the high-score file failed.
    HighScoreWrite { path: PathBuf, source: io::Error },

    /// The config file exists but could not be read.
    ConfigRead { path: PathBuf, source: io::Error },

    /// The config file is not valid TOML for [`crate::config::Config`].
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::HighScoreRead { path, source } => {
                write!(f, "cannot read high score file {}: {}", path.display(), source)
            }
            GameError::HighScoreParse { path, contents } => write!(
                f,
                "high score file {} does not hold an integer (found {:?})",
                path.display(),
                contents
            ),
            GameError::HighScoreWrite { path, source } => {
                write!(f, "cannot write high score file {}: {}", path.display(), source)
            }
            GameError::ConfigRead { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            GameError::ConfigParse { path, source } => {
                write!(f, "invalid config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::HighScoreRead { source, .. }
            | GameError::HighScoreWrite { source, .. }
            | GameError::ConfigRead { source, .. } => Some(source),
            GameError::ConfigParse { source, .. } => Some(source),
            GameError::HighScoreParse { .. } => None,
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;
