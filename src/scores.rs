use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GameError, GameResult};

/// Where the session keeps its best score.
pub trait ScoreStore {
    /// Best score seen so far.
    fn best(&self) -> u32;

    /// Record a final score. Returns `Ok(true)` when it beat the previous best
    /// and was persisted.
    fn submit(&mut self, score: u32) -> GameResult<bool>;
}

/// High score kept as a single decimal integer in a plain text file.
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
    best: u32,
}

impl HighScoreFile {
    /// Read the file at `path`. A missing or unparsable file is an error;
    /// there is no fallback to zero.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref().to_path_buf();
        let best = Self::read_file(&path)?;
        log::info!("loaded high score {} from {}", best, path.display());
        Ok(Self { path, best })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> GameResult<u32> {
        let data = fs::read_to_string(path).map_err(|source| GameError::HighScoreRead {
            path: path.to_path_buf(),
            source,
        })?;
        data.trim().parse().map_err(|_| GameError::HighScoreParse {
            path: path.to_path_buf(),
            contents: data.clone(),
        })
    }

    // Overwrites in place, never appends.
    fn write_file(&self, score: u32) -> GameResult<()> {
        fs::write(&self.path, score.to_string()).map_err(|source| GameError::HighScoreWrite {
            path: self.path.clone(),
            source,
        })
    }

    /// Check if a score would beat the stored one (without writing it)
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }
}

impl ScoreStore for HighScoreFile {
    fn best(&self) -> u32 {
        self.best
    }

    fn submit(&mut self, score: u32) -> GameResult<bool> {
        if !self.qualifies(score) {
            return Ok(false);
        }
        // Keep the new best in memory even if the write fails.
        self.best = score;
        self.write_file(score)?;
        log::info!("new high score {} saved to {}", score, self.path.display());
        Ok(true)
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryScores {
    pub best: u32,
    pub writes: usize,
}

#[cfg(test)]
impl ScoreStore for MemoryScores {
    fn best(&self) -> u32 {
        self.best
    }

    fn submit(&mut self, score: u32) -> GameResult<bool> {
        if score > self.best {
            self.best = score;
            self.writes += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_file(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.txt");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_loads_plain_integer() {
        let (_dir, path) = score_file("100");
        let scores = HighScoreFile::load(&path).unwrap();
        assert_eq!(scores.best(), 100);
    }

    #[test]
    fn test_tolerates_trailing_newline() {
        let (_dir, path) = score_file("250\n");
        assert_eq!(HighScoreFile::load(&path).unwrap().best(), 250);
    }

    #[test]
    fn test_corrupt_file_is_fatal() {
        let (_dir, path) = score_file("lots");
        let err = HighScoreFile::load(&path).unwrap_err();
        assert!(matches!(err, GameError::HighScoreParse { .. }));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = HighScoreFile::load(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, GameError::HighScoreRead { .. }));
    }

    #[test]
    fn test_higher_score_overwrites_file() {
        let (_dir, path) = score_file("100");
        let mut scores = HighScoreFile::load(&path).unwrap();
        assert!(scores.submit(150).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "150");
        assert_eq!(scores.best(), 150);
    }

    #[test]
    fn test_failed_write_keeps_new_best_in_memory() {
        let (_dir, path) = score_file("100");
        let mut store = HighScoreFile::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        let err = store.submit(150).unwrap_err();
        assert!(matches!(err, GameError::HighScoreWrite { .. }));
        assert_eq!(store.best(), 150);
    }

    #[test]
    fn test_lower_or_equal_score_leaves_file_alone() {
        let (_dir, path) = score_file("100");
        let mut scores = HighScoreFile::load(&path).unwrap();
        assert!(!scores.submit(50).unwrap());
        assert!(!scores.submit(100).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "100");
    }
}
