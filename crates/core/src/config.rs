use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

// ── Top-level config ──────────────────────────────────────────

/// Run configuration, typically parsed from TOML and overridden by CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Initial board source.
    #[serde(default)]
    pub board: Option<PathBuf>,
    #[serde(default)]
    pub search: SearchParams,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Parse config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load config from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Reject parameters the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.is_none() {
            return Err(ConfigError::Invalid("no board source given".into()));
        }
        self.search.validate()?;
        if self.scheduler.control_threads == 0 {
            return Err(ConfigError::Invalid(
                "control_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  board:     {}",
            self.board
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".into())
        );
        tracing::info!(
            "  search:    boardsize={}, split1={}, split2={}, dfsquota={}",
            self.search.board_size,
            self.search.split1,
            self.search.split2,
            self.search.dfs_quota
        );
        tracing::info!(
            "  scheduler: workers={}, control={}",
            self.scheduler.resolved_worker_threads(),
            self.scheduler.control_threads
        );
    }
}

// ── Search parameters ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Board width; a board is full at `board_size²` filled cells.
    #[serde(default = "default_board_size")]
    pub board_size: u32,
    /// Fan-out quota for the first split level.
    #[serde(default = "default_split")]
    pub split1: u64,
    /// Fan-out quota for the second split level.
    #[serde(default = "default_split")]
    pub split2: u64,
    /// Work quota for each depth-first step.
    #[serde(default = "default_dfs_quota")]
    pub dfs_quota: u64,
}

fn default_board_size() -> u32 { 9 }
fn default_split() -> u64 { 32 }
fn default_dfs_quota() -> u64 { 25_000 }

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            split1: default_split(),
            split2: default_split(),
            dfs_quota: default_dfs_quota(),
        }
    }
}

impl SearchParams {
    /// Filled-cell count of a complete board.
    pub fn total_cells(&self) -> u32 {
        self.board_size * self.board_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::Invalid("boardsize must be at least 1".into()));
        }
        for (name, value) in [
            ("split1", self.split1),
            ("split2", self.split2),
            ("dfsquota", self.dfs_quota),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }
        Ok(())
    }
}

// ── Scheduler ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of compute worker threads. 0 = available parallelism.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Number of threads running lightweight control tasks.
    #[serde(default = "default_control_threads")]
    pub control_threads: usize,
}

fn default_worker_threads() -> usize { 0 }
fn default_control_threads() -> usize { 1 }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            control_threads: default_control_threads(),
        }
    }
}

impl SchedulerConfig {
    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.search.board_size, 9);
        assert_eq!(config.search.split1, 32);
        assert_eq!(config.search.split2, 32);
        assert_eq!(config.search.dfs_quota, 25_000);
        assert_eq!(config.scheduler.worker_threads, 0);
        assert_eq!(config.scheduler.control_threads, 1);
        assert_eq!(config.search.total_cells(), 81);
    }

    #[test]
    fn parse_partial_toml() {
        let toml = r#"
board = "puzzles/hard.txt"

[search]
board_size = 4
dfs_quota = 1000
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.board, Some(PathBuf::from("puzzles/hard.txt")));
        assert_eq!(config.search.board_size, 4);
        assert_eq!(config.search.dfs_quota, 1000);
        assert_eq!(config.search.split1, 32); // default
        assert_eq!(config.scheduler, SchedulerConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn parse_scheduler_section() {
        let toml = r#"
board = "b.txt"

[scheduler]
worker_threads = 6
control_threads = 2
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.scheduler.resolved_worker_threads(), 6);
        assert_eq!(config.scheduler.control_threads, 2);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml("board = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_board_is_rejected() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_quota_is_rejected() {
        let mut config = Config {
            board: Some(PathBuf::from("b.txt")),
            ..Config::default()
        };
        config.search.split2 = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("split2"));
    }

    #[test]
    fn zero_control_threads_is_rejected() {
        let mut config = Config {
            board: Some(PathBuf::from("b.txt")),
            ..Config::default()
        };
        config.scheduler.control_threads = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolved_worker_threads() {
        let mut config = SchedulerConfig::default();
        // 0 means auto-detect
        assert!(config.resolved_worker_threads() > 0);

        config.worker_threads = 8;
        assert_eq!(config.resolved_worker_threads(), 8);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
