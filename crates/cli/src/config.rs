use anyhow::{Context, Result};
use gridsearch_core::Config;
use tracing::debug;

use crate::cli::CliArgs;

/// Fully resolved run settings.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: Config,
    pub seed: Option<u64>,
    pub batch: bool,
}

/// Merge the TOML config (if any) with flag and env overrides, then validate.
/// Priority: flag/env > config file > defaults.
pub fn resolve(args: &CliArgs) -> Result<RunSettings> {
    let mut config = match &args.config {
        Some(path) => {
            debug!(?path, "Loading config");
            Config::from_file(path)
                .with_context(|| format!("failed to load config: {}", path.display()))?
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, args);
    config.validate().context("invalid run configuration")?;

    Ok(RunSettings {
        config,
        seed: args.seed,
        batch: args.batch,
    })
}

fn apply_overrides(config: &mut Config, args: &CliArgs) {
    if let Some(board) = &args.board {
        config.board = Some(board.clone());
    }
    if let Some(size) = args.boardsize {
        config.search.board_size = size;
    }
    if let Some(split1) = args.split1 {
        config.search.split1 = split1;
    }
    if let Some(split2) = args.split2 {
        config.search.split2 = split2;
    }
    if let Some(quota) = args.dfsquota {
        config.search.dfs_quota = quota;
    }
    if let Some(workers) = args.workers {
        config.scheduler.worker_threads = workers;
    }
    if let Some(control) = args.control_workers {
        config.scheduler.control_threads = control;
    }
}
