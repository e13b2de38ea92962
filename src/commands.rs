//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use solgraph_indexer::load_solution;
use solgraph_server::{ServerState, SolgraphServer};
use solgraph_watcher::WatcherService;

use crate::config::Config;

pub async fn show(solution: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    let solution = load_solution(solution, &config.load_options()).await?;
    let report = solution.report();

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

/// Returns whether the solution resolved without problems.
pub async fn check(solution: &Path, config: &Config) -> anyhow::Result<bool> {
    let solution = load_solution(solution, &config.load_options()).await?;

    for problem in solution.problems() {
        println!("{}", problem);
    }
    if solution.has_problems() {
        println!("{}: {} problems", solution.name(), solution.problems().len());
        Ok(false)
    } else {
        println!("{}: no problems", solution.name());
        Ok(true)
    }
}

pub async fn serve(solution_path: PathBuf, config: Config) -> anyhow::Result<()> {
    let solution = load_solution(&solution_path, &config.load_options()).await?;
    tracing::info!(
        "Loaded {} projects in {} levels",
        solution.projects().len(),
        solution.level_count()
    );

    let server = SolgraphServer::new(solution.report(), config.server_config());
    let state = server.state();

    if config.watch.enabled {
        let watcher_state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = run_watcher(solution_path, config, watcher_state).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    server.start().await
}

/// Watch the solution and publish a fresh report after each change
async fn run_watcher(solution_path: PathBuf, config: Config, state: Arc<ServerState>) -> anyhow::Result<()> {
    tracing::info!("Starting file watcher for: {}", solution_path.display());

    let watcher = WatcherService::new(&solution_path, config.load_options(), state)?
        .with_debounce(config.debounce());
    watcher.start_watching().await?;
    watcher.process_events().await?;

    Ok(())
}
