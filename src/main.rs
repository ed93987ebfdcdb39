use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

mod cli;
mod plan;

use cli::Cli;
use cli::commands::Commands;
use dispatchr::Task;
use dispatchr::scheduler::split_lanes;
use plan::{PlanTask, SleepExecutor, load_plan};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dispatchr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("dispatchr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Replay the drain classification without executing anything: first-seen
/// targets form the immediate wave, repeats form the sorted, laned queue.
fn classify(tasks: Vec<PlanTask>) -> (Vec<PlanTask>, [Vec<PlanTask>; 4]) {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut immediate = Vec::new();
    let mut deferred = Vec::new();

    for task in tasks {
        if seen.insert(task.target_id()) {
            immediate.push(task);
        } else {
            deferred.push(task);
        }
    }

    deferred.sort_by_key(|task| task.target_id());
    (immediate, split_lanes(deferred))
}

async fn run_application(cli: &Cli) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Run { plan, max_threads } => {
            let tasks = load_plan(plan).context("Failed to load plan")?;
            info!(
                "Loaded {} tasks from {} (max_threads={})",
                tasks.len(),
                plan.display(),
                max_threads
            );

            if cli.is_verbose() {
                println!(
                    "{}",
                    format!("Dispatching {} tasks, max_threads={}", tasks.len(), max_threads).cyan()
                );
            }

            let source = futures::stream::iter(tasks);
            dispatchr::run(&SleepExecutor, source, *max_threads)
                .await
                .context("Dispatch run failed")?;

            println!("{}", "Run complete".green());
        }
        Commands::Lanes { plan } => {
            let tasks = load_plan(plan).context("Failed to load plan")?;
            let (immediate, lanes) = classify(tasks);

            let targets: Vec<String> = immediate.iter().map(|t| t.target_id().to_string()).collect();
            println!("immediate wave ({} tasks): [{}]", immediate.len(), targets.join(", "));

            for (i, lane) in lanes.iter().enumerate() {
                let targets: Vec<String> = lane.iter().map(|t| t.target_id().to_string()).collect();
                println!("lane {} ({} tasks): [{}]", i, lane.len(), targets.join(", "));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();
    run_application(&cli).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_task(target_id: u64) -> PlanTask {
        PlanTask {
            target_id,
            label: None,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_classify_splits_immediate_and_lanes() {
        let tasks: Vec<PlanTask> = [1u64, 1, 2, 1].into_iter().map(plan_task).collect();
        let (immediate, lanes) = classify(tasks);

        let targets: Vec<u64> = immediate.iter().map(|t| t.target_id()).collect();
        assert_eq!(targets, vec![1, 2]);

        assert_eq!(lanes[0].len(), 1);
        assert_eq!(lanes[1].len(), 1);
        assert!(lanes[2].is_empty());
        assert!(lanes[3].is_empty());
    }

    #[test]
    fn test_classify_all_distinct() {
        let tasks: Vec<PlanTask> = [3u64, 1, 2].into_iter().map(plan_task).collect();
        let (immediate, lanes) = classify(tasks);

        assert_eq!(immediate.len(), 3);
        assert!(lanes.iter().all(|lane| lane.is_empty()));
    }
}
