use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use navflux::config::{Config, DispatchMode};
use navflux::logging::init_tracing;
use navflux::navigation::NavigationState;
use navflux::replay::{run_replay, ReplayReport, ReplayScript};

#[derive(Parser)]
#[command(name = "navflux", version, about = "Replay and inspect navigation state")]
struct Cli {
    /// Config file (default: ~/.config/navflux/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a navigation script and print the handler calls and final tree
    Replay {
        /// TOML or JSON script with a `steps` list
        script: PathBuf,
        /// Dispatch on a worker thread regardless of config
        #[arg(long = "async")]
        use_async: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a serialized navigation tree for structural problems
    Validate {
        /// JSON-encoded navigation state
        state: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.logging);

    match cli.command {
        Command::Replay {
            script,
            use_async,
            json,
        } => {
            if use_async {
                config.store.mode = DispatchMode::Async;
            }
            let script = ReplayScript::load(&script)?;
            let report = run_replay(&script, &config).context("Replay failed")?;
            if json {
                let out = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
                println!("{}", out);
            } else {
                print_report(&report);
            }
        }
        Command::Validate { state } => {
            let tree = read_state(&state)?;
            tree.validate()
                .with_context(|| format!("Invalid navigation state in '{}'", state.display()))?;
            println!(
                "ok: {} components, active screen {}",
                tree.len(),
                tree.active_screen_tag().map_or("<none>", |tag| tag.as_str())
            );
        }
    }
    Ok(())
}

fn read_state(path: &Path) -> Result<NavigationState> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse '{}'", path.display()))
}

fn print_report(report: &ReplayReport) {
    println!("Handler calls:");
    for (index, call) in report.calls.iter().enumerate() {
        println!("  {:>3}. {:?}", index + 1, call);
    }
    println!(
        "Active screen: {}",
        report.state.active_screen_tag().map_or("<none>", |tag| tag.as_str())
    );
    println!("Components:");
    for component in report.state.components() {
        let parent = component.parent_tag().map_or("-", |tag| tag.as_str());
        let visibility = if component.is_visible() { "visible" } else { "hidden" };
        println!("  {} (parent: {}, {})", component.tag(), parent, visibility);
    }
}
