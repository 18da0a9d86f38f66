//! Reel Limiter CLI
//!
//! Developer tool for replaying host event traces through the limiter and
//! inspecting persisted state.

mod file_store;
mod replay;
mod trace;

use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};

use rl_core::display::format_countdown;
use rl_core::{BlockState, Clock, LimiterConfig, Millis, NavigationWatcher, SystemClock};

use file_store::FileStore;
use replay::replay;
use trace::parse_trace;

#[derive(Parser)]
#[command(name = "rl-cli")]
#[command(about = "Reel limiter trace replay and state tools")]
struct Cli {
    /// Limiter config (JSON); defaults apply to missing fields
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines event trace
    Replay {
        /// Trace file
        #[arg(short, long)]
        input: String,

        /// Durable-scope state file, created if missing
        #[arg(short, long)]
        state: Option<String>,

        /// Epoch milliseconds for trace offset 0 (default: now)
        #[arg(long)]
        base: Option<Millis>,

        /// Print every presenter call
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show whether a state file holds an active block
    Status {
        /// Durable-scope state file
        #[arg(short, long)]
        state: String,
    },

    /// Classify a URL
    Url {
        url: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Replay {
            input,
            state,
            base,
            verbose,
        } => cmd_replay(config, &input, state.as_deref(), base, verbose),
        Commands::Status { state } => cmd_status(&config, &state),
        Commands::Url { url } => cmd_url(&config, &url),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> Result<LimiterConfig, String> {
    let path = match path {
        Some(path) => path,
        None => return Ok(LimiterConfig::default()),
    };

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    LimiterConfig::from_json(&content).map_err(|e| format!("'{}': {}", path, e))
}

fn cmd_replay(
    config: LimiterConfig,
    input: &str,
    state: Option<&str>,
    base: Option<Millis>,
    verbose: bool,
) -> Result<(), String> {
    let content = fs::read_to_string(input)
        .map_err(|e| format!("Failed to read '{}': {}", input, e))?;
    let events = parse_trace(&content).map_err(|e| format!("'{}': {}", input, e))?;

    let store = match state {
        Some(path) => FileStore::open(Path::new(path))?,
        None => FileStore::ephemeral(),
    };

    let max = config.max_views_per_session;
    let base = base.unwrap_or_else(|| SystemClock.now());
    let out = replay(config, store, &events, base)?;
    out.store.save()?;

    if verbose {
        for line in &out.lines {
            println!("{}", line);
        }
        println!();
    }

    let stats = &out.stats;
    println!("Replayed {} events from '{}'", stats.events, input);
    println!("  Counted:     {}", stats.counted);
    println!("  Blocks:      {}", stats.blocks_engaged);
    println!("  Refused:     {}", stats.refused);
    println!("  Final count: {}/{}", stats.final_count, max);
    println!("  Blocked:     {}", if stats.blocked_at_end { "yes" } else { "no" });

    Ok(())
}

fn cmd_status(config: &LimiterConfig, state: &str) -> Result<(), String> {
    let store = FileStore::open(Path::new(state))?;
    let block = BlockState::new(config.storage_keys().block_until);

    let now = SystemClock.now();
    let until = block.current_until(&store, now);

    println!("State: {}", state);
    if now < until {
        println!("  Blocked:     yes");
        println!("  Until:       {}", until);
        println!("  Remaining:   {}", format_countdown(until - now));
    } else {
        println!("  Blocked:     no");
    }

    Ok(())
}

fn cmd_url(config: &LimiterConfig, url: &str) -> Result<(), String> {
    let watcher = NavigationWatcher::new(&config.content_segment);
    let in_scope = watcher.is_in_scope(url);

    println!("URL: {}", url);
    println!("  In scope:    {}", if in_scope { "yes" } else { "no" });
    if in_scope {
        let content_id = watcher.extract_content_id(url);
        if content_id.is_empty() {
            println!("  Content id:  (none)");
        } else {
            println!("  Content id:  {}", content_id);
        }
    }

    Ok(())
}
