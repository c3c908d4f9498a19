use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use msagent_bridge::channel::{Command, PipeChannel, Transcript};
use msagent_bridge::config::{self, Config};
use msagent_bridge::keyboard::KeyStates;
use msagent_bridge::paths;
use msagent_bridge::replay::{self, ReplaySummary};
use msagent_bridge::script::{Script, TickOutcome};

#[derive(Parser)]
#[command(name = "msagent-bridge")]
#[command(about = "Relay game events to the MSAgent-AI companion", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the per-user application data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the companion is listening
    Ping,
    /// Ask the companion for its version
    Version,
    /// Have the companion say something verbatim
    Speak { text: String },
    /// Send the companion a prompt to react to
    Chat { text: String },
    /// Play a named animation
    Animate { name: String },
    /// Hide the companion character
    Hide,
    /// Show the companion character
    Show,
    /// Run a recorded trace of game frames through the tick loop
    Replay {
        /// Path to the trace (TOML, one [[frame]] per tick)
        trace: PathBuf,

        /// Print commands instead of sending them
        #[arg(long)]
        dry_run: bool,

        /// Pace frames by their at_ms offsets instead of running flat out
        #[arg(long)]
        realtime: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // ── Configuration ─────────────────────────────────────────────────────────
    let config_path = match cli.config {
        Some(path) => path,
        None => paths::config_file_path()?,
    };
    let config = config::load_or_default(&config_path).unwrap_or_else(|e| {
        log::warn!("config: {e:#} (using defaults)");
        Config::default()
    });

    match cli.command {
        Commands::Ping => {
            let reply = request(&config, &Command::Ping)?;
            if reply != "PONG" {
                bail!("unexpected reply to PING: {reply:?}");
            }
            println!("Companion is listening");
        }
        Commands::Version => println!("{}", request(&config, &Command::Version)?),
        Commands::Speak { text } => println!("{}", acknowledged(&config, &Command::Speak(&text))?),
        Commands::Chat { text } => println!("{}", acknowledged(&config, &Command::Chat(&text))?),
        Commands::Animate { name } => {
            println!("{}", acknowledged(&config, &Command::Animation(&name))?)
        }
        Commands::Hide => println!("{}", acknowledged(&config, &Command::Hide)?),
        Commands::Show => println!("{}", acknowledged(&config, &Command::Show)?),
        Commands::Replay {
            trace,
            dry_run,
            realtime,
        } => {
            let trace = replay::load(&trace)?;
            let summary = if dry_run {
                replay_dry(&config, &trace, realtime)
            } else {
                replay_live(&config, &trace, realtime)?
            };
            println!(
                "Replayed {} frames ({} with menu open), {} prompts",
                summary.frames, summary.menu_frames, summary.prompts
            );
        }
    }
    Ok(())
}

/// One request/reply exchange; unlike the tick loop, failures are reported.
fn request(config: &Config, command: &Command<'_>) -> Result<String> {
    let channel = PipeChannel::new(&config.channel)?;
    log::debug!("sending {command} to {}", channel.endpoint());
    Ok(channel.request(command)?)
}

/// Like [`request`], but the companion must acknowledge with `OK:`.
fn acknowledged(config: &Config, command: &Command<'_>) -> Result<String> {
    let reply = request(config, command)?;
    check_ack(command, &reply)?;
    Ok(reply)
}

fn check_ack(command: &Command<'_>, reply: &str) -> Result<()> {
    if !reply.starts_with("OK:") {
        bail!("companion rejected {command}: {reply:?}");
    }
    Ok(())
}

fn replay_live(config: &Config, trace: &replay::Trace, realtime: bool) -> Result<ReplaySummary> {
    let channel = PipeChannel::new(&config.channel)?;
    let started = Instant::now();
    let mut script = Script::new(config, Arc::new(KeyStates::new()), channel, started);
    script.start();
    Ok(replay::replay(trace, &mut script, started, realtime, |_, _, _, _| {}))
}

fn replay_dry(config: &Config, trace: &replay::Trace, realtime: bool) -> ReplaySummary {
    let started = Instant::now();
    let mut script = Script::new(config, Arc::new(KeyStates::new()), Transcript::new(), started);
    script.start();

    let mut last_menu: Vec<String> = Vec::new();
    replay::replay(trace, &mut script, started, realtime, |frame, outcome, script, overlay| {
        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        for line in script.notifier_mut().drain() {
            println!("{stamp} +{:>6}ms  {line}", frame.at_ms);
        }
        if outcome == TickOutcome::MenuOpen && overlay.lines != last_menu {
            for line in &overlay.lines {
                println!("{stamp} +{:>6}ms  | {line}", frame.at_ms);
            }
            last_menu.clone_from(&overlay.lines);
        }
    })
}
