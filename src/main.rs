//! Carbon Rowing Agent CLI
//!
//! Runs a live feedback session against the rowing sensor stream and browses
//! previously stored sessions.

use carbon_rowing_agent::{
    config::Config,
    counter::SessionCounter,
    pipeline::{DisplayUpdate, PipelineError, SessionPipeline},
    publisher::SessionPublisher,
    store::{BlockingSessionStore, SessionStore},
    transport::{ReplaySource, SensorLink},
    VERSION,
};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Parser)]
#[command(name = "carbon-rowing")]
#[command(author = "CarbonRowing")]
#[command(version = VERSION)]
#[command(about = "Active-feedback rowing technique agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a live feedback session
    Start {
        /// Recorded session (JSONL) to replay instead of a live sensor
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Delay between replayed samples in milliseconds
        #[arg(long, default_value = "50")]
        interval_ms: u64,
    },

    /// Show how many sessions are stored
    Sessions,

    /// Show the stored record of one past session
    Show {
        /// Zero-based session id
        #[arg(long, short)]
        session: u32,
    },

    /// Show configuration
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { replay, interval_ms } => {
            cmd_start(replay, interval_ms);
        }
        Commands::Sessions => {
            cmd_sessions();
        }
        Commands::Show { session } => {
            cmd_show(session);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn open_store(config: &Config) -> Arc<dyn SessionStore> {
    match BlockingSessionStore::new(config.store_config()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Error: could not create store client: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_start(replay: Option<PathBuf>, interval_ms: u64) {
    println!("Carbon Rowing Agent v{VERSION}");
    println!();

    let config = Config::load().unwrap_or_default();
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    // Claim the session id before any sample is processed.
    let counter = SessionCounter::new(&config.data_path);
    let session_id = match counter.next_session_id() {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error: could not assign a session id: {e}");
            std::process::exit(1);
        }
    };
    println!("Session number: {session_id}");

    let store = open_store(&config);
    let mut publisher = SessionPublisher::new(store);
    let mut pipeline = SessionPipeline::new(session_id, publisher.handle());

    let link = SensorLink::new();

    // Feed from a recording when one is given; otherwise the link waits for
    // a live transport to push notifications.
    let replay_handle = match replay {
        Some(path) => match ReplaySource::from_path(&path) {
            Ok(source) => {
                println!("Replaying {} samples from {:?}", source.records().len(), path);
                Some(source.spawn(link.sender(), Duration::from_millis(interval_ms)))
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("Waiting for sensor notifications...");
            None
        }
    };

    println!("Press Ctrl+C to stop");
    println!();

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let receiver = link.receiver().clone();
    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(notification) => match pipeline.handle_notification(&notification) {
                Ok(update) => print_display_update(&update),
                Err(PipelineError::Decode(e)) => {
                    warn!(channel = %notification.channel, error = %e, "Sample dropped");
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    break;
                }
            },
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // A finished replay with a drained queue ends the session.
                if let Some(ref handle) = replay_handle {
                    if handle.is_finished() && receiver.is_empty() {
                        break;
                    }
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Transport disconnected unexpectedly");
                break;
            }
        }
    }

    // Tear down the link so an interrupted replay stops delivering instead
    // of filling a queue nobody drains.
    drop(receiver);
    drop(link);

    if let Some(handle) = replay_handle {
        if let Ok(Err(e)) = handle.join() {
            eprintln!("Warning: replay ended early: {e}");
        }
    }

    // Last write is the final record; drain the publish queue before exit.
    println!();
    println!("Ending session...");
    publisher.shutdown();

    let snapshot = pipeline.snapshot();
    println!("Session {session_id} summary:");
    println!("  Pressure samples: {}", snapshot.pressure_values.len());
    println!(
        "  Acceleration samples: {}",
        snapshot.acceleration_values.len()
    );
    println!("  Gyroscope samples: {}", snapshot.gyroscope_values.len());
    println!(
        "  Erroneous pressure duration: {}",
        snapshot.erroneous_pressure_duration
    );
    println!(
        "  Erroneous timing duration: {}",
        snapshot.erroneous_timing_duration
    );
}

fn print_display_update(update: &DisplayUpdate) {
    let field = |value: Option<f32>, ok: bool| match value {
        Some(v) => format!("{v:.2} [{}]", if ok { "ok" } else { "ERROR" }),
        None => "--".to_string(),
    };

    println!(
        "[{}] pressure: {} | acceleration: {} | gyroscope: {}",
        Local::now().format("%H:%M:%S"),
        field(update.pressure, update.pressure_ok),
        field(update.acceleration, update.timing_ok),
        field(update.gyroscope, update.timing_ok),
    );
}

fn cmd_sessions() {
    let config = Config::load().unwrap_or_default();
    let store = open_store(&config);

    match store.session_count() {
        Ok(count) => {
            println!("Stored sessions: {count}");
            if count > 0 {
                println!("Session ids: 0..={}", count - 1);
            }
        }
        Err(e) => {
            eprintln!("Error: could not count sessions: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_show(session: u32) {
    let config = Config::load().unwrap_or_default();
    let store = open_store(&config);

    match store.fetch_session(session) {
        Ok(Some(doc)) => {
            println!("Session {session}");
            println!("=============");
            println!();
            println!("  Pressure samples: {}", doc.pressure_values.len());
            println!("  Acceleration samples: {}", doc.acceleration_values.len());
            println!("  Gyroscope samples: {}", doc.gyroscope_values.len());
            println!(
                "  Duration of erroneous pressure application: {}",
                doc.erroneous_pressure_duration
            );
            println!(
                "  Duration of erroneous timing: {}",
                doc.erroneous_timing_duration
            );
        }
        Ok(None) => {
            println!("No stored record for session {session}");
        }
        Err(e) => {
            eprintln!("Error: could not fetch session {session}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
