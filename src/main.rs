//! Pixel trail command line host.
//!
//! Usage:
//!   # Replay a recorded mouse-moves file and print a summary
//!   pixel-trail replay recording-0-mouse-moves.json --fps 60
//!
//!   # Same, also printing every render operation
//!   pixel-trail replay recording-0-mouse-moves.json --ops
//!
//!   # Drive a live trail from JSON host events on stdin
//!   echo '{"type":"pointerMove","x":40,"y":40}' | pixel-trail stream --document-ready

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pixel_trail::replay::{load_moves, replay};
use pixel_trail::runtime::{self, FrameSource, RuntimeConfig, DEFAULT_FRAME_PERIOD_MS};
use pixel_trail::{JsonLinesSurface, TrailSession};
use std::path::PathBuf;

/// Render a decaying pixel trail from pointer movement.
#[derive(Parser, Debug)]
#[command(name = "pixel-trail")]
#[command(about = "Render a decaying pixel trail from pointer movement")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded mouse-moves JSON file
    Replay {
        /// Path to the recording
        input: PathBuf,

        /// Output frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Print render operations as JSON lines before the report
        #[arg(long)]
        ops: bool,
    },
    /// Read host events as JSON lines from stdin and write render operations to stdout
    Stream {
        /// Frame period in milliseconds
        #[arg(long, default_value_t = DEFAULT_FRAME_PERIOD_MS)]
        frame_ms: u64,

        /// Take frames from `frame` events instead of a timer
        #[arg(long)]
        external_frames: bool,

        /// Start immediately instead of waiting for a `ready` event
        #[arg(long)]
        document_ready: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    pixel_trail::init_tracing();

    let args = Args::parse();
    tracing::info!("Starting pixel-trail v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Replay { input, fps, ops } => run_replay(input, fps, ops),
        Command::Stream {
            frame_ms,
            external_frames,
            document_ready,
        } => {
            let frame_source = if external_frames {
                FrameSource::External
            } else {
                FrameSource::Interval {
                    period_ms: frame_ms,
                }
            };
            run_stream(RuntimeConfig {
                document_ready,
                frame_source,
            })
            .await
        }
    }
}

fn run_replay(input: PathBuf, fps: f64, ops: bool) -> Result<()> {
    let moves = load_moves(&input)
        .with_context(|| format!("Failed to load recording {}", input.display()))?;

    let report = if ops {
        let mut session = TrailSession::new(JsonLinesSurface::new(std::io::stdout().lock()));
        replay(&mut session, &moves, fps)?
    } else {
        let mut session = TrailSession::new(JsonLinesSurface::new(std::io::sink()));
        replay(&mut session, &moves, fps)?
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_stream(config: RuntimeConfig) -> Result<()> {
    // Blocking stdin lives on its own thread so unload can end the process
    let rx = runtime::spawn_line_reader(std::io::BufReader::new(std::io::stdin()), 256);

    let session = TrailSession::new(JsonLinesSurface::new(std::io::stdout()));
    let (_, report) = runtime::run(session, config, rx).await;

    tracing::info!(
        "Stream finished (moves={}, frames={}, accepted={}, expired={})",
        report.pointer_moves,
        report.frames,
        report.stats.accepted,
        report.stats.expired
    );
    Ok(())
}
