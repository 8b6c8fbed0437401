//! Replays a scripted reading session against a firmware module, headless.
//!
//! Run with: cargo run -p vk-replay -- demos/nexus6.json demos/desert.json

mod script;
mod source;
mod surface;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use vk_events::TracingEventBus;
use vk_phrases::{Firmware, PhraseQueue};
use vk_session::{MarqueeConfig, Session, SessionRuntime};

use crate::script::{Action, Script};
use crate::source::ScriptFeed;
use crate::surface::LogSurface;

#[derive(Parser)]
#[command(name = "vk-replay", about = "Replay a scripted reading session through the speech marquee")]
struct Cli {
    /// Firmware module (question set) to load.
    firmware: PathBuf,

    /// Script of timed recognizer and operator steps.
    script: PathBuf,

    /// Marquee config; defaults to the platform config dir when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of one character in pixels.
    #[arg(long, default_value_t = 14.0)]
    char_width: f32,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    viewport: f32,

    /// Keep running this long after the last step.
    #[arg(long, default_value_t = 2000)]
    linger_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let firmware = Firmware::load(&cli.firmware)
        .with_context(|| format!("loading firmware {}", cli.firmware.display()))?;
    let config = load_config(cli.config.as_deref())?;
    let script = Script::load(&cli.script)?;

    tracing::info!(
        profile = %firmware.profile,
        manufacturer = %firmware.manufacturer,
        steps = script.steps.len(),
        "starting replay"
    );

    let queue = PhraseQueue::from_firmware(&firmware)?;
    let feed = ScriptFeed::default();
    let session = Session::new(
        queue,
        config,
        LogSurface::new(cli.char_width, cli.viewport),
        Arc::new(TracingEventBus),
    )
    .context("invalid marquee config")?
    .with_source(Box::new(feed.source()))
    .with_firmware(firmware);

    let (run_tx, run_rx) = watch::channel(false);
    let (manual_tx, manual_rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();

    let runtime = tokio::spawn(SessionRuntime::new(session).run(run_rx, manual_rx, cancel.clone()));

    tokio::select! {
        result = play(&script, &feed, &run_tx, &manual_tx) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
        }
    }

    tokio::time::sleep(Duration::from_millis(cli.linger_ms)).await;
    cancel.cancel();

    let session = runtime.await.context("marquee runtime panicked")?;
    tracing::info!(
        phrase = session.queue().active_index(),
        recognized = session.engine().recognized_count(),
        tokens = session.engine().len(),
        frames = session.surface().frames_presented(),
        "replay finished"
    );

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<MarqueeConfig> {
    if let Some(path) = explicit {
        return MarqueeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }

    match MarqueeConfig::default_path() {
        Some(path) if path.exists() => MarqueeConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display())),
        _ => {
            tracing::debug!("no config file, using defaults");
            Ok(MarqueeConfig::default())
        }
    }
}

/// Fire each step at its offset from the start of the replay.
async fn play(
    script: &Script,
    feed: &ScriptFeed,
    run_tx: &watch::Sender<bool>,
    manual_tx: &mpsc::Sender<vk_session::ManualInput>,
) -> Result<()> {
    let started = tokio::time::Instant::now();

    for step in &script.steps {
        tokio::time::sleep_until(started + Duration::from_millis(step.at_ms)).await;
        tracing::debug!(at_ms = step.at_ms, action = ?step.action, "step");

        if let Some(input) = step.action.manual_input() {
            manual_tx
                .send(input)
                .await
                .context("marquee runtime is gone")?;
            continue;
        }

        match &step.action {
            Action::Start => {
                run_tx.send(true).context("marquee runtime is gone")?;
            }
            Action::Stop => {
                run_tx.send(false).context("marquee runtime is gone")?;
            }
            Action::Hypothesis {
                transcript,
                is_final,
            } => {
                if !feed.say(transcript, *is_final) {
                    tracing::warn!(at_ms = step.at_ms, "recognizer not listening, transcript dropped");
                }
            }
            _ => {}
        }
    }

    Ok(())
}
