//! Async driver for a [`Session`].

use std::time::Instant;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::controller::Session;
use crate::input::ManualInput;
use crate::surface::Surface;

/// Runs a session on a single task.
///
/// Cancellation wins over everything, then run/stop transitions, then
/// operator input, then recognizer events; presentation ticks come last and
/// only while the session is running.
pub struct SessionRuntime<S: Surface> {
    session: Session<S>,
}

impl<S: Surface> SessionRuntime<S> {
    pub fn new(session: Session<S>) -> Self {
        Self { session }
    }

    /// Drive the session until `cancel` fires or the run signal's sender is
    /// dropped. The session is stopped and handed back on exit.
    pub async fn run(
        self,
        mut run_signal: watch::Receiver<bool>,
        mut manual: mpsc::Receiver<ManualInput>,
        cancel: CancellationToken,
    ) -> Session<S> {
        let mut session = self.session;

        let Some(mut source_events) = session.take_source_events() else {
            tracing::error!("session source events already taken, not running");
            return session;
        };

        let mut ticker = tokio::time::interval(session.config().tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if *run_signal.borrow_and_update() {
            session.start(now());
        }

        let mut manual_open = true;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!("marquee runtime cancelled");
                    break;
                }

                changed = run_signal.changed() => {
                    if changed.is_err() {
                        tracing::info!("run signal closed, stopping marquee runtime");
                        break;
                    }
                    if *run_signal.borrow_and_update() {
                        session.start(now());
                        ticker.reset();
                    } else {
                        session.stop();
                    }
                }

                input = manual.recv(), if manual_open => match input {
                    Some(input) => session.on_manual(input, now()),
                    None => {
                        tracing::debug!("manual input channel closed");
                        manual_open = false;
                    }
                },

                Some(envelope) = source_events.recv() => {
                    session.on_source_event(envelope, now());
                }

                _ = ticker.tick(), if session.is_running() => {
                    session.on_tick(now());
                }
            }
        }

        session.stop();
        session
    }
}

/// Current time on the tokio clock, so paused-time tests stay deterministic.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
