//! The session state machine.

use std::time::Instant;

use tokio::sync::mpsc;
use uuid::Uuid;
use vk_alignment::{AlignmentEngine, HypothesisEvent, TokenState};
use vk_events::{now_ms, EventBusRef, MarqueeEvent};
use vk_phrases::{Firmware, PhraseQueue};
use vk_scroll::ScrollController;

use crate::config::{ConfigError, MarqueeConfig, SessionConfig};
use crate::input::ManualInput;
use crate::source::{HypothesisError, HypothesisSink, HypothesisSource, SourceEnvelope, SourceEvent};
use crate::surface::{MarqueeFrame, Surface};

/// Recognition state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognition {
    /// Source stopped (session idle, or between restarts).
    Idle,
    Listening,
    /// No usable recognizer for the rest of this run.
    Degraded,
}

/// Owns one marquee: phrases, alignment, scrolling and recognizer lifecycle.
///
/// All methods take the current time explicitly; nothing here sleeps or
/// spawns. [`crate::SessionRuntime`] supplies real time and serializes calls.
pub struct Session<S: Surface> {
    config: SessionConfig,
    queue: PhraseQueue,
    engine: AlignmentEngine,
    scroll: ScrollController,
    surface: S,
    source: Option<Box<dyn HypothesisSource>>,
    firmware: Option<Firmware>,
    bus: EventBusRef,

    events_tx: mpsc::UnboundedSender<SourceEnvelope>,
    events_rx: Option<mpsc::UnboundedReceiver<SourceEnvelope>>,

    run_id: Option<Uuid>,
    recognition: Recognition,
    /// Bumped on every source start and stop; older envelopes are stale.
    generation: u64,
    last_source_start: Option<Instant>,
    rapid_restarts: u32,
    pending_restart: Option<Instant>,
    pending_advance: Option<Instant>,
}

impl<S: Surface> Session<S> {
    /// Build a stopped session showing the first phrase.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is unusable.
    pub fn new(
        queue: PhraseQueue,
        config: MarqueeConfig,
        surface: S,
        bus: EventBusRef,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut session = Self {
            config: config.session,
            queue,
            engine: AlignmentEngine::default(),
            scroll: ScrollController::with_config(config.scroll),
            surface,
            source: None,
            firmware: None,
            bus,
            events_tx,
            events_rx: Some(events_rx),
            run_id: None,
            recognition: Recognition::Idle,
            generation: 0,
            last_source_start: None,
            rapid_restarts: 0,
            pending_restart: None,
            pending_advance: None,
        };
        session.load_current_phrase();
        Ok(session)
    }

    /// Attach the speech recognizer. Without one the session is display-only.
    pub fn with_source(mut self, source: Box<dyn HypothesisSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Use the firmware questions to classify settled utterances.
    pub fn with_firmware(mut self, firmware: Firmware) -> Self {
        self.firmware = Some(firmware);
        self
    }

    /// Receiver for source events. The runtime takes it once.
    pub fn take_source_events(&mut self) -> Option<mpsc::UnboundedReceiver<SourceEnvelope>> {
        self.events_rx.take()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.run_id.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.recognition == Recognition::Listening
    }

    /// True when the recognizer is unavailable and only the phrase is shown.
    pub fn is_degraded(&self) -> bool {
        self.recognition == Recognition::Degraded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn engine(&self) -> &AlignmentEngine {
        &self.engine
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn queue(&self) -> &PhraseQueue {
        &self.queue
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    pub fn has_pending_restart(&self) -> bool {
        self.pending_restart.is_some()
    }

    // --- Run/stop ---

    /// Run signal went high: start listening and ticking.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }

        let run_id = Uuid::new_v4();
        self.run_id = Some(run_id);
        self.rapid_restarts = 0;
        if self.recognition == Recognition::Degraded {
            self.recognition = Recognition::Idle;
        }

        tracing::info!(%run_id, phrase = self.queue.active_index(), "marquee session started");
        self.bus.publish(MarqueeEvent::SessionStarted {
            session_id: run_id,
            phrase_index: self.queue.active_index(),
            ts_ms: now_ms(),
        });

        self.start_source(now);

        self.check_completion(now);
        if self.engine.is_complete() && self.pending_advance.is_none() {
            self.pending_advance = Some(now + self.config.settle_delay());
        }
    }

    /// Run signal went low: stop the recognizer and the tick loop now.
    pub fn stop(&mut self) {
        let Some(run_id) = self.run_id.take() else {
            return;
        };

        self.stop_source();
        self.pending_restart = None;
        self.pending_advance = None;
        self.scroll.end_hold();

        tracing::info!(%run_id, "marquee session stopped");
        self.bus.publish(MarqueeEvent::SessionStopped {
            session_id: run_id,
            ts_ms: now_ms(),
        });
    }

    // --- Inputs ---

    /// Handle one event from the hypothesis source.
    pub fn on_source_event(&mut self, envelope: SourceEnvelope, now: Instant) {
        if envelope.generation != self.generation || !self.is_running() {
            tracing::trace!(
                generation = envelope.generation,
                current = self.generation,
                "dropping stale source event"
            );
            return;
        }

        match envelope.event {
            SourceEvent::Hypothesis(event) => self.on_hypothesis(&event, now),
            SourceEvent::Error(message) => {
                tracing::warn!(%message, "speech recognition error");
                self.bus.publish(MarqueeEvent::RecognitionError { message });
            }
            SourceEvent::Ended => {
                tracing::debug!("speech recognition ended");
                self.recognition = Recognition::Idle;
                self.schedule_restart(now);
            }
        }
    }

    pub fn on_manual(&mut self, input: ManualInput, now: Instant) {
        match input {
            ManualInput::HoldStart(direction) => {
                if self.is_running() {
                    self.scroll.begin_hold(direction);
                }
            }
            ManualInput::HoldEnd => self.scroll.end_hold(),
            ManualInput::NextPhrase => {
                self.queue.advance();
                self.load_current_phrase();
                self.check_completion(now);
            }
            ManualInput::PreviousPhrase => {
                self.queue.retreat();
                self.load_current_phrase();
                self.check_completion(now);
            }
        }
    }

    /// One presentation frame. Fires due timers, re-aims the scroll at the
    /// read head, steps it, and presents the result.
    pub fn on_tick(&mut self, now: Instant) -> Option<MarqueeFrame> {
        if !self.is_running() {
            return None;
        }

        if self.pending_restart.is_some_and(|at| now >= at) {
            self.pending_restart = None;
            self.start_source(now);
        }

        if self.pending_advance.is_some_and(|at| now >= at) {
            self.pending_advance = None;
            self.queue.advance();
            self.load_current_phrase();
            self.check_completion(now);
        }

        if let Some(index) = self.engine.anchor_index() {
            if let Some(center) = self.surface.token_center(index) {
                self.scroll.retarget(self.surface.viewport_width(), center);
            }
        }

        let offset = self.scroll.tick();
        let frame = MarqueeFrame {
            phrase_index: self.queue.active_index(),
            offset,
            states: self.token_states(),
        };
        self.surface.present(&frame);
        Some(frame)
    }

    // --- Internals ---

    fn on_hypothesis(&mut self, event: &HypothesisEvent, now: Instant) {
        if event.is_final {
            self.rapid_restarts = 0;
            self.log_final(&event.transcript);
        }

        let outcome = self.engine.on_hypothesis(event);
        if outcome.completed() {
            self.on_phrase_complete(now);
        }
    }

    fn log_final(&self, transcript: &str) {
        let text = transcript.trim();
        if text.is_empty() {
            return;
        }

        let class = self
            .firmware
            .as_ref()
            .map(|fw| fw.classify(text))
            .unwrap_or(vk_phrases::UNCLASSIFIED)
            .to_string();

        tracing::info!("SR: \"{}\"  [{}]", text, class);
        self.bus.publish(MarqueeEvent::RecognitionFinal {
            transcript: text.to_string(),
            class,
            ts_ms: now_ms(),
        });
    }

    fn check_completion(&mut self, now: Instant) {
        if self.is_running() && self.engine.take_completion() {
            self.on_phrase_complete(now);
        }
    }

    fn on_phrase_complete(&mut self, now: Instant) {
        let phrase_index = self.queue.active_index();
        tracing::info!(phrase = phrase_index, "phrase complete");

        self.bus.publish(MarqueeEvent::PhraseComplete {
            phrase_index,
            text: self.queue.current().to_string(),
            token_count: self.engine.len(),
            ts_ms: now_ms(),
        });

        if self.pending_advance.is_none() {
            self.pending_advance = Some(now + self.config.settle_delay());
        }
    }

    fn load_current_phrase(&mut self) {
        let phrase_index = self.queue.active_index();
        self.engine.load(self.queue.current());
        self.scroll.reset();
        self.pending_advance = None;
        self.surface.show_phrase(phrase_index, self.engine.tokens());

        tracing::debug!(phrase = phrase_index, tokens = self.engine.len(), "phrase on screen");
        self.bus.publish(MarqueeEvent::PhraseLoaded {
            phrase_index,
            text: self.queue.current().to_string(),
            token_count: self.engine.len(),
        });
    }

    fn token_states(&self) -> Vec<(usize, TokenState)> {
        let degraded = self.is_degraded();
        self.engine
            .tokens()
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let state = if degraded {
                    TokenState::Upcoming
                } else {
                    token.state
                };
                (i, state)
            })
            .collect()
    }

    fn start_source(&mut self, now: Instant) {
        self.generation += 1;
        self.last_source_start = Some(now);

        let Some(source) = self.source.as_mut() else {
            self.degrade("no speech recognizer attached".to_string());
            return;
        };

        let sink = HypothesisSink::new(self.generation, self.events_tx.clone());
        match source.start(sink) {
            Ok(()) => {
                tracing::info!(
                    source = source.name(),
                    generation = self.generation,
                    "speech recognition started"
                );
                self.recognition = Recognition::Listening;
            }
            Err(HypothesisError::Unavailable(reason)) => self.degrade(reason),
            Err(e) => {
                tracing::warn!("speech recognition start failed: {}", e);
                self.bus.publish(MarqueeEvent::RecognitionError {
                    message: e.to_string(),
                });
                self.recognition = Recognition::Idle;
                self.schedule_restart(now);
            }
        }
    }

    fn stop_source(&mut self) {
        if self.recognition == Recognition::Listening {
            if let Some(source) = self.source.as_mut() {
                source.stop();
                tracing::info!(source = source.name(), "speech recognition stopped");
            }
        }
        if self.recognition != Recognition::Degraded {
            self.recognition = Recognition::Idle;
        }
        self.generation += 1;
    }

    /// Restart after an unexpected end, no sooner than `restart_delay` from
    /// now and `min_restart_interval` from the previous start.
    fn schedule_restart(&mut self, now: Instant) {
        if !self.is_running() || self.pending_restart.is_some() {
            return;
        }

        let died_quickly = self
            .last_source_start
            .is_some_and(|started| now.duration_since(started) < self.config.min_restart_interval());

        if died_quickly {
            self.rapid_restarts += 1;
        } else {
            self.rapid_restarts = 0;
        }

        if self.rapid_restarts > self.config.max_rapid_restarts {
            tracing::error!(
                attempts = self.rapid_restarts,
                "speech recognition keeps failing, giving up for this run"
            );
            self.degrade("recognizer failed repeatedly".to_string());
            return;
        }

        let mut at = now + self.config.restart_delay();
        if let Some(started) = self.last_source_start {
            at = at.max(started + self.config.min_restart_interval());
        }

        tracing::debug!(
            delay_ms = at.duration_since(now).as_millis() as u64,
            rapid = self.rapid_restarts,
            "speech recognition restart scheduled"
        );
        self.pending_restart = Some(at);
    }

    fn degrade(&mut self, reason: String) {
        if self.recognition == Recognition::Degraded {
            return;
        }

        tracing::warn!(%reason, "speech recognition unavailable, display only");
        self.recognition = Recognition::Degraded;
        self.pending_restart = None;
        self.bus.publish(MarqueeEvent::RecognitionDegraded { reason });
    }
}
