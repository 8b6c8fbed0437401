//! Speech-hypothesis source contract.

use thiserror::Error;
use tokio::sync::mpsc;
use vk_alignment::HypothesisEvent;

/// Errors raised when starting a hypothesis source.
#[derive(Debug, Error)]
pub enum HypothesisError {
    /// No recognizer on this host; the marquee can only display phrases.
    #[error("speech recognition unavailable: {0}")]
    Unavailable(String),

    /// The recognizer exists but refused to start this time.
    #[error("failed to start speech recognition: {0}")]
    StartFailed(String),
}

/// What a running source reports.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Hypothesis(HypothesisEvent),
    /// Recoverable recognizer error; the stream may continue.
    Error(String),
    /// The stream ended on its own.
    Ended,
}

/// A source event stamped with the start generation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEnvelope {
    pub generation: u64,
    pub event: SourceEvent,
}

/// Handle a started source uses to report back to the session.
///
/// Every event is stamped with the generation of the `start` call that
/// created the sink, so events from a stopped run are recognised as stale.
#[derive(Debug, Clone)]
pub struct HypothesisSink {
    generation: u64,
    tx: mpsc::UnboundedSender<SourceEnvelope>,
}

impl HypothesisSink {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<SourceEnvelope>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false once the session is gone.
    pub fn hypothesis(&self, transcript: impl Into<String>, is_final: bool) -> bool {
        self.send(SourceEvent::Hypothesis(HypothesisEvent::new(
            transcript, is_final,
        )))
    }

    pub fn error(&self, message: impl Into<String>) -> bool {
        self.send(SourceEvent::Error(message.into()))
    }

    pub fn ended(&self) -> bool {
        self.send(SourceEvent::Ended)
    }

    fn send(&self, event: SourceEvent) -> bool {
        self.tx
            .send(SourceEnvelope {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// A speech recognizer producing partial and final transcripts.
///
/// `start` hands the source a fresh sink; the source keeps it until `stop`.
/// Implementations may deliver from any thread.
pub trait HypothesisSource: Send {
    fn name(&self) -> &'static str;

    fn start(&mut self, sink: HypothesisSink) -> Result<(), HypothesisError>;

    /// Stop delivering events. Must not block.
    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_stamps_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = HypothesisSink::new(7, tx);

        assert!(sink.hypothesis("i am", false));
        assert!(sink.ended());

        let first = rx.try_recv().unwrap();
        assert_eq!(first.generation, 7);
        assert_eq!(
            first.event,
            SourceEvent::Hypothesis(HypothesisEvent::partial("i am"))
        );
        assert_eq!(rx.try_recv().unwrap().event, SourceEvent::Ended);
    }

    #[test]
    fn test_sink_reports_closed_session() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = HypothesisSink::new(1, tx);
        drop(rx);

        assert!(!sink.error("gone"));
    }
}
