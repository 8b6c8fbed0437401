//! Recognizer stand-in fed from the replay script.

use std::sync::{Arc, Mutex};

use vk_session::{HypothesisError, HypothesisSink, HypothesisSource};

/// Shared slot holding the sink of the current recognizer run.
///
/// The session owns the [`ScriptSource`]; the replay driver keeps a
/// [`ScriptFeed`] and pushes transcripts through whichever sink is live.
#[derive(Clone, Default)]
pub struct ScriptFeed {
    sink: Arc<Mutex<Option<HypothesisSink>>>,
}

impl ScriptFeed {
    /// Deliver a transcript. Returns false while the recognizer is stopped.
    pub fn say(&self, transcript: &str, is_final: bool) -> bool {
        let guard = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(sink) => sink.hypothesis(transcript, is_final),
            None => false,
        }
    }

    pub fn source(&self) -> ScriptSource {
        ScriptSource { feed: self.clone() }
    }

    fn set(&self, sink: Option<HypothesisSink>) {
        *self.sink.lock().unwrap_or_else(|e| e.into_inner()) = sink;
    }
}

pub struct ScriptSource {
    feed: ScriptFeed,
}

impl HypothesisSource for ScriptSource {
    fn name(&self) -> &'static str {
        "script"
    }

    fn start(&mut self, sink: HypothesisSink) -> Result<(), HypothesisError> {
        tracing::debug!(generation = sink.generation(), "script source listening");
        self.feed.set(Some(sink));
        Ok(())
    }

    fn stop(&mut self) {
        self.feed.set(None);
    }
}
