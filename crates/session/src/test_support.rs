//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};

use crate::source::{HypothesisError, HypothesisSink, HypothesisSource};

/// Source that records start/stop calls and exposes the latest sink.
#[derive(Clone, Default)]
pub(crate) struct ScriptedSource {
    sink: Arc<Mutex<Option<HypothesisSink>>>,
    starts: Arc<Mutex<u32>>,
    stops: Arc<Mutex<u32>>,
    fail_with: Arc<Mutex<Option<fn() -> HypothesisError>>>,
}

impl ScriptedSource {
    pub(crate) fn sink(&self) -> HypothesisSink {
        self.sink.lock().unwrap().clone().expect("source not started")
    }

    pub(crate) fn starts(&self) -> u32 {
        *self.starts.lock().unwrap()
    }

    pub(crate) fn stops(&self) -> u32 {
        *self.stops.lock().unwrap()
    }

    pub(crate) fn fail_starts(&self, make_err: Option<fn() -> HypothesisError>) {
        *self.fail_with.lock().unwrap() = make_err;
    }
}

impl HypothesisSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn start(&mut self, sink: HypothesisSink) -> Result<(), HypothesisError> {
        *self.starts.lock().unwrap() += 1;
        if let Some(make_err) = *self.fail_with.lock().unwrap() {
            return Err(make_err());
        }
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        *self.stops.lock().unwrap() += 1;
    }
}
