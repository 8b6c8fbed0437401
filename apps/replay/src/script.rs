//! Timed replay scripts.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use vk_scroll::HoldDirection;
use vk_session::ManualInput;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

/// One action, fired `at_ms` after the replay starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Raise the run signal.
    Start,
    /// Lower the run signal.
    Stop,
    /// Deliver a transcript through the recognizer.
    Hypothesis {
        transcript: String,
        #[serde(default)]
        is_final: bool,
    },
    HoldStart { direction: HoldDirection },
    HoldEnd,
    Next,
    Previous,
}

impl Action {
    /// The operator input this action stands for, if it is one.
    pub fn manual_input(&self) -> Option<ManualInput> {
        match self {
            Action::HoldStart { direction } => Some(ManualInput::HoldStart(*direction)),
            Action::HoldEnd => Some(ManualInput::HoldEnd),
            Action::Next => Some(ManualInput::NextPhrase),
            Action::Previous => Some(ManualInput::PreviousPhrase),
            Action::Start | Action::Stop | Action::Hypothesis { .. } => None,
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("invalid script {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let script: Script = serde_json::from_str(content)?;

        if let Some(pair) = script.steps.windows(2).find(|w| w[1].at_ms < w[0].at_ms) {
            bail!(
                "steps out of order: {}ms comes after {}ms",
                pair[1].at_ms,
                pair[0].at_ms
            );
        }

        Ok(script)
    }

    /// Time of the last step.
    pub fn duration_ms(&self) -> u64 {
        self.steps.last().map(|s| s.at_ms).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_actions() {
        let script = Script::from_json(
            r#"{"steps": [
                {"at_ms": 0, "action": "start"},
                {"at_ms": 10, "action": "hypothesis", "transcript": "i am"},
                {"at_ms": 20, "action": "hypothesis", "transcript": "i am not", "is_final": true},
                {"at_ms": 30, "action": "hold_start", "direction": "forward"},
                {"at_ms": 40, "action": "hold_end"},
                {"at_ms": 50, "action": "next"},
                {"at_ms": 60, "action": "previous"},
                {"at_ms": 70, "action": "stop"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 8);
        assert_eq!(script.duration_ms(), 70);
        assert_eq!(
            script.steps[1].action,
            Action::Hypothesis {
                transcript: "i am".to_string(),
                is_final: false
            }
        );
        assert_eq!(
            script.steps[3].action.manual_input(),
            Some(ManualInput::HoldStart(HoldDirection::Forward))
        );
        assert_eq!(script.steps[0].action.manual_input(), None);
    }

    #[test]
    fn test_unordered_steps_rejected() {
        let err = Script::from_json(
            r#"{"steps": [{"at_ms": 50, "action": "start"}, {"at_ms": 10, "action": "stop"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("out of order"));
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(Script::from_json(r#"{"steps": [{"at_ms": 0, "action": "dance"}]}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, r#"{"steps": []}"#).unwrap();

        let script = Script::load(&path).unwrap();
        assert_eq!(script.duration_ms(), 0);
    }
}
