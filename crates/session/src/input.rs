//! Operator input reaching the session.

use serde::{Deserialize, Serialize};
use vk_scroll::HoldDirection;

/// Discrete operator actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "direction", rename_all = "snake_case")]
pub enum ManualInput {
    /// A direction key went down; scroll freely until released.
    HoldStart(HoldDirection),
    HoldEnd,
    PreviousPhrase,
    NextPhrase,
}
