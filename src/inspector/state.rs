use serde::Serialize;

use crate::gateway::{Descriptor, Text};

/// Which of the three renderings is on screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    /// No pattern: only the input control.
    Empty,
    /// The module rejected the pattern.
    Error,
    /// Every descriptor field is shown.
    Success,
}

/// `Empty` if and only if the pattern is empty, with one exception: when
/// the module reports itself unavailable there is no descriptor, and the
/// view falls back to the not-ready rendering, which is the `Empty` one.
pub fn display_state(pattern: &Text, descriptor: Option<&Descriptor>) -> DisplayState {
    match descriptor {
        _ if pattern.is_empty() => DisplayState::Empty,
        None => DisplayState::Empty,
        Some(info) if info.is_error() => DisplayState::Error,
        Some(_) => DisplayState::Success,
    }
}
