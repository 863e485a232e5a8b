mod render;
mod state;

use std::io;

pub use render::DisplayFormat;
pub use state::{display_state, DisplayState};

use crate::fragment::{self, Location};
use crate::gateway::{Descriptor, Gateway, Text};

/// Holds the current pattern and the descriptor computed for it.
///
/// The descriptor is always the answer for the current pattern: every
/// change goes back to the gateway, and an empty pattern clears it.
#[derive(Debug)]
pub struct Inspector<'g> {
    gateway:    Gateway<'g>,
    pattern:    Text,
    descriptor: Option<Descriptor>,
    state:      DisplayState,
}

impl<'g> Inspector<'g> {
    /// Seed the view from a raw (encoded) navigation fragment.
    ///
    /// A fragment that does not decode is taken as an empty pattern.
    pub fn from_fragment(gateway: Gateway<'g>, fragment: &str) -> Inspector<'g> {
        let pattern = fragment::decode(fragment).unwrap_or_else(|err| {
            tracing::warn!(fragment, error = %err, "ignoring undecodable fragment");
            Vec::new()
        });

        let mut inspector = Inspector {
            gateway,
            pattern: Text::default(),
            descriptor: None,
            state: DisplayState::Empty,
        };
        inspector.pattern_changed(Text::from_raw(pattern));
        inspector
    }

    pub fn pattern_changed(&mut self, pattern: Text) {
        self.descriptor = if pattern.is_empty() {
            None
        } else {
            match self.gateway.describe(&pattern) {
                Ok(info) => Some(info),
                Err(err) => {
                    tracing::warn!(pattern = %pattern, error = %err, "query failed");
                    None
                }
            }
        };
        self.pattern = pattern;
        self.state = display_state(&self.pattern, self.descriptor.as_ref());

        tracing::debug!(pattern = %self.pattern, state = ?self.state, "pattern changed");
    }

    /// Handle a change of the input field, then echo the pattern into the
    /// location. Writing the fragment does not feed back into the view.
    pub fn on_edit(&mut self, value: Text, location: &mut Location) {
        let encoded = fragment::encode(value.as_bytes());
        self.pattern_changed(value);
        location.set_fragment(encoded);
    }

    pub fn pattern(&self) -> &Text {
        &self.pattern
    }

    pub fn descriptor(&self) -> Option<&Descriptor> {
        self.descriptor.as_ref()
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn render<W: io::Write>(&self, format: DisplayFormat, out: &mut W) -> io::Result<()> {
        render::render(self, format, out)
    }
}
