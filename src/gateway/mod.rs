pub mod engine;

use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};
use thiserror::Error;

pub use engine::{Engine, EngineOptions};

/// The loaded analysis module. Assigned once, never reset.
static MODULE: OnceLock<Engine> = OnceLock::new();

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GatewayError {
    #[error("analysis module unavailable: {reason}")]
    Unavailable { reason: String },
}

/// A textual value as delivered by the analysis module: either decoded
/// text or a raw byte buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Text {
    Str(String),
    Bytes(Vec<u8>),
}

impl Text {
    /// Keep valid UTF-8 as a string, anything else as raw bytes.
    pub fn from_raw(bytes: Vec<u8>) -> Text {
        match String::from_utf8(bytes) {
            Ok(s) => Text::Str(s),
            Err(e) => Text::Bytes(e.into_bytes()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Text::Str(s) => s.is_empty(),
            Text::Bytes(b) => b.is_empty(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Text::Str(s) => s.as_bytes(),
            Text::Bytes(b) => b,
        }
    }

    /// Both representations render the same way.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        match self {
            Text::Str(s) => Cow::Borrowed(s.as_str()),
            Text::Bytes(b) => String::from_utf8_lossy(b),
        }
    }
}

impl Default for Text {
    fn default() -> Text {
        Text::Str(String::new())
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Text {
        Text::Str(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Text {
        Text::Str(s)
    }
}

impl From<Vec<u8>> for Text {
    fn from(b: Vec<u8>) -> Text {
        Text::Bytes(b)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_str_lossy())
    }
}

/// Result of one analysis query.
///
/// A pattern that fails to compile still yields a descriptor, with `error`
/// set and every other field left at its default.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Descriptor {
    pub pattern: Text,
    pub error: Text,
    pub prefix: Text,
    pub prefix_foldcase: bool,
    pub accel_prefix: Text,
    pub accel_prefix_foldcase: bool,
    pub num_captures: usize,
    pub is_one_pass: bool,
    pub can_bit_state: bool,
    pub bytecode: Text,
    pub bytemap: Text,
}

impl Descriptor {
    pub fn failed(pattern: Text, error: String) -> Descriptor {
        Descriptor {
            pattern,
            error: Text::Str(error),
            ..Descriptor::default()
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// The query interface of an analysis module.
pub trait Analyze {
    fn describe(&self, pattern: &Text) -> Result<Descriptor, GatewayError>;
}

/// Pass-through to the analysis module. The result is returned verbatim.
#[derive(Clone, Copy)]
pub struct Gateway<'m> {
    module: &'m dyn Analyze,
}

impl<'m> Gateway<'m> {
    pub fn new(module: &'m dyn Analyze) -> Gateway<'m> {
        Gateway { module }
    }

    /// Callers must not query with an empty pattern.
    pub fn describe(&self, pattern: &Text) -> Result<Descriptor, GatewayError> {
        debug_assert!(!pattern.is_empty());
        tracing::debug!(pattern = %pattern, "describe");
        self.module.describe(pattern)
    }
}

impl fmt::Debug for Gateway<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Gateway").finish()
    }
}

/// Bring the analysis module up, or hand back the one already loaded.
///
/// Options only apply to the first successful load.
pub fn load(options: EngineOptions) -> Result<Gateway<'static>, GatewayError> {
    if let Some(module) = MODULE.get() {
        return Ok(Gateway::new(module));
    }

    let engine = Engine::init(options)?;
    tracing::info!(max_mem = options.max_mem, "analysis module ready");

    Ok(Gateway::new(MODULE.get_or_init(|| engine)))
}

#[cfg(test)]
mod tests;
