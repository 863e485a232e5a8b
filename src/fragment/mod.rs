use std::fmt;

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

/// Bytes left untouched by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FragmentError {
    #[error("malformed percent escape at offset {offset}")]
    MalformedEscape { offset: usize },
}

/// Percent-encode a pattern so that it can be stored after the `#`.
/// Patterns that are not UTF-8 keep their raw bytes as escapes.
pub fn encode<P: AsRef<[u8]> + ?Sized>(pattern: &P) -> String {
    percent_encode(pattern.as_ref(), COMPONENT).to_string()
}

/// Decode a fragment back into the raw pattern bytes.
///
/// Unlike `percent_encoding::percent_decode`, a stray `%` is rejected
/// instead of being copied through. Bytes that are not UTF-8 are kept, so
/// a fragment written from a byte pattern reloads to the same pattern.
pub fn decode(fragment: &str) -> Result<Vec<u8>, FragmentError> {
    let bytes = fragment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            decoded.push(bytes[i]);
            i += 1;
            continue;
        }

        let hi = bytes.get(i + 1).and_then(|&b| hex_value(b));
        let lo = bytes.get(i + 2).and_then(|&b| hex_value(b));

        match (hi, lo) {
            (Some(hi), Some(lo)) => decoded.push((hi << 4) | lo),
            _ => return Err(FragmentError::MalformedEscape { offset: i }),
        }

        i += 3;
    }

    Ok(decoded)
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// The address bar: an optional base URL and the raw (still encoded)
/// fragment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    base:     Option<Url>,
    fragment: String,
}

impl Location {
    /// A location with no base and no fragment.
    pub fn blank() -> Location {
        Location {
            base:     None,
            fragment: String::new(),
        }
    }

    /// Accepts either a bare `#fragment` or a full URL.
    pub fn parse(address: &str) -> Result<Location, url::ParseError> {
        if address.is_empty() {
            return Ok(Location::blank());
        }

        if let Some(fragment) = address.strip_prefix('#') {
            return Ok(Location {
                base:     None,
                fragment: fragment.to_string(),
            });
        }

        let mut base = Url::parse(address)?;
        let fragment = base.fragment().unwrap_or("").to_string();
        base.set_fragment(None);

        Ok(Location {
            base: Some(base),
            fragment,
        })
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Overwrite the fragment. Nothing observes this write.
    pub fn set_fragment(&mut self, encoded: String) {
        self.fragment = encoded;
    }

    pub fn href(&self) -> String {
        match &self.base {
            None => format!("#{}", self.fragment),
            Some(base) => {
                let mut url = base.clone();
                url.set_fragment(Some(&self.fragment));
                url.into()
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.href())
    }
}
