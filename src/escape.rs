//! Text escaping.
//!
//! The writer never entity-escapes character data. Text that XML forbids
//! verbatim is wrapped in CDATA instead, so the payload survives untouched.
//! The tokenizer still decodes entities produced by other writers.

use memchr::{memchr, memchr2};
use std::borrow::Cow;

/// Returns true if `s` cannot be written as character data verbatim.
#[inline]
pub fn needs_cdata(s: &str) -> bool {
    memchr2(b'<', b'&', s.as_bytes()).is_some() || s.contains("]]>")
}

/// Appends `s` as one or more CDATA sections.
///
/// An embedded `]]>` terminator is split across two sections.
pub fn cdata_to(s: &str, out: &mut String) {
    out.push_str("<![CDATA[");
    let mut rest = s;
    while let Some(idx) = rest.find("]]>") {
        out.push_str(&rest[..idx + 2]);
        out.push_str("]]><![CDATA[");
        rest = &rest[idx + 2..];
    }
    out.push_str(rest);
    out.push_str("]]>");
}

/// Wraps `s` in CDATA when required, borrowing otherwise.
#[inline]
pub fn text(s: &str) -> Cow<'_, str> {
    if !needs_cdata(s) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 12);
    cdata_to(s, &mut out);
    Cow::Owned(out)
}

/// Unescapes XML entities in a string.
///
/// Returns a `Cow<str>` to avoid allocation when no unescaping is needed.
#[inline]
pub fn unescape(s: &str) -> Result<Cow<'_, str>, UnescapeError> {
    if memchr(b'&', s.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(s));
    }

    let mut result = String::with_capacity(s.len());
    unescape_to(s, &mut result)?;
    Ok(Cow::Owned(result))
}

/// Error type for unescape operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnescapeError {
    /// The invalid entity that caused the error.
    pub entity: String,
    /// Position in the input where the error occurred.
    pub position: usize,
}

impl std::fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid XML entity '{}' at position {}", self.entity, self.position)
    }
}

impl std::error::Error for UnescapeError {}

/// Unescapes XML entities and appends to the given string.
pub fn unescape_to(s: &str, out: &mut String) -> Result<(), UnescapeError> {
    let mut rest = s;
    let mut offset = 0;

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let len = match memchr(b';', after.as_bytes()) {
            Some(len) if len > 0 => len,
            _ => {
                return Err(UnescapeError {
                    entity: String::from("&"),
                    position: offset + amp,
                })
            }
        };

        let entity = &after[..len];
        match decode_entity(entity).or_else(|| decode_numeric_entity(entity)) {
            Some(c) => out.push(c),
            None => {
                return Err(UnescapeError {
                    entity: format!("&{};", entity),
                    position: offset + amp,
                })
            }
        }

        let consumed = amp + 1 + len + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }

    out.push_str(rest);
    Ok(())
}

/// Decodes a named XML entity.
#[inline]
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Decodes a numeric character reference (&#NNN; or &#xHHH;).
#[inline]
fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let (radix, digits) = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => (16, hex),
        None => (10, digits),
    };

    if digits.is_empty() {
        return None;
    }

    let code = u32::from_str_radix(digits, radix).ok()?;
    char::from_u32(code)
}
