//! Tag naming policy.
//!
//! Pure functions shared by the serializer and the deserializer so both
//! directions agree on every tag: field identifiers become PascalCase tags,
//! optional lower camel casing, collection pluralization, and the reversible
//! key escaping used when dictionary keys become element names.

use crate::config::Config;
use std::borrow::Cow;

/// Tag written for an empty dictionary key.
const EMPTY_KEY: &str = "_x_";

/// Converts a Rust field identifier into a PascalCase tag.
///
/// `birth_day` becomes `BirthDay`, `name` becomes `Name`. Identifiers that
/// are already PascalCase are returned unchanged.
pub fn pascal_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for segment in ident.split('_').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() {
        ident.to_string()
    } else {
        out
    }
}

/// Lowers the first character of a tag.
pub fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            out.extend(first.to_lowercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Applies the configured casing to a tag.
#[inline]
pub fn tag_name<'a>(name: &'a str, config: &Config) -> Cow<'a, str> {
    if config.lower_camel_tags {
        Cow::Owned(lower_camel(name))
    } else {
        Cow::Borrowed(name)
    }
}

/// Pluralizes a collection tag.
#[inline]
pub fn pluralize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    out.push_str(name);
    out.push('s');
    out
}

#[inline]
fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

#[inline]
fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || c.is_ascii_digit()
        || c == '-'
        || c == '.'
        || (!c.is_ascii() && c.is_alphanumeric())
}

/// Returns true if `s` can be used as an element name as-is.
pub fn is_xml_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Parses an escape of the form `_xHHHH_` or `_xHHHHHHHH_` at the start of `s`.
///
/// Returns the decoded character and the escape length in bytes.
fn parse_escape(s: &str) -> Option<(char, usize)> {
    let rest = s.strip_prefix("_x")?;
    for digits in [4, 8] {
        let hex = match rest.get(..digits) {
            Some(hex) => hex,
            None => continue,
        };
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) || rest.as_bytes().get(digits) != Some(&b'_') {
            continue;
        }
        let code = u32::from_str_radix(hex, 16).ok()?;
        return char::from_u32(code).map(|c| (c, digits + 3));
    }
    None
}

fn push_escape(out: &mut String, c: char) {
    use std::fmt::Write;
    let code = c as u32;
    // Writing to a String cannot fail.
    let _ = if code <= 0xFFFF {
        write!(out, "_x{:04X}_", code)
    } else {
        write!(out, "_x{:08X}_", code)
    };
}

/// Escapes a dictionary key into a well-formed element name.
///
/// Keys that are already valid names pass through unchanged. Every other
/// character is written as `_xHHHH_`, and an underscore followed by `x` is
/// escaped itself.
pub fn encode_key(key: &str) -> Cow<'_, str> {
    if key.is_empty() {
        return Cow::Borrowed(EMPTY_KEY);
    }

    // A literal "_x" never appears in the output, so every "_x" read back
    // starts an escape.
    let needs_escape = |i: usize, c: char| {
        let legal = if i == 0 { is_name_start(c) } else { is_name_char(c) };
        !legal || (c == '_' && key[i + 1..].starts_with('x'))
    };

    if !key.char_indices().any(|(i, c)| needs_escape(i, c)) {
        return Cow::Borrowed(key);
    }

    let mut out = String::with_capacity(key.len() + 8);
    for (i, c) in key.char_indices() {
        if needs_escape(i, c) {
            push_escape(&mut out, c);
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Reverses [`encode_key`].
pub fn decode_key(tag: &str) -> Cow<'_, str> {
    if tag == EMPTY_KEY {
        return Cow::Borrowed("");
    }
    if !tag.contains("_x") {
        return Cow::Borrowed(tag);
    }

    let mut out = String::with_capacity(tag.len());
    let mut i = 0;
    while i < tag.len() {
        if let Some((c, len)) = parse_escape(&tag[i..]) {
            out.push(c);
            i += len;
            continue;
        }
        // Only reached on a char boundary: escapes are ASCII.
        let c = match tag[i..].chars().next() {
            Some(c) => c,
            None => break,
        };
        out.push(c);
        i += c.len_utf8();
    }
    Cow::Owned(out)
}
