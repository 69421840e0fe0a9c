//! Canonical text encoding for [`KeyValueStore`].
//!
//! ```text
//! [Section]
//! Key=Value
//! Multi=
//! |first line
//! |second line
//!
//! [Empty]
//! ```
//!
//! Blank lines and `;` comments are ignored on input. A value that spans
//! several lines, or whose edges are whitespace, is written as `Key=` followed
//! by `|`-prefixed lines so it survives the trim applied to ordinary values.
//!
//! Key and section names are written with backslash escapes where they would
//! otherwise collide with the grammar: `\=`, `\[`, `\]`, `\;`, `\|` and `\\`
//! for punctuation, `\u{hex}` for line breaks and edge whitespace, and `\e` for
//! the empty name. On input a backslash takes the next character literally.
//!
//! A trailing `\r` is dropped from every line only when the whole document uses
//! CRLF line endings. Canonical text never does (a header line always ends in
//! `]`), so a carriage return inside a block value survives a round trip.

use tracing::debug;

use super::KeyValueStore;
use crate::errors::ParseError;

/// Prefix of a continuation line carrying one line of a block value.
const CONTINUATION: char = '|';
const COMMENT: char = ';';
const ESCAPE: char = '\\';
/// Encoded form of an empty key or section name.
const EMPTY_NAME: &str = "\\e";

/// Characters escaped anywhere in a key.
const KEY_RESERVED: &[char] = &[ESCAPE, '='];
/// Characters escaped when they start a key.
const KEY_LEADING: &[char] = &['[', COMMENT, CONTINUATION];
/// Characters escaped anywhere in a section name.
const SECTION_RESERVED: &[char] = &[ESCAPE, '[', ']'];

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

pub(super) fn serialize(store: &KeyValueStore) -> String {
    let mut out = String::new();
    for (i, section) in store.sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push('[');
        encode_name(&mut out, &section.name, SECTION_RESERVED, &[]);
        out.push_str("]\n");
        for (key, value) in section.entries() {
            write_entry(&mut out, key, value);
        }
    }
    out
}

fn write_entry(out: &mut String, key: &str, value: &str) {
    encode_name(out, key, KEY_RESERVED, KEY_LEADING);
    out.push('=');
    if needs_block(value) {
        out.push('\n');
        for line in value.split('\n') {
            out.push(CONTINUATION);
            out.push_str(line);
            out.push('\n');
        }
    } else {
        out.push_str(value);
        out.push('\n');
    }
}

fn needs_block(value: &str) -> bool {
    value.contains('\n') || value.trim() != value
}

fn encode_name(out: &mut String, name: &str, reserved: &[char], leading: &[char]) {
    if name.is_empty() {
        out.push_str(EMPTY_NAME);
        return;
    }
    let last = name.chars().count() - 1;
    for (i, c) in name.chars().enumerate() {
        let edge = i == 0 || i == last;
        if c == '\n' || c == '\r' || (edge && c.is_whitespace()) {
            out.push_str(&format!("{ESCAPE}u{{{:x}}}", u32::from(c)));
        } else if reserved.contains(&c) || (i == 0 && leading.contains(&c)) {
            out.push(ESCAPE);
            out.push(c);
        } else {
            out.push(c);
        }
    }
}

fn decode_name(raw: &str) -> String {
    if raw == EMPTY_NAME {
        return String::new();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find(ESCAPE) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match after.chars().next() {
            Some('u') => match decode_unicode(&after[1..]) {
                Some((c, len)) => {
                    out.push(c);
                    rest = &after[1 + len..];
                }
                None => {
                    out.push('u');
                    rest = &after[1..];
                }
            },
            Some(c) => {
                out.push(c);
                rest = &after[c.len_utf8()..];
            }
            // A lone trailing backslash is kept as written.
            None => {
                out.push(ESCAPE);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode `{hex}` at the start of `text`, returning the char and bytes used.
fn decode_unicode(text: &str) -> Option<(char, usize)> {
    let body = text.strip_prefix('{')?;
    let end = body.find('}')?;
    let code = u32::from_str_radix(&body[..end], 16).ok()?;
    Some((char::from_u32(code)?, end + 2))
}

/// Byte offset of the first `target` not preceded by an escape.
fn find_unescaped(text: &str, targets: &[char]) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if targets.contains(&c) {
            return Some(i);
        }
    }
    None
}

fn is_crlf(text: &str) -> bool {
    let breaks = text.matches('\n').count();
    breaks > 0 && text.matches("\r\n").count() == breaks
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A `Key=` line collecting continuation lines.
struct Block {
    section: String,
    key: String,
    lines: Vec<String>,
}

pub(super) fn parse(text: &str) -> Result<KeyValueStore, ParseError> {
    let mut store = KeyValueStore::new();
    let mut current: Option<String> = None;
    let mut block: Option<Block> = None;
    let crlf = is_crlf(text);

    for (idx, raw) in text.split('\n').enumerate() {
        let line_no = idx + 1;
        let line = if crlf {
            raw.strip_suffix('\r').unwrap_or(raw)
        } else {
            raw
        };

        if let Some(rest) = line.trim_start().strip_prefix(CONTINUATION) {
            match block.as_mut() {
                Some(b) => b.lines.push(rest.to_string()),
                None => return Err(ParseError::OrphanContinuation { line: line_no }),
            }
            continue;
        }

        if let Some(done) = block.take() {
            finish_block(&mut store, done);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
            continue;
        }

        if trimmed.starts_with('[') {
            let name = parse_header(trimmed, line_no)?;
            if store.contains_section(&name) {
                return Err(ParseError::DuplicateSection {
                    line: line_no,
                    section: name,
                });
            }
            store.add_section(&name);
            current = Some(name);
            continue;
        }

        let Some(split) = find_unescaped(trimmed, &['=']) else {
            return Err(ParseError::MalformedLine { line: line_no });
        };
        let Some(section) = current.as_deref() else {
            return Err(ParseError::KeyOutsideSection { line: line_no });
        };

        let raw_key = trimmed[..split].trim();
        if raw_key.is_empty() {
            return Err(ParseError::EmptyKey { line: line_no });
        }
        let key = decode_name(raw_key);
        let key = key.as_str();
        if store.contains_key(section, key) {
            return Err(ParseError::DuplicateKey {
                line: line_no,
                section: section.to_string(),
                key: key.to_string(),
            });
        }

        let value = trimmed[split + 1..].trim();
        store.set(section, key, value);
        if value.is_empty() {
            block = Some(Block {
                section: section.to_string(),
                key: key.to_string(),
                lines: Vec::new(),
            });
        }
    }

    if let Some(done) = block.take() {
        finish_block(&mut store, done);
    }

    debug!(
        bytes = text.len(),
        sections = store.sections.len(),
        keys = store.len(),
        "parsed document"
    );
    Ok(store)
}

fn parse_header(trimmed: &str, line_no: usize) -> Result<String, ParseError> {
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::MalformedHeader { line: line_no })?;
    if find_unescaped(inner, &['[', ']']).is_some() {
        return Err(ParseError::MalformedHeader { line: line_no });
    }
    let name = inner.trim();
    if name.is_empty() {
        return Err(ParseError::EmptySectionName { line: line_no });
    }
    Ok(decode_name(name))
}

fn finish_block(store: &mut KeyValueStore, block: Block) {
    if !block.lines.is_empty() {
        store.set(&block.section, &block.key, block.lines.join("\n"));
    }
}
