//! # Xcode Project Parsing
//!
//! This module provides a targeted parser for `project.pbxproj` files (the
//! old-style property-list format Xcode writes). It deliberately does not
//! model the whole object graph: only the shell-script build phases are
//! surfaced, because those are the only objects the reconciler reads or
//! mutates.
//!
//! ## Features
//!
//! - Locates every `PBXShellScriptBuildPhase` object, in file order
//! - Decodes the `name` and `shellScript` fields (quoted-string escapes)
//! - Rewrites a phase's shell script by replacing exactly one quoted
//!   literal, leaving every other byte of the file untouched
//! - Brace matching and token scanning are string- and comment-aware, so
//!   scripts containing `{`, `}`, `"` or field-like words cannot derail
//!   the parse
//!
//! ## Approach
//!
//! Object definitions all have the shape `ID /* comment */ = { ... };` with
//! a hexadecimal identifier at the start of a line. Each candidate block is
//! brace-matched, filtered on its `isa`, and its fields extracted with
//! absolute byte spans. Mutation replaces a span and re-parses the result,
//! which keeps all spans valid without bookkeeping.

use std::ops::Range;

use regex::Regex;

use crate::error::{Error, Result};

/// Matches the opening of an object definition: a hexadecimal identifier at
/// the start of a line, an optional annotation comment, then `= {`.
const OBJECT_START: &str = r"(?m)^\s*([0-9A-Fa-f]{24,})\s*(?:/\*.*?\*/\s*)?=\s*\{";

/// The `isa` value identifying shell-script build phases.
const SHELL_SCRIPT_PHASE_ISA: &str = "PBXShellScriptBuildPhase";

/// One shell-script build phase of an Xcode project.
#[derive(Debug, Clone)]
pub struct ShellScriptPhase {
    /// The object identifier (hexadecimal).
    pub id: String,
    /// The decoded `name` field, if the phase has one.
    pub name: Option<String>,
    /// The decoded `shellScript` field, if the phase has one.
    pub shell_script: Option<String>,
    /// Absolute span of the quoted `shellScript` literal, quotes included.
    script_span: Option<Range<usize>>,
}

/// A parsed Xcode project file.
///
/// Owns the raw project text. Mutations rewrite the affected literal in
/// place and re-parse, so the surrounding file survives byte-for-byte.
#[derive(Debug, Clone)]
pub struct PbxProject {
    text: String,
    phases: Vec<ShellScriptPhase>,
}

impl PbxProject {
    /// Parse a project file's text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pbxproj` when an object block or string literal is
    /// unterminated, or when a field of a shell-script phase is malformed.
    pub fn parse(text: String) -> Result<Self> {
        let phases = scan_shell_script_phases(&text)?;
        Ok(Self { text, phases })
    }

    /// All shell-script build phases, in file order.
    pub fn shell_script_phases(&self) -> &[ShellScriptPhase] {
        &self.phases
    }

    /// The first shell-script phase with the given name.
    pub fn phase_named(&self, name: &str) -> Option<&ShellScriptPhase> {
        self.phases
            .iter()
            .find(|phase| phase.name.as_deref() == Some(name))
    }

    /// Replace the shell script of the phase with the given identifier.
    ///
    /// The new script is encoded as a quoted literal over the old one; the
    /// project is then re-parsed so phase spans stay valid.
    pub fn set_shell_script(&mut self, id: &str, script: &str) -> Result<()> {
        let phase = self
            .phases
            .iter()
            .find(|phase| phase.id == id)
            .ok_or_else(|| Error::Pbxproj {
                message: format!("no shell-script build phase with id {}", id),
            })?;
        let span = phase.script_span.clone().ok_or_else(|| Error::Pbxproj {
            message: format!("build phase {} has no shellScript field", id),
        })?;

        let mut text = std::mem::take(&mut self.text);
        text.replace_range(span, &encode_quoted(script));
        *self = Self::parse(text)?;
        Ok(())
    }

    /// The full project text, for writing back to disk.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Scan the project text for shell-script build phase objects.
fn scan_shell_script_phases(text: &str) -> Result<Vec<ShellScriptPhase>> {
    let object_start = Regex::new(OBJECT_START)?;
    let mut phases = Vec::new();

    for captures in object_start.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let id = captures[1].to_string();

        let body_start = whole.end();
        let body_end = match_block_end(text, body_start).ok_or_else(|| Error::Pbxproj {
            message: format!("unterminated object block {}", id),
        })?;
        let body = &text[body_start..body_end];

        if find_bare(body, SHELL_SCRIPT_PHASE_ISA).is_none() {
            continue;
        }

        let name = match find_bare(body, "name") {
            Some(rel) => {
                let (value, _) = parse_field_value(text, body_start + rel + "name".len())?;
                Some(value)
            }
            None => None,
        };

        let (shell_script, script_span) = match find_bare(body, "shellScript") {
            Some(rel) => {
                let (value, span) =
                    parse_field_value(text, body_start + rel + "shellScript".len())?;
                (Some(value), span)
            }
            None => (None, None),
        };

        phases.push(ShellScriptPhase {
            id,
            name,
            shell_script,
            script_span,
        });
    }

    Ok(phases)
}

/// Find the `}` closing the block whose `{` sits just before `start`,
/// skipping quoted strings and comments. Returns the offset of the closing
/// brace, or `None` when the block never closes.
fn match_block_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i)?,
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i)?,
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Advance past the double-quoted string opening at `start`. Returns the
/// offset just after the closing quote.
fn skip_string(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Advance past the `/* ... */` comment opening at `start`.
fn skip_comment(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find `token` as a bare word in `text`, outside strings and comments.
/// Returns its byte offset.
fn find_bare(text: &str, token: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let token_bytes = token.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i)?,
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i)?,
            _ => {
                if bytes[i..].starts_with(token_bytes) {
                    let before_ok = i == 0 || !is_ident_byte(bytes[i - 1]);
                    let after = i + token_bytes.len();
                    let after_ok = after >= bytes.len() || !is_ident_byte(bytes[after]);
                    if before_ok && after_ok {
                        return Some(i);
                    }
                }
                i += 1;
            }
        }
    }
    None
}

/// Parse a field value after its key token: `= "literal"` or `= token`.
///
/// # Returns
///
/// The decoded value and, for quoted values, the absolute span of the
/// quoted literal including both quote characters.
fn parse_field_value(text: &str, mut pos: usize) -> Result<(String, Option<Range<usize>>)> {
    let bytes = text.as_bytes();

    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    if pos >= bytes.len() || bytes[pos] != b'=' {
        return Err(Error::Pbxproj {
            message: format!("expected '=' at offset {}", pos),
        });
    }
    pos += 1;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    if pos < bytes.len() && bytes[pos] == b'"' {
        let start = pos;
        let (decoded, end) = decode_quoted_at(text, pos)?;
        Ok((decoded, Some(start..end)))
    } else {
        let start = pos;
        while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b';' {
            pos += 1;
        }
        if start == pos {
            return Err(Error::Pbxproj {
                message: format!("empty field value at offset {}", start),
            });
        }
        Ok((text[start..pos].to_string(), None))
    }
}

/// Decode the quoted literal opening at `open`. Returns the decoded content
/// and the offset just after the closing quote.
fn decode_quoted_at(text: &str, open: usize) -> Result<(String, usize)> {
    let mut decoded = String::new();
    let mut chars = text[open + 1..].char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Ok((decoded, open + 1 + i + 1)),
            '\\' => {
                let Some((_, esc)) = chars.next() else { break };
                decoded.push(match esc {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    // Unknown escapes keep the escaped character as-is.
                    other => other,
                });
            }
            other => decoded.push(other),
        }
    }
    Err(Error::Pbxproj {
        message: "unterminated string literal".to_string(),
    })
}

/// Encode a string as a double-quoted pbxproj literal, escaping the
/// characters the format cannot carry raw.
pub fn encode_quoted(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len() + 2);
    encoded.push('"');
    for ch in value.chars() {
        match ch {
            '"' => encoded.push_str("\\\""),
            '\\' => encoded.push_str("\\\\"),
            '\n' => encoded.push_str("\\n"),
            '\t' => encoded.push_str("\\t"),
            '\r' => encoded.push_str("\\r"),
            other => encoded.push(other),
        }
    }
    encoded.push('"');
    encoded
}

/// Decode a complete double-quoted pbxproj literal, quotes included.
///
/// The inverse of [`encode_quoted`] for well-formed input.
pub fn decode_quoted(literal: &str) -> Result<String> {
    if !literal.starts_with('"') {
        return Err(Error::Pbxproj {
            message: "not a quoted literal".to_string(),
        });
    }
    let (decoded, end) = decode_quoted_at(literal, 0)?;
    if end != literal.len() {
        return Err(Error::Pbxproj {
            message: "trailing data after string literal".to_string(),
        });
    }
    Ok(decoded)
}
