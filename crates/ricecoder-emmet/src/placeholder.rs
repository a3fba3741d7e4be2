//! Tab-stop handling for expansion output
//!
//! The engine marks cursor stops with `${n}`, `${n:label}` or a bare `$n`.
//! Output is presented in one of two ways:
//!
//! - **Inline**: every marker is stripped, the text is inserted with a single
//!   edit and the cursor jumps to the final stop.
//! - **Snippet**: markers are kept for the host's snippet engine; the highest
//!   unlabelled stop is renumbered to `${0}` when no final stop exists, and
//!   literal dollars are escaped.

use crate::types::{ExpansionResult, Placeholder, Position};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_TAB_STOP_DOLLAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^\\])(\$)([^\{])").unwrap());
static EMPTY_TAB_STOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^\\])\$\{\d+\}").unwrap());
static LABELLED_TAB_STOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{\d+:([^\}]+)\}").unwrap());

/// Text ready for insertion plus where the cursor ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInsertion {
    pub text: String,
    pub cursor: Position,
}

/// A marker located in raw engine output
#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker {
    index: u32,
    label: Option<String>,
    /// Byte span of the whole marker
    start: usize,
    end: usize,
    /// Byte span of the tab-stop number
    digits: std::ops::Range<usize>,
    /// Character offset of the marker start
    char_offset: usize,
}

fn scan_markers(text: &str) -> Vec<Marker> {
    let bytes = text.as_bytes();
    let mut markers = Vec::new();
    let mut chars_before = 0;
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            // escaped character is literal
            i += 2;
            continue;
        }
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let start = i;
        let braced = bytes.get(i + 1) == Some(&b'{');
        let digits_start = if braced { i + 2 } else { i + 1 };
        let mut j = digits_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == digits_start {
            i += 1;
            continue;
        }

        let digits = digits_start..j;
        let (label, end) = if !braced {
            (None, j)
        } else {
            match bytes.get(j) {
                Some(b'}') => (None, j + 1),
                Some(b':') => match text[j + 1..].find('}') {
                    Some(close) => (Some(text[j + 1..j + 1 + close].to_string()), j + 2 + close),
                    None => {
                        i = j;
                        continue;
                    }
                },
                _ => {
                    i = j;
                    continue;
                }
            }
        };

        let Ok(index) = text[digits.clone()].parse::<u32>() else {
            i = j;
            continue;
        };

        chars_before += text[last..start].chars().count();
        last = start;
        markers.push(Marker {
            index,
            label,
            start,
            end,
            digits,
            char_offset: chars_before,
        });
        i = end;
    }

    markers
}

/// Resolve `\$`, `\}` and `\\` in text between markers; other backslashes
/// are kept
fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&(next @ ('$' | '}' | '\\')))) => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Pick the final stop: the first `0` marker, otherwise the highest-numbered
/// stop if its first occurrence carries no label
fn designate_final(markers: &[Marker]) -> Option<usize> {
    if let Some(zero) = markers.iter().position(|m| m.index == 0) {
        return Some(zero);
    }

    let max = markers.iter().map(|m| m.index).max()?;
    let first = markers.iter().position(|m| m.index == max)?;
    markers[first].label.is_none().then_some(first)
}

/// Parsing and presentation of expansion output
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderResolver;

impl PlaceholderResolver {
    pub fn new() -> Self {
        Self
    }

    /// Locate every marker and the designated final stop
    pub fn parse(&self, expanded_text: &str) -> ExpansionResult {
        let markers = scan_markers(expanded_text);
        let final_placeholder = designate_final(&markers);

        ExpansionResult {
            expanded_text: expanded_text.to_string(),
            placeholders: markers
                .into_iter()
                .map(|m| Placeholder {
                    index: m.index,
                    offset: m.char_offset,
                    label: m.label,
                })
                .collect(),
            final_placeholder,
        }
    }

    /// Remove all marker syntax, keeping labels as plain text
    ///
    /// Returns the stripped text and the character offset of the final stop
    /// within it.
    pub fn strip_markers(&self, expanded_text: &str) -> (String, Option<usize>) {
        let markers = scan_markers(expanded_text);
        let final_marker = designate_final(&markers);

        let mut out = String::with_capacity(expanded_text.len());
        let mut out_chars = 0;
        let mut final_offset = None;
        let mut last = 0;

        for (i, marker) in markers.iter().enumerate() {
            let literal = unescape(&expanded_text[last..marker.start]);
            out_chars += literal.chars().count();
            out.push_str(&literal);

            if final_marker == Some(i) {
                final_offset = Some(out_chars);
            }
            if let Some(label) = &marker.label {
                out.push_str(label);
                out_chars += label.chars().count();
            }
            last = marker.end;
        }
        out.push_str(&unescape(&expanded_text[last..]));

        (out, final_offset)
    }

    /// Inline presentation: stripped text and the cursor after insertion
    ///
    /// `matched_length` is the length in characters of the replaced
    /// abbreviation and `cursor` the cursor right after it. Without a final
    /// stop the cursor lands after the inserted text.
    pub fn resolve(
        &self,
        expanded_text: &str,
        matched_length: usize,
        cursor: Position,
    ) -> ResolvedInsertion {
        let (text, final_offset) = self.strip_markers(expanded_text);
        let prefix: String = match final_offset {
            Some(offset) => text.chars().take(offset).collect(),
            None => text.clone(),
        };

        let segments: Vec<&str> = prefix.split('\n').collect();
        let cursor = match segments.as_slice() {
            [only] => {
                let column =
                    only.chars().count() as i64 - matched_length as i64 + cursor.column as i64;
                Position::new(cursor.line, column.max(1) as u32)
            }
            [.., last] => Position::new(
                cursor.line + (segments.len() - 1) as u32,
                last.chars().count() as u32 + 1,
            ),
            [] => cursor,
        };

        ResolvedInsertion { text, cursor }
    }

    /// Snippet presentation: final stop ensured and literal dollars escaped
    pub fn snippet_text(&self, expanded_text: &str) -> String {
        escape_non_tab_stop_dollar(&add_final_tab_stop(expanded_text))
    }
}

/// Renumber the highest unlabelled tab stop to `0` when no final stop exists
pub fn add_final_tab_stop(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let markers: Vec<Marker> = scan_markers(text)
        .into_iter()
        .filter(|m| text.as_bytes().get(m.start + 1) == Some(&b'{'))
        .collect();
    if markers.iter().any(|m| m.index == 0) {
        return text.to_string();
    }

    let Some(max) = markers.iter().map(|m| m.index).max() else {
        return text.to_string();
    };
    let targets: Vec<&Marker> = markers.iter().filter(|m| m.index == max).collect();
    if targets.first().is_some_and(|m| m.label.is_some()) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for marker in targets {
        out.push_str(&text[last..marker.digits.start]);
        out.push('0');
        last = marker.digits.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Escape `$` that does not start a `${` tab stop
pub fn escape_non_tab_stop_dollar(text: &str) -> String {
    NON_TAB_STOP_DOLLAR
        .replace_all(text, r"${1}\${2}${3}")
        .into_owned()
}

/// Documentation rendering: empty stops become `|`, labels become their text
pub fn replace_tab_stops_with_cursors(text: &str) -> String {
    let text = EMPTY_TAB_STOP.replace_all(text, "${1}|");
    LABELLED_TAB_STOP.replace_all(&text, "${1}").into_owned()
}

/// Label rendering: stops removed, labels kept
pub fn remove_tab_stops(text: &str) -> String {
    let text = EMPTY_TAB_STOP.replace_all(text, "${1}");
    LABELLED_TAB_STOP.replace_all(&text, "${1}").into_owned()
}
