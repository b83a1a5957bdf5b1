//! Cleanup of captured device output.
//!
//! Devices decorate their console output with CSI sequences (colors, cursor
//! movement) and frame every response with the echoed command line and the
//! next prompt. The functions here remove both so the log reads as plain text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Introducer (`ESC [` or 8-bit CSI), parameter bytes, intermediate bytes, final byte.
static CSI_SEQUENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\x1b\[|\x{9b})[0-?]*[ -/]*[@-~]").expect("valid CSI pattern")
});

const ESC: char = '\x1b';
const CSI: char = '\u{9b}';

/// Line terminator pair that separates device output lines
pub const SEGMENT_SEPARATOR: &str = "\r\n";

pub const LOG_HEADER: &str = "==================== Serial Log ====================";
pub const LOG_FOOTER: &str = "====================================================";

/// Remove every CSI sequence from `text`; all other characters are kept in order.
pub fn strip_escape_sequences(text: &str) -> String {
    CSI_SEQUENCE.replace_all(text, "").into_owned()
}

/// Decode raw device bytes and strip escape sequences for display.
///
/// Decoding comes first: 0x9b is also a UTF-8 continuation byte, so the 8-bit
/// CSI is only recognized as the decoded character U+009B.
pub fn decode(data: &[u8]) -> String {
    strip_escape_sequences(&String::from_utf8_lossy(data))
}

/// Split on CRLF, drop the first and last segment (echoed command and prompt),
/// drop empty segments and strip escape sequences from the rest.
pub fn clean_lines(raw: &str) -> Vec<String> {
    let segments: Vec<&str> = raw.split(SEGMENT_SEPARATOR).collect();
    if segments.len() <= 2 {
        return Vec::new();
    }

    segments[1..segments.len() - 1]
        .iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| strip_escape_sequences(segment))
        .collect()
}

/// [`clean_lines`] rejoined with one newline per line.
pub fn clean_log(raw: &str) -> String {
    clean_lines(raw)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}

/// [`clean_log`] wrapped in the fixed log delimiters.
pub fn framed_log(raw: &str) -> String {
    format!("{}\n{}{}\n", LOG_HEADER, clean_log(raw), LOG_FOOTER)
}

/// Incremental decoder for stream mode.
///
/// A chunk boundary may fall inside a multi-byte UTF-8 character or an escape
/// sequence; such tails are held until the next chunk completes them.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    partial_char: Vec<u8>,
    partial_escape: String,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and get back the text that is ready to print.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.partial_char.extend_from_slice(chunk);
        let cut = unfinished_utf8_start(&self.partial_char);
        let complete: Vec<u8> = self.partial_char.drain(..cut).collect();

        let mut text = std::mem::take(&mut self.partial_escape);
        text.push_str(&String::from_utf8_lossy(&complete));

        if let Some(start) = unfinished_escape_start(&text) {
            self.partial_escape = text.split_off(start);
        }
        strip_escape_sequences(&text)
    }

    /// Emit whatever is still held, complete or not.
    pub fn finish(&mut self) -> String {
        let mut text = std::mem::take(&mut self.partial_escape);
        text.push_str(&String::from_utf8_lossy(&std::mem::take(&mut self.partial_char)));
        strip_escape_sequences(&text)
    }

    pub fn has_pending(&self) -> bool {
        !self.partial_char.is_empty() || !self.partial_escape.is_empty()
    }
}

/// Start of a trailing escape sequence that may still be completed.
fn unfinished_escape_start(text: &str) -> Option<usize> {
    let (start, intro) = text
        .char_indices()
        .rev()
        .find(|&(_, c)| c == ESC || c == CSI)?;

    if let Some(m) = CSI_SEQUENCE.find_at(text, start) {
        if m.start() == start {
            return None;
        }
    }

    let after = &text[start + intro.len_utf8()..];
    let body = if intro == ESC {
        match after.chars().next() {
            None => return Some(start),
            Some('[') => &after[1..],
            Some(_) => return None,
        }
    } else {
        after
    };

    // Parameter and intermediate bytes only: the final byte has not arrived yet.
    if body.chars().all(|c| (' '..='?').contains(&c)) {
        Some(start)
    } else {
        None
    }
}

/// Start of a trailing, incomplete UTF-8 character (or `data.len()`).
fn unfinished_utf8_start(data: &[u8]) -> usize {
    let len = data.len();
    for back in 1..=len.min(3) {
        let pos = len - back;
        let byte = data[pos];
        if byte & 0xc0 == 0x80 {
            continue;
        }
        let width = match byte {
            b if b & 0xe0 == 0xc0 => 2,
            b if b & 0xf0 == 0xe0 => 3,
            b if b & 0xf8 == 0xf0 => 4,
            _ => return len,
        };
        return if back < width { pos } else { len };
    }
    len
}
