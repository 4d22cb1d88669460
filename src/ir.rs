use serde::{Deserialize, Serialize};

/// A parsed input document: the source text and its raw annotations, exactly
/// as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub annotations: Vec<RawAnnotation>,
}

/// One annotation as it appears in the input. Offsets stay signed here so
/// that negative values can be reported precisely during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnnotation {
    pub start: i64,
    pub end: i64,
    pub label: String,
}

impl RawAnnotation {
    pub fn new(start: i64, end: i64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

/// A validated span. Offsets are Unicode scalar value indices into the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Position of the annotation in the input list.
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub multiline: bool,
    pub first_line: usize,
    pub last_line: usize,
}

impl Span {
    pub fn is_zero_width(&self) -> bool {
        self.start == self.end
    }
}

/// A line of text. `[start, end)` includes the line terminator, while
/// `content_end` stops before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub content_end: usize,
    pub text: String,
}

impl Line {
    pub fn content_len(&self) -> usize {
        self.content_end - self.start
    }
}

pub fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into lines, keeping terminators inside each line's window.
/// `\r\n` counts as one break. Text ending in a terminator produces no
/// trailing empty line; empty text produces a single empty line.
pub fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut offset = 0usize;
    let mut content = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if is_line_break(ch) {
            let content_end = offset;
            offset += 1;
            if ch == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
                offset += 1;
            }
            lines.push(Line {
                index: lines.len(),
                start,
                end: offset,
                content_end,
                text: std::mem::take(&mut content),
            });
            start = offset;
            continue;
        }
        content.push(ch);
        offset += 1;
    }

    if !content.is_empty() || lines.is_empty() {
        lines.push(Line {
            index: lines.len(),
            start,
            end: offset,
            content_end: offset,
            text: content,
        });
    }

    lines
}
