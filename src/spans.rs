use crate::error::ValidationError;
use crate::ir::{Document, Line, Span, split_lines};

/// Validated spans together with the line structure of the text they refer
/// to. Spans keep the input order.
#[derive(Debug, Clone)]
pub struct SpanModel {
    pub text_len: usize,
    pub lines: Vec<Line>,
    pub spans: Vec<Span>,
}

pub fn build_spans(document: &Document) -> Result<SpanModel, ValidationError> {
    let lines = split_lines(&document.text);
    let text_len = lines.last().map(|line| line.end).unwrap_or(0);

    let mut spans = Vec::with_capacity(document.annotations.len());
    for (index, raw) in document.annotations.iter().enumerate() {
        for offset in [raw.start, raw.end] {
            if offset < 0 {
                return Err(ValidationError::NegativeOffset {
                    index,
                    label: raw.label.clone(),
                    offset,
                });
            }
        }
        if raw.start > raw.end {
            return Err(ValidationError::Inverted {
                index,
                label: raw.label.clone(),
                start: raw.start,
                end: raw.end,
            });
        }
        if raw.end as u64 > text_len as u64 {
            return Err(ValidationError::OutOfRange {
                index,
                label: raw.label.clone(),
                end: raw.end,
                len: text_len,
            });
        }

        let start = raw.start as usize;
        let end = raw.end as usize;
        let (first_line, last_line) = touched_lines(&lines, start, end);
        spans.push(Span {
            index,
            start,
            end,
            label: raw.label.clone(),
            multiline: last_line > first_line,
            first_line,
            last_line,
        });
    }

    tracing::debug!(
        lines = lines.len(),
        spans = spans.len(),
        multiline = spans.iter().filter(|span| span.multiline).count(),
        "validated spans"
    );

    Ok(SpanModel {
        text_len,
        lines,
        spans,
    })
}

/// Inclusive range of line indices a span touches. `lines` is never empty
/// and is sorted by offset, so both lookups are binary searches.
pub fn touched_lines(lines: &[Line], start: usize, end: usize) -> (usize, usize) {
    let last_index = lines.len().saturating_sub(1);
    let line_of = |offset: usize| -> usize {
        lines
            .partition_point(|line| line.end <= offset)
            .min(last_index)
    };
    let first = line_of(start);
    if start == end {
        return (first, first);
    }
    // The last scalar covered is `end - 1`.
    (first, line_of(end - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RawAnnotation;

    fn doc(text: &str, annotations: Vec<RawAnnotation>) -> Document {
        Document {
            text: text.to_string(),
            annotations,
        }
    }

    #[test]
    fn keeps_input_order() {
        let model = build_spans(&doc(
            "abcdef",
            vec![RawAnnotation::new(3, 5, "B"), RawAnnotation::new(0, 2, "A")],
        ))
        .unwrap();
        assert_eq!(model.spans[0].label, "B");
        assert_eq!(model.spans[1].index, 1);
    }

    #[test]
    fn rejects_negative_offsets() {
        let err = build_spans(&doc("abc", vec![RawAnnotation::new(-1, 2, "X")])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeOffset {
                index: 0,
                label: "X".to_string(),
                offset: -1
            }
        );
    }

    #[test]
    fn rejects_inverted_spans() {
        let err = build_spans(&doc("abc", vec![RawAnnotation::new(2, 1, "X")])).unwrap_err();
        assert!(matches!(err, ValidationError::Inverted { start: 2, end: 1, .. }));
    }

    #[test]
    fn rejects_spans_past_the_end() {
        let err = build_spans(&doc(
            "abc",
            vec![RawAnnotation::new(0, 1, "ok"), RawAnnotation::new(1, 4, "X")],
        ))
        .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { index: 1, end: 4, len: 3, .. }));
    }

    #[test]
    fn length_is_measured_in_scalar_values() {
        // The emoji is three scalar values (woman, ZWJ, laptop).
        let text = "👩\u{200d}💻!";
        assert!(build_spans(&doc(text, vec![RawAnnotation::new(0, 4, "E")])).is_ok());
        assert!(build_spans(&doc(text, vec![RawAnnotation::new(0, 5, "E")])).is_err());
    }

    #[test]
    fn flags_spans_crossing_a_line_break() {
        let model = build_spans(&doc(
            "abc\ndef",
            vec![
                RawAnnotation::new(1, 3, "inside"),
                RawAnnotation::new(1, 4, "with-newline"),
                RawAnnotation::new(2, 6, "across"),
            ],
        ))
        .unwrap();
        assert!(!model.spans[0].multiline);
        assert!(!model.spans[1].multiline);
        assert!(model.spans[2].multiline);
        assert_eq!((model.spans[2].first_line, model.spans[2].last_line), (0, 1));
    }

    #[test]
    fn zero_width_spans_are_accepted() {
        let model = build_spans(&doc("ab\n", vec![RawAnnotation::new(3, 3, "END")])).unwrap();
        let span = &model.spans[0];
        assert!(span.is_zero_width());
        assert!(!span.multiline);
        assert_eq!(span.first_line, 0);
    }
}
