use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap};

use crate::ir::{Line, Span};

/// One span restricted to one line's window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Index into the span list.
    pub span: usize,
    pub start: usize,
    pub end: usize,
    pub track: usize,
    pub continues_from_above: bool,
    pub continues_below: bool,
}

impl Segment {
    pub fn is_continuation(&self) -> bool {
        self.continues_from_above || self.continues_below
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineTracks {
    pub line: usize,
    pub track_count: usize,
    /// Segments in placement order.
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default)]
pub struct TrackAssignment {
    pub lines: Vec<LineTracks>,
}

impl TrackAssignment {
    pub fn max_tracks(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.track_count)
            .max()
            .unwrap_or(0)
    }

    /// All segments belonging to one span, first line first.
    pub fn segments_of(&self, span: usize) -> impl Iterator<Item = (usize, &Segment)> {
        self.lines.iter().flat_map(move |line| {
            line.segments
                .iter()
                .filter(move |segment| segment.span == span)
                .map(move |segment| (line.line, segment))
        })
    }
}

/// Extent a span occupies for conflict purposes, in doubled coordinates:
/// `[a, b)` covers `[2a, 2b)` and a zero-width span at `s` covers
/// `[2s, 2s + 1)`.
pub fn occupancy(start: usize, end: usize) -> (usize, usize) {
    if start == end {
        (2 * start, 2 * start + 1)
    } else {
        (2 * start, 2 * end)
    }
}

/// Greedy interval colouring. `intervals` must already be sorted by their
/// left endpoint; each is placed on the lowest-numbered track whose last
/// interval ended at or before its start. Returns the track of each interval
/// and the number of tracks used.
pub fn greedy_tracks(intervals: &[(usize, usize)]) -> (Vec<usize>, usize) {
    let mut busy: BinaryHeap<Reverse<(usize, usize)>> = BinaryHeap::new();
    let mut free: BTreeSet<usize> = BTreeSet::new();
    let mut tracks = Vec::with_capacity(intervals.len());
    let mut track_count = 0usize;

    for &(lo, hi) in intervals {
        while let Some(Reverse((end, track))) = busy.peek().copied() {
            if end > lo {
                break;
            }
            busy.pop();
            free.insert(track);
        }
        let track = match free.pop_first() {
            Some(track) => track,
            None => {
                track_count += 1;
                track_count - 1
            }
        };
        busy.push(Reverse((hi, track)));
        tracks.push(track);
    }

    (tracks, track_count)
}

/// Assign every span to a track on each line it touches.
pub fn assign_tracks(spans: &[Span], lines: &[Line]) -> TrackAssignment {
    let mut buckets: Vec<Vec<Segment>> = vec![Vec::new(); lines.len()];
    for (idx, span) in spans.iter().enumerate() {
        for line_idx in span.first_line..=span.last_line {
            let Some(line) = lines.get(line_idx) else {
                continue;
            };
            let (start, end) = if span.is_zero_width() {
                (span.start, span.end)
            } else {
                (span.start.max(line.start), span.end.min(line.end))
            };
            buckets[line_idx].push(Segment {
                span: idx,
                start,
                end,
                track: 0,
                continues_from_above: span.start < line.start,
                continues_below: span.end > line.end,
            });
        }
    }

    let lines = buckets
        .into_iter()
        .enumerate()
        .map(|(line, mut segments)| {
            segments.sort_by(|a, b| placement_order(a, b, spans));
            let intervals: Vec<(usize, usize)> = segments
                .iter()
                .map(|segment| occupancy(segment.start, segment.end))
                .collect();
            let (tracks, track_count) = greedy_tracks(&intervals);
            for (segment, track) in segments.iter_mut().zip(tracks) {
                segment.track = track;
            }
            LineTracks {
                line,
                track_count,
                segments,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        lines = lines.len(),
        max_tracks = lines.iter().map(|l| l.track_count).max().unwrap_or(0),
        "assigned tracks"
    );

    TrackAssignment { lines }
}

/// Start ascending, end descending (broader spans above), then label and
/// input position so the order is total. Segments clipped at the same line
/// end fall back to the full span end.
fn placement_order(a: &Segment, b: &Segment, spans: &[Span]) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.end.cmp(&a.end))
        .then_with(|| spans[b.span].end.cmp(&spans[a.span].end))
        .then_with(|| spans[a.span].label.cmp(&spans[b.span].label))
        .then_with(|| spans[a.span].index.cmp(&spans[b.span].index))
}
