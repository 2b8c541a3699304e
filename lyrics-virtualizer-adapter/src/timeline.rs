use alloc::vec::Vec;

use lyrics_virtualizer::RowRange;

/// Fallback duration of a final line without an explicit end.
pub const DEFAULT_LAST_LINE_SECS: f64 = 1.0;

/// Timing of one lyric line, in seconds from the start of the track.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineTiming {
    pub start: f64,
    /// Explicit end (e.g. the last word tag). When absent the line lasts until the next
    /// line starts.
    pub end: Option<f64>,
}

impl LineTiming {
    pub const fn new(start: f64) -> Self {
        Self { start, end: None }
    }

    pub const fn with_end(start: f64, end: f64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// The interval during which one line is sung.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub line_index: usize,
    pub start: f64,
    pub end: f64,
}

/// State of the lyrics from `start` until the next keyframe.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    pub start: f64,
    /// Lines being sung, in the order they started.
    pub active_lines: Vec<usize>,
    /// Rows the viewport should follow. Never moves backwards between keyframes.
    pub range: RowRange,
}

/// Converts line timings into the active row range at any playback position.
///
/// Row `i` is line `i` of the input. Lines need not be sorted by time: a line without an explicit
/// end lasts until the next line to start after it, whatever its row. Overlapping lines (duets,
/// backing vocals) are supported: the range grows to cover each line as it starts, and its
/// start only moves up to the earliest line still being sung. Neither edge ever moves back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LyricsTimeline {
    segments: Vec<Segment>,
    keyframes: Vec<Keyframe>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

impl LyricsTimeline {
    pub fn new(lines: &[LineTiming]) -> Self {
        let segments = build_segments(lines);
        let keyframes = build_keyframes(&segments);
        adebug!(
            lines = lines.len(),
            keyframes = keyframes.len(),
            "LyricsTimeline::new"
        );
        Self {
            segments,
            keyframes,
        }
    }

    pub fn line_count(&self) -> usize {
        self.segments.len()
    }

    /// Segments sorted by start, then end.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// The keyframe in effect at `position_secs`, or `None` before the first line.
    pub fn keyframe_at(&self, position_secs: f64) -> Option<&Keyframe> {
        let i = self.keyframes.partition_point(|k| k.start <= position_secs);
        i.checked_sub(1).map(|i| &self.keyframes[i])
    }

    /// Rows to align at `position_secs`; empty at row 0 before the first line starts.
    pub fn active_range_at(&self, position_secs: f64) -> RowRange {
        self.keyframe_at(position_secs)
            .map(|k| k.range)
            .unwrap_or_default()
    }
}

fn build_segments(lines: &[LineTiming]) -> Vec<Segment> {
    // Row indices in start order; ties keep row order.
    let mut order: Vec<usize> = (0..lines.len()).collect();
    order.sort_by(|&a, &b| lines[a].start.total_cmp(&lines[b].start));

    let mut segments: Vec<Segment> = Vec::with_capacity(lines.len());
    for (rank, &line_index) in order.iter().enumerate() {
        let start = lines[line_index].start;
        let end = match lines[line_index].end {
            Some(end) => end,
            None => order
                .get(rank + 1)
                .map_or(start + DEFAULT_LAST_LINE_SECS, |&next| lines[next].start),
        };
        segments.push(Segment {
            line_index,
            start,
            end: end.max(start),
        });
    }
    segments.sort_by(|a, b| {
        a.start
            .total_cmp(&b.start)
            .then_with(|| a.end.total_cmp(&b.end))
    });
    segments
}

fn build_keyframes(segments: &[Segment]) -> Vec<Keyframe> {
    let mut edges: Vec<(f64, Edge, usize)> = Vec::with_capacity(segments.len() * 2);
    for s in segments {
        edges.push((s.start, Edge::Start, s.line_index));
        edges.push((s.end, Edge::End, s.line_index));
    }
    // Stable: at equal times a segment's edges keep segment order, so a line ending exactly
    // when the next begins is removed before its successor is added.
    edges.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut keyframes: Vec<Keyframe> = Vec::new();
    for (time, edge, line) in edges {
        if let Some(last) = keyframes.last_mut().filter(|k| k.start == time) {
            merge_edge(last, edge, line);
            continue;
        }
        let next = next_keyframe(keyframes.last(), time, edge, line);
        keyframes.push(next);
    }
    keyframes
}

/// Applies an edge to a keyframe that already exists at the same instant.
fn merge_edge(frame: &mut Keyframe, edge: Edge, line: usize) {
    match edge {
        Edge::Start => {
            frame.active_lines.push(line);
            frame.range.end_index = frame.range.end_index.max(line + 1);
            if frame.active_lines.len() == 1 {
                frame.range.start_index = frame.range.start_index.max(line);
            }
        }
        Edge::End => {
            frame.active_lines.retain(|&l| l != line);
            let first = frame.active_lines.first().copied().unwrap_or(line + 1);
            frame.range.start_index = frame.range.start_index.max(first);
        }
    }
}

/// Derives a new keyframe from the previous one plus a single edge.
fn next_keyframe(prev: Option<&Keyframe>, time: f64, edge: Edge, line: usize) -> Keyframe {
    let mut active_lines = prev.map(|k| k.active_lines.clone()).unwrap_or_default();
    let mut range = prev.map_or(RowRange::new(0, 1), |k| k.range);

    match edge {
        Edge::Start => {
            active_lines.push(line);
            range.start_index = range.start_index.max(active_lines[0]);
            range.end_index = range.end_index.max(line + 1);
        }
        Edge::End => {
            active_lines.retain(|&l| l != line);
            let last = active_lines.last().copied().unwrap_or(0);
            range.end_index = range.end_index.max(last + 1).max(range.start_index + 1);
        }
    }

    Keyframe {
        start: time,
        active_lines,
        range,
    }
}
