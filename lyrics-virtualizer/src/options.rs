use crate::{Align, DEFAULT_BUFFER_ROWS, DEFAULT_INACTIVITY_TIMEOUT_MS, DEFAULT_WHEEL_LINE_HEIGHT};

/// Default measurement coalescing window.
pub const DEFAULT_MEASURE_DEBOUNCE_MS: u64 = 100;

/// Default height assumed for rows that have not been measured yet.
pub const DEFAULT_ESTIMATED_ROW_HEIGHT: f64 = 20.0;

/// Configuration for [`crate::LyricsVirtualizer`].
///
/// Plain data: with `feature = "serde"` it can be loaded from a host config file. Missing fields
/// fall back to their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VirtualizerOptions {
    pub row_count: usize,
    pub estimated_row_height: f64,

    /// Rows rendered past each edge of the visible window.
    pub buffer_rows: usize,

    pub align: Align,
    /// Anchor line as a fraction of the container height, in `[0, 1]`.
    pub anchor_fraction: f64,

    /// Idle time after the last wheel/touch input before auto-sync resumes.
    pub inactivity_timeout_ms: u64,
    /// Window used to coalesce bursts of row measurements into one prefix rebuild.
    pub measure_debounce_ms: u64,
    /// Pixels per wheel line/page unit.
    pub wheel_line_height: f64,
}

impl Default for VirtualizerOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

impl VirtualizerOptions {
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            estimated_row_height: DEFAULT_ESTIMATED_ROW_HEIGHT,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            align: Align::Center,
            anchor_fraction: 0.5,
            inactivity_timeout_ms: DEFAULT_INACTIVITY_TIMEOUT_MS,
            measure_debounce_ms: DEFAULT_MEASURE_DEBOUNCE_MS,
            wheel_line_height: DEFAULT_WHEEL_LINE_HEIGHT,
        }
    }

    pub fn with_estimated_row_height(mut self, estimated_row_height: f64) -> Self {
        self.estimated_row_height = estimated_row_height;
        self
    }

    pub fn with_buffer_rows(mut self, buffer_rows: usize) -> Self {
        self.buffer_rows = buffer_rows;
        self
    }

    pub fn with_alignment(mut self, align: Align, anchor_fraction: f64) -> Self {
        self.align = align;
        self.anchor_fraction = anchor_fraction;
        self
    }

    pub fn with_inactivity_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.inactivity_timeout_ms = timeout_ms;
        self
    }

    pub fn with_measure_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.measure_debounce_ms = debounce_ms;
        self
    }

    pub fn with_wheel_line_height(mut self, line_height: f64) -> Self {
        self.wheel_line_height = line_height;
        self
    }
}
