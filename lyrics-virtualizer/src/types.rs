use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::{InvalidDeltaMode, ParseAlignError};

/// Which edge (or midpoint) of the active range is pinned to the anchor line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Align {
    type Err = ParseAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            other => Err(ParseAlignError(other.to_string())),
        }
    }
}

/// Unit of a wheel event's `delta_y`, mirroring the DOM `deltaMode` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WheelDeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl TryFrom<u32> for WheelDeltaMode {
    type Error = InvalidDeltaMode;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pixel),
            1 => Ok(Self::Line),
            2 => Ok(Self::Page),
            other => Err(InvalidDeltaMode(other)),
        }
    }
}

/// Pixel size of the scrolling container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `true` when either dimension is zero (or not a usable number).
    pub fn is_collapsed(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A half-open range of row indexes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl RowRange {
    pub const fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index < self.end_index
    }

    /// Clamps both ends to `0..=count`. A reversed range collapses to an empty range at its
    /// (clamped) start.
    pub fn clamped(self, count: usize) -> Self {
        let start_index = self.start_index.min(count);
        let end_index = self.end_index.min(count).max(start_index);
        Self {
            start_index,
            end_index,
        }
    }

    /// Signed distance of `index` from this range: `0` inside, negative before, positive after.
    ///
    /// For an empty range at `s`, rows before `s` are negative and rows from `s` on are positive.
    pub fn relative_position(&self, index: usize) -> isize {
        let start = self.start_index;
        let end = self.end_index.max(start);
        if index < start {
            -((start - index) as isize)
        } else if index >= end {
            (index - end) as isize + 1
        } else {
            0
        }
    }
}

/// Current scroll mode of the offset controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScrollMode {
    /// The offset follows the active range.
    #[default]
    Auto,
    /// The user is scrolling; the offset is user-driven until the inactivity timeout.
    Manual,
}

/// One row to render for the current pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowDescriptor {
    pub index: usize,
    /// `0` inside the active range, negative before it ("already sung"), positive after it.
    pub relative_position: isize,
    /// Top edge relative to the viewport (`prefix[index] - scroll_offset`).
    pub top: f64,
    /// Currently cached height (estimate or measurement).
    pub height: f64,
    pub is_manual_scroll_active: bool,
}

impl RowDescriptor {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn is_active(&self) -> bool {
        self.relative_position == 0
    }
}
