//! A headless lyrics virtualizer.
//!
//! Renders a long list of variable-height rows (lyric lines) inside a fixed viewport while
//! keeping the rows currently active in playback aligned to an anchor line, and lets the user
//! scroll away temporarily before snapping back to the synced position.
//!
//! The engine is built from small pieces that can also be used on their own:
//! - [`RowHeightCache`]: estimated/measured row heights and their prefix sums, with batched
//!   rebuilds
//! - [`SizeObserver`]: container size, ignoring transient collapses to zero
//! - [`range::resolve`]: binary search from a pixel window to the rows covering it
//! - [`ScrollOffsetController`]: auto-alignment offset plus the manual scroll state machine
//! - [`LyricsVirtualizer`]: composes the above into [`RowDescriptor`]s
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - container size notifications
//! - row measurements once rows are laid out
//! - the active row range from the playback clock
//! - wheel/touch input and a monotonic clock (`now_ms`)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod height_cache;
mod options;
pub mod range;
mod scroll;
mod size;
mod state;
mod types;
mod virtualizer;

#[cfg(test)]
mod tests;

pub use error::{InvalidDeltaMode, ParseAlignError};
pub use height_cache::RowHeightCache;
pub use options::{
    DEFAULT_ESTIMATED_ROW_HEIGHT, DEFAULT_MEASURE_DEBOUNCE_MS, VirtualizerOptions,
};
pub use range::DEFAULT_BUFFER_ROWS;
pub use scroll::{
    AlignStrategy, CenterAlign, DEFAULT_INACTIVITY_TIMEOUT_MS, DEFAULT_WHEEL_LINE_HEIGHT,
    EndAlign, ScrollGeometry, ScrollOffsetController, SharedAlignStrategy, StartAlign,
};
pub use size::SizeObserver;
pub use state::{FrameState, ScrollState};
pub use types::{Align, ContainerSize, RowDescriptor, RowRange, ScrollMode, WheelDeltaMode};
pub use virtualizer::{LyricsVirtualizer, OnChangeCallback, VisibleRows};
