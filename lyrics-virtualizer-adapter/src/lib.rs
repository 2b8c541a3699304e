//! Host-side helpers for the `lyrics-virtualizer` crate.
//!
//! The engine is UI-agnostic and only does the math and state. This crate provides the
//! framework-neutral pieces most hosts end up writing anyway:
//!
//! - [`HostEvent`]: a serializable event model, validated on dispatch
//! - [`Controller`]: routes events, follows playback and animates the return to the synced
//!   position when manual scrolling times out
//! - [`LyricsTimeline`]: derives the active row range from per-line timings
//! - [`Tween`]: a small easing helper
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod event;
mod timeline;
mod tween;


pub use controller::{Controller, DEFAULT_SNAP_BACK_MS};
pub use event::{EventError, HostEvent};
pub use timeline::{DEFAULT_LAST_LINE_SECS, Keyframe, LineTiming, LyricsTimeline, Segment};
pub use tween::{Easing, Tween};
