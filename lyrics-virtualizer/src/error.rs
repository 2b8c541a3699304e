use alloc::string::String;

/// Returned when parsing an [`crate::Align`] from an unknown name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown alignment `{0}` (expected `start`, `center` or `end`)")]
pub struct ParseAlignError(pub String);

/// Returned when a DOM `WheelEvent.deltaMode` value is outside `0..=2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid wheel delta mode {0} (expected 0 = pixel, 1 = line, 2 = page)")]
pub struct InvalidDeltaMode(pub u32);
