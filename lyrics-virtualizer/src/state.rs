use crate::{ContainerSize, RowRange, ScrollMode};

/// A lightweight snapshot of the scroll state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// The offset rows are rendered with.
    pub offset: f64,
    /// The offset auto mode would use right now (equal to `offset` in auto mode).
    pub auto_offset: f64,
}

/// A combined snapshot of everything that determines one render pass.
///
/// Adapters can compare consecutive snapshots to decide whether to repaint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub container: ContainerSize,
    pub scroll: ScrollState,
    pub active_range: RowRange,
    pub render_range: RowRange,
    pub total_height: f64,
}
