use alloc::sync::Arc;
use core::fmt;

use crate::{Align, RowRange, ScrollMode, WheelDeltaMode};

/// Idle time after the last wheel/touch event before manual scrolling hands control back.
pub const DEFAULT_INACTIVITY_TIMEOUT_MS: u64 = 5000;

/// Pixels scrolled per wheel "line" (or "page") unit.
pub const DEFAULT_WHEEL_LINE_HEIGHT: f64 = 50.0;

/// Alignment policy: where the viewport should sit so the active range meets the anchor line.
///
/// `range` is already clamped to `0..=row_count` and never reversed. `anchor_offset` is the
/// anchor line's distance from the viewport top, in pixels.
pub trait AlignStrategy {
    fn compute_offset(&self, range: RowRange, prefix_heights: &[f64], anchor_offset: f64) -> f64;
}

/// Pins the top of the first active row to the anchor.
#[derive(Clone, Copy, Debug, Default)]
pub struct StartAlign;

/// Pins the midpoint of the active range to the anchor.
#[derive(Clone, Copy, Debug, Default)]
pub struct CenterAlign;

/// Pins the bottom of the last active row to the anchor.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndAlign;

impl AlignStrategy for StartAlign {
    fn compute_offset(&self, range: RowRange, prefix_heights: &[f64], anchor_offset: f64) -> f64 {
        prefix_heights[range.start_index] - anchor_offset
    }
}

impl AlignStrategy for CenterAlign {
    fn compute_offset(&self, range: RowRange, prefix_heights: &[f64], anchor_offset: f64) -> f64 {
        (prefix_heights[range.start_index] + prefix_heights[range.end_index]) / 2.0 - anchor_offset
    }
}

impl AlignStrategy for EndAlign {
    fn compute_offset(&self, range: RowRange, prefix_heights: &[f64], anchor_offset: f64) -> f64 {
        prefix_heights[range.end_index] - anchor_offset
    }
}

impl Align {
    /// The built-in strategy for this alignment.
    pub fn strategy(self) -> &'static dyn AlignStrategy {
        match self {
            Self::Start => &StartAlign,
            Self::Center => &CenterAlign,
            Self::End => &EndAlign,
        }
    }
}

/// A user-supplied alignment policy that replaces the built-in `Align` variants.
pub type SharedAlignStrategy = Arc<dyn AlignStrategy + Send + Sync>;

/// Read-only inputs the controller needs for one computation.
#[derive(Clone, Copy, Debug)]
pub struct ScrollGeometry<'a> {
    pub prefix_heights: &'a [f64],
    pub container_height: f64,
    pub active_range: RowRange,
}

impl ScrollGeometry<'_> {
    pub fn row_count(&self) -> usize {
        self.prefix_heights.len().saturating_sub(1)
    }

    pub fn content_height(&self) -> f64 {
        self.prefix_heights.last().copied().unwrap_or(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TouchDirection {
    None,
    Up,
    Down,
}

/// Turns successive touch positions into scroll deltas.
///
/// The anchor point is reset whenever the drag direction flips, and the flipping move itself
/// contributes no delta, so reversing mid-gesture does not jump.
#[derive(Clone, Copy, Debug)]
struct TouchTracker {
    anchor_y: f64,
    last_y: f64,
    direction: TouchDirection,
}

impl TouchTracker {
    const fn new() -> Self {
        Self {
            anchor_y: 0.0,
            last_y: 0.0,
            direction: TouchDirection::None,
        }
    }

    fn start(&mut self, y: f64) {
        self.anchor_y = y;
        self.last_y = y;
        self.direction = TouchDirection::None;
    }

    /// Returns the scroll delta (already sign-inverted) for a move to `y`.
    fn advance(&mut self, y: f64) -> f64 {
        let step = y - self.last_y;
        let direction = if step > 0.0 {
            TouchDirection::Down
        } else if step < 0.0 {
            TouchDirection::Up
        } else {
            TouchDirection::None
        };
        self.last_y = y;

        if direction != self.direction {
            self.direction = direction;
            self.anchor_y = y;
            return 0.0;
        }
        let delta = y - self.anchor_y;
        self.anchor_y = y;
        -delta
    }
}

/// Owns the auto/manual scroll state and computes the effective scroll offset.
///
/// In [`ScrollMode::Auto`] the offset is derived from the active range through the alignment
/// strategy every time it is asked for. The first wheel or touch-move switches to
/// [`ScrollMode::Manual`], seeded from the auto offset at that instant. Manual mode ends once
/// `inactivity_timeout_ms` passes without input (checked by [`Self::tick`]); the auto offset,
/// which kept tracking the active range underneath, then takes over again.
#[derive(Clone)]
pub struct ScrollOffsetController {
    align: Align,
    anchor_fraction: f64,
    custom_strategy: Option<SharedAlignStrategy>,

    manual_offset: Option<f64>,
    last_input_ms: Option<u64>,
    inactivity_timeout_ms: u64,
    wheel_line_height: f64,
    touch: TouchTracker,
}

impl ScrollOffsetController {
    pub fn new(align: Align, anchor_fraction: f64) -> Self {
        Self {
            align,
            anchor_fraction: sanitize_fraction(anchor_fraction),
            custom_strategy: None,
            manual_offset: None,
            last_input_ms: None,
            inactivity_timeout_ms: DEFAULT_INACTIVITY_TIMEOUT_MS,
            wheel_line_height: DEFAULT_WHEEL_LINE_HEIGHT,
            touch: TouchTracker::new(),
        }
    }

    pub fn with_inactivity_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.inactivity_timeout_ms = timeout_ms;
        self
    }

    pub fn with_wheel_line_height(mut self, line_height: f64) -> Self {
        self.set_wheel_line_height(line_height);
        self
    }

    pub fn align(&self) -> Align {
        self.align
    }

    pub fn anchor_fraction(&self) -> f64 {
        self.anchor_fraction
    }

    /// Updates the alignment and anchor fraction. Returns `true` if anything changed.
    pub fn set_alignment(&mut self, align: Align, anchor_fraction: f64) -> bool {
        let anchor_fraction = sanitize_fraction(anchor_fraction);
        if self.align == align && self.anchor_fraction == anchor_fraction {
            return false;
        }
        self.align = align;
        self.anchor_fraction = anchor_fraction;
        true
    }

    /// Installs (or removes) a custom alignment policy that overrides `align`.
    pub fn set_align_strategy(&mut self, strategy: Option<SharedAlignStrategy>) {
        self.custom_strategy = strategy;
    }

    pub fn has_custom_strategy(&self) -> bool {
        self.custom_strategy.is_some()
    }

    pub fn inactivity_timeout_ms(&self) -> u64 {
        self.inactivity_timeout_ms
    }

    pub fn set_inactivity_timeout_ms(&mut self, timeout_ms: u64) {
        self.inactivity_timeout_ms = timeout_ms;
    }

    pub fn wheel_line_height(&self) -> f64 {
        self.wheel_line_height
    }

    pub fn set_wheel_line_height(&mut self, line_height: f64) {
        if line_height.is_finite() && line_height > 0.0 {
            self.wheel_line_height = line_height;
        }
    }

    pub fn mode(&self) -> ScrollMode {
        if self.manual_offset.is_some() {
            ScrollMode::Manual
        } else {
            ScrollMode::Auto
        }
    }

    pub fn is_manual(&self) -> bool {
        self.manual_offset.is_some()
    }

    /// The stored (unclamped-to-current-geometry) manual offset, if in manual mode.
    pub fn manual_offset(&self) -> Option<f64> {
        self.manual_offset
    }

    /// When manual mode will revert to auto if no further input arrives.
    pub fn inactivity_deadline_ms(&self) -> Option<u64> {
        self.manual_offset?;
        self.last_input_ms
            .map(|t| t.saturating_add(self.inactivity_timeout_ms))
    }

    /// `container_height * anchor_fraction`; `0` while the container has no usable height.
    pub fn anchor_offset(&self, container_height: f64) -> f64 {
        if container_height.is_finite() && container_height > 0.0 {
            container_height * self.anchor_fraction
        } else {
            0.0
        }
    }

    pub fn min_offset(&self, geometry: &ScrollGeometry<'_>) -> f64 {
        -self.anchor_offset(geometry.container_height)
    }

    /// The bottom of the content minus the anchor offset.
    pub fn max_offset(&self, geometry: &ScrollGeometry<'_>) -> f64 {
        geometry.content_height() - self.anchor_offset(geometry.container_height)
    }

    pub fn clamp_offset(&self, geometry: &ScrollGeometry<'_>, offset: f64) -> f64 {
        let min = self.min_offset(geometry);
        let max = self.max_offset(geometry).max(min);
        if offset.is_nan() {
            return min;
        }
        offset.clamp(min, max)
    }

    /// Offset that aligns the active range to the anchor. Not clamped.
    pub fn auto_offset(&self, geometry: &ScrollGeometry<'_>) -> f64 {
        if geometry.prefix_heights.is_empty() {
            return 0.0;
        }
        let range = geometry.active_range.clamped(geometry.row_count());
        let anchor = self.anchor_offset(geometry.container_height);
        let offset = match &self.custom_strategy {
            Some(strategy) => strategy.compute_offset(range, geometry.prefix_heights, anchor),
            None => self
                .align
                .strategy()
                .compute_offset(range, geometry.prefix_heights, anchor),
        };
        if offset.is_finite() { offset } else { 0.0 }
    }

    /// The offset to render with: the (clamped) manual offset in manual mode, the auto offset
    /// otherwise.
    pub fn effective_offset(&self, geometry: &ScrollGeometry<'_>) -> f64 {
        match self.manual_offset {
            Some(offset) => self.clamp_offset(geometry, offset),
            None => self.auto_offset(geometry),
        }
    }

    /// Applies a wheel event. Returns `true` when the effective offset or mode may have changed.
    pub fn on_wheel(
        &mut self,
        geometry: &ScrollGeometry<'_>,
        delta_y: f64,
        delta_mode: WheelDeltaMode,
        now_ms: u64,
    ) -> bool {
        if !delta_y.is_finite() {
            vwarn!(delta_y, "on_wheel: ignoring non-finite delta");
            return false;
        }
        let delta = match delta_mode {
            WheelDeltaMode::Pixel => delta_y,
            WheelDeltaMode::Line | WheelDeltaMode::Page => delta_y * self.wheel_line_height,
        };
        vtrace!(delta_y, ?delta_mode, delta, now_ms, "on_wheel");
        self.scroll_by(geometry, delta, now_ms);
        true
    }

    pub fn on_touch_start(&mut self, y: f64, now_ms: u64) {
        if !y.is_finite() {
            return;
        }
        vtrace!(y, now_ms, "on_touch_start");
        self.touch.start(y);
        self.touch_input(now_ms);
    }

    /// Applies a touch-move event. Returns `true` when the effective offset or mode may have
    /// changed.
    pub fn on_touch_move(&mut self, geometry: &ScrollGeometry<'_>, y: f64, now_ms: u64) -> bool {
        if !y.is_finite() {
            vwarn!(y, "on_touch_move: ignoring non-finite position");
            return false;
        }
        let delta = self.touch.advance(y);
        vtrace!(y, delta, now_ms, "on_touch_move");
        self.scroll_by(geometry, delta, now_ms);
        true
    }

    pub fn on_touch_end(&mut self, now_ms: u64) {
        vtrace!(now_ms, "on_touch_end");
        self.touch_input(now_ms);
    }

    /// Enters manual mode at `offset` (clamped) and restarts the inactivity timeout.
    ///
    /// Hosts that present a different offset than the engine (an animation, say) use this to
    /// hand the view over without a jump before forwarding the input itself.
    pub fn enter_manual_at(&mut self, geometry: &ScrollGeometry<'_>, offset: f64, now_ms: u64) {
        let offset = self.clamp_offset(geometry, offset);
        vdebug!(offset, now_ms, "enter_manual_at");
        self.manual_offset = Some(offset);
        self.last_input_ms = Some(now_ms);
    }

    /// Reverts to auto mode once the inactivity timeout has elapsed.
    ///
    /// Returns `true` when the mode changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(deadline) = self.inactivity_deadline_ms() else {
            return false;
        };
        if now_ms < deadline {
            return false;
        }
        vdebug!(now_ms, deadline, "manual scroll timed out; back to auto");
        self.manual_offset = None;
        self.last_input_ms = None;
        true
    }

    /// Drops manual mode and any pending timeout.
    pub fn reset(&mut self) {
        self.manual_offset = None;
        self.last_input_ms = None;
        self.touch = TouchTracker::new();
    }

    fn scroll_by(&mut self, geometry: &ScrollGeometry<'_>, delta: f64, now_ms: u64) {
        let base = match self.manual_offset {
            Some(offset) => offset,
            None => {
                let seed = self.auto_offset(geometry);
                vdebug!(seed, "entering manual scroll");
                seed
            }
        };
        self.manual_offset = Some(self.clamp_offset(geometry, base + delta));
        self.last_input_ms = Some(now_ms);
    }

    /// Touch start/end only restart the timeout; they never enter manual mode on their own.
    fn touch_input(&mut self, now_ms: u64) {
        if self.manual_offset.is_some() {
            self.last_input_ms = Some(now_ms);
        }
    }
}

impl fmt::Debug for ScrollOffsetController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollOffsetController")
            .field("align", &self.align)
            .field("anchor_fraction", &self.anchor_fraction)
            .field("custom_strategy", &self.custom_strategy.is_some())
            .field("manual_offset", &self.manual_offset)
            .field("last_input_ms", &self.last_input_ms)
            .field("inactivity_timeout_ms", &self.inactivity_timeout_ms)
            .finish_non_exhaustive()
    }
}

fn sanitize_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}
