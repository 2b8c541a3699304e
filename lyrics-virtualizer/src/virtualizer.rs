use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;
use core::iter::FusedIterator;

use crate::range;
use crate::scroll::{ScrollGeometry, SharedAlignStrategy};
use crate::{
    Align, AlignStrategy, ContainerSize, FrameState, RowDescriptor, RowHeightCache, RowRange,
    ScrollMode, ScrollOffsetController, ScrollState, SizeObserver, VirtualizerOptions,
    WheelDeltaMode,
};

/// A callback fired after a state update that may change the rendered rows.
pub type OnChangeCallback = Arc<dyn Fn(&LyricsVirtualizer) + Send + Sync>;

/// A headless lyrics virtualizer.
///
/// Composes the row height cache, the container size observer and the scroll offset
/// controller, and renders them into [`RowDescriptor`]s. It holds no UI objects: the host feeds
/// it resize notifications, row measurements, active range updates and wheel/touch input, and
/// calls [`Self::tick`] so the measurement debounce and the manual-scroll timeout can fire.
///
/// Time is passed in explicitly as a monotonic `now_ms`.
///
/// After [`Self::unmount`] every mutator is a no-op and the virtualizer renders nothing, so
/// late callbacks from the host are harmless.
#[derive(Clone)]
pub struct LyricsVirtualizer {
    options: VirtualizerOptions,
    heights: RowHeightCache,
    size: SizeObserver,
    scroll: ScrollOffsetController,
    active_range: RowRange,
    mounted: bool,

    on_change: Option<OnChangeCallback>,
    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl LyricsVirtualizer {
    pub fn new(options: VirtualizerOptions) -> Self {
        vdebug!(
            row_count = options.row_count,
            estimated_row_height = options.estimated_row_height,
            buffer_rows = options.buffer_rows,
            "LyricsVirtualizer::new"
        );
        let heights = RowHeightCache::new(
            options.row_count,
            options.estimated_row_height,
            options.measure_debounce_ms,
        );
        let scroll = ScrollOffsetController::new(options.align, options.anchor_fraction)
            .with_inactivity_timeout_ms(options.inactivity_timeout_ms)
            .with_wheel_line_height(options.wheel_line_height);
        Self {
            options,
            heights,
            size: SizeObserver::new(),
            scroll,
            active_range: RowRange::default(),
            mounted: true,
            on_change: None,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &VirtualizerOptions {
        &self.options
    }

    /// Applies new options, rebuilding only what changed.
    ///
    /// A change of `row_count` or `estimated_row_height` resets all row heights.
    pub fn set_options(&mut self, options: VirtualizerOptions) {
        if !self.mounted {
            return;
        }
        let reset_rows = options.row_count != self.options.row_count
            || options.estimated_row_height != self.options.estimated_row_height;
        self.options = options;
        vtrace!(
            row_count = self.options.row_count,
            reset_rows,
            "LyricsVirtualizer::set_options"
        );

        if reset_rows {
            self.heights.initialize(self.options.row_count, self.options.estimated_row_height);
        }
        self.heights.set_debounce_ms(self.options.measure_debounce_ms);
        self.scroll.set_alignment(self.options.align, self.options.anchor_fraction);
        self.scroll.set_inactivity_timeout_ms(self.options.inactivity_timeout_ms);
        self.scroll.set_wheel_line_height(self.options.wheel_line_height);
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut VirtualizerOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(&mut self, on_change: Option<impl Fn(&Self) + Send + Sync + 'static>) {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// A typical frame delivers a resize, a few measurements and an active range change at
    /// once; without batching each setter would notify separately.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tears the virtualizer down: pending debounce and timeout are cancelled and further
    /// events are ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        vdebug!("LyricsVirtualizer::unmount");
        self.heights.cancel_pending();
        self.scroll.reset();
        self.mounted = false;
        self.notify();
    }

    /// Resets every row to `estimated_row_height`. Measured heights are discarded.
    pub fn initialize(&mut self, row_count: usize, estimated_row_height: f64) {
        if !self.mounted {
            return;
        }
        self.options.row_count = row_count;
        self.options.estimated_row_height = estimated_row_height;
        self.heights.initialize(row_count, estimated_row_height);
        self.notify();
    }

    pub fn row_count(&self) -> usize {
        self.heights.row_count()
    }

    /// Records a row's measured height. The prefix sums pick it up once the debounce window
    /// closes (see [`Self::tick`]) or on [`Self::flush_measurements`].
    pub fn report_measured(&mut self, index: usize, height: f64, now_ms: u64) -> bool {
        if !self.mounted {
            return false;
        }
        self.heights.report_measured(index, height, now_ms)
    }

    /// Folds pending measurements into the prefix sums immediately.
    pub fn flush_measurements(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let flushed = self.heights.flush();
        if flushed {
            self.notify();
        }
        flushed
    }

    pub fn has_pending_measurements(&self) -> bool {
        self.heights.is_dirty()
    }

    /// Number of prefix-sum rebuilds caused by measurements so far.
    pub fn recompute_count(&self) -> u64 {
        self.heights.recompute_count()
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        if !self.mounted {
            return;
        }
        if self.size.observe(ContainerSize::new(width, height)) {
            vtrace!(width, height, "set_container_size");
            self.notify();
        }
    }

    pub fn container_size(&self) -> ContainerSize {
        self.size.size()
    }

    /// Sets the rows currently considered active by playback.
    ///
    /// Never changes the scroll mode: during manual scrolling the auto offset keeps tracking
    /// the range silently.
    pub fn set_active_range(&mut self, start_index: usize, end_index: usize) {
        if !self.mounted {
            return;
        }
        let range = RowRange::new(start_index, end_index);
        if self.active_range == range {
            return;
        }
        vtrace!(start_index, end_index, "set_active_range");
        self.active_range = range;
        self.notify();
    }

    /// The active range clamped to the current row count.
    pub fn active_range(&self) -> RowRange {
        self.active_range.clamped(self.heights.row_count())
    }

    pub fn set_alignment(&mut self, align: Align, anchor_fraction: f64) {
        if !self.mounted {
            return;
        }
        if self.scroll.set_alignment(align, anchor_fraction) {
            self.options.align = align;
            self.options.anchor_fraction = self.scroll.anchor_fraction();
            self.notify();
        }
    }

    /// Replaces the built-in alignment with a custom strategy.
    pub fn set_align_strategy(&mut self, strategy: impl AlignStrategy + Send + Sync + 'static) {
        if !self.mounted {
            return;
        }
        self.scroll.set_align_strategy(Some(Arc::new(strategy) as SharedAlignStrategy));
        self.notify();
    }

    /// Drops a custom strategy installed with [`Self::set_align_strategy`].
    pub fn clear_align_strategy(&mut self) {
        if !self.mounted || !self.scroll.has_custom_strategy() {
            return;
        }
        self.scroll.set_align_strategy(None);
        self.notify();
    }

    pub fn on_wheel(&mut self, delta_y: f64, delta_mode: WheelDeltaMode, now_ms: u64) {
        if !self.mounted {
            return;
        }
        let geometry = geometry(&self.heights, &self.size, self.active_range);
        if self.scroll.on_wheel(&geometry, delta_y, delta_mode, now_ms) {
            self.notify();
        }
    }

    pub fn on_touch_start(&mut self, y: f64, now_ms: u64) {
        if !self.mounted {
            return;
        }
        self.scroll.on_touch_start(y, now_ms);
    }

    pub fn on_touch_move(&mut self, y: f64, now_ms: u64) {
        if !self.mounted {
            return;
        }
        let geometry = geometry(&self.heights, &self.size, self.active_range);
        if self.scroll.on_touch_move(&geometry, y, now_ms) {
            self.notify();
        }
    }

    pub fn on_touch_end(&mut self, now_ms: u64) {
        if !self.mounted {
            return;
        }
        self.scroll.on_touch_end(now_ms);
    }

    /// Switches to manual scrolling at `offset`, clamped to the scroll bounds.
    ///
    /// Useful when the host renders at an offset the engine does not know about, e.g. midway
    /// through an animation, and the user grabs the view.
    pub fn enter_manual_at(&mut self, offset: f64, now_ms: u64) {
        if !self.mounted {
            return;
        }
        let geometry = geometry(&self.heights, &self.size, self.active_range);
        self.scroll.enter_manual_at(&geometry, offset, now_ms);
        self.notify();
    }

    /// Fires any due timers: the measurement flush and the manual-scroll timeout.
    ///
    /// Returns `true` when the rendered output may have changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.mounted {
            return false;
        }
        let flushed = self.heights.flush_due(now_ms);
        let reverted = self.scroll.tick(now_ms);
        let changed = flushed || reverted;
        if changed {
            self.notify();
        }
        changed
    }

    /// The earliest pending timer deadline, for hosts that schedule a wake-up instead of
    /// ticking every frame.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        if !self.mounted {
            return None;
        }
        match (
            self.heights.flush_deadline_ms(),
            self.scroll.inactivity_deadline_ms(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_manual_scroll_active(&self) -> bool {
        self.scroll.is_manual()
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        self.scroll.mode()
    }

    pub fn align(&self) -> Align {
        self.scroll.align()
    }

    pub fn anchor_fraction(&self) -> f64 {
        self.scroll.anchor_fraction()
    }

    /// The offset rows are currently rendered with.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.effective_offset(&self.geometry())
    }

    /// The offset auto mode would use right now, regardless of the current mode.
    pub fn auto_offset(&self) -> f64 {
        self.scroll.auto_offset(&self.geometry())
    }

    pub fn min_scroll_offset(&self) -> f64 {
        self.scroll.min_offset(&self.geometry())
    }

    pub fn max_scroll_offset(&self) -> f64 {
        self.scroll.max_offset(&self.geometry())
    }

    pub fn prefix_heights(&self) -> &[f64] {
        self.heights.prefix_heights()
    }

    pub fn row_height(&self, index: usize) -> Option<f64> {
        self.heights.row_height(index)
    }

    pub fn row_top(&self, index: usize) -> Option<f64> {
        (index < self.heights.row_count()).then(|| self.heights.row_top(index))
    }

    pub fn total_height(&self) -> f64 {
        self.heights.total_height()
    }

    /// Rows to render for the current offset (visible window plus buffer).
    pub fn render_range(&self) -> RowRange {
        self.render_range_for(self.scroll_offset())
    }

    /// Rows to render if the viewport were scrolled to `scroll_offset`.
    pub fn render_range_for(&self, scroll_offset: f64) -> RowRange {
        if !self.mounted {
            return RowRange::default();
        }
        range::resolve(
            scroll_offset,
            self.heights.prefix_heights(),
            self.size.height(),
            self.options.buffer_rows,
        )
    }

    /// The rows to render this pass, in index order.
    ///
    /// The iterator borrows the virtualizer and carries no state of its own; calling this
    /// again (or cloning the iterator) restarts it.
    pub fn visible_rows(&self) -> VisibleRows<'_> {
        self.visible_rows_for(self.scroll_offset())
    }

    /// Same as [`Self::visible_rows`], but rendered at an explicit `scroll_offset` (e.g. an
    /// adapter animating toward the effective offset).
    pub fn visible_rows_for(&self, scroll_offset: f64) -> VisibleRows<'_> {
        let range = self.render_range_for(scroll_offset);
        VisibleRows {
            prefix: self.heights.prefix_heights(),
            heights: self.heights.heights(),
            active: self.active_range(),
            scroll_offset,
            is_manual_scroll_active: self.scroll.is_manual(),
            next: range.start_index,
            end: range.end_index,
        }
    }

    pub fn for_each_visible_row(&self, f: impl FnMut(RowDescriptor)) {
        self.visible_rows().for_each(f);
    }

    /// Collects the rows to render into `out` (clears `out` first).
    pub fn collect_visible_rows(&self, out: &mut Vec<RowDescriptor>) {
        out.clear();
        out.extend(self.visible_rows());
    }

    pub fn scroll_state(&self) -> ScrollState {
        let geometry = self.geometry();
        ScrollState {
            mode: self.scroll.mode(),
            offset: self.scroll.effective_offset(&geometry),
            auto_offset: self.scroll.auto_offset(&geometry),
        }
    }

    /// Returns a snapshot of everything that determines the current render pass.
    pub fn frame_state(&self) -> FrameState {
        let scroll = self.scroll_state();
        FrameState {
            container: self.size.size(),
            scroll,
            active_range: self.active_range(),
            render_range: self.render_range_for(scroll.offset),
            total_height: self.heights.total_height(),
        }
    }

    pub fn scroll_controller(&self) -> &ScrollOffsetController {
        &self.scroll
    }

    pub fn height_cache(&self) -> &RowHeightCache {
        &self.heights
    }

    fn geometry(&self) -> ScrollGeometry<'_> {
        geometry(&self.heights, &self.size, self.active_range)
    }
}

fn geometry<'a>(
    heights: &'a RowHeightCache,
    size: &SizeObserver,
    active_range: RowRange,
) -> ScrollGeometry<'a> {
    ScrollGeometry {
        prefix_heights: heights.prefix_heights(),
        container_height: size.height(),
        active_range,
    }
}

impl fmt::Debug for LyricsVirtualizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LyricsVirtualizer")
            .field("options", &self.options)
            .field("container", &self.size.size())
            .field("active_range", &self.active_range)
            .field("scroll", &self.scroll)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

/// Iterator over the [`RowDescriptor`]s of one render pass.
#[derive(Clone, Debug)]
pub struct VisibleRows<'a> {
    prefix: &'a [f64],
    heights: &'a [f64],
    active: RowRange,
    scroll_offset: f64,
    is_manual_scroll_active: bool,
    next: usize,
    end: usize,
}

impl Iterator for VisibleRows<'_> {
    type Item = RowDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(RowDescriptor {
            index,
            relative_position: self.active.relative_position(index),
            top: self.prefix[index] - self.scroll_offset,
            height: self.heights[index],
            is_manual_scroll_active: self.is_manual_scroll_active,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end.saturating_sub(self.next);
        (n, Some(n))
    }
}

impl ExactSizeIterator for VisibleRows<'_> {}

impl FusedIterator for VisibleRows<'_> {}
