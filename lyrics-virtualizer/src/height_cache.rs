use alloc::vec::Vec;

/// Per-row heights plus their prefix sums.
///
/// `prefix_heights()` has `row_count + 1` entries: `prefix[0] == 0` and
/// `prefix[k] == prefix[k - 1] + height[k - 1]`.
///
/// Measurements are applied to the height table immediately, but the prefix sums are only
/// rebuilt once the debounce window closes (see [`Self::flush_due`]) so a burst of reports from
/// one layout pass costs a single `O(n)` rebuild.
#[derive(Clone, Debug)]
pub struct RowHeightCache {
    heights: Vec<f64>,
    prefix: Vec<f64>,
    dirty: bool,
    flush_deadline_ms: Option<u64>,
    debounce_ms: u64,
    recompute_count: u64,
}

impl RowHeightCache {
    pub fn new(row_count: usize, estimated_row_height: f64, debounce_ms: u64) -> Self {
        let mut cache = Self {
            heights: Vec::new(),
            prefix: Vec::new(),
            dirty: false,
            flush_deadline_ms: None,
            debounce_ms,
            recompute_count: 0,
        };
        cache.initialize(row_count, estimated_row_height);
        cache
    }

    /// Resets every row to `estimated_row_height`, discarding all measurements.
    ///
    /// Any pending flush is cancelled: the prefix sums are rebuilt here directly.
    pub fn initialize(&mut self, row_count: usize, estimated_row_height: f64) {
        let estimate = sanitize_height(estimated_row_height).unwrap_or(0.0);
        vdebug!(row_count, estimate, "RowHeightCache::initialize");

        self.heights.clear();
        self.heights.resize(row_count, estimate);

        self.prefix.clear();
        self.prefix.reserve_exact(row_count + 1);
        self.prefix.extend((0..=row_count).map(|i| i as f64 * estimate));

        self.dirty = false;
        self.flush_deadline_ms = None;
    }

    pub fn row_count(&self) -> usize {
        self.heights.len()
    }

    pub fn row_height(&self, index: usize) -> Option<f64> {
        self.heights.get(index).copied()
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    pub fn prefix_heights(&self) -> &[f64] {
        &self.prefix
    }

    /// Top offset of `index` (`prefix[index]`); clamped to the content bottom.
    pub fn row_top(&self, index: usize) -> f64 {
        let i = index.min(self.heights.len());
        self.prefix[i]
    }

    pub fn total_height(&self) -> f64 {
        self.prefix[self.heights.len()]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of prefix-sum rebuilds caused by measurements.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    pub fn set_debounce_ms(&mut self, debounce_ms: u64) {
        self.debounce_ms = debounce_ms;
    }

    /// Pending flush deadline, if any measurement is waiting to be folded in.
    pub fn flush_deadline_ms(&self) -> Option<u64> {
        self.flush_deadline_ms
    }

    /// Records a measured height for `index`.
    ///
    /// Returns `true` when the value differed from the cached one. Unchanged values are a
    /// no-op and do not push the flush deadline back, so re-measuring on every paint is cheap.
    pub fn report_measured(&mut self, index: usize, height: f64, now_ms: u64) -> bool {
        let Some(slot) = self.heights.get_mut(index) else {
            vwarn!(
                index,
                row_count = self.heights.len(),
                "report_measured: index out of range"
            );
            return false;
        };
        let Some(height) = sanitize_height(height) else {
            vwarn!(index, height, "report_measured: ignoring unusable height");
            return false;
        };
        if *slot == height {
            return false;
        }
        vtrace!(index, from = *slot, to = height, "report_measured");
        *slot = height;
        self.dirty = true;
        self.flush_deadline_ms = Some(now_ms.saturating_add(self.debounce_ms));
        true
    }

    /// Rebuilds the prefix sums if the debounce window has closed.
    ///
    /// Returns `true` when a rebuild happened.
    pub fn flush_due(&mut self, now_ms: u64) -> bool {
        match self.flush_deadline_ms {
            Some(deadline) if now_ms >= deadline => self.flush(),
            _ => false,
        }
    }

    /// Rebuilds the prefix sums now if any measurement is pending.
    pub fn flush(&mut self) -> bool {
        self.flush_deadline_ms = None;
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.rebuild_prefix();
        true
    }

    /// Drops the pending deadline without touching the heights.
    pub fn cancel_pending(&mut self) {
        self.flush_deadline_ms = None;
    }

    fn rebuild_prefix(&mut self) {
        self.prefix.clear();
        self.prefix.push(0.0);
        let mut acc = 0.0;
        for &h in &self.heights {
            acc += h;
            self.prefix.push(acc);
        }
        self.recompute_count = self.recompute_count.saturating_add(1);
        debug_assert!(
            self.prefix.windows(2).all(|w| w[0] <= w[1]),
            "prefix heights must be non-decreasing"
        );
        vdebug!(
            rows = self.heights.len(),
            total = acc,
            recompute_count = self.recompute_count,
            "rebuilt prefix heights"
        );
    }
}

fn sanitize_height(height: f64) -> Option<f64> {
    (height.is_finite() && height >= 0.0).then_some(height)
}
