use crate::ContainerSize;

/// Passive record of the scrolling container's size.
///
/// A size with a zero dimension is only accepted while nothing non-zero has been seen yet. After
/// that it is treated as a transient layout collapse (e.g. an ancestor hidden with
/// `display: none`) and dropped, so the last real size keeps driving the offset math.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeObserver {
    size: ContainerSize,
    has_observed_size: bool,
}

impl SizeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial(size: ContainerSize) -> Self {
        let mut observer = Self::new();
        observer.observe(size);
        observer
    }

    pub fn size(&self) -> ContainerSize {
        self.size
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Whether a non-zero size has ever been accepted.
    pub fn has_observed_size(&self) -> bool {
        self.has_observed_size
    }

    /// Applies a resize notification. Returns `true` if the stored size changed.
    pub fn observe(&mut self, size: ContainerSize) -> bool {
        let size = ContainerSize {
            width: finite_or_zero(size.width),
            height: finite_or_zero(size.height),
        };
        if size.is_collapsed() {
            if self.has_observed_size {
                vtrace!(
                    width = size.width,
                    height = size.height,
                    "SizeObserver: ignoring collapsed size"
                );
                return false;
            }
        } else {
            self.has_observed_size = true;
        }
        if self.size == size {
            return false;
        }
        self.size = size;
        true
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
