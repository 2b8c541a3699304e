use lyrics_virtualizer::{LyricsVirtualizer, RowRange, VirtualizerOptions, VisibleRows};

use crate::{Easing, EventError, HostEvent, LyricsTimeline, Tween};

/// Default duration of the animated return to the synced position.
pub const DEFAULT_SNAP_BACK_MS: u64 = 300;

/// A framework-neutral controller that wraps a [`LyricsVirtualizer`] and provides the
/// adapter-side workflows: event routing, playback sync and the snap-back animation.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `dispatch(event, now_ms)` for every host notification
/// - `sync_playback(timeline, position_secs)` whenever the player clock advances
/// - `tick(now_ms)` each frame (timers and the snap-back tween)
///
/// then render [`Self::visible_rows`] at [`Self::presented_offset`].
///
/// When manual scrolling times out the engine switches straight to the auto offset. The
/// controller instead eases from the last manual offset to it; if the auto offset moves while
/// the animation runs (playback advancing, a late measurement) the tween is retargeted without
/// extending its deadline. Wheel or touch input cancels it and continues manual scrolling from
/// the offset on screen.
#[derive(Clone, Debug)]
pub struct Controller {
    v: LyricsVirtualizer,
    tween: Option<Tween>,
    snap_back_ms: u64,
    easing: Easing,
    presented: f64,
}

impl Controller {
    pub fn new(options: VirtualizerOptions) -> Self {
        Self::from_virtualizer(LyricsVirtualizer::new(options))
    }

    pub fn from_virtualizer(v: LyricsVirtualizer) -> Self {
        let presented = v.scroll_offset();
        Self {
            v,
            tween: None,
            snap_back_ms: DEFAULT_SNAP_BACK_MS,
            easing: Easing::default(),
            presented,
        }
    }

    /// Configures the snap-back animation. A zero duration snaps back instantly.
    pub fn with_snap_back(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.snap_back_ms = duration_ms;
        self.easing = easing;
        self
    }

    pub fn virtualizer(&self) -> &LyricsVirtualizer {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut LyricsVirtualizer {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> LyricsVirtualizer {
        self.v
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
        self.presented = self.v.scroll_offset();
    }

    /// The offset the host should render with this frame.
    ///
    /// Equal to the engine's effective offset except while the snap-back tween runs.
    pub fn presented_offset(&self) -> f64 {
        self.presented
    }

    /// The rows to render at [`Self::presented_offset`].
    pub fn visible_rows(&self) -> VisibleRows<'_> {
        self.v.visible_rows_for(self.presented)
    }

    /// Routes one host event to the engine.
    ///
    /// Returns `Ok(true)` when the presented output may have changed. Events carrying an
    /// unknown wheel delta mode or alignment name are rejected without touching any state.
    pub fn dispatch(&mut self, event: HostEvent, now_ms: u64) -> Result<bool, EventError> {
        atrace!(?event, now_ms, "dispatch");

        match event {
            HostEvent::Resize { width, height } => self.v.set_container_size(width, height),
            HostEvent::Measured { index, height } => {
                self.v.report_measured(index, height, now_ms);
            }
            HostEvent::Wheel {
                delta_y,
                delta_mode,
            } => {
                let delta_mode = HostEvent::wheel_delta_mode(delta_mode)?;
                self.take_over(now_ms);
                self.v.on_wheel(delta_y, delta_mode, now_ms);
            }
            HostEvent::TouchStart { y } => {
                self.take_over(now_ms);
                self.v.on_touch_start(y, now_ms);
            }
            HostEvent::TouchMove { y } => {
                self.take_over(now_ms);
                self.v.on_touch_move(y, now_ms);
            }
            HostEvent::TouchEnd => {
                self.take_over(now_ms);
                self.v.on_touch_end(now_ms);
            }
            HostEvent::ActiveRange {
                start_index,
                end_index,
            } => self.v.set_active_range(start_index, end_index),
            HostEvent::Alignment {
                align,
                anchor_fraction,
            } => {
                let align = HostEvent::align(&align)?;
                self.v.set_alignment(align, anchor_fraction);
            }
        }

        Ok(self.refresh(now_ms))
    }

    /// Points the engine at the lines sung at `position_secs`.
    ///
    /// Returns the active range that was applied.
    pub fn sync_playback(
        &mut self,
        timeline: &LyricsTimeline,
        position_secs: f64,
        now_ms: u64,
    ) -> RowRange {
        let range = timeline.active_range_at(position_secs);
        self.v.set_active_range(range.start_index, range.end_index);
        self.refresh(now_ms);
        range
    }

    /// Advances timers and the snap-back tween.
    ///
    /// Returns `true` when the host should repaint.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let was_manual = self.v.is_manual_scroll_active();
        let last_manual = self.v.scroll_offset();

        let mut changed = self.v.tick(now_ms);

        if was_manual && !self.v.is_manual_scroll_active() && self.snap_back_ms > 0 {
            let to = self.v.auto_offset();
            adebug!(from = last_manual, to, now_ms, "snap-back");
            self.tween = Some(Tween::new(
                last_manual,
                to,
                now_ms,
                self.snap_back_ms,
                self.easing,
            ));
        }

        if self.tween.is_some() {
            changed = true;
        }
        self.refresh(now_ms) || changed
    }

    /// Cancels the animation and unmounts the engine. Later calls are no-ops.
    pub fn unmount(&mut self) {
        self.tween = None;
        self.v.unmount();
        self.presented = self.v.scroll_offset();
    }

    /// Stops the snap-back and pins manual mode at the offset currently on screen.
    fn take_over(&mut self, now_ms: u64) {
        if self.tween.take().is_some() {
            adebug!(offset = self.presented, now_ms, "snap-back cancelled by user input");
            self.v.enter_manual_at(self.presented, now_ms);
        }
    }

    /// Re-derives the presented offset; retargets or finishes the tween as needed.
    fn refresh(&mut self, now_ms: u64) -> bool {
        let before = self.presented;
        let target = self.v.scroll_offset();

        // A wheel or touch already took over; nothing to animate toward.
        if self.v.is_manual_scroll_active() {
            self.tween = None;
        }

        let mut finished = false;
        self.presented = match &mut self.tween {
            Some(tween) => {
                if tween.to != target {
                    atrace!(from = tween.to, to = target, "snap-back retarget");
                    let remaining = tween.remaining_ms(now_ms);
                    tween.retarget(now_ms, target, remaining);
                }
                finished = tween.is_done(now_ms);
                tween.sample(now_ms)
            }
            None => target,
        };
        if finished {
            self.tween = None;
        }
        self.presented != before
    }
}
