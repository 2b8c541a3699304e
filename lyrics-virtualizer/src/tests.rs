use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;

/// Three rows measured as `[10, 20, 30]`, container height 20, active range `[1, 2)`.
fn three_rows(align: Align, anchor_fraction: f64, buffer_rows: usize) -> LyricsVirtualizer {
    let mut v = LyricsVirtualizer::new(
        VirtualizerOptions::new(3)
            .with_estimated_row_height(10.0)
            .with_buffer_rows(buffer_rows)
            .with_alignment(align, anchor_fraction),
    );
    v.set_container_size(100.0, 20.0);
    v.report_measured(1, 20.0, 0);
    v.report_measured(2, 30.0, 0);
    v.flush_measurements();
    v.set_active_range(1, 2);
    v
}

fn uniform(row_count: usize, row_height: f64, container_height: f64) -> LyricsVirtualizer {
    let mut v = LyricsVirtualizer::new(
        VirtualizerOptions::new(row_count)
            .with_estimated_row_height(row_height)
            .with_alignment(Align::Start, 0.0),
    );
    v.set_container_size(320.0, container_height);
    v
}

#[test]
fn prefix_heights_follow_measurements() {
    let mut cache = RowHeightCache::new(3, 10.0, 100);
    assert_eq!(cache.prefix_heights(), &[0.0, 10.0, 20.0, 30.0]);

    assert!(cache.report_measured(1, 20.0, 0));
    assert!(cache.report_measured(2, 30.0, 0));
    // Not folded in until the batch is flushed.
    assert_eq!(cache.prefix_heights(), &[0.0, 10.0, 20.0, 30.0]);
    assert_eq!(cache.row_height(2), Some(30.0));

    assert!(cache.flush());
    assert_eq!(cache.prefix_heights(), &[0.0, 10.0, 30.0, 60.0]);
    assert_eq!(cache.total_height(), 60.0);
}

#[test]
fn initialize_is_a_full_reset() {
    let mut cache = RowHeightCache::new(2, 10.0, 100);
    cache.report_measured(0, 50.0, 0);
    cache.flush();
    assert_eq!(cache.total_height(), 60.0);

    cache.initialize(4, 25.0);
    assert_eq!(cache.heights(), &[25.0; 4]);
    assert_eq!(cache.prefix_heights(), &[0.0, 25.0, 50.0, 75.0, 100.0]);
    assert!(!cache.is_dirty());
    assert_eq!(cache.flush_deadline_ms(), None);
}

#[test]
fn report_measured_ignores_degenerate_input() {
    let mut cache = RowHeightCache::new(2, 10.0, 100);
    assert!(!cache.report_measured(2, 40.0, 0));
    assert!(!cache.report_measured(usize::MAX, 40.0, 0));
    assert!(!cache.report_measured(0, f64::NAN, 0));
    assert!(!cache.report_measured(0, f64::INFINITY, 0));
    assert!(!cache.report_measured(0, -1.0, 0));
    assert!(!cache.is_dirty());
    assert_eq!(cache.heights(), &[10.0, 10.0]);
}

#[test]
fn report_measured_is_idempotent() {
    let mut cache = RowHeightCache::new(2, 10.0, 100);
    assert!(!cache.report_measured(0, 10.0, 0));
    assert!(!cache.is_dirty());

    assert!(cache.report_measured(0, 12.0, 0));
    assert!(!cache.report_measured(0, 12.0, 50));
    // An unchanged re-measure must not push the deadline back.
    assert_eq!(cache.flush_deadline_ms(), Some(100));
}

#[test]
fn a_burst_of_measurements_rebuilds_prefix_once() {
    let mut v = uniform(200, 20.0, 400.0);
    for i in 0..50 {
        v.report_measured(i, 24.0 + (i % 3) as f64, i as u64);
    }
    assert_eq!(v.recompute_count(), 0);
    assert!(v.has_pending_measurements());

    // Last report at t=49 restarted the 100ms window.
    assert!(!v.tick(148));
    assert_eq!(v.recompute_count(), 0);

    assert!(v.tick(149));
    assert_eq!(v.recompute_count(), 1);
    assert!(!v.has_pending_measurements());

    assert!(!v.tick(1_000));
    assert_eq!(v.recompute_count(), 1);

    let expected: f64 = (0..50).map(|i| 24.0 + (i % 3) as f64).sum::<f64>() + 150.0 * 20.0;
    assert_eq!(v.total_height(), expected);
}

#[test]
fn flush_without_changes_does_not_count() {
    let mut cache = RowHeightCache::new(5, 10.0, 100);
    assert!(!cache.flush());
    assert!(!cache.flush_due(10_000));
    assert_eq!(cache.recompute_count(), 0);
}

#[test]
fn size_observer_ignores_collapse_after_real_size() {
    let mut s = SizeObserver::new();
    assert!(!s.has_observed_size());

    // Nothing real seen yet: zero is accepted (and equal to the default).
    assert!(!s.observe(ContainerSize::new(0.0, 0.0)));
    assert!(s.observe(ContainerSize::new(300.0, 0.0)));
    assert!(!s.has_observed_size());

    assert!(s.observe(ContainerSize::new(300.0, 600.0)));
    assert!(s.has_observed_size());

    assert!(!s.observe(ContainerSize::new(0.0, 0.0)));
    assert!(!s.observe(ContainerSize::new(300.0, 0.0)));
    assert!(!s.observe(ContainerSize::new(f64::NAN, 400.0)));
    assert_eq!(s.size(), ContainerSize::new(300.0, 600.0));

    assert!(s.observe(ContainerSize::new(320.0, 640.0)));
    assert_eq!(s.height(), 640.0);
}

#[test]
fn collapsed_container_does_not_move_the_offset() {
    let mut v = three_rows(Align::Center, 0.5, 0);
    let before = v.scroll_offset();
    v.set_container_size(0.0, 0.0);
    assert_eq!(v.container_size(), ContainerSize::new(100.0, 20.0));
    assert_eq!(v.scroll_offset(), before);
}

#[test]
fn resolve_exact_boundaries() {
    let prefix = [0.0, 10.0, 30.0, 60.0];
    assert_eq!(range::resolve(10.0, &prefix, 20.0, 0), RowRange::new(1, 2));
}

#[test]
fn resolve_rounds_top_down_and_bottom_up() {
    let prefix = [0.0, 10.0, 30.0, 60.0];
    // Top at 15 falls inside row 1; bottom at 25 also inside row 1.
    assert_eq!(range::resolve(15.0, &prefix, 10.0, 0), RowRange::new(1, 2));
    // Bottom at 35 falls inside row 2.
    assert_eq!(range::resolve(15.0, &prefix, 20.0, 0), RowRange::new(1, 3));
    // Top at 5 falls inside row 0.
    assert_eq!(range::resolve(5.0, &prefix, 1.0, 0), RowRange::new(0, 1));
}

#[test]
fn resolve_applies_buffer_and_clamps() {
    let prefix: Vec<f64> = (0..=100).map(|i| i as f64 * 10.0).collect();
    assert_eq!(
        range::resolve(500.0, &prefix, 100.0, 5),
        RowRange::new(45, 65)
    );
    assert_eq!(range::resolve(0.0, &prefix, 100.0, 5), RowRange::new(0, 15));
    assert_eq!(
        range::resolve(950.0, &prefix, 100.0, 5),
        RowRange::new(90, 100)
    );
}

#[test]
fn resolve_handles_windows_outside_the_content() {
    let prefix = [0.0, 10.0, 30.0, 60.0];
    // Entirely above the content.
    assert_eq!(range::resolve(-50.0, &prefix, 20.0, 0), RowRange::new(0, 0));
    // Straddling the top.
    assert_eq!(range::resolve(-10.0, &prefix, 20.0, 0), RowRange::new(0, 1));
    // Entirely below the content.
    assert_eq!(range::resolve(100.0, &prefix, 20.0, 0), RowRange::new(3, 3));
    assert_eq!(range::resolve(100.0, &prefix, 20.0, 2), RowRange::new(1, 3));
}

#[test]
fn resolve_degenerate_inputs() {
    assert!(range::resolve(0.0, &[0.0], 100.0, 5).is_empty());
    assert!(range::resolve(0.0, &[], 100.0, 5).is_empty());
    let prefix = [0.0, 10.0, 30.0, 60.0];
    assert_eq!(
        range::resolve(f64::NAN, &prefix, 20.0, 0),
        RowRange::new(0, 0)
    );
    assert_eq!(
        range::resolve(10.0, &prefix, f64::NAN, 0),
        RowRange::new(1, 1)
    );
}

#[test]
fn start_alignment_concrete_scenario() {
    let v = three_rows(Align::Start, 0.0, 0);
    assert_eq!(v.prefix_heights(), &[0.0, 10.0, 30.0, 60.0]);
    assert_eq!(v.auto_offset(), 10.0);
    assert_eq!(v.scroll_offset(), 10.0);
    assert_eq!(v.render_range(), RowRange::new(1, 2));
}

#[test]
fn center_alignment_uses_range_midpoint() {
    // Midpoint of [10, 30) is 20; the anchor line sits at 20 * 0.5 = 10.
    let v = three_rows(Align::Center, 0.5, 0);
    assert_eq!(v.auto_offset(), 10.0);

    let v = three_rows(Align::Center, 0.0, 0);
    assert_eq!(v.auto_offset(), 20.0);
}

#[test]
fn end_alignment_pins_bottom_of_range() {
    let v = three_rows(Align::End, 1.0, 0);
    // prefix[2] = 30, anchor = 20.
    assert_eq!(v.auto_offset(), 10.0);
}

#[test]
fn start_alignment_with_zero_anchor_is_exact() {
    let mut v = uniform(40, 17.3, 300.0);
    for start in [0usize, 1, 7, 39, 40] {
        v.set_active_range(start, start + 1);
        assert_eq!(v.auto_offset(), v.prefix_heights()[start]);
    }
}

#[test]
fn auto_offset_tracks_active_range() {
    let mut v = uniform(100, 10.0, 200.0);
    v.set_alignment(Align::Start, 0.25);
    v.set_active_range(30, 32);
    assert_eq!(v.auto_offset(), 300.0 - 50.0);
    v.set_active_range(31, 32);
    assert_eq!(v.auto_offset(), 310.0 - 50.0);
}

#[test]
fn active_range_is_clamped_and_reversed_ranges_are_empty() {
    let mut v = uniform(10, 10.0, 50.0);
    v.set_alignment(Align::Center, 0.0);

    v.set_active_range(8, 50);
    assert_eq!(v.active_range(), RowRange::new(8, 10));
    assert_eq!(v.auto_offset(), 90.0);

    v.set_active_range(6, 2);
    assert_eq!(v.active_range(), RowRange::new(6, 6));
    assert_eq!(v.auto_offset(), 60.0);

    v.set_active_range(40, 45);
    assert_eq!(v.active_range(), RowRange::new(10, 10));
    assert_eq!(v.auto_offset(), 100.0);
}

#[test]
fn zero_container_height_means_zero_anchor() {
    let mut v = LyricsVirtualizer::new(VirtualizerOptions::new(0));
    assert_eq!(v.container_size(), ContainerSize::default());
    assert_eq!(v.auto_offset(), 0.0);
    assert_eq!(v.scroll_offset(), 0.0);
    assert_eq!(v.visible_rows().count(), 0);

    v.initialize(5, 10.0);
    v.set_active_range(2, 3);
    // Anchor is 0 without a container; center of [20, 30).
    assert_eq!(v.auto_offset(), 25.0);
    assert_eq!(v.min_scroll_offset(), 0.0);
    assert_eq!(v.max_scroll_offset(), 50.0);
    // A zero-height window still renders the row under the offset plus the buffer.
    assert_eq!(v.render_range(), RowRange::new(0, 5));
}

#[test]
fn anchor_fraction_is_clamped() {
    let mut v = uniform(10, 10.0, 100.0);
    v.set_alignment(Align::Start, 3.0);
    assert_eq!(v.anchor_fraction(), 1.0);
    v.set_alignment(Align::Start, -1.0);
    assert_eq!(v.anchor_fraction(), 0.0);
    v.set_alignment(Align::Start, f64::NAN);
    assert_eq!(v.anchor_fraction(), 0.0);
}

#[test]
fn max_offset_includes_the_last_row() {
    // Regression: the bound is prefix[row_count] - anchor, not prefix[row_count - 1] - anchor.
    let v = three_rows(Align::Start, 0.5, 0);
    assert_eq!(v.min_scroll_offset(), -10.0);
    assert_eq!(v.max_scroll_offset(), 60.0 - 10.0);
    assert_ne!(v.max_scroll_offset(), 30.0 - 10.0);
}

#[test]
fn custom_strategy_overrides_builtin_alignment() {
    struct SecondRowOfRange;
    impl AlignStrategy for SecondRowOfRange {
        fn compute_offset(&self, range: RowRange, prefix: &[f64], anchor: f64) -> f64 {
            let i = (range.start_index + 1).min(range.end_index);
            prefix[i] - anchor
        }
    }

    let mut v = uniform(20, 10.0, 100.0);
    v.set_active_range(4, 8);
    assert_eq!(v.auto_offset(), 40.0);

    v.set_align_strategy(SecondRowOfRange);
    assert_eq!(v.auto_offset(), 50.0);

    v.clear_align_strategy();
    assert_eq!(v.auto_offset(), 40.0);
}

#[test]
fn wheel_in_auto_enters_manual_seeded_from_auto_offset() {
    let mut v = uniform(100, 10.0, 200.0);
    v.set_active_range(20, 21);
    assert_eq!(v.scroll_mode(), ScrollMode::Auto);

    v.on_wheel(100.0, WheelDeltaMode::Pixel, 1_000);
    assert!(v.is_manual_scroll_active());
    assert_eq!(v.scroll_offset(), 300.0);
    assert_eq!(v.auto_offset(), 200.0);

    v.on_wheel(-30.0, WheelDeltaMode::Pixel, 1_100);
    assert_eq!(v.scroll_offset(), 270.0);
}

#[test]
fn wheel_in_auto_is_clamped_on_entry() {
    let mut v = three_rows(Align::Start, 0.0, 0);
    v.on_wheel(100.0, WheelDeltaMode::Pixel, 0);
    // clamp(10 + 100, 0, 60)
    assert_eq!(v.scroll_offset(), 60.0);
    assert_eq!(v.scroll_controller().manual_offset(), Some(60.0));
}

#[test]
fn wheel_line_and_page_units_use_line_height() {
    let mut v = uniform(100, 10.0, 200.0);
    v.on_wheel(2.0, WheelDeltaMode::Line, 0);
    assert_eq!(v.scroll_offset(), 100.0);
    v.on_wheel(-1.0, WheelDeltaMode::Page, 10);
    assert_eq!(v.scroll_offset(), 50.0);

    v.update_options(|o| o.wheel_line_height = 16.0);
    v.on_wheel(1.0, WheelDeltaMode::Line, 20);
    assert_eq!(v.scroll_offset(), 66.0);
}

#[test]
fn non_finite_wheel_delta_is_ignored() {
    let mut v = uniform(100, 10.0, 200.0);
    v.on_wheel(f64::NAN, WheelDeltaMode::Pixel, 0);
    v.on_wheel(f64::INFINITY, WheelDeltaMode::Pixel, 0);
    assert!(!v.is_manual_scroll_active());
}

#[test]
fn manual_mode_reverts_after_inactivity() {
    let mut v = uniform(100, 10.0, 200.0);
    v.set_active_range(10, 11);
    v.on_wheel(50.0, WheelDeltaMode::Pixel, 1_000);
    assert_eq!(v.next_deadline_ms(), Some(6_000));

    // Playback keeps advancing underneath.
    v.set_active_range(40, 41);
    assert!(v.is_manual_scroll_active());
    assert_eq!(v.scroll_offset(), 150.0);

    assert!(!v.tick(5_999));
    assert!(v.is_manual_scroll_active());

    assert!(v.tick(6_000));
    assert!(!v.is_manual_scroll_active());
    assert_eq!(v.scroll_offset(), v.auto_offset());
    assert_eq!(v.scroll_offset(), 400.0);
    assert_eq!(v.next_deadline_ms(), None);
}

#[test]
fn every_input_restarts_the_inactivity_timeout() {
    let mut v = uniform(100, 10.0, 200.0);
    v.on_wheel(10.0, WheelDeltaMode::Pixel, 0);
    v.on_wheel(10.0, WheelDeltaMode::Pixel, 4_000);
    assert!(!v.tick(5_000));
    v.on_touch_start(300.0, 8_000);
    assert!(!v.tick(9_500));
    v.on_touch_end(12_000);
    assert!(!v.tick(16_999));
    assert!(v.tick(17_000));
}

#[test]
fn inactivity_timeout_is_configurable() {
    let mut v = LyricsVirtualizer::new(
        VirtualizerOptions::new(50)
            .with_estimated_row_height(10.0)
            .with_inactivity_timeout_ms(1_500),
    );
    v.set_container_size(100.0, 100.0);
    v.on_wheel(5.0, WheelDeltaMode::Pixel, 0);
    assert!(!v.tick(1_499));
    assert!(v.tick(1_500));
}

#[test]
fn manual_offset_is_clamped_to_current_geometry() {
    let mut v = uniform(100, 10.0, 200.0);
    v.on_wheel(900.0, WheelDeltaMode::Pixel, 0);
    assert_eq!(v.scroll_offset(), 900.0);

    // The lyrics shrink while the user is scrolled near the bottom.
    v.initialize(50, 10.0);
    assert!(v.is_manual_scroll_active());
    assert_eq!(v.scroll_offset(), 500.0);
}

#[test]
fn touch_drag_scrolls_inverted_and_ignores_direction_flips() {
    let mut v = uniform(100, 10.0, 200.0);
    v.set_active_range(30, 31);
    let auto = v.auto_offset();

    v.on_touch_start(100.0, 0);
    assert!(!v.is_manual_scroll_active());

    // First move only establishes the direction.
    v.on_touch_move(90.0, 10);
    assert!(v.is_manual_scroll_active());
    assert_eq!(v.scroll_offset(), auto);

    // Finger moves up: content scrolls down.
    v.on_touch_move(80.0, 20);
    assert_eq!(v.scroll_offset(), auto + 10.0);
    v.on_touch_move(70.0, 30);
    assert_eq!(v.scroll_offset(), auto + 20.0);

    // Reversal: no jump on the flipping move.
    v.on_touch_move(75.0, 40);
    assert_eq!(v.scroll_offset(), auto + 20.0);
    v.on_touch_move(85.0, 50);
    assert_eq!(v.scroll_offset(), auto + 10.0);

    v.on_touch_end(60);
    assert!(v.tick(5_060));
    assert_eq!(v.scroll_offset(), auto);
}

#[test]
fn touch_start_and_end_alone_do_not_enter_manual() {
    let mut v = uniform(100, 10.0, 200.0);
    v.on_touch_start(10.0, 0);
    v.on_touch_end(5);
    assert!(!v.is_manual_scroll_active());
    assert_eq!(v.next_deadline_ms(), None);
}

#[test]
fn enter_manual_at_pins_a_host_offset() {
    let mut v = uniform(100, 10.0, 200.0);
    v.set_active_range(20, 21);

    v.enter_manual_at(5_000.0, 0);
    assert_eq!(v.scroll_mode(), ScrollMode::Manual);
    assert_eq!(v.scroll_controller().manual_offset(), Some(1_000.0));
    assert_eq!(v.next_deadline_ms(), Some(5_000));

    // Input continues from the pinned offset, not from the auto offset.
    v.enter_manual_at(250.0, 100);
    v.on_wheel(-30.0, WheelDeltaMode::Pixel, 200);
    assert_eq!(v.scroll_offset(), 220.0);
    assert_eq!(v.next_deadline_ms(), Some(5_200));

    v.enter_manual_at(-50.0, 300);
    assert_eq!(v.scroll_offset(), 0.0);

    v.unmount();
    v.enter_manual_at(400.0, 400);
    assert!(!v.is_manual_scroll_active());
}

#[test]
fn visible_rows_concrete_scenario() {
    let v = three_rows(Align::Start, 0.0, 0);
    let rows: Vec<_> = v.visible_rows().collect();
    assert_eq!(
        rows,
        vec![RowDescriptor {
            index: 1,
            relative_position: 0,
            top: 0.0,
            height: 20.0,
            is_manual_scroll_active: false,
        }]
    );

    let v = three_rows(Align::Start, 0.0, 5);
    let rows: Vec<_> = v.visible_rows().collect();
    let summary: Vec<_> = rows
        .iter()
        .map(|r| (r.index, r.relative_position, r.top))
        .collect();
    assert_eq!(summary, vec![(0, -1, -10.0), (1, 0, 0.0), (2, 1, 20.0)]);
}

#[test]
fn relative_position_is_signed_distance_to_active_range() {
    let mut v = uniform(30, 10.0, 300.0);
    v.update_options(|o| o.buffer_rows = 30);
    v.set_active_range(10, 13);
    let rel: Vec<_> = v
        .visible_rows()
        .filter(|r| (8..16).contains(&r.index))
        .map(|r| r.relative_position)
        .collect();
    assert_eq!(rel, vec![-2, -1, 0, 0, 0, 1, 2, 3]);
    assert_eq!(v.visible_rows().filter(|r| r.is_active()).count(), 3);
}

#[test]
fn visible_rows_are_restartable_and_deterministic() {
    let mut v = uniform(500, 18.0, 360.0);
    v.set_active_range(200, 203);
    let rows = v.visible_rows();
    assert_eq!(rows.len(), v.render_range().len());

    let first: Vec<_> = rows.clone().collect();
    let second: Vec<_> = rows.collect();
    let third: Vec<_> = v.visible_rows().collect();
    assert_eq!(first, second);
    assert_eq!(first, third);

    let mut out = Vec::new();
    v.collect_visible_rows(&mut out);
    assert_eq!(out, first);
}

#[test]
fn visible_rows_carry_the_manual_flag_and_offset() {
    let mut v = uniform(100, 10.0, 100.0);
    v.set_active_range(50, 51);
    v.on_wheel(-25.0, WheelDeltaMode::Pixel, 0);
    let offset = v.scroll_offset();
    assert_eq!(offset, 475.0);
    for row in v.visible_rows() {
        assert!(row.is_manual_scroll_active);
        assert_eq!(row.top, row.index as f64 * 10.0 - offset);
    }
}

#[test]
fn visible_rows_for_renders_at_an_explicit_offset() {
    let v = uniform(100, 10.0, 100.0);
    let rows: Vec<_> = v.visible_rows_for(250.0).collect();
    assert_eq!(rows.first().map(|r| r.index), Some(20));
    assert_eq!(rows.last().map(|r| r.index), Some(39));
    assert_eq!(rows[5].top, 0.0);
}

#[test]
fn unmount_cancels_timers_and_ignores_late_callbacks() {
    let mut v = uniform(100, 10.0, 200.0);
    v.report_measured(3, 40.0, 0);
    v.on_wheel(10.0, WheelDeltaMode::Pixel, 0);
    assert!(v.next_deadline_ms().is_some());

    v.unmount();
    assert!(!v.is_mounted());
    assert_eq!(v.next_deadline_ms(), None);
    assert!(!v.is_manual_scroll_active());

    // Stale timers and events are no-ops.
    assert!(!v.tick(10_000));
    assert_eq!(v.recompute_count(), 0);
    assert!(!v.report_measured(4, 50.0, 20));
    v.on_wheel(10.0, WheelDeltaMode::Pixel, 30);
    v.set_container_size(10.0, 10.0);
    v.set_active_range(1, 2);
    assert!(!v.is_manual_scroll_active());
    assert_eq!(v.visible_rows().count(), 0);
}

#[test]
fn on_change_is_batched() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut v = uniform(100, 10.0, 200.0);
    v.set_on_change(Some({
        let calls = Arc::clone(&calls);
        move |_: &LyricsVirtualizer| {
            calls.fetch_add(1, Ordering::Relaxed);
        }
    }));

    v.set_active_range(3, 4);
    assert_eq!(calls.load(Ordering::Relaxed), 1);

    // Unchanged inputs do not notify.
    v.set_active_range(3, 4);
    v.set_container_size(320.0, 200.0);
    assert_eq!(calls.load(Ordering::Relaxed), 1);

    v.batch_update(|v| {
        v.set_container_size(320.0, 240.0);
        v.set_active_range(4, 5);
        v.on_wheel(5.0, WheelDeltaMode::Pixel, 0);
    });
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn set_options_only_resets_rows_when_shape_changes() {
    let mut v = uniform(10, 10.0, 100.0);
    v.report_measured(0, 30.0, 0);
    v.flush_measurements();
    assert_eq!(v.total_height(), 120.0);

    v.update_options(|o| o.buffer_rows = 2);
    assert_eq!(v.total_height(), 120.0);

    v.update_options(|o| o.row_count = 12);
    assert_eq!(v.total_height(), 120.0);
    assert_eq!(v.row_height(0), Some(10.0));
}

#[test]
fn frame_state_summarizes_the_render_pass() {
    let mut v = three_rows(Align::Start, 0.0, 0);
    let frame = v.frame_state();
    assert_eq!(frame.container, ContainerSize::new(100.0, 20.0));
    assert_eq!(frame.scroll.mode, ScrollMode::Auto);
    assert_eq!(frame.scroll.offset, 10.0);
    assert_eq!(frame.scroll.auto_offset, 10.0);
    assert_eq!(frame.active_range, RowRange::new(1, 2));
    assert_eq!(frame.render_range, RowRange::new(1, 2));
    assert_eq!(frame.total_height, 60.0);

    v.on_wheel(-10.0, WheelDeltaMode::Pixel, 0);
    let frame = v.frame_state();
    assert_eq!(frame.scroll.mode, ScrollMode::Manual);
    assert_eq!(frame.scroll.offset, 0.0);
    assert_eq!(frame.scroll.auto_offset, 10.0);
    assert_eq!(frame.render_range, RowRange::new(0, 2));
}

#[test]
fn align_parses_from_names() {
    assert_eq!("start".parse::<Align>(), Ok(Align::Start));
    assert_eq!("center".parse::<Align>(), Ok(Align::Center));
    assert_eq!("end".parse::<Align>(), Ok(Align::End));
    let err = "middle".parse::<Align>().unwrap_err();
    assert_eq!(err, ParseAlignError("middle".into()));
    assert!(err.to_string().contains("middle"));
    assert_eq!(Align::End.to_string(), "end");
}

#[test]
fn wheel_delta_mode_from_dom_value() {
    assert_eq!(WheelDeltaMode::try_from(0), Ok(WheelDeltaMode::Pixel));
    assert_eq!(WheelDeltaMode::try_from(1), Ok(WheelDeltaMode::Line));
    assert_eq!(WheelDeltaMode::try_from(2), Ok(WheelDeltaMode::Page));
    assert_eq!(WheelDeltaMode::try_from(3), Err(InvalidDeltaMode(3)));
}

fn heights_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0f64..200.0, 0..60)
}

fn measurements_strategy() -> impl Strategy<Value = Vec<(usize, f64)>> {
    proptest::collection::vec((0usize..80, 0.0f64..300.0), 0..120)
}

fn prefix_of(heights: &[f64]) -> Vec<f64> {
    let mut cache = RowHeightCache::new(heights.len(), 0.0, 0);
    for (i, &h) in heights.iter().enumerate() {
        cache.report_measured(i, h, 0);
    }
    cache.flush();
    cache.prefix_heights().to_vec()
}

proptest! {
    #[test]
    fn prefix_heights_start_at_zero_and_never_decrease(
        row_count in 0usize..60,
        estimate in 0.0f64..100.0,
        measurements in measurements_strategy(),
        flush_every in 1usize..10,
    ) {
        let mut cache = RowHeightCache::new(row_count, estimate, 100);
        for (n, (index, height)) in measurements.into_iter().enumerate() {
            cache.report_measured(index, height, n as u64);
            if n % flush_every == 0 {
                cache.flush();
            }
            let prefix = cache.prefix_heights();
            prop_assert_eq!(prefix.len(), row_count + 1);
            prop_assert_eq!(prefix[0], 0.0);
            prop_assert!(prefix.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn resolved_range_is_ordered_and_in_bounds(
        heights in heights_strategy(),
        offset in -2_000.0f64..20_000.0,
        container in 0.0f64..2_000.0,
        buffer in 0usize..8,
    ) {
        let prefix = prefix_of(&heights);
        let r = range::resolve(offset, &prefix, container, buffer);
        prop_assert!(r.start_index <= r.end_index);
        prop_assert!(r.end_index <= heights.len());
    }

    #[test]
    fn resolved_range_covers_every_row_in_the_window(
        heights in proptest::collection::vec(1.0f64..120.0, 1..60),
        offset_frac in 0.0f64..1.0,
        container in 1.0f64..800.0,
    ) {
        let prefix = prefix_of(&heights);
        let total = prefix[heights.len()];
        let offset = offset_frac * total;
        let r = range::resolve(offset, &prefix, container, 0);
        for i in 0..heights.len() {
            let (top, bottom) = (prefix[i], prefix[i + 1]);
            if bottom > offset && top < offset + container {
                prop_assert!(r.contains(i), "row {} [{}, {}) missing from {:?}", i, top, bottom, r);
            }
        }
    }

    #[test]
    fn manual_offset_stays_within_bounds(
        row_count in 0usize..200,
        row_height in 1.0f64..80.0,
        container in 0.0f64..1_000.0,
        anchor in 0.0f64..=1.0,
        active in 0usize..220,
        deltas in proptest::collection::vec(-50_000.0f64..50_000.0, 1..40),
    ) {
        let mut v = LyricsVirtualizer::new(
            VirtualizerOptions::new(row_count)
                .with_estimated_row_height(row_height)
                .with_alignment(Align::Center, anchor),
        );
        v.set_container_size(400.0, container);
        v.set_active_range(active, active + 2);
        let (min, max) = (v.min_scroll_offset(), v.max_scroll_offset());
        for (t, delta) in deltas.into_iter().enumerate() {
            v.on_wheel(delta, WheelDeltaMode::Pixel, t as u64);
            let manual = v.scroll_controller().manual_offset().unwrap();
            prop_assert!(manual >= min && manual <= max, "{} outside [{}, {}]", manual, min, max);
            prop_assert_eq!(v.scroll_offset(), manual);
        }
    }

    #[test]
    fn relative_position_sign_matches_range_membership(
        start in 0usize..50,
        len in 0usize..10,
        index in 0usize..80,
    ) {
        let range = RowRange::new(start, start + len);
        let rel = range.relative_position(index);
        if index < start {
            prop_assert!(rel < 0);
        } else if range.contains(index) {
            prop_assert_eq!(rel, 0);
        } else {
            prop_assert!(rel > 0);
        }
    }
}
