// Example: a burst of measurements from one layout pass costs one prefix rebuild.
use lyrics_virtualizer::{LyricsVirtualizer, VirtualizerOptions};

fn main() {
    let mut v = LyricsVirtualizer::new(
        VirtualizerOptions::new(1_000)
            .with_estimated_row_height(20.0)
            .with_measure_debounce_ms(100),
    );
    v.set_container_size(320.0, 600.0);
    v.set_active_range(0, 1);

    let mut now_ms = 0;
    for i in 0..v.render_range().end_index {
        now_ms += 2;
        v.report_measured(i, 20.0 + (i % 4) as f64 * 6.0, now_ms);
    }
    println!(
        "reported rows 0..{} pending={} deadline={:?}",
        v.render_range().end_index,
        v.has_pending_measurements(),
        v.next_deadline_ms()
    );

    while v.has_pending_measurements() {
        now_ms += 16;
        v.tick(now_ms);
    }
    println!(
        "t={now_ms}: recompute_count={} total_height={}",
        v.recompute_count(),
        v.total_height()
    );
}
