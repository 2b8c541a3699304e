// Example: minimal usage: measure, follow the active line, render.
use lyrics_virtualizer::{Align, LyricsVirtualizer, VirtualizerOptions};

fn main() {
    let mut v = LyricsVirtualizer::new(
        VirtualizerOptions::new(200)
            .with_estimated_row_height(24.0)
            .with_alignment(Align::Center, 0.4),
    );
    v.set_container_size(360.0, 480.0);

    // The host lays out the rows and reports their real heights; wrapped lines are taller.
    for i in 0..40 {
        let height = if i % 7 == 0 { 48.0 } else { 24.0 };
        v.report_measured(i, height, 0);
    }
    v.flush_measurements();

    v.set_active_range(12, 13);
    println!("total_height={}", v.total_height());
    println!(
        "scroll_offset={} render_range={:?}",
        v.scroll_offset(),
        v.render_range()
    );
    for row in v.visible_rows().filter(|r| r.relative_position.abs() <= 1) {
        println!(
            "row={} rel={} top={} height={}",
            row.index, row.relative_position, row.top, row.height
        );
    }
}
