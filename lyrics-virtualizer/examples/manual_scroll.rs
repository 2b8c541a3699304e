// Example: the user scrolls away with the wheel, then control returns to the synced position.
use lyrics_virtualizer::{LyricsVirtualizer, ScrollMode, VirtualizerOptions, WheelDeltaMode};

fn main() {
    let options = VirtualizerOptions::new(120).with_estimated_row_height(32.0);
    let mut v = LyricsVirtualizer::new(options);
    v.set_container_size(400.0, 320.0);
    v.set_active_range(30, 31);
    println!("auto: offset={}", v.scroll_offset());

    // Three wheel notches (DOM deltaMode = 1, line units).
    for (i, now_ms) in [1_000u64, 1_040, 1_080].into_iter().enumerate() {
        v.on_wheel(-1.0, WheelDeltaMode::Line, now_ms);
        println!(
            "wheel #{}: mode={:?} offset={} deadline={:?}",
            i + 1,
            v.scroll_mode(),
            v.scroll_offset(),
            v.next_deadline_ms()
        );
    }

    // Playback moves on underneath; the manual view stays put.
    v.set_active_range(33, 34);
    println!(
        "playback advanced: offset={} auto_offset={}",
        v.scroll_offset(),
        v.auto_offset()
    );

    let mut now_ms = 1_080;
    while v.scroll_mode() == ScrollMode::Manual {
        now_ms += 500;
        v.tick(now_ms);
    }
    println!("t={now_ms}: back to auto, offset={}", v.scroll_offset());
}
