use lyrics_virtualizer::{Align, VirtualizerOptions};
use lyrics_virtualizer_adapter::{Controller, Easing, HostEvent, LineTiming, LyricsTimeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: a karaoke view driven by a player clock.
    //
    // An adapter would:
    // - forward resize/measure/wheel/touch notifications as `HostEvent`s
    // - call sync_playback() with the player position and tick() every frame
    // - render visible_rows() at presented_offset()
    let lines: Vec<LineTiming> = (0..60)
        .map(|i| LineTiming::new(i as f64 * 2.5))
        .collect();
    let timeline = LyricsTimeline::new(&lines);

    let mut c = Controller::new(
        VirtualizerOptions::new(lines.len())
            .with_estimated_row_height(28.0)
            .with_alignment(Align::Center, 0.35),
    )
    .with_snap_back(400, Easing::Decelerate);
    c.dispatch(
        HostEvent::Resize {
            width: 420.0,
            height: 560.0,
        },
        0,
    )?;

    let mut now_ms = 0u64;
    while now_ms <= 20_000 {
        let position_secs = now_ms as f64 / 1000.0;
        let range = c.sync_playback(&timeline, position_secs, now_ms);

        // The listener flicks back through the lyrics at t=4s.
        if now_ms == 4_000 {
            c.dispatch(
                HostEvent::Wheel {
                    delta_y: -3.0,
                    delta_mode: 1,
                },
                now_ms,
            )?;
        }

        let repaint = c.tick(now_ms);
        if repaint && now_ms % 500 == 0 {
            let first = c.visible_rows().next().map(|r| r.index);
            println!(
                "t={now_ms:>5} active={range:?} mode={:?} offset={:.1} first_row={first:?}",
                c.virtualizer().scroll_mode(),
                c.presented_offset(),
            );
        }
        now_ms += 100;
    }
    Ok(())
}
