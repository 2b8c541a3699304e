// Example: engine and adapter events through `tracing`.
//
// Run with:
//   RUST_LOG=lyrics_virtualizer=trace,lyrics_virtualizer_adapter=debug \
//     cargo run -p lyrics-virtualizer-adapter --example traced_session --features tracing
use std::io;

use lyrics_virtualizer::VirtualizerOptions;
use lyrics_virtualizer_adapter::{Controller, EventError, HostEvent};

fn main() -> Result<(), EventError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut c = Controller::new(VirtualizerOptions::new(40).with_estimated_row_height(30.0));
    let session = [
        (
            0,
            HostEvent::Resize {
                width: 320.0,
                height: 240.0,
            },
        ),
        (
            0,
            HostEvent::ActiveRange {
                start_index: 5,
                end_index: 6,
            },
        ),
        (
            10,
            HostEvent::Measured {
                index: 4,
                height: 60.0,
            },
        ),
        (
            12,
            HostEvent::Measured {
                index: 99,
                height: 20.0,
            },
        ),
        (200, HostEvent::TouchStart { y: 180.0 }),
        (216, HostEvent::TouchMove { y: 170.0 }),
        (232, HostEvent::TouchMove { y: 120.0 }),
        (248, HostEvent::TouchEnd),
        (
            300,
            HostEvent::Alignment {
                align: "start".into(),
                anchor_fraction: 0.2,
            },
        ),
    ];
    for (now_ms, event) in session {
        c.dispatch(event, now_ms)?;
        c.tick(now_ms);
    }

    for now_ms in (5_000..=5_600).step_by(100) {
        c.tick(now_ms);
    }
    println!(
        "offset={} animating={}",
        c.presented_offset(),
        c.is_animating()
    );

    let bad_wheel = HostEvent::Wheel {
        delta_y: 1.0,
        delta_mode: 9,
    };
    if let Err(err) = c.dispatch(bad_wheel, 6_000) {
        tracing::warn!(%err, "rejected host event");
    }
    Ok(())
}
