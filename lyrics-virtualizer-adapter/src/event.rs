use alloc::string::String;

use lyrics_virtualizer::{Align, InvalidDeltaMode, ParseAlignError, WheelDeltaMode};

/// One notification from the host UI, in the shape a DOM or native toolkit delivers it.
///
/// Fields that arrive untyped (`deltaMode` as an integer, alignment as a string) stay raw here
/// and are validated on dispatch, so events can be deserialized straight off a message channel
/// with `feature = "serde"`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum HostEvent {
    Resize {
        width: f64,
        height: f64,
    },
    Measured {
        index: usize,
        height: f64,
    },
    Wheel {
        delta_y: f64,
        /// DOM `WheelEvent.deltaMode`: 0 = pixel, 1 = line, 2 = page.
        delta_mode: u32,
    },
    TouchStart {
        y: f64,
    },
    TouchMove {
        y: f64,
    },
    TouchEnd,
    ActiveRange {
        start_index: usize,
        end_index: usize,
    },
    Alignment {
        align: String,
        anchor_fraction: f64,
    },
}

impl HostEvent {
    /// Wheel and touch events: anything the user does to scroll.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::Wheel { .. } | Self::TouchStart { .. } | Self::TouchMove { .. } | Self::TouchEnd
        )
    }

    pub(crate) fn wheel_delta_mode(raw: u32) -> Result<WheelDeltaMode, EventError> {
        Ok(WheelDeltaMode::try_from(raw)?)
    }

    pub(crate) fn align(raw: &str) -> Result<Align, EventError> {
        Ok(raw.parse::<Align>()?)
    }
}

/// A host event carried a value the engine has no meaning for.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error(transparent)]
    Align(#[from] ParseAlignError),
    #[error(transparent)]
    DeltaMode(#[from] InvalidDeltaMode),
}
