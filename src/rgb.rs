/*
 * The discrete RGB indicator LED.
 *
 * Pure readers of the shared state: the color mapping from phase to LED
 * channels is a plain function, the task just keeps the hardware in sync
 * with whatever the state says on each pass.
 */

use crate::state::Phase;

/// On/off levels for the three LED channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

pub const OFF: Channels = Channels {
    red: false,
    green: false,
    blue: false,
};

/// The night blink color: red + green reads as amber on this LED.
pub const AMBER: Channels = Channels {
    red: true,
    green: true,
    blue: false,
};

/// Color shown for each phase in normal operation. Yellow is mixed from
/// red and green; blue never lights.
pub fn phase_channels(phase: Phase) -> Channels {
    match phase {
        Phase::Green => Channels {
            red: false,
            green: true,
            blue: false,
        },
        Phase::Yellow => Channels {
            red: true,
            green: true,
            blue: false,
        },
        Phase::Red => Channels {
            red: true,
            green: false,
            blue: false,
        },
    }
}

#[cfg(target_os = "none")]
mod task {
    use embassy_rp::gpio::{Level, Output};
    use embassy_time::Duration;

    use super::{AMBER, Channels, OFF, phase_channels};
    use crate::state::SharedState;

    /// Half-period of the night-mode amber blink.
    const NIGHT_BLINK: Duration = Duration::from_millis(1000);

    /// Re-check cadence in normal operation.
    const NORMAL_POLL: Duration = Duration::from_millis(20);

    // Deal with the channel bookkeeping in one place, so the task can just
    // use easy to understand `Channels` values.
    fn light(red: &mut Output, green: &mut Output, blue: &mut Output, channels: Channels) {
        red.set_level(if channels.red { Level::High } else { Level::Low });
        green.set_level(if channels.green { Level::High } else { Level::Low });
        blue.set_level(if channels.blue { Level::High } else { Level::Low });
    }

    #[embassy_executor::task]
    pub async fn rgb_task(
        mut red: Output<'static>,
        mut green: Output<'static>,
        mut blue: Output<'static>,
        state: &'static SharedState,
    ) -> ! {
        loop {
            if state.night_mode() {
                light(&mut red, &mut green, &mut blue, AMBER);
                state.wait_in_mode(true, NIGHT_BLINK).await;

                light(&mut red, &mut green, &mut blue, OFF);
                state.wait_in_mode(true, NIGHT_BLINK).await;
            } else {
                light(&mut red, &mut green, &mut blue, phase_channels(state.phase()));
                state.wait_in_mode(false, NORMAL_POLL).await;
            }
        }
    }
}

#[cfg(target_os = "none")]
pub use task::rgb_task;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_channel_pattern_per_phase() {
        assert_eq!(
            phase_channels(Phase::Green),
            Channels {
                red: false,
                green: true,
                blue: false
            }
        );
        assert_eq!(
            phase_channels(Phase::Yellow),
            Channels {
                red: true,
                green: true,
                blue: false
            }
        );
        assert_eq!(
            phase_channels(Phase::Red),
            Channels {
                red: true,
                green: false,
                blue: false
            }
        );
    }

    #[test]
    fn blue_never_lights() {
        for phase in [Phase::Green, Phase::Yellow, Phase::Red] {
            assert!(!phase_channels(phase).blue);
        }
        assert!(!AMBER.blue);
    }
}
