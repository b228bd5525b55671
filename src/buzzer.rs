/*
 * The buzzer: one audio pattern per phase plus the night heartbeat.
 *
 * Each loop pass reads the state once, plays the matching pattern with
 * mode-aware gaps, and unconditionally silences the tone before the next
 * pass. The unconditional stop is the safety net: an aborted wait may
 * leave the tone running, and the stop keeps that bounded to one pass.
 */

use crate::state::Phase;

/// One beep pattern: `repeats` pulses of `on_ms` tone / `off_ms` silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeepPattern {
    pub freq_hz: u32,
    pub repeats: u8,
    pub on_ms: u64,
    pub off_ms: u64,
}

/// Low heartbeat while the town sleeps.
pub const NIGHT_PATTERN: BeepPattern = BeepPattern {
    freq_hz: 500,
    repeats: 1,
    on_ms: 200,
    off_ms: 1800,
};

/// "you may cross" / "attention" / "stop" signatures.
pub fn phase_pattern(phase: Phase) -> BeepPattern {
    match phase {
        Phase::Green => BeepPattern {
            freq_hz: 2000,
            repeats: 1,
            on_ms: 1000,
            off_ms: 1000,
        },
        Phase::Yellow => BeepPattern {
            freq_hz: 3000,
            repeats: 2,
            on_ms: 200,
            off_ms: 200,
        },
        Phase::Red => BeepPattern {
            freq_hz: 1000,
            repeats: 1,
            on_ms: 500,
            off_ms: 1500,
        },
    }
}

#[cfg(target_os = "none")]
mod task {
    use embassy_rp::pwm::{Config, Pwm};
    use embassy_time::Duration;

    use super::{BeepPattern, NIGHT_PATTERN, phase_pattern};
    use crate::state::SharedState;

    /*
     * Square-wave tone on a PWM slice: full period at the requested
     * frequency, 50% duty while on, 0% while off.
     */
    pub struct Tone {
        pwm: Pwm<'static>,
        config: Config,
    }

    impl Tone {
        pub fn new(pwm: Pwm<'static>) -> Self {
            let mut config = Config::default();
            config.compare_b = 0;
            Tone { pwm, config }
        }

        pub fn on(&mut self, freq_hz: u32) {
            let clock_hz = embassy_rp::clocks::clk_sys_freq();

            // Divider chosen so the counter period fits the 16-bit top.
            let divider = ((clock_hz / freq_hz) / 65535 + 1) as u8;
            let top = (clock_hz / (freq_hz * divider as u32)) as u16 - 1;

            self.config.divider = divider.into();
            self.config.top = top;
            self.config.compare_b = top / 2;
            self.pwm.set_config(&self.config);
        }

        pub fn off(&mut self) {
            self.config.compare_b = 0;
            self.pwm.set_config(&self.config);
        }
    }

    #[embassy_executor::task]
    pub async fn buzzer_task(mut tone: Tone, state: &'static SharedState) -> ! {
        loop {
            let night = state.night_mode();
            let pattern: BeepPattern = if night {
                NIGHT_PATTERN
            } else {
                phase_pattern(state.phase())
            };

            for _ in 0..pattern.repeats {
                // A mode flip mid-pattern abandons the remaining pulses.
                if state.night_mode() != night {
                    break;
                }
                tone.on(pattern.freq_hz);
                state
                    .wait_in_mode(night, Duration::from_millis(pattern.on_ms))
                    .await;
                tone.off();
                state
                    .wait_in_mode(night, Duration::from_millis(pattern.off_ms))
                    .await;
            }

            // Safety net: never carry a tone into the next pass.
            tone.off();
        }
    }
}

#[cfg(target_os = "none")]
pub use task::{Tone, buzzer_task};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_has_a_distinct_frequency() {
        let green = phase_pattern(Phase::Green);
        let yellow = phase_pattern(Phase::Yellow);
        let red = phase_pattern(Phase::Red);

        assert_eq!(green.freq_hz, 2000);
        assert_eq!(yellow.freq_hz, 3000);
        assert_eq!(red.freq_hz, 1000);
        assert_eq!(NIGHT_PATTERN.freq_hz, 500);
    }

    #[test]
    fn yellow_is_the_only_multi_pulse_pattern() {
        assert_eq!(phase_pattern(Phase::Yellow).repeats, 2);
        assert_eq!(phase_pattern(Phase::Green).repeats, 1);
        assert_eq!(phase_pattern(Phase::Red).repeats, 1);
        assert_eq!(NIGHT_PATTERN.repeats, 1);
    }

    #[test]
    fn pattern_periods_match_the_crossing_rhythm() {
        let green = phase_pattern(Phase::Green);
        assert_eq!((green.on_ms, green.off_ms), (1000, 1000));

        let red = phase_pattern(Phase::Red);
        assert_eq!((red.on_ms, red.off_ms), (500, 1500));

        assert_eq!((NIGHT_PATTERN.on_ms, NIGHT_PATTERN.off_ms), (200, 1800));
    }
}
