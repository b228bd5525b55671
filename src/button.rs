/*
 * The night-mode button.
 *
 * Button A is a momentary switch polled on a fixed cadence. A press only
 * counts when the debounce window since the previously accepted press has
 * passed; everything inside the window is electrical or human noise and is
 * silently dropped. The accept/reject decision is a small pure state
 * machine so it can be tested on the host, away from any GPIO.
 */

/// Poll cadence for the button level.
pub const BUTTON_POLL_MS: u64 = 50;

/// Two edges closer together than this are one press.
pub const DEBOUNCE_MS: u64 = 200;

/// Debounce bookkeeping: the timestamp of the last accepted press.
///
/// The baseline starts at zero, so a press within the first window after
/// boot is rejected as well.
pub struct PressDebounce {
    last_accept_ms: u64,
}

impl PressDebounce {
    pub const fn new() -> Self {
        PressDebounce { last_accept_ms: 0 }
    }

    /// Feed one "the button reads pressed" observation. Returns whether it
    /// counts as a new press. `now_ms` comes from a monotonic clock.
    pub fn accept(&mut self, now_ms: u64) -> bool {
        if now_ms - self.last_accept_ms >= DEBOUNCE_MS {
            self.last_accept_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(target_os = "none")]
mod task {
    use defmt::info;
    use embassy_rp::gpio::Input;
    use embassy_time::{Instant, Timer};

    use super::{BUTTON_POLL_MS, PressDebounce};
    use crate::state::SharedState;

    /*
     * Polls button A and flips night mode on each accepted press. This task
     * is the only writer of `night_mode`; the phase reset on leaving night
     * mode happens inside the same toggle.
     */
    #[embassy_executor::task]
    pub async fn button_task(button: Input<'static>, state: &'static SharedState) -> ! {
        let mut debounce = PressDebounce::new();

        loop {
            // Active low: the BitDogLab buttons pull the pin to ground.
            if button.is_low() && debounce.accept(Instant::now().as_millis()) {
                if state.toggle_night_mode() {
                    info!("button A: night mode enabled");
                } else {
                    info!("button A: night mode disabled, back to red");
                }
            }
            Timer::after_millis(BUTTON_POLL_MS).await;
        }
    }
}

#[cfg(target_os = "none")]
pub use task::button_task;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presses_outside_the_window_all_count() {
        let mut debounce = PressDebounce::new();
        assert!(debounce.accept(200));
        assert!(debounce.accept(450));
        assert!(debounce.accept(1000));
    }

    #[test]
    fn two_presses_within_the_window_are_one_flip() {
        let mut debounce = PressDebounce::new();
        assert!(debounce.accept(500));
        assert!(!debounce.accept(650));
        // The rejected press does not reopen the window.
        assert!(debounce.accept(700));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut debounce = PressDebounce::new();
        assert!(debounce.accept(300));
        assert!(!debounce.accept(499));
        assert!(debounce.accept(500));
    }

    #[test]
    fn press_right_after_boot_is_rejected() {
        let mut debounce = PressDebounce::new();
        assert!(!debounce.accept(100));
        assert!(debounce.accept(250));
    }

    #[test]
    fn held_button_counts_once_per_window() {
        let mut debounce = PressDebounce::new();
        let mut flips = 0;
        // Polled every 50ms while held for a full second.
        for t in (200..1200).step_by(50) {
            if debounce.accept(t) {
                flips += 1;
            }
        }
        assert_eq!(flips, 5);
    }
}
