/*
 * The shared state that all tasks coordinate through: the night-mode flag,
 * the current traffic-light phase and the display redraw flag.
 *
 * Every field is a word-sized atomic accessed with plain load/store, so no
 * reader can ever see a torn value and no task ever blocks another one on a
 * lock. The one compound update -- leaving night mode resets the phase back
 * to red -- runs inside a critical section so that a reader cannot observe
 * the new mode paired with a stale phase.
 *
 * Writer discipline: the button task writes `night_mode` (and the phase
 * reset), the phase scheduler writes `phase`, and only the display task
 * clears `needs_redraw`. Everyone else is a reader.
 */

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use enum_ordinalize::Ordinalize;

#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Green,
    Yellow,
    Red,
}

impl Phase {
    pub fn next(self) -> Self {
        match self {
            Phase::Green => Phase::Yellow,
            Phase::Yellow => Phase::Red,
            Phase::Red => Phase::Green,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Green => "green",
            Phase::Yellow => "yellow",
            Phase::Red => "red",
        }
    }
}

pub struct SharedState {
    night_mode: AtomicBool,
    phase: AtomicU8,
    needs_redraw: AtomicBool,
}

impl SharedState {
    /*
     * The light starts in normal operation on red, with a render pending so
     * the display comes up showing something.
     */
    pub const fn new() -> Self {
        SharedState {
            night_mode: AtomicBool::new(false),
            phase: AtomicU8::new(Phase::Red as u8),
            needs_redraw: AtomicBool::new(true),
        }
    }

    pub fn night_mode(&self) -> bool {
        self.night_mode.load(Ordering::Relaxed)
    }

    // A raw value that is not a known ordinal decodes as red, the safe
    // default. It cannot happen through this module's own writers.
    pub fn phase(&self) -> Phase {
        Phase::from_ordinal(self.phase.load(Ordering::Relaxed)).unwrap_or(Phase::Red)
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw.load(Ordering::Relaxed)
    }

    pub fn mark_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Relaxed);
    }

    /// Display task only, and only after a completed normal-mode pass.
    pub fn clear_redraw(&self) {
        self.needs_redraw.store(false, Ordering::Relaxed);
    }

    /// Phase scheduler only. Advances green -> yellow -> red -> green and
    /// flags the display. Returns the phase that was entered.
    pub fn advance_phase(&self) -> Phase {
        let next = self.phase().next();
        self.phase.store(next as u8, Ordering::Relaxed);
        self.mark_redraw();
        next
    }

    /// Button task only. Flips night mode and returns the new value.
    ///
    /// Leaving night mode also resets the phase to red inside the same
    /// critical section, so the pair (night_mode=false, phase) is never
    /// observable with the phase the scheduler left behind before the
    /// night started.
    pub fn toggle_night_mode(&self) -> bool {
        critical_section::with(|_| {
            let night = !self.night_mode.load(Ordering::Relaxed);
            self.night_mode.store(night, Ordering::Relaxed);
            if !night {
                self.phase.store(Phase::Red as u8, Ordering::Relaxed);
            }
            self.needs_redraw.store(true, Ordering::Relaxed);
            night
        })
    }
}

#[cfg(target_os = "none")]
mod wait {
    use embassy_time::{Duration, Timer};

    use super::SharedState;

    /// Granularity of the mode check inside a mode-aware wait.
    pub const MODE_POLL_STEP: Duration = Duration::from_millis(10);

    impl SharedState {
        /// Sleeps for up to `total`, aborting within one poll step the
        /// moment night mode no longer equals `expected_night`.
        ///
        /// This is the only cancellation mechanism in the firmware. There
        /// is no signal telling the caller whether the wait elapsed or was
        /// cut short; callers re-read the state and act on what they find.
        pub async fn wait_in_mode(&self, expected_night: bool, total: Duration) {
            let mut remaining = total;
            while remaining > Duration::from_ticks(0) {
                if self.night_mode() != expected_night {
                    return;
                }
                let step = MODE_POLL_STEP.min(remaining);
                Timer::after(step).await;
                remaining -= step;
            }
        }
    }
}

#[cfg(target_os = "none")]
pub use wait::MODE_POLL_STEP;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_cycle_has_period_three() {
        let mut phase = Phase::Red;
        for _ in 0..3 {
            phase = phase.next();
        }
        assert_eq!(phase, Phase::Red);
        assert_eq!(Phase::Red.next(), Phase::Green);
        assert_eq!(Phase::Green.next(), Phase::Yellow);
        assert_eq!(Phase::Yellow.next(), Phase::Red);
    }

    #[test]
    fn starts_in_normal_mode_on_red_with_render_pending() {
        let state = SharedState::new();
        assert!(!state.night_mode());
        assert_eq!(state.phase(), Phase::Red);
        assert!(state.needs_redraw());
    }

    #[test]
    fn advancing_flags_the_display() {
        let state = SharedState::new();
        state.clear_redraw();
        assert_eq!(state.advance_phase(), Phase::Green);
        assert!(state.needs_redraw());
        assert_eq!(state.phase(), Phase::Green);
    }

    #[test]
    fn leaving_night_mode_resets_phase_to_red() {
        let state = SharedState::new();
        assert!(state.toggle_night_mode());

        // Simulate the phase the scheduler would have left behind.
        state.phase.store(Phase::Green as u8, Ordering::Relaxed);
        state.clear_redraw();

        assert!(!state.toggle_night_mode());
        assert_eq!(state.phase(), Phase::Red);
        assert!(state.needs_redraw());
    }

    #[test]
    fn entering_night_mode_keeps_the_phase() {
        let state = SharedState::new();
        state.phase.store(Phase::Yellow as u8, Ordering::Relaxed);
        assert!(state.toggle_night_mode());
        assert_eq!(state.phase(), Phase::Yellow);
    }

    #[test]
    fn garbage_phase_decodes_as_red() {
        let state = SharedState::new();
        state.phase.store(7, Ordering::Relaxed);
        assert_eq!(state.phase(), Phase::Red);
    }
}
