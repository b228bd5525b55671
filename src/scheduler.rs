/*
 * The phase scheduler: the only writer of the traffic-light phase.
 *
 * In normal operation it advances the phase on a fixed dwell and then
 * sleeps through the dwell with a mode-aware wait, so a switch into night
 * mode yanks it out of the sleep almost immediately. In night mode it sits
 * in short mode-aware waits and leaves the phase untouched, which is what
 * makes "phase never changes while night mode holds" true.
 */

#[cfg(target_os = "none")]
mod task {
    use defmt::info;
    use embassy_time::Duration;

    use crate::state::SharedState;

    /// How long each phase is held before advancing.
    pub const PHASE_DWELL: Duration = Duration::from_millis(2000);

    /// Idle step while night mode has the cycle suspended.
    const NIGHT_IDLE: Duration = Duration::from_millis(50);

    #[embassy_executor::task]
    pub async fn phase_scheduler_task(state: &'static SharedState) -> ! {
        loop {
            if state.night_mode() {
                state.wait_in_mode(true, NIGHT_IDLE).await;
            } else {
                let phase = state.advance_phase();
                info!("phase -> {}", phase.name());
                state.wait_in_mode(false, PHASE_DWELL).await;
            }
        }
    }
}

#[cfg(target_os = "none")]
pub use task::{PHASE_DWELL, phase_scheduler_task};
