/*
 * The recovery trigger: the joystick button arms the one-way jump into the
 * USB bootloader.
 *
 * This task never touches the display itself. It waits for the falling
 * edge and raises the maintenance signal; the display task, as the sole
 * owner of the display, paints the notice and performs the reset. Once the
 * edge fires there is no path back into normal operation, so the task ends
 * after signalling.
 */

#[cfg(target_os = "none")]
mod task {
    use defmt::info;
    use embassy_rp::gpio::Input;

    use crate::display::MaintenanceSignal;

    #[embassy_executor::task]
    pub async fn recovery_task(mut trigger: Input<'static>, maintenance: &'static MaintenanceSignal) {
        trigger.wait_for_falling_edge().await;

        info!("joystick button: maintenance mode requested");
        maintenance.signal(());
    }
}

#[cfg(target_os = "none")]
pub use task::recovery_task;
