#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

/*
 * Board bring-up and task wiring for the BitDogLab traffic light.
 *
 * All hardware is claimed here and handed to the task that owns it; the
 * shared state is built once and passed to every task by reference. The
 * tasks never exchange peripherals afterwards.
 */

#[cfg(target_os = "none")]
mod firmware {
    use defmt::info;
    use embassy_executor::Spawner;
    use embassy_rp::gpio::{Input, Level, Output, Pull};
    use embassy_rp::peripherals::{I2C1, PIO0};
    use embassy_rp::pio::Pio;
    use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
    use embassy_rp::pwm::Pwm;
    use embassy_rp::{bind_interrupts, i2c, pio, pwm};
    use ssd1306::prelude::*;
    use ssd1306::{I2CDisplayInterface, Ssd1306Async};
    use static_cell::StaticCell;
    use {defmt_rtt as _, panic_probe as _};

    use bitdog_semaforo::display::MaintenanceSignal;
    use bitdog_semaforo::state::SharedState;
    use bitdog_semaforo::{button, buzzer, display, matrix, recovery, rgb, scheduler};

    bind_interrupts!(struct Irqs {
        I2C1_IRQ => i2c::InterruptHandler<I2C1>;
        PIO0_IRQ_0 => pio::InterruptHandler<PIO0>;
    });

    static STATE: StaticCell<SharedState> = StaticCell::new();
    static MAINTENANCE: MaintenanceSignal = MaintenanceSignal::new();

    #[embassy_executor::main]
    async fn main(spawner: Spawner) {
        let p = embassy_rp::init(Default::default());
        info!("bitdog-semaforo starting");

        let state: &'static SharedState = STATE.init(SharedState::new());

        // Discrete RGB LED.
        let led_red = Output::new(p.PIN_13, Level::Low);
        let led_green = Output::new(p.PIN_11, Level::Low);
        let led_blue = Output::new(p.PIN_12, Level::Low);

        // Buttons: A toggles night mode, the joystick button fires recovery.
        let button_a = Input::new(p.PIN_5, Pull::Up);
        let joystick = Input::new(p.PIN_22, Pull::Up);

        // 5x5 WS2812 matrix over PIO.
        let Pio {
            mut common, sm0, ..
        } = Pio::new(p.PIO0, Irqs);
        let program = PioWs2812Program::new(&mut common);
        let ws2812: matrix::MatrixDriver =
            PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_7, &program);

        // Buzzer on PWM slice 2, channel B (GPIO 21).
        let buzzer_pwm = Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, pwm::Config::default());
        let tone = buzzer::Tone::new(buzzer_pwm);

        // OLED on I2C1 at 400kHz.
        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = 400_000;
        let i2c = i2c::I2c::new_async(p.I2C1, p.PIN_15, p.PIN_14, Irqs, i2c_config);
        let mut oled: display::Display = Ssd1306Async::new(
            I2CDisplayInterface::new(i2c),
            DisplaySize128x64,
            DisplayRotation::Rotate0,
        )
        .into_buffered_graphics_mode();
        oled.init().await.unwrap();

        spawner.must_spawn(button::button_task(button_a, state));
        spawner.must_spawn(scheduler::phase_scheduler_task(state));
        spawner.must_spawn(rgb::rgb_task(led_red, led_green, led_blue, state));
        spawner.must_spawn(matrix::matrix_task(ws2812, state));
        spawner.must_spawn(display::display_task(oled, state, &MAINTENANCE));
        spawner.must_spawn(buzzer::buzzer_task(tone, state));
        spawner.must_spawn(recovery::recovery_task(joystick, &MAINTENANCE));
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
