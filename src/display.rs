/*
 * The SSD1306 OLED, showing a traffic-light housing with three lamps and a
 * caption for the current phase.
 *
 * The display task is the sole owner of the display hardware. Everything
 * else that wants screen output goes through shared state: the normal
 * writers set `needs_redraw`, and the recovery trigger sends a one-shot
 * maintenance message that this task services between render passes. That
 * keeps a recovery write from ever interleaving with a half-drawn frame.
 *
 * Layout and drawing are pure functions over any `DrawTarget`, so the
 * geometry is testable on the host without a display.
 */

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::state::Phase;

// The housing outline on the left edge of the screen.
const HOUSING_TOP_LEFT: Point = Point::new(2, 5);
const HOUSING_SIZE: Size = Size::new(20, 54);

// Three lamps stacked inside the housing, top to bottom.
const LAMP_X: i32 = 12;
const LAMP_YS: [i32; 3] = [19, 33, 47];
const LAMP_DIAMETER: u32 = 11;

/// A caption fragment and where it goes on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caption {
    pub text: &'static str,
    pub x: i32,
    pub y: i32,
}

const fn caption(text: &'static str, x: i32, y: i32) -> Caption {
    Caption { text, x, y }
}

/// Which of the three lamps is filled for a phase: green on top, amber in
/// the middle, red at the bottom.
pub fn filled_lamp(phase: Phase) -> usize {
    match phase {
        Phase::Green => 0,
        Phase::Yellow => 1,
        Phase::Red => 2,
    }
}

const GREEN_CAPTIONS: [Caption; 2] = [caption("PODE", 59, 22), caption("AVANCAR", 47, 34)];
const YELLOW_CAPTIONS: [Caption; 1] = [caption("ATENCAO", 47, 32)];
const RED_CAPTIONS: [Caption; 1] = [caption("PARE", 59, 32)];

/// The caption text next to the housing for a phase.
pub fn phase_captions(phase: Phase) -> &'static [Caption] {
    match phase {
        Phase::Green => &GREEN_CAPTIONS,
        Phase::Yellow => &YELLOW_CAPTIONS,
        Phase::Red => &RED_CAPTIONS,
    }
}

const NIGHT_CAPTION: Caption = caption("MODO NOTURNO", 27, 32);

const MAINTENANCE_CAPTIONS: [Caption; 2] =
    [caption("  HABILITANDO", 5, 25), caption(" MODO GRAVACAO", 5, 38)];

fn draw_captions<D>(target: &mut D, captions: &[Caption]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_8X13, BinaryColor::On);
    for c in captions {
        Text::with_baseline(c.text, Point::new(c.x, c.y), style, Baseline::Top).draw(target)?;
    }
    Ok(())
}

/// Housing outline plus the three lamps, with `filled` drawn solid and the
/// others as outlines. `None` leaves all three hollow.
fn draw_housing<D>(target: &mut D, filled: Option<usize>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(HOUSING_TOP_LEFT, HOUSING_SIZE)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;

    for (i, y) in LAMP_YS.iter().enumerate() {
        let style = if filled == Some(i) {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        Circle::with_center(Point::new(LAMP_X, *y), LAMP_DIAMETER)
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

/// Normal-mode frame: one lamp filled for the phase, caption beside it.
pub fn draw_normal<D>(target: &mut D, phase: Phase) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    draw_housing(target, Some(filled_lamp(phase)))?;
    draw_captions(target, phase_captions(phase))
}

/// Night-mode frame: the middle lamp alternates filled/hollow.
pub fn draw_night<D>(target: &mut D, lit: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    draw_housing(target, if lit { Some(1) } else { None })?;
    draw_captions(target, &[NIGHT_CAPTION])
}

/// Final frame before the jump to the bootloader.
pub fn draw_maintenance<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    draw_captions(target, &MAINTENANCE_CAPTIONS)
}

#[cfg(target_os = "none")]
mod task {
    use defmt::info;
    use embassy_futures::select::{Either, select};
    use embassy_rp::i2c::{Async, I2c};
    use embassy_rp::peripherals::I2C1;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::signal::Signal;
    use embassy_time::{Duration, Timer};
    use ssd1306::mode::BufferedGraphicsModeAsync;
    use ssd1306::prelude::*;
    use ssd1306::Ssd1306Async;

    use super::{draw_maintenance, draw_night, draw_normal};
    use crate::state::SharedState;

    /// Redraw-flag poll cadence.
    const FRAME_POLL: Duration = Duration::from_millis(20);

    /// Half-period of the night-mode blink.
    const NIGHT_BLINK: Duration = Duration::from_millis(1000);

    pub type Display = Ssd1306Async<
        I2CInterface<I2c<'static, I2C1, Async>>,
        DisplaySize128x64,
        BufferedGraphicsModeAsync<DisplaySize128x64>,
    >;

    /// One-shot message from the recovery trigger to the display owner.
    pub type MaintenanceSignal = Signal<CriticalSectionRawMutex, ()>;

    #[embassy_executor::task]
    pub async fn display_task(
        mut display: Display,
        state: &'static SharedState,
        maintenance: &'static MaintenanceSignal,
    ) -> ! {
        // Force a full render on the first pass.
        state.mark_redraw();

        loop {
            let outcome = select(maintenance.wait(), render_pass(&mut display, state)).await;
            if let Either::First(()) = outcome {
                enter_maintenance(&mut display).await;
            }
        }
    }

    async fn render_pass(display: &mut Display, state: &'static SharedState) {
        if state.needs_redraw() {
            if state.night_mode() {
                // The redraw flag stays set in night mode, so the blink
                // keeps repainting until the mode changes.
                draw_night(display, true).unwrap();
                display.flush().await.unwrap();
                state.wait_in_mode(true, NIGHT_BLINK).await;

                draw_night(display, false).unwrap();
                display.flush().await.unwrap();
                state.wait_in_mode(true, NIGHT_BLINK).await;
            } else {
                state.clear_redraw();
                draw_normal(display, state.phase()).unwrap();
                display.flush().await.unwrap();
            }
        }
        Timer::after(FRAME_POLL).await;
    }

    /*
     * The one-way exit: paint the notice, then hand the device to the
     * RP2040 boot ROM for USB reprogramming. Normal operation never
     * resumes from here.
     */
    async fn enter_maintenance(display: &mut Display) -> ! {
        info!("entering maintenance mode, rebooting to USB bootloader");

        draw_maintenance(display).unwrap();
        display.flush().await.unwrap();

        embassy_rp::rom_data::reset_to_usb_boot(0, 0);
        loop {
            cortex_m::asm::wfe();
        }
    }
}

#[cfg(target_os = "none")]
pub use task::{Display, MaintenanceSignal, display_task};
