/*
 * The 5x5 WS2812 matrix, driven over PIO.
 *
 * The matrix shows a miniature three-lamp column in the middle of the
 * panel: green lamp at (2,3), amber at (2,2), red at (2,1). The lamp for
 * the current phase glows bright, the other two stay as faint markers so
 * the column remains visible. Frame building is pure so the layout and the
 * serpentine index mapping are testable on the host.
 */

use smart_leds::RGB8;

use crate::state::Phase;

pub const WIDTH: usize = 5;
pub const NUM_LEDS: usize = WIDTH * WIDTH;

const X_LAMPS: usize = 2;
const Y_GREEN: usize = 3;
const Y_AMBER: usize = 2;
const Y_RED: usize = 1;

// Faint markers so the unlit lamps still show where the column is.
const DIM_GREEN: RGB8 = RGB8::new(0, 1, 0);
const DIM_AMBER: RGB8 = RGB8::new(1, 1, 0);
const DIM_RED: RGB8 = RGB8::new(1, 0, 0);

const BRIGHT_GREEN: RGB8 = RGB8::new(0, 50, 0);
const BRIGHT_AMBER: RGB8 = RGB8::new(50, 50, 0);
const BRIGHT_RED: RGB8 = RGB8::new(50, 0, 0);

// Night mode runs the amber lamp at a lower level than daytime amber.
const NIGHT_AMBER: RGB8 = RGB8::new(20, 20, 0);

/// Maps panel coordinates to the WS2812 chain index. The BitDogLab matrix
/// is wired as a serpentine starting at the bottom-right: even rows run
/// right-to-left, odd rows left-to-right.
pub fn led_index(x: usize, y: usize) -> usize {
    if y % 2 == 0 {
        NUM_LEDS - 1 - (y * WIDTH + x)
    } else {
        NUM_LEDS - 1 - (y * WIDTH + (WIDTH - 1 - x))
    }
}

fn lamp_column(green: RGB8, amber: RGB8, red: RGB8) -> [RGB8; NUM_LEDS] {
    let mut frame = [RGB8::new(0, 0, 0); NUM_LEDS];
    frame[led_index(X_LAMPS, Y_GREEN)] = green;
    frame[led_index(X_LAMPS, Y_AMBER)] = amber;
    frame[led_index(X_LAMPS, Y_RED)] = red;
    frame
}

/// Normal operation: the lamp for `phase` glows bright.
pub fn phase_frame(phase: Phase) -> [RGB8; NUM_LEDS] {
    match phase {
        Phase::Green => lamp_column(BRIGHT_GREEN, DIM_AMBER, DIM_RED),
        Phase::Yellow => lamp_column(DIM_GREEN, BRIGHT_AMBER, DIM_RED),
        Phase::Red => lamp_column(DIM_GREEN, DIM_AMBER, BRIGHT_RED),
    }
}

/// Night mode: the amber lamp alternates between lit and the faint marker.
pub fn night_frame(lit: bool) -> [RGB8; NUM_LEDS] {
    let amber = if lit { NIGHT_AMBER } else { DIM_AMBER };
    lamp_column(DIM_GREEN, amber, DIM_RED)
}

#[cfg(target_os = "none")]
mod task {
    use embassy_rp::peripherals::PIO0;
    use embassy_rp::pio_programs::ws2812::PioWs2812;
    use embassy_time::Duration;

    use super::{NUM_LEDS, night_frame, phase_frame};
    use crate::state::SharedState;

    /// Half-period of the night-mode blink.
    const NIGHT_BLINK: Duration = Duration::from_millis(1000);

    /// Re-check cadence in normal operation.
    const NORMAL_POLL: Duration = Duration::from_millis(50);

    pub type MatrixDriver = PioWs2812<'static, PIO0, 0, NUM_LEDS>;

    #[embassy_executor::task]
    pub async fn matrix_task(mut matrix: MatrixDriver, state: &'static SharedState) -> ! {
        loop {
            if state.night_mode() {
                matrix.write(&night_frame(true)).await;
                state.wait_in_mode(true, NIGHT_BLINK).await;

                matrix.write(&night_frame(false)).await;
                state.wait_in_mode(true, NIGHT_BLINK).await;
            } else {
                matrix.write(&phase_frame(state.phase())).await;
                state.wait_in_mode(false, NORMAL_POLL).await;
            }
        }
    }
}

#[cfg(target_os = "none")]
pub use task::{MatrixDriver, matrix_task};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serpentine_mapping_matches_the_panel_wiring() {
        // Bottom row (y = 0) runs right-to-left from chain index 24.
        assert_eq!(led_index(0, 0), 24);
        assert_eq!(led_index(4, 0), 20);
        // Next row reverses.
        assert_eq!(led_index(4, 1), 19);
        assert_eq!(led_index(0, 1), 15);
        // Top-left corner.
        assert_eq!(led_index(0, 4), 4);
    }

    #[test]
    fn every_panel_coordinate_maps_to_a_unique_index() {
        let mut seen = [false; NUM_LEDS];
        for y in 0..WIDTH {
            for x in 0..WIDTH {
                let i = led_index(x, y);
                assert!(i < NUM_LEDS);
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
    }

    #[test]
    fn bright_lamp_follows_the_phase() {
        let green = phase_frame(Phase::Green);
        assert_eq!(green[led_index(2, 3)], BRIGHT_GREEN);
        assert_eq!(green[led_index(2, 2)], DIM_AMBER);

        let yellow = phase_frame(Phase::Yellow);
        assert_eq!(yellow[led_index(2, 2)], BRIGHT_AMBER);

        let red = phase_frame(Phase::Red);
        assert_eq!(red[led_index(2, 1)], BRIGHT_RED);
        assert_eq!(red[led_index(2, 3)], DIM_GREEN);
    }

    #[test]
    fn night_blink_only_moves_the_amber_lamp() {
        let lit = night_frame(true);
        let dim = night_frame(false);
        assert_eq!(lit[led_index(2, 2)], NIGHT_AMBER);
        assert_eq!(dim[led_index(2, 2)], DIM_AMBER);
        for i in 0..NUM_LEDS {
            if i != led_index(2, 2) {
                assert_eq!(lit[i], dim[i]);
            }
        }
    }

    #[test]
    fn only_the_lamp_column_is_populated() {
        let frame = phase_frame(Phase::Red);
        let lamps = [led_index(2, 1), led_index(2, 2), led_index(2, 3)];
        for (i, led) in frame.iter().enumerate() {
            if !lamps.contains(&i) {
                assert_eq!(*led, RGB8::new(0, 0, 0));
            }
        }
    }
}
