/*
 * Traffic-light simulator firmware for the BitDogLab (RP2040).
 *
 * A handful of independent embassy tasks coordinate through a small shared
 * state: a phase scheduler, a night-mode button, three renderers (RGB LED,
 * 5x5 WS2812 matrix, SSD1306 OLED), a buzzer and the recovery trigger that
 * reboots the board into the USB bootloader.
 *
 * The decision logic in each module is pure and compiles on the host;
 * everything that needs the RP2040 is guarded by `cfg(target_os = "none")`
 * so `cargo test` exercises the logic without hardware.
 */

#![cfg_attr(not(test), no_std)]

pub mod button;
pub mod buzzer;
pub mod display;
pub mod matrix;
pub mod recovery;
pub mod rgb;
pub mod scheduler;
pub mod state;
