//! Row/column multiplexed LED matrix driver for Pico 1 and 2.
//!
//! An LED matrix wired as rows and columns has far fewer drive lines than
//! pixels. This crate lights one row at a time from a frame buffer, fast
//! enough for the eye to see the whole image.
//!
//! See [`led_matrix::LedMatrix`] for the device and [`led_matrix!`] for
//! declaring an instance.
//!
//! # Glossary
//!
//! - **Blanking:** every drive line inactive and the scan stopped.
//! - **Pitch:** pixels between the starts of consecutive rows in a packed source bitmap.
//! - **Polarity:** whether a line is asserted by driving it high or low.
#![cfg_attr(not(feature = "host"), no_std)]
#![cfg_attr(not(feature = "host"), no_main)]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// Compile-time checks: exactly one architecture must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "arm", feature = "riscv")), not(feature = "host")))]
compile_error!("Must enable exactly one architecture feature: 'arm' or 'riscv'");

#[cfg(all(feature = "arm", feature = "riscv"))]
compile_error!("Cannot enable both 'arm' and 'riscv' features simultaneously");

// Compile-time check: pico1 only supports ARM
#[cfg(all(feature = "pico1", feature = "riscv"))]
compile_error!("Pico 1 (RP2040) only supports ARM architecture, not RISC-V");

// Per-row tracing goes through defmt, which has no logger on the host
#[cfg(all(feature = "host", feature = "display-trace"))]
compile_error!("'display-trace' needs a defmt logger and cannot be combined with 'host'");

mod error;
pub mod led_matrix;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
