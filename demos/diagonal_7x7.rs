//! Shows a diagonal on a 7x7 row/column multiplexed LED matrix.
//!
//! Wiring: rows on GP2..GP8 (common cathode, asserted low), columns on
//! GP9..GP15 (asserted high, each through a current-limiting resistor).
#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Timer;
use led_matrix_mux::led_matrix::{BitOrder, BufferDescriptor, OutputArray};
use led_matrix_mux::{Result, led_matrix};
use panic_probe as _;

led_matrix! {
    Matrix7x7,
    rows: 7,
    cols: 7,
    refresh_hz: 100,
}

// One byte per row, leftmost pixel in bit 0.
const DIAGONAL: [u8; 7] = [
    0b000_0001, 0b000_0010, 0b000_0100, 0b000_1000, 0b001_0000, 0b010_0000, 0b100_0000,
];

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    core::panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let row_lines = OutputArray::new_active_low([
        Output::new(p.PIN_2, Level::High),
        Output::new(p.PIN_3, Level::High),
        Output::new(p.PIN_4, Level::High),
        Output::new(p.PIN_5, Level::High),
        Output::new(p.PIN_6, Level::High),
        Output::new(p.PIN_7, Level::High),
        Output::new(p.PIN_8, Level::High),
    ]);
    let col_lines = OutputArray::new([
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
    ]);

    static MATRIX7X7: Matrix7x7 = Matrix7x7::new_static();
    let matrix = MATRIX7X7.new(row_lines, col_lines, spawner)?;

    let capabilities = matrix.capabilities();
    info!(
        "Display sample for a {}x{} matrix",
        capabilities.x_resolution, capabilities.y_resolution
    );

    let descriptor = BufferDescriptor::new(7, 7, 8).with_bit_order(BitOrder::LsbFirst);
    matrix.write(0, 0, &descriptor, &DIAGONAL)?;
    matrix.blanking_off();

    loop {
        Timer::after_secs(1).await;
    }
}
