//! Blinks a framed "X" on a 7x7 row/column multiplexed LED matrix by
//! toggling blanking, then redraws it with embedded-graphics.
//!
//! Wiring matches `diagonal_7x7`: rows on GP2..GP8 (asserted low), columns on
//! GP9..GP15 (asserted high).
#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::{Duration, Timer};
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use led_matrix_mux::led_matrix::OutputArray;
use led_matrix_mux::{Result, led_matrix};
use panic_probe as _;

led_matrix! {
    Matrix7x7,
    rows: 7,
    cols: 7,
    refresh_hz: 120,
}

const BLINK_PERIOD: Duration = Duration::from_millis(500);

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

    let mut canvas = matrix.canvas();
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    Rectangle::new(Point::zero(), Size::new(7, 7))
        .into_styled(stroke)
        .draw(&mut canvas)?;
    Line::new(Point::new(0, 0), Point::new(6, 6))
        .into_styled(stroke)
        .draw(&mut canvas)?;
    Line::new(Point::new(6, 0), Point::new(0, 6))
        .into_styled(stroke)
        .draw(&mut canvas)?;
    info!("frame checksum {:x}", matrix.frame_buffer().checksum());

    loop {
        matrix.blanking_off();
        Timer::after(BLINK_PERIOD).await;
        matrix.blanking_on()?;
        Timer::after(BLINK_PERIOD).await;
    }
}
