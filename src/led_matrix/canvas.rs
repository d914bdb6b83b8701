use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use super::FrameBuffer;

/// An [`embedded-graphics`](https://docs.rs/embedded-graphics) drawing surface over a
/// [`LedMatrix`](super::LedMatrix)'s frame buffer.
///
/// Pixels land directly in the live buffer, so the scan task picks them up on
/// its next pass over the row. Pixels outside the matrix are clipped.
///
/// ```ignore
/// use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::{Line, PrimitiveStyle}};
///
/// let mut canvas = led_matrix.canvas();
/// Line::new(Point::new(0, 0), Point::new(6, 6))
///     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
///     .draw(&mut canvas)?;
/// ```
pub struct Canvas<'a, const ROWS: usize, const COLS: usize>(&'a FrameBuffer<ROWS, COLS>);

impl<'a, const ROWS: usize, const COLS: usize> Canvas<'a, ROWS, COLS> {
    /// Draw into `frame_buffer`.
    #[must_use]
    pub const fn new(frame_buffer: &'a FrameBuffer<ROWS, COLS>) -> Self {
        Self(frame_buffer)
    }
}

impl<const ROWS: usize, const COLS: usize> OriginDimensions for Canvas<'_, ROWS, COLS> {
    fn size(&self) -> Size {
        Size::new(COLS as u32, ROWS as u32)
    }
}

impl<const ROWS: usize, const COLS: usize> DrawTarget for Canvas<'_, ROWS, COLS> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(col), Ok(row)) = (usize::try_from(coord.x), usize::try_from(coord.y)) {
                self.0.set_pixel(col, row, u8::from(color.is_on()));
            }
        }
        Ok(())
    }
}
