//! Decoding packed monochrome bitmaps into the frame buffer, and packing them back out.

use crate::Result;
use crate::error::Error::{PitchTooSmall, RectangleOutOfBounds, SourceTooShort};
use crate::led_matrix::FrameBuffer;

/// Order in which the pixels of a packed byte are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format, Default)]
pub enum BitOrder {
    /// Bit 7 holds the leftmost pixel.
    #[default]
    MsbFirst,
    /// Bit 0 holds the leftmost pixel, the layout of C bitfield-packed images.
    LsbFirst,
}

impl BitOrder {
    const fn first_mask(self) -> u8 {
        match self {
            Self::MsbFirst => 0b_1000_0000,
            Self::LsbFirst => 0b_0000_0001,
        }
    }

    /// Next mask within the current byte, or `0` once the byte is used up.
    const fn next_mask(self, mask: u8) -> u8 {
        match self {
            Self::MsbFirst => mask >> 1,
            Self::LsbFirst => mask << 1,
        }
    }
}

/// Shape of a packed source bitmap.
///
/// `pitch` counts pixels (bits), not bytes: each source row starts `pitch`
/// bits after the previous one, and the trailing `pitch - width` bits of a row
/// are padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct BufferDescriptor {
    /// Pixels per row that land on the matrix.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Pixels between consecutive row starts.
    pub pitch: usize,
    /// Bit order within each byte.
    pub bit_order: BitOrder,
}

impl BufferDescriptor {
    /// Most-significant-bit-first descriptor.
    #[must_use]
    pub const fn new(width: usize, height: usize, pitch: usize) -> Self {
        Self {
            width,
            height,
            pitch,
            bit_order: BitOrder::MsbFirst,
        }
    }

    /// Same shape with a different bit order.
    #[must_use]
    pub const fn with_bit_order(self, bit_order: BitOrder) -> Self {
        Self { bit_order, ..self }
    }

    /// Bytes needed to hold `pitch * height` packed bits.
    #[must_use]
    pub const fn packed_len(&self) -> usize {
        self.pitch.saturating_mul(self.height).div_ceil(8)
    }

    /// Checks the rectangle at (`x`, `y`) against a `cols` x `rows` matrix and
    /// the packed buffer length. Nothing is touched unless this passes.
    pub(crate) fn validate(
        &self,
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
        packed_len: usize,
    ) -> Result<()> {
        let out_of_bounds = || RectangleOutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        };
        let end_x = x.checked_add(self.width).ok_or_else(out_of_bounds)?;
        let end_y = y.checked_add(self.height).ok_or_else(out_of_bounds)?;
        if x >= cols || end_x > cols || y >= rows || end_y > rows {
            return Err(out_of_bounds());
        }
        if self.pitch < self.width {
            return Err(PitchTooSmall {
                pitch: self.pitch,
                width: self.width,
            });
        }
        let needed = self.packed_len();
        if packed_len < needed {
            return Err(SourceTooShort {
                needed,
                actual: packed_len,
            });
        }
        Ok(())
    }
}

/// Rolling read cursor over a packed bitmap.
///
/// The mask starts empty so the first pixel fetches the first byte; every
/// later pixel, padding included, advances one bit and fetches a new byte when
/// the mask runs off the end of the current one.
struct PackedBits<'a> {
    bytes: core::slice::Iter<'a, u8>,
    bit_order: BitOrder,
    mask: u8,
    value: u8,
}

impl<'a> PackedBits<'a> {
    fn new(source: &'a [u8], bit_order: BitOrder) -> Self {
        Self {
            bytes: source.iter(),
            bit_order,
            mask: 0,
            value: 0,
        }
    }

    /// Advance past `count` padding bits.
    fn skip_padding(&mut self, count: usize) {
        for _ in 0..count {
            let _ = self.next();
        }
    }
}

impl Iterator for PackedBits<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.mask = self.bit_order.next_mask(self.mask);
        if self.mask == 0 {
            self.mask = self.bit_order.first_mask();
            self.value = *self.bytes.next()?;
        }
        Some(u8::from(self.value & self.mask != 0))
    }
}

/// Rolling write cursor, the mirror of [`PackedBits`]. Padding bits are written as `0`.
struct PackedBitsMut<'a> {
    bytes: core::slice::IterMut<'a, u8>,
    bit_order: BitOrder,
    mask: u8,
    current: Option<&'a mut u8>,
}

impl<'a> PackedBitsMut<'a> {
    fn new(destination: &'a mut [u8], bit_order: BitOrder) -> Self {
        Self {
            bytes: destination.iter_mut(),
            bit_order,
            mask: 0,
            current: None,
        }
    }

    fn push(&mut self, bit: bool) {
        self.mask = self.bit_order.next_mask(self.mask);
        if self.mask == 0 {
            self.mask = self.bit_order.first_mask();
            self.current = self.bytes.next();
            if let Some(byte) = self.current.as_deref_mut() {
                *byte = 0;
            }
        }
        if bit {
            if let Some(byte) = self.current.as_deref_mut() {
                *byte |= self.mask;
            }
        }
    }
}

/// Decode `source` into the rectangle at (`x`, `y`).
///
/// # Errors
///
/// Returns [`RectangleOutOfBounds`](crate::Error::RectangleOutOfBounds),
/// [`PitchTooSmall`](crate::Error::PitchTooSmall) or
/// [`SourceTooShort`](crate::Error::SourceTooShort) without writing anything.
pub fn write_rect<const ROWS: usize, const COLS: usize>(
    frame_buffer: &FrameBuffer<ROWS, COLS>,
    x: usize,
    y: usize,
    descriptor: &BufferDescriptor,
    source: &[u8],
) -> Result<()> {
    descriptor.validate(x, y, COLS, ROWS, source.len())?;
    #[cfg(feature = "display-trace")]
    defmt::info!("write_rect: ({}, {}) {}", x, y, descriptor);

    let padding = descriptor.pitch.saturating_sub(descriptor.width);
    let mut bits = PackedBits::new(source, descriptor.bit_order);
    for row in (y..).take(descriptor.height) {
        for col in (x..).take(descriptor.width) {
            let bit = bits.next().unwrap_or_default();
            frame_buffer.set_pixel(col, row, bit);
        }
        bits.skip_padding(padding);
    }
    Ok(())
}

/// Pack the rectangle at (`x`, `y`) into `destination`, using the same layout [`write_rect`] reads.
///
/// # Errors
///
/// The same validation as [`write_rect`], applied to `destination`.
pub fn read_rect<const ROWS: usize, const COLS: usize>(
    frame_buffer: &FrameBuffer<ROWS, COLS>,
    x: usize,
    y: usize,
    descriptor: &BufferDescriptor,
    destination: &mut [u8],
) -> Result<()> {
    descriptor.validate(x, y, COLS, ROWS, destination.len())?;

    let padding = descriptor.pitch.saturating_sub(descriptor.width);
    let mut bits = PackedBitsMut::new(destination, descriptor.bit_order);
    for row in (y..).take(descriptor.height) {
        for col in (x..).take(descriptor.width) {
            bits.push(frame_buffer.pixel(col, row).unwrap_or_default() != 0);
        }
        for _ in 0..padding {
            bits.push(false);
        }
    }
    Ok(())
}
