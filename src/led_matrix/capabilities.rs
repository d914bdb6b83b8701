use crate::Result;
use crate::error::Error::{UnsupportedOrientation, UnsupportedPixelFormat};

/// Pixel formats a display host may ask for. Only [`PixelFormat::Mono01`] is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PixelFormat {
    /// 1 bit per pixel, `1` is lit.
    Mono01,
    /// 1 bit per pixel, `0` is lit.
    Mono10,
    /// 8 bits per pixel, grayscale.
    L8,
    /// 16 bits per pixel, 5-6-5 red-green-blue.
    Rgb565,
    /// 16 bits per pixel, 5-6-5 blue-green-red.
    Bgr565,
    /// 24 bits per pixel.
    Rgb888,
    /// 32 bits per pixel with alpha.
    Argb8888,
}

/// Display orientations. Only [`Orientation::Normal`] is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format, Default)]
pub enum Orientation {
    /// Row 0 at the top, column 0 at the left.
    #[default]
    Normal,
    /// Rotated 90 degrees clockwise.
    Rotated90,
    /// Rotated 180 degrees.
    Rotated180,
    /// Rotated 270 degrees clockwise.
    Rotated270,
}

/// What a [`LedMatrix`](super::LedMatrix) reports to a display host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct Capabilities {
    /// Columns.
    pub x_resolution: usize,
    /// Rows.
    pub y_resolution: usize,
    /// Every format the matrix accepts.
    pub supported_pixel_formats: PixelFormat,
    /// Format of data passed to `write`.
    pub current_pixel_format: PixelFormat,
    /// Current orientation.
    pub current_orientation: Orientation,
}

impl Capabilities {
    pub(crate) const fn new(cols: usize, rows: usize) -> Self {
        Self {
            x_resolution: cols,
            y_resolution: rows,
            supported_pixel_formats: PixelFormat::Mono01,
            current_pixel_format: PixelFormat::Mono01,
            current_orientation: Orientation::Normal,
        }
    }
}

pub(crate) const fn check_pixel_format(format: PixelFormat) -> Result<()> {
    match format {
        PixelFormat::Mono01 => Ok(()),
        other => Err(UnsupportedPixelFormat(other)),
    }
}

pub(crate) const fn check_orientation(orientation: Orientation) -> Result<()> {
    match orientation {
        Orientation::Normal => Ok(()),
        other => Err(UnsupportedOrientation(other)),
    }
}
