use core::convert::Infallible;

use derive_more::derive::{Display, Error};

use crate::led_matrix::{LineKind, Orientation, PixelFormat};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.  `SpawnError` should, but Rust's `Error`
    // only recently moved from `std` (which is not available in bare-metal development) to `core`
    // (which is). Perhaps a future update of `embassy_executor::SpawnError` will implement
    // `core::error::Error` which will make this unnecessary.
    /// The scan task could not be spawned.
    #[cfg(any(feature = "pico1", feature = "pico2"))]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    /// A row or column line could not be driven to its inactive level during bring-up.
    #[display("{kind} line {index} is not ready")]
    DeviceNotReady {
        /// Which line set the failing line belongs to.
        kind: LineKind,
        /// Position of the failing line within its set.
        index: usize,
    },

    /// The refresh frequency must be at least 1 Hz.
    #[display("refresh frequency must be non-zero")]
    ZeroRefreshFrequency,

    /// A line could not be driven while scanning.
    #[display("Error setting output state")]
    CannotSetOutputState,

    /// A line index was past the end of its `OutputArray`.
    #[display("Index out of bounds")]
    IndexOutOfBounds,

    /// The requested rectangle does not fit on the matrix.
    #[display("rectangle {width}x{height} at ({x}, {y}) does not fit on the matrix")]
    RectangleOutOfBounds {
        /// Left column of the rectangle.
        x: usize,
        /// Top row of the rectangle.
        y: usize,
        /// Rectangle width in pixels.
        width: usize,
        /// Rectangle height in pixels.
        height: usize,
    },

    /// The source pitch is shorter than the rectangle width.
    #[display("pitch {pitch} is smaller than width {width}")]
    PitchTooSmall {
        /// Pixels between source row starts.
        pitch: usize,
        /// Rectangle width in pixels.
        width: usize,
    },

    /// The packed bitmap holds fewer bytes than `pitch * height` bits require.
    #[display("packed bitmap has {actual} bytes but {needed} are needed")]
    SourceTooShort {
        /// Bytes required by the descriptor.
        needed: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// Only [`PixelFormat::Mono01`] is supported.
    #[display("pixel format {_0:?} is not supported")]
    UnsupportedPixelFormat(#[error(not(source))] PixelFormat),

    /// Only [`Orientation::Normal`] is supported.
    #[display("orientation {_0:?} is not supported")]
    UnsupportedOrientation(#[error(not(source))] Orientation),
}

impl From<Infallible> for Error {
    fn from(_: Infallible) -> Self {
        Self::CannotSetOutputState
    }
}

#[cfg(any(feature = "pico1", feature = "pico2"))]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}
