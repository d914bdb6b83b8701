//! A device abstraction for row/column multiplexed LED matrices.
//!
//! The matrix has one drive line per row and one per column. A background
//! task lights one row at a time, with only that row's lit columns asserted,
//! fast enough that the whole image appears steady.
//!
//! See [`LedMatrix`] for the device handle and [`led_matrix!`](crate::led_matrix!)
//! for declaring a matrix instance.

// Re-export for macro use
#[doc(hidden)]
pub use paste;

use core::cell::RefCell;
#[cfg(not(feature = "host"))]
use core::convert::Infallible;

use derive_more::derive::Display;
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use embedded_hal::digital::OutputPin;

use crate::Result;

// ============================================================================
// Submodules
// ============================================================================

mod canvas;
mod capabilities;
mod frame_buffer;
mod output_array;
mod pixel_write;
mod scan_engine;

pub use canvas::Canvas;
pub use capabilities::{Capabilities, Orientation, PixelFormat};
pub use frame_buffer::FrameBuffer;
pub use output_array::{OutputArray, Polarity};
pub use pixel_write::{BitOrder, BufferDescriptor, read_rect, write_rect};
pub use scan_engine::ScanEngine;

/// GPIO output type used by matrices declared with [`led_matrix!`](crate::led_matrix!).
#[cfg(not(feature = "host"))]
pub type MatrixOutput = embassy_rp::gpio::Output<'static>;

/// Which side of the matrix a drive line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, defmt::Format)]
pub enum LineKind {
    /// A scan line; one is asserted at a time.
    #[display("row")]
    Row,
    /// A data line; asserted for each lit pixel of the active row.
    #[display("column")]
    Column,
}

#[doc(hidden)]
// Public so macro expansions in downstream crates can share the command type.
/// Command for the scan task.
#[derive(Debug, Clone, Copy, defmt::Format)]
pub enum ScanCommand {
    /// Tick at this period.
    Start(Duration),
    /// Stop ticking.
    Stop,
}

#[doc(hidden)]
// Public so macro expansions in downstream crates can share the signal type.
pub type LedMatrixScanSignal = Signal<CriticalSectionRawMutex, ScanCommand>;

// ============================================================================
// LedMatrixStatic
// ============================================================================

/// Static resources for the [`LedMatrix`] device.
///
/// Most users should use the [`led_matrix!`](crate::led_matrix!) macro, which
/// wraps this type and spawns the scan task.
pub struct LedMatrixStatic<P, const ROWS: usize, const COLS: usize> {
    frame_buffer: FrameBuffer<ROWS, COLS>,
    scan_engine: Mutex<CriticalSectionRawMutex, RefCell<Option<ScanEngine<P, ROWS, COLS>>>>,
    scan_signal: LedMatrixScanSignal,
}

impl<P: OutputPin, const ROWS: usize, const COLS: usize> LedMatrixStatic<P, ROWS, COLS> {
    /// Creates static resources with an all-off frame buffer and no lines attached yet.
    #[must_use]
    pub const fn new_static() -> Self {
        Self {
            frame_buffer: FrameBuffer::new(),
            scan_engine: Mutex::new(RefCell::new(None)),
            scan_signal: Signal::new(),
        }
    }

    fn with_engine<U>(&self, f: impl FnOnce(&mut ScanEngine<P, ROWS, COLS>) -> U) -> Option<U> {
        self.scan_engine
            .lock(|cell| cell.borrow_mut().as_mut().map(f))
    }

    fn tick(&self) -> Result<()> {
        self.with_engine(|engine| engine.tick(&self.frame_buffer))
            .unwrap_or(Ok(()))
    }
}

// ============================================================================
// LedMatrix Virtual Device
// ============================================================================

/// A device abstraction for a row/column multiplexed LED matrix.
///
/// `ROWS` row lines are scanned one at a time; `COLS` column lines carry the
/// lit pixels of the active row. The frame buffer holds one byte per pixel,
/// `0` (off) or `1` (on), row-major.
///
/// # Lifecycle
///
/// The matrix comes up blanked: all lines inactive and no scanning. Call
/// [`blanking_off`](Self::blanking_off) to start scanning and
/// [`blanking_on`](Self::blanking_on) to stop. Writes are accepted in either
/// state.
///
/// # Example
///
/// ```ignore
/// #![no_std]
/// #![no_main]
///
/// use embassy_rp::gpio::{Level, Output};
/// use led_matrix_mux::{Result, led_matrix, led_matrix::{BufferDescriptor, OutputArray}};
/// # use embassy_executor::Spawner;
///
/// led_matrix! {
///     pub Matrix3x3,
///     rows: 3,
///     cols: 3,
///     refresh_hz: 100,
/// }
///
/// async fn example(p: embassy_rp::Peripherals, spawner: Spawner) -> Result<()> {
///     // Row pins sink current (common cathode): asserted when low.
///     let row_lines = OutputArray::new_active_low([
///         Output::new(p.PIN_2, Level::High),
///         Output::new(p.PIN_3, Level::High),
///         Output::new(p.PIN_4, Level::High),
///     ]);
///     let col_lines = OutputArray::new([
///         Output::new(p.PIN_5, Level::Low),
///         Output::new(p.PIN_6, Level::Low),
///         Output::new(p.PIN_7, Level::Low),
///     ]);
///
///     static MATRIX3X3: Matrix3x3 = Matrix3x3::new_static();
///     let matrix = MATRIX3X3.new(row_lines, col_lines, spawner)?;
///
///     // A 3x3 "X", one byte per row, most significant bit first.
///     let image = [0b1010_0000, 0b0100_0000, 0b1010_0000];
///     matrix.write(0, 0, &BufferDescriptor::new(3, 3, 8), &image)?;
///     matrix.blanking_off();
///     Ok(())
/// }
/// ```
pub struct LedMatrix<'a, P, const ROWS: usize, const COLS: usize>(
    &'a LedMatrixStatic<P, ROWS, COLS>,
);

impl<'a, P: OutputPin, const ROWS: usize, const COLS: usize> LedMatrix<'a, P, ROWS, COLS> {
    /// Creates static resources for the matrix.
    #[must_use]
    pub const fn new_static() -> LedMatrixStatic<P, ROWS, COLS> {
        LedMatrixStatic::new_static()
    }

    /// Brings up the line set and attaches it to `matrix_static`.
    ///
    /// Every column and row line is driven to its inactive level. The matrix
    /// starts blanked. On hardware the scan task must also be running; the
    /// [`led_matrix!`](crate::led_matrix!) macro spawns it.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceNotReady`](crate::Error::DeviceNotReady) naming the first
    /// line that could not be driven, or
    /// [`ZeroRefreshFrequency`](crate::Error::ZeroRefreshFrequency).
    pub fn new(
        matrix_static: &'a LedMatrixStatic<P, ROWS, COLS>,
        row_lines: OutputArray<P, ROWS>,
        col_lines: OutputArray<P, COLS>,
        refresh_hz: u32,
    ) -> Result<Self> {
        let scan_engine = ScanEngine::new(row_lines, col_lines, refresh_hz)?;
        matrix_static.scan_engine.lock(|cell| {
            cell.replace(Some(scan_engine));
        });
        Ok(Self(matrix_static))
    }

    /// Stops scanning and drives every line inactive. Does nothing if already blanked.
    ///
    /// When this returns no line is asserted and no further tick will assert one.
    ///
    /// # Errors
    ///
    /// Returns [`CannotSetOutputState`](crate::Error::CannotSetOutputState) if a line
    /// refuses. Every other line is still driven inactive and scanning still stops.
    pub fn blanking_on(&self) -> Result<()> {
        let Some((was_scanning, result)) = self.0.with_engine(|engine| {
            let was_scanning = !engine.is_blanking();
            (was_scanning, engine.blanking_on())
        }) else {
            return Ok(());
        };
        if was_scanning {
            self.0.scan_signal.signal(ScanCommand::Stop);
        }
        result.map(|_| ())
    }

    /// Starts scanning from row 0. Does nothing if already scanning.
    pub fn blanking_off(&self) {
        if let Some(Some(period)) = self.0.with_engine(ScanEngine::blanking_off) {
            self.0.scan_signal.signal(ScanCommand::Start(period));
        }
    }

    /// Whether scanning is stopped.
    #[must_use]
    pub fn is_blanking(&self) -> bool {
        self.0
            .with_engine(|engine| engine.is_blanking())
            .unwrap_or(true)
    }

    /// Drives one scan step. The scan task calls this once per row period.
    ///
    /// # Errors
    ///
    /// Returns [`CannotSetOutputState`](crate::Error::CannotSetOutputState) if a line refuses.
    pub fn tick(&self) -> Result<()> {
        self.0.tick()
    }

    /// The live frame buffer. Use [`FrameBuffer::as_flat`] for the `row * COLS + col` view.
    #[must_use]
    pub fn frame_buffer(&self) -> &'a FrameBuffer<ROWS, COLS> {
        &self.0.frame_buffer
    }

    /// A drawing surface over the frame buffer.
    #[must_use]
    pub fn canvas(&self) -> Canvas<'a, ROWS, COLS> {
        Canvas::new(&self.0.frame_buffer)
    }

    /// Geometry and the single supported pixel format.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        Capabilities::new(COLS, ROWS)
    }

    /// Accepts [`PixelFormat::Mono01`] only.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPixelFormat`](crate::Error::UnsupportedPixelFormat) for any other format.
    pub const fn set_pixel_format(&self, format: PixelFormat) -> Result<()> {
        capabilities::check_pixel_format(format)
    }

    /// Accepts [`Orientation::Normal`] only.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedOrientation`](crate::Error::UnsupportedOrientation) for any other orientation.
    pub const fn set_orientation(&self, orientation: Orientation) -> Result<()> {
        capabilities::check_orientation(orientation)
    }

    /// Decodes a packed monochrome bitmap into the rectangle at (`x`, `y`).
    ///
    /// See [`BufferDescriptor`] for the source layout.
    ///
    /// # Errors
    ///
    /// Returns [`RectangleOutOfBounds`](crate::Error::RectangleOutOfBounds),
    /// [`PitchTooSmall`](crate::Error::PitchTooSmall) or
    /// [`SourceTooShort`](crate::Error::SourceTooShort); the frame buffer is
    /// unchanged on error.
    pub fn write(
        &self,
        x: usize,
        y: usize,
        descriptor: &BufferDescriptor,
        source: &[u8],
    ) -> Result<()> {
        write_rect(&self.0.frame_buffer, x, y, descriptor, source)
    }

    /// Packs the rectangle at (`x`, `y`) into `destination` in the layout [`write`](Self::write) reads.
    ///
    /// # Errors
    ///
    /// The same validation as [`write`](Self::write), applied to `destination`.
    pub fn read(
        &self,
        x: usize,
        y: usize,
        descriptor: &BufferDescriptor,
        destination: &mut [u8],
    ) -> Result<()> {
        read_rect(&self.0.frame_buffer, x, y, descriptor, destination)
    }

    /// Turns every pixel off. Scanning continues.
    pub fn clear(&self) {
        self.0.frame_buffer.clear();
    }
}

// ============================================================================
// Scan task
// ============================================================================

// Must be `pub` (not `pub(crate)`) because called by macro-generated code that expands at the call site in downstream crates.
// This is an implementation detail, not part of the user-facing API.
#[doc(hidden)]
/// Scan loop for [`LedMatrix`]. Called by macro-generated code.
///
/// Since embassy tasks cannot be generic, [`led_matrix!`](crate::led_matrix!)
/// generates a concrete wrapper task that calls this function.
#[cfg(not(feature = "host"))]
pub async fn led_matrix_device_loop<P: OutputPin, const ROWS: usize, const COLS: usize>(
    matrix_static: &'static LedMatrixStatic<P, ROWS, COLS>,
) -> Result<Infallible> {
    defmt::info!("led_matrix_device_loop: task started ({}x{})", ROWS, COLS);
    let mut command = matrix_static.scan_signal.wait().await;
    loop {
        command = match command {
            ScanCommand::Stop => {
                defmt::info!("led_matrix_device_loop: blanked");
                matrix_static.scan_signal.wait().await
            }
            ScanCommand::Start(period) => {
                defmt::info!(
                    "led_matrix_device_loop: scanning every {} us",
                    period.as_micros()
                );
                scan_until_command(matrix_static, period).await?
            }
        };
    }
}

#[cfg(not(feature = "host"))]
async fn scan_until_command<P: OutputPin, const ROWS: usize, const COLS: usize>(
    matrix_static: &'static LedMatrixStatic<P, ROWS, COLS>,
    period: Duration,
) -> Result<ScanCommand> {
    use embassy_futures::select::{Either, select};
    use embassy_time::Ticker;

    let mut ticker = Ticker::every(period);
    loop {
        match select(ticker.next(), matrix_static.scan_signal.wait()).await {
            Either::First(()) => matrix_static.tick()?,
            Either::Second(command) => {
                defmt::debug!("scan_until_command: interrupted by {}", command);
                return Ok(command);
            }
        }
    }
}

// ============================================================================
// Instance macro
// ============================================================================

/// Declares a concrete LED matrix instance and its scan task.
///
/// # Parameters
///
/// - Visibility and type name for the generated resources struct (e.g., `pub Matrix7x7`)
/// - `rows` - Number of row (scan) lines
/// - `cols` - Number of column (data) lines
/// - `refresh_hz` - Full-frame refresh rate; each row is lit for `1 / (refresh_hz * rows)` s
///
/// # Generated API
///
/// - `YourName::new_static()` - `const` constructor for a `static`
/// - `YourName::new(&'static self, row_lines, col_lines, spawner)` - brings up the
///   lines, spawns the scan task and returns the [`LedMatrix`](crate::led_matrix::LedMatrix) handle
///
/// See [`LedMatrix`](crate::led_matrix::LedMatrix) for a complete example.
#[macro_export]
#[cfg(not(feature = "host"))]
macro_rules! led_matrix {
    (
        $vis:vis $name:ident,
        rows: $rows:expr,
        cols: $cols:expr,
        refresh_hz: $refresh_hz:expr $(,)?
    ) => {
        $crate::led_matrix::paste::paste! {
            #[embassy_executor::task]
            async fn [<$name:snake _scan_task>](
                matrix_static: &'static $crate::led_matrix::LedMatrixStatic<
                    $crate::led_matrix::MatrixOutput,
                    { $rows },
                    { $cols },
                >,
            ) {
                let err = $crate::led_matrix::led_matrix_device_loop(matrix_static)
                    .await
                    .unwrap_err();
                panic!("{err}");
            }

            /// Static resources for this LED matrix.
            $vis struct $name {
                matrix_static: $crate::led_matrix::LedMatrixStatic<
                    $crate::led_matrix::MatrixOutput,
                    { $rows },
                    { $cols },
                >,
            }

            impl $name {
                /// Number of row lines.
                pub const ROWS: usize = $rows;
                /// Number of column lines.
                pub const COLS: usize = $cols;
                /// Full-frame refresh rate in Hz.
                pub const REFRESH_HZ: u32 = $refresh_hz;

                /// Create the static resources for this matrix.
                #[must_use]
                pub const fn new_static() -> Self {
                    Self {
                        matrix_static: $crate::led_matrix::LedMatrixStatic::new_static(),
                    }
                }

                /// Bring up the lines and spawn the scan task. The matrix starts blanked.
                pub fn new(
                    &'static self,
                    row_lines: $crate::led_matrix::OutputArray<
                        $crate::led_matrix::MatrixOutput,
                        { $rows },
                    >,
                    col_lines: $crate::led_matrix::OutputArray<
                        $crate::led_matrix::MatrixOutput,
                        { $cols },
                    >,
                    spawner: ::embassy_executor::Spawner,
                ) -> $crate::Result<
                    $crate::led_matrix::LedMatrix<
                        'static,
                        $crate::led_matrix::MatrixOutput,
                        { $rows },
                        { $cols },
                    >,
                > {
                    let led_matrix = $crate::led_matrix::LedMatrix::new(
                        &self.matrix_static,
                        row_lines,
                        col_lines,
                        Self::REFRESH_HZ,
                    )?;
                    let token = [<$name:snake _scan_task>](&self.matrix_static);
                    spawner.spawn(token)?;
                    Ok(led_matrix)
                }
            }
        }
    };
}
