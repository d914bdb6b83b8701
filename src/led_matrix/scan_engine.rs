//! Row-at-a-time multiplexing over an [`OutputArray`] of rows and one of columns.

use core::num::NonZeroU32;

#[cfg(feature = "display-trace")]
use defmt::info;
use embassy_time::Duration;
use embedded_hal::digital::OutputPin;

use super::{FrameBuffer, LineKind, OutputArray};
use crate::Result;
use crate::error::Error::ZeroRefreshFrequency;

/// Scan cursor plus the lines it drives.
///
/// Each [`tick`](Self::tick) turns off the row driven last time, sets every
/// column from the next row of the frame buffer, then turns that row on. With
/// the old row dark before any column changes, a column never lights a pixel
/// in the wrong row. `ROWS` ticks paint one frame.
pub struct ScanEngine<P, const ROWS: usize, const COLS: usize> {
    row_lines: OutputArray<P, ROWS>,
    col_lines: OutputArray<P, COLS>,
    refresh_hz: NonZeroU32,
    /// The row driven by the most recent tick.
    current_row: usize,
    blanking: bool,
}

impl<P: OutputPin, const ROWS: usize, const COLS: usize> ScanEngine<P, ROWS, COLS> {
    /// Brings up the line set: every row, then every column, is driven inactive.
    ///
    /// The engine starts blanked; nothing is scanned until
    /// [`blanking_off`](Self::blanking_off).
    ///
    /// # Errors
    ///
    /// Returns [`ZeroRefreshFrequency`](crate::Error::ZeroRefreshFrequency) for a
    /// zero `refresh_hz`, or [`DeviceNotReady`](crate::Error::DeviceNotReady)
    /// naming the first line that could not be driven.
    pub fn new(
        mut row_lines: OutputArray<P, ROWS>,
        mut col_lines: OutputArray<P, COLS>,
        refresh_hz: u32,
    ) -> Result<Self> {
        const { assert!(ROWS > 0 && COLS > 0, "matrix must have at least one row and one column") };
        let refresh_hz = NonZeroU32::new(refresh_hz).ok_or(ZeroRefreshFrequency)?;
        row_lines.init_inactive(LineKind::Row)?;
        col_lines.init_inactive(LineKind::Column)?;
        Ok(Self {
            row_lines,
            col_lines,
            refresh_hz,
            current_row: ROWS - 1,
            blanking: true,
        })
    }

    /// Time each row stays lit: `1 / (refresh_hz * ROWS)` seconds.
    #[must_use]
    pub fn period(&self) -> Duration {
        let ticks_per_second = u64::from(self.refresh_hz.get()).saturating_mul(ROWS as u64);
        Duration::from_hz(ticks_per_second)
    }

    /// Whether scanning is suspended.
    #[must_use]
    pub const fn is_blanking(&self) -> bool {
        self.blanking
    }

    /// The row driven by the most recent tick (`ROWS - 1` before the first tick).
    #[must_use]
    pub const fn current_row(&self) -> usize {
        self.current_row
    }

    /// Resumes scanning. The first following tick drives row 0.
    ///
    /// Returns the tick period when scanning was actually resumed and `None`
    /// when it was already running.
    pub fn blanking_off(&mut self) -> Option<Duration> {
        if !self.blanking {
            return None;
        }
        self.current_row = ROWS - 1;
        self.blanking = false;
        #[cfg(feature = "display-trace")]
        info!("blanking_off: period {} us", self.period().as_micros());
        Some(self.period())
    }

    /// Suspends scanning, then drives every column and then every row inactive.
    ///
    /// Returns `true` when scanning was actually suspended.
    ///
    /// # Errors
    ///
    /// Returns [`CannotSetOutputState`](crate::Error::CannotSetOutputState) if a line
    /// refuses. Every other line is still driven inactive and the engine is
    /// blanked either way, so no further ticks drive lines.
    pub fn blanking_on(&mut self) -> Result<bool> {
        if self.blanking {
            return Ok(false);
        }
        self.blanking = true;
        let columns = self.col_lines.set_all_inactive();
        let rows = self.row_lines.set_all_inactive();
        columns.and(rows)?;
        #[cfg(feature = "display-trace")]
        info!("blanking_on");
        Ok(true)
    }

    /// Displays the next row of `frame_buffer`. Does nothing while blanked.
    ///
    /// # Errors
    ///
    /// Returns [`CannotSetOutputState`](crate::Error::CannotSetOutputState) if a line refuses.
    pub fn tick(&mut self, frame_buffer: &FrameBuffer<ROWS, COLS>) -> Result<()> {
        if self.blanking {
            return Ok(());
        }
        let previous_row = self.current_row;
        let row = previous_row
            .checked_add(1)
            .filter(|&next| next < ROWS)
            .unwrap_or(0);

        self.row_lines.set_asserted_at_index(previous_row, false)?;
        self.col_lines.set_from_pixels(frame_buffer.row(row))?;
        self.row_lines.set_asserted_at_index(row, true)?;

        self.current_row = row;
        #[cfg(feature = "display-trace")]
        info!("tick: row {}", row);
        Ok(())
    }
}
