use embedded_hal::digital::{OutputPin, PinState};

use crate::Result;
use crate::error::Error::{CannotSetOutputState, DeviceNotReady, IndexOutOfBounds};
use crate::led_matrix::LineKind;

/// Which electrical level asserts a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format, Default)]
pub enum Polarity {
    /// Driving the pin high asserts the line.
    #[default]
    ActiveHigh,
    /// Driving the pin low asserts the line.
    ActiveLow,
}

impl Polarity {
    #[inline]
    const fn pin_state(self, asserted: bool) -> PinState {
        match (self, asserted) {
            (Self::ActiveHigh, true) | (Self::ActiveLow, false) => PinState::High,
            (Self::ActiveHigh, false) | (Self::ActiveLow, true) => PinState::Low,
        }
    }
}

/// Array of GPIO output pins for one side (rows or columns) of an LED matrix.
///
/// Every pin in the array shares one [`Polarity`]. See the
/// [`LedMatrix`](crate::led_matrix::LedMatrix) documentation for usage examples.
pub struct OutputArray<P, const N: usize> {
    outputs: [P; N],
    polarity: Polarity,
}

impl<P: OutputPin, const N: usize> OutputArray<P, N> {
    /// Lines asserted by driving the pin high.
    pub const fn new(outputs: [P; N]) -> Self {
        Self {
            outputs,
            polarity: Polarity::ActiveHigh,
        }
    }

    /// Lines asserted by driving the pin low, such as the cathode side of a common-cathode matrix.
    pub const fn new_active_low(outputs: [P; N]) -> Self {
        Self {
            outputs,
            polarity: Polarity::ActiveLow,
        }
    }

    /// The polarity shared by every line in this array.
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Drives every line to its inactive level, reporting the first line that refuses.
    pub(crate) fn init_inactive(&mut self, kind: LineKind) -> Result<()> {
        let level = self.polarity.pin_state(false);
        for (index, output) in self.outputs.iter_mut().enumerate() {
            output
                .set_state(level)
                .map_err(|_| DeviceNotReady { kind, index })?;
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn set_asserted_at_index(&mut self, index: usize, asserted: bool) -> Result<()> {
        let level = self.polarity.pin_state(asserted);
        self.get_mut(index)
            .ok_or(IndexOutOfBounds)?
            .set_state(level)
            .map_err(|_| CannotSetOutputState)
    }

    /// Drives every line inactive, continuing past lines that refuse.
    pub(crate) fn set_all_inactive(&mut self) -> Result<()> {
        let level = self.polarity.pin_state(false);
        let mut result = Ok(());
        for output in &mut self.outputs {
            if output.set_state(level).is_err() {
                result = Err(CannotSetOutputState);
            }
        }
        result
    }

    /// Sets each line from the matching pixel; a non-zero pixel asserts its line.
    #[inline]
    pub(crate) fn set_from_pixels(&mut self, pixels: impl IntoIterator<Item = u8>) -> Result<()> {
        for (output, pixel) in self.outputs.iter_mut().zip(pixels) {
            output
                .set_state(self.polarity.pin_state(pixel != 0))
                .map_err(|_| CannotSetOutputState)?;
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut P> {
        self.outputs.get_mut(index)
    }
}
