//! Recording GPIO pins for host-level tests.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

/// Identifies one drive line on the test board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    Row(usize),
    Col(usize),
}

#[derive(Default)]
struct BoardState {
    high: HashMap<Line, bool>,
    events: Vec<(Line, bool)>,
    failing: Option<Line>,
}

/// Shared record of every pin level set through a [`MockPin`].
#[derive(Clone, Default)]
pub struct Board(Rc<RefCell<BoardState>>);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_pins<const N: usize>(&self) -> [MockPin; N] {
        core::array::from_fn(|index| MockPin {
            line: Line::Row(index),
            board: self.clone(),
        })
    }

    pub fn col_pins<const N: usize>(&self) -> [MockPin; N] {
        core::array::from_fn(|index| MockPin {
            line: Line::Col(index),
            board: self.clone(),
        })
    }

    /// Every later attempt to drive `line` fails.
    pub fn fail(&self, line: Line) {
        self.0.borrow_mut().failing = Some(line);
    }

    /// Whether `line` was last driven high. Never-driven lines read `None`.
    pub fn is_high(&self, line: Line) -> Option<bool> {
        self.0.borrow().high.get(&line).copied()
    }

    /// Rows currently driven high, in index order.
    pub fn high_rows(&self, rows: usize) -> Vec<usize> {
        (0..rows)
            .filter(|&row| self.is_high(Line::Row(row)) == Some(true))
            .collect()
    }

    /// Columns currently driven high, in index order.
    pub fn high_cols(&self, cols: usize) -> Vec<usize> {
        (0..cols)
            .filter(|&col| self.is_high(Line::Col(col)) == Some(true))
            .collect()
    }

    pub fn events(&self) -> Vec<(Line, bool)> {
        self.0.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }
}

#[derive(Debug)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockPin {
    line: Line,
    board: Board,
}

impl MockPin {
    fn drive(&mut self, high: bool) -> Result<(), MockPinError> {
        let mut state = self.board.0.borrow_mut();
        if state.failing == Some(self.line) {
            return Err(MockPinError);
        }
        state.high.insert(self.line, high);
        state.events.push((self.line, high));
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// Packs `pixels` most-significant-bit first, `pitch` bits per row, padding bits set to `pad`.
pub fn pack_msb<const W: usize>(pixels: &[[bool; W]], pitch: usize, pad: bool) -> Vec<u8> {
    let total_bits = pitch * pixels.len();
    let mut bytes = vec![0_u8; total_bits.div_ceil(8)];
    for (row_index, row) in pixels.iter().enumerate() {
        for bit_index in 0..pitch {
            let on = row.get(bit_index).copied().unwrap_or(pad);
            if on {
                let position = row_index * pitch + bit_index;
                bytes[position / 8] |= 0b1000_0000 >> (position % 8);
            }
        }
    }
    bytes
}

/// The 7x7 identity diagonal.
pub fn diagonal_7x7() -> [[bool; 7]; 7] {
    core::array::from_fn(|row| core::array::from_fn(|col| row == col))
}
