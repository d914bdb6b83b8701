//! Per-pixel storage shared by the writer and the scan task.

use core::sync::atomic::Ordering;

use portable_atomic::AtomicU8;

/// One byte per logical pixel, row-major, holding `0` (off) or `1` (on).
///
/// The buffer has no lock. The scan task reads one row per tick while writers
/// store pixels one at a time, so a write that lands mid-tick can show a single
/// row with a mix of old and new pixels for one row period. The next full scan
/// repaints that row from the settled buffer. Each pixel is an atomic byte, so
/// the overlap is visible but never undefined.
pub struct FrameBuffer<const ROWS: usize, const COLS: usize>([[AtomicU8; COLS]; ROWS]);

impl<const ROWS: usize, const COLS: usize> FrameBuffer<ROWS, COLS> {
    /// Create an all-off buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self([const { [const { AtomicU8::new(0) }; COLS] }; ROWS])
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        ROWS
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        COLS
    }

    /// Pixel at (`col`, `row`), or `None` when off the matrix.
    #[must_use]
    pub fn pixel(&self, col: usize, row: usize) -> Option<u8> {
        self.0
            .get(row)?
            .get(col)
            .map(|pixel| pixel.load(Ordering::Relaxed))
    }

    /// Stores `value` (any non-zero value is stored as `1`). Returns `false` when off the matrix.
    pub fn set_pixel(&self, col: usize, row: usize, value: u8) -> bool {
        match self.0.get(row).and_then(|cells| cells.get(col)) {
            Some(pixel) => {
                pixel.store(u8::from(value != 0), Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Current values of one row, left to right. Empty when `row` is off the matrix.
    pub fn row(&self, row: usize) -> impl Iterator<Item = u8> + '_ {
        self.0
            .get(row)
            .into_iter()
            .flatten()
            .map(|pixel| pixel.load(Ordering::Relaxed))
    }

    /// The flat `rows * cols` view, indexed by `row * cols + col`.
    #[must_use]
    pub fn as_flat(&self) -> &[AtomicU8] {
        self.0.as_flattened()
    }

    /// Turn every pixel off.
    pub fn clear(&self) {
        for pixel in self.as_flat() {
            pixel.store(0, Ordering::Relaxed);
        }
    }

    /// Copy of the current contents, `snapshot[row][col]`.
    #[must_use]
    pub fn snapshot(&self) -> [[u8; COLS]; ROWS] {
        let mut snapshot = [[0_u8; COLS]; ROWS];
        for (dst_row, src_row) in snapshot.iter_mut().zip(&self.0) {
            for (dst, src) in dst_row.iter_mut().zip(src_row) {
                *dst = src.load(Ordering::Relaxed);
            }
        }
        snapshot
    }

    /// Order-sensitive checksum (FNV-1a) over every pixel, for cheap before/after comparisons.
    #[must_use]
    pub fn checksum(&self) -> u32 {
        self.as_flat().iter().fold(0x811c_9dc5_u32, |hash, pixel| {
            (hash ^ u32::from(pixel.load(Ordering::Relaxed))).wrapping_mul(0x0100_0193)
        })
    }
}

impl<const ROWS: usize, const COLS: usize> Default for FrameBuffer<ROWS, COLS> {
    fn default() -> Self {
        Self::new()
    }
}
