//! Host-level tests for the `LedMatrix` device handle.

mod support;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};
use led_matrix_mux::Error;
use led_matrix_mux::led_matrix::{
    BitOrder, BufferDescriptor, LedMatrix, LedMatrixStatic, Orientation, OutputArray, PixelFormat,
};
use support::{Board, Line, MockPin, diagonal_7x7, pack_msb};

type Matrix7x7<'a> = LedMatrix<'a, MockPin, 7, 7>;

fn matrix_7x7<'a>(matrix_static: &'a LedMatrixStatic<MockPin, 7, 7>, board: &Board) -> Matrix7x7<'a> {
    LedMatrix::new(
        matrix_static,
        OutputArray::new(board.row_pins::<7>()),
        OutputArray::new(board.col_pins::<7>()),
        100,
    )
    .unwrap()
}

#[test]
fn matrix_starts_blanked_with_an_empty_buffer() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);

    assert!(matrix.is_blanking());
    assert_eq!(matrix.frame_buffer().snapshot(), [[0; 7]; 7]);
    assert!(board.high_rows(7).is_empty());
    assert!(board.high_cols(7).is_empty());
}

#[test]
fn ticks_while_blanked_leave_every_line_alone() {
    let matrix_static = Matrix7x7::new_static();
    let board = Board::new();
    let matrix = matrix_7x7(&matrix_static, &board);
    board.clear_events();

    matrix.tick().unwrap();
    assert!(board.events().is_empty());
}

#[test]
fn bring_up_failure_is_reported() {
    let board = Board::new();
    board.fail(Line::Row(0));
    let matrix_static = Matrix7x7::new_static();
    let result = LedMatrix::new(
        &matrix_static,
        OutputArray::new(board.row_pins::<7>()),
        OutputArray::new(board.col_pins::<7>()),
        100,
    );
    assert!(matches!(result, Err(Error::DeviceNotReady { index: 0, .. })));
}

#[test]
fn capabilities_describe_a_monochrome_matrix() {
    let board = Board::new();
    let matrix_static = LedMatrix::<MockPin, 5, 8>::new_static();
    let matrix = LedMatrix::new(
        &matrix_static,
        OutputArray::new(board.row_pins::<5>()),
        OutputArray::new(board.col_pins::<8>()),
        60,
    )
    .unwrap();

    let capabilities = matrix.capabilities();
    assert_eq!(capabilities.x_resolution, 8);
    assert_eq!(capabilities.y_resolution, 5);
    assert_eq!(capabilities.supported_pixel_formats, PixelFormat::Mono01);
    assert_eq!(capabilities.current_pixel_format, PixelFormat::Mono01);
    assert_eq!(capabilities.current_orientation, Orientation::Normal);
}

#[test]
fn only_mono01_and_normal_orientation_are_accepted() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);

    assert!(matrix.set_pixel_format(PixelFormat::Mono01).is_ok());
    assert!(matches!(
        matrix.set_pixel_format(PixelFormat::Rgb888),
        Err(Error::UnsupportedPixelFormat(PixelFormat::Rgb888))
    ));
    assert!(matrix.set_orientation(Orientation::Normal).is_ok());
    assert!(matches!(
        matrix.set_orientation(Orientation::Rotated90),
        Err(Error::UnsupportedOrientation(Orientation::Rotated90))
    ));
}

#[test]
fn written_diagonal_is_scanned_row_by_row() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);

    let source = pack_msb(&diagonal_7x7(), 7, false);
    matrix.write(0, 0, &BufferDescriptor::new(7, 7, 7), &source).unwrap();
    matrix.blanking_off();
    assert!(!matrix.is_blanking());

    for row in 0..7 {
        matrix.tick().unwrap();
        assert_eq!(board.high_rows(7), vec![row]);
        assert_eq!(board.high_cols(7), vec![row]);
    }
}

#[test]
fn bitfield_image_writes_through_the_device() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);

    let image: [u8; 7] = core::array::from_fn(|row| 1 << row);
    let descriptor = BufferDescriptor::new(7, 7, 8).with_bit_order(BitOrder::LsbFirst);
    matrix.write(0, 0, &descriptor, &image).unwrap();

    let mut read_back = [0_u8; 7];
    matrix.read(0, 0, &descriptor, &mut read_back).unwrap();
    assert_eq!(read_back, image);
}

#[test]
fn blanking_on_darkens_the_matrix_and_is_idempotent() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);
    matrix
        .write(0, 0, &BufferDescriptor::new(7, 7, 8), &[0xff; 7])
        .unwrap();
    matrix.blanking_off();
    matrix.tick().unwrap();
    assert_eq!(board.high_rows(7), vec![0]);

    matrix.blanking_on().unwrap();
    assert!(matrix.is_blanking());
    assert!(board.high_rows(7).is_empty());
    assert!(board.high_cols(7).is_empty());

    board.clear_events();
    matrix.blanking_on().unwrap();
    matrix.tick().unwrap();
    assert!(board.events().is_empty());
}

#[test]
fn writes_while_blanked_show_after_blanking_off() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);

    matrix
        .write(2, 0, &BufferDescriptor::new(1, 1, 1), &[0b1000_0000])
        .unwrap();
    matrix.tick().unwrap();
    assert!(board.high_rows(7).is_empty());

    matrix.blanking_off();
    matrix.tick().unwrap();
    assert_eq!(board.high_rows(7), vec![0]);
    assert_eq!(board.high_cols(7), vec![2]);
}

#[test]
fn failed_write_leaves_the_buffer_unchanged() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);
    let source = pack_msb(&diagonal_7x7(), 7, false);
    matrix.write(0, 0, &BufferDescriptor::new(7, 7, 7), &source).unwrap();
    let before = matrix.frame_buffer().checksum();

    assert!(matrix.write(5, 0, &BufferDescriptor::new(3, 1, 3), &[0xff]).is_err());
    assert!(matrix.write(0, 0, &BufferDescriptor::new(7, 7, 8), &[0xff; 3]).is_err());

    assert_eq!(matrix.frame_buffer().checksum(), before);
}

#[test]
fn flat_view_matches_pixel_coordinates() {
    let board = Board::new();
    let matrix_static = LedMatrix::<MockPin, 3, 4>::new_static();
    let matrix = LedMatrix::new(
        &matrix_static,
        OutputArray::new(board.row_pins::<3>()),
        OutputArray::new(board.col_pins::<4>()),
        100,
    )
    .unwrap();

    matrix
        .write(3, 2, &BufferDescriptor::new(1, 1, 1), &[0b1000_0000])
        .unwrap();

    let flat = matrix.frame_buffer().as_flat();
    assert_eq!(flat.len(), 12);
    assert_eq!(flat[2 * 4 + 3].load(core::sync::atomic::Ordering::Relaxed), 1);
    assert_eq!(matrix.frame_buffer().pixel(3, 2), Some(1));
}

#[test]
fn clear_turns_every_pixel_off_while_scanning() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);
    matrix
        .write(0, 0, &BufferDescriptor::new(7, 7, 8), &[0xff; 7])
        .unwrap();
    matrix.blanking_off();
    matrix.tick().unwrap();

    matrix.clear();
    matrix.tick().unwrap();

    assert!(!matrix.is_blanking());
    assert_eq!(board.high_rows(7), vec![1]);
    assert!(board.high_cols(7).is_empty());
}

#[test]
fn canvas_fills_through_embedded_graphics() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);

    let mut canvas = matrix.canvas();
    assert_eq!(canvas.size(), Size::new(7, 7));
    canvas
        .fill_solid(&Rectangle::new(Point::new(5, 5), Size::new(4, 4)), BinaryColor::On)
        .unwrap();

    let snapshot = matrix.frame_buffer().snapshot();
    let lit = snapshot.iter().flatten().filter(|&&pixel| pixel == 1).count();
    assert_eq!(lit, 4);
    assert_eq!(snapshot[6][6], 1);
    assert_eq!(snapshot[4][4], 0);
}

#[test]
fn blanking_on_reports_a_refusing_line_after_darkening_the_rest() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);
    matrix
        .write(0, 0, &BufferDescriptor::new(7, 7, 8), &[0xff; 7])
        .unwrap();
    matrix.blanking_off();
    matrix.tick().unwrap();
    board.fail(Line::Col(3));

    assert!(matches!(matrix.blanking_on(), Err(Error::CannotSetOutputState)));

    assert!(matrix.is_blanking());
    assert!(board.high_rows(7).is_empty());
    matrix.tick().unwrap();
    assert!(board.high_rows(7).is_empty());
}

#[test]
fn read_rejects_bad_rectangles_and_short_destinations() {
    let board = Board::new();
    let matrix_static = Matrix7x7::new_static();
    let matrix = matrix_7x7(&matrix_static, &board);

    let mut destination = [0xaa_u8; 7];
    assert!(matches!(
        matrix.read(0, 0, &BufferDescriptor::new(7, 7, 8), &mut destination[..6]),
        Err(Error::SourceTooShort { needed: 7, actual: 6 })
    ));
    assert!(matches!(
        matrix.read(6, 0, &BufferDescriptor::new(2, 1, 8), &mut destination),
        Err(Error::RectangleOutOfBounds { x: 6, y: 0, width: 2, height: 1 })
    ));
    // Nothing is packed on error.
    assert_eq!(destination, [0xaa; 7]);
}
