//! Generate a packed monochrome bitmap constant from a PNG file.
//!
//! Each row is padded to a whole number of bytes, so the printed pitch is the
//! width rounded up to a multiple of 8. A pixel is lit when its luminance is at
//! least `threshold`.

use std::fs::File;
use std::path::Path;

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum BitOrder {
    Msb,
    Lsb,
}

impl BitOrder {
    fn mask(self, bit: usize) -> u8 {
        match self {
            BitOrder::Msb => 0b1000_0000 >> bit,
            BitOrder::Lsb => 0b0000_0001 << bit,
        }
    }

    fn rust_name(self) -> &'static str {
        match self {
            BitOrder::Msb => "MsbFirst",
            BitOrder::Lsb => "LsbFirst",
        }
    }
}

pub fn generate_bitmap(
    path: &Path,
    name: &str,
    threshold: u8,
    bit_order: BitOrder,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut decoder = png::Decoder::new(File::open(path)?);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => return Err(format!("Unsupported color type: {other:?}").into()),
    };
    let width = info.width as usize;
    let height = info.height as usize;
    let pitch = width.div_ceil(8) * 8;
    let bytes_per_row = pitch / 8;

    println!("// Bitmap generated from {}", path.display());
    println!("// Auto-generated - do not edit manually");
    println!("// BufferDescriptor::new({width}, {height}, {pitch})");
    println!(
        "//     .with_bit_order(BitOrder::{})",
        bit_order.rust_name()
    );
    println!("const {name}: [u8; {}] = [", bytes_per_row * height);

    for row in 0..height {
        let mut row_bytes = vec![0_u8; bytes_per_row];
        for col in 0..width {
            let offset = (row * width + col) * channels;
            let luminance = if channels >= 3 {
                let (r, g, b) = (
                    u32::from(buf[offset]),
                    u32::from(buf[offset + 1]),
                    u32::from(buf[offset + 2]),
                );
                // ITU-R BT.601 weights, scaled by 1000
                ((299 * r + 587 * g + 114 * b) / 1000) as u8
            } else {
                buf[offset]
            };
            if luminance >= threshold {
                row_bytes[col / 8] |= bit_order.mask(col % 8);
            }
        }
        let formatted: Vec<String> = row_bytes.iter().map(|byte| format!("0b{byte:08b}")).collect();
        println!("    {},", formatted.join(", "));
    }

    println!("];");
    Ok(())
}
