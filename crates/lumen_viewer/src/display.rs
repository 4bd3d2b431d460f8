//! Frame displays for the headless viewer.

use std::io::Write;

use lumen_renderer::{unpack_rgba, Display, Frame};

/// Logs a line per frame with a checksum of its pixels.
#[derive(Debug, Default)]
pub struct LogDisplay {
    presented: u64,
    last_checksum: Option<u64>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn last_checksum(&self) -> Option<u64> {
        self.last_checksum
    }
}

/// FNV-1a over the frame's bytes.
pub fn checksum(frame: &Frame) -> u64 {
    frame
        .as_bytes()
        .iter()
        .fold(0xcbf2_9ce4_8422_2325, |hash, &byte| {
            (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
        })
}

impl Display for LogDisplay {
    fn present(&mut self, frame: &Frame) -> anyhow::Result<()> {
        let sum = checksum(frame);
        let lit = frame
            .pixels()
            .iter()
            .filter(|&&p| p & 0xFFFF_FF00 != 0)
            .count();

        log::info!(
            "Frame {}: {}x{}, {} lit pixels, checksum {:016x}",
            self.presented,
            frame.width,
            frame.height,
            lit,
            sum
        );

        self.presented += 1;
        self.last_checksum = Some(sum);
        Ok(())
    }
}

const RAMP: &[u8] = b" .:-=+*#%@";

/// Prints frames as ASCII art, one character per sampled pixel.
pub struct AsciiDisplay<W: Write> {
    out: W,
    columns: u32,
}

impl<W: Write> AsciiDisplay<W> {
    /// `columns` caps the width of the printed image.
    pub fn new(out: W, columns: u32) -> Self {
        Self {
            out,
            columns: columns.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Character for a packed pixel, by perceived brightness.
fn shade(pixel: u32) -> char {
    let [r, g, b, _] = unpack_rgba(pixel);
    let luma = 0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64;
    let index = (luma / 255.0 * (RAMP.len() - 1) as f64).round() as usize;
    RAMP[index.min(RAMP.len() - 1)] as char
}

impl<W: Write> Display for AsciiDisplay<W> {
    fn present(&mut self, frame: &Frame) -> anyhow::Result<()> {
        // Terminal cells are about twice as tall as they are wide
        let step_x = frame.width.div_ceil(self.columns).max(1);
        let step_y = step_x * 2;

        for y in (0..frame.height).step_by(step_y as usize) {
            let line: String = (0..frame.width)
                .step_by(step_x as usize)
                .map(|x| frame.get_pixel(x, y).map_or(' ', shade))
                .collect();
            writeln!(self.out, "{}", line.trim_end())?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
