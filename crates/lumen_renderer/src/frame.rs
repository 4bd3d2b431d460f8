//! Frame buffers.
//!
//! Workers write packed pixels into a [`SharedRaster`] while a frame renders.
//! Once every task has completed the raster is copied into a plain [`Frame`]
//! for display.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::transport::Rgb;

/// Pack an RGB color as `0xRRGGBBAA` with full alpha.
#[inline]
pub fn pack_rgba(rgb: Rgb) -> u32 {
    (rgb[0] as u32) << 24 | (rgb[1] as u32) << 16 | (rgb[2] as u32) << 8 | 0xFF
}

/// Split a packed pixel back into RGBA channels.
#[inline]
pub fn unpack_rgba(pixel: u32) -> [u8; 4] {
    pixel.to_be_bytes()
}

/// A finished frame of packed pixels in row-major order, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u32>,
}

impl Frame {
    /// Create a black, fully transparent frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a pixel, or `None` outside the frame.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel. Out-of-bounds writes are logged and dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: u32) {
        match self.index(x, y) {
            Some(i) => self.pixels[i] = pixel,
            None => log::warn!(
                "Pixel ({}, {}) outside {}x{} frame",
                x,
                y,
                self.width,
                self.height
            ),
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw pixel memory, four bytes per pixel in native endianness.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }
}

/// Pixel storage written concurrently by render workers.
///
/// Every task owns a disjoint index range, so relaxed stores are enough;
/// the pool's completion handshake orders them before the frame is read.
#[derive(Debug, Clone)]
pub struct SharedRaster {
    width: u32,
    height: u32,
    pixels: Arc<[AtomicU32]>,
}

impl SharedRaster {
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = (0..width as usize * height as usize)
            .map(|_| AtomicU32::new(0))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Store a packed pixel at a row-major index. Returns false when the
    /// index is outside the raster.
    pub fn write(&self, index: usize, pixel: u32) -> bool {
        match self.pixels.get(index) {
            Some(slot) => {
                slot.store(pixel, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Reset every pixel to zero.
    pub fn clear(&self) {
        for slot in self.pixels.iter() {
            slot.store(0, Ordering::Relaxed);
        }
    }

    /// Copy the current contents into a [`Frame`].
    pub fn snapshot(&self) -> Frame {
        Frame {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .map(|slot| slot.load(Ordering::Relaxed))
                .collect(),
        }
    }
}
