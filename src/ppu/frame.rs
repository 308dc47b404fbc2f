//! Pixel output: the `PixelSink` presentation contract and an in-memory
//! `FrameBuffer` that records colour indices.

use super::{NES_HEIGHT, NES_PALETTE, NES_WIDTH};

/// Receiver for PPU output.
///
/// `set_pixel` is called once per visible dot (256 x 240 per frame) with a
/// 6-bit master-palette index; `frame_complete` once per frame at the start
/// of vertical blank.
pub trait PixelSink {
    fn set_pixel(&mut self, x: usize, y: usize, colour: u8);

    fn frame_complete(&mut self) {}
}

/// Colour-index frame buffer.
pub struct FrameBuffer {
    pixels: Vec<u8>,
    frames: u64,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; NES_WIDTH * NES_HEIGHT],
            frames: 0,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * NES_WIDTH + x]
    }

    /// Number of `frame_complete` signals received.
    pub fn frames_completed(&self) -> u64 {
        self.frames
    }

    /// Expand to RGBA8 through the master palette.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &c in &self.pixels {
            let [r, g, b] = NES_PALETTE[(c & 0x3F) as usize];
            out.extend_from_slice(&[r, g, b, 0xFF]);
        }
        out
    }
}

impl PixelSink for FrameBuffer {
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, colour: u8) {
        if x < NES_WIDTH && y < NES_HEIGHT {
            self.pixels[y * NES_WIDTH + x] = colour & 0x3F;
        }
    }

    fn frame_complete(&mut self) {
        self.frames += 1;
    }
}
