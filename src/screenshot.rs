//! PNG export of the frame buffer (feature `screenshot`).

use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::EmuError;
use crate::ppu::{FrameBuffer, NES_HEIGHT, NES_WIDTH};

/// Convert the frame to RGBA through the master palette.
pub fn frame_to_image(frame: &FrameBuffer) -> Result<RgbaImage, EmuError> {
    RgbaImage::from_raw(NES_WIDTH as u32, NES_HEIGHT as u32, frame.to_rgba()).ok_or_else(|| {
        EmuError::Io(std::io::Error::other("frame buffer size does not match 256x240"))
    })
}

/// Write the current frame to `path` as a 256x240 PNG.
pub fn save_png<P: AsRef<Path>>(frame: &FrameBuffer, path: P) -> Result<(), EmuError> {
    let img = frame_to_image(frame)?;
    img.save_with_format(path.as_ref(), ImageFormat::Png)?;
    log::info!("saved screenshot to {}", path.as_ref().display());
    Ok(())
}
