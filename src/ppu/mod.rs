/*!
PPU (2C02) implementation:
- CPU-visible register semantics ($2000..$2007) with the loopy `v`/`t`/`x`/`w` model
- Dot-accurate timing: 341 dots x 262 scanlines, odd-frame dot skip
- Background fetch pipeline with 16-bit pattern and attribute shift registers
- Per-scanline sprite evaluation (8 per line, overflow flag, sprite-zero hit)
- Pixel output through a `PixelSink`, one call per visible dot

Timing model:
- `tick` processes the current (scanline, dot) and then advances by one dot.
- Scanline -1 is the pre-render line (reported as 261 in traces), 0..=239 are
  visible, 240 is idle, 241..=260 are vertical blank.
- Power-up position is scanline 0, dot 0.

STRUCTURE:
- `registers.rs`: register reads/writes that only touch PPU state
- `fetch.rs`: background fetch pipeline and shifters
- `sprite.rs`: sprite evaluation, pattern fetch and per-pixel lookup
- `renderer.rs`: `tick` orchestration and pixel composition
- `loopy.rs`: the `VramAddr` scroll/address register
- `frame.rs`: `PixelSink` and `FrameBuffer`

PPUDATA ($2007) needs the PPU address space and is handled by
`bus::ppu_registers`.
*/

/// Screen width in pixels.
pub const NES_WIDTH: usize = 256;
/// Screen height in pixels.
pub const NES_HEIGHT: usize = 240;

/// Dots per scanline.
pub const DOTS_PER_SCANLINE: u16 = 341;
/// Last scanline before wrapping to the pre-render line.
pub const LAST_SCANLINE: i16 = 260;
/// First vertical-blank scanline.
pub const VBLANK_SCANLINE: i16 = 241;

/// Canonical (approximate) NES master palette (RGB).
pub const NES_PALETTE: [[u8; 3]; 64] = [
    [0x75, 0x75, 0x75],
    [0x27, 0x1B, 0x8F],
    [0x00, 0x00, 0xAB],
    [0x47, 0x00, 0x9F],
    [0x8F, 0x00, 0x77],
    [0xAB, 0x00, 0x13],
    [0xA7, 0x00, 0x00],
    [0x7F, 0x0B, 0x00],
    [0x43, 0x2F, 0x00],
    [0x00, 0x47, 0x00],
    [0x00, 0x51, 0x00],
    [0x00, 0x3F, 0x17],
    [0x1B, 0x3F, 0x5F],
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00],
    [0xBC, 0xBC, 0xBC],
    [0x00, 0x73, 0xEF],
    [0x23, 0x3B, 0xEF],
    [0x83, 0x00, 0xF3],
    [0xBF, 0x00, 0xBF],
    [0xE7, 0x00, 0x5B],
    [0xDB, 0x2B, 0x00],
    [0xCB, 0x4F, 0x0F],
    [0x8B, 0x73, 0x00],
    [0x00, 0x97, 0x00],
    [0x00, 0xAB, 0x00],
    [0x00, 0x93, 0x3B],
    [0x00, 0x83, 0x8B],
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00],
    [0xFF, 0xFF, 0xFF],
    [0x3F, 0xBF, 0xFF],
    [0x5F, 0x97, 0xFF],
    [0xA7, 0x8B, 0xFD],
    [0xF7, 0x7B, 0xFF],
    [0xFF, 0x77, 0xB7],
    [0xFF, 0x77, 0x63],
    [0xFF, 0x9B, 0x3B],
    [0xF3, 0xBF, 0x3F],
    [0x83, 0xD3, 0x13],
    [0x4F, 0xDF, 0x4B],
    [0x58, 0xF8, 0x98],
    [0x00, 0xEB, 0xDB],
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00],
    [0xFF, 0xFF, 0xFF],
    [0xAB, 0xE7, 0xFF],
    [0xC7, 0xD7, 0xFF],
    [0xD7, 0xCB, 0xFF],
    [0xFF, 0xC7, 0xFF],
    [0xFF, 0xC7, 0xDB],
    [0xFF, 0xBF, 0xB3],
    [0xFF, 0xDB, 0xAB],
    [0xFF, 0xE7, 0xA3],
    [0xE3, 0xFF, 0xA3],
    [0xAB, 0xF3, 0xBF],
    [0xB3, 0xFF, 0xCF],
    [0x9F, 0xFF, 0xF3],
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00],
];

pub(crate) mod fetch;
pub mod frame;
pub mod loopy;
pub(crate) mod registers;
pub(crate) mod renderer;
pub(crate) mod sprite;

pub use frame::{FrameBuffer, PixelSink};
pub use loopy::VramAddr;

use fetch::BackgroundPipeline;
use sprite::SpriteLine;

// PPUCTRL
const CTRL_INCREMENT_32: u8 = 0x04;
const CTRL_SPRITE_TABLE: u8 = 0x08;
const CTRL_BG_TABLE: u8 = 0x10;
const CTRL_SPRITE_16: u8 = 0x20;
const CTRL_NMI: u8 = 0x80;

// PPUMASK
const MASK_GREYSCALE: u8 = 0x01;
const MASK_BG_LEFT: u8 = 0x02;
const MASK_SPRITE_LEFT: u8 = 0x04;
const MASK_BG: u8 = 0x08;
const MASK_SPRITES: u8 = 0x10;

// PPUSTATUS
const STATUS_OVERFLOW: u8 = 0x20;
const STATUS_SPRITE_ZERO: u8 = 0x40;
const STATUS_VBLANK: u8 = 0x80;

pub struct Ppu {
    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,
    oam: [u8; 256],

    v: VramAddr,
    t: VramAddr,
    fine_x: u8,
    w: bool,

    // PPUDATA read buffer and the last value driven on the register bus.
    data_buffer: u8,
    io_latch: u8,

    scanline: i16,
    dot: u16,
    odd_frame: bool,
    frame_count: u64,

    nmi_latch: bool,
    frame_complete: bool,

    bg: BackgroundPipeline,
    sprites: SpriteLine,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            oam: [0; 256],
            v: VramAddr::default(),
            t: VramAddr::default(),
            fine_x: 0,
            w: false,
            data_buffer: 0,
            io_latch: 0,
            scanline: 0,
            dot: 0,
            odd_frame: false,
            frame_count: 0,
            nmi_latch: false,
            frame_complete: false,
            bg: BackgroundPipeline::default(),
            sprites: SpriteLine::default(),
        }
    }

    /// Return to power-up state. OAM contents are cleared as well.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // Flag setters
    pub fn set_vblank(&mut self, on: bool) {
        self.set_status_bit(STATUS_VBLANK, on);
    }
    pub fn set_sprite_zero_hit(&mut self, on: bool) {
        self.set_status_bit(STATUS_SPRITE_ZERO, on);
    }
    pub fn set_sprite_overflow(&mut self, on: bool) {
        self.set_status_bit(STATUS_OVERFLOW, on);
    }

    fn set_status_bit(&mut self, bit: u8, on: bool) {
        if on {
            self.status |= bit;
        } else {
            self.status &= !bit;
        }
    }

    // Flag queries
    pub fn vblank(&self) -> bool {
        (self.status & STATUS_VBLANK) != 0
    }
    pub fn sprite_zero_hit(&self) -> bool {
        (self.status & STATUS_SPRITE_ZERO) != 0
    }
    pub fn sprite_overflow(&self) -> bool {
        (self.status & STATUS_OVERFLOW) != 0
    }
    pub fn nmi_enabled(&self) -> bool {
        (self.ctrl & CTRL_NMI) != 0
    }

    /// Background or sprites enabled in PPUMASK.
    pub fn rendering_enabled(&self) -> bool {
        (self.mask & (MASK_BG | MASK_SPRITES)) != 0
    }

    // Timing
    pub fn scanline(&self) -> i16 {
        self.scanline
    }
    pub fn dot(&self) -> u16 {
        self.dot
    }
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
    pub fn odd_frame(&self) -> bool {
        self.odd_frame
    }

    // Frame completion & NMI latch
    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }
    pub fn take_nmi_request(&mut self) -> bool {
        std::mem::take(&mut self.nmi_latch)
    }

    // Register-level accessors
    pub fn ctrl(&self) -> u8 {
        self.ctrl
    }
    pub fn mask(&self) -> u8 {
        self.mask
    }
    pub fn status(&self) -> u8 {
        self.status
    }
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }
    pub fn oam(&self) -> &[u8; 256] {
        &self.oam
    }
    pub fn vram_addr(&self) -> u16 {
        self.v.get() & 0x3FFF
    }
    pub fn temp_addr(&self) -> u16 {
        self.t.get()
    }
    pub fn fine_x(&self) -> u8 {
        self.fine_x
    }
    pub fn write_toggle(&self) -> bool {
        self.w
    }
    pub fn data_buffer(&self) -> u8 {
        self.data_buffer
    }
    pub fn set_data_buffer(&mut self, v: u8) {
        self.data_buffer = v;
    }
    pub fn io_latch(&self) -> u8 {
        self.io_latch
    }
    pub fn latch_io(&mut self, v: u8) {
        self.io_latch = v;
    }

    /// Advance `v` by 1 or 32 per PPUCTRL bit 2 after a PPUDATA access.
    pub fn increment_vram_addr(&mut self) {
        let step = if (self.ctrl & CTRL_INCREMENT_32) != 0 {
            32
        } else {
            1
        };
        self.v.set(self.v.get().wrapping_add(step));
    }

    fn sprite_height(&self) -> i16 {
        if (self.ctrl & CTRL_SPRITE_16) != 0 { 16 } else { 8 }
    }
}
