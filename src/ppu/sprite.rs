#![doc = r#"
PPU sprite helpers

Responsibilities
- Per-scanline sprite evaluation at dot 257: select up to 8 OAM entries that
  cover the next scanline, set the overflow flag on a 9th.
- Fetch the selected sprites' pattern rows (8x8 and 8x16, both flips).
- Look up the sprite pixel for an x position with OAM-order priority.

Notes
- OAM Y is the scanline before the sprite's first row, so evaluating on line
  `n` with `row = n - y` produces the rows drawn on line `n + 1`.
- Evaluation on the pre-render line finds nothing; sprites never appear on
  scanline 0.
- The hardware's diagonal overflow scan bug is not reproduced: overflow is set
  whenever more than 8 sprites cover a line.
"#]

use super::{CTRL_SPRITE_TABLE, Ppu};
use crate::ppu_bus::PpuBus;

const MAX_SPRITES_PER_LINE: usize = 8;

#[derive(Clone, Copy, Debug, Default)]
struct SpriteSlot {
    x: u8,
    attr: u8,
    // Pattern planes with horizontal flip already applied: bit 7 is leftmost.
    lo: u8,
    hi: u8,
    is_zero: bool,
}

/// Sprites selected for the line being drawn.
#[derive(Debug, Default)]
pub(crate) struct SpriteLine {
    slots: [SpriteSlot; MAX_SPRITES_PER_LINE],
    count: usize,
}

/// Opaque sprite pixel at a screen position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SpritePixel {
    pub pixel: u8,
    pub palette: u8,
    pub behind_background: bool,
    pub is_zero: bool,
}

impl SpriteLine {
    pub(in crate::ppu) fn clear(&mut self) {
        self.count = 0;
    }

    /// First opaque sprite pixel covering `x`, in OAM order.
    pub(in crate::ppu) fn pixel_at(&self, x: usize) -> Option<SpritePixel> {
        self.slots[..self.count].iter().find_map(|s| {
            let offset = x.checked_sub(s.x as usize).filter(|&o| o < 8)?;
            let bit = 7 - offset;
            let pixel = (((s.hi >> bit) & 1) << 1) | ((s.lo >> bit) & 1);
            (pixel != 0).then_some(SpritePixel {
                pixel,
                palette: s.attr & 0x03,
                behind_background: (s.attr & 0x20) != 0,
                is_zero: s.is_zero,
            })
        })
    }
}

impl Ppu {
    /// Select and fetch the sprites for the next scanline (called at dot 257).
    pub(in crate::ppu) fn evaluate_sprites<B: PpuBus>(&mut self, bus: &B) {
        self.sprites.clear();
        let height = self.sprite_height();

        for index in 0..64 {
            let base = index * 4;
            let row = self.scanline - self.oam[base] as i16;
            if !(0..height).contains(&row) {
                continue;
            }
            if self.sprites.count == MAX_SPRITES_PER_LINE {
                self.set_sprite_overflow(true);
                break;
            }

            let tile = self.oam[base + 1];
            let attr = self.oam[base + 2];
            let addr = self.sprite_row_addr(tile, attr, row as u16);
            let (mut lo, mut hi) = (bus.ppu_read(addr), bus.ppu_read(addr + 8));
            if (attr & 0x40) != 0 {
                lo = lo.reverse_bits();
                hi = hi.reverse_bits();
            }

            self.sprites.slots[self.sprites.count] = SpriteSlot {
                x: self.oam[base + 3],
                attr,
                lo,
                hi,
                is_zero: index == 0,
            };
            self.sprites.count += 1;
        }
    }

    fn sprite_row_addr(&self, tile: u8, attr: u8, row: u16) -> u16 {
        let flip_v = (attr & 0x80) != 0;
        if self.sprite_height() == 8 {
            let table = if (self.ctrl & CTRL_SPRITE_TABLE) != 0 {
                0x1000
            } else {
                0x0000
            };
            let row = if flip_v { 7 - row } else { row };
            table + tile as u16 * 16 + row
        } else {
            // 8x16: bit 0 of the tile index selects the table.
            let table = (tile as u16 & 1) * 0x1000;
            let row = if flip_v { 15 - row } else { row };
            let tile = (tile & 0xFE) as u16 + (row / 8);
            table + tile * 16 + (row & 7)
        }
    }
}
