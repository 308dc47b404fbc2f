#![doc = r#"
PPU background fetch pipeline

Each 8-dot window fetches, in order, the nametable byte, the attribute byte
and the two pattern-table planes for the next tile. The window repeats over
dots 2..=257 (tiles 3..=34 of the current line, the last two being discarded)
and dots 321..=337 (the first two tiles of the next line).

Per dot in the fetch ranges:
1. Shift the four background shifters one bit (when background is shown).
2. By `(dot - 1) % 8`:
   - 0: load the fetched tile into the low byte of the shifters, fetch NT byte
   - 2: fetch the attribute byte, keep the 2 bits for this tile's quadrant
   - 4: fetch pattern low plane
   - 6: fetch pattern high plane
   - 7: increment coarse X (rendering only)

Pixels are taken from bit `15 - fine_x` of the shifters, so the high byte is
the tile being drawn and the low byte the one behind it.
"#]

use super::{CTRL_BG_TABLE, MASK_BG, Ppu};
use crate::ppu_bus::PpuBus;

#[derive(Debug, Default)]
pub(crate) struct BackgroundPipeline {
    next_tile: u8,
    next_attr: u8,
    next_lo: u8,
    next_hi: u8,

    pattern_lo: u16,
    pattern_hi: u16,
    attr_lo: u16,
    attr_hi: u16,
}

impl BackgroundPipeline {
    /// Move the fetched tile into the low byte of every shifter.
    pub(in crate::ppu) fn load(&mut self) {
        self.pattern_lo = (self.pattern_lo & 0xFF00) | self.next_lo as u16;
        self.pattern_hi = (self.pattern_hi & 0xFF00) | self.next_hi as u16;
        let attr = self.next_attr;
        let fill = |bit: u8| if attr & bit != 0 { 0x00FF } else { 0x0000 };
        self.attr_lo = (self.attr_lo & 0xFF00) | fill(0x01);
        self.attr_hi = (self.attr_hi & 0xFF00) | fill(0x02);
    }

    fn shift(&mut self) {
        self.pattern_lo <<= 1;
        self.pattern_hi <<= 1;
        self.attr_lo <<= 1;
        self.attr_hi <<= 1;
    }

    /// (colour index 0..=3, palette 0..=3) for the current dot.
    pub(in crate::ppu) fn pixel(&self, fine_x: u8) -> (u8, u8) {
        let mux = 0x8000u16 >> fine_x;
        let bit = |reg: u16| u8::from(reg & mux != 0);
        let pixel = (bit(self.pattern_hi) << 1) | bit(self.pattern_lo);
        let palette = (bit(self.attr_hi) << 1) | bit(self.attr_lo);
        (pixel, palette)
    }
}

impl Ppu {
    /// One dot of the background pipeline (dots 2..=257 and 321..=337).
    pub(in crate::ppu) fn background_fetch<B: PpuBus>(&mut self, bus: &B) {
        if (self.mask & MASK_BG) != 0 {
            self.bg.shift();
        }

        match (self.dot - 1) % 8 {
            0 => {
                self.bg.load();
                self.bg.next_tile = bus.ppu_read(self.v.tile_addr());
            }
            2 => {
                let attr = bus.ppu_read(self.v.attribute_addr());
                let shift = ((self.v.coarse_y() & 0x02) << 1) | (self.v.coarse_x() & 0x02);
                self.bg.next_attr = (attr >> shift) & 0x03;
            }
            4 => self.bg.next_lo = bus.ppu_read(self.pattern_row_addr()),
            6 => self.bg.next_hi = bus.ppu_read(self.pattern_row_addr() + 8),
            7 => {
                if self.rendering_enabled() {
                    self.v.increment_x();
                }
            }
            _ => {}
        }
    }

    fn pattern_row_addr(&self) -> u16 {
        let table = if (self.ctrl & CTRL_BG_TABLE) != 0 {
            0x1000
        } else {
            0x0000
        };
        table + self.bg.next_tile as u16 * 16 + self.v.fine_y() as u16
    }
}
