/*!
ppu_bus: trait abstraction decoupling the PPU from the concrete `Bus`.

Rationale:
- The PPU only needs read access to its address space (pattern tables,
  nametables, attribute tables, palette) while rendering.
- Accepting a trait instead of a concrete `Bus` lets PPU tests run against a
  lightweight mock without constructing a CPU or cartridge.

Address space expectations (mirroring semantics left to the implementor):
- 0x0000-0x1FFF : Pattern tables (cartridge CHR)
- 0x2000-0x2FFF : Nametables (with mirroring rules)
- 0x3000-0x3EFF : Mirrors of 0x2000-0x2EFF
- 0x3F00-0x3F1F : Palette RAM (universal + sub-palettes; internal mirroring)
- 0x3F20-0x3FFF : Mirrors of 0x3F00-0x3F1F

Reads must be free of side effects; PPUDATA buffering lives on the CPU side.
*/

/// Minimal interface the PPU depends on for memory fetches.
pub trait PpuBus {
    /// Read a byte from the PPU-visible address space with mirroring and
    /// mapper translation applied. Any 16-bit value is accepted and folded
    /// to 14 bits.
    fn ppu_read(&self, addr: u16) -> u8;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::PpuBus;
    use crate::bus::ppu_space::map_palette_addr;

    /// In-memory PPU address space for renderer tests: 8 KiB of pattern data,
    /// a single 4 KiB nametable array without mirroring folds, and palette RAM
    /// with the standard mirrors.
    pub struct MockPpuBus {
        pattern: Vec<u8>,
        nametable: [u8; 0x1000],
        palette: [u8; 32],
    }

    impl Default for MockPpuBus {
        fn default() -> Self {
            Self {
                pattern: vec![0; 0x2000],
                nametable: [0; 0x1000],
                palette: [0; 32],
            }
        }
    }

    impl MockPpuBus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn write(&mut self, addr: u16, value: u8) {
            let a = addr & 0x3FFF;
            match a {
                0x0000..=0x1FFF => self.pattern[a as usize] = value,
                0x2000..=0x3EFF => self.nametable[(a & 0x0FFF) as usize] = value,
                _ => self.palette[map_palette_addr(a)] = value,
            }
        }

        /// Fill one 8x8 tile so every pixel has colour index `ci` (0..=3).
        pub fn solid_tile(&mut self, table: u16, tile: u8, ci: u8) {
            let base = table + tile as u16 * 16;
            let lo = if ci & 1 != 0 { 0xFF } else { 0x00 };
            let hi = if ci & 2 != 0 { 0xFF } else { 0x00 };
            for row in 0..8 {
                self.write(base + row, lo);
                self.write(base + row + 8, hi);
            }
        }
    }

    impl PpuBus for MockPpuBus {
        fn ppu_read(&self, addr: u16) -> u8 {
            let a = addr & 0x3FFF;
            match a {
                0x0000..=0x1FFF => self.pattern[a as usize],
                0x2000..=0x3EFF => self.nametable[(a & 0x0FFF) as usize],
                _ => self.palette[map_palette_addr(a)],
            }
        }
    }
}
