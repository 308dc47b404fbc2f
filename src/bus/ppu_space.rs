#![doc = r#"
PPU address-space module: decoding, mirroring and the VRAM/palette store.

Purpose
- Decode a 14-bit PPU address into a (device, local index) pair through a
  range table, mirroring the CPU-side decoder.
- Own nametable VRAM and palette RAM and apply their mirroring rules.
- Forward pattern-table accesses ($0000-$1FFF) to the cartridge CHR.

Mirroring
- Addresses are masked to $0000-$3FFF first, so $4000+ aliases the low space.
- Nametables: $3000-$3EFF mirrors $2000-$2EFF, then the four logical 1 KiB
  tables fold per the cartridge layout:
  - Horizontal: tables 0/1 share bank 0, tables 2/3 share bank 1
  - Vertical:   tables 0/2 share bank 0, tables 1/3 share bank 1
  - Single-screen lower/upper: every table maps to bank 0 / bank 1
  - Four-screen: each table has its own 1 KiB
- Palette: 32 bytes mirrored every $20; $3F10/$3F14/$3F18/$3F1C alias
  $3F00/$3F04/$3F08/$3F0C.
"#]

use crate::cartridge::{Cartridge, Mirroring};

/// Device selected by the PPU address decoder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PpuDevice {
    PatternTable,
    Nametable,
    Palette,
}

struct PpuRange {
    start: u16,
    end: u16,
    device: PpuDevice,
}

const PPU_MEMORY_MAP: [PpuRange; 3] = [
    PpuRange {
        start: 0x0000,
        end: 0x1FFF,
        device: PpuDevice::PatternTable,
    },
    PpuRange {
        start: 0x2000,
        end: 0x3EFF,
        device: PpuDevice::Nametable,
    },
    PpuRange {
        start: 0x3F00,
        end: 0x3FFF,
        device: PpuDevice::Palette,
    },
];

/// Resolve a PPU address into its device and local index.
///
/// Pattern-table indices are CHR addresses ($0000-$1FFF), nametable indices
/// are offsets into the 4 KiB VRAM store, palette indices are 0..=31.
/// `None` means the table has a hole; the 14-bit mask keeps that from
/// happening with the current map.
pub fn decode_ppu_addr(addr: u16, mirroring: Mirroring) -> Option<(PpuDevice, usize)> {
    let a = addr & 0x3FFF;
    let device = PPU_MEMORY_MAP
        .iter()
        .find(|r| (r.start..=r.end).contains(&a))?
        .device;
    let index = match device {
        PpuDevice::PatternTable => a as usize,
        PpuDevice::Nametable => map_nametable_addr(a, mirroring),
        PpuDevice::Palette => map_palette_addr(a),
    };
    Some((device, index))
}

/// Palette RAM index (0..=31) for an address in $3F00-$3FFF.
pub fn map_palette_addr(addr: u16) -> usize {
    let idx = (addr & 0x1F) as usize;
    if idx >= 0x10 && (idx & 0x03) == 0 {
        idx - 0x10
    } else {
        idx
    }
}

/// VRAM index (0..0x1000) for a nametable address in $2000-$3EFF.
pub fn map_nametable_addr(addr: u16, mirroring: Mirroring) -> usize {
    let a = (addr - 0x2000) & 0x0FFF;
    let table = (a / 0x0400) as usize;
    let offset = (a % 0x0400) as usize;

    let bank = match mirroring {
        Mirroring::Horizontal => table / 2,
        Mirroring::Vertical => table % 2,
        Mirroring::SingleScreenLower => 0,
        Mirroring::SingleScreenUpper => 1,
        Mirroring::FourScreen => table,
    };
    bank * 0x0400 + offset
}

// ----------------------------------------------------------------------------
// PPU address space container
// ----------------------------------------------------------------------------

/// Nametable VRAM and palette RAM with PPU-visible read/write helpers.
///
/// VRAM is 4 KiB so four-screen boards get distinct tables; the other
/// layouts only ever touch the first 2 KiB.
pub struct PpuAddressSpace {
    nametables: [u8; 0x1000],
    palette: [u8; 32],
}

impl Default for PpuAddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl PpuAddressSpace {
    pub fn new() -> Self {
        Self {
            nametables: [0; 0x1000],
            palette: [0; 32],
        }
    }

    pub fn reset(&mut self) {
        self.nametables.fill(0);
        self.palette.fill(0);
    }

    /// Read from the PPU address space. Without a cartridge, pattern reads
    /// return 0 and nametables fold horizontally.
    pub fn read(&self, addr: u16, cart: Option<&Cartridge>) -> u8 {
        let mirroring = cart.map_or(Mirroring::Horizontal, Cartridge::mirroring);
        match decode_ppu_addr(addr, mirroring) {
            Some((PpuDevice::PatternTable, a)) => cart.map_or(0, |c| c.read_chr(a as u16)),
            Some((PpuDevice::Nametable, i)) => self.nametables[i],
            Some((PpuDevice::Palette, i)) => self.palette[i],
            None => {
                log::error!("PPU read from undecoded address ${addr:04X}");
                0
            }
        }
    }

    pub fn write(&mut self, addr: u16, value: u8, cart: Option<&mut Cartridge>) {
        let mirroring = cart
            .as_ref()
            .map_or(Mirroring::Horizontal, |c| c.mirroring());
        match decode_ppu_addr(addr, mirroring) {
            Some((PpuDevice::PatternTable, a)) => {
                if let Some(c) = cart {
                    c.write_chr(a as u16, value);
                }
            }
            Some((PpuDevice::Nametable, i)) => self.nametables[i] = value,
            Some((PpuDevice::Palette, i)) => self.palette[i] = value,
            None => log::error!("PPU write to undecoded address ${addr:04X} ignored"),
        }
    }
}
