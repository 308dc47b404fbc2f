/*!
Cartridge adapter: the `Mapper` trait and the NROM (mapper 0) board.

The Bus talks to cartridge hardware only through this trait:
- CPU $4020..=$FFFF is forwarded to `cpu_read` / `cpu_write` (PRG ROM, PRG RAM).
- PPU $0000..=$1FFF is forwarded to `ppu_read` / `ppu_write` (CHR ROM or CHR RAM).
- `current_mirroring` lets a board override the header nametable layout.

Bank switching and header parsing live behind this interface; the Bus never
inspects ROM contents itself.
*/

use crate::cartridge::Mirroring;

/// Common interface all cartridge boards implement.
///
/// All addresses are full, unmasked CPU or PPU addresses.
pub trait Mapper {
    /// Mapper numeric identifier (e.g., 0 for NROM).
    fn mapper_id(&self) -> u16;

    /// CPU-visible read in $4020..=$FFFF. `None` means nothing drives the
    /// data bus at that address (the Bus substitutes its open-bus value).
    fn cpu_read(&self, addr: u16) -> Option<u8>;

    /// CPU-visible write in $4020..=$FFFF.
    fn cpu_write(&mut self, addr: u16, value: u8);

    /// PPU-visible read in $0000..=$1FFF (pattern tables).
    fn ppu_read(&self, addr: u16) -> u8;

    /// PPU-visible write in $0000..=$1FFF. Ignored for CHR ROM.
    fn ppu_write(&mut self, addr: u16, value: u8);

    /// Board-controlled nametable layout. `None` defers to the header.
    fn current_mirroring(&self) -> Option<Mirroring> {
        None
    }

    /// Whether the board is asserting the CPU IRQ line.
    fn irq_pending(&self) -> bool {
        false
    }
}

/// NROM (mapper 0).
///
/// - PRG ROM: 16 KiB (NROM-128, mirrored into $C000) or 32 KiB (NROM-256) at $8000..=$FFFF.
/// - PRG RAM: optional, at $6000..=$7FFF.
/// - CHR: 8 KiB of ROM, or RAM when the image carries no CHR data.
#[derive(Clone, Debug)]
pub struct Nrom {
    prg_rom: Vec<u8>,
    prg_ram: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
}

impl Nrom {
    pub fn new(prg_rom: Vec<u8>, chr: Vec<u8>, chr_is_ram: bool, prg_ram_size: usize) -> Self {
        Self {
            prg_rom,
            prg_ram: vec![0; prg_ram_size],
            chr,
            chr_is_ram,
        }
    }

    #[inline]
    fn prg_rom_read(&self, addr: u16) -> Option<u8> {
        if self.prg_rom.is_empty() {
            return None;
        }
        let rel = (addr - 0x8000) as usize;
        Some(self.prg_rom[rel % self.prg_rom.len()])
    }

    #[inline]
    fn prg_ram_index(&self, addr: u16) -> Option<usize> {
        if self.prg_ram.is_empty() {
            return None;
        }
        Some((addr - 0x6000) as usize % self.prg_ram.len())
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }
}

impl Mapper for Nrom {
    #[inline]
    fn mapper_id(&self) -> u16 {
        0
    }

    fn cpu_read(&self, addr: u16) -> Option<u8> {
        match addr {
            0x6000..=0x7FFF => self.prg_ram_index(addr).map(|i| self.prg_ram[i]),
            0x8000..=0xFFFF => self.prg_rom_read(addr),
            _ => None,
        }
    }

    fn cpu_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x6000..=0x7FFF => {
                if let Some(i) = self.prg_ram_index(addr) {
                    self.prg_ram[i] = value;
                }
            }
            0x8000..=0xFFFF => {
                log::warn!("write ${value:02X} to PRG ROM at ${addr:04X} ignored");
            }
            _ => {
                log::debug!("write ${value:02X} to unmapped cartridge address ${addr:04X}");
            }
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        if self.chr.is_empty() {
            return 0;
        }
        self.chr[(addr as usize) & 0x1FFF]
    }

    fn ppu_write(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram && !self.chr.is_empty() {
            self.chr[(addr as usize) & 0x1FFF] = value;
        }
    }
}
