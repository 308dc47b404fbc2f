/*!
Cartridge with iNES (v1) loader and Mapper integration.

Features:
- Parse iNES (v1) header from bytes or file path
- Extract PRG ROM, CHR (ROM, or 8 KiB CHR RAM when CHR size == 0) and PRG RAM size
- Determine nametable mirroring, battery flag and mapper ID
- Construct the board (`Nrom`) and expose the narrow adapter surface the Bus uses

Notes:
- iNES 2.0 images are rejected.
- PRG RAM: header byte 8 == 0 allocates 8 KiB by convention.
*/

use std::fs;
use std::path::Path;

use crate::error::EmuError;
use crate::mapper::{Mapper, Nrom};

/// Nametable layout reported by the cartridge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
    SingleScreenLower,
    SingleScreenUpper,
}

pub struct Cartridge {
    mapper: Box<dyn Mapper>,

    mapper_id: u16,
    mirroring: Mirroring,
    battery: bool,

    prg_rom_len: usize,
    chr_len: usize,
    prg_ram_len: usize,
    chr_is_ram: bool,
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("mapper_id", &self.mapper_id)
            .field("mirroring", &self.mirroring)
            .field("battery", &self.battery)
            .field("prg_rom_len", &self.prg_rom_len)
            .field("chr_len", &self.chr_len)
            .field("prg_ram_len", &self.prg_ram_len)
            .field("chr_is_ram", &self.chr_is_ram)
            .finish()
    }
}

impl Cartridge {
    // -------------- Construction --------------

    /// Load a cartridge from raw iNES bytes.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, EmuError> {
        if data.len() < 16 {
            return Err(EmuError::InvalidRom("data too small for iNES header".into()));
        }
        if &data[0..4] != b"NES\x1A" {
            return Err(EmuError::InvalidRom(
                "invalid magic (expected NES<1A>)".into(),
            ));
        }

        let prg_rom_16k_units = data[4] as usize;
        let chr_rom_8k_units = data[5] as usize;
        let flags6 = data[6];
        let flags7 = data[7];
        let prg_ram_8k_units = data[8] as usize;

        if (flags7 & 0x0C) == 0x08 {
            return Err(EmuError::InvalidRom("NES 2.0 format is not supported".into()));
        }

        let mapper_id = ((flags7 & 0xF0) as u16) | ((flags6 >> 4) as u16);

        let mirroring = if flags6 & 0b0000_1000 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0b0000_0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let battery = flags6 & 0b0000_0010 != 0;
        let has_trainer = flags6 & 0b0000_0100 != 0;

        let mut offset = 16usize;
        if has_trainer {
            offset += 512;
        }

        let prg_rom_len = prg_rom_16k_units * 16 * 1024;
        let chr_is_ram = chr_rom_8k_units == 0;
        let chr_len = if chr_is_ram {
            8 * 1024
        } else {
            chr_rom_8k_units * 8 * 1024
        };

        let prg_rom = data
            .get(offset..offset + prg_rom_len)
            .ok_or_else(|| EmuError::InvalidRom("data too small for PRG ROM".into()))?
            .to_vec();
        offset += prg_rom_len;

        let chr = if chr_is_ram {
            vec![0; chr_len]
        } else {
            data.get(offset..offset + chr_len)
                .ok_or_else(|| EmuError::InvalidRom("data too small for CHR ROM".into()))?
                .to_vec()
        };

        let prg_ram_len = if prg_ram_8k_units == 0 {
            8 * 1024
        } else {
            prg_ram_8k_units * 8 * 1024
        };

        let mapper: Box<dyn Mapper> = match mapper_id {
            0 => Box::new(Nrom::new(prg_rom, chr, chr_is_ram, prg_ram_len)),
            other => return Err(EmuError::UnsupportedMapper(other)),
        };

        log::debug!(
            "loaded cartridge: mapper {mapper_id}, PRG {prg_rom_len} bytes, CHR {chr_len} bytes{}, {mirroring:?} mirroring",
            if chr_is_ram { " (RAM)" } else { "" }
        );

        Ok(Self {
            mapper,
            mapper_id,
            mirroring,
            battery,
            prg_rom_len,
            chr_len,
            prg_ram_len,
            chr_is_ram,
        })
    }

    /// Load a cartridge from an iNES file (.nes).
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, EmuError> {
        let bytes = fs::read(path)?;
        Self::from_ines_bytes(&bytes)
    }

    // -------------- Adapter surface used by the Bus --------------

    /// CPU read in $4020..=$FFFF; `None` when the board leaves the bus floating.
    #[inline]
    pub fn read_prg(&self, addr: u16) -> Option<u8> {
        self.mapper.cpu_read(addr)
    }

    /// CPU write in $4020..=$FFFF (PRG RAM, board registers; ROM writes are dropped).
    #[inline]
    pub fn write_prg(&mut self, addr: u16, value: u8) {
        self.mapper.cpu_write(addr, value);
    }

    #[inline]
    pub fn read_chr(&self, addr: u16) -> u8 {
        self.mapper.ppu_read(addr)
    }

    #[inline]
    pub fn write_chr(&mut self, addr: u16, value: u8) {
        self.mapper.ppu_write(addr, value);
    }

    /// Effective nametable layout. A four-screen header cannot be overridden by the board.
    pub fn mirroring(&self) -> Mirroring {
        if self.mirroring == Mirroring::FourScreen {
            return Mirroring::FourScreen;
        }
        self.mapper.current_mirroring().unwrap_or(self.mirroring)
    }

    pub fn irq_pending(&self) -> bool {
        self.mapper.irq_pending()
    }

    // -------------- Accessors --------------

    pub fn mapper_id(&self) -> u16 {
        self.mapper_id
    }

    pub fn battery_backed(&self) -> bool {
        self.battery
    }

    pub fn prg_rom_len(&self) -> usize {
        self.prg_rom_len
    }

    pub fn chr_len(&self) -> usize {
        self.chr_len
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }

    pub fn prg_ram_len(&self) -> usize {
        self.prg_ram_len
    }
}
