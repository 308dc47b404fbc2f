//! Shared test utilities: minimal iNES (v1) images and ready-wired CPU/Bus pairs.
//!
//! iNES header fields used here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units (0 => loader allocates CHR RAM)
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 indicator, mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units
//!
//! Programs built with `build_nrom_with_prg` start at $8000 and all three
//! vectors default to $8000. PRG bytes not covered by the program are 0xAA.

#![allow(dead_code)]

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::core::Cpu;

/// Build a minimal iNES (v1) image. PRG is filled with 0xAA and CHR with 0xCC.
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(16 + 512 + prg_16k * 16 * 1024 + chr_8k * 8 * 1024);

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }
    bytes.resize(bytes.len() + prg_16k * 16 * 1024, 0xAA);
    bytes.resize(bytes.len() + chr_8k * 8 * 1024, 0xCC);
    bytes
}

/// Build an NROM-128 image with `prg` placed at $8000 and the given
/// (reset, nmi, irq) vectors, defaulting to $8000 for all three.
pub fn build_nrom_with_prg(
    prg: &[u8],
    chr_8k: usize,
    prg_ram_8k: u8,
    vectors: Option<(u16, u16, u16)>,
) -> Vec<u8> {
    assert!(prg.len() <= 16 * 1024, "program must fit a 16 KiB PRG bank");

    let mut rom = build_ines(1, chr_8k, 0, 0, prg_ram_8k, None);
    let prg_area = &mut rom[16..16 + 16 * 1024];
    prg_area[..prg.len()].copy_from_slice(prg);

    let (reset, nmi, irq) = vectors.unwrap_or((0x8000, 0x8000, 0x8000));
    set_vectors_in_prg(prg_area, reset, nmi, irq);
    rom
}

/// Write NMI/RESET/IRQ vectors into the last six bytes of a 16 or 32 KiB PRG slice.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let len = prg.len();
    assert!(
        len == 16 * 1024 || len == 32 * 1024,
        "unsupported PRG length {len}"
    );
    let base = len - 6;
    for (i, v) in [nmi, reset, irq].into_iter().enumerate() {
        prg[base + i * 2] = v as u8;
        prg[base + i * 2 + 1] = (v >> 8) as u8;
    }
}

/// Bus with an NROM cartridge (CHR RAM, 8 KiB PRG RAM) holding `prg` at $8000.
pub fn bus_with_program(prg: &[u8]) -> Bus {
    let rom = build_nrom_with_prg(prg, 0, 1, None);
    let cart = Cartridge::from_ines_bytes(&rom).expect("parse test cartridge");
    let mut bus = Bus::new();
    bus.attach_cartridge(cart);
    bus
}

/// CPU reset onto `prg` at $8000.
pub fn cpu_with_program(prg: &[u8]) -> (Cpu, Bus) {
    let mut bus = bus_with_program(prg);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(rom[4], 2);
        assert_eq!(rom[5], 1);
        assert_eq!(rom[6], 0x01);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; 16 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x3FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn writes_vectors_for_32k_prg() {
        let mut prg = vec![0u8; 32 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x7FFA..], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn program_lands_at_8000() {
        let bus = bus_with_program(&[0xA9, 0x01, 0x00]);
        assert_eq!(bus.peek(0x8000), 0xA9);
        assert_eq!(bus.peek(0x8001), 0x01);
        assert_eq!(bus.peek(0xFFFC), 0x00);
        assert_eq!(bus.peek(0xFFFD), 0x80);
    }
}
