/*!
CPU interface dispatcher

Purpose
- Decode every CPU-visible address into a (device, local offset) pair through
  a range table, then dispatch the access to that device.
- Keep the mirroring rules in one auditable table instead of scattering masks
  across the Bus.

Address map:
- $0000-$1FFF: 2KB internal RAM, mirrored every $0800
- $2000-$3FFF: PPU registers, mirrored every 8 bytes
- $4000-$4013: APU registers
- $4014:       OAM DMA trigger
- $4015-$401F: APU status, controller ports, test registers
- $4020-$FFFF: Cartridge (expansion, PRG RAM, PRG ROM)

Notes
- APU and controller ports are not emulated: reads return the open-bus value,
  writes are logged at trace level and dropped.
- Every access updates the Bus open-bus latch with the byte on the data bus.
*/

use crate::bus::Bus;
use crate::bus::ppu_registers::PpuRegisters;
use crate::error::EmuError;

/// Device selected by the CPU address decoder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CpuDevice {
    Ram,
    PpuRegisters,
    ApuIo,
    OamDma,
    Cartridge,
}

/// How a device folds a CPU address into its local offset.
#[derive(Copy, Clone, Debug)]
enum Fold {
    /// Keep only the masked bits (mirrored devices).
    Mask(u16),
    /// Offset from the start of a register window.
    Base(u16),
    /// Pass the full CPU address through (the cartridge decodes its own window).
    Absolute,
}

impl Fold {
    #[inline]
    const fn apply(self, addr: u16) -> u16 {
        match self {
            Fold::Mask(m) => addr & m,
            Fold::Base(b) => addr - b,
            Fold::Absolute => addr,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct AddressRange {
    start: u16,
    end: u16,
    device: CpuDevice,
    fold: Fold,
}

impl AddressRange {
    const fn new(start: u16, end: u16, device: CpuDevice, fold: Fold) -> Self {
        Self {
            start,
            end,
            device,
            fold,
        }
    }

    #[inline]
    fn contains(&self, addr: u16) -> bool {
        (self.start..=self.end).contains(&addr)
    }
}

/// Disjoint ranges covering the 16-bit CPU space.
const CPU_MEMORY_MAP: [AddressRange; 6] = [
    AddressRange::new(0x0000, 0x1FFF, CpuDevice::Ram, Fold::Mask(0x07FF)),
    AddressRange::new(0x2000, 0x3FFF, CpuDevice::PpuRegisters, Fold::Mask(0x0007)),
    AddressRange::new(0x4000, 0x4013, CpuDevice::ApuIo, Fold::Base(0x4000)),
    AddressRange::new(0x4014, 0x4014, CpuDevice::OamDma, Fold::Base(0x4014)),
    AddressRange::new(0x4015, 0x401F, CpuDevice::ApuIo, Fold::Base(0x4000)),
    AddressRange::new(0x4020, 0xFFFF, CpuDevice::Cartridge, Fold::Absolute),
];

/// Resolve a CPU address to its device and local offset.
pub fn decode_cpu_addr(addr: u16) -> Option<(CpuDevice, u16)> {
    CPU_MEMORY_MAP
        .iter()
        .find(|r| r.contains(addr))
        .map(|r| (r.device, r.fold.apply(addr)))
}

/// CPU-visible read with device side effects.
pub fn cpu_read(bus: &mut Bus, addr: u16) -> u8 {
    let value = match decode_cpu_addr(addr) {
        Some((CpuDevice::Ram, offset)) => bus.ram.read(offset),
        Some((CpuDevice::PpuRegisters, reg)) => PpuRegisters::read(bus, reg),
        Some((CpuDevice::ApuIo | CpuDevice::OamDma, _)) => bus.open_bus,
        Some((CpuDevice::Cartridge, a)) => bus
            .cartridge
            .as_ref()
            .and_then(|c| c.read_prg(a))
            .unwrap_or(bus.open_bus),
        None => {
            bus.record_fault(EmuError::AddressDecode { addr });
            bus.open_bus
        }
    };
    bus.open_bus = value;
    value
}

/// CPU-visible write with device side effects.
pub fn cpu_write(bus: &mut Bus, addr: u16, value: u8) {
    bus.open_bus = value;
    match decode_cpu_addr(addr) {
        Some((CpuDevice::Ram, offset)) => bus.ram.write(offset, value),
        Some((CpuDevice::PpuRegisters, reg)) => PpuRegisters::write(bus, reg, value),
        Some((CpuDevice::OamDma, _)) => bus.dma.request(value),
        Some((CpuDevice::ApuIo, reg)) => {
            log::trace!("APU/IO write ${value:02X} to $40{reg:02X} dropped");
        }
        Some((CpuDevice::Cartridge, a)) => match bus.cartridge.as_mut() {
            Some(cart) => cart.write_prg(a, value),
            None => log::warn!("write ${value:02X} to ${a:04X} with no cartridge attached"),
        },
        None => bus.record_fault(EmuError::AddressDecode { addr }),
    }
}

/// Side-effect-free read for diagnostics (trace, debugger views).
///
/// PPU and APU registers are not read; they report the value a logic analyser
/// would typically show ($FF) so that trace output is stable.
pub fn cpu_peek(bus: &Bus, addr: u16) -> u8 {
    match decode_cpu_addr(addr) {
        Some((CpuDevice::Ram, offset)) => bus.ram.read(offset),
        Some((CpuDevice::Cartridge, a)) => bus
            .cartridge
            .as_ref()
            .and_then(|c| c.read_prg(a))
            .unwrap_or(bus.open_bus),
        Some(_) => 0xFF,
        None => bus.open_bus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::bus_with_program;

    #[test]
    fn every_address_decodes() {
        for addr in 0..=0xFFFFu16 {
            assert!(decode_cpu_addr(addr).is_some(), "${addr:04X} unmapped");
        }
    }

    #[test]
    fn ram_mirrors_fold_to_2k() {
        assert_eq!(decode_cpu_addr(0x0000), Some((CpuDevice::Ram, 0x0000)));
        assert_eq!(decode_cpu_addr(0x0801), Some((CpuDevice::Ram, 0x0001)));
        assert_eq!(decode_cpu_addr(0x1FFF), Some((CpuDevice::Ram, 0x07FF)));
    }

    #[test]
    fn ppu_registers_mirror_every_8() {
        assert_eq!(
            decode_cpu_addr(0x2002),
            Some((CpuDevice::PpuRegisters, 2))
        );
        assert_eq!(
            decode_cpu_addr(0x3FFA),
            Some((CpuDevice::PpuRegisters, 2))
        );
        assert_eq!(
            decode_cpu_addr(0x2008),
            Some((CpuDevice::PpuRegisters, 0))
        );
    }

    #[test]
    fn io_window_split_around_dma() {
        assert_eq!(decode_cpu_addr(0x4013), Some((CpuDevice::ApuIo, 0x13)));
        assert_eq!(decode_cpu_addr(0x4014), Some((CpuDevice::OamDma, 0)));
        assert_eq!(decode_cpu_addr(0x4016), Some((CpuDevice::ApuIo, 0x16)));
        assert_eq!(
            decode_cpu_addr(0x4020),
            Some((CpuDevice::Cartridge, 0x4020))
        );
    }

    #[test]
    fn ram_write_visible_through_mirrors() {
        let mut bus = bus_with_program(&[0xEA]);
        cpu_write(&mut bus, 0x1005, 0x77);
        assert_eq!(cpu_read(&mut bus, 0x0005), 0x77);
        assert_eq!(cpu_read(&mut bus, 0x0805), 0x77);
    }

    #[test]
    fn rom_write_is_ignored() {
        let mut bus = bus_with_program(&[0xEA]);
        cpu_write(&mut bus, 0x8000, 0x00);
        assert_eq!(cpu_read(&mut bus, 0x8000), 0xEA);
        assert!(bus.take_fault().is_none());
    }

    #[test]
    fn apu_reads_return_open_bus() {
        let mut bus = bus_with_program(&[0xEA]);
        cpu_write(&mut bus, 0x0000, 0x5C);
        let _ = cpu_read(&mut bus, 0x0000);
        assert_eq!(cpu_read(&mut bus, 0x4000), 0x5C);
    }

    #[test]
    fn peek_has_no_side_effects() {
        let mut bus = bus_with_program(&[0xEA]);
        bus.ppu_mut().set_vblank(true);
        let _ = cpu_peek(&bus, 0x2002);
        assert!(bus.ppu().vblank());
    }
}
