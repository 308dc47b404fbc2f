#![doc = r#"
PPU registers handler

Purpose
- Entry point for CPU-visible PPU register access. The decoder in
  `cpu_interface` has already folded $2000-$3FFF down to a register index
  0..=7.
- Register semantics that only touch PPU state are delegated to `Ppu`.
  PPUDATA ($2007) goes through the Bus so nametable mirroring, palette folding
  and CHR access are applied in one place.

Notes
- Every write drives the PPU I/O latch; reads of write-only registers return
  that latch and are logged as warnings.
- PPUDATA reads below $3F00 are buffered (the previous buffer is returned and
  the buffer refilled). Palette reads return immediately and refill the buffer
  from the nametable byte underneath ($3Fxx - $1000).
- PPUSTATUS writes are ignored with a warning.
"#]

use crate::bus::Bus;

const PPUCTRL: u16 = 0;
const PPUMASK: u16 = 1;
const PPUSTATUS: u16 = 2;
const OAMADDR: u16 = 3;
const OAMDATA: u16 = 4;
const PPUSCROLL: u16 = 5;
const PPUADDR: u16 = 6;
const PPUDATA: u16 = 7;

/// Handler for CPU-visible PPU register reads/writes.
pub struct PpuRegisters;

impl PpuRegisters {
    /// Read register `reg` (0..=7).
    pub fn read(bus: &mut Bus, reg: u16) -> u8 {
        let value = match reg & 0x07 {
            PPUSTATUS => bus.ppu.read_status(),
            OAMDATA => bus.ppu.read_oam_data(),
            PPUDATA => Self::read_data(bus),
            other => {
                log::warn!("read of write-only PPU register $200{other}");
                bus.ppu.io_latch()
            }
        };
        bus.ppu.latch_io(value);
        value
    }

    /// Write `value` to register `reg` (0..=7).
    pub fn write(bus: &mut Bus, reg: u16, value: u8) {
        bus.ppu.latch_io(value);
        match reg & 0x07 {
            PPUCTRL => bus.ppu.write_ctrl(value),
            PPUMASK => bus.ppu.write_mask(value),
            PPUSTATUS => log::warn!("write ${value:02X} to read-only PPUSTATUS ignored"),
            OAMADDR => bus.ppu.write_oam_addr(value),
            OAMDATA => bus.ppu.write_oam_data(value),
            PPUSCROLL => bus.ppu.write_scroll(value),
            PPUADDR => bus.ppu.write_addr(value),
            _ => {
                let addr = bus.ppu.vram_addr();
                bus.ppu_write(addr, value);
                bus.ppu.increment_vram_addr();
            }
        }
    }

    fn read_data(bus: &mut Bus) -> u8 {
        let addr = bus.ppu.vram_addr();
        let out = if addr >= 0x3F00 {
            let underneath = bus.ppu_read(addr - 0x1000);
            bus.ppu.set_data_buffer(underneath);
            bus.ppu_read(addr)
        } else {
            let fetched = bus.ppu_read(addr);
            let previous = bus.ppu.data_buffer();
            bus.ppu.set_data_buffer(fetched);
            previous
        };
        bus.ppu.increment_vram_addr();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Bus {
        Bus::new()
    }

    fn set_addr(bus: &mut Bus, addr: u16) {
        PpuRegisters::write(bus, PPUADDR, (addr >> 8) as u8);
        PpuRegisters::write(bus, PPUADDR, addr as u8);
    }

    #[test]
    fn data_reads_are_buffered_below_palette() {
        let mut bus = setup();
        bus.ppu_write(0x2000, 0x11);
        bus.ppu_write(0x2001, 0x22);
        set_addr(&mut bus, 0x2000);

        let _dummy = PpuRegisters::read(&mut bus, PPUDATA);
        assert_eq!(PpuRegisters::read(&mut bus, PPUDATA), 0x11);
        assert_eq!(PpuRegisters::read(&mut bus, PPUDATA), 0x22);
    }

    #[test]
    fn palette_reads_are_immediate_and_refill_buffer() {
        let mut bus = setup();
        bus.ppu_write(0x2F05, 0x77);
        bus.ppu_write(0x3F05, 0x2C);
        set_addr(&mut bus, 0x3F05);

        assert_eq!(PpuRegisters::read(&mut bus, PPUDATA), 0x2C);
        assert_eq!(bus.ppu().data_buffer(), 0x77);
    }

    #[test]
    fn data_write_increments_by_ctrl_step() {
        let mut bus = setup();
        PpuRegisters::write(&mut bus, PPUCTRL, 0x04);
        set_addr(&mut bus, 0x2000);
        PpuRegisters::write(&mut bus, PPUDATA, 0xAA);
        PpuRegisters::write(&mut bus, PPUDATA, 0xBB);

        assert_eq!(bus.ppu_read(0x2000), 0xAA);
        assert_eq!(bus.ppu_read(0x2020), 0xBB);
        assert_eq!(bus.ppu().vram_addr(), 0x2040);
    }

    #[test]
    fn write_only_register_reads_return_latch() {
        let mut bus = setup();
        PpuRegisters::write(&mut bus, PPUMASK, 0x5A);
        assert_eq!(PpuRegisters::read(&mut bus, PPUCTRL), 0x5A);
        assert_eq!(PpuRegisters::read(&mut bus, PPUSCROLL), 0x5A);
    }

    #[test]
    fn status_write_is_ignored() {
        let mut bus = setup();
        bus.ppu_mut().set_vblank(true);
        PpuRegisters::write(&mut bus, PPUSTATUS, 0x00);
        assert!(bus.ppu().vblank());
    }

    #[test]
    fn oam_data_through_registers() {
        let mut bus = setup();
        PpuRegisters::write(&mut bus, OAMADDR, 0x10);
        PpuRegisters::write(&mut bus, OAMDATA, 0x42);
        PpuRegisters::write(&mut bus, OAMADDR, 0x10);
        assert_eq!(PpuRegisters::read(&mut bus, OAMDATA), 0x42);
    }

    #[test]
    fn status_read_resets_address_latch() {
        let mut bus = setup();
        PpuRegisters::write(&mut bus, PPUADDR, 0x21);
        let _ = PpuRegisters::read(&mut bus, PPUSTATUS);
        set_addr(&mut bus, 0x2400);
        assert_eq!(bus.ppu().vram_addr(), 0x2400);
    }
}
