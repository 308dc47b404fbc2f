/*!
interfaces: lightweight views that decouple subsystems.

`BusPpuView` is a read-only pairing of the PPU address space and the
cartridge that implements `PpuBus`. The clock builds it from disjoint Bus
fields so the PPU can be ticked mutably while its memory is borrowed
immutably.
*/

use crate::bus::ppu_space::PpuAddressSpace;
use crate::cartridge::Cartridge;
use crate::ppu_bus::PpuBus;

/// Read-only PPU memory view borrowing only the fields the PPU needs.
#[derive(Clone, Copy)]
pub struct BusPpuView<'a> {
    ppu_mem: &'a PpuAddressSpace,
    cartridge: Option<&'a Cartridge>,
}

impl<'a> BusPpuView<'a> {
    #[inline]
    pub fn from_parts(ppu_mem: &'a PpuAddressSpace, cartridge: Option<&'a Cartridge>) -> Self {
        Self { ppu_mem, cartridge }
    }
}

impl PpuBus for BusPpuView<'_> {
    #[inline]
    fn ppu_read(&self, addr: u16) -> u8 {
        self.ppu_mem.read(addr, self.cartridge)
    }
}
