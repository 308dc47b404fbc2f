/*!
Clock/timing orchestrator for the Bus.

Order of operations for a single CPU cycle:
  1. Increment the CPU cycle counter
  2. Step the PPU three times against a read-only view of its memory
  3. Latch the PPU NMI request into the Bus
  4. Sample the cartridge IRQ line

The PPU is stepped through disjoint borrows of the Bus fields: the PPU and the
frame buffer mutably, the PPU address space and cartridge immutably.
*/

use crate::bus::Bus;
use crate::bus::interfaces::BusPpuView;
use crate::cartridge::Cartridge;

/// Advance exactly one CPU cycle (three PPU dots).
pub fn clock(bus: &mut Bus) {
    bus.cpu_cycle = bus.cpu_cycle.wrapping_add(1);

    {
        let Bus {
            ppu,
            ppu_mem,
            cartridge,
            frame,
            ppu_cycle,
            ..
        } = bus;
        let view = BusPpuView::from_parts(ppu_mem, cartridge.as_ref());
        for _ in 0..3 {
            ppu.tick(&view, &mut *frame);
            *ppu_cycle = ppu_cycle.wrapping_add(1);
        }
    }

    if bus.ppu.take_nmi_request() {
        bus.nmi_pending = true;
    }
    bus.irq_line = bus.cartridge.as_ref().is_some_and(Cartridge::irq_pending);
}

/// Advance `cycles` CPU cycles.
pub fn tick(bus: &mut Bus, cycles: u32) {
    for _ in 0..cycles {
        clock(bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_dots_per_cpu_cycle() {
        let mut bus = Bus::new();
        tick(&mut bus, 10);
        assert_eq!(bus.cpu_cycle(), 10);
        assert_eq!(bus.ppu_cycle(), 30);
        assert_eq!(bus.ppu().dot(), 30);
    }

    #[test]
    fn nmi_latched_from_ppu_at_vblank() {
        let mut bus = Bus::new();
        bus.write(0x2000, 0x80);
        // 241 lines + 2 dots reaches the vblank edge.
        let dots = 241 * 341 + 2;
        tick(&mut bus, dots / 3 + 1);
        assert!(bus.ppu().vblank());
        assert!(bus.take_nmi());
        assert!(!bus.take_nmi());
    }

    #[test]
    fn frame_buffer_counts_completed_frames() {
        let mut bus = Bus::new();
        tick(&mut bus, 2 * 89342 / 3 + 1);
        assert_eq!(bus.frame().frames_completed(), 2);
    }
}
