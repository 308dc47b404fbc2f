/*!
core::Cpu - Public 6502 CPU façade wrapping `CpuState`.

Design
======
- `Cpu` owns a single `CpuState`; all execution goes through the generic
  dispatcher (`dispatch::step`) operating on that state via `CpuRegs`.
- The Bus is always passed in (`&mut Bus`); the CPU holds no reference to it.
- Register accessors are plain getters/setters for drivers, tracing and tests.

Lifecycle
=========
```text
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);          // registers, PC from $FFFC, 7 cycles
    loop {
        let status = cpu.step(&mut bus)?;
        ...
    }
```

`reset` is the only way out of the halted state.
*/

use crate::bus::Bus;
use crate::cpu::dispatch::{self, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, StepStatus};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CpuState, IRQ_DISABLE};
use crate::error::EmuError;

/// Cycles charged by the reset sequence.
pub const RESET_CYCLES: u32 = 7;

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    state: CpuState,
}

impl Cpu {
    /// Construct a new CPU with power-up defaults.
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
        }
    }

    /// Immutable view of the architectural state.
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Mutable view of the architectural state (debuggers, tests).
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// RESET: registers to their documented values, PC from the reset vector,
    /// clears the halted flag and charges 7 cycles.
    pub fn reset(&mut self, bus: &mut Bus) {
        let pc = bus.read_word(RESET_VECTOR);
        self.state.reset_to(pc);
        bus.tick(RESET_CYCLES);
        log::debug!("CPU reset, PC=${pc:04X}");
    }

    /// Execute one step (DMA stall, interrupt entry or instruction).
    pub fn step(&mut self, bus: &mut Bus) -> Result<StepStatus, EmuError> {
        dispatch::step(&mut self.state, bus)
    }

    /// Run up to `max_steps` steps, stopping at the first error.
    pub fn run(&mut self, bus: &mut Bus, max_steps: usize) -> Result<u64, EmuError> {
        let mut cycles = 0u64;
        for _ in 0..max_steps {
            cycles += self.step(bus)?.cycles as u64;
        }
        Ok(cycles)
    }

    /// Non-maskable interrupt entry through $FFFA. Returns the cycles charged.
    pub fn nmi(&mut self, bus: &mut Bus) -> u32 {
        bus.take_nmi();
        dispatch::service_interrupt(&mut self.state, bus, NMI_VECTOR)
    }

    /// Maskable interrupt entry through $FFFE. Ignored (0 cycles) while I is set.
    pub fn irq(&mut self, bus: &mut Bus) -> u32 {
        if self.get_flag(IRQ_DISABLE) {
            return 0;
        }
        dispatch::service_interrupt(&mut self.state, bus, IRQ_VECTOR)
    }

    pub fn is_halted(&self) -> bool {
        self.state.halted
    }

    // ---------------------------------------------------------------------
    // Register accessors
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }

    /// Override PC, e.g. to start nestest in automation mode at $C000.
    pub fn set_pc(&mut self, v: u16) {
        self.state.pc = v;
    }

    // ---------------------------------------------------------------------
    // Flag helpers
    // ---------------------------------------------------------------------
    pub fn set_flag(&mut self, mask: u8, on: bool) {
        self.state.assign_flag(mask, on);
    }

    pub fn get_flag(&self, mask: u8) -> bool {
        self.state.is_flag_set(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::{CARRY, NEGATIVE, UNUSED};
    use crate::cartridge::Cartridge;
    use crate::test_utils::{build_nrom_with_prg, cpu_with_program};

    #[test]
    fn reset_loads_vector_and_charges_seven_cycles() {
        let rom = build_nrom_with_prg(&[0xEA], 1, 0, Some((0x8123, 0x8000, 0x8000)));
        let mut bus = Bus::new();
        bus.attach_cartridge(Cartridge::from_ines_bytes(&rom).unwrap());
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        assert_eq!(cpu.pc(), 0x8123);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.status(), 0x24);
        assert!(cpu.get_flag(IRQ_DISABLE) && cpu.get_flag(UNUSED));
        assert_eq!(bus.cpu_cycle(), 7);
        assert_eq!((bus.ppu().scanline(), bus.ppu().dot()), (0, 21));
    }

    #[test]
    fn reset_is_idempotent_for_registers() {
        let (mut cpu, mut bus) = cpu_with_program(&[0xA9, 0x55]);
        cpu.step(&mut bus).unwrap();
        cpu.reset(&mut bus);
        let first = *cpu.state();
        cpu.reset(&mut bus);
        assert_eq!(*cpu.state(), first);
        assert_eq!(cpu.a(), 0);
    }

    #[test]
    fn reset_clears_halt() {
        let (mut cpu, mut bus) = cpu_with_program(&[0x02]);
        assert!(cpu.step(&mut bus).is_err());
        assert!(cpu.is_halted());
        cpu.reset(&mut bus);
        assert!(!cpu.is_halted());
    }

    #[test]
    fn run_stops_on_first_error() {
        // NOP ; NOP ; JAM
        let (mut cpu, mut bus) = cpu_with_program(&[0xEA, 0xEA, 0x02]);
        let err = cpu.run(&mut bus, 10).unwrap_err();
        assert!(matches!(err, EmuError::UnimplementedOpcode { pc: 0x8002, .. }));
    }

    #[test]
    fn set_pc_redirects_execution() {
        let (mut cpu, mut bus) = cpu_with_program(&[0xEA, 0xA9, 0x07]);
        cpu.set_pc(0x8001);
        cpu.step(&mut bus).unwrap();
        assert_eq!(cpu.a(), 0x07);
    }

    #[test]
    fn flag_accessors_match_register_view() {
        let mut cpu = Cpu::new();
        cpu.set_flag(CARRY | NEGATIVE, true);
        assert!(cpu.get_flag(CARRY) && cpu.get_flag(NEGATIVE));
        assert!(cpu.state().is_flag_set(CARRY | NEGATIVE));
        cpu.set_flag(CARRY, false);
        assert!(!cpu.get_flag(CARRY));
        assert!(cpu.get_flag(NEGATIVE));
        assert_eq!(cpu.status() & (CARRY | NEGATIVE), NEGATIVE);
    }
}
