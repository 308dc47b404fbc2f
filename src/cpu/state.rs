/*!
state.rs - Canonical 6502 CPU architectural state (registers + flags).

`CpuState` owns every architecturally visible register plus the halted
flag. It has no knowledge of the Bus, decoding or timing; those live in the
addressing, execute and dispatch modules, which reach the state through the
`CpuRegs` trait.

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C
Where:
  N = NEGATIVE
  V = OVERFLOW
  1 = UNUSED (always reads as 1)
  B = BREAK (only exists in pushed copies: PHP/BRK set it, IRQ/NMI clear it)
  D = DECIMAL (stored and pushed, but the NES ALU has no decimal mode)
  I = IRQ_DISABLE
  Z = ZERO
  C = CARRY
*/

/// Processor status flag bit masks (canonical definitions).
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000;
pub const BREAK: u8 = 0b0001_0000;
pub const UNUSED: u8 = 0b0010_0000;
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

/// Stack page base; SP indexes into $0100-$01FF.
pub const STACK_BASE: u16 = 0x0100;

/// Register values after RESET.
pub const RESET_SP: u8 = 0xFD;
pub const RESET_STATUS: u8 = IRQ_DISABLE | UNUSED;

/// Pure architectural register / flag container for the 6502 CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    /// Set by a fatal fault; cleared only by reset.
    pub halted: bool,
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: RESET_SP,
            pc: 0x0000,
            status: RESET_STATUS,
            halted: false,
        }
    }
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the RESET register values and jump to `pc`.
    pub fn reset_to(&mut self, pc: u16) {
        *self = Self { pc, ..Self::default() };
    }

    #[inline]
    pub fn halt(&mut self) {
        self.halted = true;
    }
}
