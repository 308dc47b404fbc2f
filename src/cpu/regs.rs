/*!
`CpuRegs`: register and flag access for the addressing, execute and dispatch
layers.

Bus access, stack traffic and opcode fetch are not part of the trait; callers
pass a `&mut Bus` alongside. Helpers are generic over `C: CpuRegs`.
*/

use crate::cpu::state::{BREAK, CpuState, NEGATIVE, UNUSED, ZERO};

/// Minimal 6502 register + flag API needed by instruction semantics.
pub trait CpuRegs {
    fn a(&self) -> u8;
    fn x(&self) -> u8;
    fn y(&self) -> u8;
    fn sp(&self) -> u8;
    fn pc(&self) -> u16;
    fn status(&self) -> u8;
    fn halted(&self) -> bool;

    fn set_a(&mut self, v: u8);
    fn set_x(&mut self, v: u8);
    fn set_y(&mut self, v: u8);
    fn set_sp(&mut self, v: u8);
    fn set_pc(&mut self, v: u16);
    fn set_status(&mut self, v: u8);
    fn set_halted(&mut self, h: bool);

    /// Advance PC by `delta` (wrapping at 16 bits).
    #[inline]
    fn advance_pc(&mut self, delta: u16) {
        let pc = self.pc().wrapping_add(delta);
        self.set_pc(pc);
    }

    #[inline]
    fn advance_pc_one(&mut self) {
        self.advance_pc(1);
    }

    #[inline]
    fn is_flag_set(&self, mask: u8) -> bool {
        (self.status() & mask) != 0
    }

    /// Set or clear the `mask` bits.
    #[inline]
    fn assign_flag(&mut self, mask: u8, value: bool) {
        let s = if value {
            self.status() | mask
        } else {
            self.status() & !mask
        };
        self.set_status(s);
    }

    /// ZERO and NEGATIVE from a result byte.
    #[inline]
    fn update_zn(&mut self, result: u8) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x80) != 0);
    }

    /// Status byte as pushed to the stack: UNUSED always set, BREAK only for
    /// PHP/BRK.
    #[inline]
    fn compose_status_for_push(&self, set_break: bool) -> u8 {
        let v = self.status() | UNUSED;
        if set_break { v | BREAK } else { v & !BREAK }
    }
}

impl CpuRegs for CpuState {
    #[inline]
    fn a(&self) -> u8 {
        self.a
    }
    #[inline]
    fn x(&self) -> u8 {
        self.x
    }
    #[inline]
    fn y(&self) -> u8 {
        self.y
    }
    #[inline]
    fn sp(&self) -> u8 {
        self.sp
    }
    #[inline]
    fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    fn status(&self) -> u8 {
        self.status
    }
    #[inline]
    fn halted(&self) -> bool {
        self.halted
    }

    #[inline]
    fn set_a(&mut self, v: u8) {
        self.a = v;
    }
    #[inline]
    fn set_x(&mut self, v: u8) {
        self.x = v;
    }
    #[inline]
    fn set_y(&mut self, v: u8) {
        self.y = v;
    }
    #[inline]
    fn set_sp(&mut self, v: u8) {
        self.sp = v;
    }
    #[inline]
    fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }
    #[inline]
    fn set_status(&mut self, v: u8) {
        self.status = v;
    }
    #[inline]
    fn set_halted(&mut self, h: bool) {
        self.halted = h;
    }
}
