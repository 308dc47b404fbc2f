/*!
branches.rs - Relative branch handler (BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ).

Cycle Rules
===========
Base cost: 2 cycles.
Taken: +1 cycle.
Taken and the target lies on a different page than the next instruction: +2.

The target and the page-cross bit are computed by `addressing::resolve`
(`AddrMode::Relative`); this handler only evaluates the condition and
reports the extra cycles through `extra`.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{branch, get_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::Op;

pub(super) fn handle<C: CpuRegs>(
    op: Op,
    operand: &Operand,
    cpu: &mut C,
    _bus: &mut Bus,
    extra: &mut u32,
) -> bool {
    let take = match op {
        Op::Bpl => !get_flag(cpu, NEGATIVE),
        Op::Bmi => get_flag(cpu, NEGATIVE),
        Op::Bvc => !get_flag(cpu, OVERFLOW),
        Op::Bvs => get_flag(cpu, OVERFLOW),
        Op::Bcc => !get_flag(cpu, CARRY),
        Op::Bcs => get_flag(cpu, CARRY),
        Op::Bne => !get_flag(cpu, ZERO),
        Op::Beq => get_flag(cpu, ZERO),
        _ => return false,
    };
    *extra += branch(cpu, operand, take);
    true
}
