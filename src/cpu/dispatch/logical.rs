//! Logical family: AND, ORA, EOR, BIT.

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{and, bit, eor, ora};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Op;

pub(super) fn handle<C: CpuRegs>(
    op: Op,
    operand: &Operand,
    cpu: &mut C,
    bus: &mut Bus,
    _extra: &mut u32,
) -> bool {
    let f: fn(&mut C, u8) = match op {
        Op::And => and,
        Op::Ora => ora,
        Op::Eor => eor,
        Op::Bit => bit,
        _ => return false,
    };
    let v = operand.read(cpu, bus);
    f(cpu, v);
    true
}
