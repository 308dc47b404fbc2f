//! Compare family: CMP, CPX, CPY.

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::compare;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Op;

pub(super) fn handle<C: CpuRegs>(
    op: Op,
    operand: &Operand,
    cpu: &mut C,
    bus: &mut Bus,
    _extra: &mut u32,
) -> bool {
    let reg = match op {
        Op::Cmp => cpu.a(),
        Op::Cpx => cpu.x(),
        Op::Cpy => cpu.y(),
        _ => return false,
    };
    let v = operand.read(cpu, bus);
    compare(cpu, reg, v);
    true
}
