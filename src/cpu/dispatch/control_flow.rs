/*!
control_flow.rs - JMP / JSR / RTS / RTI / BRK.

Overview
========
  JMP abs        PC = operand
  JMP (ind)      PC = pointer (page-wrap quirk applied in `addressing`)
  JSR abs        push PC - 1 (last byte of the JSR), PC = operand
  RTS            pull PC, PC + 1
  RTI            pull P (B dropped, U forced), pull PC
  BRK            skip the padding byte, push PC, push P | B | U, set I,
                 PC = [$FFFE]

BRK is a regular software interrupt here; it does not stop the CPU.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{pop_word, pull_status, push_status, push_word, set_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::IRQ_DISABLE;
use crate::cpu::table::Op;

/// IRQ / BRK vector.
pub(crate) const IRQ_VECTOR: u16 = 0xFFFE;

pub(super) fn handle<C: CpuRegs>(
    op: Op,
    operand: &Operand,
    cpu: &mut C,
    bus: &mut Bus,
    _extra: &mut u32,
) -> bool {
    match op {
        Op::Jmp => cpu.set_pc(operand.addr),
        Op::Jsr => {
            let ret = cpu.pc().wrapping_sub(1);
            push_word(cpu, bus, ret);
            cpu.set_pc(operand.addr);
        }
        Op::Rts => {
            let ret = pop_word(cpu, bus);
            cpu.set_pc(ret.wrapping_add(1));
        }
        Op::Rti => {
            pull_status(cpu, bus);
            let pc = pop_word(cpu, bus);
            cpu.set_pc(pc);
        }
        Op::Brk => {
            let ret = cpu.pc().wrapping_add(1);
            push_word(cpu, bus, ret);
            push_status(cpu, bus, true);
            set_flag(cpu, IRQ_DISABLE, true);
            let vector = bus.read_word(IRQ_VECTOR);
            cpu.set_pc(vector);
        }
        _ => return false,
    }
    true
}
