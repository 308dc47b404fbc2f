/*!
load_store.rs - Load / store opcode family handler.

Overview
========
Loads (set Z/N):        LDA, LDX, LDY, LAX (undocumented: A = X = M)
Stores (no flags):      STA, STX, STY, SAX (undocumented: M = A & X)

Cycle Accounting
================
Loads use the page-penalty addressing modes; the +1 is charged by
`finalize`. Stores use the `*W` modes and never pay it. Stores never read
the target address.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{lda, ldx, ldy};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Op;

pub(super) fn handle<C: CpuRegs>(
    op: Op,
    operand: &Operand,
    cpu: &mut C,
    bus: &mut Bus,
    _extra: &mut u32,
) -> bool {
    match op {
        Op::Lda => {
            let v = operand.read(cpu, bus);
            lda(cpu, v);
        }
        Op::Ldx => {
            let v = operand.read(cpu, bus);
            ldx(cpu, v);
        }
        Op::Ldy => {
            let v = operand.read(cpu, bus);
            ldy(cpu, v);
        }
        Op::Lax => {
            let v = operand.read(cpu, bus);
            lda(cpu, v);
            cpu.set_x(v);
        }
        Op::Sta => bus.write(operand.addr, cpu.a()),
        Op::Stx => bus.write(operand.addr, cpu.x()),
        Op::Sty => bus.write(operand.addr, cpu.y()),
        Op::Sax => bus.write(operand.addr, cpu.a() & cpu.x()),
        _ => return false,
    }
    true
}
