/*!
rmw.rs - Shift / rotate / INC / DEC family, accumulator and memory forms.

Overview
========
Documented:     ASL, LSR, ROL, ROR (A or memory), INC, DEC
Undocumented:   SLO (ASL + ORA), RLA (ROL + AND), SRE (LSR + EOR),
                RRA (ROR + ADC), DCP (DEC + CMP), ISB (INC + SBC)

Memory forms go through `execute::rmw_memory`, which performs the hardware
read / write-old / write-new sequence. Indexed memory forms use the fixed-cost
`*W` modes, so no page penalty applies.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{AddrMode, Operand};
use crate::cpu::execute::{
    adc, and, asl, compare, eor, lsr, ora, rmw_memory, rol, ror, sbc, update_zn,
};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Op;

pub(super) fn handle<C: CpuRegs>(
    op: Op,
    operand: &Operand,
    cpu: &mut C,
    bus: &mut Bus,
    _extra: &mut u32,
) -> bool {
    let shift: fn(&mut C, u8) -> u8 = match op {
        Op::Asl | Op::Slo => asl,
        Op::Lsr | Op::Sre => lsr,
        Op::Rol | Op::Rla => rol,
        Op::Ror | Op::Rra => ror,
        Op::Inc | Op::Isb => |_: &mut C, v: u8| v.wrapping_add(1),
        Op::Dec | Op::Dcp => |_: &mut C, v: u8| v.wrapping_sub(1),
        _ => return false,
    };

    if operand.mode == AddrMode::Accumulator {
        let a = cpu.a();
        let r = shift(cpu, a);
        cpu.set_a(r);
        update_zn(cpu, r);
        return true;
    }

    let r = rmw_memory(cpu, bus, operand.addr, shift);
    match op {
        Op::Slo => ora(cpu, r),
        Op::Rla => and(cpu, r),
        Op::Sre => eor(cpu, r),
        Op::Rra => adc(cpu, r),
        Op::Dcp => {
            let a = cpu.a();
            compare(cpu, a, r);
        }
        Op::Isb => sbc(cpu, r),
        _ => update_zn(cpu, r),
    }
    true
}
