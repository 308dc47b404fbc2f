/*!
arithmetic.rs - ADC / SBC and register increment / decrement.

ADC and SBC are binary-only; the D flag is stored but has no effect.
SBC $EB (undocumented) decodes to the same `Op::Sbc`.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::execute::{adc, dex, dey, inx, iny, sbc};
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
        Op::Adc => {
            let v = operand.read(cpu, bus);
            adc(cpu, v);
        }
        Op::Sbc => {
            let v = operand.read(cpu, bus);
            sbc(cpu, v);
        }
        Op::Inx => inx(cpu),
        Op::Iny => iny(cpu),
        Op::Dex => dex(cpu),
        Op::Dey => dey(cpu),
        _ => return false,
    }
    true
}
