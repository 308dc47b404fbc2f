/*!
misc.rs - Transfers / stack / flag / NOP family handler.

Overview
========
Transfers:  TAX, TAY, TXA, TYA, TSX, TXS (TXS leaves flags alone)
Stack:      PHA, PLA, PHP (pushes B | U), PLP (drops B, forces U)
Flags:      CLC, SEC, CLI, SEI, CLD, SED, CLV
NOP:        $EA plus the undocumented implied / immediate / zp / abs / abs,X
            forms. Memory forms perform their operand read and discard it.

All of these have fixed cycle costs except the abs,X NOPs, which pay the
page-cross penalty like any other indexed read.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{AddrMode, Operand};
use crate::cpu::execute::{
    lda, pop, pull_status, push, push_status, set_flag, tax, tay, tsx, txa, txs, tya,
};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, DECIMAL, IRQ_DISABLE, OVERFLOW};
use crate::cpu::table::Op;

pub(super) fn handle<C: CpuRegs>(
    op: Op,
    operand: &Operand,
    cpu: &mut C,
    bus: &mut Bus,
    _extra: &mut u32,
) -> bool {
    match op {
        // Transfers
        Op::Tax => tax(cpu),
        Op::Tay => tay(cpu),
        Op::Txa => txa(cpu),
        Op::Tya => tya(cpu),
        Op::Tsx => tsx(cpu),
        Op::Txs => txs(cpu),

        // Stack
        Op::Pha => {
            let a = cpu.a();
            push(cpu, bus, a);
        }
        Op::Pla => {
            let v = pop(cpu, bus);
            lda(cpu, v);
        }
        Op::Php => push_status(cpu, bus, true),
        Op::Plp => pull_status(cpu, bus),

        // Flags
        Op::Clc => set_flag(cpu, CARRY, false),
        Op::Sec => set_flag(cpu, CARRY, true),
        Op::Cli => set_flag(cpu, IRQ_DISABLE, false),
        Op::Sei => set_flag(cpu, IRQ_DISABLE, true),
        Op::Cld => set_flag(cpu, DECIMAL, false),
        Op::Sed => set_flag(cpu, DECIMAL, true),
        Op::Clv => set_flag(cpu, OVERFLOW, false),

        Op::Nop => {
            if !matches!(operand.mode, AddrMode::Implied | AddrMode::Immediate) {
                let _ = bus.read(operand.addr);
            }
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use crate::cpu::state::{BREAK, CARRY, DECIMAL, NEGATIVE, UNUSED, ZERO};
    use crate::test_utils::cpu_with_program;

    #[test]
    fn php_pushes_break_and_unused() {
        // SEC ; PHP
        let (mut cpu, mut bus) = cpu_with_program(&[0x38, 0x08]);
        cpu.step(&mut bus).unwrap();
        let status = cpu.step(&mut bus).unwrap();
        assert_eq!(status.cycles, 3);
        assert_eq!(bus.peek(0x01FD), 0x24 | CARRY | BREAK | UNUSED);
        assert_eq!(cpu.status() & BREAK, 0, "live P never holds B");
    }

    #[test]
    fn pla_sets_flags_plp_ignores_break() {
        // LDA #$00 ; PHA ; LDA #$FF ; PLA ; PHP ; PLP
        let (mut cpu, mut bus) =
            cpu_with_program(&[0xA9, 0x00, 0x48, 0xA9, 0xFF, 0x68, 0x08, 0x28]);
        for _ in 0..3 {
            cpu.step(&mut bus).unwrap();
        }
        let pla = cpu.step(&mut bus).unwrap();
        assert_eq!(pla.cycles, 4);
        assert_eq!(cpu.a(), 0x00);
        assert!(cpu.get_flag(ZERO) && !cpu.get_flag(NEGATIVE));
        cpu.step(&mut bus).unwrap();
        cpu.step(&mut bus).unwrap();
        assert_eq!(cpu.status() & BREAK, 0);
        assert_ne!(cpu.status() & UNUSED, 0);
    }

    #[test]
    fn txs_does_not_touch_flags() {
        // LDX #$00 (sets Z) ; LDA #$01 (clears Z) ; TXS
        let (mut cpu, mut bus) = cpu_with_program(&[0xA2, 0x00, 0xA9, 0x01, 0x9A]);
        for _ in 0..3 {
            cpu.step(&mut bus).unwrap();
        }
        assert_eq!(cpu.sp(), 0x00);
        assert!(!cpu.get_flag(ZERO));
    }

    #[test]
    fn sed_is_stored_but_inert() {
        // SED ; LDA #$09 ; CLC ; ADC #$01
        let (mut cpu, mut bus) = cpu_with_program(&[0xF8, 0xA9, 0x09, 0x18, 0x69, 0x01]);
        for _ in 0..4 {
            cpu.step(&mut bus).unwrap();
        }
        assert!(cpu.get_flag(DECIMAL));
        assert_eq!(cpu.a(), 0x0A);
    }

    #[test]
    fn undocumented_nop_forms_consume_operands() {
        // NOP $10 (3) ; NOP $1234 (4) ; NOP #$00 (2) ; NOP (1A, 2)
        let (mut cpu, mut bus) =
            cpu_with_program(&[0x04, 0x10, 0x0C, 0x34, 0x12, 0x80, 0x00, 0x1A]);
        let costs: Vec<u32> = (0..4).map(|_| cpu.step(&mut bus).unwrap().cycles).collect();
        assert_eq!(costs, vec![3, 4, 2, 2]);
        assert_eq!(cpu.pc(), 0x8008);
    }
}
