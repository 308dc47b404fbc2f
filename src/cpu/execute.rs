/*!
execute.rs - 6502 instruction semantic helpers (ALU, flags, stack, RMW).

All helpers are generic over `CpuRegs` and shared by the family handlers in
`dispatch`. None of them tick the Bus; timing is charged once per
instruction by the dispatcher.

Inventory
---------
Flags:            set_flag, get_flag, update_zn
Stack:            push, pop, push_word, pop_word, push_status, pull_status
Loads/transfers:  lda, ldx, ldy, tax, tay, txa, tya, tsx, txs
Logical:          and, ora, eor, bit
Counters:         inx, iny, dex, dey
Shifts:           asl, lsr, rol, ror (value forms; caller updates Z/N)
Arithmetic:       adc, sbc (binary only), compare
Memory:           rmw_memory (read, write old, write new)
Branches:         branch
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{BREAK, CARRY, NEGATIVE, OVERFLOW, STACK_BASE, UNUSED, ZERO};

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn set_flag<C: CpuRegs>(cpu: &mut C, mask: u8, on: bool) {
    cpu.assign_flag(mask, on);
}

#[inline]
pub(crate) fn get_flag<C: CpuRegs>(cpu: &C, mask: u8) -> bool {
    cpu.is_flag_set(mask)
}

#[inline]
pub(crate) fn update_zn<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.update_zn(v);
}

// ---------------------------------------------------------------------------
// Stack ($0100 | SP, post-decrement push, pre-increment pull)
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn push<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u8) {
    let sp = cpu.sp();
    bus.write(STACK_BASE | sp as u16, v);
    cpu.set_sp(sp.wrapping_sub(1));
}

#[inline]
pub(crate) fn pop<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u8 {
    let sp = cpu.sp().wrapping_add(1);
    cpu.set_sp(sp);
    bus.read(STACK_BASE | sp as u16)
}

/// Push high byte first so the word reads little-endian upwards.
#[inline]
pub(crate) fn push_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u16) {
    push(cpu, bus, (v >> 8) as u8);
    push(cpu, bus, v as u8);
}

#[inline]
pub(crate) fn pop_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u16 {
    let lo = pop(cpu, bus);
    let hi = pop(cpu, bus);
    u16::from_le_bytes([lo, hi])
}

/// Push P with BREAK set (PHP/BRK) or clear (IRQ/NMI); UNUSED always set.
pub(crate) fn push_status<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, set_break: bool) {
    let v = cpu.compose_status_for_push(set_break);
    push(cpu, bus, v);
}

/// PLP/RTI: the pulled BREAK bit is discarded and UNUSED forced.
pub(crate) fn pull_status<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let v = pop(cpu, bus);
    cpu.set_status((v & !BREAK) | UNUSED);
}

// ---------------------------------------------------------------------------
// Loads / transfers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_a(v);
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn ldx<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_x(v);
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn ldy<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_y(v);
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn tax<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.a();
    ldx(cpu, v);
}

#[inline]
pub(crate) fn tay<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.a();
    ldy(cpu, v);
}

#[inline]
pub(crate) fn txa<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.x();
    lda(cpu, v);
}

#[inline]
pub(crate) fn tya<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.y();
    lda(cpu, v);
}

#[inline]
pub(crate) fn tsx<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.sp();
    ldx(cpu, v);
}

/// TXS does not touch flags.
#[inline]
pub(crate) fn txs<C: CpuRegs>(cpu: &mut C) {
    cpu.set_sp(cpu.x());
}

// ---------------------------------------------------------------------------
// Logical / BIT
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn and<C: CpuRegs>(cpu: &mut C, v: u8) {
    let v = cpu.a() & v;
    lda(cpu, v);
}

#[inline]
pub(crate) fn ora<C: CpuRegs>(cpu: &mut C, v: u8) {
    let v = cpu.a() | v;
    lda(cpu, v);
}

#[inline]
pub(crate) fn eor<C: CpuRegs>(cpu: &mut C, v: u8) {
    let v = cpu.a() ^ v;
    lda(cpu, v);
}

#[inline]
pub(crate) fn bit<C: CpuRegs>(cpu: &mut C, v: u8) {
    let masked = cpu.a() & v;
    set_flag(cpu, ZERO, masked == 0);
    set_flag(cpu, NEGATIVE, (v & 0x80) != 0);
    set_flag(cpu, OVERFLOW, (v & 0x40) != 0);
}

// ---------------------------------------------------------------------------
// Register increment / decrement
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn inx<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.x().wrapping_add(1);
    ldx(cpu, v);
}

#[inline]
pub(crate) fn iny<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.y().wrapping_add(1);
    ldy(cpu, v);
}

#[inline]
pub(crate) fn dex<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.x().wrapping_sub(1);
    ldx(cpu, v);
}

#[inline]
pub(crate) fn dey<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.y().wrapping_sub(1);
    ldy(cpu, v);
}

// ---------------------------------------------------------------------------
// Shifts / rotates (value forms: set CARRY, return result)
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn asl<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    set_flag(cpu, CARRY, (v & 0x80) != 0);
    v << 1
}

#[inline]
pub(crate) fn lsr<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    set_flag(cpu, CARRY, (v & 0x01) != 0);
    v >> 1
}

#[inline]
pub(crate) fn rol<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = get_flag(cpu, CARRY) as u8;
    set_flag(cpu, CARRY, (v & 0x80) != 0);
    (v << 1) | carry_in
}

#[inline]
pub(crate) fn ror<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let carry_in = (get_flag(cpu, CARRY) as u8) << 7;
    set_flag(cpu, CARRY, (v & 0x01) != 0);
    (v >> 1) | carry_in
}

// ---------------------------------------------------------------------------
// ADC / SBC / compare
// ---------------------------------------------------------------------------

/// Binary add with carry. The D flag is ignored.
pub(crate) fn adc<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    let sum = a as u16 + v as u16 + get_flag(cpu, CARRY) as u16;
    let result = sum as u8;

    set_flag(cpu, CARRY, sum > 0xFF);
    // Overflow when both inputs share a sign that the result does not.
    set_flag(cpu, OVERFLOW, (!(a ^ v) & (a ^ result) & 0x80) != 0);
    lda(cpu, result);
}

#[inline]
pub(crate) fn sbc<C: CpuRegs>(cpu: &mut C, v: u8) {
    adc(cpu, v ^ 0xFF);
}

/// CMP/CPX/CPY: C = reg >= v, Z/N from reg - v.
#[inline]
pub(crate) fn compare<C: CpuRegs>(cpu: &mut C, reg: u8, v: u8) {
    set_flag(cpu, CARRY, reg >= v);
    update_zn(cpu, reg.wrapping_sub(v));
}

// ---------------------------------------------------------------------------
// Read-modify-write
// ---------------------------------------------------------------------------

/// Hardware RMW bus sequence: read, write the unmodified value back, then
/// write the result. Returns the result.
pub(crate) fn rmw_memory<C: CpuRegs, F>(cpu: &mut C, bus: &mut Bus, addr: u16, transform: F) -> u8
where
    F: FnOnce(&mut C, u8) -> u8,
{
    let old = bus.read(addr);
    bus.write(addr, old);
    let new = transform(cpu, old);
    bus.write(addr, new);
    new
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// Apply a relative branch. Returns the extra cycles: 0 when not taken, 1 when
/// taken, 2 when the target lies on another page.
pub(crate) fn branch<C: CpuRegs>(cpu: &mut C, operand: &Operand, take: bool) -> u32 {
    if !take {
        return 0;
    }
    cpu.set_pc(operand.addr);
    1 + operand.page_crossed as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::CpuState;
    use crate::test_utils::bus_with_program;

    fn setup() -> (CpuState, Bus) {
        (CpuState::new(), bus_with_program(&[0xEA]))
    }

    #[test]
    fn adc_overflow_and_carry() {
        let (mut cpu, _bus) = setup();
        cpu.a = 0x50;
        adc(&mut cpu, 0x50);
        assert_eq!(cpu.a, 0xA0);
        assert!(get_flag(&cpu, OVERFLOW));
        assert!(!get_flag(&cpu, CARRY));

        cpu.a = 0xF0;
        adc(&mut cpu, 0x20);
        assert_eq!(cpu.a, 0x10, "carry in from the previous add is clear");
        assert!(get_flag(&cpu, CARRY));
        assert!(!get_flag(&cpu, OVERFLOW));
    }

    const EDGES: [u8; 4] = [0x00, 0x7F, 0x80, 0xFF];

    fn run_alu(op: fn(&mut CpuState, u8), a: u8, v: u8, carry_in: bool) -> CpuState {
        let mut cpu = CpuState::new();
        cpu.a = a;
        set_flag(&mut cpu, CARRY, carry_in);
        op(&mut cpu, v);
        cpu
    }

    #[test]
    fn adc_edge_operands() {
        for a in EDGES {
            for v in EDGES {
                for carry_in in [false, true] {
                    let cpu = run_alu(adc, a, v, carry_in);
                    let sum = a as u16 + v as u16 + carry_in as u16;
                    let signed = a as i8 as i16 + v as i8 as i16 + carry_in as i16;
                    let ctx = format!("ADC a={a:02X} v={v:02X} c={carry_in}");
                    assert_eq!(cpu.a, sum as u8, "{ctx}");
                    assert_eq!(get_flag(&cpu, CARRY), sum > 0xFF, "{ctx}");
                    assert_eq!(get_flag(&cpu, OVERFLOW), !(-128..=127).contains(&signed), "{ctx}");
                    assert_eq!(get_flag(&cpu, ZERO), sum as u8 == 0, "{ctx}");
                    assert_eq!(get_flag(&cpu, NEGATIVE), sum & 0x80 != 0, "{ctx}");
                }
            }
        }
    }

    #[test]
    fn sbc_edge_operands() {
        for a in EDGES {
            for v in EDGES {
                for carry_in in [false, true] {
                    let cpu = run_alu(sbc, a, v, carry_in);
                    let borrow = (!carry_in) as i16;
                    let diff = a as i16 - v as i16 - borrow;
                    let signed = a as i8 as i16 - v as i8 as i16 - borrow;
                    let ctx = format!("SBC a={a:02X} v={v:02X} c={carry_in}");
                    assert_eq!(cpu.a, diff as u8, "{ctx}");
                    assert_eq!(get_flag(&cpu, CARRY), diff >= 0, "{ctx}");
                    assert_eq!(get_flag(&cpu, OVERFLOW), !(-128..=127).contains(&signed), "{ctx}");
                    assert_eq!(get_flag(&cpu, ZERO), diff as u8 == 0, "{ctx}");
                    assert_eq!(get_flag(&cpu, NEGATIVE), diff as u8 & 0x80 != 0, "{ctx}");
                }
            }
        }
    }

    #[test]
    fn adc_ignores_decimal_flag() {
        let (mut cpu, _bus) = setup();
        set_flag(&mut cpu, crate::cpu::state::DECIMAL, true);
        cpu.a = 0x09;
        adc(&mut cpu, 0x01);
        assert_eq!(cpu.a, 0x0A);
    }

    #[test]
    fn sbc_borrow() {
        let (mut cpu, _bus) = setup();
        cpu.a = 0x10;
        set_flag(&mut cpu, CARRY, true);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a, 0x0F);
        assert!(get_flag(&cpu, CARRY), "no borrow");

        sbc(&mut cpu, 0x10);
        assert_eq!(cpu.a, 0xFF);
        assert!(!get_flag(&cpu, CARRY), "borrow");
        assert!(get_flag(&cpu, NEGATIVE));
    }

    #[test]
    fn sbc_signed_overflow() {
        let (mut cpu, _bus) = setup();
        cpu.a = 0x80;
        set_flag(&mut cpu, CARRY, true);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a, 0x7F);
        assert!(get_flag(&cpu, OVERFLOW));
    }

    #[test]
    fn compare_flags() {
        let (mut cpu, _bus) = setup();
        compare(&mut cpu, 0x40, 0x40);
        assert!(get_flag(&cpu, CARRY) && get_flag(&cpu, ZERO));
        compare(&mut cpu, 0x40, 0x41);
        assert!(!get_flag(&cpu, CARRY) && get_flag(&cpu, NEGATIVE));
    }

    #[test]
    fn rotates_through_carry() {
        let (mut cpu, _bus) = setup();
        set_flag(&mut cpu, CARRY, true);
        assert_eq!(rol(&mut cpu, 0x80), 0x01);
        assert!(get_flag(&cpu, CARRY));
        assert_eq!(ror(&mut cpu, 0x02), 0x81);
        assert!(!get_flag(&cpu, CARRY));
    }

    #[test]
    fn stack_push_pop_round_trip() {
        let (mut cpu, mut bus) = setup();
        push_word(&mut cpu, &mut bus, 0xABCD);
        assert_eq!(cpu.sp, 0xFB);
        assert_eq!(bus.peek(0x01FD), 0xAB);
        assert_eq!(bus.peek(0x01FC), 0xCD);
        assert_eq!(pop_word(&mut cpu, &mut bus), 0xABCD);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    fn pull_status_drops_break_forces_unused() {
        let (mut cpu, mut bus) = setup();
        push(&mut cpu, &mut bus, 0xFF);
        pull_status(&mut cpu, &mut bus);
        assert_eq!(cpu.status, 0xEF);
        push(&mut cpu, &mut bus, 0x00);
        pull_status(&mut cpu, &mut bus);
        assert_eq!(cpu.status, 0x20);
    }

    #[test]
    fn rmw_writes_old_value_before_result() {
        let (mut cpu, mut bus) = setup();
        // Point PPUDATA at $2000: each access advances v, so the two writes
        // land on consecutive nametable bytes.
        bus.write(0x2006, 0x20);
        bus.write(0x2006, 0x00);
        bus.ppu_write(0x2000, 0x00);
        let r = rmw_memory(&mut cpu, &mut bus, 0x2007, |_, old| old.wrapping_add(1));
        assert_eq!(r, 0x01);
        assert_eq!(bus.ppu_read(0x2001), 0x00);
        assert_eq!(bus.ppu_read(0x2002), 0x01);
        assert_eq!(bus.ppu().vram_addr(), 0x2003);
    }
}
