/*!
addressing.rs - 6502 addressing modes and operand resolution.

Overview
========
`resolve` runs the addressing stage of an instruction: it consumes the
operand bytes after the opcode, computes the effective address and reports
whether indexing crossed a page. The result is an `Operand`, built fresh for
every instruction and handed to the operation stage.

Operand values are loaded lazily through `Operand::read` so that stores
never perform a read and read-modify-write forms read exactly once.

Cycle penalties
===============
- `AbsoluteX`, `AbsoluteY`, `IndirectY` are the read forms: +1 cycle when
  `page_crossed` is set (applied by the dispatcher).
- `AbsoluteXW`, `AbsoluteYW`, `IndirectYW` are the store / RMW forms with a
  fixed cost; they still report `page_crossed` but it is never charged.
- `Relative` reports whether the branch target lies on another page than the
  next instruction.

Quirks
======
- Zero-page indexed modes wrap inside page 0.
- `(zp,X)` and `(zp),Y` fetch the pointer's high byte from `(zp + 1) & 0xFF`.
- `JMP ($xxFF)` fetches the high byte from `$xx00` (no page carry).
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddrMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// Absolute,X without the page-cross penalty (stores, RMW).
    AbsoluteXW,
    /// Absolute,Y without the page-cross penalty (stores, RMW).
    AbsoluteYW,
    Indirect,
    IndirectX,
    IndirectY,
    /// (zp),Y without the page-cross penalty (stores, RMW).
    IndirectYW,
    Relative,
}

impl AddrMode {
    /// Operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            AddrMode::Implied | AddrMode::Accumulator => 0,
            AddrMode::Absolute
            | AddrMode::AbsoluteX
            | AddrMode::AbsoluteY
            | AddrMode::AbsoluteXW
            | AddrMode::AbsoluteYW
            | AddrMode::Indirect => 2,
            _ => 1,
        }
    }

    /// Whether a page cross costs an extra cycle in this mode.
    pub const fn page_penalty(self) -> bool {
        matches!(
            self,
            AddrMode::AbsoluteX | AddrMode::AbsoluteY | AddrMode::IndirectY
        )
    }
}

/// Per-instruction addressing result.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Operand {
    pub mode: AddrMode,
    pub op1: Option<u8>,
    pub op2: Option<u8>,
    /// Effective address (branch target for `Relative`, operand byte address
    /// for `Immediate`, unused for `Implied` / `Accumulator`).
    pub addr: u16,
    pub page_crossed: bool,
}

impl Operand {
    fn new(mode: AddrMode) -> Self {
        Self {
            mode,
            op1: None,
            op2: None,
            addr: 0,
            page_crossed: false,
        }
    }

    /// Load the operand value (A for accumulator forms).
    pub(crate) fn read<C: CpuRegs>(&self, cpu: &C, bus: &mut Bus) -> u8 {
        match (self.mode, self.op1) {
            (AddrMode::Accumulator, _) => cpu.a(),
            (AddrMode::Immediate, Some(v)) => v,
            _ => bus.read(self.addr),
        }
    }
}

/// Fetch next byte from the instruction stream, incrementing PC.
pub(crate) fn fetch_byte<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u8 {
    let v = bus.read(cpu.pc());
    cpu.advance_pc_one();
    v
}

/// Run the addressing stage for `mode`. PC must point just past the opcode.
pub(crate) fn resolve<C: CpuRegs>(mode: AddrMode, cpu: &mut C, bus: &mut Bus) -> Operand {
    let mut operand = Operand::new(mode);
    match mode {
        AddrMode::Implied | AddrMode::Accumulator => {}
        AddrMode::Immediate => {
            operand.addr = cpu.pc();
            operand.op1 = Some(fetch_byte(cpu, bus));
        }
        AddrMode::ZeroPage | AddrMode::ZeroPageX | AddrMode::ZeroPageY => {
            let zp = fetch_byte(cpu, bus);
            operand.op1 = Some(zp);
            let index = match mode {
                AddrMode::ZeroPageX => cpu.x(),
                AddrMode::ZeroPageY => cpu.y(),
                _ => 0,
            };
            operand.addr = zp.wrapping_add(index) as u16;
        }
        AddrMode::Absolute
        | AddrMode::AbsoluteX
        | AddrMode::AbsoluteY
        | AddrMode::AbsoluteXW
        | AddrMode::AbsoluteYW
        | AddrMode::Indirect => {
            let lo = fetch_byte(cpu, bus);
            let hi = fetch_byte(cpu, bus);
            operand.op1 = Some(lo);
            operand.op2 = Some(hi);
            let base = u16::from_le_bytes([lo, hi]);
            let index = match mode {
                AddrMode::AbsoluteX | AddrMode::AbsoluteXW => cpu.x() as u16,
                AddrMode::AbsoluteY | AddrMode::AbsoluteYW => cpu.y() as u16,
                _ => 0,
            };
            if mode == AddrMode::Indirect {
                operand.addr = read_word_indirect_bug(bus, base);
            } else {
                operand.addr = base.wrapping_add(index);
                operand.page_crossed = crosses_page(base, operand.addr);
            }
        }
        AddrMode::IndirectX => {
            let zp = fetch_byte(cpu, bus);
            operand.op1 = Some(zp);
            operand.addr = read_word_zp(bus, zp.wrapping_add(cpu.x()));
        }
        AddrMode::IndirectY | AddrMode::IndirectYW => {
            let zp = fetch_byte(cpu, bus);
            operand.op1 = Some(zp);
            let base = read_word_zp(bus, zp);
            operand.addr = base.wrapping_add(cpu.y() as u16);
            operand.page_crossed = crosses_page(base, operand.addr);
        }
        AddrMode::Relative => {
            let offset = fetch_byte(cpu, bus);
            operand.op1 = Some(offset);
            let next = cpu.pc();
            operand.addr = next.wrapping_add(offset as i8 as u16);
            operand.page_crossed = crosses_page(next, operand.addr);
        }
    }
    operand
}

#[inline]
fn crosses_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

/// Read a 16-bit little endian pointer from zero page; the high byte wraps
/// within page 0.
#[inline]
pub(crate) fn read_word_zp(bus: &mut Bus, base: u8) -> u16 {
    let lo = bus.read(base as u16);
    let hi = bus.read(base.wrapping_add(1) as u16);
    u16::from_le_bytes([lo, hi])
}

/// JMP (indirect) pointer read: the high byte never carries into the next page.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &mut Bus, addr: u16) -> u16 {
    let lo = bus.read(addr);
    let hi = bus.read((addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF));
    u16::from_le_bytes([lo, hi])
}
