/*!
trace.rs - nestest-format instruction trace.

One line per instruction, captured *before* it executes:

```text
C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
```

Columns: PC, raw bytes (padded to 8), `*` marker for undocumented opcodes,
mnemonic, operand text (padded to 28), registers, PPU scanline/dot and the
CPU cycle counter. The pre-render scanline prints as 261.

Operand values are fetched with `Bus::peek`, so tracing never triggers
register side effects.
*/

use std::fmt::Write;

use crate::bus::Bus;
use crate::cpu::addressing::AddrMode;
use crate::cpu::core::Cpu;
use crate::cpu::table::{Op, lookup};

/// Render the trace line for the instruction at the CPU's current PC.
pub fn trace_line(cpu: &Cpu, bus: &Bus) -> String {
    let pc = cpu.pc();
    let opcode = bus.peek(pc);
    let instr = lookup(opcode);

    let len = instr.map_or(0, |i| i.mode.operand_len());
    let op1 = bus.peek(pc.wrapping_add(1));
    let op2 = bus.peek(pc.wrapping_add(2));

    let mut bytes = format!("{opcode:02X}");
    if len >= 1 {
        let _ = write!(bytes, " {op1:02X}");
    }
    if len >= 2 {
        let _ = write!(bytes, " {op2:02X}");
    }

    let (star, mnemonic, operand) = match instr {
        Some(i) => (
            if i.official { ' ' } else { '*' },
            i.mnemonic(),
            operand_text(cpu, bus, i.op, i.mode, pc, op1, op2),
        ),
        None => ('*', "???", String::new()),
    };

    let ppu = bus.ppu();
    let scanline = if ppu.scanline() < 0 { 261 } else { ppu.scanline() };

    format!(
        "{:04X}  {:<8} {}{:<3} {:<28}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
        pc,
        bytes,
        star,
        mnemonic,
        operand,
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.status(),
        cpu.sp(),
        scanline,
        ppu.dot(),
        bus.cpu_cycle(),
    )
}

fn operand_text(cpu: &Cpu, bus: &Bus, op: Op, mode: AddrMode, pc: u16, op1: u8, op2: u8) -> String {
    let abs = u16::from_le_bytes([op1, op2]);
    match mode {
        AddrMode::Implied => String::new(),
        AddrMode::Accumulator => "A".to_string(),
        AddrMode::Immediate => format!("#${op1:02X}"),
        AddrMode::ZeroPage => format!("${op1:02X} = {:02X}", bus.peek(op1 as u16)),
        AddrMode::ZeroPageX | AddrMode::ZeroPageY => {
            let (reg, index) = if mode == AddrMode::ZeroPageX {
                ('X', cpu.x())
            } else {
                ('Y', cpu.y())
            };
            let addr = op1.wrapping_add(index) as u16;
            format!("${op1:02X},{reg} @ {addr:02X} = {:02X}", bus.peek(addr))
        }
        AddrMode::Absolute => {
            if matches!(op, Op::Jmp | Op::Jsr) {
                format!("${abs:04X}")
            } else {
                format!("${abs:04X} = {:02X}", bus.peek(abs))
            }
        }
        AddrMode::AbsoluteX | AddrMode::AbsoluteXW | AddrMode::AbsoluteY | AddrMode::AbsoluteYW => {
            let (reg, index) = if matches!(mode, AddrMode::AbsoluteX | AddrMode::AbsoluteXW) {
                ('X', cpu.x())
            } else {
                ('Y', cpu.y())
            };
            let addr = abs.wrapping_add(index as u16);
            format!("${abs:04X},{reg} @ {addr:04X} = {:02X}", bus.peek(addr))
        }
        AddrMode::Indirect => {
            let lo = bus.peek(abs);
            let hi = bus.peek((abs & 0xFF00) | (abs.wrapping_add(1) & 0x00FF));
            format!("(${abs:04X}) = {:04X}", u16::from_le_bytes([lo, hi]))
        }
        AddrMode::IndirectX => {
            let ptr = op1.wrapping_add(cpu.x());
            let addr = peek_word_zp(bus, ptr);
            format!(
                "(${op1:02X},X) @ {ptr:02X} = {addr:04X} = {:02X}",
                bus.peek(addr)
            )
        }
        AddrMode::IndirectY | AddrMode::IndirectYW => {
            let base = peek_word_zp(bus, op1);
            let addr = base.wrapping_add(cpu.y() as u16);
            format!(
                "(${op1:02X}),Y = {base:04X} @ {addr:04X} = {:02X}",
                bus.peek(addr)
            )
        }
        AddrMode::Relative => {
            let target = pc.wrapping_add(2).wrapping_add(op1 as i8 as u16);
            format!("${target:04X}")
        }
    }
}

fn peek_word_zp(bus: &Bus, base: u8) -> u16 {
    u16::from_le_bytes([bus.peek(base as u16), bus.peek(base.wrapping_add(1) as u16)])
}
