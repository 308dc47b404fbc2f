/*!
table.rs - The 256-entry instruction descriptor table.

Each slot holds an immutable `Instruction { op, mode, cycles, official }` or
`None`. The dispatcher looks the fetched opcode up here, resolves the
addressing mode, then routes `op` to its family handler. `cycles` is the base
cost; page-cross and branch penalties are added by the dispatcher.

Coverage
--------
- All 151 documented opcodes.
- The undocumented opcodes exercised by nestest: multi-byte NOPs, LAX, SAX,
  SBC $EB, and the RMW combinations DCP, ISB, SLO, RLA, SRE, RRA.

Empty slots (JAM/KIL and the unstable opcodes) halt the CPU when executed.
*/

use crate::cpu::addressing::AddrMode;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // Undocumented
    Lax,
    Sax,
    Dcp,
    Isb,
    Slo,
    Rla,
    Sre,
    Rra,
}

impl Op {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Op::Adc => "ADC",
            Op::And => "AND",
            Op::Asl => "ASL",
            Op::Bcc => "BCC",
            Op::Bcs => "BCS",
            Op::Beq => "BEQ",
            Op::Bit => "BIT",
            Op::Bmi => "BMI",
            Op::Bne => "BNE",
            Op::Bpl => "BPL",
            Op::Brk => "BRK",
            Op::Bvc => "BVC",
            Op::Bvs => "BVS",
            Op::Clc => "CLC",
            Op::Cld => "CLD",
            Op::Cli => "CLI",
            Op::Clv => "CLV",
            Op::Cmp => "CMP",
            Op::Cpx => "CPX",
            Op::Cpy => "CPY",
            Op::Dec => "DEC",
            Op::Dex => "DEX",
            Op::Dey => "DEY",
            Op::Eor => "EOR",
            Op::Inc => "INC",
            Op::Inx => "INX",
            Op::Iny => "INY",
            Op::Jmp => "JMP",
            Op::Jsr => "JSR",
            Op::Lda => "LDA",
            Op::Ldx => "LDX",
            Op::Ldy => "LDY",
            Op::Lsr => "LSR",
            Op::Nop => "NOP",
            Op::Ora => "ORA",
            Op::Pha => "PHA",
            Op::Php => "PHP",
            Op::Pla => "PLA",
            Op::Plp => "PLP",
            Op::Rol => "ROL",
            Op::Ror => "ROR",
            Op::Rti => "RTI",
            Op::Rts => "RTS",
            Op::Sbc => "SBC",
            Op::Sec => "SEC",
            Op::Sed => "SED",
            Op::Sei => "SEI",
            Op::Sta => "STA",
            Op::Stx => "STX",
            Op::Sty => "STY",
            Op::Tax => "TAX",
            Op::Tay => "TAY",
            Op::Tsx => "TSX",
            Op::Txa => "TXA",
            Op::Txs => "TXS",
            Op::Tya => "TYA",
            Op::Lax => "LAX",
            Op::Sax => "SAX",
            Op::Dcp => "DCP",
            Op::Isb => "ISB",
            Op::Slo => "SLO",
            Op::Rla => "RLA",
            Op::Sre => "SRE",
            Op::Rra => "RRA",
        }
    }
}

/// Immutable opcode descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub mode: AddrMode,
    /// Base cycle count before penalties.
    pub cycles: u8,
    pub official: bool,
}

impl Instruction {
    #[inline]
    pub fn mnemonic(&self) -> &'static str {
        self.op.mnemonic()
    }
}

/// Descriptor for `opcode`, or `None` for an unimplemented slot.
#[inline]
pub fn lookup(opcode: u8) -> Option<Instruction> {
    OPCODES[opcode as usize]
}

pub static OPCODES: [Option<Instruction>; 256] = build_table();

type Row = (u8, Op, AddrMode, u8);

const fn build_table() -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < OFFICIAL.len() {
        let (code, op, mode, cycles) = OFFICIAL[i];
        table[code as usize] = Some(Instruction {
            op,
            mode,
            cycles,
            official: true,
        });
        i += 1;
    }
    let mut i = 0;
    while i < UNOFFICIAL.len() {
        let (code, op, mode, cycles) = UNOFFICIAL[i];
        table[code as usize] = Some(Instruction {
            op,
            mode,
            cycles,
            official: false,
        });
        i += 1;
    }
    table
}

use crate::cpu::addressing::AddrMode::{
    Absolute as Abs, AbsoluteX as AbsX, AbsoluteXW as AbsXW, AbsoluteY as AbsY,
    AbsoluteYW as AbsYW, Accumulator as Acc, Immediate as Imm, Implied as Imp, Indirect as Ind,
    IndirectX as IndX, IndirectY as IndY, IndirectYW as IndYW, Relative as Rel, ZeroPage as Zp,
    ZeroPageX as ZpX, ZeroPageY as ZpY,
};

#[rustfmt::skip]
const OFFICIAL: &[Row] = &[
    // Loads
    (0xA9, Op::Lda, Imm, 2), (0xA5, Op::Lda, Zp, 3), (0xB5, Op::Lda, ZpX, 4), (0xAD, Op::Lda, Abs, 4),
    (0xBD, Op::Lda, AbsX, 4), (0xB9, Op::Lda, AbsY, 4), (0xA1, Op::Lda, IndX, 6), (0xB1, Op::Lda, IndY, 5),
    (0xA2, Op::Ldx, Imm, 2), (0xA6, Op::Ldx, Zp, 3), (0xB6, Op::Ldx, ZpY, 4), (0xAE, Op::Ldx, Abs, 4),
    (0xBE, Op::Ldx, AbsY, 4),
    (0xA0, Op::Ldy, Imm, 2), (0xA4, Op::Ldy, Zp, 3), (0xB4, Op::Ldy, ZpX, 4), (0xAC, Op::Ldy, Abs, 4),
    (0xBC, Op::Ldy, AbsX, 4),
    // Stores
    (0x85, Op::Sta, Zp, 3), (0x95, Op::Sta, ZpX, 4), (0x8D, Op::Sta, Abs, 4), (0x9D, Op::Sta, AbsXW, 5),
    (0x99, Op::Sta, AbsYW, 5), (0x81, Op::Sta, IndX, 6), (0x91, Op::Sta, IndYW, 6),
    (0x86, Op::Stx, Zp, 3), (0x96, Op::Stx, ZpY, 4), (0x8E, Op::Stx, Abs, 4),
    (0x84, Op::Sty, Zp, 3), (0x94, Op::Sty, ZpX, 4), (0x8C, Op::Sty, Abs, 4),
    // Arithmetic
    (0x69, Op::Adc, Imm, 2), (0x65, Op::Adc, Zp, 3), (0x75, Op::Adc, ZpX, 4), (0x6D, Op::Adc, Abs, 4),
    (0x7D, Op::Adc, AbsX, 4), (0x79, Op::Adc, AbsY, 4), (0x61, Op::Adc, IndX, 6), (0x71, Op::Adc, IndY, 5),
    (0xE9, Op::Sbc, Imm, 2), (0xE5, Op::Sbc, Zp, 3), (0xF5, Op::Sbc, ZpX, 4), (0xED, Op::Sbc, Abs, 4),
    (0xFD, Op::Sbc, AbsX, 4), (0xF9, Op::Sbc, AbsY, 4), (0xE1, Op::Sbc, IndX, 6), (0xF1, Op::Sbc, IndY, 5),
    // Logical
    (0x29, Op::And, Imm, 2), (0x25, Op::And, Zp, 3), (0x35, Op::And, ZpX, 4), (0x2D, Op::And, Abs, 4),
    (0x3D, Op::And, AbsX, 4), (0x39, Op::And, AbsY, 4), (0x21, Op::And, IndX, 6), (0x31, Op::And, IndY, 5),
    (0x09, Op::Ora, Imm, 2), (0x05, Op::Ora, Zp, 3), (0x15, Op::Ora, ZpX, 4), (0x0D, Op::Ora, Abs, 4),
    (0x1D, Op::Ora, AbsX, 4), (0x19, Op::Ora, AbsY, 4), (0x01, Op::Ora, IndX, 6), (0x11, Op::Ora, IndY, 5),
    (0x49, Op::Eor, Imm, 2), (0x45, Op::Eor, Zp, 3), (0x55, Op::Eor, ZpX, 4), (0x4D, Op::Eor, Abs, 4),
    (0x5D, Op::Eor, AbsX, 4), (0x59, Op::Eor, AbsY, 4), (0x41, Op::Eor, IndX, 6), (0x51, Op::Eor, IndY, 5),
    (0x24, Op::Bit, Zp, 3), (0x2C, Op::Bit, Abs, 4),
    // Compare
    (0xC9, Op::Cmp, Imm, 2), (0xC5, Op::Cmp, Zp, 3), (0xD5, Op::Cmp, ZpX, 4), (0xCD, Op::Cmp, Abs, 4),
    (0xDD, Op::Cmp, AbsX, 4), (0xD9, Op::Cmp, AbsY, 4), (0xC1, Op::Cmp, IndX, 6), (0xD1, Op::Cmp, IndY, 5),
    (0xE0, Op::Cpx, Imm, 2), (0xE4, Op::Cpx, Zp, 3), (0xEC, Op::Cpx, Abs, 4),
    (0xC0, Op::Cpy, Imm, 2), (0xC4, Op::Cpy, Zp, 3), (0xCC, Op::Cpy, Abs, 4),
    // Shifts / rotates / INC / DEC
    (0x0A, Op::Asl, Acc, 2), (0x06, Op::Asl, Zp, 5), (0x16, Op::Asl, ZpX, 6), (0x0E, Op::Asl, Abs, 6),
    (0x1E, Op::Asl, AbsXW, 7),
    (0x4A, Op::Lsr, Acc, 2), (0x46, Op::Lsr, Zp, 5), (0x56, Op::Lsr, ZpX, 6), (0x4E, Op::Lsr, Abs, 6),
    (0x5E, Op::Lsr, AbsXW, 7),
    (0x2A, Op::Rol, Acc, 2), (0x26, Op::Rol, Zp, 5), (0x36, Op::Rol, ZpX, 6), (0x2E, Op::Rol, Abs, 6),
    (0x3E, Op::Rol, AbsXW, 7),
    (0x6A, Op::Ror, Acc, 2), (0x66, Op::Ror, Zp, 5), (0x76, Op::Ror, ZpX, 6), (0x6E, Op::Ror, Abs, 6),
    (0x7E, Op::Ror, AbsXW, 7),
    (0xE6, Op::Inc, Zp, 5), (0xF6, Op::Inc, ZpX, 6), (0xEE, Op::Inc, Abs, 6), (0xFE, Op::Inc, AbsXW, 7),
    (0xC6, Op::Dec, Zp, 5), (0xD6, Op::Dec, ZpX, 6), (0xCE, Op::Dec, Abs, 6), (0xDE, Op::Dec, AbsXW, 7),
    (0xE8, Op::Inx, Imp, 2), (0xC8, Op::Iny, Imp, 2), (0xCA, Op::Dex, Imp, 2), (0x88, Op::Dey, Imp, 2),
    // Branches
    (0x90, Op::Bcc, Rel, 2), (0xB0, Op::Bcs, Rel, 2), (0xF0, Op::Beq, Rel, 2), (0x30, Op::Bmi, Rel, 2),
    (0xD0, Op::Bne, Rel, 2), (0x10, Op::Bpl, Rel, 2), (0x50, Op::Bvc, Rel, 2), (0x70, Op::Bvs, Rel, 2),
    // Control flow
    (0x4C, Op::Jmp, Abs, 3), (0x6C, Op::Jmp, Ind, 5), (0x20, Op::Jsr, Abs, 6),
    (0x60, Op::Rts, Imp, 6), (0x40, Op::Rti, Imp, 6), (0x00, Op::Brk, Imp, 7),
    // Stack
    (0x48, Op::Pha, Imp, 3), (0x08, Op::Php, Imp, 3), (0x68, Op::Pla, Imp, 4), (0x28, Op::Plp, Imp, 4),
    // Transfers
    (0xAA, Op::Tax, Imp, 2), (0xA8, Op::Tay, Imp, 2), (0xBA, Op::Tsx, Imp, 2), (0x8A, Op::Txa, Imp, 2),
    (0x9A, Op::Txs, Imp, 2), (0x98, Op::Tya, Imp, 2),
    // Flags
    (0x18, Op::Clc, Imp, 2), (0xD8, Op::Cld, Imp, 2), (0x58, Op::Cli, Imp, 2), (0xB8, Op::Clv, Imp, 2),
    (0x38, Op::Sec, Imp, 2), (0xF8, Op::Sed, Imp, 2), (0x78, Op::Sei, Imp, 2),
    (0xEA, Op::Nop, Imp, 2),
];

#[rustfmt::skip]
const UNOFFICIAL: &[Row] = &[
    // NOP variants (operands are fetched, and read where a real read happens)
    (0x1A, Op::Nop, Imp, 2), (0x3A, Op::Nop, Imp, 2), (0x5A, Op::Nop, Imp, 2), (0x7A, Op::Nop, Imp, 2),
    (0xDA, Op::Nop, Imp, 2), (0xFA, Op::Nop, Imp, 2),
    (0x80, Op::Nop, Imm, 2), (0x82, Op::Nop, Imm, 2), (0x89, Op::Nop, Imm, 2), (0xC2, Op::Nop, Imm, 2),
    (0xE2, Op::Nop, Imm, 2),
    (0x04, Op::Nop, Zp, 3), (0x44, Op::Nop, Zp, 3), (0x64, Op::Nop, Zp, 3),
    (0x14, Op::Nop, ZpX, 4), (0x34, Op::Nop, ZpX, 4), (0x54, Op::Nop, ZpX, 4), (0x74, Op::Nop, ZpX, 4),
    (0xD4, Op::Nop, ZpX, 4), (0xF4, Op::Nop, ZpX, 4),
    (0x0C, Op::Nop, Abs, 4),
    (0x1C, Op::Nop, AbsX, 4), (0x3C, Op::Nop, AbsX, 4), (0x5C, Op::Nop, AbsX, 4), (0x7C, Op::Nop, AbsX, 4),
    (0xDC, Op::Nop, AbsX, 4), (0xFC, Op::Nop, AbsX, 4),
    // LAX / SAX
    (0xA7, Op::Lax, Zp, 3), (0xB7, Op::Lax, ZpY, 4), (0xAF, Op::Lax, Abs, 4), (0xBF, Op::Lax, AbsY, 4),
    (0xA3, Op::Lax, IndX, 6), (0xB3, Op::Lax, IndY, 5),
    (0x87, Op::Sax, Zp, 3), (0x97, Op::Sax, ZpY, 4), (0x8F, Op::Sax, Abs, 4), (0x83, Op::Sax, IndX, 6),
    (0xEB, Op::Sbc, Imm, 2),
    // RMW combinations
    (0xC7, Op::Dcp, Zp, 5), (0xD7, Op::Dcp, ZpX, 6), (0xCF, Op::Dcp, Abs, 6), (0xDF, Op::Dcp, AbsXW, 7),
    (0xDB, Op::Dcp, AbsYW, 7), (0xC3, Op::Dcp, IndX, 8), (0xD3, Op::Dcp, IndYW, 8),
    (0xE7, Op::Isb, Zp, 5), (0xF7, Op::Isb, ZpX, 6), (0xEF, Op::Isb, Abs, 6), (0xFF, Op::Isb, AbsXW, 7),
    (0xFB, Op::Isb, AbsYW, 7), (0xE3, Op::Isb, IndX, 8), (0xF3, Op::Isb, IndYW, 8),
    (0x07, Op::Slo, Zp, 5), (0x17, Op::Slo, ZpX, 6), (0x0F, Op::Slo, Abs, 6), (0x1F, Op::Slo, AbsXW, 7),
    (0x1B, Op::Slo, AbsYW, 7), (0x03, Op::Slo, IndX, 8), (0x13, Op::Slo, IndYW, 8),
    (0x27, Op::Rla, Zp, 5), (0x37, Op::Rla, ZpX, 6), (0x2F, Op::Rla, Abs, 6), (0x3F, Op::Rla, AbsXW, 7),
    (0x3B, Op::Rla, AbsYW, 7), (0x23, Op::Rla, IndX, 8), (0x33, Op::Rla, IndYW, 8),
    (0x47, Op::Sre, Zp, 5), (0x57, Op::Sre, ZpX, 6), (0x4F, Op::Sre, Abs, 6), (0x5F, Op::Sre, AbsXW, 7),
    (0x5B, Op::Sre, AbsYW, 7), (0x43, Op::Sre, IndX, 8), (0x53, Op::Sre, IndYW, 8),
    (0x67, Op::Rra, Zp, 5), (0x77, Op::Rra, ZpX, 6), (0x6F, Op::Rra, Abs, 6), (0x7F, Op::Rra, AbsXW, 7),
    (0x7B, Op::Rra, AbsYW, 7), (0x63, Op::Rra, IndX, 8), (0x73, Op::Rra, IndYW, 8),
];
