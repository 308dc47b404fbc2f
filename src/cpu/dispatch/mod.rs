/*!
dispatch - Orchestrator for a single 6502 CPU step (DMA / interrupts / instruction).

Overview
========
`step` runs exactly one unit of CPU work, in priority order:
1. A queued OAM DMA: the whole 512/513-cycle stall runs here, no opcode fetch.
2. A latched NMI: 7-cycle interrupt entry through $FFFA.
3. The cartridge IRQ line with I clear: 7-cycle entry through $FFFE.
4. One instruction: fetch, table lookup, addressing, family handler,
   `finalize::finalize_and_tick`.

Family handlers
===============
Each family exposes

```text
    handle(op, &operand, cpu, bus, &mut extra) -> bool
```

and returns `false` for ops it does not own. The chain is tried in a fixed
order; exactly one family owns each `Op`.

Faults
======
- Empty table slot: logged, the CPU halts with PC on the bad opcode, and the
  step returns `EmuError::UnimplementedOpcode`.
- A fault recorded by the Bus during the instruction halts the CPU and is
  returned after the instruction's cycles are charged.
- Any step on a halted CPU returns `EmuError::CpuHalted`.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{fetch_byte, resolve};
use crate::cpu::execute::{get_flag, push_status, push_word, set_flag};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::IRQ_DISABLE;
use crate::cpu::table::lookup;
use crate::error::EmuError;

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod finalize;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

pub(crate) const NMI_VECTOR: u16 = 0xFFFA;
pub(crate) const RESET_VECTOR: u16 = 0xFFFC;
pub(crate) use control_flow::IRQ_VECTOR;

/// Interrupt entry cost.
pub(crate) const INTERRUPT_CYCLES: u32 = 7;

/// What a `step` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepKind {
    Instruction,
    Nmi,
    Irq,
    DmaStall,
}

/// Snapshot returned by every successful step.
///
/// `pc` is the program counter before the step; the register fields hold the
/// values after it. `opcode`/`op1`/`op2` are only meaningful for
/// `StepKind::Instruction`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepStatus {
    pub pc: u16,
    pub opcode: u8,
    pub op1: Option<u8>,
    pub op2: Option<u8>,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
    /// Cycles consumed by this step.
    pub cycles: u32,
    /// CPU cycle counter after this step.
    pub total_cycles: u64,
    pub kind: StepKind,
}

impl StepStatus {
    fn capture<C: CpuRegs>(cpu: &C, bus: &Bus, pc: u16, kind: StepKind, cycles: u32) -> Self {
        Self {
            pc,
            opcode: 0,
            op1: None,
            op2: None,
            a: cpu.a(),
            x: cpu.x(),
            y: cpu.y(),
            p: cpu.status(),
            sp: cpu.sp(),
            cycles,
            total_cycles: bus.cpu_cycle(),
            kind,
        }
    }
}

/// Execute one CPU step (DMA stall, interrupt entry or instruction).
pub(crate) fn step<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> Result<StepStatus, EmuError> {
    let pc = cpu.pc();
    if cpu.halted() {
        return Err(EmuError::CpuHalted { pc });
    }

    // 1. OAM DMA stall
    if let Some(stall) = bus.run_pending_dma() {
        log::debug!("OAM DMA stall: {stall} cycles");
        return Ok(StepStatus::capture(cpu, bus, pc, StepKind::DmaStall, stall));
    }

    // 2. NMI
    if bus.take_nmi() {
        let cycles = service_interrupt(cpu, bus, NMI_VECTOR);
        return Ok(StepStatus::capture(cpu, bus, pc, StepKind::Nmi, cycles));
    }

    // 3. IRQ (line asserted and I clear)
    if bus.irq_line() && !get_flag(cpu, IRQ_DISABLE) {
        let cycles = service_interrupt(cpu, bus, IRQ_VECTOR);
        return Ok(StepStatus::capture(cpu, bus, pc, StepKind::Irq, cycles));
    }

    // 4. Instruction
    let opcode = fetch_byte(cpu, bus);
    let Some(instr) = lookup(opcode) else {
        return Err(halt_unimplemented(cpu, opcode, pc));
    };
    let operand = resolve(instr.mode, cpu, bus);

    let mut extra = 0;
    let op = instr.op;
    let handled = load_store::handle(op, &operand, cpu, bus, &mut extra)
        || arithmetic::handle(op, &operand, cpu, bus, &mut extra)
        || logical::handle(op, &operand, cpu, bus, &mut extra)
        || compare::handle(op, &operand, cpu, bus, &mut extra)
        || rmw::handle(op, &operand, cpu, bus, &mut extra)
        || branches::handle(op, &operand, cpu, bus, &mut extra)
        || control_flow::handle(op, &operand, cpu, bus, &mut extra)
        || misc::handle(op, &operand, cpu, bus, &mut extra);
    if !handled {
        return Err(halt_unimplemented(cpu, opcode, pc));
    }

    let cycles = finalize::finalize_and_tick(&instr, &operand, extra, bus);

    if let Some(fault) = bus.take_fault() {
        cpu.set_halted(true);
        return Err(fault);
    }

    Ok(StepStatus {
        opcode,
        op1: operand.op1,
        op2: operand.op2,
        ..StepStatus::capture(cpu, bus, pc, StepKind::Instruction, cycles)
    })
}

fn halt_unimplemented<C: CpuRegs>(cpu: &mut C, opcode: u8, pc: u16) -> EmuError {
    log::error!("unimplemented opcode ${opcode:02X} at ${pc:04X}; halting CPU");
    cpu.set_pc(pc);
    cpu.set_halted(true);
    EmuError::UnimplementedOpcode { opcode, pc }
}

/// Interrupt entry: push PC, push P with B clear, set I, load the vector.
/// Ticks and returns the 7-cycle entry cost.
pub(crate) fn service_interrupt<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, vector: u16) -> u32 {
    let pc = cpu.pc();
    push_word(cpu, bus, pc);
    push_status(cpu, bus, false);
    set_flag(cpu, IRQ_DISABLE, true);
    let target = bus.read_word(vector);
    cpu.set_pc(target);
    bus.tick(INTERRUPT_CYCLES);
    INTERRUPT_CYCLES
}
