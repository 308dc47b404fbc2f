/*!
finalize.rs - Instruction timing finalization.

Every executed instruction passes through `finalize_and_tick` exactly once:

```text
    cycles = base (from the descriptor)
           + 1 if the mode carries a page penalty and the operand crossed a page
           + extra (branch taken / branch page cross, reported by the handler)
```

The Bus is then ticked once for the whole instruction, which advances the PPU
three dots per cycle. Handlers never tick the Bus themselves.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::table::Instruction;

/// Total cycles for one instruction.
#[inline]
pub(crate) fn instruction_cycles(instr: &Instruction, operand: &Operand, extra: u32) -> u32 {
    let penalty = (instr.mode.page_penalty() && operand.page_crossed) as u32;
    instr.cycles as u32 + penalty + extra
}

/// Charge the instruction to the Bus and return the cycles consumed.
pub(crate) fn finalize_and_tick(
    instr: &Instruction,
    operand: &Operand,
    extra: u32,
    bus: &mut Bus,
) -> u32 {
    let cycles = instruction_cycles(instr, operand, extra);
    bus.tick(cycles);
    cycles
}
