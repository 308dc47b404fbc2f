/*!
cpu - 6502 (2A03) CPU core.

Layout:

```text
    state.rs      - Architectural state (registers, flags, halted).
    regs.rs       - `CpuRegs` trait used by every execution layer.
    addressing.rs - Addressing modes and operand resolution.
    table.rs      - 256-entry instruction descriptor table.
    execute.rs    - Instruction semantic helpers (ALU, stack, RMW, branch).
    dispatch/     - One CPU step: DMA stall, interrupts, family handlers,
                    timing finalization.
    core/         - The public `Cpu` façade.
    trace.rs      - nestest-format trace lines.
```

Usage:
```ignore
use nescore::cpu::Cpu;

let mut cpu = Cpu::new();
cpu.reset(&mut bus);
let status = cpu.step(&mut bus)?;
```
*/

pub mod addressing;
pub mod core;
pub mod dispatch;
pub mod execute;
pub mod regs;
pub mod state;
pub mod table;
pub mod trace;

pub use self::core::Cpu;
pub use dispatch::{StepKind, StepStatus};
pub use trace::trace_line;
