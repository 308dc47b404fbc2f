#![doc = r#"
nescore library crate.

Cycle-driven NES core: a 6502 CPU, the 2C02 PPU and the Bus that connects
them to RAM, the cartridge and OAM DMA.

Modules:
- bus: CPU/PPU address decoding, mirroring, OAM DMA and the system clock
- cartridge: iNES v1 loader; owns PRG/CHR storage and the mapper
- cpu: 6502 CPU core (facade + state + table + dispatch + execute + trace)
- error: `EmuError`, the library error type
- mapper: Mapper trait and NROM (mapper 0)
- nes: `Nes`, the system wrapper used by drivers
- ppu: registers, background/sprite pipeline, frame output
- ppu_bus: trait abstraction for PPU memory reads (decouples PPU from full Bus)
- screenshot: PNG export (feature `screenshot`)

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod error;
pub mod mapper;
pub mod nes;
pub mod ppu;
pub mod ppu_bus;
#[cfg(feature = "screenshot")]
pub mod screenshot;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::{Cartridge, Mirroring};
pub use cpu::{Cpu, StepKind, StepStatus};
pub use error::EmuError;
pub use nes::Nes;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
