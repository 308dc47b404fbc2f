#![doc = r#"
Nes: the system wrapper owning a `Cpu` and its `Bus`.

This is the entry point for drivers (the CLI, test harnesses). It wires a
cartridge into the Bus, performs the reset sequence and exposes stepping at
instruction and frame granularity plus the nestest trace line.

```ignore
let cart = Cartridge::from_ines_file("nestest.nes")?;
let mut nes = Nes::new(cart);
nes.set_pc(0xC000);
loop {
    println!("{}", nes.trace_line());
    nes.step()?;
}
```
"#]

use std::path::Path;

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::{Cpu, StepStatus, trace_line};
use crate::error::EmuError;
use crate::ppu::FrameBuffer;

pub struct Nes {
    cpu: Cpu,
    bus: Bus,
}

impl Nes {
    /// Build a system around `cart` and run the reset sequence.
    pub fn new(cart: Cartridge) -> Self {
        let mut bus = Bus::new();
        bus.attach_cartridge(cart);
        let mut nes = Self {
            cpu: Cpu::new(),
            bus,
        };
        nes.reset();
        nes
    }

    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, EmuError> {
        Ok(Self::new(Cartridge::from_ines_file(path)?))
    }

    /// Reset button: Bus devices first, then the CPU reset sequence (7 cycles).
    pub fn reset(&mut self) {
        self.bus.reset();
        self.cpu.reset(&mut self.bus);
    }

    /// One CPU step (instruction, interrupt entry or DMA stall).
    pub fn step(&mut self) -> Result<StepStatus, EmuError> {
        self.cpu.step(&mut self.bus)
    }

    /// Step until the PPU signals the start of vertical blank.
    /// Returns the CPU cycles consumed.
    pub fn run_frame(&mut self) -> Result<u64, EmuError> {
        self.bus.ppu_mut().take_frame_complete();
        let mut cycles = 0u64;
        loop {
            cycles += self.step()?.cycles as u64;
            if self.bus.ppu_mut().take_frame_complete() {
                return Ok(cycles);
            }
        }
    }

    /// nestest-format line for the instruction about to execute.
    pub fn trace_line(&self) -> String {
        trace_line(&self.cpu, &self.bus)
    }

    /// Redirect execution (nestest automation mode starts at $C000).
    pub fn set_pc(&mut self, pc: u16) {
        self.cpu.set_pc(pc);
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn frame(&self) -> &FrameBuffer {
        self.bus.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::StepKind;
    use crate::test_utils::build_nrom_with_prg;

    fn setup(prg: &[u8]) -> Nes {
        let rom = build_nrom_with_prg(prg, 1, 1, None);
        Nes::new(Cartridge::from_ines_bytes(&rom).unwrap())
    }

    #[test]
    fn new_runs_reset_sequence() {
        let nes = setup(&[0xEA]);
        assert_eq!(nes.cpu().pc(), 0x8000);
        assert_eq!(nes.bus().cpu_cycle(), 7);
        assert!(nes.trace_line().ends_with("PPU:  0, 21 CYC:7"));
    }

    #[test]
    fn run_frame_stops_at_vblank() {
        // loop: JMP loop
        let mut nes = setup(&[0x4C, 0x00, 0x80]);
        let first = nes.run_frame().unwrap();
        assert!(nes.bus().ppu().vblank());
        assert_eq!(nes.frame().frames_completed(), 1);
        // 241 * 341 + 1 dots from power-up, minus the 21 reset dots.
        assert!((first as i64 - (241 * 341 + 1 - 21) / 3).abs() <= 3);

        let second = nes.run_frame().unwrap();
        assert_eq!(nes.frame().frames_completed(), 2);
        assert!((second as i64 - 89342 / 3).abs() <= 3);
    }

    #[test]
    fn nmi_handler_runs_each_frame() {
        // $8000: LDA #$80 ; STA $2000 ; loop: JMP loop
        // NMI vector -> $8010: INC $00 ; RTI
        let mut prg = vec![0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80];
        prg.resize(0x10, 0xEA);
        prg.extend_from_slice(&[0xE6, 0x00, 0x40]);
        let rom = build_nrom_with_prg(&prg, 1, 1, Some((0x8000, 0x8010, 0x8000)));
        let mut nes = Nes::new(Cartridge::from_ines_bytes(&rom).unwrap());

        for _ in 0..3 {
            nes.run_frame().unwrap();
        }
        // The third vblank's NMI is serviced on the next step.
        let status = nes.step().unwrap();
        assert_eq!(status.kind, StepKind::Nmi);
        assert_eq!(nes.bus().peek(0x0000), 2);
    }

    #[test]
    fn reset_recovers_from_halt() {
        let mut nes = setup(&[0x02]);
        assert!(nes.step().is_err());
        assert!(nes.cpu().is_halted());
        nes.reset();
        assert!(!nes.cpu().is_halted());
        assert_eq!(nes.bus().cpu_cycle(), 7);
    }

    /// Full nestest comparison. Needs `NESTEST_ROM` (nestest.nes) and
    /// `NESTEST_LOG` (nestest.log) to point at local copies.
    #[test]
    #[ignore]
    fn nestest_matches_golden_log() {
        let rom = std::env::var("NESTEST_ROM").expect("NESTEST_ROM not set");
        let log = std::env::var("NESTEST_LOG").expect("NESTEST_LOG not set");
        let golden = std::fs::read_to_string(log).expect("read log");

        let mut nes = Nes::from_ines_file(rom).expect("load nestest");
        nes.set_pc(0xC000);
        for (n, expected) in golden.lines().enumerate() {
            let line = nes.trace_line();
            assert_eq!(line, expected.trim_end(), "mismatch at log line {}", n + 1);
            nes.step().expect("step");
        }
        assert_eq!(nes.bus().peek(0x0002), 0x00, "official opcode failures");
        assert_eq!(nes.bus().peek(0x0003), 0x00, "unofficial opcode failures");
    }
}
