#![doc = r#"
Bus module: the system address router and its submodules.

Overview
- `Bus` owns every device the CPU can reach: 2 KiB RAM, the PPU with its
  nametable/palette memory, the OAM DMA controller, the cartridge and the
  frame buffer the PPU renders into.
- The CPU talks to the Bus through `read`/`write`/`read_word`; the PPU reads
  through a `BusPpuView` built by the clock.

Modules and responsibilities
- cpu_interface: CPU-visible address decoder (range table) and dispatch.
- ppu_registers: CPU-visible PPU register window including PPUDATA buffering.
- ppu_space: PPU address-space decoder (pattern tables, nametables, palette).
- dma: OAM DMA controller (`DmaController`) and the traits it drives.
- clock: per-CPU-cycle orchestration (3 PPU dots, NMI latch, IRQ line).
- interfaces: `BusPpuView`, the read-only PPU memory view.
- ram: CPU work RAM.

Faults
- An address that decodes to no device is recorded on the Bus
  (`record_fault`) and surfaced by the CPU after the instruction completes
  (`take_fault`).
"#]

/// CPU-visible memory map and helpers (dispatcher for address ranges).
pub mod cpu_interface;

/// PPU registers handler (CPU-visible 0x2000-0x3FFF).
pub mod ppu_registers;
/// PPU address-space mapping: nametables, palette, mirroring rules.
pub mod ppu_space;

/// Cycle-accurate OAM DMA controller.
pub mod dma;
pub mod ram;

/// Per-cycle scheduling of PPU dots and interrupt lines.
pub mod clock;

/// Small views to decouple modules.
pub mod interfaces;

pub use cpu_interface::{CpuDevice, decode_cpu_addr};
pub use dma::{CpuMemory, DmaController, OamWriter};
pub use interfaces::BusPpuView;
pub use ppu_space::{PpuAddressSpace, PpuDevice, decode_ppu_addr};
pub use ram::Ram;

use crate::cartridge::Cartridge;
use crate::error::EmuError;
use crate::ppu::{FrameBuffer, Ppu};

pub struct Bus {
    ram: Ram,
    ppu: Ppu,
    ppu_mem: PpuAddressSpace,
    cartridge: Option<Cartridge>,
    dma: DmaController,
    frame: FrameBuffer,

    cpu_cycle: u64,
    ppu_cycle: u64,

    nmi_pending: bool,
    irq_line: bool,

    // Last byte driven on the CPU data bus.
    open_bus: u8,
    fault: Option<EmuError>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self {
            ram: Ram::new(),
            ppu: Ppu::new(),
            ppu_mem: PpuAddressSpace::new(),
            cartridge: None,
            dma: DmaController::new(),
            frame: FrameBuffer::new(),
            cpu_cycle: 0,
            ppu_cycle: 0,
            nmi_pending: false,
            irq_line: false,
            open_bus: 0,
            fault: None,
        }
    }

    /// Insert a cartridge, replacing any previous one.
    pub fn attach_cartridge(&mut self, cart: Cartridge) {
        self.cartridge = Some(cart);
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    /// Reset line: PPU, DMA and interrupt state return to power-up values.
    /// RAM, VRAM and the cartridge keep their contents.
    pub fn reset(&mut self) {
        self.ppu.reset();
        self.dma.reset();
        self.cpu_cycle = 0;
        self.ppu_cycle = 0;
        self.nmi_pending = false;
        self.irq_line = false;
        self.fault = None;
    }

    // ---------------------------------------------------------------------
    // CPU view
    // ---------------------------------------------------------------------

    #[inline]
    pub fn read(&mut self, addr: u16) -> u8 {
        cpu_interface::cpu_read(self, addr)
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        cpu_interface::cpu_write(self, addr, value)
    }

    /// Little-endian word read (two CPU reads).
    pub fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Read without side effects, for trace output and debuggers.
    #[inline]
    pub fn peek(&self, addr: u16) -> u8 {
        cpu_interface::cpu_peek(self, addr)
    }

    // ---------------------------------------------------------------------
    // PPU view
    // ---------------------------------------------------------------------

    #[inline]
    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.ppu_mem.read(addr, self.cartridge.as_ref())
    }

    #[inline]
    pub fn ppu_write(&mut self, addr: u16, value: u8) {
        self.ppu_mem.write(addr, value, self.cartridge.as_mut());
    }

    // ---------------------------------------------------------------------
    // Timing
    // ---------------------------------------------------------------------

    /// Advance `cycles` CPU cycles (3 PPU dots each).
    #[inline]
    pub fn tick(&mut self, cycles: u32) {
        clock::tick(self, cycles);
    }

    /// Advance a single CPU cycle.
    #[inline]
    pub fn clock(&mut self) {
        clock::clock(self);
    }

    pub fn cpu_cycle(&self) -> u64 {
        self.cpu_cycle
    }

    pub fn ppu_cycle(&self) -> u64 {
        self.ppu_cycle
    }

    /// Run a pending OAM DMA to completion, clocking the system once per
    /// stall cycle. Returns the stall length, or `None` when nothing was queued.
    pub fn run_pending_dma(&mut self) -> Option<u32> {
        if !self.dma.begin(self.cpu_cycle) {
            return None;
        }
        let mut dma = std::mem::take(&mut self.dma);
        let mut cycles = 0;
        while dma.step_one_cycle(self) {
            self.clock();
            cycles += 1;
        }
        self.dma = dma;
        Some(cycles)
    }

    // ---------------------------------------------------------------------
    // Interrupt lines
    // ---------------------------------------------------------------------

    /// Consume a latched NMI request.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// Level of the cartridge IRQ line as of the last clock.
    pub fn irq_line(&self) -> bool {
        self.irq_line
    }

    // ---------------------------------------------------------------------
    // Faults
    // ---------------------------------------------------------------------

    /// Keep the first fault until the CPU collects it.
    pub(crate) fn record_fault(&mut self, err: EmuError) {
        log::error!("{err}");
        if self.fault.is_none() {
            self.fault = Some(err);
        }
    }

    pub fn take_fault(&mut self) -> Option<EmuError> {
        self.fault.take()
    }

    // ---------------------------------------------------------------------
    // Device accessors
    // ---------------------------------------------------------------------

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

impl CpuMemory for Bus {
    #[inline]
    fn cpu_read(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }
}

impl OamWriter for Bus {
    #[inline]
    fn write_oam_data(&mut self, value: u8) {
        self.ppu.write_oam_data(value);
    }
}
