#![doc = r#"
PPU registers module

Purpose
- CPU-visible register semantics that only touch PPU-internal state:
  PPUCTRL, PPUMASK, PPUSTATUS, OAMADDR, OAMDATA, PPUSCROLL, PPUADDR.
- PPUDATA ($2007) reads/writes go through the PPU address space and live in
  `bus::ppu_registers`; they use `vram_addr`, `increment_vram_addr` and the
  data buffer accessors from `mod.rs`.

Loopy rules
- $2000 write: t.NN = d & 3
- $2005 first write: t.XXXXX = d >> 3, fine_x = d & 7; second: t.yyy = d & 7, t.YYYYY = d >> 3
- $2006 first write: t high 6 bits = d & 0x3F (bit 14 cleared); second: t low = d, v = t
- $2002 read: w = 0
"#]

use super::{CTRL_NMI, Ppu};

impl Ppu {
    /// PPUCTRL write. Enabling NMI while vblank is already set raises an NMI.
    pub fn write_ctrl(&mut self, value: u8) {
        let was_enabled = self.nmi_enabled();
        self.ctrl = value;
        self.t.set_nametable(value & 0x03);
        if !was_enabled && (value & CTRL_NMI) != 0 && self.vblank() {
            self.nmi_latch = true;
        }
    }

    pub fn write_mask(&mut self, value: u8) {
        self.mask = value;
    }

    /// PPUSTATUS read: flags in bits 7-5, stale buffer bits below.
    /// Clears vblank and the write toggle.
    pub fn read_status(&mut self) -> u8 {
        let out = (self.status & 0xE0) | (self.data_buffer & 0x1F);
        self.set_vblank(false);
        self.w = false;
        out
    }

    pub fn write_oam_addr(&mut self, value: u8) {
        self.oam_addr = value;
    }

    pub fn read_oam_data(&self) -> u8 {
        self.oam[self.oam_addr as usize]
    }

    /// OAMDATA write; OAMADDR post-increments. Also the DMA write path.
    pub fn write_oam_data(&mut self, value: u8) {
        self.oam[self.oam_addr as usize] = value;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    pub fn write_scroll(&mut self, value: u8) {
        if !self.w {
            self.t.set_coarse_x(value >> 3);
            self.fine_x = value & 0x07;
        } else {
            self.t.set_fine_y(value & 0x07);
            self.t.set_coarse_y(value >> 3);
        }
        self.w = !self.w;
    }

    pub fn write_addr(&mut self, value: u8) {
        if !self.w {
            let t = (self.t.get() & 0x00FF) | (((value & 0x3F) as u16) << 8);
            self.t.set(t);
        } else {
            let t = (self.t.get() & 0xFF00) | value as u16;
            self.t.set(t);
            self.v = self.t;
        }
        self.w = !self.w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::VramAddr;

    fn setup() -> Ppu {
        Ppu::new()
    }

    #[test]
    fn status_read_clears_vblank_and_write_toggle() {
        let mut p = setup();
        p.set_vblank(true);
        p.write_addr(0x21);
        assert!(p.write_toggle());

        let s = p.read_status();
        assert_ne!(s & 0x80, 0, "PPUSTATUS read should return VBlank=1 when it was set");
        assert!(!p.vblank(), "PPUSTATUS read must clear VBlank (bit 7)");
        assert!(!p.write_toggle(), "PPUSTATUS read must clear the write toggle");
    }

    #[test]
    fn status_low_bits_come_from_read_buffer() {
        let mut p = setup();
        p.set_sprite_zero_hit(true);
        p.set_data_buffer(0xFF);
        assert_eq!(p.read_status(), 0x40 | 0x1F);
    }

    #[test]
    fn ctrl_sets_nametable_bits_of_t() {
        let mut p = setup();
        p.write_ctrl(0x03);
        assert_eq!(p.temp_addr() & 0x0C00, 0x0C00);
        p.write_ctrl(0x01);
        assert_eq!(p.temp_addr() & 0x0C00, 0x0400);
    }

    #[test]
    fn nmi_raised_when_enabled_during_vblank() {
        let mut p = setup();
        p.set_vblank(true);
        p.write_ctrl(0x80);
        assert!(p.take_nmi_request());

        // Already enabled: rewriting does not raise a second request.
        p.write_ctrl(0x80);
        assert!(!p.take_nmi_request());
    }

    #[test]
    fn nmi_not_raised_outside_vblank() {
        let mut p = setup();
        p.write_ctrl(0x80);
        assert!(!p.take_nmi_request());
    }

    #[test]
    fn scroll_writes_split_into_t_and_fine_x() {
        let mut p = setup();
        p.write_scroll(0x7D); // coarse X 15, fine X 5
        assert_eq!(p.fine_x(), 5);
        assert_eq!(p.temp_addr() & 0x001F, 15);
        p.write_scroll(0x5E); // coarse Y 11, fine Y 6
        let t = VramAddr::new(p.temp_addr());
        assert_eq!(t.coarse_y(), 11);
        assert_eq!(t.fine_y(), 6);
        assert!(!p.write_toggle());
    }

    #[test]
    fn addr_writes_load_v_on_second_write() {
        let mut p = setup();
        p.write_addr(0x3F);
        assert_eq!(p.vram_addr(), 0);
        p.write_addr(0x10);
        assert_eq!(p.vram_addr(), 0x3F10);
    }

    #[test]
    fn addr_first_write_clears_bit_14() {
        let mut p = setup();
        p.write_scroll(0x00);
        p.write_scroll(0xFF); // fine Y = 7 sets bits 12-14
        p.write_addr(0xFF);
        assert_eq!(p.temp_addr() & 0x4000, 0);
        assert_eq!(p.temp_addr() >> 8, 0x3F);
    }

    #[test]
    fn oam_data_write_increments_addr() {
        let mut p = setup();
        p.write_oam_addr(0xFF);
        p.write_oam_data(0x12);
        assert_eq!(p.oam()[0xFF], 0x12);
        assert_eq!(p.oam_addr(), 0x00);
        p.write_oam_addr(0xFF);
        assert_eq!(p.read_oam_data(), 0x12);
    }
}
