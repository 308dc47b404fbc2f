#![doc = r#"
PPU renderer module

Responsibilities
- Orchestrates per-dot timing and scanline/frame progression (`Ppu::tick`).
- Runs the background pipeline, the scroll copies and sprite evaluation at
  their dots.
- Composes background and sprite pixels and hands them to the `PixelSink`.

Per-dot schedule on the pre-render (-1) and visible (0..=239) lines:
- dot 1 (pre-render): clear vblank, sprite-zero hit, sprite overflow
- dots 2..=257, 321..=337: background fetch pipeline
- dot 256: increment fine/coarse Y
- dot 257: copy horizontal bits t -> v, evaluate sprites for the next line
- dots 280..=304 (pre-render): copy vertical bits t -> v
- dot 340 (pre-render, odd frame, rendering on): skipped

Scanline 241 dot 1 sets vblank, reports the frame as complete and raises
an NMI request when PPUCTRL bit 7 is set.
"#]

use super::*;
use crate::ppu_bus::PpuBus;

impl Ppu {
    /// Advance one PPU dot (invoked 3x per CPU cycle by the bus).
    pub fn tick<B: PpuBus, S: PixelSink>(&mut self, bus: &B, sink: &mut S) {
        let rendering = self.rendering_enabled();
        let pre_render = self.scanline == -1;
        let visible = (0..NES_HEIGHT as i16).contains(&self.scanline);
        let dot = self.dot;

        if pre_render && dot == 1 {
            self.set_vblank(false);
            self.set_sprite_zero_hit(false);
            self.set_sprite_overflow(false);
        }

        if pre_render || visible {
            if (2..=257).contains(&dot) || (321..=337).contains(&dot) {
                self.background_fetch(bus);
            }
            if rendering {
                match dot {
                    256 => self.v.increment_y(),
                    257 => self.v.copy_horizontal(self.t),
                    280..=304 if pre_render => self.v.copy_vertical(self.t),
                    _ => {}
                }
            }
            if dot == 257 {
                if rendering {
                    self.evaluate_sprites(bus);
                } else {
                    self.sprites.clear();
                }
            }
        }

        if self.scanline == VBLANK_SCANLINE && dot == 1 {
            self.set_vblank(true);
            self.frame_complete = true;
            sink.frame_complete();
            if self.nmi_enabled() {
                self.nmi_latch = true;
            }
        }

        if visible && (1..=256).contains(&dot) {
            let x = (dot - 1) as usize;
            let colour = self.compose_pixel(bus, x);
            sink.set_pixel(x, self.scanline as usize, colour);
        }

        self.advance_dot(rendering);
    }

    fn advance_dot(&mut self, rendering: bool) {
        self.dot += 1;
        if self.scanline == -1 && self.dot == DOTS_PER_SCANLINE - 1 && self.odd_frame && rendering
        {
            self.dot = DOTS_PER_SCANLINE;
        }
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline > LAST_SCANLINE {
                self.scanline = -1;
                self.odd_frame = !self.odd_frame;
                self.frame_count += 1;
            }
        }
    }

    /// Colour index (0..=63) for screen column `x` on the current line.
    fn compose_pixel<B: PpuBus>(&mut self, bus: &B, x: usize) -> u8 {
        let left = x < 8;
        let show_bg = (self.mask & MASK_BG) != 0 && (!left || (self.mask & MASK_BG_LEFT) != 0);
        let show_sprites =
            (self.mask & MASK_SPRITES) != 0 && (!left || (self.mask & MASK_SPRITE_LEFT) != 0);

        let (bg_pixel, bg_palette) = if show_bg {
            self.bg.pixel(self.fine_x)
        } else {
            (0, 0)
        };
        let sprite = if show_sprites {
            self.sprites.pixel_at(x)
        } else {
            None
        };

        let bg_addr = 0x3F00 + bg_palette as u16 * 4 + bg_pixel as u16;
        let addr = match sprite {
            Some(s) if bg_pixel != 0 => {
                if s.is_zero && x != 255 {
                    self.set_sprite_zero_hit(true);
                }
                if s.behind_background {
                    bg_addr
                } else {
                    0x3F10 + s.palette as u16 * 4 + s.pixel as u16
                }
            }
            Some(s) => 0x3F10 + s.palette as u16 * 4 + s.pixel as u16,
            // Colour 0 of every palette shows the backdrop at $3F00.
            None if bg_pixel == 0 => 0x3F00,
            None => bg_addr,
        };

        let mut colour = bus.ppu_read(addr) & 0x3F;
        if (self.mask & MASK_GREYSCALE) != 0 {
            colour &= 0x30;
        }
        colour
    }
}
