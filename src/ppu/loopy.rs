#![doc = r#"
Loopy scroll/address register

The PPU keeps two 15-bit registers, `v` (current VRAM address) and `t`
(temporary address latched by PPUCTRL/PPUSCROLL/PPUADDR writes). Both share
this layout:

```text
 yyy NN YYYYY XXXXX
 ||| || ||||| +++++-- coarse X scroll (0..=31)
 ||| || +++++-------- coarse Y scroll (0..=31, 0..=29 visible)
 ||| |+-------------- horizontal nametable select
 ||| +--------------- vertical nametable select
 +++----------------- fine Y scroll (0..=7)
```

During rendering the low 14 bits double as the nametable fetch address.
"#]

const COARSE_X: u16 = 0x001F;
const COARSE_Y: u16 = 0x03E0;
const NAMETABLE_X: u16 = 0x0400;
const NAMETABLE_Y: u16 = 0x0800;
const FINE_Y: u16 = 0x7000;

const HORIZONTAL_BITS: u16 = COARSE_X | NAMETABLE_X;
const VERTICAL_BITS: u16 = COARSE_Y | NAMETABLE_Y | FINE_Y;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VramAddr(u16);

impl VramAddr {
    pub fn new(value: u16) -> Self {
        Self(value & 0x7FFF)
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set(&mut self, value: u16) {
        self.0 = value & 0x7FFF;
    }

    #[inline]
    pub fn coarse_x(self) -> u8 {
        (self.0 & COARSE_X) as u8
    }

    #[inline]
    pub fn set_coarse_x(&mut self, x: u8) {
        self.0 = (self.0 & !COARSE_X) | (x as u16 & 0x1F);
    }

    #[inline]
    pub fn coarse_y(self) -> u8 {
        ((self.0 & COARSE_Y) >> 5) as u8
    }

    #[inline]
    pub fn set_coarse_y(&mut self, y: u8) {
        self.0 = (self.0 & !COARSE_Y) | ((y as u16 & 0x1F) << 5);
    }

    #[inline]
    pub fn nametable_x(self) -> u8 {
        ((self.0 & NAMETABLE_X) >> 10) as u8
    }

    #[inline]
    pub fn nametable_y(self) -> u8 {
        ((self.0 & NAMETABLE_Y) >> 11) as u8
    }

    /// Set both nametable select bits from a 2-bit value (PPUCTRL bits 0-1).
    #[inline]
    pub fn set_nametable(&mut self, n: u8) {
        self.0 = (self.0 & !(NAMETABLE_X | NAMETABLE_Y)) | ((n as u16 & 0x03) << 10);
    }

    #[inline]
    pub fn fine_y(self) -> u8 {
        ((self.0 & FINE_Y) >> 12) as u8
    }

    #[inline]
    pub fn set_fine_y(&mut self, y: u8) {
        self.0 = (self.0 & !FINE_Y) | ((y as u16 & 0x07) << 12);
    }

    /// Advance coarse X; 31 wraps to 0 and switches the horizontal nametable.
    pub fn increment_x(&mut self) {
        if self.coarse_x() == 31 {
            self.set_coarse_x(0);
            self.0 ^= NAMETABLE_X;
        } else {
            self.0 += 1;
        }
    }

    /// Advance fine Y, carrying into coarse Y.
    ///
    /// Row 29 is the last visible tile row: wrapping from it switches the
    /// vertical nametable. Rows 30/31 hold attribute data; wrapping from 31
    /// stays in the same nametable.
    pub fn increment_y(&mut self) {
        let fine = self.fine_y();
        if fine < 7 {
            self.set_fine_y(fine + 1);
            return;
        }
        self.set_fine_y(0);
        match self.coarse_y() {
            29 => {
                self.set_coarse_y(0);
                self.0 ^= NAMETABLE_Y;
            }
            31 => self.set_coarse_y(0),
            y => self.set_coarse_y(y + 1),
        }
    }

    /// v: ....A.. ...BCDEF <- t: ....A.. ...BCDEF
    pub fn copy_horizontal(&mut self, t: VramAddr) {
        self.0 = (self.0 & !HORIZONTAL_BITS) | (t.0 & HORIZONTAL_BITS);
    }

    /// v: GHIA.BC DEF..... <- t: GHIA.BC DEF.....
    pub fn copy_vertical(&mut self, t: VramAddr) {
        self.0 = (self.0 & !VERTICAL_BITS) | (t.0 & VERTICAL_BITS);
    }

    /// Nametable byte address for the tile under `v`.
    #[inline]
    pub fn tile_addr(self) -> u16 {
        0x2000 | (self.0 & 0x0FFF)
    }

    /// Attribute byte address for the tile under `v`.
    #[inline]
    pub fn attribute_addr(self) -> u16 {
        0x23C0 | (self.0 & 0x0C00) | ((self.0 >> 4) & 0x38) | ((self.0 >> 2) & 0x07)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_round_trips() {
        let v = VramAddr::new(0x5646);
        assert_eq!(v.get(), 0x5646);
    }

    #[test]
    fn fields_decompose() {
        let v = VramAddr::new(0x5646);
        assert_eq!(v.coarse_x(), 0x06);
        assert_eq!(v.coarse_y(), 0x12);
        assert_eq!(v.nametable_x(), 1);
        assert_eq!(v.nametable_y(), 0);
        assert_eq!(v.fine_y(), 5);
    }

    #[test]
    fn setters_mask_their_field() {
        let mut v = VramAddr::default();
        v.set_coarse_x(0x46);
        assert_eq!(v.coarse_x(), 6);
        v.set_coarse_y(0xFF);
        assert_eq!(v.coarse_y(), 31);
        v.set_fine_y(9);
        assert_eq!(v.fine_y(), 1);
        assert_eq!(v.coarse_x(), 6);
    }

    #[test]
    fn coarse_x_wrap_toggles_horizontal_nametable() {
        let mut v = VramAddr::default();
        v.set_coarse_x(31);
        v.increment_x();
        assert_eq!(v.coarse_x(), 0);
        assert_eq!(v.nametable_x(), 1);
        v.set_coarse_x(31);
        v.increment_x();
        assert_eq!(v.nametable_x(), 0);
    }

    #[test]
    fn fine_y_carries_into_coarse_y() {
        let mut v = VramAddr::default();
        v.set_fine_y(7);
        v.set_coarse_y(4);
        v.increment_y();
        assert_eq!(v.fine_y(), 0);
        assert_eq!(v.coarse_y(), 5);
    }

    #[test]
    fn row_29_wraps_and_toggles_vertical_nametable() {
        let mut v = VramAddr::default();
        v.set_fine_y(7);
        v.set_coarse_y(29);
        v.increment_y();
        assert_eq!(v.coarse_y(), 0);
        assert_eq!(v.nametable_y(), 1);
    }

    #[test]
    fn row_31_wraps_without_toggle() {
        let mut v = VramAddr::default();
        v.set_fine_y(7);
        v.set_coarse_y(31);
        v.increment_y();
        assert_eq!(v.coarse_y(), 0);
        assert_eq!(v.nametable_y(), 0);
    }

    #[test]
    fn copies_select_their_bits() {
        let t = VramAddr::new(0x7FFF);
        let mut v = VramAddr::default();
        v.copy_horizontal(t);
        assert_eq!(v.get(), 0x041F);
        let mut v = VramAddr::default();
        v.copy_vertical(t);
        assert_eq!(v.get(), 0x7BE0);
    }

    #[test]
    fn attribute_address_matches_quadrant() {
        let mut v = VramAddr::default();
        v.set_nametable(3);
        v.set_coarse_x(9);
        v.set_coarse_y(17);
        // 0x23C0 | 0x0C00 | (17 / 4) << 3 | 9 / 4
        assert_eq!(v.attribute_addr(), 0x2FC0 | (4 << 3) | 2);
    }
}
