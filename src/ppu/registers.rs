use crate::ppu::misc::Palette;
use bitflags::bitflags;

bitflags! {
    /// Represents the LCD control register LCDC at 0xFF40.
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct LCDControl: u8 {
        const BG_EN    = 0b0000_0001; // BG enable
        const OBJ_EN   = 0b0000_0010; // Sprite enable
        const OBJ_SIZE = 0b0000_0100; // Sprite size, 8x16 when set
        const BG_MAP   = 0b0000_1000; // BG tile map area
        const TILE_SEL = 0b0001_0000; // BG & window tile data area
        const WIN_EN   = 0b0010_0000; // Window enable
        const WIN_MAP  = 0b0100_0000; // Window tile map area
        const LCD_EN   = 0b1000_0000; // LCD master enable
    }
}

/// The four PPU modes cycled through while drawing a frame. The numeric
/// values appear in the low two bits of STAT.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum LCDMode {
    HBlank,        // 0b00
    VBlank,        // 0b01
    #[default]
    OamScan,       // 0b10
    Drawing,       // 0b11
}

impl From<LCDMode> for u8 {
    #[inline]
    fn from(value: LCDMode) -> u8 {
        match value {
            LCDMode::HBlank => 0b00,
            LCDMode::VBlank => 0b01,
            LCDMode::OamScan => 0b10,
            LCDMode::Drawing => 0b11,
        }
    }
}

/// Holds the PPU registers that are plain state. The mode bits surfaced
/// through STAT live in the PPU itself as the state machine position.
#[derive(Default)]
pub struct Registers {
    pub lcd_control: LCDControl, // PPU_LCDC
    pub ly: u8,                  // PPU_LY, current scanline
    pub lyc: u8,                 // PPU_LYC, the raster line compare
    pub scy: u8,                 // PPU_SCY
    pub scx: u8,                 // PPU_SCX
    pub wy: u8,                  // PPU_WY
    pub wx: u8,                  // PPU_WX
    pub bg_palette: Palette,     // PPU_BGP
    pub obj_palette0: Palette,   // PPU_OBP0
    pub obj_palette1: Palette,   // PPU_OBP1
}
