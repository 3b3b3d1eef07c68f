pub mod buffer;
pub mod display;
pub mod misc;
pub mod registers;
#[cfg(test)]
mod tests;

use crate::bus::InterruptRegister;
use crate::constants::*;
use crate::ppu::display::{Display, FrameSink};
use crate::ppu::misc::{Palette, Sprite, Tile};
use crate::ppu::registers::{LCDControl, LCDMode, Registers};
use crate::utils::bit_at;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Number of tiles the tile cache decodes out of 0x8000-0x97FF.
pub const TILE_COUNT: usize = 384;

/// Number of sprite records in OAM.
pub const SPRITE_COUNT: usize = 40;

/// The hardware draws at most this many sprites on one scanline.
const MAX_SPRITES_PER_LINE: usize = 10;

// Mode durations in machine cycles. One scanline takes 114 cycles,
// one full frame 154 * 114 = 17556.
const OAM_SCAN_CYCLES: u16 = 20;
const DRAWING_CYCLES: u16 = 43;
const HBLANK_CYCLES: u16 = 51;
const VBLANK_LINE_CYCLES: u16 = 114;

/// Last scanline of the V-blank interval.
const SCANLINE_MAX: u8 = 153;

/// VRAM offsets of the two 32x32 background maps.
const TILE_MAP_LOW: u16 = 0x1800;
const TILE_MAP_HIGH: u16 = 0x1C00;

/// Pixel Processing Unit. Owns VRAM, OAM and the raster buffer, and keeps
/// two derived caches in sync with memory writes: the decoded tile set and
/// the decoded sprite attributes. Scanlines are composed whole on the
/// transition out of the drawing mode.
pub struct PPU {
    pub r: Registers,
    vram: [u8; VRAM_SIZE],
    oam: [u8; OAM_SIZE],
    tiles: [Tile; TILE_COUNT],
    sprites: [Sprite; SPRITE_COUNT],
    mode: LCDMode,
    mode_clock: u16,
    window_line: u8,
    display: Display,
}

impl PPU {
    pub fn new(sink: Box<dyn FrameSink>) -> Self {
        Self {
            r: Registers::default(),
            vram: [0u8; VRAM_SIZE],
            oam: [0u8; OAM_SIZE],
            tiles: [[[0u8; 8]; 8]; TILE_COUNT],
            sprites: [Sprite::default(); SPRITE_COUNT],
            mode: LCDMode::default(),
            mode_clock: 0,
            window_line: 0,
            display: Display::new(sink),
        }
    }

    /// Advances the mode state machine by the machine cycles of the
    /// just-completed instruction. Idle while the LCD is disabled.
    pub fn step(&mut self, int_flag: &mut InterruptRegister, cycles: u16) {
        if !self.r.lcd_control.contains(LCDControl::LCD_EN) {
            return;
        }

        self.mode_clock += cycles;
        loop {
            match self.mode {
                LCDMode::OamScan if self.mode_clock >= OAM_SCAN_CYCLES => {
                    self.mode_clock -= OAM_SCAN_CYCLES;
                    self.mode = LCDMode::Drawing;
                }
                LCDMode::Drawing if self.mode_clock >= DRAWING_CYCLES => {
                    self.mode_clock -= DRAWING_CYCLES;
                    self.render_scanline();
                    self.mode = LCDMode::HBlank;
                }
                LCDMode::HBlank if self.mode_clock >= HBLANK_CYCLES => {
                    self.mode_clock -= HBLANK_CYCLES;
                    self.r.ly += 1;
                    if self.r.ly >= SCREEN_HEIGHT {
                        // The raster is complete, hand it to the host.
                        int_flag.insert(InterruptRegister::VBLANK);
                        self.display.send_frame();
                        self.mode = LCDMode::VBlank;
                    } else {
                        self.mode = LCDMode::OamScan;
                    }
                }
                LCDMode::VBlank if self.mode_clock >= VBLANK_LINE_CYCLES => {
                    self.mode_clock -= VBLANK_LINE_CYCLES;
                    self.r.ly += 1;
                    if self.r.ly > SCANLINE_MAX {
                        self.r.ly = 0;
                        self.window_line = 0;
                        self.mode = LCDMode::OamScan;
                    }
                }
                _ => break,
            }
        }
    }

    /// Composes one scanline into the raster: background, window, sprites.
    fn render_scanline(&mut self) {
        // Raw background palette indices of the line, the sprite pass
        // resolves its priority against them.
        let mut bg_indices = [0u8; SCREEN_WIDTH as usize];

        if self.r.lcd_control.contains(LCDControl::BG_EN) {
            self.draw_background(&mut bg_indices);
        }
        if self.r.lcd_control.contains(LCDControl::WIN_EN) && self.r.ly >= self.r.wy {
            self.draw_window(&mut bg_indices);
        }
        if self.r.lcd_control.contains(LCDControl::OBJ_EN) {
            self.draw_sprites(&bg_indices);
        }
    }

    /// Draws the scrolled background on the current scanline.
    fn draw_background(&mut self, bg_indices: &mut [u8; SCREEN_WIDTH as usize]) {
        let map_base = match self.r.lcd_control.contains(LCDControl::BG_MAP) {
            true => TILE_MAP_HIGH,
            false => TILE_MAP_LOW,
        };

        let y = self.r.ly.wrapping_add(self.r.scy);
        let tile_row = u16::from(y >> 3);
        for i in 0..SCREEN_WIDTH {
            let x = i.wrapping_add(self.r.scx);
            let tile_col = u16::from(x >> 3);

            let raw = self.vram[usize::from(map_base + tile_row * 32 + tile_col)];
            let tile = self.tiles[self.tile_index(raw)];
            let color = tile[usize::from(y & 7)][usize::from(x & 7)];

            bg_indices[usize::from(i)] = color;
            self.display
                .write_pixel(i, self.r.ly, self.r.bg_palette.shade(color));
        }
    }

    /// Draws the window on the current scanline. The window has its own
    /// line counter so that mid-frame WY changes do not tear it.
    fn draw_window(&mut self, bg_indices: &mut [u8; SCREEN_WIDTH as usize]) {
        let window_x = self.r.wx.wrapping_sub(7);
        if window_x >= SCREEN_WIDTH {
            return;
        }
        let map_base = match self.r.lcd_control.contains(LCDControl::WIN_MAP) {
            true => TILE_MAP_HIGH,
            false => TILE_MAP_LOW,
        };

        let y = self.window_line;
        let tile_row = u16::from(y >> 3);
        for i in window_x..SCREEN_WIDTH {
            let x = i - window_x;
            let tile_col = u16::from(x >> 3);

            let raw = self.vram[usize::from(map_base + tile_row * 32 + tile_col)];
            let tile = self.tiles[self.tile_index(raw)];
            let color = tile[usize::from(y & 7)][usize::from(x & 7)];

            bg_indices[usize::from(i)] = color;
            self.display
                .write_pixel(i, self.r.ly, self.r.bg_palette.shade(color));
        }
        self.window_line += 1;
    }

    /// Draws the sprites overlapping the current scanline, in OAM order,
    /// capped at ten per line. Color 0 is transparent; sprites without the
    /// priority bit hide behind non-zero background pixels.
    fn draw_sprites(&mut self, bg_indices: &[u8; SCREEN_WIDTH as usize]) {
        let height = match self.r.lcd_control.contains(LCDControl::OBJ_SIZE) {
            true => 16,
            false => 8,
        };
        let line = self.r.ly;

        let mut drawn = 0;
        for sprite in self.sprites {
            if drawn == MAX_SPRITES_PER_LINE {
                break;
            }
            let row = line.wrapping_sub(sprite.y);
            if row >= height {
                continue;
            }
            drawn += 1;

            let mut row = match sprite.flip_y {
                true => height - 1 - row,
                false => row,
            };
            // 8x16 sprites span two consecutive tiles, bit 0 of the index
            // is ignored.
            let mut tile = usize::from(match height {
                16 => sprite.tile & 0xFE,
                _ => sprite.tile,
            });
            if row >= 8 {
                tile += 1;
                row -= 8;
            }

            let palette = match sprite.use_obp1 {
                true => self.r.obj_palette1,
                false => self.r.obj_palette0,
            };
            for x in 0..8u8 {
                let source_x = match sprite.flip_x {
                    true => 7 - x,
                    false => x,
                };
                let color = self.tiles[tile][usize::from(row)][usize::from(source_x)];
                if color == 0 {
                    continue;
                }
                let screen_x = sprite.x.wrapping_add(x);
                if screen_x >= SCREEN_WIDTH {
                    continue;
                }
                if sprite.above_background || bg_indices[usize::from(screen_x)] == 0 {
                    self.display.write_pixel(screen_x, line, palette.shade(color));
                }
            }
        }
    }

    /// Maps a raw byte from a background map onto the shared tile cache.
    /// In the signed bank indices below 128 address the upper tiles.
    #[inline]
    fn tile_index(&self, raw: u8) -> usize {
        match self.r.lcd_control.contains(LCDControl::TILE_SEL) || raw >= 128 {
            true => usize::from(raw),
            false => usize::from(raw) + 256,
        }
    }

    /// Rebuilds the tile-cache row containing the given VRAM offset.
    /// The two bytes of a row hold the low and the high bit plane.
    fn update_tile(&mut self, offset: u16) {
        let base = usize::from(offset & !1);
        let tile = base >> 4;
        let row = base >> 1 & 7;
        let low = self.vram[base];
        let high = self.vram[base + 1];
        for x in 0..8 {
            let bit = 7 - x;
            self.tiles[tile][row][usize::from(x)] =
                u8::from(bit_at(low, bit)) | u8::from(bit_at(high, bit)) << 1;
        }
    }

    /// Rebuilds the one sprite-cache field addressed by an OAM write.
    fn update_sprite(&mut self, offset: u16, value: u8) {
        let sprite = &mut self.sprites[usize::from(offset / 4)];
        match offset % 4 {
            0 => sprite.y = value.wrapping_sub(16),
            1 => sprite.x = value.wrapping_sub(8),
            2 => sprite.tile = value,
            _ => sprite.set_attributes(value),
        }
    }

    /// Replaces the whole OAM, used by the DMA transfer. Every sprite
    /// field is re-decoded.
    pub fn load_oam(&mut self, bytes: &[u8; OAM_SIZE]) {
        self.oam = *bytes;
        for offset in 0..OAM_SIZE as u16 {
            self.update_sprite(offset, self.oam[usize::from(offset)]);
        }
    }

    /// The current mode, surfaced through the low bits of STAT.
    #[inline]
    pub fn mode(&self) -> LCDMode {
        self.mode
    }

    /// Frames presented since power-on.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.display.frames()
    }

    /// The current raster contents.
    #[inline]
    pub fn frame_buffer(&self) -> &crate::ppu::buffer::FrameBuffer {
        self.display.buffer()
    }

    /// Restarts the frame position, applied when the LCD is switched off.
    fn reset_frame_position(&mut self) {
        self.r.ly = 0;
        self.mode = LCDMode::OamScan;
        self.mode_clock = 0;
        self.window_line = 0;
    }

    /// Handles writes to VRAM, OAM and the video registers.
    pub fn write(&mut self, address: u16, value: u8) {
        match address {
            VRAM_BEGIN..=VRAM_END => {
                let offset = address - VRAM_BEGIN;
                self.vram[usize::from(offset)] = value;
                if address <= TILE_DATA_END {
                    self.update_tile(offset);
                }
            }
            OAM_BEGIN..=OAM_END => {
                let offset = address - OAM_BEGIN;
                self.oam[usize::from(offset)] = value;
                self.update_sprite(offset, value);
            }
            PPU_LCDC => {
                let control = LCDControl::from_bits_truncate(value);
                let was_on = self.r.lcd_control.contains(LCDControl::LCD_EN);
                if was_on && !control.contains(LCDControl::LCD_EN) {
                    self.reset_frame_position();
                }
                self.r.lcd_control = control;
            }
            // The mode and coincidence bits of STAT are derived state,
            // writes are ignored in this core.
            PPU_STAT => {}
            PPU_SCY => self.r.scy = value,
            PPU_SCX => self.r.scx = value,
            // LY is read-only.
            PPU_LY => {}
            PPU_LYC => self.r.lyc = value,
            PPU_BGP => self.r.bg_palette = Palette::from(value),
            PPU_OBP0 => self.r.obj_palette0 = Palette::from(value),
            PPU_OBP1 => self.r.obj_palette1 = Palette::from(value),
            PPU_WY => self.r.wy = value,
            PPU_WX => self.r.wx = value,
            _ => {}
        }
    }

    /// Handles reads from VRAM, OAM and the video registers.
    pub fn read(&self, address: u16) -> u8 {
        match address {
            VRAM_BEGIN..=VRAM_END => self.vram[usize::from(address - VRAM_BEGIN)],
            OAM_BEGIN..=OAM_END => self.oam[usize::from(address - OAM_BEGIN)],
            PPU_LCDC => self.r.lcd_control.bits(),
            PPU_STAT => {
                let coincidence = u8::from(self.r.ly == self.r.lyc) << 2;
                0b1000_0000 | coincidence | u8::from(self.mode)
            }
            PPU_SCY => self.r.scy,
            PPU_SCX => self.r.scx,
            PPU_LY => self.r.ly,
            PPU_LYC => self.r.lyc,
            // The DMA source register is write-only.
            PPU_DMA => UNDEFINED_READ,
            PPU_BGP => u8::from(self.r.bg_palette),
            PPU_OBP0 => u8::from(self.r.obj_palette0),
            PPU_OBP1 => u8::from(self.r.obj_palette1),
            PPU_WY => self.r.wy,
            PPU_WX => self.r.wx,
            _ => UNDEFINED_READ,
        }
    }
}
