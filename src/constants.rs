/// While the boot ROM overlay is active the very bottom 256 bytes of the
/// address space are served from the internal boot ROM instead of the
/// cartridge.
pub const BOOT_BEGIN: u16 = 0x0000;
pub const BOOT_END: u16 = 0x00FF;
pub const BOOT_SIZE: usize = (BOOT_END - BOOT_BEGIN + 1) as usize;

/// First address fetched from the cartridge after the boot ROM has run.
/// The overlay unmaps permanently on the first opcode fetch from here.
pub const BOOT_HANDOFF: u16 = 0x0100;

/// The fixed ROM bank, always mapped to the first 16 KiB of the cartridge.
pub const ROM_LOW_BANK_BEGIN: u16 = 0x0000;
pub const ROM_LOW_BANK_END: u16 = 0x3FFF;

/// The second ROM bank. On banked cartridges this window is switchable;
/// this core only addresses the unbanked 32 KiB image.
pub const ROM_HIGH_BANK_BEGIN: u16 = 0x4000;
pub const ROM_HIGH_BANK_END: u16 = 0x7FFF;
pub const ROM_SIZE: usize = (ROM_HIGH_BANK_END - ROM_LOW_BANK_BEGIN + 1) as usize;

/// Video RAM: tile data in 0x8000-0x97FF, the two 32x32 background maps
/// in 0x9800-0x9FFF.
pub const VRAM_BEGIN: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;
pub const VRAM_SIZE: usize = (VRAM_END - VRAM_BEGIN + 1) as usize;

/// Tile data ends here; writes above this offset only touch the maps.
pub const TILE_DATA_END: u16 = 0x97FF;

/// Cartridge RAM. Plain bytes in this core, no banking and no persistence.
pub const CRAM_BEGIN: u16 = 0xA000;
pub const CRAM_END: u16 = 0xBFFF;
pub const CRAM_SIZE: usize = (CRAM_END - CRAM_BEGIN + 1) as usize;

/// Work RAM.
pub const WRAM_BEGIN: u16 = 0xC000;
pub const WRAM_END: u16 = 0xDFFF;
pub const WRAM_SIZE: usize = (WRAM_END - WRAM_BEGIN + 1) as usize;

/// Echo RAM mirrors work RAM on both reads and writes.
pub const ERAM_BEGIN: u16 = 0xE000;
pub const ERAM_END: u16 = 0xFDFF;

/// Object attribute memory: 40 sprite records of four bytes each.
pub const OAM_BEGIN: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;
pub const OAM_SIZE: usize = (OAM_END - OAM_BEGIN + 1) as usize;

/// This area is unmapped, reading from it just returns `UNDEFINED_READ`.
pub const UNUSED_BEGIN: u16 = 0xFEA0;
pub const UNUSED_END: u16 = 0xFEFF;

/// Memory mapped I/O registers.
pub const IO_BEGIN: u16 = 0xFF00;
pub const IO_END: u16 = 0xFF7F;

/// High RAM, the zero-page targeted by the LDH instructions.
pub const HRAM_BEGIN: u16 = 0xFF80;
pub const HRAM_END: u16 = 0xFFFE;
pub const HRAM_SIZE: usize = (HRAM_END - HRAM_BEGIN + 1) as usize;

/// Joypad input register. Not serviced by this core, reads back idle.
pub const JOYPAD: u16 = 0xFF00;

// Timer registers.
/// Free running divider, resets to 0 whenever written to (DIV).
pub const TIMER_DIVIDER: u16 = 0xFF04;
/// Configurable counter, raises the timer interrupt on overflow (TIMA).
pub const TIMER_COUNTER: u16 = 0xFF05;
/// Value reloaded into the counter after an overflow (TMA).
pub const TIMER_MODULO: u16 = 0xFF06;
/// Timer control (TAC): bit 2 enables the counter, bits 0-1 select the rate.
pub const TIMER_CTRL: u16 = 0xFF07;

// Video registers.
pub const PPU_LCDC: u16 = 0xFF40;
pub const PPU_STAT: u16 = 0xFF41;
pub const PPU_SCY: u16 = 0xFF42;
pub const PPU_SCX: u16 = 0xFF43;
pub const PPU_LY: u16 = 0xFF44;
pub const PPU_LYC: u16 = 0xFF45;
pub const PPU_DMA: u16 = 0xFF46;
pub const PPU_BGP: u16 = 0xFF47;
pub const PPU_OBP0: u16 = 0xFF48;
pub const PPU_OBP1: u16 = 0xFF49;
pub const PPU_WY: u16 = 0xFF4A;
pub const PPU_WX: u16 = 0xFF4B;
pub const PPU_REGISTER_START: u16 = PPU_LCDC;
pub const PPU_REGISTER_END: u16 = PPU_WX;

// Interrupt controller registers.
pub const INTERRUPT_FLAG: u16 = 0xFF0F;
pub const INTERRUPT_ENABLE: u16 = 0xFFFF;

/// Default value when reading from an address no region claims.
pub const UNDEFINED_READ: u8 = 0xFF;

/// Contains the DMG bootstrap ROM with the two lock-up loops (logo and
/// header checksum mismatch) patched to fall through, so the handshake
/// completes even without a cartridge image.
/// Disassembled code is outlined here:
/// <https://gbdev.gg8.se/wiki/articles/Gameboy_Bootstrap_ROM>
pub(crate) const BOOT_ROM: [u8; BOOT_SIZE] = [
    0x31, 0xFE, 0xFF, 0xAF, 0x21, 0xFF, 0x9F, 0x32, 0xCB, 0x7C, 0x20, 0xFB, 0x21, 0x26, 0xFF, 0x0E,
    0x11, 0x3E, 0x80, 0x32, 0xE2, 0x0C, 0x3E, 0xF3, 0xE2, 0x32, 0x3E, 0x77, 0x77, 0x3E, 0xFC, 0xE0,
    0x47, 0x11, 0x04, 0x01, 0x21, 0x10, 0x80, 0x1A, 0xCD, 0x95, 0x00, 0xCD, 0x96, 0x00, 0x13, 0x7B,
    0xFE, 0x34, 0x20, 0xF3, 0x11, 0xD8, 0x00, 0x06, 0x08, 0x1A, 0x13, 0x22, 0x23, 0x05, 0x20, 0xF9,
    0x3E, 0x19, 0xEA, 0x10, 0x99, 0x21, 0x2F, 0x99, 0x0E, 0x0C, 0x3D, 0x28, 0x08, 0x32, 0x0D, 0x20,
    0xF9, 0x2E, 0x0F, 0x18, 0xF3, 0x67, 0x3E, 0x64, 0x57, 0xE0, 0x42, 0x3E, 0x91, 0xE0, 0x40, 0x04,
    0x1E, 0x02, 0x0E, 0x0C, 0xF0, 0x44, 0xFE, 0x90, 0x20, 0xFA, 0x0D, 0x20, 0xF7, 0x1D, 0x20, 0xF2,
    0x0E, 0x13, 0x24, 0x7C, 0x1E, 0x83, 0xFE, 0x62, 0x28, 0x06, 0x1E, 0xC1, 0xFE, 0x64, 0x20, 0x06,
    0x7B, 0xE2, 0x0C, 0x3E, 0x87, 0xE2, 0xF0, 0x42, 0x90, 0xE0, 0x42, 0x15, 0x20, 0xD2, 0x05, 0x20,
    0x4F, 0x16, 0x20, 0x18, 0xCB, 0x4F, 0x06, 0x04, 0xC5, 0xCB, 0x11, 0x17, 0xC1, 0xCB, 0x11, 0x17,
    0x05, 0x20, 0xF5, 0x22, 0x23, 0x22, 0x23, 0xC9, 0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B,
    0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D, 0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E,
    0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99, 0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC,
    0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E, 0x3C, 0x42, 0xB9, 0xA5, 0xB9, 0xA5, 0x42, 0x3C,
    0x21, 0x04, 0x01, 0x11, 0xA8, 0x00, 0x1A, 0x13, 0xBE, 0x00, 0x00, 0x23, 0x7D, 0xFE, 0x34, 0x20,
    0xF5, 0x06, 0x19, 0x78, 0x86, 0x23, 0x05, 0x20, 0xFB, 0x86, 0x00, 0x00, 0x3E, 0x01, 0xE0, 0x50,
];
