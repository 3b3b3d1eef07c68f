use crate::cartridge::Cartridge;
use crate::constants::*;
use crate::ppu::display::FrameSink;
use crate::ppu::PPU;
use crate::timer::Timer;
use crate::{Bus, SubSystem};
use bitflags::bitflags;

bitflags! {
    /// Represents the interrupt registers IE at 0xFFFF and IF at 0xFF0F.
    /// The flag order doubles as dispatch priority, lowest bit first.
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct InterruptRegister: u8 {
        const VBLANK = 0b0000_0001; // V-blank interrupt
        const STAT   = 0b0000_0010; // LCD status interrupt
        const TIMER  = 0b0000_0100; // Timer overflow interrupt
        const SERIAL = 0b0000_1000; // Serial transfer interrupt
        const JOYPAD = 0b0001_0000; // Joypad input interrupt
    }
}

/// Defines the global bus; all processing units access memory through it.
/// Routes 16-bit addresses to the owning region with the region's side
/// effects: VRAM and OAM writes re-decode the PPU caches, the I/O page
/// dispatches register by register. The bus itself never fails; unmapped
/// addresses read `UNDEFINED_READ` and swallow writes.
pub struct MainBus {
    pub is_boot_rom_active: bool,
    pub cartridge: Cartridge,
    pub ppu: PPU,
    pub timer: Timer,
    pub interrupt_enable: InterruptRegister,
    pub interrupt_flag: InterruptRegister,
    cram: [u8; CRAM_SIZE],
    wram: [u8; WRAM_SIZE],
    hram: [u8; HRAM_SIZE],
}

impl MainBus {
    pub fn with_cartridge(cartridge: Cartridge, sink: Box<dyn FrameSink>) -> Self {
        Self {
            is_boot_rom_active: true,
            cartridge,
            ppu: PPU::new(sink),
            timer: Timer::default(),
            interrupt_enable: InterruptRegister::default(),
            interrupt_flag: InterruptRegister::default(),
            cram: [0u8; CRAM_SIZE],
            wram: [0u8; WRAM_SIZE],
            hram: [0u8; HRAM_SIZE],
        }
    }

    /// Advances the PPU and the timer by the machine cycles of the
    /// just-completed instruction.
    pub fn step(&mut self, cycles: u16) {
        self.ppu.step(&mut self.interrupt_flag, cycles);
        self.timer.step(&mut self.interrupt_flag, cycles);
    }

    /// Reads from the boot ROM overlay or the cartridge, depending on
    /// whether the overlay is still mapped.
    fn read_rom(&self, address: u16) -> u8 {
        match address {
            BOOT_BEGIN..=BOOT_END if self.is_boot_rom_active => BOOT_ROM[usize::from(address)],
            _ => self.cartridge.read(address),
        }
    }

    /// Performs an OAM DMA transfer: copies 160 bytes from `value << 8`
    /// into OAM and re-decodes every sprite. Instantaneous from the CPU's
    /// point of view in this core.
    fn dma_transfer(&mut self, value: u8) {
        let base = u16::from(value) << 8;
        let mut bytes = [0u8; OAM_SIZE];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read(base + offset as u16);
        }
        self.ppu.load_oam(&bytes);
    }

    /// Handles writes to the I/O registers (0xFF00-0xFF7F). Registers this
    /// core does not service discard the written value.
    fn write_io(&mut self, address: u16, value: u8) {
        match address {
            TIMER_DIVIDER..=TIMER_CTRL => self.timer.write(address, value),
            INTERRUPT_FLAG => self.interrupt_flag = InterruptRegister::from_bits_truncate(value),
            PPU_DMA => self.dma_transfer(value),
            PPU_REGISTER_START..=PPU_REGISTER_END => self.ppu.write(address, value),
            _ => {}
        }
    }

    /// Handles reads from the I/O registers (0xFF00-0xFF7F). The joypad
    /// register reads back idle; registers this core does not service
    /// read `UNDEFINED_READ`.
    fn read_io(&mut self, address: u16) -> u8 {
        match address {
            TIMER_DIVIDER..=TIMER_CTRL => self.timer.read(address),
            INTERRUPT_FLAG => self.interrupt_flag.bits(),
            PPU_REGISTER_START..=PPU_REGISTER_END => self.ppu.read(address),
            JOYPAD => UNDEFINED_READ,
            _ => UNDEFINED_READ,
        }
    }
}

impl SubSystem for MainBus {
    fn write(&mut self, address: u16, value: u8) {
        match address {
            // The unbanked ROM discards writes.
            ROM_LOW_BANK_BEGIN..=ROM_HIGH_BANK_END => {}
            VRAM_BEGIN..=VRAM_END => self.ppu.write(address, value),
            CRAM_BEGIN..=CRAM_END => self.cram[usize::from(address - CRAM_BEGIN)] = value,
            WRAM_BEGIN..=WRAM_END => self.wram[usize::from(address & 0x1FFF)] = value,
            // Echo RAM mirrors work RAM.
            ERAM_BEGIN..=ERAM_END => self.wram[usize::from(address & 0x1FFF)] = value,
            OAM_BEGIN..=OAM_END => self.ppu.write(address, value),
            UNUSED_BEGIN..=UNUSED_END => {}
            IO_BEGIN..=IO_END => self.write_io(address, value),
            HRAM_BEGIN..=HRAM_END => self.hram[usize::from(address - HRAM_BEGIN)] = value,
            INTERRUPT_ENABLE => {
                self.interrupt_enable = InterruptRegister::from_bits_truncate(value)
            }
        }
    }

    fn read(&mut self, address: u16) -> u8 {
        match address {
            ROM_LOW_BANK_BEGIN..=ROM_HIGH_BANK_END => self.read_rom(address),
            VRAM_BEGIN..=VRAM_END => self.ppu.read(address),
            CRAM_BEGIN..=CRAM_END => self.cram[usize::from(address - CRAM_BEGIN)],
            WRAM_BEGIN..=WRAM_END => self.wram[usize::from(address & 0x1FFF)],
            ERAM_BEGIN..=ERAM_END => self.wram[usize::from(address & 0x1FFF)],
            OAM_BEGIN..=OAM_END => self.ppu.read(address),
            UNUSED_BEGIN..=UNUSED_END => UNDEFINED_READ,
            IO_BEGIN..=IO_END => self.read_io(address),
            HRAM_BEGIN..=HRAM_END => self.hram[usize::from(address - HRAM_BEGIN)],
            INTERRUPT_ENABLE => self.interrupt_enable.bits(),
        }
    }
}

impl Bus for MainBus {
    #[inline]
    fn has_irq(&self) -> bool {
        !(self.interrupt_enable & self.interrupt_flag).is_empty()
    }

    #[inline]
    fn get_ie(&self) -> InterruptRegister {
        self.interrupt_enable
    }

    #[inline]
    fn set_ie(&mut self, r: InterruptRegister) {
        self.interrupt_enable = r;
    }

    #[inline]
    fn get_if(&self) -> InterruptRegister {
        self.interrupt_flag
    }

    #[inline]
    fn set_if(&mut self, r: InterruptRegister) {
        self.interrupt_flag = r;
    }

    #[inline]
    fn boot_rom_active(&self) -> bool {
        self.is_boot_rom_active
    }

    #[inline]
    fn finish_boot(&mut self) {
        self.is_boot_rom_active = false;
    }
}
