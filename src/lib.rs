use crate::bus::{InterruptRegister, MainBus};
use crate::cartridge::Cartridge;
use crate::cpu::{interrupt, CPU};
use crate::errors::{EmulatorError, EmulatorResult};
use crate::ppu::display::FrameSink;
use log::info;

pub mod bus;
pub mod cartridge;
pub mod constants;
pub mod cpu;
pub mod errors;
pub mod ppu;
#[cfg(test)]
mod tests;
pub mod timer;
mod utils;

/// The panel refresh rate in Hz.
pub const DISPLAY_REFRESH_RATE: f64 = 59.7;

pub const SCREEN_WIDTH: u8 = 160;
pub const SCREEN_HEIGHT: u8 = 144;

/// Machine cycles per frame: 154 scanlines of 114 cycles each.
pub const CYCLES_PER_FRAME: u64 = 17_556;

/// This trait defines a common interface for everything attached to the
/// memory bus. 16-bit accesses are little endian: the low byte lives at
/// the lower address.
pub trait SubSystem {
    /// Writes a byte to the given address.
    fn write(&mut self, address: u16, value: u8);

    /// Reads a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Reads a little-endian word from the given address.
    fn read_word(&mut self, address: u16) -> u16 {
        u16::from(self.read(address)) | u16::from(self.read(address.wrapping_add(1))) << 8
    }

    /// Writes a little-endian word to the given address.
    fn write_word(&mut self, address: u16, value: u16) {
        self.write(address, value as u8);
        self.write(address.wrapping_add(1), (value >> 8) as u8);
    }
}

/// This trait defines the bus surface the CPU interacts with beyond plain
/// memory: the interrupt controller registers and the boot ROM overlay.
pub trait Bus: SubSystem {
    /// Indicates whether an interrupt is both enabled and flagged.
    fn has_irq(&self) -> bool;

    fn get_ie(&self) -> InterruptRegister;
    fn set_ie(&mut self, r: InterruptRegister);
    fn get_if(&self) -> InterruptRegister;
    fn set_if(&mut self, r: InterruptRegister);

    /// Whether the boot ROM overlay still shadows the bottom of the ROM.
    fn boot_rom_active(&self) -> bool {
        false
    }

    /// Permanently unmaps the boot ROM overlay.
    fn finish_boot(&mut self) {}
}

/// Holds the configuration of the emulator core.
#[derive(Clone, Copy, Default)]
pub struct EmulatorConfig {
    /// Emit a trace line per executed instruction.
    pub debug_trace: bool,
    /// Skip the boot ROM by applying the post-boot state directly.
    pub fastboot: bool,
}

/// The machine driver: owns the CPU and the bus and runs the per-frame
/// loop. PPU and timer advance strictly between instructions, by each
/// instruction's machine-cycle cost; at most one interrupt is serviced
/// per iteration.
pub struct Emulator {
    pub cpu: CPU,
    pub bus: MainBus,
}

impl Emulator {
    /// Creates a new emulator around a cartridge and a host frame sink.
    pub fn new(cartridge: Cartridge, sink: Box<dyn FrameSink>, config: EmulatorConfig) -> Self {
        info!("Loaded ROM: {cartridge}");
        let mut cpu = CPU::default();
        cpu.trace = config.debug_trace;
        let mut bus = MainBus::with_cartridge(cartridge, sink);
        if config.fastboot {
            cpu.apply_post_boot_state();
            bus.finish_boot();
            // The boot ROM leaves the LCD enabled with the unsigned
            // tileset and the background on.
            bus.write(constants::PPU_LCDC, 0x91);
        }
        Self { cpu, bus }
    }

    /// Executes one frame worth of machine cycles. The raster is handed to
    /// the frame sink at V-blank entry along the way. Returns an error for
    /// the fatal conditions: an unmapped opcode or an executed STOP.
    pub fn run_frame(&mut self) -> EmulatorResult<()> {
        let frame_end = self.cpu.clock + CYCLES_PER_FRAME;
        while self.cpu.clock < frame_end {
            let snapshot = self.cpu.clock;
            self.cpu.step(&mut self.bus)?;
            if self.cpu.is_stopped {
                return Err(EmulatorError::CpuStopped { pc: self.cpu.pc });
            }
            let delta = (self.cpu.clock - snapshot) as u16;
            self.bus.step(delta);

            let dispatched = interrupt::service(&mut self.cpu, &mut self.bus);
            if dispatched > 0 {
                self.bus.step(u16::from(dispatched));
            }
        }
        Ok(())
    }
}
