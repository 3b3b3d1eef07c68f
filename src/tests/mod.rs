mod timer;

use crate::bus::InterruptRegister;
use crate::cartridge::Cartridge;
use crate::constants::*;
use crate::errors::EmulatorError;
use crate::ppu::display::NullSink;
use crate::{Emulator, EmulatorConfig, SubSystem, CYCLES_PER_FRAME};

fn emulator(cartridge: Cartridge) -> Emulator {
    Emulator::new(cartridge, Box::new(NullSink), EmulatorConfig::default())
}

fn fastboot_emulator(cartridge: Cartridge) -> Emulator {
    let config = EmulatorConfig {
        fastboot: true,
        ..EmulatorConfig::default()
    };
    Emulator::new(cartridge, Box::new(NullSink), config)
}

/// Steps CPU, PPU and timer together like the frame driver, without the
/// per-frame cycle cap, until the condition holds.
fn run_until(emulator: &mut Emulator, condition: impl Fn(&Emulator) -> bool) {
    // Generous cap: a couple of seconds of emulated time.
    for _ in 0..10_000_000u64 {
        if condition(emulator) {
            return;
        }
        let snapshot = emulator.cpu.clock;
        emulator.cpu.step(&mut emulator.bus).expect("no fatal errors expected");
        emulator.bus.step((emulator.cpu.clock - snapshot) as u16);
    }
    panic!("condition not reached");
}

#[test]
fn test_boot_handoff() {
    let mut emulator = emulator(Cartridge::none());
    assert!(emulator.bus.is_boot_rom_active);
    assert_eq!(emulator.cpu.pc, 0x0000, "reset enters the boot ROM");

    run_until(&mut emulator, |e| !e.bus.is_boot_rom_active);

    let cpu = &emulator.cpu;
    assert_eq!(cpu.r.get_af(), 0x01B0, "AF is invalid");
    assert_eq!(cpu.r.get_bc(), 0x0013, "BC is invalid");
    assert_eq!(cpu.r.get_de(), 0x00D8, "DE is invalid");
    assert_eq!(cpu.r.get_hl(), 0x014D, "HL is invalid");
    assert_eq!(cpu.sp, 0xFFFE, "SP is invalid");
    assert_eq!(emulator.bus.read(PPU_LCDC), 0x91, "LCDC is invalid");
}

#[test]
fn test_boot_overlay_shadows_cartridge() {
    let mut rom = vec![0x55u8; 0x200];
    rom[0x150] = 0xAA;
    let mut emulator = emulator(Cartridge::from_bytes(&rom).unwrap());

    // While the overlay is mapped the bottom 256 bytes come from the
    // boot ROM, the rest from the cartridge.
    assert_eq!(emulator.bus.read(0x0000), 0x31);
    assert_eq!(emulator.bus.read(0x0150), 0xAA);

    emulator.bus.is_boot_rom_active = false;
    assert_eq!(emulator.bus.read(0x0000), 0x55, "the overlay is gone");
}

#[test]
fn test_rom_discards_writes() {
    let mut emulator = emulator(Cartridge::from_bytes(&[0x12, 0x34]).unwrap());
    emulator.bus.is_boot_rom_active = false;
    emulator.bus.write(0x0000, 0xFF);
    emulator.bus.write(0x4000, 0xFF);
    assert_eq!(emulator.bus.read(0x0000), 0x12);
    assert_eq!(emulator.bus.read(0x4000), 0x00);
}

#[test]
fn test_byte_regions_round_trip() {
    let mut emulator = emulator(Cartridge::none());
    let samples = [
        (0xA000u16, "external RAM"),
        (0xBFFF, "external RAM end"),
        (0xC000, "work RAM"),
        (0xDFFF, "work RAM end"),
        (0xFF80, "high RAM"),
        (0xFFFE, "high RAM end"),
    ];
    for (address, region) in samples {
        for value in [0x00u8, 0x5A, 0xFF] {
            emulator.bus.write(address, value);
            assert_eq!(emulator.bus.read(address), value, "round trip in {region}");
        }
    }
}

#[test]
fn test_word_round_trip_is_little_endian() {
    let mut emulator = emulator(Cartridge::none());
    emulator.bus.write_word(0xC123, 0xBEEF);
    assert_eq!(emulator.bus.read(0xC123), 0xEF, "low byte at the lower address");
    assert_eq!(emulator.bus.read(0xC124), 0xBE);
    assert_eq!(emulator.bus.read_word(0xC123), 0xBEEF);
}

#[test]
fn test_echo_ram_mirrors_work_ram() {
    let mut emulator = emulator(Cartridge::none());
    emulator.bus.write(0xC000, 0x42);
    assert_eq!(emulator.bus.read(0xE000), 0x42);
    emulator.bus.write(0xFDFF, 0x24);
    assert_eq!(emulator.bus.read(0xDDFF), 0x24);
}

#[test]
fn test_unmapped_region_reads_constant() {
    let mut emulator = emulator(Cartridge::none());
    emulator.bus.write(0xFEA0, 0x12);
    assert_eq!(emulator.bus.read(0xFEA0), UNDEFINED_READ);
    assert_eq!(emulator.bus.read(0xFEFF), UNDEFINED_READ);
}

#[test]
fn test_joypad_reads_idle() {
    let mut emulator = emulator(Cartridge::none());
    assert_eq!(emulator.bus.read(JOYPAD), 0xFF);
}

#[test]
fn test_interrupt_registers_mask_to_five_bits() {
    let mut emulator = emulator(Cartridge::none());
    emulator.bus.write(INTERRUPT_FLAG, 0xFF);
    assert_eq!(emulator.bus.read(INTERRUPT_FLAG), 0x1F);
    emulator.bus.write(INTERRUPT_ENABLE, 0xFF);
    assert_eq!(emulator.bus.read(INTERRUPT_ENABLE), 0x1F);
}

#[test]
fn test_div_write_zeroes_the_divider() {
    let mut emulator = emulator(Cartridge::none());
    emulator.bus.step(256);
    assert_eq!(emulator.bus.read(TIMER_DIVIDER), 4, "DIV ticks every 64 machine cycles");
    emulator.bus.write(TIMER_DIVIDER, 0xAB);
    assert_eq!(emulator.bus.read(TIMER_DIVIDER), 0, "any write zeroes DIV");
}

#[test]
fn test_oam_dma_copies_and_redecodes() {
    let mut emulator = fastboot_emulator(Cartridge::none());
    for i in 0..OAM_SIZE as u16 {
        emulator.bus.write(0xC000 + i, (i as u8).wrapping_mul(3));
    }
    emulator.bus.write(PPU_DMA, 0xC0);
    for i in 0..OAM_SIZE as u16 {
        assert_eq!(emulator.bus.read(OAM_BEGIN + i), (i as u8).wrapping_mul(3));
    }
}

#[test]
fn test_frame_cadence_raises_one_vblank_per_frame() {
    let mut emulator = fastboot_emulator(Cartridge::none());
    assert_eq!(emulator.bus.ppu.frames(), 0);

    emulator.run_frame().unwrap();
    assert_eq!(emulator.bus.ppu.frames(), 1);
    assert!(
        emulator.bus.interrupt_flag.contains(InterruptRegister::VBLANK),
        "the V-blank flag is raised"
    );
    assert!(emulator.cpu.clock >= CYCLES_PER_FRAME);

    emulator.run_frame().unwrap();
    assert_eq!(emulator.bus.ppu.frames(), 2, "exactly one V-blank per frame");
}

#[test]
fn test_stop_aborts_the_frame() {
    let mut rom = vec![0u8; 0x200];
    rom[0x100] = 0x10; // STOP
    let mut emulator = fastboot_emulator(Cartridge::from_bytes(&rom).unwrap());
    assert_eq!(
        emulator.run_frame(),
        Err(EmulatorError::CpuStopped { pc: 0x0102 })
    );
}

#[test]
fn test_unknown_opcode_aborts_the_frame() {
    let mut rom = vec![0u8; 0x200];
    rom[0x100] = 0xD3;
    let mut emulator = fastboot_emulator(Cartridge::from_bytes(&rom).unwrap());
    assert_eq!(
        emulator.run_frame(),
        Err(EmulatorError::UnknownOpcode {
            opcode: 0xD3,
            pc: 0x0100
        })
    );
}

#[test]
fn test_vblank_interrupt_dispatches_through_the_driver() {
    let mut rom = vec![0u8; 0x200];
    // At 0x100: enable the V-blank interrupt and halt.
    let program = [
        0x3E, 0x01, // LD A, 0x01
        0xE0, 0xFF, // LDH (0xFF), A   ; IE = VBLANK
        0xFB, // EI
        0x76, // HALT
    ];
    rom[0x100..0x100 + program.len()].copy_from_slice(&program);
    rom[0x40] = 0x76; // the V-blank vector halts again
    let mut emulator = fastboot_emulator(Cartridge::from_bytes(&rom).unwrap());

    emulator.run_frame().unwrap();
    assert_eq!(emulator.cpu.pc, 0x0041, "the V-blank vector was entered");
    assert!(
        !emulator.bus.interrupt_flag.contains(InterruptRegister::VBLANK),
        "the dispatched flag is cleared"
    );
}
