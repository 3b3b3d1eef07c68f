use crate::bus::InterruptRegister;
use crate::cpu::interrupt::{service, DISPATCH_CYCLES};
use crate::cpu::tests::MockBus;
use crate::cpu::{ImeState, CPU};

#[test]
fn test_dispatch_pushes_pc_and_vectors() {
    let mut cpu = CPU::default();
    let mut bus = MockBus::with_program(&[]);
    cpu.pc = 0x1234;
    cpu.sp = 0xFFFE;
    cpu.ime = ImeState::Enabled;
    bus.interrupt_enable = InterruptRegister::VBLANK;
    bus.interrupt_flag = InterruptRegister::VBLANK;

    assert_eq!(service(&mut cpu, &mut bus), DISPATCH_CYCLES);
    assert_eq!(cpu.pc, 0x0040);
    assert_eq!(cpu.ime, ImeState::Disabled);
    assert_eq!(bus.data[0xFFFC], 0x34);
    assert_eq!(bus.data[0xFFFD], 0x12);
    assert!(bus.interrupt_flag.is_empty(), "the serviced bit is cleared");
    assert_eq!(cpu.clock, u64::from(DISPATCH_CYCLES));
}

#[test]
fn test_lowest_numbered_bit_wins() {
    let mut cpu = CPU::default();
    let mut bus = MockBus::with_program(&[]);
    cpu.sp = 0xFFFE;
    cpu.ime = ImeState::Enabled;
    bus.interrupt_enable = InterruptRegister::all();
    bus.interrupt_flag =
        InterruptRegister::JOYPAD | InterruptRegister::TIMER | InterruptRegister::STAT;

    service(&mut cpu, &mut bus);
    assert_eq!(cpu.pc, 0x0048, "STAT outranks TIMER and JOYPAD");
    assert_eq!(
        bus.interrupt_flag,
        InterruptRegister::JOYPAD | InterruptRegister::TIMER,
        "only the serviced bit is cleared"
    );
}

#[test]
fn test_masked_interrupts_are_not_dispatched() {
    let mut cpu = CPU::default();
    let mut bus = MockBus::with_program(&[]);
    cpu.ime = ImeState::Enabled;
    bus.interrupt_enable = InterruptRegister::TIMER;
    bus.interrupt_flag = InterruptRegister::VBLANK;

    assert_eq!(service(&mut cpu, &mut bus), 0);
    assert_eq!(cpu.pc, 0x0000);
}

#[test]
fn test_one_interrupt_per_call() {
    let mut cpu = CPU::default();
    let mut bus = MockBus::with_program(&[]);
    cpu.sp = 0xFFFE;
    cpu.ime = ImeState::Enabled;
    bus.interrupt_enable = InterruptRegister::all();
    bus.interrupt_flag = InterruptRegister::VBLANK | InterruptRegister::TIMER;

    service(&mut cpu, &mut bus);
    assert_eq!(cpu.pc, 0x0040);
    assert_eq!(bus.interrupt_flag, InterruptRegister::TIMER, "the timer bit waits");
    // IME is cleared by the dispatch, the second request stays pending.
    assert_eq!(service(&mut cpu, &mut bus), 0);
}

#[test]
fn test_halt_released_without_ime() {
    let mut cpu = CPU::default();
    let mut bus = MockBus::with_program(&[]);
    cpu.is_halted = true;
    cpu.ime = ImeState::Disabled;
    bus.interrupt_enable = InterruptRegister::TIMER;
    bus.interrupt_flag = InterruptRegister::TIMER;

    assert_eq!(service(&mut cpu, &mut bus), 0, "no vectoring without IME");
    assert!(!cpu.is_halted, "a pending interrupt always releases HALT");
    assert_eq!(cpu.pc, 0x0000);
    assert_eq!(bus.interrupt_flag, InterruptRegister::TIMER, "the flag stays set");
}

#[test]
fn test_pending_ime_does_not_dispatch() {
    let mut cpu = CPU::default();
    let mut bus = MockBus::with_program(&[]);
    cpu.ime = ImeState::Pending;
    bus.interrupt_enable = InterruptRegister::VBLANK;
    bus.interrupt_flag = InterruptRegister::VBLANK;

    assert_eq!(service(&mut cpu, &mut bus), 0);
}

#[test]
fn test_reti_restores_pushed_pc_and_ime() {
    let mut cpu = CPU::default();
    let mut bus = MockBus::with_program(&[]);
    cpu.pc = 0x1234;
    cpu.sp = 0xFFFE;
    cpu.ime = ImeState::Enabled;
    bus.interrupt_enable = InterruptRegister::VBLANK;
    bus.interrupt_flag = InterruptRegister::VBLANK;
    service(&mut cpu, &mut bus);
    assert_eq!(cpu.pc, 0x0040);

    bus.data[0x0040] = 0xD9; // RETI
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.pc, 0x1234, "control returns to the interrupted address");
    assert_eq!(cpu.ime, ImeState::Enabled, "RETI re-arms the IME immediately");
}
