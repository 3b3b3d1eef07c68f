use crate::bus::InterruptRegister;
use crate::constants::*;
use crate::timer::{Timer, TimerControl};

#[test]
fn test_counter_overflow_reloads_and_raises_irq() {
    let mut int_flag = InterruptRegister::empty();
    let mut timer = Timer::default();
    timer.write(TIMER_CTRL, 0x05); // enabled, one counter tick per main tick
    timer.write(TIMER_COUNTER, 0xFF);
    timer.write(TIMER_MODULO, 0xAB);

    timer.step(&mut int_flag, 4);
    assert_eq!(timer.read(TIMER_COUNTER), 0xAB, "the counter reloads from TMA");
    assert!(int_flag.contains(InterruptRegister::TIMER));
}

#[test]
fn test_prescaler_gates_the_counter() {
    let mut int_flag = InterruptRegister::empty();
    let mut timer = Timer::default();
    timer.write(TIMER_CTRL, 0x05);
    timer.write(TIMER_COUNTER, 0xFF);

    // One machine cycle is below the four-cycle main tick.
    timer.step(&mut int_flag, 1);
    assert_eq!(timer.read(TIMER_COUNTER), 0xFF);
    assert!(!int_flag.contains(InterruptRegister::TIMER));

    timer.step(&mut int_flag, 3);
    assert!(int_flag.contains(InterruptRegister::TIMER), "cycles accumulate");
}

#[test]
fn test_counter_rates() {
    // TAC select 0b00: one counter tick per 256 machine cycles.
    let mut int_flag = InterruptRegister::empty();
    let mut timer = Timer::default();
    timer.write(TIMER_CTRL, 0x04);
    timer.step(&mut int_flag, 255);
    assert_eq!(timer.read(TIMER_COUNTER), 0);
    timer.step(&mut int_flag, 1);
    assert_eq!(timer.read(TIMER_COUNTER), 1);

    // TAC select 0b11: one counter tick per 64 machine cycles.
    let mut timer = Timer::default();
    timer.write(TIMER_CTRL, 0x07);
    timer.step(&mut int_flag, 64);
    assert_eq!(timer.read(TIMER_COUNTER), 1);

    // TAC select 0b10: one counter tick per 16 machine cycles.
    let mut timer = Timer::default();
    timer.write(TIMER_CTRL, 0x06);
    timer.step(&mut int_flag, 16);
    assert_eq!(timer.read(TIMER_COUNTER), 1);
}

#[test]
fn test_disabled_counter_holds_still() {
    let mut int_flag = InterruptRegister::empty();
    let mut timer = Timer::default();
    timer.write(TIMER_CTRL, 0x01); // rate selected but not enabled
    timer.step(&mut int_flag, 1024);
    assert_eq!(timer.read(TIMER_COUNTER), 0);
    assert_eq!(timer.read(TIMER_DIVIDER), 16, "the divider runs regardless");
}

#[test]
fn test_divider_rate_and_wrap() {
    let mut int_flag = InterruptRegister::empty();
    let mut timer = Timer::default();
    timer.step(&mut int_flag, 63);
    assert_eq!(timer.read(TIMER_DIVIDER), 0);
    timer.step(&mut int_flag, 1);
    assert_eq!(timer.read(TIMER_DIVIDER), 1, "DIV ticks every 64 machine cycles");

    timer.step(&mut int_flag, 64 * 255);
    assert_eq!(timer.read(TIMER_DIVIDER), 0, "DIV wraps");
}

#[test]
fn test_divider_write_resets_prescaler() {
    let mut int_flag = InterruptRegister::empty();
    let mut timer = Timer::default();
    timer.step(&mut int_flag, 60);
    timer.write(TIMER_DIVIDER, 0x77);
    assert_eq!(timer.read(TIMER_DIVIDER), 0);

    // The prescaler restarted: a full 64 cycles are needed again.
    timer.step(&mut int_flag, 63);
    assert_eq!(timer.read(TIMER_DIVIDER), 0);
    timer.step(&mut int_flag, 1);
    assert_eq!(timer.read(TIMER_DIVIDER), 1);
}

#[test]
fn test_control_register_round_trip() {
    let mut timer = Timer::default();
    timer.write(TIMER_CTRL, 0xFF);
    assert_eq!(timer.read(TIMER_CTRL), 0x07, "only the low three bits are stored");
    assert!(timer.control.is_enabled());

    timer.write(TIMER_CTRL, 0x03);
    assert!(!timer.control.is_enabled());
    assert_eq!(timer.control, TimerControl::SELECT0 | TimerControl::SELECT1);
}

#[test]
fn test_counter_write() {
    let mut timer = Timer::default();
    timer.write(TIMER_COUNTER, 0x42);
    timer.write(TIMER_MODULO, 0x24);
    assert_eq!(timer.read(TIMER_COUNTER), 0x42);
    assert_eq!(timer.read(TIMER_MODULO), 0x24);
}
