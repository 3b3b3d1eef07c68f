use crate::bus::InterruptRegister;
use crate::constants::*;
use bitflags::bitflags;

bitflags! {
    /// Represents the timer control register TAC at 0xFF07.
    /// Bits 0-1 select the counter rate, bit 2 enables the counter.
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct TimerControl: u8 {
        const SELECT0 = 0b001;
        const SELECT1 = 0b010;
        const ENABLE  = 0b100;
    }
}

impl TimerControl {
    /// Main ticks between two counter increments for the selected rate.
    #[inline]
    fn threshold(&self) -> u16 {
        match self.bits() & 0b11 {
            0b00 => 64,
            0b01 => 1,
            0b10 => 4,
            _ => 16,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.contains(Self::ENABLE)
    }
}

/// Main ticks between two divider increments, yielding the documented
/// 16384 Hz rate for DIV.
const DIVIDER_PERIOD: u8 = 16;

/// The divider and the configurable counter, both driven from the
/// machine-cycle count. The prescaler chain advances one main tick per
/// four machine cycles; the counter overflow raises the timer interrupt
/// and reloads the counter from the modulo register.
#[derive(Default)]
pub struct Timer {
    /// Free-running divider byte (DIV).
    pub divider: u8,
    /// Configurable counter (TIMA).
    pub counter: u8,
    /// Reload value applied on counter overflow (TMA).
    pub modulo: u8,
    /// Control register (TAC).
    pub control: TimerControl,
    /// Machine cycles towards the next main tick.
    sub_clock: u16,
    /// Main ticks towards the next counter increment.
    main_clock: u16,
    /// Main ticks towards the next divider increment.
    div_clock: u8,
}

impl Timer {
    /// Advances the timer by the machine cycles of the just-completed
    /// instruction, raising the timer interrupt on counter overflow.
    pub fn step(&mut self, int_flag: &mut InterruptRegister, cycles: u16) {
        self.sub_clock += cycles;
        while self.sub_clock >= 4 {
            self.sub_clock -= 4;
            self.tick(int_flag);
        }
    }

    /// One main tick, a quarter of the machine-cycle rate.
    fn tick(&mut self, int_flag: &mut InterruptRegister) {
        self.div_clock += 1;
        if self.div_clock == DIVIDER_PERIOD {
            self.div_clock = 0;
            self.divider = self.divider.wrapping_add(1);
        }

        if !self.control.is_enabled() {
            return;
        }
        self.main_clock += 1;
        if self.main_clock >= self.control.threshold() {
            self.main_clock = 0;
            let (counter, overflow) = self.counter.overflowing_add(1);
            self.counter = match overflow {
                true => self.modulo,
                false => counter,
            };
            if overflow {
                int_flag.insert(InterruptRegister::TIMER);
            }
        }
    }

    /// Handles reads from the timer registers 0xFF04-0xFF07.
    pub fn read(&self, address: u16) -> u8 {
        match address {
            TIMER_DIVIDER => self.divider,
            TIMER_COUNTER => self.counter,
            TIMER_MODULO => self.modulo,
            TIMER_CTRL => self.control.bits(),
            _ => UNDEFINED_READ,
        }
    }

    /// Handles writes to the timer registers 0xFF04-0xFF07.
    /// Writing to the divider zeroes it along with the whole prescaler,
    /// the written value is ignored.
    pub fn write(&mut self, address: u16, value: u8) {
        match address {
            TIMER_DIVIDER => {
                self.divider = 0;
                self.sub_clock = 0;
                self.div_clock = 0;
            }
            TIMER_COUNTER => self.counter = value,
            TIMER_MODULO => self.modulo = value,
            TIMER_CTRL => self.control = TimerControl::from_bits_truncate(value),
            _ => {}
        }
    }
}
