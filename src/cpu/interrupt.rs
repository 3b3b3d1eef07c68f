use crate::bus::InterruptRegister;
use crate::cpu::{CPU, ImeState};
use crate::Bus;

const VBLANK_IRQ_ADDRESS: u16 = 0x0040;
const LCD_IRQ_ADDRESS: u16 = 0x0048;
const TIMER_IRQ_ADDRESS: u16 = 0x0050;
const SERIAL_IRQ_ADDRESS: u16 = 0x0058;
const JOYPAD_IRQ_ADDRESS: u16 = 0x0060;

/// Machine cycles consumed by one interrupt dispatch.
pub const DISPATCH_CYCLES: u8 = 5;

/// Services at most one pending interrupt request. Runs between
/// instructions only, never in the middle of one.
///
/// A pending interrupt always releases HALT; when the IME is clear the CPU
/// merely resumes execution without vectoring. Returns the machine cycles
/// consumed by the dispatch, zero if nothing was dispatched.
pub fn service<T: Bus>(cpu: &mut CPU, bus: &mut T) -> u8 {
    if !bus.has_irq() {
        return 0;
    }

    // The CPU is always woken from HALT by a pending interrupt.
    cpu.is_halted = false;

    if cpu.ime != ImeState::Enabled {
        return 0;
    }

    let mut int_flag = bus.get_if();
    let armed = bus.get_ie() & int_flag;
    // Flag order doubles as dispatch priority, lowest bit first.
    for irq in InterruptRegister::all().iter() {
        if armed.contains(irq) {
            int_flag.remove(irq);
            bus.set_if(int_flag);
            dispatch(cpu, bus, vector(irq));
            return DISPATCH_CYCLES;
        }
    }
    0
}

/// Transfers control to the given interrupt vector.
#[inline]
fn dispatch<T: Bus>(cpu: &mut CPU, bus: &mut T, address: u16) {
    cpu.ime = ImeState::Disabled;
    cpu.push(cpu.pc, bus);
    cpu.pc = address;
    cpu.clock += u64::from(DISPATCH_CYCLES);
}

/// Maps an interrupt to its fixed vector address.
fn vector(irq: InterruptRegister) -> u16 {
    match irq {
        InterruptRegister::VBLANK => VBLANK_IRQ_ADDRESS,
        InterruptRegister::STAT => LCD_IRQ_ADDRESS,
        InterruptRegister::TIMER => TIMER_IRQ_ADDRESS,
        InterruptRegister::SERIAL => SERIAL_IRQ_ADDRESS,
        InterruptRegister::JOYPAD => JOYPAD_IRQ_ADDRESS,
        _ => unreachable!("interrupt flags are serviced one bit at a time"),
    }
}
