use crate::constants::BOOT_HANDOFF;
use crate::cpu::instruction::{Instruction, Instruction::*, OPCODE_PREFIX};
use crate::cpu::ops::{ByteSource, ByteTarget, JumpCondition, Load, ResetCode, WordRegister};
use crate::cpu::registers::{FlagsRegister, Registers};
use crate::errors::{EmulatorError, EmulatorResult};
use crate::{utils, Bus, SubSystem};
use log::{debug, trace};

pub mod instruction;
pub mod interrupt;
pub mod ops;
pub mod registers;
#[cfg(test)]
mod tests;

/// IME (Interrupt Master Enable) state. EI arms the enable with a delay of
/// one instruction, which puts it in `ImeState::Pending` first.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum ImeState {
    #[default]
    Disabled,
    Pending,
    Enabled,
}

/// Register state applied when control passes from the boot ROM to the
/// cartridge: AF, BC, DE, HL, SP.
const POST_BOOT: (u16, u16, u16, u16, u16) = (0x01B0, 0x0013, 0x00D8, 0x014D, 0xFFFE);

/// Implements the CPU of the DMG-01, an LR35902 core related to the
/// i8080 and Z80. Executes one instruction per `step` and accounts its
/// cost on the machine-cycle counter.
#[derive(Default)]
pub struct CPU {
    pub r: Registers,
    pub pc: u16,
    pub sp: u16,
    pub ime: ImeState,
    pub is_halted: bool,
    pub is_stopped: bool,
    /// Total machine cycles executed since reset.
    pub clock: u64,
    /// Emit a trace line per executed instruction.
    pub trace: bool,
}

impl CPU {
    /// Executes one instruction, consuming one or more bytes from the
    /// program counter. A halted CPU burns a single machine cycle instead.
    pub fn step<T: Bus>(&mut self, bus: &mut T) -> EmulatorResult<()> {
        if self.is_halted {
            self.clock += 1;
            return Ok(());
        }

        self.maybe_finish_boot(bus);
        let ime_was_pending = self.ime == ImeState::Pending;

        let opcode = bus.read(self.pc);
        let (opcode, prefixed) = match opcode == OPCODE_PREFIX {
            true => (bus.read(self.pc.wrapping_add(1)), true),
            false => (opcode, false),
        };
        let instruction = Instruction::from_byte(opcode, prefixed)
            .ok_or(EmulatorError::UnknownOpcode { opcode, pc: self.pc })?;

        if self.trace {
            trace!(
                "{:04X}  [{}{opcode:02X}] {:<14} {} SP={:04X} cy={}",
                self.pc,
                if prefixed { "CB " } else { "" },
                instruction.to_string(),
                self.r,
                self.sp,
                self.clock
            );
        }

        let (next_pc, cycles) = self.execute(instruction, bus);
        self.pc = next_pc;
        self.clock += u64::from(cycles);

        // A pending EI becomes effective once the following instruction
        // has completed.
        if ime_was_pending && self.ime == ImeState::Pending {
            self.ime = ImeState::Enabled;
        }
        Ok(())
    }

    /// Executes the given instruction and returns the updated program
    /// counter together with the instruction's machine-cycle cost.
    fn execute<T: Bus>(&mut self, instruction: Instruction, bus: &mut T) -> (u16, u8) {
        match instruction {
            ADC(source) => self.handle_add(source, true, bus),
            ADD(source) => self.handle_add(source, false, bus),
            ADDHL(source) => self.handle_add_hl(source),
            ADDSP => self.handle_add_sp(bus),
            AND(source) => self.handle_and(source, bus),
            BIT(bit, target) => self.handle_bit(bit, target, bus),
            CALL(condition) => self.handle_call(condition, bus),
            CCF => self.handle_ccf(),
            CP(source) => self.handle_cp(source, bus),
            CPL => self.handle_cpl(),
            DAA => self.handle_daa(),
            DEC(target) => self.handle_dec_byte(target, bus),
            DEC2(target) => self.handle_dec_word(target),
            DI => self.handle_di(),
            EI => self.handle_ei(),
            HALT => self.handle_halt(),
            INC(target) => self.handle_inc_byte(target, bus),
            INC2(target) => self.handle_inc_word(target),
            JP(condition) => self.handle_jp(condition, bus),
            JPHL => (self.r.get_hl(), 1),
            JR(condition) => self.handle_jr(condition, bus),
            LD(load) => self.handle_ld(load, bus),
            NOP => (self.pc.wrapping_add(1), 1),
            OR(source) => self.handle_or(source, bus),
            POP(target) => self.handle_pop(target, bus),
            PUSH(target) => self.handle_push(target, bus),
            RES(bit, target) => self.handle_res(bit, target, bus),
            RET(condition) => self.handle_ret(condition, bus),
            RETI => self.handle_reti(bus),
            RL(target) => self.handle_rl(target, bus),
            RLA => self.handle_rla(),
            RLC(target) => self.handle_rlc(target, bus),
            RLCA => self.handle_rlca(),
            RR(target) => self.handle_rr(target, bus),
            RRA => self.handle_rra(),
            RRC(target) => self.handle_rrc(target, bus),
            RRCA => self.handle_rrca(),
            RST(code) => self.handle_rst(code, bus),
            SBC(source) => self.handle_sub(source, true, bus),
            SCF => self.handle_scf(),
            SET(bit, target) => self.handle_set(bit, target, bus),
            SLA(target) => self.handle_sla(target, bus),
            SRA(target) => self.handle_sra(target, bus),
            SRL(target) => self.handle_srl(target, bus),
            STOP => self.handle_stop(),
            SUB(source) => self.handle_sub(source, false, bus),
            SWAP(target) => self.handle_swap(target, bus),
            XOR(source) => self.handle_xor(source, bus),
        }
    }

    /// Unmaps the boot ROM overlay on the first opcode fetch at 0x0100 and
    /// normalizes the machine state to the documented post-boot handoff.
    fn maybe_finish_boot<T: Bus>(&mut self, bus: &mut T) {
        if self.pc == BOOT_HANDOFF && bus.boot_rom_active() {
            bus.finish_boot();
            self.apply_post_boot_state();
            debug!("boot ROM finished, handing off to cartridge");
        }
    }

    /// Applies the documented post-boot register state.
    pub fn apply_post_boot_state(&mut self) {
        let (af, bc, de, hl, sp) = POST_BOOT;
        self.r.set_af(af);
        self.r.set_bc(bc);
        self.r.set_de(de);
        self.r.set_hl(hl);
        self.sp = sp;
        self.pc = BOOT_HANDOFF;
        self.ime = ImeState::Disabled;
    }

    /// Reads the byte following the current program counter position.
    #[inline]
    pub fn consume_byte<T: SubSystem>(&mut self, bus: &mut T) -> u8 {
        self.pc = self.pc.wrapping_add(1);
        bus.read(self.pc)
    }

    /// Reads the little-endian word following the current position.
    #[inline]
    pub fn consume_word<T: SubSystem>(&mut self, bus: &mut T) -> u16 {
        u16::from(self.consume_byte(bus)) | u16::from(self.consume_byte(bus)) << 8
    }

    /// Pushes a word onto the stack, high byte first.
    #[inline]
    pub fn push<T: SubSystem>(&mut self, value: u16, bus: &mut T) {
        self.sp = self.sp.wrapping_sub(1);
        bus.write(self.sp, (value >> 8) as u8);
        self.sp = self.sp.wrapping_sub(1);
        bus.write(self.sp, value as u8);
    }

    /// Pops a word off the stack.
    #[inline]
    fn pop<T: SubSystem>(&mut self, bus: &mut T) -> u16 {
        let lsb = u16::from(bus.read(self.sp));
        self.sp = self.sp.wrapping_add(1);
        let msb = u16::from(bus.read(self.sp));
        self.sp = self.sp.wrapping_add(1);
        msb << 8 | lsb
    }

    /// Handles ADD and ADC.
    fn handle_add<T: SubSystem>(&mut self, source: ByteSource, with_carry: bool, bus: &mut T) -> (u16, u8) {
        let value = source.read(self, bus);
        let carry = u8::from(with_carry && self.r.f.contains(FlagsRegister::CARRY));
        let a = self.r.a;
        let result = a.wrapping_add(value).wrapping_add(carry);
        self.r.f.update(
            result == 0,
            false,
            utils::half_carry_add_u8(a, value, carry),
            u16::from(a) + u16::from(value) + u16::from(carry) > 0xFF,
        );
        self.r.a = result;
        (self.pc.wrapping_add(1), 1 + source.extra_cycles())
    }

    /// Handles SUB and SBC.
    fn handle_sub<T: SubSystem>(&mut self, source: ByteSource, with_carry: bool, bus: &mut T) -> (u16, u8) {
        let value = source.read(self, bus);
        let carry = u8::from(with_carry && self.r.f.contains(FlagsRegister::CARRY));
        let a = self.r.a;
        let result = a.wrapping_sub(value).wrapping_sub(carry);
        self.r.f.update(
            result == 0,
            true,
            utils::half_carry_sub_u8(a, value, carry),
            u16::from(a) < u16::from(value) + u16::from(carry),
        );
        self.r.a = result;
        (self.pc.wrapping_add(1), 1 + source.extra_cycles())
    }

    /// Handles CP, a subtraction that only updates the flags.
    fn handle_cp<T: SubSystem>(&mut self, source: ByteSource, bus: &mut T) -> (u16, u8) {
        let value = source.read(self, bus);
        let a = self.r.a;
        self.r.f.update(
            a == value,
            true,
            utils::half_carry_sub_u8(a, value, 0),
            a < value,
        );
        (self.pc.wrapping_add(1), 1 + source.extra_cycles())
    }

    /// Handles ADD HL, rr. The zero flag is left untouched.
    fn handle_add_hl(&mut self, source: WordRegister) -> (u16, u8) {
        let value = source.read(self);
        let hl = self.r.get_hl();
        let (result, overflow) = hl.overflowing_add(value);
        self.r.f.remove(FlagsRegister::SUBTRACTION);
        self.r
            .f
            .set(FlagsRegister::HALF_CARRY, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.r.f.set(FlagsRegister::CARRY, overflow);
        self.r.set_hl(result);
        (self.pc.wrapping_add(1), 2)
    }

    /// Adds the signed immediate byte to SP. H and C are computed from the
    /// low byte as if it were an unsigned 8-bit addition, Z is cleared.
    fn add_sp_offset<T: SubSystem>(&mut self, bus: &mut T) -> u16 {
        let sp = self.sp;
        let byte = self.consume_byte(bus);
        let offset = byte as i8 as i16 as u16;
        self.r.f.update(
            false,
            false,
            (sp & 0x000F) + u16::from(byte & 0x0F) > 0x000F,
            (sp & 0x00FF) + u16::from(byte) > 0x00FF,
        );
        sp.wrapping_add(offset)
    }

    /// Handles ADD SP, r8.
    fn handle_add_sp<T: SubSystem>(&mut self, bus: &mut T) -> (u16, u8) {
        self.sp = self.add_sp_offset(bus);
        (self.pc.wrapping_add(1), 4)
    }

    /// Handles AND.
    fn handle_and<T: SubSystem>(&mut self, source: ByteSource, bus: &mut T) -> (u16, u8) {
        let value = source.read(self, bus);
        self.r.a &= value;
        self.r.f.update(self.r.a == 0, false, true, false);
        (self.pc.wrapping_add(1), 1 + source.extra_cycles())
    }

    /// Handles OR.
    fn handle_or<T: SubSystem>(&mut self, source: ByteSource, bus: &mut T) -> (u16, u8) {
        let value = source.read(self, bus);
        self.r.a |= value;
        self.r.f.update(self.r.a == 0, false, false, false);
        (self.pc.wrapping_add(1), 1 + source.extra_cycles())
    }

    /// Handles XOR.
    fn handle_xor<T: SubSystem>(&mut self, source: ByteSource, bus: &mut T) -> (u16, u8) {
        let value = source.read(self, bus);
        self.r.a ^= value;
        self.r.f.update(self.r.a == 0, false, false, false);
        (self.pc.wrapping_add(1), 1 + source.extra_cycles())
    }

    /// Handles INC on byte operands. The carry flag is preserved.
    fn handle_inc_byte<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value.wrapping_add(1);
        target.write(self, bus, result);
        self.r.f.set(FlagsRegister::ZERO, result == 0);
        self.r.f.remove(FlagsRegister::SUBTRACTION);
        self.r.f.set(FlagsRegister::HALF_CARRY, value & 0x0F == 0x0F);
        (self.pc.wrapping_add(1), if target.is_memory() { 3 } else { 1 })
    }

    /// Handles DEC on byte operands. The carry flag is preserved.
    fn handle_dec_byte<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value.wrapping_sub(1);
        target.write(self, bus, result);
        self.r.f.set(FlagsRegister::ZERO, result == 0);
        self.r.f.insert(FlagsRegister::SUBTRACTION);
        self.r.f.set(FlagsRegister::HALF_CARRY, value & 0x0F == 0);
        (self.pc.wrapping_add(1), if target.is_memory() { 3 } else { 1 })
    }

    /// Handles INC on word registers, no flags are touched.
    fn handle_inc_word(&mut self, target: WordRegister) -> (u16, u8) {
        let value = target.read(self).wrapping_add(1);
        target.write(self, value);
        (self.pc.wrapping_add(1), 2)
    }

    /// Handles DEC on word registers, no flags are touched.
    fn handle_dec_word(&mut self, target: WordRegister) -> (u16, u8) {
        let value = target.read(self).wrapping_sub(1);
        target.write(self, value);
        (self.pc.wrapping_add(1), 2)
    }

    /// Handles the load family.
    fn handle_ld<T: SubSystem>(&mut self, load: Load, bus: &mut T) -> (u16, u8) {
        let cycles = match load {
            Load::Byte(target, source) => {
                let value = source.read(self, bus);
                target.write(self, bus, value);
                1 + source.extra_cycles() + u8::from(target.is_memory())
            }
            Load::FromMemory(address) => {
                let effective = address.resolve(self, bus);
                self.r.a = bus.read(effective);
                address.post(self);
                1 + address.access_cycles()
            }
            Load::ToMemory(address) => {
                let effective = address.resolve(self, bus);
                bus.write(effective, self.r.a);
                address.post(self);
                1 + address.access_cycles()
            }
            Load::Word(target) => {
                let value = self.consume_word(bus);
                target.write(self, value);
                3
            }
            Load::SpHl => {
                self.sp = self.r.get_hl();
                2
            }
            Load::MemorySp => {
                let address = self.consume_word(bus);
                bus.write_word(address, self.sp);
                5
            }
            Load::HlSpOffset => {
                let value = self.add_sp_offset(bus);
                self.r.set_hl(value);
                3
            }
        };
        (self.pc.wrapping_add(1), cycles)
    }

    /// Handles JP. The not-taken path still accounts for the operand bytes.
    fn handle_jp<T: SubSystem>(&mut self, condition: JumpCondition, bus: &mut T) -> (u16, u8) {
        match condition.resolve(self) {
            true => (self.consume_word(bus), 4),
            false => (self.pc.wrapping_add(3), 3),
        }
    }

    /// Handles JR. The displacement is signed and relative to the address
    /// of the instruction that follows the JR.
    fn handle_jr<T: SubSystem>(&mut self, condition: JumpCondition, bus: &mut T) -> (u16, u8) {
        match condition.resolve(self) {
            true => {
                let offset = self.consume_byte(bus) as i8;
                let base = self.pc.wrapping_add(1);
                (base.wrapping_add(offset as i16 as u16), 3)
            }
            false => (self.pc.wrapping_add(2), 2),
        }
    }

    /// Handles CALL.
    fn handle_call<T: SubSystem>(&mut self, condition: JumpCondition, bus: &mut T) -> (u16, u8) {
        let next_pc = self.pc.wrapping_add(3);
        match condition.resolve(self) {
            true => {
                self.push(next_pc, bus);
                (self.consume_word(bus), 6)
            }
            false => (next_pc, 3),
        }
    }

    /// Handles RET, both the unconditional and the conditional forms.
    fn handle_ret<T: SubSystem>(&mut self, condition: JumpCondition, bus: &mut T) -> (u16, u8) {
        match condition {
            JumpCondition::Always => (self.pop(bus), 4),
            _ if condition.resolve(self) => (self.pop(bus), 5),
            _ => (self.pc.wrapping_add(1), 2),
        }
    }

    /// Handles RETI, an unconditional return that re-arms the IME without
    /// the EI delay.
    fn handle_reti<T: SubSystem>(&mut self, bus: &mut T) -> (u16, u8) {
        self.ime = ImeState::Enabled;
        (self.pop(bus), 4)
    }

    /// Handles RST.
    fn handle_rst<T: SubSystem>(&mut self, code: ResetCode, bus: &mut T) -> (u16, u8) {
        self.push(self.pc.wrapping_add(1), bus);
        (code as u16, 4)
    }

    /// Handles PUSH.
    fn handle_push<T: SubSystem>(&mut self, target: WordRegister, bus: &mut T) -> (u16, u8) {
        let value = target.read(self);
        self.push(value, bus);
        (self.pc.wrapping_add(1), 4)
    }

    /// Handles POP. Popping into AF keeps the lower flag nibble clear.
    fn handle_pop<T: SubSystem>(&mut self, target: WordRegister, bus: &mut T) -> (u16, u8) {
        let value = self.pop(bus);
        target.write(self, value);
        (self.pc.wrapping_add(1), 3)
    }

    /// Handles DAA, adjusting A into binary-coded decimal after an
    /// arithmetic instruction, driven by the N, H and C flags.
    fn handle_daa(&mut self) -> (u16, u8) {
        let mut adjust = if self.r.f.contains(FlagsRegister::CARRY) { 0x60 } else { 0x00 };
        if self.r.f.contains(FlagsRegister::HALF_CARRY) {
            adjust |= 0x06;
        }
        if self.r.f.contains(FlagsRegister::SUBTRACTION) {
            self.r.a = self.r.a.wrapping_sub(adjust);
        } else {
            if self.r.a & 0x0F > 0x09 {
                adjust |= 0x06;
            }
            if self.r.a > 0x99 {
                adjust |= 0x60;
            }
            self.r.a = self.r.a.wrapping_add(adjust);
        }
        self.r.f.set(FlagsRegister::ZERO, self.r.a == 0);
        self.r.f.remove(FlagsRegister::HALF_CARRY);
        self.r.f.set(FlagsRegister::CARRY, adjust >= 0x60);
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles CCF.
    fn handle_ccf(&mut self) -> (u16, u8) {
        self.r.f.remove(FlagsRegister::SUBTRACTION);
        self.r.f.remove(FlagsRegister::HALF_CARRY);
        self.r.f.toggle(FlagsRegister::CARRY);
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles SCF.
    fn handle_scf(&mut self) -> (u16, u8) {
        self.r.f.remove(FlagsRegister::SUBTRACTION);
        self.r.f.remove(FlagsRegister::HALF_CARRY);
        self.r.f.insert(FlagsRegister::CARRY);
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles CPL.
    fn handle_cpl(&mut self) -> (u16, u8) {
        self.r.a = !self.r.a;
        self.r.f.insert(FlagsRegister::SUBTRACTION);
        self.r.f.insert(FlagsRegister::HALF_CARRY);
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles HALT. The CPU resumes on the next pending interrupt.
    fn handle_halt(&mut self) -> (u16, u8) {
        self.is_halted = true;
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles STOP. The stopped state is terminal in this core; the
    /// instruction consumes two bytes.
    fn handle_stop(&mut self) -> (u16, u8) {
        self.is_stopped = true;
        (self.pc.wrapping_add(2), 1)
    }

    /// Handles DI.
    fn handle_di(&mut self) -> (u16, u8) {
        self.ime = ImeState::Disabled;
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles EI. The enable is delayed by one instruction.
    fn handle_ei(&mut self) -> (u16, u8) {
        if self.ime == ImeState::Disabled {
            self.ime = ImeState::Pending;
        }
        (self.pc.wrapping_add(1), 1)
    }

    /// Machine cycles of a CB-prefixed read-modify-write instruction.
    #[inline]
    fn cb_cycles(target: ByteTarget) -> u8 {
        if target.is_memory() { 4 } else { 2 }
    }

    /// Handles RLC: rotate left, bit 7 into carry.
    fn handle_rlc<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value.rotate_left(1);
        self.r.f.update(result == 0, false, false, value & 0x80 != 0);
        target.write(self, bus, result);
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles RRC: rotate right, bit 0 into carry.
    fn handle_rrc<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value.rotate_right(1);
        self.r.f.update(result == 0, false, false, value & 0x01 != 0);
        target.write(self, bus, result);
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles RL: rotate left through the carry flag.
    fn handle_rl<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value << 1 | u8::from(self.r.f.contains(FlagsRegister::CARRY));
        self.r.f.update(result == 0, false, false, value & 0x80 != 0);
        target.write(self, bus, result);
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles RR: rotate right through the carry flag.
    fn handle_rr<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value >> 1 | u8::from(self.r.f.contains(FlagsRegister::CARRY)) << 7;
        self.r.f.update(result == 0, false, false, value & 0x01 != 0);
        target.write(self, bus, result);
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles SLA: arithmetic shift left.
    fn handle_sla<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value << 1;
        self.r.f.update(result == 0, false, false, value & 0x80 != 0);
        target.write(self, bus, result);
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles SRA: arithmetic shift right, bit 7 is kept.
    fn handle_sra<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value >> 1 | value & 0x80;
        self.r.f.update(result == 0, false, false, value & 0x01 != 0);
        target.write(self, bus, result);
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles SRL: logical shift right.
    fn handle_srl<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        let result = value >> 1;
        self.r.f.update(result == 0, false, false, value & 0x01 != 0);
        target.write(self, bus, result);
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles SWAP: exchanges the operand's nibbles, carry is cleared.
    fn handle_swap<T: SubSystem>(&mut self, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        self.r.f.update(value == 0, false, false, false);
        target.write(self, bus, value.rotate_right(4));
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles BIT. The carry flag is preserved.
    fn handle_bit<T: SubSystem>(&mut self, bit: u8, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        self.r.f.set(FlagsRegister::ZERO, !utils::bit_at(value, bit));
        self.r.f.remove(FlagsRegister::SUBTRACTION);
        self.r.f.insert(FlagsRegister::HALF_CARRY);
        let cycles = if target.is_memory() { 3 } else { 2 };
        (self.pc.wrapping_add(2), cycles)
    }

    /// Handles RES.
    fn handle_res<T: SubSystem>(&mut self, bit: u8, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        target.write(self, bus, utils::set_bit(value, bit, false));
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles SET.
    fn handle_set<T: SubSystem>(&mut self, bit: u8, target: ByteTarget, bus: &mut T) -> (u16, u8) {
        let value = target.read(self, bus);
        target.write(self, bus, utils::set_bit(value, bit, true));
        (self.pc.wrapping_add(2), Self::cb_cycles(target))
    }

    /// Handles RLCA. Unlike the CB variant the zero flag is cleared.
    fn handle_rlca(&mut self) -> (u16, u8) {
        let carry = self.r.a & 0x80 != 0;
        self.r.a = self.r.a.rotate_left(1);
        self.r.f.update(false, false, false, carry);
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles RRCA. Unlike the CB variant the zero flag is cleared.
    fn handle_rrca(&mut self) -> (u16, u8) {
        let carry = self.r.a & 0x01 != 0;
        self.r.a = self.r.a.rotate_right(1);
        self.r.f.update(false, false, false, carry);
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles RLA. Unlike the CB variant the zero flag is cleared.
    fn handle_rla(&mut self) -> (u16, u8) {
        let carry = self.r.a & 0x80 != 0;
        self.r.a = self.r.a << 1 | u8::from(self.r.f.contains(FlagsRegister::CARRY));
        self.r.f.update(false, false, false, carry);
        (self.pc.wrapping_add(1), 1)
    }

    /// Handles RRA. Unlike the CB variant the zero flag is cleared.
    fn handle_rra(&mut self) -> (u16, u8) {
        let carry = self.r.a & 0x01 != 0;
        self.r.a = self.r.a >> 1 | u8::from(self.r.f.contains(FlagsRegister::CARRY)) << 7;
        self.r.f.update(false, false, false, carry);
        (self.pc.wrapping_add(1), 1)
    }
}
