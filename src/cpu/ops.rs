use crate::SubSystem;
use crate::cpu::CPU;
use crate::cpu::registers::FlagsRegister;
use std::fmt;
use std::fmt::Formatter;

/// Names one of the 8-bit registers of the CPU.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Register {
    /// Reads the value from the register.
    #[inline]
    pub fn read(&self, cpu: &CPU) -> u8 {
        match self {
            Register::A => cpu.r.a,
            Register::B => cpu.r.b,
            Register::C => cpu.r.c,
            Register::D => cpu.r.d,
            Register::E => cpu.r.e,
            Register::H => cpu.r.h,
            Register::L => cpu.r.l,
        }
    }

    /// Writes the value to the register.
    #[inline]
    pub fn write(&self, cpu: &mut CPU, value: u8) {
        match self {
            Register::A => cpu.r.a = value,
            Register::B => cpu.r.b = value,
            Register::C => cpu.r.c = value,
            Register::D => cpu.r.d = value,
            Register::E => cpu.r.e = value,
            Register::H => cpu.r.h = value,
            Register::L => cpu.r.l = value,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ident = match self {
            Register::A => "A",
            Register::B => "B",
            Register::C => "C",
            Register::D => "D",
            Register::E => "E",
            Register::H => "H",
            Register::L => "L",
        };
        f.write_str(ident)
    }
}

/// Names one of the 16-bit register pairs, or SP.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum WordRegister {
    AF,
    BC,
    DE,
    HL,
    SP,
}

impl WordRegister {
    #[inline]
    pub fn read(&self, cpu: &CPU) -> u16 {
        match self {
            WordRegister::AF => cpu.r.get_af(),
            WordRegister::BC => cpu.r.get_bc(),
            WordRegister::DE => cpu.r.get_de(),
            WordRegister::HL => cpu.r.get_hl(),
            WordRegister::SP => cpu.sp,
        }
    }

    #[inline]
    pub fn write(&self, cpu: &mut CPU, value: u16) {
        match self {
            WordRegister::AF => cpu.r.set_af(value),
            WordRegister::BC => cpu.r.set_bc(value),
            WordRegister::DE => cpu.r.set_de(value),
            WordRegister::HL => cpu.r.set_hl(value),
            WordRegister::SP => cpu.sp = value,
        }
    }
}

impl fmt::Display for WordRegister {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ident = match self {
            WordRegister::AF => "AF",
            WordRegister::BC => "BC",
            WordRegister::DE => "DE",
            WordRegister::HL => "HL",
            WordRegister::SP => "SP",
        };
        f.write_str(ident)
    }
}

/// A read/write operand: either a register or the byte addressed by HL.
/// Used by INC/DEC, the CB-prefixed family and the load instructions.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum ByteTarget {
    Reg(Register),
    HLI,
}

impl ByteTarget {
    /// Resolves the current value.
    #[inline]
    pub fn read<T: SubSystem>(&self, cpu: &CPU, bus: &mut T) -> u8 {
        match self {
            ByteTarget::Reg(r) => r.read(cpu),
            ByteTarget::HLI => bus.read(cpu.r.get_hl()),
        }
    }

    /// Writes to the register or the addressed memory location.
    #[inline]
    pub fn write<T: SubSystem>(&self, cpu: &mut CPU, bus: &mut T, value: u8) {
        match self {
            ByteTarget::Reg(r) => r.write(cpu, value),
            ByteTarget::HLI => bus.write(cpu.r.get_hl(), value),
        }
    }

    /// Whether this operand goes through memory instead of a register.
    #[inline]
    pub fn is_memory(&self) -> bool {
        matches!(self, ByteTarget::HLI)
    }
}

impl fmt::Display for ByteTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ByteTarget::Reg(r) => write!(f, "{r}"),
            ByteTarget::HLI => f.write_str("(HL)"),
        }
    }
}

/// A read-only operand for the arithmetic/logic family: a register, the
/// immediate byte following the opcode, or the byte addressed by HL.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum ByteSource {
    Reg(Register),
    D8,
    HLI,
}

impl ByteSource {
    /// Resolves the value, consuming the immediate byte where needed.
    #[inline]
    pub fn read<T: SubSystem>(&self, cpu: &mut CPU, bus: &mut T) -> u8 {
        match self {
            ByteSource::Reg(r) => r.read(cpu),
            ByteSource::D8 => cpu.consume_byte(bus),
            ByteSource::HLI => bus.read(cpu.r.get_hl()),
        }
    }

    /// Machine cycles this operand adds over the register variant.
    #[inline]
    pub fn extra_cycles(&self) -> u8 {
        match self {
            ByteSource::Reg(_) => 0,
            ByteSource::D8 | ByteSource::HLI => 1,
        }
    }
}

impl fmt::Display for ByteSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ByteSource::Reg(r) => write!(f, "{r}"),
            ByteSource::D8 => f.write_str("d8"),
            ByteSource::HLI => f.write_str("(HL)"),
        }
    }
}

/// An effective address used by the accumulator load/store instructions.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum ByteAddress {
    BC,
    DE,
    HL,
    /// HL, post-incremented after the access.
    HLInc,
    /// HL, post-decremented after the access.
    HLDec,
    /// The immediate word following the opcode.
    D16,
    /// 0xFF00 + C.
    HighC,
    /// 0xFF00 + the immediate byte following the opcode.
    HighD8,
}

impl ByteAddress {
    /// Computes the effective address, consuming immediates where needed.
    /// The HL post-increment/decrement is applied separately by [`Self::post`]
    /// once the memory access has happened.
    #[inline]
    pub fn resolve<T: SubSystem>(&self, cpu: &mut CPU, bus: &mut T) -> u16 {
        match self {
            ByteAddress::BC => cpu.r.get_bc(),
            ByteAddress::DE => cpu.r.get_de(),
            ByteAddress::HL | ByteAddress::HLInc | ByteAddress::HLDec => cpu.r.get_hl(),
            ByteAddress::D16 => cpu.consume_word(bus),
            ByteAddress::HighC => 0xFF00 | u16::from(cpu.r.c),
            ByteAddress::HighD8 => 0xFF00 | u16::from(cpu.consume_byte(bus)),
        }
    }

    /// Applies the HL post-increment/decrement.
    #[inline]
    pub fn post(&self, cpu: &mut CPU) {
        match self {
            ByteAddress::HLInc => cpu.r.set_hl(cpu.r.get_hl().wrapping_add(1)),
            ByteAddress::HLDec => cpu.r.set_hl(cpu.r.get_hl().wrapping_sub(1)),
            _ => {}
        }
    }

    /// Machine cycles spent computing the address and accessing memory.
    #[inline]
    pub fn access_cycles(&self) -> u8 {
        match self {
            ByteAddress::BC
            | ByteAddress::DE
            | ByteAddress::HL
            | ByteAddress::HLInc
            | ByteAddress::HLDec
            | ByteAddress::HighC => 1,
            ByteAddress::HighD8 => 2,
            ByteAddress::D16 => 3,
        }
    }
}

impl fmt::Display for ByteAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ident = match self {
            ByteAddress::BC => "(BC)",
            ByteAddress::DE => "(DE)",
            ByteAddress::HL => "(HL)",
            ByteAddress::HLInc => "(HL+)",
            ByteAddress::HLDec => "(HL-)",
            ByteAddress::D16 => "(a16)",
            ByteAddress::HighC => "(FF00+C)",
            ByteAddress::HighD8 => "(FF00+a8)",
        };
        f.write_str(ident)
    }
}

/// The load instruction family.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Load {
    /// LD target, source for byte-sized operands.
    Byte(ByteTarget, ByteSource),
    /// LD A, (address).
    FromMemory(ByteAddress),
    /// LD (address), A.
    ToMemory(ByteAddress),
    /// LD rr, d16.
    Word(WordRegister),
    /// LD SP, HL.
    SpHl,
    /// LD (a16), SP.
    MemorySp,
    /// LD HL, SP + r8.
    HlSpOffset,
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Load::Byte(target, source) => write!(f, "LD {target}, {source}"),
            Load::FromMemory(address) => write!(f, "LD A, {address}"),
            Load::ToMemory(address) => write!(f, "LD {address}, A"),
            Load::Word(target) => write!(f, "LD {target}, d16"),
            Load::SpHl => f.write_str("LD SP, HL"),
            Load::MemorySp => f.write_str("LD (a16), SP"),
            Load::HlSpOffset => f.write_str("LD HL, SP+r8"),
        }
    }
}

/// Condition attached to the jump, call and return instructions.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum JumpCondition {
    Always,
    Zero,
    NotZero,
    Carry,
    NotCarry,
}

impl JumpCondition {
    /// Evaluates the condition against the current flags.
    #[inline]
    pub fn resolve(&self, cpu: &CPU) -> bool {
        match self {
            JumpCondition::Always => true,
            JumpCondition::Zero => cpu.r.f.contains(FlagsRegister::ZERO),
            JumpCondition::NotZero => !cpu.r.f.contains(FlagsRegister::ZERO),
            JumpCondition::Carry => cpu.r.f.contains(FlagsRegister::CARRY),
            JumpCondition::NotCarry => !cpu.r.f.contains(FlagsRegister::CARRY),
        }
    }
}

impl fmt::Display for JumpCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ident = match self {
            JumpCondition::Always => "",
            JumpCondition::Zero => "Z",
            JumpCondition::NotZero => "NZ",
            JumpCondition::Carry => "C",
            JumpCondition::NotCarry => "NC",
        };
        f.write_str(ident)
    }
}

/// Fixed target addresses of the RST instructions.
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u16)]
pub enum ResetCode {
    RST00 = 0x00,
    RST08 = 0x08,
    RST10 = 0x10,
    RST18 = 0x18,
    RST20 = 0x20,
    RST28 = 0x28,
    RST30 = 0x30,
    RST38 = 0x38,
}

impl fmt::Display for ResetCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}h", *self as u16)
    }
}
