use crate::cpu::ops::ByteAddress::{HighC, HighD8, D16};
use crate::cpu::ops::ByteTarget::HLI;
use crate::cpu::ops::Register::{A, B, C, D, E, H, L};
use crate::cpu::ops::WordRegister::{AF, BC, DE, HL, SP};
use crate::cpu::ops::{
    ByteAddress, ByteSource, ByteTarget, JumpCondition, Load, ResetCode, WordRegister,
};
use std::fmt;
use std::fmt::Formatter;

/// Opcode byte introducing the secondary dispatch table.
pub const OPCODE_PREFIX: u8 = 0xCB;

/// One decoded instruction. The two 256-entry dispatch tables below map
/// opcode bytes onto this type in O(1); the handlers in `cpu::CPU` carry
/// the execution semantics.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    ADC(ByteSource),              // Add source + carry flag to A
    ADD(ByteSource),              // Add source to A
    ADDHL(WordRegister),          // Add word register to HL
    ADDSP,                        // Add signed immediate byte to SP
    AND(ByteSource),              // Logical AND with A
    BIT(u8, ByteTarget),          // Test bit b of the operand
    CALL(JumpCondition),          // Push the return address and jump
    CCF,                          // Complement carry flag
    CP(ByteSource),               // Compare A with source
    CPL,                          // Complement A, sets N and H
    DAA,                          // Decimal-adjust A after a BCD add/sub
    DEC(ByteTarget),              // Decrement byte operand
    DEC2(WordRegister),           // Decrement word register
    DI,                           // Disable interrupt dispatch
    EI,                           // Enable interrupt dispatch, delayed one instruction
    HALT,                         // Wait for an interrupt
    INC(ByteTarget),              // Increment byte operand
    INC2(WordRegister),           // Increment word register
    JP(JumpCondition),            // Absolute jump to the immediate word
    JPHL,                         // Jump to the address held in HL
    JR(JumpCondition),            // Relative jump by the signed immediate byte
    LD(Load),                     // The load family
    NOP,                          // No operation
    OR(ByteSource),               // Logical OR with A
    POP(WordRegister),            // Pop a word off the stack
    PUSH(WordRegister),           // Push a word onto the stack
    RES(u8, ByteTarget),          // Clear bit b of the operand
    RET(JumpCondition),           // Pop the return address and jump
    RETI,                         // Return and enable interrupt dispatch
    RL(ByteTarget),               // Rotate left through carry
    RLA,                          // Rotate A left through carry, Z cleared
    RLC(ByteTarget),              // Rotate left, bit 7 to carry
    RLCA,                         // Rotate A left, Z cleared
    RR(ByteTarget),               // Rotate right through carry
    RRA,                          // Rotate A right through carry, Z cleared
    RRC(ByteTarget),              // Rotate right, bit 0 to carry
    RRCA,                         // Rotate A right, Z cleared
    RST(ResetCode),               // Push PC and jump to a fixed vector
    SBC(ByteSource),              // Subtract source + carry flag from A
    SCF,                          // Set carry flag
    SET(u8, ByteTarget),          // Set bit b of the operand
    SLA(ByteTarget),              // Arithmetic shift left
    SRA(ByteTarget),              // Arithmetic shift right, bit 7 kept
    SRL(ByteTarget),              // Logical shift right
    STOP,                         // Stop the machine, fatal in this core
    SUB(ByteSource),              // Subtract source from A
    SWAP(ByteTarget),             // Swap the nibbles of the operand
    XOR(ByteSource),              // Logical XOR with A
}

use Instruction::*;

impl Instruction {
    /// Decodes one opcode byte through the primary or the CB-prefixed table.
    /// Returns `None` for the eleven unmapped primary opcodes.
    pub fn from_byte(opcode: u8, prefixed: bool) -> Option<Instruction> {
        match prefixed {
            true => Some(Self::from_byte_prefixed(opcode)),
            false => Self::from_byte_not_prefixed(opcode),
        }
    }

    /// The primary dispatch table.
    fn from_byte_not_prefixed(opcode: u8) -> Option<Instruction> {
        let instruction = match opcode {
            0x00 => NOP,
            0x01 => LD(Load::Word(BC)),
            0x02 => LD(Load::ToMemory(ByteAddress::BC)),
            0x03 => INC2(BC),
            0x04 => INC(ByteTarget::Reg(B)),
            0x05 => DEC(ByteTarget::Reg(B)),
            0x06 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::D8)),
            0x07 => RLCA,
            0x08 => LD(Load::MemorySp),
            0x09 => ADDHL(BC),
            0x0A => LD(Load::FromMemory(ByteAddress::BC)),
            0x0B => DEC2(BC),
            0x0C => INC(ByteTarget::Reg(C)),
            0x0D => DEC(ByteTarget::Reg(C)),
            0x0E => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::D8)),
            0x0F => RRCA,

            0x10 => STOP,
            0x11 => LD(Load::Word(DE)),
            0x12 => LD(Load::ToMemory(ByteAddress::DE)),
            0x13 => INC2(DE),
            0x14 => INC(ByteTarget::Reg(D)),
            0x15 => DEC(ByteTarget::Reg(D)),
            0x16 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::D8)),
            0x17 => RLA,
            0x18 => JR(JumpCondition::Always),
            0x19 => ADDHL(DE),
            0x1A => LD(Load::FromMemory(ByteAddress::DE)),
            0x1B => DEC2(DE),
            0x1C => INC(ByteTarget::Reg(E)),
            0x1D => DEC(ByteTarget::Reg(E)),
            0x1E => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::D8)),
            0x1F => RRA,

            0x20 => JR(JumpCondition::NotZero),
            0x21 => LD(Load::Word(HL)),
            0x22 => LD(Load::ToMemory(ByteAddress::HLInc)),
            0x23 => INC2(HL),
            0x24 => INC(ByteTarget::Reg(H)),
            0x25 => DEC(ByteTarget::Reg(H)),
            0x26 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::D8)),
            0x27 => DAA,
            0x28 => JR(JumpCondition::Zero),
            0x29 => ADDHL(HL),
            0x2A => LD(Load::FromMemory(ByteAddress::HLInc)),
            0x2B => DEC2(HL),
            0x2C => INC(ByteTarget::Reg(L)),
            0x2D => DEC(ByteTarget::Reg(L)),
            0x2E => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::D8)),
            0x2F => CPL,

            0x30 => JR(JumpCondition::NotCarry),
            0x31 => LD(Load::Word(SP)),
            0x32 => LD(Load::ToMemory(ByteAddress::HLDec)),
            0x33 => INC2(SP),
            0x34 => INC(HLI),
            0x35 => DEC(HLI),
            0x36 => LD(Load::Byte(HLI, ByteSource::D8)),
            0x37 => SCF,
            0x38 => JR(JumpCondition::Carry),
            0x39 => ADDHL(SP),
            0x3A => LD(Load::FromMemory(ByteAddress::HLDec)),
            0x3B => DEC2(SP),
            0x3C => INC(ByteTarget::Reg(A)),
            0x3D => DEC(ByteTarget::Reg(A)),
            0x3E => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::D8)),
            0x3F => CCF,

            0x40 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::Reg(B))),
            0x41 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::Reg(C))),
            0x42 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::Reg(D))),
            0x43 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::Reg(E))),
            0x44 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::Reg(H))),
            0x45 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::Reg(L))),
            0x46 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::HLI)),
            0x47 => LD(Load::Byte(ByteTarget::Reg(B), ByteSource::Reg(A))),
            0x48 => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::Reg(B))),
            0x49 => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::Reg(C))),
            0x4A => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::Reg(D))),
            0x4B => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::Reg(E))),
            0x4C => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::Reg(H))),
            0x4D => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::Reg(L))),
            0x4E => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::HLI)),
            0x4F => LD(Load::Byte(ByteTarget::Reg(C), ByteSource::Reg(A))),

            0x50 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::Reg(B))),
            0x51 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::Reg(C))),
            0x52 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::Reg(D))),
            0x53 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::Reg(E))),
            0x54 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::Reg(H))),
            0x55 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::Reg(L))),
            0x56 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::HLI)),
            0x57 => LD(Load::Byte(ByteTarget::Reg(D), ByteSource::Reg(A))),
            0x58 => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::Reg(B))),
            0x59 => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::Reg(C))),
            0x5A => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::Reg(D))),
            0x5B => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::Reg(E))),
            0x5C => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::Reg(H))),
            0x5D => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::Reg(L))),
            0x5E => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::HLI)),
            0x5F => LD(Load::Byte(ByteTarget::Reg(E), ByteSource::Reg(A))),

            0x60 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::Reg(B))),
            0x61 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::Reg(C))),
            0x62 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::Reg(D))),
            0x63 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::Reg(E))),
            0x64 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::Reg(H))),
            0x65 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::Reg(L))),
            0x66 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::HLI)),
            0x67 => LD(Load::Byte(ByteTarget::Reg(H), ByteSource::Reg(A))),
            0x68 => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::Reg(B))),
            0x69 => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::Reg(C))),
            0x6A => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::Reg(D))),
            0x6B => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::Reg(E))),
            0x6C => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::Reg(H))),
            0x6D => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::Reg(L))),
            0x6E => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::HLI)),
            0x6F => LD(Load::Byte(ByteTarget::Reg(L), ByteSource::Reg(A))),

            0x70 => LD(Load::Byte(HLI, ByteSource::Reg(B))),
            0x71 => LD(Load::Byte(HLI, ByteSource::Reg(C))),
            0x72 => LD(Load::Byte(HLI, ByteSource::Reg(D))),
            0x73 => LD(Load::Byte(HLI, ByteSource::Reg(E))),
            0x74 => LD(Load::Byte(HLI, ByteSource::Reg(H))),
            0x75 => LD(Load::Byte(HLI, ByteSource::Reg(L))),
            0x76 => HALT,
            0x77 => LD(Load::Byte(HLI, ByteSource::Reg(A))),
            0x78 => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::Reg(B))),
            0x79 => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::Reg(C))),
            0x7A => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::Reg(D))),
            0x7B => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::Reg(E))),
            0x7C => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::Reg(H))),
            0x7D => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::Reg(L))),
            0x7E => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::HLI)),
            0x7F => LD(Load::Byte(ByteTarget::Reg(A), ByteSource::Reg(A))),

            0x80 => ADD(ByteSource::Reg(B)),
            0x81 => ADD(ByteSource::Reg(C)),
            0x82 => ADD(ByteSource::Reg(D)),
            0x83 => ADD(ByteSource::Reg(E)),
            0x84 => ADD(ByteSource::Reg(H)),
            0x85 => ADD(ByteSource::Reg(L)),
            0x86 => ADD(ByteSource::HLI),
            0x87 => ADD(ByteSource::Reg(A)),
            0x88 => ADC(ByteSource::Reg(B)),
            0x89 => ADC(ByteSource::Reg(C)),
            0x8A => ADC(ByteSource::Reg(D)),
            0x8B => ADC(ByteSource::Reg(E)),
            0x8C => ADC(ByteSource::Reg(H)),
            0x8D => ADC(ByteSource::Reg(L)),
            0x8E => ADC(ByteSource::HLI),
            0x8F => ADC(ByteSource::Reg(A)),

            0x90 => SUB(ByteSource::Reg(B)),
            0x91 => SUB(ByteSource::Reg(C)),
            0x92 => SUB(ByteSource::Reg(D)),
            0x93 => SUB(ByteSource::Reg(E)),
            0x94 => SUB(ByteSource::Reg(H)),
            0x95 => SUB(ByteSource::Reg(L)),
            0x96 => SUB(ByteSource::HLI),
            0x97 => SUB(ByteSource::Reg(A)),
            0x98 => SBC(ByteSource::Reg(B)),
            0x99 => SBC(ByteSource::Reg(C)),
            0x9A => SBC(ByteSource::Reg(D)),
            0x9B => SBC(ByteSource::Reg(E)),
            0x9C => SBC(ByteSource::Reg(H)),
            0x9D => SBC(ByteSource::Reg(L)),
            0x9E => SBC(ByteSource::HLI),
            0x9F => SBC(ByteSource::Reg(A)),

            0xA0 => AND(ByteSource::Reg(B)),
            0xA1 => AND(ByteSource::Reg(C)),
            0xA2 => AND(ByteSource::Reg(D)),
            0xA3 => AND(ByteSource::Reg(E)),
            0xA4 => AND(ByteSource::Reg(H)),
            0xA5 => AND(ByteSource::Reg(L)),
            0xA6 => AND(ByteSource::HLI),
            0xA7 => AND(ByteSource::Reg(A)),
            0xA8 => XOR(ByteSource::Reg(B)),
            0xA9 => XOR(ByteSource::Reg(C)),
            0xAA => XOR(ByteSource::Reg(D)),
            0xAB => XOR(ByteSource::Reg(E)),
            0xAC => XOR(ByteSource::Reg(H)),
            0xAD => XOR(ByteSource::Reg(L)),
            0xAE => XOR(ByteSource::HLI),
            0xAF => XOR(ByteSource::Reg(A)),

            0xB0 => OR(ByteSource::Reg(B)),
            0xB1 => OR(ByteSource::Reg(C)),
            0xB2 => OR(ByteSource::Reg(D)),
            0xB3 => OR(ByteSource::Reg(E)),
            0xB4 => OR(ByteSource::Reg(H)),
            0xB5 => OR(ByteSource::Reg(L)),
            0xB6 => OR(ByteSource::HLI),
            0xB7 => OR(ByteSource::Reg(A)),
            0xB8 => CP(ByteSource::Reg(B)),
            0xB9 => CP(ByteSource::Reg(C)),
            0xBA => CP(ByteSource::Reg(D)),
            0xBB => CP(ByteSource::Reg(E)),
            0xBC => CP(ByteSource::Reg(H)),
            0xBD => CP(ByteSource::Reg(L)),
            0xBE => CP(ByteSource::HLI),
            0xBF => CP(ByteSource::Reg(A)),

            0xC0 => RET(JumpCondition::NotZero),
            0xC1 => POP(BC),
            0xC2 => JP(JumpCondition::NotZero),
            0xC3 => JP(JumpCondition::Always),
            0xC4 => CALL(JumpCondition::NotZero),
            0xC5 => PUSH(BC),
            0xC6 => ADD(ByteSource::D8),
            0xC7 => RST(ResetCode::RST00),
            0xC8 => RET(JumpCondition::Zero),
            0xC9 => RET(JumpCondition::Always),
            0xCA => JP(JumpCondition::Zero),
            0xCC => CALL(JumpCondition::Zero),
            0xCD => CALL(JumpCondition::Always),
            0xCE => ADC(ByteSource::D8),
            0xCF => RST(ResetCode::RST08),

            0xD0 => RET(JumpCondition::NotCarry),
            0xD1 => POP(DE),
            0xD2 => JP(JumpCondition::NotCarry),
            0xD4 => CALL(JumpCondition::NotCarry),
            0xD5 => PUSH(DE),
            0xD6 => SUB(ByteSource::D8),
            0xD7 => RST(ResetCode::RST10),
            0xD8 => RET(JumpCondition::Carry),
            0xD9 => RETI,
            0xDA => JP(JumpCondition::Carry),
            0xDC => CALL(JumpCondition::Carry),
            0xDE => SBC(ByteSource::D8),
            0xDF => RST(ResetCode::RST18),

            0xE0 => LD(Load::ToMemory(HighD8)),
            0xE1 => POP(HL),
            0xE2 => LD(Load::ToMemory(HighC)),
            0xE5 => PUSH(HL),
            0xE6 => AND(ByteSource::D8),
            0xE7 => RST(ResetCode::RST20),
            0xE8 => ADDSP,
            0xE9 => JPHL,
            0xEA => LD(Load::ToMemory(D16)),
            0xEE => XOR(ByteSource::D8),
            0xEF => RST(ResetCode::RST28),

            0xF0 => LD(Load::FromMemory(HighD8)),
            0xF1 => POP(AF),
            0xF2 => LD(Load::FromMemory(HighC)),
            0xF3 => DI,
            0xF5 => PUSH(AF),
            0xF6 => OR(ByteSource::D8),
            0xF7 => RST(ResetCode::RST30),
            0xF8 => LD(Load::HlSpOffset),
            0xF9 => LD(Load::SpHl),
            0xFA => LD(Load::FromMemory(D16)),
            0xFB => EI,
            0xFE => CP(ByteSource::D8),
            0xFF => RST(ResetCode::RST38),

            // 0xCB introduces the secondary table; the remaining slots
            // (0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4,
            // 0xFC, 0xFD) have no instruction assigned.
            _ => return None,
        };
        Some(instruction)
    }

    /// The CB-prefixed dispatch table. Every slot is defined.
    fn from_byte_prefixed(opcode: u8) -> Instruction {
        match opcode {
            0x00 => RLC(ByteTarget::Reg(B)),
            0x01 => RLC(ByteTarget::Reg(C)),
            0x02 => RLC(ByteTarget::Reg(D)),
            0x03 => RLC(ByteTarget::Reg(E)),
            0x04 => RLC(ByteTarget::Reg(H)),
            0x05 => RLC(ByteTarget::Reg(L)),
            0x06 => RLC(HLI),
            0x07 => RLC(ByteTarget::Reg(A)),
            0x08 => RRC(ByteTarget::Reg(B)),
            0x09 => RRC(ByteTarget::Reg(C)),
            0x0A => RRC(ByteTarget::Reg(D)),
            0x0B => RRC(ByteTarget::Reg(E)),
            0x0C => RRC(ByteTarget::Reg(H)),
            0x0D => RRC(ByteTarget::Reg(L)),
            0x0E => RRC(HLI),
            0x0F => RRC(ByteTarget::Reg(A)),

            0x10 => RL(ByteTarget::Reg(B)),
            0x11 => RL(ByteTarget::Reg(C)),
            0x12 => RL(ByteTarget::Reg(D)),
            0x13 => RL(ByteTarget::Reg(E)),
            0x14 => RL(ByteTarget::Reg(H)),
            0x15 => RL(ByteTarget::Reg(L)),
            0x16 => RL(HLI),
            0x17 => RL(ByteTarget::Reg(A)),
            0x18 => RR(ByteTarget::Reg(B)),
            0x19 => RR(ByteTarget::Reg(C)),
            0x1A => RR(ByteTarget::Reg(D)),
            0x1B => RR(ByteTarget::Reg(E)),
            0x1C => RR(ByteTarget::Reg(H)),
            0x1D => RR(ByteTarget::Reg(L)),
            0x1E => RR(HLI),
            0x1F => RR(ByteTarget::Reg(A)),

            0x20 => SLA(ByteTarget::Reg(B)),
            0x21 => SLA(ByteTarget::Reg(C)),
            0x22 => SLA(ByteTarget::Reg(D)),
            0x23 => SLA(ByteTarget::Reg(E)),
            0x24 => SLA(ByteTarget::Reg(H)),
            0x25 => SLA(ByteTarget::Reg(L)),
            0x26 => SLA(HLI),
            0x27 => SLA(ByteTarget::Reg(A)),
            0x28 => SRA(ByteTarget::Reg(B)),
            0x29 => SRA(ByteTarget::Reg(C)),
            0x2A => SRA(ByteTarget::Reg(D)),
            0x2B => SRA(ByteTarget::Reg(E)),
            0x2C => SRA(ByteTarget::Reg(H)),
            0x2D => SRA(ByteTarget::Reg(L)),
            0x2E => SRA(HLI),
            0x2F => SRA(ByteTarget::Reg(A)),

            0x30 => SWAP(ByteTarget::Reg(B)),
            0x31 => SWAP(ByteTarget::Reg(C)),
            0x32 => SWAP(ByteTarget::Reg(D)),
            0x33 => SWAP(ByteTarget::Reg(E)),
            0x34 => SWAP(ByteTarget::Reg(H)),
            0x35 => SWAP(ByteTarget::Reg(L)),
            0x36 => SWAP(HLI),
            0x37 => SWAP(ByteTarget::Reg(A)),
            0x38 => SRL(ByteTarget::Reg(B)),
            0x39 => SRL(ByteTarget::Reg(C)),
            0x3A => SRL(ByteTarget::Reg(D)),
            0x3B => SRL(ByteTarget::Reg(E)),
            0x3C => SRL(ByteTarget::Reg(H)),
            0x3D => SRL(ByteTarget::Reg(L)),
            0x3E => SRL(HLI),
            0x3F => SRL(ByteTarget::Reg(A)),

            0x40..=0x7F => BIT(bit_index(opcode), cb_operand(opcode)),
            0x80..=0xBF => RES(bit_index(opcode), cb_operand(opcode)),
            0xC0..=0xFF => SET(bit_index(opcode), cb_operand(opcode)),
        }
    }
}

/// Bits 3-5 of a CB opcode select the bit index for BIT/RES/SET.
#[inline]
const fn bit_index(opcode: u8) -> u8 {
    (opcode >> 3) & 0b111
}

/// Bits 0-2 of a CB opcode select the operand in the fixed order
/// B, C, D, E, H, L, (HL), A.
#[inline]
fn cb_operand(opcode: u8) -> ByteTarget {
    match opcode & 0b111 {
        0x00 => ByteTarget::Reg(B),
        0x01 => ByteTarget::Reg(C),
        0x02 => ByteTarget::Reg(D),
        0x03 => ByteTarget::Reg(E),
        0x04 => ByteTarget::Reg(H),
        0x05 => ByteTarget::Reg(L),
        0x06 => HLI,
        _ => ByteTarget::Reg(A),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ADC(source) => write!(f, "ADC A, {source}"),
            ADD(source) => write!(f, "ADD A, {source}"),
            ADDHL(source) => write!(f, "ADD HL, {source}"),
            ADDSP => f.write_str("ADD SP, r8"),
            AND(source) => write!(f, "AND {source}"),
            BIT(bit, target) => write!(f, "BIT {bit}, {target}"),
            CALL(JumpCondition::Always) => f.write_str("CALL a16"),
            CALL(condition) => write!(f, "CALL {condition}, a16"),
            CCF => f.write_str("CCF"),
            CP(source) => write!(f, "CP {source}"),
            CPL => f.write_str("CPL"),
            DAA => f.write_str("DAA"),
            DEC(target) => write!(f, "DEC {target}"),
            DEC2(target) => write!(f, "DEC {target}"),
            DI => f.write_str("DI"),
            EI => f.write_str("EI"),
            HALT => f.write_str("HALT"),
            INC(target) => write!(f, "INC {target}"),
            INC2(target) => write!(f, "INC {target}"),
            JP(JumpCondition::Always) => f.write_str("JP a16"),
            JP(condition) => write!(f, "JP {condition}, a16"),
            JPHL => f.write_str("JP (HL)"),
            JR(JumpCondition::Always) => f.write_str("JR r8"),
            JR(condition) => write!(f, "JR {condition}, r8"),
            LD(load) => write!(f, "{load}"),
            NOP => f.write_str("NOP"),
            OR(source) => write!(f, "OR {source}"),
            POP(target) => write!(f, "POP {target}"),
            PUSH(target) => write!(f, "PUSH {target}"),
            RES(bit, target) => write!(f, "RES {bit}, {target}"),
            RET(JumpCondition::Always) => f.write_str("RET"),
            RET(condition) => write!(f, "RET {condition}"),
            RETI => f.write_str("RETI"),
            RL(target) => write!(f, "RL {target}"),
            RLA => f.write_str("RLA"),
            RLC(target) => write!(f, "RLC {target}"),
            RLCA => f.write_str("RLCA"),
            RR(target) => write!(f, "RR {target}"),
            RRA => f.write_str("RRA"),
            RRC(target) => write!(f, "RRC {target}"),
            RRCA => f.write_str("RRCA"),
            RST(code) => write!(f, "RST {code}"),
            SBC(source) => write!(f, "SBC A, {source}"),
            SCF => f.write_str("SCF"),
            SET(bit, target) => write!(f, "SET {bit}, {target}"),
            SLA(target) => write!(f, "SLA {target}"),
            SRA(target) => write!(f, "SRA {target}"),
            SRL(target) => write!(f, "SRL {target}"),
            STOP => f.write_str("STOP"),
            SUB(source) => write!(f, "SUB {source}"),
            SWAP(target) => write!(f, "SWAP {target}"),
            XOR(source) => write!(f, "XOR {source}"),
        }
    }
}
