use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Represents the special purpose "flags" register F.
    /// Only the upper 4 bits are used, the lower nibble always reads as zero.
    ///
    /// ```text
    ///    ┌-> Carry
    ///  ┌-+> Subtraction
    ///  | |
    /// 1111 0000
    /// | |
    /// └-+> Zero
    ///   └-> Half Carry
    /// ```
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    pub struct FlagsRegister: u8 {
        const ZERO        = 0b1000_0000;
        const SUBTRACTION = 0b0100_0000;
        const HALF_CARRY  = 0b0010_0000;
        const CARRY       = 0b0001_0000;
    }
}

impl FlagsRegister {
    /// Sets all four flags at once.
    #[inline]
    pub fn update(&mut self, zero: bool, subtraction: bool, half_carry: bool, carry: bool) {
        self.set(Self::ZERO, zero);
        self.set(Self::SUBTRACTION, subtraction);
        self.set(Self::HALF_CARRY, half_carry);
        self.set(Self::CARRY, carry);
    }
}

impl fmt::Display for FlagsRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.contains(Self::ZERO) { 'Z' } else { '-' },
            if self.contains(Self::SUBTRACTION) { 'N' } else { '-' },
            if self.contains(Self::HALF_CARRY) { 'H' } else { '-' },
            if self.contains(Self::CARRY) { 'C' } else { '-' },
        )
    }
}

/// Holds all 8-bit CPU registers. The pairs BC, DE, HL and AF expose a
/// combined 16-bit view with the first register as the high byte.
#[derive(Default)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: FlagsRegister,
    pub h: u8,
    pub l: u8,
}

impl Registers {
    #[inline]
    pub fn get_af(&self) -> u16 {
        u16::from(self.a) << 8 | u16::from(self.f.bits())
    }

    /// Writes through AF preserve only the four defined flag bits.
    #[inline]
    pub fn set_af(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.f = FlagsRegister::from_bits_truncate(value as u8);
    }

    #[inline]
    pub fn get_bc(&self) -> u16 {
        u16::from(self.b) << 8 | u16::from(self.c)
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.b = (value >> 8) as u8;
        self.c = value as u8;
    }

    #[inline]
    pub fn get_de(&self) -> u16 {
        u16::from(self.d) << 8 | u16::from(self.e)
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.d = (value >> 8) as u8;
        self.e = value as u8;
    }

    #[inline]
    pub fn get_hl(&self) -> u16 {
        u16::from(self.h) << 8 | u16::from(self.l)
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.h = (value >> 8) as u8;
        self.l = value as u8;
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} [{}]",
            self.get_af(),
            self.get_bc(),
            self.get_de(),
            self.get_hl(),
            self.f,
        )
    }
}
