use crate::constants::*;
use crate::errors::{EmulatorError, EmulatorResult};
use std::fmt;

const TITLE_BEGIN: usize = 0x0134;
const TITLE_END: usize = 0x0143;
const CARTRIDGE_TYPE: usize = 0x0147;

/// An unbanked cartridge ROM image. The bytes are preloaded into the fixed
/// 32 KiB ROM region before the first frame executes; images shorter than
/// the region are zero padded, writes to the region are discarded.
#[derive(Clone, Debug, PartialEq)]
pub struct Cartridge {
    rom: Box<[u8; ROM_SIZE]>,
    title: String,
    kind: u8,
}

impl Cartridge {
    /// Creates a cartridge from a raw ROM dump.
    pub fn from_bytes(bytes: &[u8]) -> EmulatorResult<Self> {
        if bytes.len() > ROM_SIZE {
            return Err(EmulatorError::RomTooLarge { size: bytes.len() });
        }
        let mut rom = Box::new([0u8; ROM_SIZE]);
        rom[..bytes.len()].copy_from_slice(bytes);

        let title = rom[TITLE_BEGIN..=TITLE_END]
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect();
        let kind = rom[CARTRIDGE_TYPE];
        Ok(Self { rom, title, kind })
    }

    /// Creates an empty cartridge, the whole ROM region reads as zero.
    /// Useful to exercise the boot ROM handshake on its own.
    pub fn none() -> Self {
        Self {
            rom: Box::new([0u8; ROM_SIZE]),
            title: String::new(),
            kind: 0,
        }
    }

    /// Reads a byte from the ROM image. The bus only routes addresses
    /// below `ROM_HIGH_BANK_END` here.
    #[inline]
    pub fn read(&self, address: u16) -> u8 {
        self.rom[address as usize]
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl fmt::Display for Cartridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" (type {:#04x})", self.title, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_image_is_zero_padded() {
        let cartridge = Cartridge::from_bytes(&[0x31, 0xFE]).unwrap();
        assert_eq!(cartridge.read(0x0000), 0x31);
        assert_eq!(cartridge.read(0x0001), 0xFE);
        assert_eq!(cartridge.read(0x0002), 0x00);
        assert_eq!(cartridge.read(0x7FFF), 0x00);
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        let bytes = vec![0u8; ROM_SIZE + 1];
        assert_eq!(
            Cartridge::from_bytes(&bytes),
            Err(EmulatorError::RomTooLarge { size: ROM_SIZE + 1 })
        );
    }

    #[test]
    fn test_title_parsing() {
        let mut bytes = vec![0u8; 0x150];
        bytes[TITLE_BEGIN..TITLE_BEGIN + 4].copy_from_slice(b"TEST");
        let cartridge = Cartridge::from_bytes(&bytes).unwrap();
        assert_eq!(cartridge.title(), "TEST");
    }
}
