use thiserror::Error;

/// Fatal conditions reported by the frame driver. The memory bus itself
/// never fails; unmapped accesses read back a constant and discard writes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmulatorError {
    /// The primary dispatch table has no handler for this opcode.
    #[error("unknown opcode {opcode:#04x} at {pc:#06x}")]
    UnknownOpcode { opcode: u8, pc: u16 },

    /// STOP was executed. The stopped state is terminal in this core.
    #[error("CPU stopped at {pc:#06x}")]
    CpuStopped { pc: u16 },

    /// The cartridge image does not fit the unbanked 32 KiB ROM region.
    #[error("ROM image of {size} bytes exceeds the 32 KiB address space")]
    RomTooLarge { size: usize },
}

pub type EmulatorResult<T> = Result<T, EmulatorError>;
