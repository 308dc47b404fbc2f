/*!
Error type shared by the emulator core.

Fatal conditions (unimplemented opcode, halted CPU, address decode failure)
are surfaced to the driver as `Err` values instead of aborting the process.
Recoverable conditions (writes to ROM, reads of write-only registers) never
reach this type; they are logged where they happen and execution continues.
*/

use std::fmt;

#[derive(Debug)]
pub enum EmuError {
    /// The CPU fetched an opcode with no entry in the instruction table.
    UnimplementedOpcode { opcode: u8, pc: u16 },
    /// `step` was called after a fatal fault halted the CPU.
    CpuHalted { pc: u16 },
    /// A CPU address matched no device range.
    AddressDecode { addr: u16 },
    /// The iNES image is malformed or truncated.
    InvalidRom(String),
    UnsupportedMapper(u16),
    Io(std::io::Error),
    #[cfg(feature = "screenshot")]
    Image(image::ImageError),
}

impl fmt::Display for EmuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmuError::UnimplementedOpcode { opcode, pc } => {
                write!(f, "unimplemented opcode ${opcode:02X} at ${pc:04X}")
            }
            EmuError::CpuHalted { pc } => write!(f, "CPU halted at ${pc:04X}"),
            EmuError::AddressDecode { addr } => {
                write!(f, "address ${addr:04X} does not decode to any device")
            }
            EmuError::InvalidRom(msg) => write!(f, "invalid iNES image: {msg}"),
            EmuError::UnsupportedMapper(id) => write!(f, "unsupported mapper id: {id}"),
            EmuError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "screenshot")]
            EmuError::Image(e) => write!(f, "image encoding error: {e}"),
        }
    }
}

impl std::error::Error for EmuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmuError::Io(e) => Some(e),
            #[cfg(feature = "screenshot")]
            EmuError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EmuError {
    fn from(e: std::io::Error) -> Self {
        EmuError::Io(e)
    }
}

#[cfg(feature = "screenshot")]
impl From<image::ImageError> for EmuError {
    fn from(e: image::ImageError) -> Self {
        EmuError::Image(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reports_opcode_and_pc() {
        let e = EmuError::UnimplementedOpcode {
            opcode: 0x02,
            pc: 0xC123,
        };
        assert_eq!(e.to_string(), "unimplemented opcode $02 at $C123");
    }

    #[test]
    fn io_error_is_exposed_as_source() {
        let e: EmuError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(std::error::Error::source(&e).is_some());
    }
}
