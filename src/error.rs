use std::error::Error as StdError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No handler is registered for this opcode. `prefixed` is set when the miss happened in the
    /// CB table, in which case `opcode` is the byte following 0xCB.
    UnimplementedOpcode {
        opcode: u8,
        pc: u16,
        prefixed: bool,
    },
    ProgramTooLarge {
        address: u16,
        len: usize,
    },
    Message(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::UnimplementedOpcode {
                opcode,
                pc,
                prefixed,
            } => {
                if *prefixed {
                    write!(f, "Unimplemented opcode 0xcb {:#04x} at {:#06x}", opcode, pc)
                } else {
                    write!(f, "Unimplemented opcode {:#04x} at {:#06x}", opcode, pc)
                }
            }
            Error::ProgramTooLarge { address, len } => write!(
                f,
                "Program of {} bytes does not fit at {:#06x}",
                len, address
            ),
            Error::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unimplemented(opcode: u8, pc: u16, prefixed: bool) -> Self {
        Error::UnimplementedOpcode {
            opcode,
            pc,
            prefixed,
        }
    }

    pub fn from_message(msg: String) -> Self {
        Error::Message(msg)
    }
}

impl From<String> for Error {
    fn from(str: String) -> Self {
        Error::from_message(str)
    }
}
