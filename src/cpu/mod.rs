mod alu;
#[allow(clippy::module_inception)]
mod cpu;
mod instruction;
mod opcode;
mod register;

pub use cpu::{Cpu, CpuDebugInfo};
pub use instruction::{
    relative_target, BranchStatus, Flag, InstrArgByte, InstrArgWord, Instruction, Reg, WReg,
};
pub use opcode::{decode_prefixed, decode_regular, Opcode, OpcodeTable};
pub use register::{FlagRegister, Registers};
