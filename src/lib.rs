//! Instruction-set core of the Game Boy CPU: registers, a flat memory bus and a table-driven
//! interpreter that runs against a cycle budget.

mod component;
mod error;

pub mod cpu;
mod memory;
mod utils;

pub use component::{Address, Addressable, Cycles, Steppable};
pub use cpu::Cpu;
pub use error::{Error, Result};
pub use memory::MemoryBus;
