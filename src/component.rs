use crate::error::Result;

pub type Address = u16;

/// Remaining cycle budget. Signed so a run can report how far the last instruction overran.
pub type Cycles = i32;

/// A byte-addressable device. Memory-mapped I/O is added by wrapping an implementor and
/// intercepting the two byte primitives; the word accessors are derived from them.
pub trait Addressable {
    fn read_u8(&mut self, address: Address) -> u8;

    fn write_u8(&mut self, address: Address, data: u8);

    /// Little-endian: low byte at `address`, high byte at `address + 1` (wrapping).
    fn read_u16(&mut self, address: Address) -> u16 {
        let low = self.read_u8(address);
        let high = self.read_u8(address.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    fn write_u16(&mut self, address: Address, data: u16) {
        let bytes = data.to_le_bytes();
        self.write_u8(address, bytes[0]);
        self.write_u8(address.wrapping_add(1), bytes[1]);
    }
}

pub trait Steppable {
    /// Executes exactly one instruction starting at `pc` and returns the next pc together with
    /// the budget left after paying for it.
    fn step(&mut self, pc: u16, cycles: Cycles) -> Result<(u16, Cycles)>;

    /// Steps until the budget is used up. Instructions are indivisible, so the returned budget
    /// may be negative.
    fn run(&mut self, pc: u16, budget: Cycles) -> Result<(u16, Cycles)> {
        let (mut pc, mut cycles) = (pc, budget);
        while cycles > 0 {
            (pc, cycles) = self.step(pc, cycles)?;
        }
        Ok((pc, cycles))
    }
}
