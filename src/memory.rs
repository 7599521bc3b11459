/*!
 * Flat backing store for the whole 16-bit address space. Banking and I/O registers live in
 * collaborators that wrap this bus.
 */

use crate::component::{Address, Addressable};

pub struct MemoryBus {
    pub data: [u8; 0x10000],
}

impl MemoryBus {
    pub fn new() -> Self {
        Self { data: [0; 0x10000] }
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBus")
            .field("len", &self.data.len())
            .finish()
    }
}

impl Addressable for MemoryBus {
    fn read_u8(&mut self, address: Address) -> u8 {
        self.data[usize::from(address)]
    }

    fn write_u8(&mut self, address: Address, value: u8) {
        self.data[usize::from(address)] = value;
    }
}
