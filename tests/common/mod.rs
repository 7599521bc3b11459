#![allow(dead_code)]

use gameboy_cpu::cpu::{Cpu, Reg};
use gameboy_cpu::{Address, Addressable, Cycles, MemoryBus, Steppable};

/// Where test programs are placed. Far from the stack tests, which sit near 0x0000 and 0xffff.
pub const PROGRAM_START: u16 = 0x0100;

pub fn cpu_with_program(program: &[u8]) -> Cpu {
    let mut cpu = Cpu::new();
    cpu.load(PROGRAM_START, program).unwrap();
    cpu.pc = PROGRAM_START;
    cpu.sp = 0xfffe;
    cpu
}

/// Runs one instruction at the cpu's pc with a budget of 100 and returns the cycles it cost.
pub fn step_once<M: Addressable>(cpu: &mut Cpu<M>) -> Cycles {
    let pc = cpu.pc;
    let (_, remaining) = cpu.step(pc, 100).unwrap();
    100 - remaining
}

/// Encoding of a register in the three-bit operand fields.
pub fn reg_index(reg: Reg) -> u8 {
    match reg {
        Reg::B => 0,
        Reg::C => 1,
        Reg::D => 2,
        Reg::E => 3,
        Reg::H => 4,
        Reg::L => 5,
        Reg::A => 7,
    }
}

/// A bus collaborator that records every byte access before forwarding it.
#[derive(Default)]
pub struct RecordingBus {
    pub bus: MemoryBus,
    pub reads: Vec<Address>,
    pub writes: Vec<(Address, u8)>,
}

impl Addressable for RecordingBus {
    fn read_u8(&mut self, address: Address) -> u8 {
        self.reads.push(address);
        self.bus.read_u8(address)
    }

    fn write_u8(&mut self, address: Address, value: u8) {
        self.writes.push((address, value));
        self.bus.write_u8(address, value)
    }
}
