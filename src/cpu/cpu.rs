use crate::component::{Address, Addressable, Cycles, Steppable};
use crate::cpu::{instruction::*, opcode::OpcodeTable, register::*};
use crate::error::{Error, Result};
use crate::memory::MemoryBus;
use log::{debug, trace, warn};

/// Cost of entering an interrupt handler.
const INTERRUPT_CYCLES: Cycles = 5;

pub struct Cpu<M: Addressable = MemoryBus> {
    pub registers: Registers,
    pub sp: u16,
    /// Address of the next instruction. Kept in sync with the pc returned by `step`.
    pub pc: u16,
    pub interrupt_enabled: bool,
    pub halted: bool,
    memory: M,
    opcodes: OpcodeTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuDebugInfo {
    pub pc: u16,
    pub opcode: u8, // opcode at pc
    pub sp: u16,
    pub register_a: u8,
    pub flags: FlagRegister,
    pub register_bc: u16,
    pub register_de: u16,
    pub register_hl: u16,
    pub interrupt_enabled: bool,
    pub halted: bool,
}

impl std::fmt::Display for CpuDebugInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PC: {:#06x} ({:#04x}) SP: {:#06x} A: {:#04x} Z: {} C: {} BC: {:#06x} DE: {:#06x} HL: {:#06x} IME: {} HALT: {}",
            self.pc,
            self.opcode,
            self.sp,
            self.register_a,
            u8::from(self.flags.zero),
            u8::from(self.flags.carry),
            self.register_bc,
            self.register_de,
            self.register_hl,
            self.interrupt_enabled,
            self.halted,
        )
    }
}

impl Cpu<MemoryBus> {
    pub fn new() -> Self {
        Self::with_memory(MemoryBus::new())
    }
}

impl Default for Cpu<MemoryBus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Addressable> Cpu<M> {
    pub fn with_memory(memory: M) -> Self {
        Self {
            registers: Registers::default(),
            sp: 0,
            pc: 0,
            interrupt_enabled: false,
            halted: false,
            memory,
            opcodes: OpcodeTable::new(),
        }
    }

    /// Clears every register and flag. Memory is left alone.
    pub fn reset(&mut self) {
        self.registers = Registers::default();
        self.sp = 0;
        self.pc = 0;
        self.interrupt_enabled = false;
        self.halted = false;
    }

    /// Initialize the CPU's registers to post-bootrom values
    pub fn emulate_bootrom(&mut self) {
        self.reset();
        self.pc = 0x100;
        self.registers.a = 0x01;
        self.registers.f = FlagRegister {
            zero: true,
            carry: true,
        };
        self.set_word_register(WReg::BC, 0x0013);
        self.set_word_register(WReg::DE, 0x00D8);
        self.set_word_register(WReg::HL, 0x014D);
        self.sp = 0xFFFE;
    }

    /// Copies `program` into memory starting at `address`.
    pub fn load(&mut self, address: Address, program: &[u8]) -> Result<()> {
        if usize::from(address) + program.len() > 0x10000 {
            return Err(Error::ProgramTooLarge {
                address,
                len: program.len(),
            });
        }
        for (offset, byte) in program.iter().enumerate() {
            self.memory
                .write_u8(address.wrapping_add(offset as u16), *byte);
        }
        debug!("Loaded {} bytes at {:#06x}", program.len(), address);
        Ok(())
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn into_memory(self) -> M {
        self.memory
    }

    pub fn read_u8(&mut self, address: Address) -> u8 {
        self.memory.read_u8(address)
    }

    pub fn write_u8(&mut self, address: Address, value: u8) {
        self.memory.write_u8(address, value)
    }

    pub fn read_u16(&mut self, address: Address) -> u16 {
        self.memory.read_u16(address)
    }

    pub fn write_u16(&mut self, address: Address, value: u16) {
        self.memory.write_u16(address, value)
    }

    pub fn set_register(&mut self, reg: Reg, value: u8) {
        reg.set(&mut self.registers, value)
    }

    pub fn get_register(&self, reg: Reg) -> u8 {
        reg.get(&self.registers)
    }

    pub fn set_word_register(&mut self, word_reg: WReg, value: u16) {
        word_reg.set(self, value)
    }

    pub fn get_word_register(&self, word_reg: WReg) -> u16 {
        word_reg.get(self)
    }

    /// Moves SP down two bytes (wrapping) and stores `value` there, low byte first.
    pub fn push_word(&mut self, value: u16) {
        self.sp = self.sp.wrapping_sub(2);
        self.memory.write_u16(self.sp, value);
    }

    pub fn pop_word(&mut self) -> u16 {
        let value = self.memory.read_u16(self.sp);
        self.sp = self.sp.wrapping_add(2);
        value
    }

    /// Enters the handler at `vector` if interrupts are enabled. Must only be called between
    /// instructions. A pending interrupt always ends a halt, even when it is not serviced.
    pub fn service_interrupt(&mut self, pc: u16, cycles: Cycles, vector: u16) -> (u16, Cycles) {
        if self.halted {
            debug!("Unhalting");
            self.halted = false;
        }
        if !self.interrupt_enabled {
            debug!("ignoring interrupt {:#06x}", vector);
            return (pc, cycles);
        }

        debug!("Handling interrupt {:#06x} from {:#06x}", vector, pc);
        self.interrupt_enabled = false;
        self.push_word(pc);
        self.pc = vector;
        (vector, cycles - INTERRUPT_CYCLES)
    }

    pub fn debug_info(&mut self) -> CpuDebugInfo {
        CpuDebugInfo {
            pc: self.pc,
            opcode: self.memory.read_u8(self.pc),
            sp: self.sp,
            register_a: self.registers.a,
            flags: self.registers.f,
            register_bc: self.registers.get_bc(),
            register_de: self.registers.get_de(),
            register_hl: self.registers.get_hl(),
            interrupt_enabled: self.interrupt_enabled,
            halted: self.halted,
        }
    }
}

impl<M: Addressable> Steppable for Cpu<M> {
    fn step(&mut self, pc: u16, cycles: Cycles) -> Result<(u16, Cycles)> {
        if self.halted {
            self.pc = pc;
            return Ok((pc, cycles - 1));
        }

        let opcode = self.memory.read_u8(pc);
        let entry = if opcode == 0xCB {
            let opcode = self.memory.read_u8(pc.wrapping_add(1));
            trace!("CB opcode {:#04x} at pc {:#06x}", opcode, pc);
            self.opcodes.prefixed(opcode).ok_or_else(|| Error::unimplemented(opcode, pc, true))
        } else {
            trace!("opcode {:#04x} at pc {:#06x}", opcode, pc);
            self.opcodes.regular(opcode).ok_or_else(|| Error::unimplemented(opcode, pc, false))
        };
        let entry = entry.map_err(|err| {
            warn!("{}", err);
            err
        })?;

        let (next_pc, branch_status) =
            self.execute_instruction(entry.instruction, pc, entry.length.into());
        let elapsed = match branch_status {
            BranchStatus::NoBranch => entry.cycles,
            BranchStatus::Branch => entry.branch_cycles,
        };
        self.pc = next_pc;

        trace!(
            "{} AF: {:#06x} BC: {:#06x} DE: {:#06x} HL: {:#06x} SP: {:#06x} PC: {:#06x}",
            entry.instruction.as_ref(),
            self.registers.get_af(),
            self.registers.get_bc(),
            self.registers.get_de(),
            self.registers.get_hl(),
            self.sp,
            next_pc
        );

        Ok((next_pc, cycles - Cycles::from(elapsed)))
    }
}
