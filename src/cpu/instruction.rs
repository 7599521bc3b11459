use crate::component::Addressable;
use crate::cpu::alu::{add_with_carry, sub_with_borrow};
use crate::cpu::register::{ripple_decrement, ripple_increment, Registers};
use crate::cpu::Cpu;
use crate::utils::BitField;
use log::debug;
use strum_macros::{AsRefStr, Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum Reg {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg {
    pub(crate) fn get(&self, registers: &Registers) -> u8 {
        match self {
            Self::A => registers.a,
            Self::B => registers.b,
            Self::C => registers.c,
            Self::D => registers.d,
            Self::E => registers.e,
            Self::H => registers.h,
            Self::L => registers.l,
        }
    }

    pub(crate) fn set(&self, registers: &mut Registers, value: u8) {
        match self {
            Self::A => registers.a = value,
            Self::B => registers.b = value,
            Self::C => registers.c = value,
            Self::D => registers.d = value,
            Self::E => registers.e = value,
            Self::H => registers.h = value,
            Self::L => registers.l = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum WReg {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl WReg {
    pub(crate) fn get<M: Addressable>(&self, cpu: &Cpu<M>) -> u16 {
        match self {
            Self::AF => cpu.registers.get_af(),
            Self::BC => cpu.registers.get_bc(),
            Self::DE => cpu.registers.get_de(),
            Self::HL => cpu.registers.get_hl(),
            Self::SP => cpu.sp,
            Self::PC => cpu.pc,
        }
    }

    pub(crate) fn set<M: Addressable>(&self, cpu: &mut Cpu<M>, value: u16) {
        match self {
            Self::AF => cpu.registers.set_af(value),
            Self::BC => cpu.registers.set_bc(value),
            Self::DE => cpu.registers.set_de(value),
            Self::HL => cpu.registers.set_hl(value),
            Self::SP => cpu.sp = value,
            Self::PC => cpu.pc = value,
        }
    }

    /// Split pairs ripple through their two halves; SP is a plain wrapping word.
    fn increment<M: Addressable>(&self, cpu: &mut Cpu<M>) {
        match self {
            Self::BC => ripple_increment(&mut cpu.registers.b, &mut cpu.registers.c),
            Self::DE => ripple_increment(&mut cpu.registers.d, &mut cpu.registers.e),
            Self::HL => ripple_increment(&mut cpu.registers.h, &mut cpu.registers.l),
            _ => {
                let value = self.get(cpu).wrapping_add(1);
                self.set(cpu, value);
            }
        }
    }

    fn decrement<M: Addressable>(&self, cpu: &mut Cpu<M>) {
        match self {
            Self::BC => ripple_decrement(&mut cpu.registers.b, &mut cpu.registers.c),
            Self::DE => ripple_decrement(&mut cpu.registers.d, &mut cpu.registers.e),
            Self::HL => ripple_decrement(&mut cpu.registers.h, &mut cpu.registers.l),
            _ => {
                let value = self.get(cpu).wrapping_sub(1);
                self.set(cpu, value);
            }
        }
    }
}

/// Byte operand of an instruction. Immediate forms are read from the bytes following the
/// opcode, so the same template serves every execution of that opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrArgByte {
    ImmediateByte,
    /// `[a16]`
    AddressDirect,
    AddressRegister(WReg),
    Register(Reg),
    /// `[0xff00 + reg]`
    Offset(Reg),
    /// `[0xff00 + a8]`
    OffsetImmediate,
}

impl InstrArgByte {
    fn immediate_len(&self) -> u16 {
        match self {
            Self::ImmediateByte | Self::OffsetImmediate => 1,
            Self::AddressDirect => 2,
            _ => 0,
        }
    }

    fn address<M: Addressable>(&self, cpu: &mut Cpu<M>, pc: u16) -> Option<u16> {
        match self {
            Self::ImmediateByte | Self::Register(_) => None,
            Self::AddressDirect => Some(cpu.read_u16(pc.wrapping_add(1))),
            Self::AddressRegister(wreg) => Some(wreg.get(cpu)),
            Self::Offset(reg) => Some(0xff00 | u16::from(reg.get(&cpu.registers))),
            Self::OffsetImmediate => Some(0xff00 | u16::from(cpu.read_u8(pc.wrapping_add(1)))),
        }
    }

    fn get_u8<M: Addressable>(&self, cpu: &mut Cpu<M>, pc: u16) -> u8 {
        match self {
            Self::ImmediateByte => cpu.read_u8(pc.wrapping_add(1)),
            Self::Register(reg) => reg.get(&cpu.registers),
            _ => match self.address(cpu, pc) {
                Some(address) => cpu.read_u8(address),
                None => unreachable!(),
            },
        }
    }

    fn set_u8<M: Addressable>(&self, cpu: &mut Cpu<M>, pc: u16, value: u8) {
        match self {
            Self::ImmediateByte => panic!("immediate operand is not writable"),
            Self::Register(reg) => reg.set(&mut cpu.registers, value),
            _ => {
                if let Some(address) = self.address(cpu, pc) {
                    cpu.write_u8(address, value)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrArgWord {
    ImmediateWord,
    /// `[a16]`
    AddressDirect,
    WordRegister(WReg),
}

impl InstrArgWord {
    fn immediate_len(&self) -> u16 {
        match self {
            Self::ImmediateWord | Self::AddressDirect => 2,
            Self::WordRegister(_) => 0,
        }
    }

    fn get_u16<M: Addressable>(&self, cpu: &mut Cpu<M>, pc: u16) -> u16 {
        match self {
            Self::ImmediateWord => cpu.read_u16(pc.wrapping_add(1)),
            Self::AddressDirect => {
                let address = cpu.read_u16(pc.wrapping_add(1));
                cpu.read_u16(address)
            }
            Self::WordRegister(wreg) => wreg.get(cpu),
        }
    }

    fn set_u16<M: Addressable>(&self, cpu: &mut Cpu<M>, pc: u16, value: u16) {
        match self {
            Self::ImmediateWord => panic!("immediate operand is not writable"),
            Self::AddressDirect => {
                let address = cpu.read_u16(pc.wrapping_add(1));
                cpu.write_u16(address, value);
            }
            Self::WordRegister(wreg) => wreg.set(cpu, value),
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Instruction {
    NOP,

    /* LD nn,n */
    LD(InstrArgByte, InstrArgByte),
    LD_16(InstrArgWord, InstrArgWord),

    /* LD HL,SP+e8 */
    LDHL_SP,

    /* LDD */
    LDD_A_FROM_HL,
    LDD_A_INTO_HL,

    /* LDI */
    LDI_A_FROM_HL,
    LDI_A_INTO_HL,

    PUSH(WReg),
    POP(WReg),

    /* ADD */
    ADD(InstrArgByte),
    ADD_HL(WReg),
    ADD_SP,

    ADC(InstrArgByte),
    SUB(InstrArgByte),
    SBC(InstrArgByte),

    AND(InstrArgByte),
    OR(InstrArgByte),
    XOR(InstrArgByte),
    CP(InstrArgByte),

    INC(InstrArgByte),
    INC_WORD(WReg),

    DEC(InstrArgByte),
    DEC_WORD(WReg),

    SWAP(InstrArgByte),

    CPL,

    CCF,
    SCF,

    HALT,

    DI,
    EI,

    RLC(InstrArgByte),
    RLCA,
    RL(InstrArgByte),
    RLA,
    RRC(InstrArgByte),
    RRCA,
    RR(InstrArgByte),
    RRA,

    SLA(InstrArgByte),
    SRA(InstrArgByte),
    SRL(InstrArgByte),

    BIT(Bit, InstrArgByte),
    SET(Bit, InstrArgByte),
    RES(Bit, InstrArgByte),

    JP,
    JP_CONDITION(Flag),
    JP_HL,

    JR,
    JR_CONDITION(Flag),

    CALL,
    CALL_CONDITION(Flag),

    RST(u16),

    RET,
    RET_CONDITION(Flag),
    RETI,
}

type Bit = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Flag {
    NZ,
    Z,
    NC,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchStatus {
    Branch,
    NoBranch,
}

impl Instruction {
    /// Number of operand bytes following the opcode byte.
    pub fn immediate_len(&self) -> u16 {
        match self {
            Self::LD(target, source) => target.immediate_len() + source.immediate_len(),
            Self::LD_16(target, source) => target.immediate_len() + source.immediate_len(),
            Self::LDHL_SP | Self::ADD_SP | Self::JR | Self::JR_CONDITION(_) => 1,
            Self::ADD(arg)
            | Self::ADC(arg)
            | Self::SUB(arg)
            | Self::SBC(arg)
            | Self::AND(arg)
            | Self::OR(arg)
            | Self::XOR(arg)
            | Self::CP(arg) => arg.immediate_len(),
            Self::JP | Self::JP_CONDITION(_) | Self::CALL | Self::CALL_CONDITION(_) => 2,
            _ => 0,
        }
    }
}

/// Target of a relative jump at `pc` with displacement byte `offset`. Only bytes above 128 step
/// backwards; 128 itself lands 130 bytes ahead.
pub fn relative_target(pc: u16, offset: u8) -> u16 {
    if offset > 128 {
        pc.wrapping_sub(254).wrapping_add(offset.into())
    } else {
        pc.wrapping_add(offset.into()).wrapping_add(2)
    }
}

impl<M: Addressable> Cpu<M> {
    pub(crate) fn test_flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Z => self.registers.f.zero,
            Flag::NZ => !self.registers.f.zero,
            Flag::C => self.registers.f.carry,
            Flag::NC => !self.registers.f.carry,
        }
    }

    /// SP plus the signed byte at `pc + 1`, with carry out of the low byte.
    fn sp_plus_immediate(&mut self, pc: u16) -> (u16, bool) {
        let offset = self.read_u8(pc.wrapping_add(1));
        let sum = self.sp.wrapping_add_signed(i16::from(offset as i8));
        let (_, carry) = add_with_carry(self.sp.to_le_bytes()[0], offset, false);
        (sum, carry)
    }

    /// Executes `instruction` located at `pc` and occupying `length` bytes. Returns the address
    /// of the next instruction and whether a conditional branch was taken.
    pub fn execute_instruction(
        &mut self,
        instruction: Instruction,
        pc: u16,
        length: u16,
    ) -> (u16, BranchStatus) {
        let mut branch_status = BranchStatus::NoBranch;
        let mut next_pc = pc.wrapping_add(length);
        match instruction {
            Instruction::NOP => {}
            Instruction::LD(target, source) => {
                let value = source.get_u8(self, pc);
                target.set_u8(self, pc, value);
            }
            Instruction::LD_16(target, source) => {
                let value = source.get_u16(self, pc);
                target.set_u16(self, pc, value);
            }
            Instruction::LDHL_SP => {
                let (sum, carry) = self.sp_plus_immediate(pc);
                self.registers.set_hl(sum);

                self.registers.f.zero = false;
                self.registers.f.carry = carry;
            }
            Instruction::LDD_A_FROM_HL => {
                let value = InstrArgByte::AddressRegister(WReg::HL).get_u8(self, pc);
                self.registers.a = value;
                WReg::HL.decrement(self);
            }
            Instruction::LDD_A_INTO_HL => {
                let value = self.registers.a;
                InstrArgByte::AddressRegister(WReg::HL).set_u8(self, pc, value);
                WReg::HL.decrement(self);
            }
            Instruction::LDI_A_FROM_HL => {
                let value = InstrArgByte::AddressRegister(WReg::HL).get_u8(self, pc);
                self.registers.a = value;
                WReg::HL.increment(self);
            }
            Instruction::LDI_A_INTO_HL => {
                let value = self.registers.a;
                InstrArgByte::AddressRegister(WReg::HL).set_u8(self, pc, value);
                WReg::HL.increment(self);
            }
            Instruction::PUSH(pair) => {
                let value = pair.get(self);
                self.push_word(value);
            }
            Instruction::POP(pair) => {
                let value = self.pop_word();
                pair.set(self, value);
            }

            /* Arithmetic */
            Instruction::ADD(source) => {
                let value = source.get_u8(self, pc);
                let (sum, carry) = add_with_carry(self.registers.a, value, false);

                self.registers.f.zero = sum == 0;
                self.registers.f.carry = carry;
                self.registers.a = sum;
            }
            Instruction::ADC(source) => {
                let value = source.get_u8(self, pc);
                let (sum, carry) = add_with_carry(self.registers.a, value, self.registers.f.carry);

                self.registers.f.zero = sum == 0;
                self.registers.f.carry = carry;
                self.registers.a = sum;
            }
            Instruction::SUB(source) => {
                let value = source.get_u8(self, pc);
                let (diff, borrow) = sub_with_borrow(self.registers.a, value, false);

                self.registers.f.zero = diff == 0;
                self.registers.f.carry = borrow;
                self.registers.a = diff;
            }
            Instruction::SBC(source) => {
                let value = source.get_u8(self, pc);
                let (diff, borrow) =
                    sub_with_borrow(self.registers.a, value, self.registers.f.carry);

                self.registers.f.zero = diff == 0;
                self.registers.f.carry = borrow;
                self.registers.a = diff;
            }
            Instruction::ADD_HL(pair) => {
                let value = pair.get(self);
                let (sum, carry) = add_with_carry(self.registers.get_hl(), value, false);

                // Zero is left as it was.
                self.registers.f.carry = carry;
                self.registers.set_hl(sum);
            }
            Instruction::ADD_SP => {
                let (sum, carry) = self.sp_plus_immediate(pc);
                self.sp = sum;

                self.registers.f.zero = false;
                self.registers.f.carry = carry;
            }
            Instruction::AND(source) => {
                let value = source.get_u8(self, pc);
                let result = self.registers.a & value;
                self.registers.a = result;

                self.registers.f.zero = result == 0;
                self.registers.f.carry = false;
            }
            Instruction::OR(source) => {
                let value = source.get_u8(self, pc);
                let result = self.registers.a | value;
                self.registers.a = result;

                self.registers.f.zero = result == 0;
                self.registers.f.carry = false;
            }
            Instruction::XOR(source) => {
                let value = source.get_u8(self, pc);
                let result = self.registers.a ^ value;
                self.registers.a = result;

                self.registers.f.zero = result == 0;
                self.registers.f.carry = false;
            }
            Instruction::CP(source) => {
                let value = source.get_u8(self, pc);
                let (diff, borrow) = sub_with_borrow(self.registers.a, value, false);

                self.registers.f.zero = diff == 0;
                self.registers.f.carry = borrow;
            }
            Instruction::INC(target) => {
                let incremented_value = target.get_u8(self, pc).wrapping_add(1);
                target.set_u8(self, pc, incremented_value);

                self.registers.f.zero = incremented_value == 0;
            }
            Instruction::INC_WORD(pair) => pair.increment(self),
            Instruction::DEC(target) => {
                let decremented_value = target.get_u8(self, pc).wrapping_sub(1);
                target.set_u8(self, pc, decremented_value);

                self.registers.f.zero = decremented_value == 0;
            }
            Instruction::DEC_WORD(pair) => pair.decrement(self),

            /* Miscellaneous */
            Instruction::SWAP(target) => {
                let swapped_value = target.get_u8(self, pc).rotate_left(4);
                target.set_u8(self, pc, swapped_value);

                self.registers.f.zero = swapped_value == 0;
                self.registers.f.carry = false;
            }
            Instruction::CPL => self.registers.a = !self.registers.a,
            Instruction::CCF => self.registers.f.carry = !self.registers.f.carry,
            Instruction::SCF => self.registers.f.carry = true,
            Instruction::HALT => {
                debug!("Halting at {:#06x}", pc);
                self.halted = true;
            }
            Instruction::DI => self.interrupt_enabled = false,
            Instruction::EI => self.interrupt_enabled = true,

            /* Rotates & shifts */
            Instruction::RLC(target) => {
                let value = target.get_u8(self, pc);
                let result = value.rotate_left(1);
                target.set_u8(self, pc, result);

                self.registers.f.zero = result == 0;
                self.registers.f.carry = value >> 7 == 1;
            }
            Instruction::RLCA => {
                self.execute_instruction(
                    Instruction::RLC(InstrArgByte::Register(Reg::A)),
                    pc,
                    length,
                );
                self.registers.f.zero = false;
            }
            Instruction::RL(target) => {
                let value = target.get_u8(self, pc);
                let carry: u8 = self.registers.f.carry.into();

                let result = (value << 1) | carry;
                target.set_u8(self, pc, result);

                self.registers.f.zero = result == 0;
                self.registers.f.carry = value >> 7 == 1;
            }
            Instruction::RLA => {
                self.execute_instruction(Instruction::RL(InstrArgByte::Register(Reg::A)), pc, length);
                self.registers.f.zero = false;
            }
            Instruction::RRC(target) => {
                let value = target.get_u8(self, pc);
                let result = value.rotate_right(1);
                target.set_u8(self, pc, result);

                self.registers.f.zero = result == 0;
                self.registers.f.carry = value & 0b1 == 1;
            }
            Instruction::RRCA => {
                self.execute_instruction(
                    Instruction::RRC(InstrArgByte::Register(Reg::A)),
                    pc,
                    length,
                );
                self.registers.f.zero = false;
            }
            Instruction::RR(target) => {
                let value = target.get_u8(self, pc);
                let carry: u8 = self.registers.f.carry.into();

                let result = (value >> 1) | (carry << 7);
                target.set_u8(self, pc, result);

                self.registers.f.zero = result == 0;
                self.registers.f.carry = value & 0b1 == 1;
            }
            Instruction::RRA => {
                self.execute_instruction(Instruction::RR(InstrArgByte::Register(Reg::A)), pc, length);
                self.registers.f.zero = false;
            }
            Instruction::SLA(target) => {
                let value = target.get_u8(self, pc);
                let result = value << 1;
                target.set_u8(self, pc, result);

                self.registers.f.zero = result == 0;
                self.registers.f.carry = value >> 7 == 1;
            }
            Instruction::SRA(target) => {
                let value = target.get_u8(self, pc);
                let result = (value >> 1) | (value & 0x80);
                target.set_u8(self, pc, result);

                self.registers.f.zero = result == 0;
                self.registers.f.carry = value & 0b1 == 1;
            }
            Instruction::SRL(target) => {
                let value = target.get_u8(self, pc);
                let result = value >> 1;
                target.set_u8(self, pc, result);

                self.registers.f.zero = result == 0;
                self.registers.f.carry = value & 0b1 == 1;
            }

            /* Bit opcodes */
            Instruction::BIT(bit, target) => {
                let value = BitField(target.get_u8(self, pc));
                self.registers.f.zero = !value.get_bit(bit);
            }
            Instruction::SET(bit, target) => {
                let mut value = BitField(target.get_u8(self, pc));
                value.set_bit(bit, true);
                target.set_u8(self, pc, value.0);
            }
            Instruction::RES(bit, target) => {
                let mut value = BitField(target.get_u8(self, pc));
                value.set_bit(bit, false);
                target.set_u8(self, pc, value.0);
            }

            /* Jumps */
            Instruction::JP => {
                next_pc = self.read_u16(pc.wrapping_add(1));
            }
            Instruction::JP_CONDITION(flag) => {
                if self.test_flag(flag) {
                    (next_pc, _) = self.execute_instruction(Instruction::JP, pc, length);
                    branch_status = BranchStatus::Branch;
                }
            }
            Instruction::JP_HL => {
                next_pc = self.registers.get_hl();
            }
            Instruction::JR => {
                let offset = self.read_u8(pc.wrapping_add(1));
                next_pc = relative_target(pc, offset);
            }
            Instruction::JR_CONDITION(flag) => {
                if self.test_flag(flag) {
                    (next_pc, _) = self.execute_instruction(Instruction::JR, pc, length);
                    branch_status = BranchStatus::Branch;
                }
            }

            /* Calls */
            Instruction::CALL => {
                let target = self.read_u16(pc.wrapping_add(1));
                // Save address of next instruction to stack
                self.push_word(next_pc);
                next_pc = target;
            }
            Instruction::CALL_CONDITION(flag) => {
                if self.test_flag(flag) {
                    (next_pc, _) = self.execute_instruction(Instruction::CALL, pc, length);
                    branch_status = BranchStatus::Branch;
                }
            }

            /* Restarts */
            Instruction::RST(address) => {
                self.push_word(next_pc);
                next_pc = address;
            }

            /* Returns */
            Instruction::RET => {
                next_pc = self.pop_word();
            }
            Instruction::RET_CONDITION(flag) => {
                if self.test_flag(flag) {
                    (next_pc, _) = self.execute_instruction(Instruction::RET, pc, length);
                    branch_status = BranchStatus::Branch;
                }
            }
            Instruction::RETI => {
                self.interrupt_enabled = true;
                next_pc = self.pop_word();
            }
        }

        (next_pc, branch_status)
    }
}
