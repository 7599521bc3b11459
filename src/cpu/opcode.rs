/*!
 * Opcode decoding. Both 256-entry tables are filled once when a `Cpu` is created; a `None` entry
 * is an opcode without a handler.
 *
 * Timings are in M-cycles.
 */

use crate::cpu::instruction::{Flag, InstrArgByte, InstrArgWord, Instruction, Reg, WReg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub instruction: Instruction,
    /// Bytes occupied, including the opcode (and the 0xCB prefix for prefixed opcodes).
    pub length: u8,
    pub cycles: u8,
    /// Cost when a conditional branch is taken. Equal to `cycles` for everything else.
    pub branch_cycles: u8,
}

impl Opcode {
    fn fixed(instruction: Instruction, cycles: u8) -> Self {
        Self::branching(instruction, cycles, cycles)
    }

    fn branching(instruction: Instruction, cycles: u8, branch_cycles: u8) -> Self {
        Self {
            instruction,
            length: 1 + instruction.immediate_len() as u8,
            cycles,
            branch_cycles,
        }
    }

    fn prefixed(instruction: Instruction, cycles: u8) -> Self {
        Self {
            instruction,
            length: 2,
            cycles,
            branch_cycles: cycles,
        }
    }
}

pub struct OpcodeTable {
    regular: [Option<Opcode>; 256],
    prefixed: [Option<Opcode>; 256],
}

impl OpcodeTable {
    pub fn new() -> Self {
        let mut regular = [None; 256];
        let mut prefixed = [None; 256];
        for opcode in 0..=0xffu8 {
            regular[usize::from(opcode)] = decode_regular(opcode);
            prefixed[usize::from(opcode)] = Some(decode_prefixed(opcode));
        }
        Self { regular, prefixed }
    }

    pub fn regular(&self, opcode: u8) -> Option<Opcode> {
        self.regular[usize::from(opcode)]
    }

    /// Looks up the byte following a 0xCB prefix.
    pub fn prefixed(&self, opcode: u8) -> Option<Opcode> {
        self.prefixed[usize::from(opcode)]
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OpcodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let implemented = self.regular.iter().filter(|entry| entry.is_some()).count();
        f.debug_struct("OpcodeTable")
            .field("regular", &implemented)
            .field("prefixed", &self.prefixed.len())
            .finish()
    }
}

/// Register operand encoded in three bits: b, c, d, e, h, l, [hl], a.
fn operand(index: u8) -> InstrArgByte {
    match index & 0b111 {
        0 => InstrArgByte::Register(Reg::B),
        1 => InstrArgByte::Register(Reg::C),
        2 => InstrArgByte::Register(Reg::D),
        3 => InstrArgByte::Register(Reg::E),
        4 => InstrArgByte::Register(Reg::H),
        5 => InstrArgByte::Register(Reg::L),
        6 => InstrArgByte::AddressRegister(WReg::HL),
        _ => InstrArgByte::Register(Reg::A),
    }
}

fn pair_with_sp(index: u8) -> WReg {
    match index & 0b11 {
        0 => WReg::BC,
        1 => WReg::DE,
        2 => WReg::HL,
        _ => WReg::SP,
    }
}

fn pair_with_af(index: u8) -> WReg {
    match index & 0b11 {
        0 => WReg::BC,
        1 => WReg::DE,
        2 => WReg::HL,
        _ => WReg::AF,
    }
}

fn condition(index: u8) -> Flag {
    match index & 0b11 {
        0 => Flag::NZ,
        1 => Flag::Z,
        2 => Flag::NC,
        _ => Flag::C,
    }
}

fn alu(index: u8, source: InstrArgByte) -> Instruction {
    match index & 0b111 {
        0 => Instruction::ADD(source),
        1 => Instruction::ADC(source),
        2 => Instruction::SUB(source),
        3 => Instruction::SBC(source),
        4 => Instruction::AND(source),
        5 => Instruction::XOR(source),
        6 => Instruction::OR(source),
        _ => Instruction::CP(source),
    }
}

/// Decodes an unprefixed opcode. Returns `None` for 0xCB (handled by the caller), for DAA and
/// STOP, and for the opcodes the hardware leaves undefined.
pub fn decode_regular(opcode: u8) -> Option<Opcode> {
    use InstrArgByte::{AddressDirect, AddressRegister, ImmediateByte, Offset, OffsetImmediate};
    use InstrArgWord::{ImmediateWord, WordRegister};

    let a = InstrArgByte::Register(Reg::A);
    let y = (opcode >> 3) & 0b111;
    let z = opcode & 0b111;
    let row = opcode >> 4;

    let decoded = match opcode {
        0x00 => Opcode::fixed(Instruction::NOP, 1),
        0x01 | 0x11 | 0x21 | 0x31 => Opcode::fixed(
            Instruction::LD_16(WordRegister(pair_with_sp(row)), ImmediateWord),
            3,
        ),
        0x02 => Opcode::fixed(Instruction::LD(AddressRegister(WReg::BC), a), 2),
        0x12 => Opcode::fixed(Instruction::LD(AddressRegister(WReg::DE), a), 2),
        0x22 => Opcode::fixed(Instruction::LDI_A_INTO_HL, 2),
        0x32 => Opcode::fixed(Instruction::LDD_A_INTO_HL, 2),
        0x03 | 0x13 | 0x23 | 0x33 => Opcode::fixed(Instruction::INC_WORD(pair_with_sp(row)), 2),
        0x0B | 0x1B | 0x2B | 0x3B => Opcode::fixed(Instruction::DEC_WORD(pair_with_sp(row)), 2),
        0x34 => Opcode::fixed(Instruction::INC(operand(y)), 3),
        0x35 => Opcode::fixed(Instruction::DEC(operand(y)), 3),
        0x36 => Opcode::fixed(Instruction::LD(operand(y), ImmediateByte), 3),
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x3C => {
            Opcode::fixed(Instruction::INC(operand(y)), 1)
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x3D => {
            Opcode::fixed(Instruction::DEC(operand(y)), 1)
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x3E => {
            Opcode::fixed(Instruction::LD(operand(y), ImmediateByte), 2)
        }
        0x07 => Opcode::fixed(Instruction::RLCA, 1),
        0x0F => Opcode::fixed(Instruction::RRCA, 1),
        0x17 => Opcode::fixed(Instruction::RLA, 1),
        0x1F => Opcode::fixed(Instruction::RRA, 1),
        0x08 => Opcode::fixed(
            Instruction::LD_16(InstrArgWord::AddressDirect, WordRegister(WReg::SP)),
            5,
        ),
        0x09 | 0x19 | 0x29 | 0x39 => Opcode::fixed(Instruction::ADD_HL(pair_with_sp(row)), 2),
        0x0A => Opcode::fixed(Instruction::LD(a, AddressRegister(WReg::BC)), 2),
        0x1A => Opcode::fixed(Instruction::LD(a, AddressRegister(WReg::DE)), 2),
        0x2A => Opcode::fixed(Instruction::LDI_A_FROM_HL, 2),
        0x3A => Opcode::fixed(Instruction::LDD_A_FROM_HL, 2),
        0x18 => Opcode::fixed(Instruction::JR, 3),
        0x20 | 0x28 | 0x30 | 0x38 => {
            Opcode::branching(Instruction::JR_CONDITION(condition(y)), 2, 3)
        }
        0x2F => Opcode::fixed(Instruction::CPL, 1),
        0x37 => Opcode::fixed(Instruction::SCF, 1),
        0x3F => Opcode::fixed(Instruction::CCF, 1),

        0x76 => Opcode::fixed(Instruction::HALT, 1),
        0x40..=0x7F => {
            let cycles = if y == 6 || z == 6 { 2 } else { 1 };
            Opcode::fixed(Instruction::LD(operand(y), operand(z)), cycles)
        }
        0x80..=0xBF => {
            let cycles = if z == 6 { 2 } else { 1 };
            Opcode::fixed(alu(y, operand(z)), cycles)
        }

        0xC0 | 0xC8 | 0xD0 | 0xD8 => {
            Opcode::branching(Instruction::RET_CONDITION(condition(y)), 2, 5)
        }
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Opcode::fixed(Instruction::POP(pair_with_af(row)), 3),
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Opcode::fixed(Instruction::PUSH(pair_with_af(row)), 4),
        0xC2 | 0xCA | 0xD2 | 0xDA => {
            Opcode::branching(Instruction::JP_CONDITION(condition(y)), 3, 4)
        }
        0xC3 => Opcode::fixed(Instruction::JP, 4),
        0xC4 | 0xCC | 0xD4 | 0xDC => {
            Opcode::branching(Instruction::CALL_CONDITION(condition(y)), 3, 6)
        }
        0xCD => Opcode::fixed(Instruction::CALL, 6),
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            Opcode::fixed(alu(y, ImmediateByte), 2)
        }
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            Opcode::fixed(Instruction::RST(u16::from(y) * 8), 4)
        }
        0xC9 => Opcode::fixed(Instruction::RET, 4),
        0xD9 => Opcode::fixed(Instruction::RETI, 4),

        0xE0 => Opcode::fixed(Instruction::LD(OffsetImmediate, a), 3),
        0xF0 => Opcode::fixed(Instruction::LD(a, OffsetImmediate), 3),
        0xE2 => Opcode::fixed(Instruction::LD(Offset(Reg::C), a), 2),
        0xF2 => Opcode::fixed(Instruction::LD(a, Offset(Reg::C)), 2),
        0xE8 => Opcode::fixed(Instruction::ADD_SP, 4),
        0xE9 => Opcode::fixed(Instruction::JP_HL, 1),
        0xEA => Opcode::fixed(Instruction::LD(AddressDirect, a), 4),
        0xFA => Opcode::fixed(Instruction::LD(a, AddressDirect), 4),
        0xF3 => Opcode::fixed(Instruction::DI, 1),
        0xFB => Opcode::fixed(Instruction::EI, 1),
        0xF8 => Opcode::fixed(Instruction::LDHL_SP, 3),
        0xF9 => Opcode::fixed(
            Instruction::LD_16(WordRegister(WReg::SP), WordRegister(WReg::HL)),
            2,
        ),

        // STOP, DAA, the CB prefix and the undefined opcodes
        _ => return None,
    };

    Some(decoded)
}

/// Decodes the byte following 0xCB. Every value is defined.
pub fn decode_prefixed(opcode: u8) -> Opcode {
    let y = (opcode >> 3) & 0b111;
    let z = opcode & 0b111;
    let target = operand(z);

    let instruction = match opcode >> 6 {
        0 => match y {
            0 => Instruction::RLC(target),
            1 => Instruction::RRC(target),
            2 => Instruction::RL(target),
            3 => Instruction::RR(target),
            4 => Instruction::SLA(target),
            5 => Instruction::SRA(target),
            6 => Instruction::SWAP(target),
            _ => Instruction::SRL(target),
        },
        1 => Instruction::BIT(y, target),
        2 => Instruction::RES(y, target),
        _ => Instruction::SET(y, target),
    };

    let cycles = match (opcode >> 6, z) {
        (_, 0..=5 | 7) => 2,
        // BIT only reads [hl]
        (1, _) => 3,
        _ => 4,
    };

    Opcode::prefixed(instruction, cycles)
}
