use crate::utils::BitField;

/// The seven 8-bit general registers plus the flags. Does not include the 16-bit SP and PC
/// registers. Pairs (BC, DE, HL) are never stored as words; they are assembled from and split
/// back into their two halves.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: FlagRegister,
    pub h: u8,
    pub l: u8,
}

/// Macro to generate a function that gets the value in a joint register.
macro_rules! get_joint_register {
    ($name:ident, $first:ident, $second:ident) => {
        #[doc = concat!("Gets the joint register ", stringify!($first), stringify!($second), ".")]
        pub fn $name(&self) -> u16 {
            (u8::from(self.$first) as u16) << 8 | (u8::from(self.$second) as u16)
        }
    };
}

/// Macro to generate a function that sets the value in a joint register.
macro_rules! set_joint_register {
    ($name:ident, $first:ident, $second:ident) => {
        #[doc = concat!("Sets the joint register ", stringify!($first), stringify!($second), ".")]
        pub fn $name(&mut self, value: u16) {
            self.$first = (((value >> 8) & 0xff) as u8).into();
            self.$second = ((value & 0xff) as u8).into();
        }
    };
}

impl Registers {
    // AF
    get_joint_register!(get_af, a, f);
    set_joint_register!(set_af, a, f);

    // BC
    get_joint_register!(get_bc, b, c);
    set_joint_register!(set_bc, b, c);

    // DE
    get_joint_register!(get_de, d, e);
    set_joint_register!(set_de, d, e);

    // HL
    get_joint_register!(get_hl, h, l);
    set_joint_register!(set_hl, h, l);
}

/// Adds one to a high:low pair, carrying out of the low byte into the high byte.
pub fn ripple_increment(high: &mut u8, low: &mut u8) {
    let (new_low, carry) = low.overflowing_add(1);
    *low = new_low;
    if carry {
        *high = high.wrapping_add(1);
    }
}

/// Subtracts one from a high:low pair, borrowing from the high byte when the low byte is 0.
pub fn ripple_decrement(high: &mut u8, low: &mut u8) {
    let (new_low, borrow) = low.overflowing_sub(1);
    *low = new_low;
    if borrow {
        *high = high.wrapping_sub(1);
    }
}

/// Only the zero and carry conditions are modelled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlagRegister {
    /// This bit is set when the result of a math op is zero or two values match when using the CP
    /// instruction.
    pub zero: bool,

    /// This bit is set if a carry occurred from the last math operation, if register A is the
    /// smaller value when executing the CP instruction, or if a shift pushed out a 1.
    pub carry: bool,
}

const ZERO_FLAG_BYTE_POSITION: u8 = 7;
const CARRY_FLAG_BYTE_POSITION: u8 = 4;

impl std::convert::From<FlagRegister> for u8 {
    fn from(flag: FlagRegister) -> u8 {
        let mut byte = BitField(0);
        byte.set_bit(ZERO_FLAG_BYTE_POSITION, flag.zero);
        byte.set_bit(CARRY_FLAG_BYTE_POSITION, flag.carry);
        byte.0
    }
}

impl std::convert::From<u8> for FlagRegister {
    fn from(byte: u8) -> Self {
        let byte = BitField(byte);
        Self {
            zero: byte.get_bit(ZERO_FLAG_BYTE_POSITION),
            carry: byte.get_bit(CARRY_FLAG_BYTE_POSITION),
        }
    }
}
