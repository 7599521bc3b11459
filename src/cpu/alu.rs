//! Carry-detecting arithmetic shared by the 8-bit accumulator ops and the 16-bit HL/SP adds.

use num::traits::ops::overflowing::{OverflowingAdd, OverflowingSub};
use num::{One, Zero};

fn carry_operand<T: Zero + One>(carry: bool) -> T {
    if carry {
        T::one()
    } else {
        T::zero()
    }
}

/// Returns `lhs + rhs + carry_in` modulo the width of `T`, and whether the true sum passed the
/// top of the range.
pub fn add_with_carry<T>(lhs: T, rhs: T, carry_in: bool) -> (T, bool)
where
    T: OverflowingAdd + Zero + One + Copy,
{
    let (partial_sum, overflow1) = lhs.overflowing_add(&rhs);
    let (sum, overflow2) = partial_sum.overflowing_add(&carry_operand(carry_in));
    (sum, overflow1 || overflow2)
}

/// Returns `lhs - rhs - borrow_in` modulo the width of `T`, and whether the true difference was
/// negative.
pub fn sub_with_borrow<T>(lhs: T, rhs: T, borrow_in: bool) -> (T, bool)
where
    T: OverflowingSub + Zero + One + Copy,
{
    let (partial_diff, underflow1) = lhs.overflowing_sub(&rhs);
    let (diff, underflow2) = partial_diff.overflowing_sub(&carry_operand(borrow_in));
    (diff, underflow1 || underflow2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_u8_matches_widened_sum() {
        for lhs in 0..=0xffu16 {
            for rhs in 0..=0xffu16 {
                for carry in [false, true] {
                    let wide = lhs + rhs + u16::from(carry);
                    let (sum, overflow) = add_with_carry(lhs as u8, rhs as u8, carry);
                    assert_eq!(wide as u8, sum);
                    assert_eq!(wide > 0xff, overflow);
                }
            }
        }
    }

    #[test]
    fn test_sub_u8_matches_widened_difference() {
        for lhs in 0..=0xffi16 {
            for rhs in 0..=0xffi16 {
                for borrow in [false, true] {
                    let wide = lhs - rhs - i16::from(borrow);
                    let (diff, underflow) = sub_with_borrow(lhs as u8, rhs as u8, borrow);
                    assert_eq!(wide as u8, diff);
                    assert_eq!(wide < 0, underflow);
                }
            }
        }
    }

    #[test]
    fn test_add_u16_boundary() {
        assert_eq!((0x0000, true), add_with_carry(0xffffu16, 0x0001, false));
        assert_eq!((0x0000, true), add_with_carry(0x8000u16, 0x8000, false));
        assert_eq!((0xffff, false), add_with_carry(0xfffeu16, 0x0000, true));
    }
}
