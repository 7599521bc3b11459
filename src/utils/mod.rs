/// A single byte addressed bit by bit, bit 0 being the least significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitField(pub u8);

impl BitField {
    pub fn get_bit(&self, index: u8) -> bool {
        debug_assert!(index < 8);
        self.0 & (1 << index) != 0
    }

    pub fn set_bit(&mut self, index: u8, value: bool) {
        debug_assert!(index < 8);

        if value {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut field = BitField(0);
        field.set_bit(3, true);
        field.set_bit(7, true);
        assert_eq!(0b1000_1000, field.0);
        assert!(field.get_bit(7));
        assert!(!field.get_bit(6));

        field.set_bit(3, false);
        assert_eq!(0b1000_0000, field.0);
    }
}
