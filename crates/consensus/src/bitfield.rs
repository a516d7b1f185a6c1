use ssz_derive::{Decode, Encode};

use crate::errors::ConsensusError;

/// Fixed-size bit-vector addressing committee members by position.
///
/// Byte count is the minimal `ceil(bits / 8)`; bit `i` lives in byte `i / 8`
/// at value `1 << (i % 8)`, i.e. little-endian bit order within each byte.
#[derive(Debug, PartialEq, Eq, Clone, Default, Encode, Decode)]
#[ssz(struct_behaviour = "transparent")]
pub struct Bitfield {
    bytes: Vec<u8>,
}

impl Bitfield {
    /// An all-zero bitfield able to address ``bits`` positions.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: vec![0u8; bits.div_ceil(8)],
        }
    }

    pub fn set(&mut self, index: usize) -> Result<(), ConsensusError> {
        let bit_length = self.bytes.len() * 8;
        let byte = self
            .bytes
            .get_mut(index / 8)
            .ok_or(ConsensusError::BitfieldOutOfBounds { index, bit_length })?;
        *byte |= 1 << (index % 8);
        Ok(())
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.bytes
            .get(index / 8)
            .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
    }

    pub fn num_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|byte| *byte == 0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(3, 1)]
    #[case(8, 1)]
    #[case(9, 2)]
    #[case(64, 8)]
    fn test_minimal_byte_count(#[case] bits: usize, #[case] bytes: usize) {
        assert_eq!(Bitfield::with_capacity(bits).num_bytes(), bytes);
    }

    #[test]
    fn test_set_uses_little_endian_bit_order_within_byte() {
        let mut bitfield = Bitfield::with_capacity(3);
        bitfield.set(1).expect("index 1 is in range");
        assert_eq!(bitfield.as_bytes(), &[0b0000_0010]);
        assert!(bitfield.is_set(1));
        assert!(!bitfield.is_set(0));
        assert!(!bitfield.is_set(2));
    }

    #[test]
    fn test_set_crosses_byte_boundary() {
        let mut bitfield = Bitfield::with_capacity(12);
        bitfield.set(9).expect("index 9 is in range");
        assert_eq!(bitfield.as_bytes(), &[0x00, 0b0000_0010]);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut bitfield = Bitfield::with_capacity(8);
        assert_eq!(
            bitfield.set(8),
            Err(ConsensusError::BitfieldOutOfBounds {
                index: 8,
                bit_length: 8,
            })
        );
    }

    #[test]
    fn test_fresh_bitfield_is_zero() {
        assert!(Bitfield::with_capacity(24).is_zero());
    }
}
