use alloy_primitives::hex;
use ssz::{Decode, DecodeError, Encode};

pub const SIGNATURE_BYTES: usize = 96;

/// Compressed BLS12-381 signature bytes. This crate only transports
/// signatures; producing and verifying them is the signer's concern.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlsSignature {
    pub inner: [u8; SIGNATURE_BYTES],
}

impl Default for BlsSignature {
    fn default() -> Self {
        Self {
            inner: [0u8; SIGNATURE_BYTES],
        }
    }
}

impl From<[u8; SIGNATURE_BYTES]> for BlsSignature {
    fn from(inner: [u8; SIGNATURE_BYTES]) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsSignature(0x{})", hex::encode(self.inner))
    }
}

impl Encode for BlsSignature {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        SIGNATURE_BYTES
    }

    fn ssz_bytes_len(&self) -> usize {
        SIGNATURE_BYTES
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.inner);
    }
}

impl Decode for BlsSignature {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        SIGNATURE_BYTES
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let inner = bytes
            .try_into()
            .map_err(|_| DecodeError::InvalidByteLength {
                len: bytes.len(),
                expected: SIGNATURE_BYTES,
            })?;
        Ok(Self { inner })
    }
}
