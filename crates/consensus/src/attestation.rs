use ssz_derive::{Decode, Encode};

use crate::{attestation_data::AttestationData, bitfield::Bitfield, signature::BlsSignature};

#[derive(Debug, PartialEq, Eq, Clone, Encode, Decode)]
pub struct Attestation {
    pub data: AttestationData,
    pub signature: BlsSignature,
    pub aggregation_bitfield: Bitfield,
    pub custody_bitfield: Bitfield,
}
