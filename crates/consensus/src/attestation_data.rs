use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::checkpoint::Checkpoint;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct AttestationData {
    /// LMD GHOST vote
    pub beacon_block_root: B256,

    /// FFG vote
    pub source: Checkpoint,
    pub target: Checkpoint,

    /// Shard this committee is crosslinking
    pub shard: u64,
    pub crosslink_data_root: B256,
}

/// The exact structure whose tree hash root is signed. The custody bit is
/// reserved for shard-data custody proofs and is always false in this phase.
#[derive(Debug, PartialEq, Eq, Clone, Encode, Decode, TreeHash)]
pub struct AttestationDataAndCustodyBit {
    pub data: AttestationData,
    pub custody_bit: bool,
}
