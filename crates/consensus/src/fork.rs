use alloy_primitives::aliases::B32;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// Fork scheduling metadata. `epoch` is the epoch at which `current_version`
/// took effect; messages for earlier epochs are signed under
/// `previous_version`.
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct Fork {
    pub previous_version: B32,
    pub current_version: B32,
    pub epoch: u64,
}

impl Fork {
    /// Return the fork version in effect at ``epoch``.
    pub fn version_at(&self, epoch: u64) -> B32 {
        if epoch < self.epoch {
            self.previous_version
        } else {
            self.current_version
        }
    }
}
