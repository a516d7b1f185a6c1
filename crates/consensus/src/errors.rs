use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    /// Committee and proposer data is only defined up to one epoch of
    /// lookahead; anything further requires a fresher state snapshot.
    #[error("epoch {requested} is beyond the defined range for a state at epoch {current}")]
    InvalidEpoch { requested: u64, current: u64 },

    /// An active validator was not found in any committee of the epoch. The
    /// state snapshot is inconsistent; callers must refetch it, not retry.
    #[error("no committee assignment for validator {validator_index} in epoch {epoch}")]
    AssignmentNotFound { validator_index: u64, epoch: u64 },

    #[error("shuffle index {index} out of range for {index_count} indices")]
    ShuffleIndexOutOfRange { index: usize, index_count: usize },

    /// The provider handed over a snapshot whose randao mix vector is not the
    /// protocol-fixed length; seeds derived from it would be garbage.
    #[error("randao mix vector holds {length} entries, expected {expected}")]
    InvalidRandaoMixesLength { length: usize, expected: usize },

    #[error("cannot sample a proposer from an empty validator set")]
    EmptyValidatorSet,

    #[error("bit index {index} out of bounds for bitfield of {bit_length} bits")]
    BitfieldOutOfBounds { index: usize, bit_length: usize },
}
