use attestant_consensus::errors::ConsensusError;
use attestant_storage::errors::StoreError;
use thiserror::Error;

/// Failures of a single attestation duty. A slashing veto is NOT an error;
/// see [`crate::service::AttestationOutcome`].
#[derive(Error, Debug)]
pub enum DutyError {
    #[error("committee computation failed: {0}")]
    Consensus(#[from] ConsensusError),

    #[error("slashing protection store failure: {0}")]
    Store(#[from] StoreError),

    #[error("beacon node request failed: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("signer failure: {0}")]
    Signer(#[source] anyhow::Error),

    /// The attestation is already recorded when this fires; retrying the
    /// publish alone is always safe.
    #[error("attestation publish failed: {0}")]
    Publish(#[source] anyhow::Error),

    /// The fetched assignment does not contain the validator it was fetched
    /// for. Fatal state inconsistency; the caller must refresh its view of
    /// chain state before retrying.
    #[error("validator {validator_index} missing from its own committee at slot {slot}")]
    NotInCommittee { validator_index: u64, slot: u64 },
}
