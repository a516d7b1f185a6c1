use alloy_primitives::B256;
use async_trait::async_trait;
use attestant_consensus::{
    attestation::Attestation, attestation_data::AttestationData,
    beacon_state::CommitteeAssignment, fork::Fork, signature::BlsSignature,
};

/// Chain-facing capabilities injected into the duty service at construction.
/// Implementations are RPC clients; their failures are transient I/O errors
/// and are propagated unmodified, leaving retry policy to the caller.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    async fn produce_attestation_data(
        &self,
        slot: u64,
        shard: u64,
    ) -> anyhow::Result<AttestationData>;

    async fn get_committee_assignment(
        &self,
        validator_index: u64,
        epoch: u64,
    ) -> anyhow::Result<CommitteeAssignment>;

    async fn get_fork(&self) -> anyhow::Result<Fork>;

    async fn publish_attestation(&self, attestation: Attestation) -> anyhow::Result<()>;
}

/// Signing capability keyed by the validator identity the service acts for.
/// The message root and domain are passed separately so the backend performs
/// its own domain mixing.
pub trait Signer: Send + Sync {
    fn sign(&self, signing_root: B256, domain: B256) -> anyhow::Result<BlsSignature>;
}
