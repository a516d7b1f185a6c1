use std::{collections::HashMap, sync::Arc};

use attestant_consensus::{attestation::Attestation, misc::compute_epoch_at_slot};
use attestant_storage::tables::attestation_history::AttestationHistoryTable;
use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::{
    attestation::{build_attestation, sign_attestation_data},
    errors::DutyError,
    provider::{ChainDataProvider, Signer},
};

/// Outcome of one attestation duty.
///
/// A veto is an expected, well-defined result of the slashing check, kept as
/// its own variant so callers can neither mistake it for a transient failure
/// to retry nor silently treat it as success.
#[derive(Debug)]
pub enum AttestationOutcome {
    Published(Attestation),
    Vetoed { source_epoch: u64, target_epoch: u64 },
}

/// Runs attestation duties end to end: fetch duty data, slashing check,
/// sign, persist, publish. Collaborators are injected capabilities; the
/// service owns only the sequencing and the per-validator critical section.
pub struct AttestationService {
    provider: Arc<dyn ChainDataProvider>,
    signer: Arc<dyn Signer>,
    protection: AttestationHistoryTable,
    duty_locks: Mutex<HashMap<u64, Arc<AsyncMutex<()>>>>,
}

impl AttestationService {
    pub fn new(
        provider: Arc<dyn ChainDataProvider>,
        signer: Arc<dyn Signer>,
        protection: AttestationHistoryTable,
    ) -> Self {
        Self {
            provider,
            signer,
            protection,
            duty_locks: Mutex::new(HashMap::new()),
        }
    }

    fn duty_lock(&self, validator_index: u64) -> Arc<AsyncMutex<()>> {
        self.duty_locks
            .lock()
            .entry(validator_index)
            .or_default()
            .clone()
    }

    /// Execute the attestation duty for ``validator_index`` at
    /// ``(slot, shard)``.
    ///
    /// The conflict check, signing and persistence form one critical section
    /// per validator index: two in-flight duties for the same validator
    /// could otherwise both pass the check before either records. Once
    /// signing has happened the duty always runs through persistence;
    /// publishing is the only step allowed to fail afterwards.
    pub async fn attest(
        &self,
        validator_index: u64,
        slot: u64,
        shard: u64,
    ) -> Result<AttestationOutcome, DutyError> {
        let duty_lock = self.duty_lock(validator_index);
        let _guard = duty_lock.lock().await;

        let data = self
            .provider
            .produce_attestation_data(slot, shard)
            .await
            .map_err(DutyError::Provider)?;

        if self.protection.has_conflict(validator_index, &data)? {
            warn!(
                validator_index,
                source_epoch = data.source.epoch,
                target_epoch = data.target.epoch,
                "attestation duty vetoed by slashing protection"
            );
            return Ok(AttestationOutcome::Vetoed {
                source_epoch: data.source.epoch,
                target_epoch: data.target.epoch,
            });
        }

        let epoch = compute_epoch_at_slot(slot);
        let assignment = self
            .provider
            .get_committee_assignment(validator_index, epoch)
            .await
            .map_err(DutyError::Provider)?;
        let fork = self.provider.get_fork().await.map_err(DutyError::Provider)?;
        debug!(validator_index, slot, shard, "attestation duty approved");

        let (signature, _domain) = sign_attestation_data(&data, &fork, slot, self.signer.as_ref())?;
        let attestation = build_attestation(data, signature, &assignment, validator_index)?;

        // The record must be durable before publish: a restart that
        // re-attempts this duty has to find the signed attestation in its
        // history.
        self.protection.record(validator_index, &attestation)?;

        self.provider
            .publish_attestation(attestation.clone())
            .await
            .map_err(DutyError::Publish)?;
        info!(validator_index, slot, shard, "attestation published");

        Ok(AttestationOutcome::Published(attestation))
    }
}
