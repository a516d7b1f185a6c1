use alloy_primitives::{B256, aliases::B32};
use ethereum_hashing::{hash, hash_fixed};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DOMAIN_ATTESTATION, DOMAIN_BEACON_PROPOSER, EPOCHS_PER_HISTORICAL_VECTOR,
        MAX_EFFECTIVE_BALANCE, MAX_RANDOM_VALUE, MIN_SEED_LOOKAHEAD, SHARD_COUNT, SLOTS_PER_EPOCH,
        TARGET_COMMITTEE_SIZE,
    },
    errors::ConsensusError,
    fork::Fork,
    misc::{bytes_to_int64, compute_committee, compute_epoch_at_slot, compute_shuffled_index,
        compute_start_slot_at_epoch},
    validator::Validator,
};

/// The committee one validator belongs to for a single attestation duty.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct CommitteeAssignment {
    /// Committee membership in committee order; contains the queried
    /// validator exactly once.
    pub validators: Vec<u64>,
    pub shard: u64,
    pub slot: u64,
}

/// Read-only beacon-state snapshot supplied by the chain-data provider.
///
/// The registry order of `validators` is significant and never changes; this
/// crate never mutates or caches a snapshot across slots.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BeaconState {
    pub slot: u64,
    pub fork: Fork,
    pub validators: Vec<Validator>,
    /// `EPOCHS_PER_HISTORICAL_VECTOR` recent randao mixes.
    pub randao_mixes: Vec<B256>,
    /// Start shard of the current epoch's committee rotation.
    pub start_shard: u64,
}

impl BeaconState {
    /// Return the current epoch.
    pub fn get_current_epoch(&self) -> u64 {
        compute_epoch_at_slot(self.slot)
    }

    /// Return the randao mix at a recent ``epoch``.
    ///
    /// `randao_mixes` arrives from the provider as a plain vector, so its
    /// protocol-fixed length is checked here rather than assumed.
    pub fn get_randao_mix(&self, epoch: u64) -> Result<B256, ConsensusError> {
        if self.randao_mixes.len() != EPOCHS_PER_HISTORICAL_VECTOR as usize {
            return Err(ConsensusError::InvalidRandaoMixesLength {
                length: self.randao_mixes.len(),
                expected: EPOCHS_PER_HISTORICAL_VECTOR as usize,
            });
        }
        Ok(self.randao_mixes[(epoch % EPOCHS_PER_HISTORICAL_VECTOR) as usize])
    }

    /// Return the seed at ``epoch``.
    pub fn get_seed(&self, epoch: u64, domain_type: B32) -> Result<B256, ConsensusError> {
        let mix =
            self.get_randao_mix(epoch + EPOCHS_PER_HISTORICAL_VECTOR - MIN_SEED_LOOKAHEAD - 1)?;
        let epoch_with_index =
            [domain_type.as_slice(), &epoch.to_le_bytes(), mix.as_slice()].concat();
        Ok(B256::from(hash_fixed(&epoch_with_index)))
    }

    /// Return the sequence of active validator indices at ``epoch``, in
    /// registry order.
    pub fn get_active_validator_indices(&self, epoch: u64) -> Vec<u64> {
        self.validators
            .iter()
            .enumerate()
            .filter_map(|(i, validator)| {
                if validator.is_active_validator(epoch) {
                    Some(i as u64)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Return the number of crosslink committees in ``epoch``.
    pub fn get_epoch_committee_count(&self, epoch: u64) -> u64 {
        let active_count = self.get_active_validator_indices(epoch).len() as u64;
        (active_count / SLOTS_PER_EPOCH / TARGET_COMMITTEE_SIZE)
            .clamp(1, SHARD_COUNT / SLOTS_PER_EPOCH)
            * SLOTS_PER_EPOCH
    }

    /// Return the number of shards the committee rotation advances past in
    /// ``epoch``.
    pub fn get_shard_delta(&self, epoch: u64) -> u64 {
        self.get_epoch_committee_count(epoch)
            .min(SHARD_COUNT - SHARD_COUNT / SLOTS_PER_EPOCH)
    }

    /// Return the first shard of the committee rotation in ``epoch``.
    ///
    /// Only defined up to one epoch of lookahead: the rotation is walked back
    /// from ``current_epoch + 1`` by per-epoch shard deltas.
    pub fn get_epoch_start_shard(&self, epoch: u64) -> Result<u64, ConsensusError> {
        let current_epoch = self.get_current_epoch();
        if epoch > current_epoch + 1 {
            return Err(ConsensusError::InvalidEpoch {
                requested: epoch,
                current: current_epoch,
            });
        }
        let mut check_epoch = current_epoch + 1;
        let mut shard = (self.start_shard + self.get_shard_delta(current_epoch)) % SHARD_COUNT;
        while check_epoch > epoch {
            check_epoch -= 1;
            shard = (shard + SHARD_COUNT - self.get_shard_delta(check_epoch)) % SHARD_COUNT;
        }
        Ok(shard)
    }

    /// Return the crosslink committee for ``shard`` in ``epoch``.
    pub fn get_crosslink_committee(
        &self,
        epoch: u64,
        shard: u64,
    ) -> Result<Vec<u64>, ConsensusError> {
        let committee_index = (shard + SHARD_COUNT - self.get_epoch_start_shard(epoch)?)
            % SHARD_COUNT;
        compute_committee(
            &self.get_active_validator_indices(epoch),
            self.get_seed(epoch, DOMAIN_ATTESTATION)?,
            committee_index,
            self.get_epoch_committee_count(epoch),
        )
    }

    /// Return the committee, shard and slot ``validator_index`` attests with
    /// in ``epoch``.
    ///
    /// Scans slots in ascending order and committee index within each slot in
    /// ascending order; a well-formed state holds at most one match, the scan
    /// order is the tie-break contract regardless. A miss for a validator the
    /// caller believes active means the snapshot is inconsistent and must be
    /// refetched.
    pub fn committee_assignment(
        &self,
        epoch: u64,
        validator_index: u64,
    ) -> Result<CommitteeAssignment, ConsensusError> {
        let current_epoch = self.get_current_epoch();
        if epoch > current_epoch + 1 {
            return Err(ConsensusError::InvalidEpoch {
                requested: epoch,
                current: current_epoch,
            });
        }

        let committees_per_slot = self.get_epoch_committee_count(epoch) / SLOTS_PER_EPOCH;
        let epoch_start_shard = self.get_epoch_start_shard(epoch)?;
        let epoch_start_slot = compute_start_slot_at_epoch(epoch);

        for slot in epoch_start_slot..epoch_start_slot + SLOTS_PER_EPOCH {
            let offset = committees_per_slot * (slot % SLOTS_PER_EPOCH);
            let slot_start_shard = (epoch_start_shard + offset) % SHARD_COUNT;
            for committee_index in 0..committees_per_slot {
                let shard = (slot_start_shard + committee_index) % SHARD_COUNT;
                let committee = self.get_crosslink_committee(epoch, shard)?;
                if committee.contains(&validator_index) {
                    return Ok(CommitteeAssignment {
                        validators: committee,
                        shard,
                        slot,
                    });
                }
            }
        }

        Err(ConsensusError::AssignmentNotFound {
            validator_index,
            epoch,
        })
    }

    /// Return from ``indices`` a random index sampled by effective balance.
    fn compute_proposer_index(&self, indices: &[u64], seed: B256) -> Result<u64, ConsensusError> {
        if indices.is_empty() {
            return Err(ConsensusError::EmptyValidatorSet);
        }

        let mut i: usize = 0;
        let total = indices.len();

        loop {
            let candidate_index = indices[compute_shuffled_index(i % total, total, seed)?];

            let random_bytes = hash(&[seed.as_slice(), &(i / 16).to_le_bytes()].concat());
            let offset = i % 16 * 2;
            let random_value = bytes_to_int64(&random_bytes[offset..offset + 2]);

            let effective_balance = self.validators[candidate_index as usize].effective_balance;

            if effective_balance * MAX_RANDOM_VALUE >= MAX_EFFECTIVE_BALANCE * random_value {
                return Ok(candidate_index);
            }

            i += 1;
        }
    }

    /// Return the beacon proposer index at ``slot`` of the current epoch.
    pub fn get_beacon_proposer_index(&self, slot: u64) -> Result<u64, ConsensusError> {
        let epoch = self.get_current_epoch();
        let seed = B256::from(hash_fixed(
            &[
                self.get_seed(epoch, DOMAIN_BEACON_PROPOSER)?.as_slice(),
                &slot.to_le_bytes(),
            ]
            .concat(),
        ));
        let indices = self.get_active_validator_indices(epoch);
        self.compute_proposer_index(&indices, seed)
    }

    /// Check whether ``validator_index`` proposes at ``slot``. The slot must
    /// fall in the snapshot's current epoch.
    pub fn is_proposer_at_slot(
        &self,
        slot: u64,
        validator_index: u64,
    ) -> Result<bool, ConsensusError> {
        let current_epoch = self.get_current_epoch();
        if compute_epoch_at_slot(slot) != current_epoch {
            return Err(ConsensusError::InvalidEpoch {
                requested: compute_epoch_at_slot(slot),
                current: current_epoch,
            });
        }
        Ok(self.get_beacon_proposer_index(slot)? == validator_index)
    }
}
