use alloy_primitives::B256;
use attestant_consensus::{
    attestation::Attestation,
    attestation_data::{AttestationData, AttestationDataAndCustodyBit},
    beacon_state::CommitteeAssignment,
    bitfield::Bitfield,
    constants::DOMAIN_ATTESTATION,
    fork::Fork,
    misc::{compute_domain, compute_epoch_at_slot},
    signature::BlsSignature,
};
use tree_hash::TreeHash;

use crate::{errors::DutyError, provider::Signer};

/// Sign ``data`` for the attester duty at ``slot``.
///
/// The signed message is the tree hash root of the data wrapped with the
/// custody bit (always false in this phase); the domain separates attester
/// signatures from every other message kind under the fork version active at
/// the slot's epoch.
pub fn sign_attestation_data(
    data: &AttestationData,
    fork: &Fork,
    slot: u64,
    signer: &dyn Signer,
) -> Result<(BlsSignature, B256), DutyError> {
    let data_and_custody_bit = AttestationDataAndCustodyBit {
        data: data.clone(),
        custody_bit: false,
    };
    let signing_root = data_and_custody_bit.tree_hash_root();
    let domain = compute_domain(
        DOMAIN_ATTESTATION,
        Some(fork.version_at(compute_epoch_at_slot(slot))),
        None,
    );
    let signature = signer
        .sign(signing_root, domain)
        .map_err(DutyError::Signer)?;
    Ok((signature, domain))
}

/// Assemble the unaggregated attestation for one committee member.
///
/// The aggregation bitfield carries exactly one set bit at the validator's
/// position within its committee; the custody bitfield is all-zero at the
/// same length.
pub fn build_attestation(
    data: AttestationData,
    signature: BlsSignature,
    assignment: &CommitteeAssignment,
    validator_index: u64,
) -> Result<Attestation, DutyError> {
    let index_in_committee = assignment
        .validators
        .iter()
        .position(|index| *index == validator_index)
        .ok_or(DutyError::NotInCommittee {
            validator_index,
            slot: assignment.slot,
        })?;

    let committee_size = assignment.validators.len();
    let mut aggregation_bitfield = Bitfield::with_capacity(committee_size);
    aggregation_bitfield.set(index_in_committee)?;

    Ok(Attestation {
        data,
        signature,
        aggregation_bitfield,
        custody_bitfield: Bitfield::with_capacity(committee_size),
    })
}

#[cfg(test)]
mod tests {
    use attestant_consensus::checkpoint::Checkpoint;

    use super::*;

    fn attestation_data() -> AttestationData {
        AttestationData {
            beacon_block_root: B256::repeat_byte(0xaa),
            source: Checkpoint {
                epoch: 1,
                root: B256::ZERO,
            },
            target: Checkpoint {
                epoch: 2,
                root: B256::repeat_byte(0xbb),
            },
            shard: 3,
            crosslink_data_root: B256::ZERO,
        }
    }

    fn assignment() -> CommitteeAssignment {
        CommitteeAssignment {
            validators: vec![5, 1, 2],
            shard: 3,
            slot: 64,
        }
    }

    #[test]
    fn test_aggregation_bit_at_committee_position() {
        let attestation =
            build_attestation(attestation_data(), BlsSignature::default(), &assignment(), 1)
                .expect("validator 1 is in the committee");
        assert_eq!(attestation.aggregation_bitfield.as_bytes(), &[0b0000_0010]);
        assert_eq!(attestation.custody_bitfield.num_bytes(), 1);
        assert!(attestation.custody_bitfield.is_zero());
    }

    #[test]
    fn test_first_committee_position_sets_lowest_bit() {
        let attestation =
            build_attestation(attestation_data(), BlsSignature::default(), &assignment(), 5)
                .expect("validator 5 is in the committee");
        assert_eq!(attestation.aggregation_bitfield.as_bytes(), &[0b0000_0001]);
    }

    #[test]
    fn test_missing_validator_is_fatal() {
        let result =
            build_attestation(attestation_data(), BlsSignature::default(), &assignment(), 9);
        assert!(matches!(
            result,
            Err(DutyError::NotInCommittee {
                validator_index: 9,
                slot: 64,
            })
        ));
    }

    struct CapturingSigner {
        captured: parking_lot::Mutex<Vec<(B256, B256)>>,
    }

    impl Signer for CapturingSigner {
        fn sign(&self, signing_root: B256, domain: B256) -> anyhow::Result<BlsSignature> {
            self.captured.lock().push((signing_root, domain));
            Ok(BlsSignature::from([0xab; 96]))
        }
    }

    #[test]
    fn test_sign_uses_attestation_domain_for_slot_epoch() {
        let signer = CapturingSigner {
            captured: parking_lot::Mutex::new(Vec::new()),
        };
        let fork = Fork::default();

        let (signature, domain) =
            sign_attestation_data(&attestation_data(), &fork, 64, &signer).expect("signer is infallible");

        assert_eq!(signature, BlsSignature::from([0xab; 96]));
        assert_eq!(&domain[..4], DOMAIN_ATTESTATION.as_slice());
        let captured = signer.captured.lock();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].1, domain);
        // The signed root covers the custody-bit wrapper, not the bare data.
        let wrapped = AttestationDataAndCustodyBit {
            data: attestation_data(),
            custody_bit: false,
        };
        assert_eq!(captured[0].0, wrapped.tree_hash_root());
    }
}
