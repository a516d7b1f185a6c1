use std::{any::type_name, fmt::Debug, ops::RangeInclusive, sync::Arc};

use attestant_consensus::{
    attestation::Attestation, attestation_data::AttestationData,
    predicates::is_slashable_attestation_data,
};
use redb::{Database, Durability, ReadableTable, TableDefinition, TypeName, Value};
use ssz::{Decode, Encode};

use crate::errors::StoreError;

/// redb value stored as its SSZ byte representation.
///
/// Keys never go through this wrapper; native integer tuples keep their
/// lexicographic redb ordering, which is what the range queries below rely
/// on.
#[derive(Debug)]
pub struct SszEncoding<T>(pub T);

impl<T> Value for SszEncoding<T>
where
    T: Debug + Encode + Decode,
{
    type SelfType<'a>
        = T
    where
        Self: 'a;

    type AsBytes<'a>
        = Vec<u8>
    where
        Self: 'a;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        Self::SelfType::from_ssz_bytes(data).expect("Failed to decode SSZ bytes, data corruption?")
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'a,
        Self: 'b,
    {
        value.as_ssz_bytes()
    }

    fn type_name() -> TypeName {
        TypeName::new(&format!("SszEncoding<{}>", type_name::<T>()))
    }
}

/// Table definition for the attestation history table
///
/// Key: (validator_index, target_epoch)
/// Value: `Attestation`
///
/// Keys sort lexicographically, so one validator's history is a contiguous
/// key range ordered by target epoch.
pub(crate) const ATTESTATION_HISTORY_TABLE: TableDefinition<(u64, u64), SszEncoding<Attestation>> =
    TableDefinition::new("attestation_history");

pub struct AttestationHistoryTable {
    pub db: Arc<Database>,
}

impl AttestationHistoryTable {
    /// Durably insert ``attestation`` under ``(validator_index,
    /// target_epoch)``, without pruning. [`Self::record`] is the normal entry
    /// point; this exists for seeding and migration.
    pub fn insert(
        &self,
        key: (u64, u64),
        attestation: Attestation,
    ) -> Result<(), StoreError> {
        let mut write_txn = self.db.begin_write()?;
        write_txn.set_durability(Durability::Immediate);

        let mut table = write_txn.open_table(ATTESTATION_HISTORY_TABLE)?;
        table.insert(key, attestation)?;

        drop(table);
        write_txn.commit()?;
        Ok(())
    }

    /// Return the stored attestations for ``validator_index`` whose target
    /// epochs fall in ``target_epochs``, in ascending target-epoch order.
    pub fn get_attestations(
        &self,
        validator_index: u64,
        target_epochs: RangeInclusive<u64>,
    ) -> Result<Vec<Attestation>, StoreError> {
        let read_txn = self.db.begin_read()?;

        let table = read_txn.open_table(ATTESTATION_HISTORY_TABLE)?;
        let mut attestations = Vec::new();
        for entry in table.range(
            (validator_index, *target_epochs.start())..=(validator_index, *target_epochs.end()),
        )? {
            let (_, value) = entry?;
            attestations.push(value.value());
        }
        Ok(attestations)
    }

    /// Check whether signing ``candidate`` could slash ``validator_index``.
    ///
    /// Read-only; must be evaluated strictly before any signing. True iff a
    /// retained record is slashable against the candidate in either
    /// direction, or the candidate's target epoch lies below the lowest
    /// retained target — history down there has been pruned, so nothing can
    /// prove such a vote safe anymore.
    pub fn has_conflict(
        &self,
        validator_index: u64,
        candidate: &AttestationData,
    ) -> Result<bool, StoreError> {
        let history = self.get_attestations(validator_index, 0..=u64::MAX)?;

        let Some(lowest_retained_target) = history
            .first()
            .map(|attestation| attestation.data.target.epoch)
        else {
            return Ok(false);
        };
        if candidate.target.epoch < lowest_retained_target {
            return Ok(true);
        }

        Ok(history.iter().any(|stored| {
            is_slashable_attestation_data(&stored.data, candidate)
                || is_slashable_attestation_data(candidate, &stored.data)
        }))
    }

    /// Persist ``attestation`` under ``(validator_index, target_epoch)``,
    /// then drop every record for that validator with a strictly lower
    /// target epoch.
    ///
    /// The insert commits before the prune: a crash in between only leaves
    /// stale records behind, which is conservative. Pruned history is
    /// compensated for by the floor rule in [`Self::has_conflict`].
    pub fn record(
        &self,
        validator_index: u64,
        attestation: &Attestation,
    ) -> Result<(), StoreError> {
        let target_epoch = attestation.data.target.epoch;
        self.insert((validator_index, target_epoch), attestation.clone())?;
        self.prune_below(validator_index, target_epoch)
    }

    fn prune_below(&self, validator_index: u64, target_epoch: u64) -> Result<(), StoreError> {
        let mut write_txn = self.db.begin_write()?;
        write_txn.set_durability(Durability::Immediate);

        let mut table = write_txn.open_table(ATTESTATION_HISTORY_TABLE)?;
        let stale_keys = table
            .range((validator_index, 0)..(validator_index, target_epoch))?
            .map(|entry| entry.map(|(key, _)| key.value()))
            .collect::<Result<Vec<_>, _>>()?;
        for key in stale_keys {
            table.remove(key)?;
        }

        drop(table);
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use attestant_consensus::{
        bitfield::Bitfield, checkpoint::Checkpoint, signature::BlsSignature,
    };
    use tempfile::TempDir;

    use super::*;
    use crate::db::SlashingProtectionDb;

    fn test_table() -> (TempDir, AttestationHistoryTable) {
        let dir = tempfile::tempdir().expect("temp dir");
        let db = SlashingProtectionDb::new(Some(dir.path().to_path_buf()), false)
            .expect("create test db");
        let table = db.attestation_history_provider();
        (dir, table)
    }

    fn attestation_data(source_epoch: u64, target_epoch: u64, root_byte: u8) -> AttestationData {
        AttestationData {
            beacon_block_root: B256::repeat_byte(root_byte),
            source: Checkpoint {
                epoch: source_epoch,
                root: B256::ZERO,
            },
            target: Checkpoint {
                epoch: target_epoch,
                root: B256::ZERO,
            },
            shard: 3,
            crosslink_data_root: B256::ZERO,
        }
    }

    fn attestation(source_epoch: u64, target_epoch: u64, root_byte: u8) -> Attestation {
        Attestation {
            data: attestation_data(source_epoch, target_epoch, root_byte),
            signature: BlsSignature::default(),
            aggregation_bitfield: Bitfield::with_capacity(3),
            custody_bitfield: Bitfield::with_capacity(3),
        }
    }

    #[test]
    fn test_range_query_is_ordered_and_scoped() {
        let (_dir, table) = test_table();
        table
            .insert((7, 12), attestation(9, 12, 0xaa))
            .expect("insert");
        table
            .insert((7, 10), attestation(8, 10, 0xbb))
            .expect("insert");

        let all = table.get_attestations(7, 0..=u64::MAX).expect("query");
        assert_eq!(
            all.iter().map(|a| a.data.target.epoch).collect::<Vec<_>>(),
            vec![10, 12]
        );
        let high = table.get_attestations(7, 11..=u64::MAX).expect("query");
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].data.target.epoch, 12);
    }

    #[test]
    fn test_stored_attestation_round_trips_through_ssz() {
        let (_dir, table) = test_table();
        let mut stored = attestation(8, 10, 0xbb);
        stored
            .aggregation_bitfield
            .set(2)
            .expect("index 2 is in range");
        table.insert((7, 10), stored.clone()).expect("insert");

        let fetched = table.get_attestations(7, 10..=10).expect("query");
        assert_eq!(fetched, vec![stored]);
    }

    #[test]
    fn test_record_prunes_strictly_below_new_target() {
        let (_dir, table) = test_table();
        // Seed without pruning so several low targets coexist.
        table.insert((7, 3), attestation(1, 3, 0xaa)).expect("seed");
        table.insert((7, 5), attestation(3, 5, 0xbb)).expect("seed");
        table
            .insert((7, 12), attestation(9, 12, 0xcc))
            .expect("seed");

        table.record(7, &attestation(8, 10, 0xdd)).expect("record");

        let remaining = table.get_attestations(7, 0..=u64::MAX).expect("query");
        assert_eq!(
            remaining
                .iter()
                .map(|a| a.data.target.epoch)
                .collect::<Vec<_>>(),
            vec![10, 12]
        );
    }

    #[test]
    fn test_empty_history_never_conflicts() {
        let (_dir, table) = test_table();
        assert!(
            !table
                .has_conflict(7, &attestation_data(1, 5, 0xaa))
                .expect("query")
        );
    }

    #[test]
    fn test_double_vote_conflicts() {
        let (_dir, table) = test_table();
        table.record(7, &attestation(1, 5, 0xaa)).expect("record");

        assert!(table.has_conflict(7, &attestation_data(1, 5, 0xbb)).expect("query"));
        // The exact same vote again is not a double vote.
        assert!(!table.has_conflict(7, &attestation_data(1, 5, 0xaa)).expect("query"));
    }

    #[test]
    fn test_candidate_surrounding_stored_conflicts() {
        let (_dir, table) = test_table();
        table.record(7, &attestation(2, 3, 0xaa)).expect("record");

        // (1, 7) strictly encloses the stored (2, 3).
        assert!(table.has_conflict(7, &attestation_data(1, 7, 0xbb)).expect("query"));
    }

    #[test]
    fn test_stored_surrounding_candidate_conflicts() {
        let (_dir, table) = test_table();
        table.insert((7, 8), attestation(5, 8, 0xaa)).expect("seed");
        table
            .insert((7, 10), attestation(1, 10, 0xbb))
            .expect("seed");

        // (2, 9) is enclosed by the stored (1, 10).
        assert!(table.has_conflict(7, &attestation_data(2, 9, 0xcc)).expect("query"));
    }

    #[test]
    fn test_candidate_below_pruned_floor_conflicts() {
        let (_dir, table) = test_table();
        table.record(7, &attestation(1, 10, 0xaa)).expect("record");

        // (0, 4) is not directly slashable against (1, 10), but history below
        // target 10 has been pruned and cannot vouch for it.
        assert!(table.has_conflict(7, &attestation_data(0, 4, 0xbb)).expect("query"));
    }

    #[test]
    fn test_later_vote_with_advancing_source_passes() {
        let (_dir, table) = test_table();
        table.record(7, &attestation(1, 5, 0xaa)).expect("record");

        assert!(!table.has_conflict(7, &attestation_data(5, 6, 0xbb)).expect("query"));
    }

    #[test]
    fn test_histories_are_isolated_per_validator() {
        let (_dir, table) = test_table();
        table.record(1, &attestation(1, 5, 0xaa)).expect("record");

        assert!(table.get_attestations(2, 0..=u64::MAX).expect("query").is_empty());
        assert!(!table.has_conflict(2, &attestation_data(1, 5, 0xbb)).expect("query"));
    }
}
