use crate::attestation_data::AttestationData;

/// Check if ``data_1`` and ``data_2`` are slashable according to the
/// Casper FFG rules: a double vote (two distinct votes for the same target
/// epoch) or a surround vote (``data_1`` surrounds ``data_2``).
///
/// Surround detection is directional; callers comparing a candidate against
/// stored history must evaluate both orders.
pub fn is_slashable_attestation_data(data_1: &AttestationData, data_2: &AttestationData) -> bool {
    // Double vote
    (data_1 != data_2 && data_1.target.epoch == data_2.target.epoch)
        // Surround vote
        || (data_1.source.epoch < data_2.source.epoch && data_2.target.epoch < data_1.target.epoch)
}
