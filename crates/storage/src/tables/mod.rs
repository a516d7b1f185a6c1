pub mod attestation_history;
