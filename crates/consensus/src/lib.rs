#![warn(clippy::unwrap_used)]

pub mod attestation;
pub mod attestation_data;
pub mod beacon_state;
pub mod bitfield;
pub mod checkpoint;
pub mod constants;
pub mod errors;
pub mod fork;
pub mod fork_data;
pub mod misc;
pub mod predicates;
pub mod signature;
pub mod validator;
