#![warn(clippy::unwrap_used)]

pub mod attestation;
pub mod errors;
pub mod provider;
pub mod service;
