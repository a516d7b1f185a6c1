use alloy_primitives::{aliases::B32, fixed_bytes};

pub const DOMAIN_ATTESTATION: B32 = fixed_bytes!("0x01000000");
pub const DOMAIN_BEACON_PROPOSER: B32 = fixed_bytes!("0x00000000");
pub const EPOCHS_PER_HISTORICAL_VECTOR: u64 = 65536;
pub const FAR_FUTURE_EPOCH: u64 = 18446744073709551615;
pub const GENESIS_FORK_VERSION: B32 = fixed_bytes!("0x00000000");
pub const MAX_EFFECTIVE_BALANCE: u64 = 32_000_000_000;
pub const MAX_RANDOM_VALUE: u64 = 65535;
pub const MIN_SEED_LOOKAHEAD: u64 = 1;
pub const SHARD_COUNT: u64 = 1024;
pub const SHUFFLE_ROUND_COUNT: u8 = 90;
pub const SLOTS_PER_EPOCH: u64 = 32;
pub const TARGET_COMMITTEE_SIZE: u64 = 128;
