use std::{path::PathBuf, sync::Arc};

use redb::{Builder, Database};

use crate::{
    dir,
    errors::StoreError,
    tables::attestation_history::{ATTESTATION_HISTORY_TABLE, AttestationHistoryTable},
};

pub const APP_NAME: &str = "attestant";

pub const REDB_FILE: &str = "attestant.redb";

/// The size of the cache for the database
///
/// 64 MiB
pub const REDB_CACHE_SIZE: usize = 64 * 1_024 * 1_024;

#[derive(Clone, Debug)]
pub struct SlashingProtectionDb {
    pub db: Arc<Database>,
}

impl SlashingProtectionDb {
    pub fn new(data_dir: Option<PathBuf>, ephemeral: bool) -> Result<Self, StoreError> {
        let db_dir = dir::setup_data_dir(APP_NAME, data_dir, ephemeral)?;

        let db_file = db_dir.join(REDB_FILE);

        let db = Builder::new()
            .set_cache_size(REDB_CACHE_SIZE)
            .create(&db_file)?;

        let write_txn = db.begin_write()?;
        write_txn.open_table(ATTESTATION_HISTORY_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn attestation_history_provider(&self) -> AttestationHistoryTable {
        AttestationHistoryTable {
            db: self.db.clone(),
        }
    }
}
