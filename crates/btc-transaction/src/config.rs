//! Transaction construction defaults.

use serde::{Deserialize, Serialize};

use crate::sighash::SIGHASH_ALL;
use crate::TransactionError;

/// Settings applied to a newly built transaction.
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxConfig {
    /// Transaction format version.
    pub version: i32,
    /// Locktime, full 32 bits.
    pub lock_time: u32,
    /// Emit the segwit marker, flag, and witness section.
    pub segwit: bool,
    /// Sighash word appended to signing preimages.
    pub sighash_type: u32,
}

impl Default for TxConfig {
    fn default() -> Self {
        TxConfig {
            version: 2,
            lock_time: 0,
            segwit: true,
            sighash_type: SIGHASH_ALL,
        }
    }
}

impl TxConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, TransactionError> {
        serde_json::from_str(json)
            .map_err(|e| TransactionError::InvalidTransaction(format!("config: {}", e)))
    }
}
