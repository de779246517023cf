//! Plain structural view of a transaction.
//!
//! Byte fields are hex strings and amounts are decimal strings, so the
//! snapshot survives JSON round trips without precision loss.

use serde::{Deserialize, Serialize};

use btc_script::AddressType;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Snapshot of a whole transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    pub version: i32,
    pub segwit: bool,
    pub lock_time: u32,
    /// Chain txid (double-SHA256, display order).
    pub txid: String,
    /// hash160 content id of the unsigned transaction.
    pub hash_id: String,
    pub inputs: Vec<InputSnapshot>,
    pub outputs: Vec<OutputSnapshot>,
}

/// Snapshot of one input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub txid: String,
    pub vout: u32,
    pub sequence: u32,
    pub address: Option<String>,
    pub address_type: Option<AddressType>,
    pub locking_script: String,
    pub script_sig: String,
    pub witness: Vec<String>,
    pub value: Option<String>,
    pub redeem_script: Option<String>,
    pub signatures: Vec<String>,
}

/// Snapshot of one output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSnapshot {
    pub address: Option<String>,
    pub address_type: Option<AddressType>,
    pub locking_script: String,
    pub value: String,
}

impl From<&TransactionInput> for InputSnapshot {
    fn from(input: &TransactionInput) -> Self {
        InputSnapshot {
            txid: input.txid.to_string(),
            vout: input.vout,
            sequence: input.sequence,
            address: input.address.clone(),
            address_type: input.address_type,
            locking_script: input.locking_script.to_hex(),
            script_sig: input.unlocking_script.to_hex(),
            witness: input.witness.iter().map(hex::encode).collect(),
            value: input.value.map(|v| v.to_string()),
            redeem_script: input.redeem_script.as_ref().map(|s| s.to_hex()),
            signatures: input.signatures.iter().map(hex::encode).collect(),
        }
    }
}

impl From<&TransactionOutput> for OutputSnapshot {
    fn from(output: &TransactionOutput) -> Self {
        OutputSnapshot {
            address: output.address.clone(),
            address_type: output.address_type,
            locking_script: output.locking_script.to_hex(),
            value: output.value.to_string(),
        }
    }
}

impl From<&Transaction> for TransactionSnapshot {
    fn from(tx: &Transaction) -> Self {
        TransactionSnapshot {
            version: tx.version,
            segwit: tx.segwit,
            lock_time: tx.lock_time,
            txid: tx.tx_id_hex(),
            hash_id: tx.gen_hash_id(),
            inputs: tx.inputs.iter().map(InputSnapshot::from).collect(),
            outputs: tx.outputs.iter().map(OutputSnapshot::from).collect(),
        }
    }
}

impl TransactionSnapshot {
    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TransactionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TransactionError::InvalidTransaction(format!("snapshot: {}", e)))
    }
}
