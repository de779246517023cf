/// Bitcoin SDK - Transaction building, signing, and serialization.
///
/// Provides the Transaction type with address-driven inputs and outputs,
/// legacy and segwit serialization, legacy and BIP-143 signature hashes,
/// and p2sh multisig signing.

pub mod transaction;
pub mod input;
pub mod output;
pub mod sighash;
pub mod template;
pub mod multisig;
pub mod config;
pub mod snapshot;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use multisig::{MultisigConfig, MultisigTransaction};
pub use config::TxConfig;
pub use snapshot::TransactionSnapshot;

#[cfg(test)]
mod tests;
