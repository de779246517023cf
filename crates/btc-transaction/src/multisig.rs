//! n-of-m multisig over p2sh.
//!
//! Public keys are sorted in descending byte order once, when the config
//! is built. Every co-signer must use this same order, or the redeem
//! script and the p2sh address derived from it differ between them.
//!
//! Signatures are pushed in the order they are collected. Co-signers sign
//! in key order; signatures are not reordered against the public keys.
//! A co-signer holding only the signatures gathered so far picks up from
//! them with `MultisigTransaction::add_input_with_signatures`.

use log::debug;

use btc_primitives::ec::{PrivateKey, PublicKey};
use btc_primitives::hash::hash160;
use btc_script::opcodes::{small_int_opcode, OP_CHECKMULTISIG};
use btc_script::{compile, Address, AddressType, Network, Script, ScriptChunk, ScriptError};

use crate::config::TxConfig;
use crate::template::p2sh;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Largest key count a bare `OP_CHECKMULTISIG` redeem script can name.
pub const MAX_MULTISIG_KEYS: usize = 16;

/// An n-of-m key set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigConfig {
    required: usize,
    pub_keys: Vec<Vec<u8>>,
}

impl MultisigConfig {
    /// Build a config requiring `n` of the `m` given public keys.
    ///
    /// # Arguments
    /// * `n` - Required signature count, `1 <= n <= m`.
    /// * `m` - Total key count, `2 <= m <= 16`.
    /// * `pub_keys_hex` - Exactly `m` hex public keys, compressed or not.
    ///
    /// # Returns
    /// The config with keys sorted, or `InvalidMultisigConfig`.
    pub fn new(n: usize, m: usize, pub_keys_hex: &[&str]) -> Result<Self, TransactionError> {
        if !(2..=MAX_MULTISIG_KEYS).contains(&m) {
            return Err(TransactionError::InvalidMultisigConfig(format!(
                "m = {} outside 2..={}",
                m, MAX_MULTISIG_KEYS
            )));
        }
        if n < 1 || n > m {
            return Err(TransactionError::InvalidMultisigConfig(format!(
                "n = {} outside 1..={}",
                n, m
            )));
        }
        if pub_keys_hex.len() != m {
            return Err(TransactionError::InvalidMultisigConfig(format!(
                "expected {} public keys, got {}",
                m,
                pub_keys_hex.len()
            )));
        }

        let mut pub_keys = pub_keys_hex
            .iter()
            .map(|h| -> Result<Vec<u8>, TransactionError> {
                let bytes = hex::decode(h).map_err(|e| {
                    TransactionError::InvalidMultisigConfig(format!("public key {:?}: {}", h, e))
                })?;
                PublicKey::from_bytes(&bytes)?;
                Ok(bytes)
            })
            .collect::<Result<Vec<_>, TransactionError>>()?;
        pub_keys.sort_by(|a, b| b.cmp(a));

        Ok(MultisigConfig {
            required: n,
            pub_keys,
        })
    }

    /// Required signature count `n`.
    pub fn required(&self) -> usize {
        self.required
    }

    /// Total key count `m`.
    pub fn total(&self) -> usize {
        self.pub_keys.len()
    }

    /// Public keys in redeem-script order.
    pub fn pub_keys(&self) -> &[Vec<u8>] {
        &self.pub_keys
    }

    /// `OP_n <pubkey1>...<pubkeym> OP_m OP_CHECKMULTISIG`
    pub fn generate_redeem_script(&self) -> Result<Script, TransactionError> {
        let mut chunks = Vec::with_capacity(self.pub_keys.len() + 3);
        chunks.push(ScriptChunk::Opcode(small_int(self.required)?));
        chunks.extend(self.pub_keys.iter().map(|k| ScriptChunk::from(k.as_slice())));
        chunks.push(ScriptChunk::Opcode(small_int(self.pub_keys.len())?));
        chunks.push(ScriptChunk::Opcode(OP_CHECKMULTISIG));
        Ok(compile(&chunks)?)
    }

    /// The p2sh address of the redeem script.
    pub fn p2sh_address(&self, network: Network) -> Result<Address, TransactionError> {
        let redeem = self.generate_redeem_script()?;
        Ok(Address::from_script_hash(&hash160(redeem.to_bytes()), network))
    }
}

fn small_int(n: usize) -> Result<u8, TransactionError> {
    u8::try_from(n)
        .ok()
        .and_then(small_int_opcode)
        .ok_or_else(|| TransactionError::InvalidMultisigConfig(format!("{} is not a small int", n)))
}

/// A transaction whose inputs spend p2sh multisig outputs of one key set.
#[derive(Clone, Debug)]
pub struct MultisigTransaction {
    tx: Transaction,
    config: MultisigConfig,
    redeem_script: Script,
}

impl MultisigTransaction {
    /// Create an empty multisig transaction.
    pub fn new(config: MultisigConfig, segwit: bool) -> Result<Self, TransactionError> {
        Self::with_config(
            config,
            &TxConfig {
                segwit,
                ..TxConfig::default()
            },
        )
    }

    /// Create an empty multisig transaction with explicit settings.
    pub fn with_config(config: MultisigConfig, tx_config: &TxConfig) -> Result<Self, TransactionError> {
        let redeem_script = config.generate_redeem_script()?;
        Ok(MultisigTransaction {
            tx: Transaction::with_config(tx_config),
            config,
            redeem_script,
        })
    }

    /// Add a p2sh input and attach the redeem script to it.
    pub fn add_input(
        &mut self,
        address: &str,
        txid_hex: &str,
        vout: u32,
        value: Option<&str>,
    ) -> Result<(), TransactionError> {
        self.add_input_with_signatures(address, txid_hex, vout, &[], value)
    }

    /// Add a p2sh input carrying signatures other co-signers already made.
    ///
    /// `signatures_hex` are `<DER signature || sighash byte>` in hex, as
    /// returned by `sign`, in the order they were collected. The scriptSig
    /// is rebuilt from them, and further signatures made here are appended
    /// after them.
    ///
    /// # Returns
    /// `UnsupportedScriptType` for a non-p2sh address, or
    /// `InvalidMultisigConfig` for undecodable hex or more than `m`
    /// signatures.
    pub fn add_input_with_signatures(
        &mut self,
        address: &str,
        txid_hex: &str,
        vout: u32,
        signatures_hex: &[&str],
        value: Option<&str>,
    ) -> Result<(), TransactionError> {
        let kind = Address::from_string(address)?.address_type;
        if kind != AddressType::P2sh {
            return Err(ScriptError::UnsupportedScriptType(format!(
                "multisig input must be p2sh, got {}",
                kind
            ))
            .into());
        }
        if signatures_hex.len() > self.config.total() {
            return Err(TransactionError::InvalidMultisigConfig(format!(
                "{} signatures for {} keys",
                signatures_hex.len(),
                self.config.total()
            )));
        }
        let signatures = signatures_hex
            .iter()
            .map(|h| {
                hex::decode(h).map_err(|e| {
                    TransactionError::InvalidMultisigConfig(format!("signature {:?}: {}", h, e))
                })
            })
            .collect::<Result<Vec<_>, TransactionError>>()?;
        let script_sig = if signatures.is_empty() {
            Script::new()
        } else {
            p2sh::unlock_multisig(&signatures, &self.redeem_script)?
        };

        self.tx.add_input(address, txid_hex, vout, value)?;
        if let Some(input) = self.tx.inputs.last_mut() {
            input.redeem_script = Some(self.redeem_script.clone());
            input.signatures = signatures;
            input.unlocking_script = script_sig;
        }
        Ok(())
    }

    /// Add an output paying a decimal satoshi `amount` to `address`.
    pub fn add_output(&mut self, address: &str, amount: &str) -> Result<(), TransactionError> {
        self.tx.add_output(address, amount)
    }

    /// Add one signature per listed input and rebuild their scriptSigs.
    ///
    /// Either every listed input gains a signature or none does.
    pub fn sign(
        &mut self,
        private_key_hex: &str,
        input_indices: &[usize],
    ) -> Result<Vec<String>, TransactionError> {
        let key = PrivateKey::from_hex(private_key_hex)?;
        let signatures = self.tx.sign_with_key(&key, input_indices)?;
        for &index in input_indices {
            if let Some(input) = self.tx.inputs.get(index) {
                debug!(
                    "multisig input {}: {} of {} signatures",
                    index,
                    input.signatures.len(),
                    self.config.required()
                );
            }
        }
        Ok(signatures)
    }

    /// Whether every input holds at least `n` signatures.
    pub fn is_fully_signed(&self) -> bool {
        !self.tx.inputs.is_empty()
            && self
                .tx
                .inputs
                .iter()
                .all(|i| i.signatures.len() >= self.config.required())
    }

    /// The redeem script shared by every input.
    pub fn redeem_script(&self) -> &Script {
        &self.redeem_script
    }

    /// The key set.
    pub fn config(&self) -> &MultisigConfig {
        &self.config
    }

    /// The underlying transaction.
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// Consume and return the underlying transaction.
    pub fn into_transaction(self) -> Transaction {
        self.tx
    }
}
