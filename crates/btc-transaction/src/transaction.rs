//! Bitcoin transaction type with construction, serialization, and signing.
//!
//! A `Transaction` is built from address strings and decimal amounts,
//! serialized to the legacy or segwit wire format, and signed input by
//! input. Signing is split into `signature_hash` and `apply_signature` so
//! an external signer can sit between the two; `sign` runs both with a
//! local key.

use log::debug;

use btc_primitives::ec::{PrivateKey, PublicKey, Signature};
use btc_primitives::hash::hash160;
use btc_primitives::txid::TxId;
use btc_primitives::util::{ByteReader, ByteWriter, VarInt};
use btc_script::{Address, AddressType, Script, ScriptError};

use crate::config::TxConfig;
use crate::error::malformed;
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::sighash::{self, SIGHASH_ALL};
use crate::snapshot::TransactionSnapshot;
use crate::template::{locking_script_for_address, p2pkh, p2sh, p2wpkh};
use crate::TransactionError;

/// Segwit marker byte, written where a legacy input count would be.
pub const SEGWIT_MARKER: u8 = 0x00;

/// Segwit flag byte following the marker.
pub const SEGWIT_FLAG: u8 = 0x01;

/// Smallest possible serialized input: txid, vout, empty script, sequence.
const MIN_INPUT_SIZE: usize = 32 + 4 + 1 + 4;

/// Smallest possible serialized output: value and empty script.
const MIN_OUTPUT_SIZE: usize = 8 + 1;

/// A Bitcoin transaction.
///
/// # Wire format
///
/// ```text
/// version(4) [marker(1) flag(1)] inputs outputs [witnesses] locktime(4)
/// ```
///
/// Marker, flag, and witnesses are present only when `segwit` is set.
/// Input and output order is signing-significant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: i32,
    /// Whether the segwit serialization is used.
    pub segwit: bool,
    /// Ordered inputs.
    pub inputs: Vec<TransactionInput>,
    /// Ordered outputs.
    pub outputs: Vec<TransactionOutput>,
    /// Locktime.
    pub lock_time: u32,
    /// Sighash word used when signing. Not serialized.
    pub sighash_type: u32,
}

impl Transaction {
    /// Create an empty transaction with default settings and the given
    /// segwit mode.
    pub fn new(segwit: bool) -> Self {
        Self::with_config(&TxConfig {
            segwit,
            ..TxConfig::default()
        })
    }

    /// Create an empty transaction from explicit settings.
    pub fn with_config(config: &TxConfig) -> Self {
        Transaction {
            version: config.version,
            segwit: config.segwit,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: config.lock_time,
            sighash_type: config.sighash_type,
        }
    }

    // -----------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------

    /// Add an input spending `vout` of `txid_hex`, an output paying `address`.
    ///
    /// The locking script is derived from the address, since the builder has
    /// no chain access.
    ///
    /// # Arguments
    /// * `address` - Address the spent output pays to.
    /// * `txid_hex` - Id of the funding transaction, display order.
    /// * `vout` - Output index within the funding transaction.
    /// * `value` - Decimal satoshi amount of the spent output. Required to
    ///   sign witness inputs.
    pub fn add_input(
        &mut self,
        address: &str,
        txid_hex: &str,
        vout: u32,
        value: Option<&str>,
    ) -> Result<(), TransactionError> {
        let address = Address::from_string(address)?;
        let txid = TxId::from_hex(txid_hex)?;
        let value = value.map(parse_amount).transpose()?;

        let mut input = TransactionInput::new(txid, vout);
        input.locking_script = locking_script_for_address(&address)?;
        input.address_type = Some(address.address_type);
        input.address = Some(address.address_string);
        input.value = value;
        self.inputs.push(input);
        Ok(())
    }

    /// Add an output paying a decimal satoshi `amount` to `address`.
    pub fn add_output(&mut self, address: &str, amount: &str) -> Result<(), TransactionError> {
        let address = Address::from_string(address)?;
        let output = TransactionOutput::from_address(&address, parse_amount(amount)?)?;
        self.outputs.push(output);
        Ok(())
    }

    /// Number of inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// The input at `index`, or `InvalidTransaction` if out of range.
    pub fn input(&self, index: usize) -> Result<&TransactionInput, TransactionError> {
        self.inputs.get(index).ok_or_else(|| out_of_range(index, self.inputs.len()))
    }

    /// Whether every input is signed.
    ///
    /// Multisig inputs count once they hold `n` signatures; see
    /// `TransactionInput::is_signed`.
    pub fn is_complete(&self) -> bool {
        !self.inputs.is_empty() && self.inputs.iter().all(TransactionInput::is_signed)
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize in the configured format.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.serialize(self.segwit)
    }

    /// Serialize without marker, flag, or witness data.
    pub fn to_bytes_legacy(&self) -> Vec<u8> {
        self.serialize(false)
    }

    /// Hex encoding of `to_bytes`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn serialize(&self, with_witness: bool) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_i32_le(self.version);
        if with_witness {
            w.write_u8(SEGWIT_MARKER);
            w.write_u8(SEGWIT_FLAG);
        }
        w.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut w);
        }
        w.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut w);
        }
        if with_witness {
            for input in &self.inputs {
                input.write_witness(&mut w);
            }
        }
        w.write_u32_le(self.lock_time);
        w.into_bytes()
    }

    /// Parse a transaction from hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::MalformedTransaction(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction, rejecting trailing bytes.
    ///
    /// The result is segwit-enabled iff the marker and flag are present.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::MalformedTransaction(format!(
                "{} trailing bytes after locktime",
                reader.remaining()
            )));
        }
        debug!(
            "parsed transaction: {} inputs, {} outputs, segwit={}",
            tx.inputs.len(),
            tx.outputs.len(),
            tx.segwit
        );
        Ok(tx)
    }

    /// Parse one transaction from a reader, leaving it after the locktime.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader.read_i32_le().map_err(malformed("version"))?;

        let segwit =
            reader.peek(0) == Some(SEGWIT_MARKER) && reader.peek(1) == Some(SEGWIT_FLAG);
        if segwit {
            reader.read_bytes(2).map_err(malformed("segwit marker"))?;
        }

        let input_count = read_count(reader, "input count")?;
        let mut inputs = Vec::with_capacity(input_count.min(reader.remaining() / MIN_INPUT_SIZE));
        for _ in 0..input_count {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = read_count(reader, "output count")?;
        let mut outputs =
            Vec::with_capacity(output_count.min(reader.remaining() / MIN_OUTPUT_SIZE));
        for _ in 0..output_count {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        if segwit {
            for input in &mut inputs {
                input.read_witness(reader)?;
            }
        }

        let lock_time = reader.read_u32_le().map_err(malformed("locktime"))?;

        Ok(Transaction {
            version,
            segwit,
            inputs,
            outputs,
            lock_time,
            sighash_type: SIGHASH_ALL,
        })
    }

    // -----------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------

    /// Content id: hash160 of the serialization with every scriptSig and
    /// witness blanked, as lowercase hex.
    ///
    /// Stable across signing. Not a chain txid; see `tx_id_hex`.
    pub fn gen_hash_id(&self) -> String {
        let mut blank = self.clone();
        for input in &mut blank.inputs {
            input.unlocking_script = Script::new();
            input.witness.clear();
        }
        hex::encode(hash160(&blank.to_bytes()))
    }

    /// Chain txid: double-SHA256 of the legacy serialization.
    pub fn tx_id(&self) -> TxId {
        TxId::from_serialized(&self.to_bytes_legacy())
    }

    /// Chain txid in display (byte-reversed) hex.
    pub fn tx_id_hex(&self) -> String {
        self.tx_id().to_string()
    }

    /// Structural snapshot with hex and decimal-string fields.
    pub fn to_structured(&self) -> TransactionSnapshot {
        TransactionSnapshot::from(self)
    }

    // -----------------------------------------------------------------
    // Signing
    // -----------------------------------------------------------------

    /// The 32-byte digest to sign for input `index`.
    pub fn signature_hash(&self, index: usize) -> Result<[u8; 32], TransactionError> {
        sighash::signature_hash(self, index, self.sighash_type)
    }

    /// Install a signature made over `signature_hash(index)`.
    ///
    /// p2pkh inputs get `<sig> <uncompressed pubkey>` as scriptSig, p2wpkh
    /// inputs get the witness `[sig, compressed pubkey]`, and p2sh inputs
    /// append the signature to those already collected and rebuild the
    /// multisig scriptSig. Nothing is modified on error.
    ///
    /// # Returns
    /// The DER signature with the sighash byte appended.
    pub fn apply_signature(
        &mut self,
        index: usize,
        signature: &Signature,
        pub_key: &PublicKey,
    ) -> Result<Vec<u8>, TransactionError> {
        if self.sighash_type != SIGHASH_ALL {
            return Err(TransactionError::UnsupportedHashType(self.sighash_type));
        }
        let segwit = self.segwit;
        let n_inputs = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, n_inputs))?;
        let kind = input.script_kind().ok_or_else(|| {
            TransactionError::SigningError(format!("input {} has no address type", index))
        })?;

        let mut sig = signature.to_der();
        sig.push(SIGHASH_ALL as u8);

        match kind {
            AddressType::P2pkh => {
                input.unlocking_script = p2pkh::unlock(&sig, &pub_key.to_uncompressed())?;
            }
            AddressType::P2wpkh => {
                if !segwit {
                    return Err(TransactionError::SigningError(format!(
                        "input {} is p2wpkh but the transaction is not segwit",
                        index
                    )));
                }
                input.witness = p2wpkh::witness(&sig, &pub_key.to_compressed());
                input.unlocking_script = Script::new();
            }
            AddressType::P2sh => {
                let redeem = input.redeem_script.as_ref().ok_or_else(|| {
                    TransactionError::SigningError(format!(
                        "p2sh input {} has no redeem script",
                        index
                    ))
                })?;
                let mut sigs = input.signatures.clone();
                sigs.push(sig.clone());
                let script_sig = p2sh::unlock_multisig(&sigs, redeem)?;
                input.signatures = sigs;
                input.unlocking_script = script_sig;
            }
            AddressType::P2wsh => {
                return Err(ScriptError::UnsupportedScriptType(
                    "p2wsh inputs cannot be signed".to_string(),
                )
                .into());
            }
        }
        Ok(sig)
    }

    /// Sign the given inputs with a hex private key.
    ///
    /// Either every listed input is signed or the transaction is left
    /// unchanged. Indices may repeat.
    ///
    /// # Returns
    /// Hex signatures (DER plus sighash byte), one per index.
    pub fn sign(
        &mut self,
        private_key_hex: &str,
        input_indices: &[usize],
    ) -> Result<Vec<String>, TransactionError> {
        let key = PrivateKey::from_hex(private_key_hex)?;
        self.sign_with_key(&key, input_indices)
    }

    /// Sign the given inputs with a parsed private key. See `sign`.
    pub fn sign_with_key(
        &mut self,
        key: &PrivateKey,
        input_indices: &[usize],
    ) -> Result<Vec<String>, TransactionError> {
        let pub_key = key.pub_key();
        let mut working = self.clone();
        let mut signatures = Vec::with_capacity(input_indices.len());

        for &index in input_indices {
            let algorithm = sighash::algorithm_for_input(&working, index)?;
            let digest = working.signature_hash(index)?;
            let signature = key.sign(&digest)?;
            let sig = working.apply_signature(index, &signature, &pub_key)?;
            debug!("signed input {} with {:?} sighash", index, algorithm);
            signatures.push(hex::encode(sig));
        }

        *self = working;
        Ok(signatures)
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::with_config(&TxConfig::default())
    }
}

impl std::fmt::Display for Transaction {
    /// Display the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Parse a decimal satoshi amount.
pub fn parse_amount(amount: &str) -> Result<u64, TransactionError> {
    amount
        .parse::<u64>()
        .map_err(|e| TransactionError::InvalidAmount(format!("{:?}: {}", amount, e)))
}

fn read_count(reader: &mut ByteReader, what: &'static str) -> Result<usize, TransactionError> {
    reader
        .read_varint()
        .and_then(|v| v.to_usize())
        .map_err(malformed(what))
}

fn out_of_range(index: usize, len: usize) -> TransactionError {
    TransactionError::InvalidTransaction(format!(
        "input index {} out of range (tx has {} inputs)",
        index, len
    ))
}
