//! Signature hash computation for transaction signing.
//!
//! Two preimage constructions are supported:
//!
//! - legacy, for p2pkh and p2sh inputs: the transaction serialized without
//!   witness data, with the signed input's scriptSig replaced by its
//!   locking script (or redeem script) and every other scriptSig emptied;
//! - witness v0 (BIP-143), for p2wpkh inputs.
//!
//! Either preimage is suffixed with the 4-byte sighash type and
//! double-SHA256 hashed to give the digest that is signed.
//!
//! See <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki>

use btc_primitives::hash::sha256d;
use btc_primitives::util::ByteWriter;
use btc_script::{AddressType, ScriptError};

use crate::template::p2wpkh;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Sign all inputs and all outputs. The only sighash type supported.
pub const SIGHASH_ALL: u32 = 0x01;

/// Which preimage construction an input is signed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SighashAlgorithm {
    /// Whole transaction with the spent script substituted; p2pkh and p2sh.
    Legacy,
    /// BIP-143 digest committing to the spent value; p2wpkh.
    WitnessV0,
}

impl SighashAlgorithm {
    /// Select the algorithm for a script kind.
    ///
    /// p2wsh spending is not supported and fails with `UnsupportedScriptType`.
    pub fn for_address_type(address_type: AddressType) -> Result<Self, TransactionError> {
        match address_type {
            AddressType::P2pkh | AddressType::P2sh => Ok(SighashAlgorithm::Legacy),
            AddressType::P2wpkh => Ok(SighashAlgorithm::WitnessV0),
            AddressType::P2wsh => Err(ScriptError::UnsupportedScriptType(
                "p2wsh inputs cannot be signed".to_string(),
            )
            .into()),
        }
    }
}

// -----------------------------------------------------------------------
// Digest
// -----------------------------------------------------------------------

/// Compute the 32-byte digest to sign for an input.
///
/// # Arguments
/// * `tx` - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `sighash_type` - Must be `SIGHASH_ALL`.
///
/// # Returns
/// The double-SHA256 of the preimage and sighash word, or
/// `UnsupportedHashType`, or an error if the input's script kind is
/// unknown or unsupported.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    if sighash_type != SIGHASH_ALL {
        return Err(TransactionError::UnsupportedHashType(sighash_type));
    }
    let preimage = match algorithm_for_input(tx, input_index)? {
        SighashAlgorithm::Legacy => legacy_preimage(tx, input_index)?,
        SighashAlgorithm::WitnessV0 => witness_v0_preimage(tx, input_index)?,
    };
    Ok(finalize(&preimage, sighash_type))
}

/// Append the little-endian sighash word to a preimage and double-hash it.
pub fn finalize(preimage: &[u8], sighash_type: u32) -> [u8; 32] {
    let mut buf = Vec::with_capacity(preimage.len() + 4);
    buf.extend_from_slice(preimage);
    buf.extend_from_slice(&sighash_type.to_le_bytes());
    sha256d(&buf)
}

/// The algorithm an input of `tx` is signed with.
pub fn algorithm_for_input(
    tx: &Transaction,
    input_index: usize,
) -> Result<SighashAlgorithm, TransactionError> {
    let input = tx.input(input_index)?;
    let kind = input.script_kind().ok_or_else(|| {
        TransactionError::SigningError(format!(
            "input {} has no address type or recognizable locking script",
            input_index
        ))
    })?;
    SighashAlgorithm::for_address_type(kind)
}

// -----------------------------------------------------------------------
// Legacy preimage
// -----------------------------------------------------------------------

/// Build the legacy preimage body (without the sighash word).
///
/// The signed input's scriptSig is its redeem script when one is attached,
/// otherwise its locking script. Marker, flag, and witness data are never
/// included.
pub fn legacy_preimage(tx: &Transaction, input_index: usize) -> Result<Vec<u8>, TransactionError> {
    let target = tx.input(input_index)?;
    let script_code = target
        .redeem_script
        .as_ref()
        .unwrap_or(&target.locking_script)
        .to_bytes();

    let mut w = ByteWriter::new();
    w.write_i32_le(tx.version);
    w.write_varint(tx.inputs.len().into());
    for (i, input) in tx.inputs.iter().enumerate() {
        let script: &[u8] = if i == input_index { script_code } else { &[] };
        input.write_with_script(&mut w, script);
    }
    w.write_varint(tx.outputs.len().into());
    for output in &tx.outputs {
        output.write_to(&mut w);
    }
    w.write_u32_le(tx.lock_time);
    Ok(w.into_bytes())
}

// -----------------------------------------------------------------------
// BIP-143 preimage
// -----------------------------------------------------------------------

/// Build the witness v0 preimage body (without the sighash word).
///
/// Layout:
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes)
/// 3. hashSequence (32 bytes)
/// 4. outpoint (32-byte txid + 4-byte index)
/// 5. scriptCode (varint-prefixed p2pkh script of the key hash)
/// 6. value (8 bytes LE)
/// 7. nSequence (4 bytes LE)
/// 8. hashOutputs (32 bytes)
/// 9. nLocktime (4 bytes LE)
pub fn witness_v0_preimage(
    tx: &Transaction,
    input_index: usize,
) -> Result<Vec<u8>, TransactionError> {
    let target = tx.input(input_index)?;
    let value = target
        .value
        .ok_or(TransactionError::MissingInputValue(input_index))?;
    let program: &[u8; 20] = target
        .locking_script
        .witness_program()
        .and_then(|p| <&[u8; 20]>::try_from(p).ok())
        .ok_or_else(|| {
            ScriptError::UnsupportedScriptType(format!(
                "input {} locking script is not a p2wpkh program",
                input_index
            ))
        })?;
    let script_code = p2wpkh::script_code(program)?;

    let mut w = ByteWriter::with_capacity(156 + script_code.len());
    w.write_i32_le(tx.version);
    w.write_bytes(&hash_prevouts(tx));
    w.write_bytes(&hash_sequence(tx));
    w.write_bytes(target.txid.as_bytes());
    w.write_u32_le(target.vout);
    w.write_var_bytes(script_code.to_bytes());
    w.write_u64_le(value);
    w.write_u32_le(target.sequence);
    w.write_bytes(&hash_outputs(tx));
    w.write_u32_le(tx.lock_time);
    Ok(w.into_bytes())
}

/// sha256d over every input's outpoint.
fn hash_prevouts(tx: &Transaction) -> [u8; 32] {
    let mut w = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        w.write_bytes(input.txid.as_bytes());
        w.write_u32_le(input.vout);
    }
    sha256d(w.as_bytes())
}

/// sha256d over every input's sequence number.
fn hash_sequence(tx: &Transaction) -> [u8; 32] {
    let mut w = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        w.write_u32_le(input.sequence);
    }
    sha256d(w.as_bytes())
}

/// sha256d over every serialized output.
fn hash_outputs(tx: &Transaction) -> [u8; 32] {
    let mut w = ByteWriter::new();
    for output in &tx.outputs {
        output.write_to(&mut w);
    }
    sha256d(w.as_bytes())
}
