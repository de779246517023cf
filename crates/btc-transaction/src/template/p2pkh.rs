//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Locking: `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`.
//! Unlocking: `<sig> <pubkey>`.

use btc_script::opcodes::*;
use btc_script::{compile, Script, ScriptChunk};

use crate::TransactionError;

/// Create a P2PKH locking script for a 20-byte public key hash.
///
/// # Arguments
/// * `pubkey_hash` - hash160 of the public key.
///
/// # Returns
/// The 25-byte locking script.
pub fn lock(pubkey_hash: &[u8; 20]) -> Result<Script, TransactionError> {
    Ok(compile(&[
        ScriptChunk::Opcode(OP_DUP),
        ScriptChunk::Opcode(OP_HASH160),
        ScriptChunk::from(&pubkey_hash[..]),
        ScriptChunk::Opcode(OP_EQUALVERIFY),
        ScriptChunk::Opcode(OP_CHECKSIG),
    ])?)
}

/// Create a P2PKH unlocking script.
///
/// # Arguments
/// * `sig` - DER signature with the sighash byte appended.
/// * `pubkey` - Serialized public key (33 or 65 bytes).
pub fn unlock(sig: &[u8], pubkey: &[u8]) -> Result<Script, TransactionError> {
    Ok(compile(&[ScriptChunk::from(sig), ScriptChunk::from(pubkey)])?)
}
