//! Pay-to-Script-Hash (P2SH) script template.
//!
//! Only bare multisig redeem scripts are spent through this template.

use btc_script::opcodes::*;
use btc_script::{compile, Script, ScriptChunk};

use crate::TransactionError;

/// Create a P2SH locking script: `OP_HASH160 <hash> OP_EQUAL`.
pub fn lock(script_hash: &[u8; 20]) -> Result<Script, TransactionError> {
    Ok(compile(&[
        ScriptChunk::Opcode(OP_HASH160),
        ScriptChunk::from(&script_hash[..]),
        ScriptChunk::Opcode(OP_EQUAL),
    ])?)
}

/// Create a multisig unlocking script: `OP_0 <sig1>...<sigk> <redeemScript>`.
///
/// The leading `OP_0` absorbs the extra stack item `OP_CHECKMULTISIG`
/// pops. Signatures are pushed in the order given.
///
/// # Arguments
/// * `sigs` - DER signatures with the sighash byte appended.
/// * `redeem_script` - The serialized multisig redeem script.
pub fn unlock_multisig(sigs: &[Vec<u8>], redeem_script: &Script) -> Result<Script, TransactionError> {
    let mut chunks = Vec::with_capacity(sigs.len() + 2);
    chunks.push(ScriptChunk::Opcode(OP_0));
    chunks.extend(sigs.iter().map(|s| ScriptChunk::from(s.as_slice())));
    chunks.push(ScriptChunk::from(redeem_script.to_bytes()));
    Ok(compile(&chunks)?)
}
