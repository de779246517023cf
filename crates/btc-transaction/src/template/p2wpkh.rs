//! Pay-to-Witness-Public-Key-Hash (P2WPKH) script template.

use btc_script::opcodes::*;
use btc_script::{compile, Script, ScriptChunk};

use crate::template::p2pkh;
use crate::TransactionError;

/// Create a P2WPKH locking script: `OP_0 <20-byte program>`.
pub fn lock(program: &[u8; 20]) -> Result<Script, TransactionError> {
    Ok(compile(&[ScriptChunk::Opcode(OP_0), ScriptChunk::from(&program[..])])?)
}

/// The scriptCode committed to by the witness v0 sighash: the p2pkh
/// locking script of the program.
pub fn script_code(program: &[u8; 20]) -> Result<Script, TransactionError> {
    p2pkh::lock(program)
}

/// The two-item witness stack `[sig, pubkey]`.
pub fn witness(sig: &[u8], pubkey: &[u8]) -> Vec<Vec<u8>> {
    vec![sig.to_vec(), pubkey.to_vec()]
}
