//! Pay-to-Witness-Script-Hash (P2WSH) locking scripts.
//!
//! Spending is not supported; only outputs can pay to this kind.

use btc_script::opcodes::*;
use btc_script::{compile, Script, ScriptChunk};

use crate::TransactionError;

/// Create a P2WSH locking script: `OP_0 <32-byte program>`.
pub fn lock(program: &[u8; 32]) -> Result<Script, TransactionError> {
    Ok(compile(&[ScriptChunk::Opcode(OP_0), ScriptChunk::from(&program[..])])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock() {
        let script = lock(&[0x5au8; 32]).unwrap();
        assert_eq!(script.len(), 34);
        assert!(script.is_p2wsh());
        assert!(!script.is_p2wpkh());
    }
}
