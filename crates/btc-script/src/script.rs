//! Script newtype over raw bytes.
//!
//! A script is never interpreted here; it is built by the compiler,
//! carried through the transaction codec, and inspected only to recognize
//! the standard templates.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chunk::{decode_script, ScriptChunk};
use crate::opcodes::*;
use crate::ScriptError;

/// A Bitcoin script, represented as a byte vector newtype.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    /// Create a script from a copy of raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Borrow the script bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the script into chunks.
    ///
    /// # Returns
    /// The chunk list, or `DataTooSmall` if a push is truncated.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    /// Render as space-separated assembly.
    ///
    /// # Returns
    /// The assembly text, or an empty string if the script does not decode.
    pub fn to_asm(&self) -> String {
        match self.chunks() {
            Ok(chunks) => chunks
                .iter()
                .map(ScriptChunk::to_asm_string)
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => String::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// `OP_0 <20 bytes>`
    pub fn is_p2wpkh(&self) -> bool {
        self.witness_program().is_some_and(|p| p.len() == 20)
    }

    /// `OP_0 <32 bytes>`
    pub fn is_p2wsh(&self) -> bool {
        self.witness_program().is_some_and(|p| p.len() == 32)
    }

    /// `OP_n <pubkey>... OP_m OP_CHECKMULTISIG` with `m` keys present.
    pub fn is_multisig_out(&self) -> bool {
        let parts = match self.chunks() {
            Ok(p) => p,
            Err(_) => return false,
        };
        if parts.len() < 4 {
            return false;
        }
        let last = parts.len() - 1;
        let (n, m) = match (&parts[0], &parts[last - 1]) {
            (ScriptChunk::Opcode(a), ScriptChunk::Opcode(b)) => {
                match (small_int_value(*a), small_int_value(*b)) {
                    (Some(n), Some(m)) => (n as usize, m as usize),
                    _ => return false,
                }
            }
            _ => return false,
        };
        let keys = &parts[1..last - 1];
        parts[last] == ScriptChunk::Opcode(OP_CHECKMULTISIG)
            && n >= 1
            && n <= m
            && keys.len() == m
            && keys
                .iter()
                .all(|k| matches!(k, ScriptChunk::Data(d) if d.len() == 33 || d.len() == 65))
    }

    // -----------------------------------------------------------------------
    // Data extraction
    // -----------------------------------------------------------------------

    /// The version-0 witness program, if this is `OP_0 <20 or 32 bytes>`.
    pub fn witness_program(&self) -> Option<&[u8]> {
        let b = &self.0;
        match b.len() {
            22 if b[0] == OP_0 && b[1] == OP_DATA_20 => Some(&b[2..]),
            34 if b[0] == OP_0 && b[1] == OP_DATA_32 => Some(&b[2..]),
            _ => None,
        }
    }

    /// The 20-byte hash committed to by a p2pkh or p2sh script.
    pub fn public_key_hash(&self) -> Option<&[u8]> {
        if self.is_p2pkh() {
            Some(&self.0[3..23])
        } else if self.is_p2sh() {
            Some(&self.0[2..22])
        } else {
            None
        }
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

/// Serialize as a hex string in JSON.
impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Deserialize from a hex string in JSON.
impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
