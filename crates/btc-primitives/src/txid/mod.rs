//! Transaction identifier type.
//!
//! A `TxId` is 32 bytes held in wire (internal) order and displayed as
//! byte-reversed hex, the way block explorers and RPC interfaces show it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Size of a transaction id in bytes.
pub const TXID_SIZE: usize = 32;

/// A 32-byte transaction id.
///
/// `TxId::from_hex` takes display order; `as_bytes` yields wire order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TxId([u8; TXID_SIZE]);

impl TxId {
    /// Create a TxId from bytes already in wire order.
    pub fn new(bytes: [u8; TXID_SIZE]) -> Self {
        TxId(bytes)
    }

    /// Create a TxId from a wire-order byte slice.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(TxId)` if the slice is 32 bytes, or an error otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; TXID_SIZE] = bytes.try_into().map_err(|_| {
            PrimitivesError::InvalidHash(format!(
                "invalid txid length of {}, want {}",
                bytes.len(),
                TXID_SIZE
            ))
        })?;
        Ok(TxId(arr))
    }

    /// Parse a display-order hex string.
    ///
    /// The string must be exactly 64 hex characters. Bytes are reversed
    /// into wire order.
    ///
    /// # Arguments
    /// * `hex_str` - Display-order transaction id.
    ///
    /// # Returns
    /// `Ok(TxId)` on success, or an error for bad length or hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() != TXID_SIZE * 2 {
            return Err(PrimitivesError::InvalidHash(format!(
                "txid must be {} hex characters, got {}",
                TXID_SIZE * 2,
                hex_str.len()
            )));
        }
        let mut bytes = hex::decode(hex_str)?;
        bytes.reverse();
        TxId::from_bytes(&bytes)
    }

    /// Compute the id of a serialized transaction: sha256d of the bytes.
    ///
    /// # Arguments
    /// * `serialized` - Witness-stripped transaction serialization.
    pub fn from_serialized(serialized: &[u8]) -> Self {
        TxId(sha256d(serialized))
    }

    /// Access the wire-order bytes.
    pub fn as_bytes(&self) -> &[u8; TXID_SIZE] {
        &self.0
    }
}

/// Display as byte-reversed hex.
impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "{}", hex::encode(reversed))
    }
}

impl FromStr for TxId {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TxId::from_hex(s)
    }
}

impl Serialize for TxId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TxId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TxId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS_COINBASE: &str =
        "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

    #[test]
    fn test_from_hex_reverses_into_wire_order() {
        let txid = TxId::from_hex(GENESIS_COINBASE).unwrap();
        assert_eq!(txid.as_bytes()[0], 0x3b);
        assert_eq!(txid.as_bytes()[31], 0x4a);
        assert_eq!(txid.to_string(), GENESIS_COINBASE);
    }

    #[test]
    fn test_from_hex_rejects_short_and_long() {
        assert!(TxId::from_hex("").is_err());
        assert!(TxId::from_hex(&GENESIS_COINBASE[2..]).is_err());
        assert!(TxId::from_hex(&format!("{}00", GENESIS_COINBASE)).is_err());
    }

    #[test]
    fn test_from_hex_rejects_non_hex() {
        let bad = format!("zz{}", &GENESIS_COINBASE[2..]);
        assert!(matches!(
            TxId::from_hex(&bad),
            Err(PrimitivesError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_from_bytes_length() {
        assert!(TxId::from_bytes(&[0u8; 31]).is_err());
        assert!(TxId::from_bytes(&[0u8; 32]).is_ok());
    }

    #[test]
    fn test_serde_uses_display_hex() {
        let txid: TxId = GENESIS_COINBASE.parse().unwrap();
        let json = serde_json::to_string(&txid).unwrap();
        assert_eq!(json, format!("\"{}\"", GENESIS_COINBASE));
        let back: TxId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, txid);
    }
}
