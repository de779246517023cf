//! ECDSA signatures with strict DER encoding.
//!
//! Signing uses RFC6979 deterministic nonces. Every signature leaving this
//! module is normalized to low-S, and DER integers are minimally encoded
//! with a leading zero only where the high bit would otherwise read as a
//! sign bit.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa;

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// DER SEQUENCE tag.
const DER_SEQUENCE: u8 = 0x30;

/// DER INTEGER tag.
const DER_INTEGER: u8 = 0x02;

/// An ECDSA signature over secp256k1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    inner: ecdsa::Signature,
}

impl Signature {
    /// Create a signature from big-endian R and S values.
    ///
    /// # Returns
    /// `Ok(Signature)`, or an error if either value is zero or not below
    /// the curve order.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Result<Self, PrimitivesError> {
        let inner = ecdsa::Signature::from_scalars(k256::FieldBytes::from(r), k256::FieldBytes::from(s))
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature { inner })
    }

    /// The R component, big-endian.
    pub fn r(&self) -> [u8; 32] {
        self.split().0
    }

    /// The S component, big-endian.
    pub fn s(&self) -> [u8; 32] {
        self.split().1
    }

    /// Parse a strict DER-encoded signature.
    ///
    /// # Arguments
    /// * `bytes` - `30 len 02 rlen r 02 slen s`, without a sighash byte.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let inner = ecdsa::Signature::from_der(bytes)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature { inner })
    }

    /// Serialize in DER form after low-S normalization.
    ///
    /// # Returns
    /// `30 len 02 rlen r 02 slen s`, at most 72 bytes.
    pub fn to_der(&self) -> Vec<u8> {
        let (r, s) = low_s(&self.inner).split_bytes();
        let rb = canonicalize_int(&r);
        let sb = canonicalize_int(&s);

        let body_len = 4 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(body_len + 2);
        out.push(DER_SEQUENCE);
        out.push(body_len as u8);
        out.push(DER_INTEGER);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(DER_INTEGER);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Sign a 32-byte digest with RFC6979 nonces.
    ///
    /// # Arguments
    /// * `hash` - The digest to sign.
    /// * `priv_key` - The signing key.
    pub fn sign(hash: &[u8; 32], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let sig: ecdsa::Signature = priv_key
            .signing_key()
            .sign_prehash(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature { inner: low_s(&sig) })
    }

    /// Verify this signature against a digest and public key.
    ///
    /// High-S encodings are normalized before verification.
    pub fn verify(&self, hash: &[u8; 32], pub_key: &PublicKey) -> bool {
        pub_key
            .verifying_key()
            .verify_prehash(hash, &low_s(&self.inner))
            .is_ok()
    }

    fn split(&self) -> ([u8; 32], [u8; 32]) {
        let (r_bytes, s_bytes) = self.inner.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);
        (r, s)
    }
}

fn low_s(sig: &ecdsa::Signature) -> ecdsa::Signature {
    sig.normalize_s().unwrap_or_else(|| sig.clone())
}

/// Minimal big-endian DER integer body for a 32-byte unsigned value.
fn canonicalize_int(val: &[u8]) -> Vec<u8> {
    let start = val
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(val.len().saturating_sub(1));
    let trimmed = &val[start..];

    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed.first().is_some_and(|b| b & 0x80 != 0) {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}
