//! secp256k1 keys and ECDSA signatures.
//!
//! Thin wrappers over `k256` that speak the encodings transactions need:
//! 32-byte private scalars, SEC1 public keys (compressed and uncompressed),
//! and strict DER signatures normalized to low-S.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
