/// Bitcoin SDK - Cryptographic primitives, hashing, and wire utilities.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Transaction identifier type with display-order hex conversion
/// - secp256k1 private/public keys and BIP-66 DER signatures
/// - Compact-size (varint) encoding and little-endian byte reader/writer

pub mod hash;
pub mod txid;
pub mod util;
pub mod ec;

mod error;
pub use error::PrimitivesError;
