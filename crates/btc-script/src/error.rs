/// Error types for script operations.
///
/// Covers the script compiler, push-data decoding, and address
/// classification and decoding.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Address string is unparseable or its prefix is not recognized.
    #[error("address not supported: {0}")]
    UnsupportedAddress(String),

    /// Script kind outside p2pkh, p2sh, p2wpkh and p2wsh.
    #[error("script type not supported: {0}")]
    UnsupportedScriptType(String),

    /// The compiler was given a chunk it cannot encode.
    #[error("invalid chunk: {0}")]
    InvalidChunk(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Not enough data in script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Base58Check checksum does not match.
    #[error("checksum failed")]
    EncodingChecksumFailed,

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] btc_primitives::PrimitivesError),
}

impl From<hex::FromHexError> for ScriptError {
    fn from(e: hex::FromHexError) -> Self {
        ScriptError::InvalidHex(e.to_string())
    }
}
