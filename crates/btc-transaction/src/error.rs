/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Truncated or structurally invalid bytes while parsing.
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),
    /// The transaction cannot satisfy the request (e.g. input index out of range).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// A sighash type other than `SIGHASH_ALL` was requested.
    #[error("unsupported sighash type: 0x{0:02x}")]
    UnsupportedHashType(u32),
    /// Multisig n/m constraint violated or key count mismatch.
    #[error("invalid multisig config: {0}")]
    InvalidMultisigConfig(String),
    /// An amount string is not a decimal u64.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// A witness input was signed without its previous output value.
    #[error("input {0} has no value; witness sighash requires it")]
    MissingInputValue(usize),
    /// Signing an input failed.
    #[error("signing error: {0}")]
    SigningError(String),
    /// An underlying script error (forwarded from `btc-script`).
    #[error("script error: {0}")]
    Script(#[from] btc_script::ScriptError),
    /// An underlying primitives error (forwarded from `btc-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] btc_primitives::PrimitivesError),
}

/// Map a reader error to `MalformedTransaction`, naming the field being read.
pub(crate) fn malformed(
    context: &'static str,
) -> impl Fn(btc_primitives::PrimitivesError) -> TransactionError {
    move |e| TransactionError::MalformedTransaction(format!("reading {}: {}", context, e))
}
