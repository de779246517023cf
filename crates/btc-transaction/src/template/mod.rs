//! Locking and unlocking script templates for the four supported
//! address kinds.
//!
//! Each submodule builds its scripts through the chunk compiler, so push
//! prefixes are always chosen automatically from the data length.

pub mod p2pkh;
pub mod p2sh;
pub mod p2wpkh;
pub mod p2wsh;

use btc_script::{Address, AddressType, Script, ScriptError};

use crate::TransactionError;

/// Build the locking script for `payload` under the given address kind.
///
/// # Arguments
/// * `address_type` - The script kind to lock to.
/// * `payload` - A 20-byte hash, or a 20/32-byte witness program.
///
/// # Returns
/// The locking script, or `UnsupportedScriptType` when the payload length
/// does not fit the kind.
pub fn locking_script(address_type: AddressType, payload: &[u8]) -> Result<Script, TransactionError> {
    let wrong_len = || {
        ScriptError::UnsupportedScriptType(format!(
            "{} with {}-byte payload",
            address_type,
            payload.len()
        ))
    };
    match address_type {
        AddressType::P2pkh => p2pkh::lock(payload.try_into().map_err(|_| wrong_len())?),
        AddressType::P2sh => p2sh::lock(payload.try_into().map_err(|_| wrong_len())?),
        AddressType::P2wpkh => p2wpkh::lock(payload.try_into().map_err(|_| wrong_len())?),
        AddressType::P2wsh => p2wsh::lock(payload.try_into().map_err(|_| wrong_len())?),
    }
}

/// Build the locking script an address pays to.
pub fn locking_script_for_address(address: &Address) -> Result<Script, TransactionError> {
    locking_script(address.address_type, &address.payload.payload)
}

/// Recognize which address kind a locking script pays to.
pub fn classify_locking_script(script: &Script) -> Option<AddressType> {
    if script.is_p2pkh() {
        Some(AddressType::P2pkh)
    } else if script.is_p2sh() {
        Some(AddressType::P2sh)
    } else if script.is_p2wpkh() {
        Some(AddressType::P2wpkh)
    } else if script.is_p2wsh() {
        Some(AddressType::P2wsh)
    } else {
        None
    }
}
