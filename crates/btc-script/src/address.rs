//! Address classification and payload decoding.
//!
//! Classification is a longest-prefix match on the address string. Decoding
//! hands checksum work to `bs58` (Base58Check, with a sha256d checksum) and
//! `bech32` (BIP-173 segwit), and only extracts and checks the payload.

use std::fmt;

use bech32::{hrp, segwit, Hrp};
use serde::{Deserialize, Serialize};

use btc_primitives::hash::sha256d;

use crate::ScriptError;

/// Mainnet P2PKH address version byte.
pub const MAINNET_P2PKH: u8 = 0x00;
/// Mainnet P2SH address version byte.
pub const MAINNET_P2SH: u8 = 0x05;
/// Testnet P2PKH address version byte.
pub const TESTNET_P2PKH: u8 = 0x6f;
/// Testnet P2SH address version byte.
pub const TESTNET_P2SH: u8 = 0xc4;

/// Length of a hash160 payload.
const HASH_LEN: usize = 20;

/// Length of a version-0 script-hash witness program.
const WSH_PROGRAM_LEN: usize = 32;

/// Bitcoin network an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet: `1`, `3`, `bc1`.
    Mainnet,
    /// Testnet: `m`, `n`, `2`, `tb1`.
    Testnet,
}

/// The four script kinds an address can name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Pay to public key hash, Base58Check `1`, `m` or `n`.
    P2pkh,
    /// Pay to script hash, Base58Check `3` or `2`.
    P2sh,
    /// Version-0 witness key hash, bech32 with a 20-byte program.
    P2wpkh,
    /// Version-0 witness script hash, bech32 with a 32-byte program.
    P2wsh,
}

/// Prefix table, longest prefixes first.
const PREFIXES: &[(&str, AddressType, Network)] = &[
    ("bc1", AddressType::P2wpkh, Network::Mainnet),
    ("tb1", AddressType::P2wpkh, Network::Testnet),
    ("1", AddressType::P2pkh, Network::Mainnet),
    ("3", AddressType::P2sh, Network::Mainnet),
    ("m", AddressType::P2pkh, Network::Testnet),
    ("n", AddressType::P2pkh, Network::Testnet),
    ("2", AddressType::P2sh, Network::Testnet),
];

impl AddressType {
    /// Classify an address by prefix alone.
    ///
    /// Bech32 prefixes classify as `P2wpkh`; `Address::from_string`
    /// refines that to `P2wsh` once the program length is known.
    ///
    /// # Returns
    /// The type and network, or `UnsupportedAddress` if no prefix matches.
    pub fn classify(address: &str) -> Result<(AddressType, Network), ScriptError> {
        let lowered = address.to_ascii_lowercase();
        PREFIXES
            .iter()
            .find(|(prefix, _, _)| {
                if prefix.len() > 1 {
                    lowered.starts_with(prefix)
                } else {
                    address.starts_with(prefix)
                }
            })
            .map(|&(_, kind, network)| (kind, network))
            .ok_or_else(|| ScriptError::UnsupportedAddress(address.to_string()))
    }

    /// Lowercase name, e.g. `"p2wpkh"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::P2pkh => "p2pkh",
            AddressType::P2sh => "p2sh",
            AddressType::P2wpkh => "p2wpkh",
            AddressType::P2wsh => "p2wsh",
        }
    }

    /// Whether spends of this type carry a witness.
    pub fn is_witness(&self) -> bool {
        matches!(self, AddressType::P2wpkh | AddressType::P2wsh)
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded address payload.
///
/// `version` is the Base58Check version byte, or the witness version for
/// bech32 addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressPayload {
    pub version: u8,
    pub payload: Vec<u8>,
    pub network: Network,
}

/// Decode a Base58Check address into its version byte and 20-byte hash.
///
/// # Returns
/// `(version, hash)`, or `UnsupportedAddress` for bad characters or length,
/// `EncodingChecksumFailed` for a checksum mismatch.
pub fn decode_base58check(address: &str) -> Result<(u8, [u8; HASH_LEN]), ScriptError> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| ScriptError::UnsupportedAddress(format!("{}: {}", address, e)))?;

    if decoded.len() != 1 + HASH_LEN + 4 {
        return Err(ScriptError::UnsupportedAddress(format!(
            "{}: decoded length {}",
            address,
            decoded.len()
        )));
    }

    let (body, checksum) = decoded.split_at(1 + HASH_LEN);
    if sha256d(body)[..4] != *checksum {
        return Err(ScriptError::EncodingChecksumFailed);
    }

    let mut hash = [0u8; HASH_LEN];
    hash.copy_from_slice(&body[1..]);
    Ok((body[0], hash))
}

/// Decode a version-0 bech32 segwit address into its witness program.
///
/// # Returns
/// The HRP network and the 20- or 32-byte program, or `UnsupportedAddress`
/// for a bad checksum, unknown HRP, non-zero version, or other length.
pub fn decode_bech32(address: &str) -> Result<(Network, Vec<u8>), ScriptError> {
    let (hrp, version, program) = segwit::decode(address)
        .map_err(|e| ScriptError::UnsupportedAddress(format!("{}: {}", address, e)))?;

    let network = if hrp == hrp::BC {
        Network::Mainnet
    } else if hrp == hrp::TB {
        Network::Testnet
    } else {
        return Err(ScriptError::UnsupportedAddress(format!(
            "{}: unknown human-readable part {}",
            address, hrp
        )));
    };

    if version != segwit::VERSION_0 {
        return Err(ScriptError::UnsupportedAddress(format!(
            "{}: witness version {} not supported",
            address,
            version.to_u8()
        )));
    }
    if program.len() != HASH_LEN && program.len() != WSH_PROGRAM_LEN {
        return Err(ScriptError::UnsupportedAddress(format!(
            "{}: witness program of {} bytes",
            address,
            program.len()
        )));
    }
    Ok((network, program))
}

/// A classified and decoded address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The address as given.
    pub address_string: String,
    /// Script kind named by the address.
    pub address_type: AddressType,
    /// Version and hash or witness program.
    pub payload: AddressPayload,
}

impl Address {
    /// Parse and validate an address string.
    ///
    /// The Base58Check version byte and the bech32 HRP must agree with the
    /// network the prefix implies.
    ///
    /// # Arguments
    /// * `address` - Base58Check or bech32 address.
    ///
    /// # Returns
    /// The decoded `Address`, or `UnsupportedAddress`.
    pub fn from_string(address: &str) -> Result<Self, ScriptError> {
        let (kind, network) = AddressType::classify(address)?;

        let (address_type, payload) = match kind {
            AddressType::P2wpkh | AddressType::P2wsh => {
                let (hrp_network, program) = decode_bech32(address)?;
                if hrp_network != network {
                    return Err(ScriptError::UnsupportedAddress(address.to_string()));
                }
                let kind = if program.len() == WSH_PROGRAM_LEN {
                    AddressType::P2wsh
                } else {
                    AddressType::P2wpkh
                };
                let payload = AddressPayload {
                    version: 0,
                    payload: program,
                    network,
                };
                (kind, payload)
            }
            AddressType::P2pkh | AddressType::P2sh => {
                let (version, hash) = decode_base58check(address)?;
                if version != base58_version(kind, network) {
                    return Err(ScriptError::UnsupportedAddress(format!(
                        "{}: version byte 0x{:02x} does not match prefix",
                        address, version
                    )));
                }
                let payload = AddressPayload {
                    version,
                    payload: hash.to_vec(),
                    network,
                };
                (kind, payload)
            }
        };

        Ok(Address {
            address_string: address.to_string(),
            address_type,
            payload,
        })
    }

    /// Build a p2pkh address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; HASH_LEN], network: Network) -> Self {
        Self::base58(AddressType::P2pkh, hash, network)
    }

    /// Build a p2sh address from a 20-byte script hash.
    pub fn from_script_hash(hash: &[u8; HASH_LEN], network: Network) -> Self {
        Self::base58(AddressType::P2sh, hash, network)
    }

    /// Build a version-0 bech32 address from a 20- or 32-byte program.
    ///
    /// # Returns
    /// A p2wpkh or p2wsh address, or `UnsupportedAddress` for other lengths.
    pub fn from_witness_program(program: &[u8], network: Network) -> Result<Self, ScriptError> {
        let address_type = match program.len() {
            HASH_LEN => AddressType::P2wpkh,
            WSH_PROGRAM_LEN => AddressType::P2wsh,
            n => {
                return Err(ScriptError::UnsupportedAddress(format!(
                    "witness program of {} bytes",
                    n
                )))
            }
        };
        let hrp: Hrp = match network {
            Network::Mainnet => hrp::BC,
            Network::Testnet => hrp::TB,
        };
        let address_string = segwit::encode(hrp, segwit::VERSION_0, program)
            .map_err(|e| ScriptError::UnsupportedAddress(e.to_string()))?;
        Ok(Address {
            address_string,
            address_type,
            payload: AddressPayload {
                version: 0,
                payload: program.to_vec(),
                network,
            },
        })
    }

    /// Network the address belongs to.
    pub fn network(&self) -> Network {
        self.payload.network
    }

    fn base58(address_type: AddressType, hash: &[u8; HASH_LEN], network: Network) -> Self {
        let version = base58_version(address_type, network);
        let mut data = Vec::with_capacity(1 + HASH_LEN + 4);
        data.push(version);
        data.extend_from_slice(hash);
        let checksum = sha256d(&data);
        data.extend_from_slice(&checksum[..4]);

        Address {
            address_string: bs58::encode(&data).into_string(),
            address_type,
            payload: AddressPayload {
                version,
                payload: hash.to_vec(),
                network,
            },
        }
    }
}

fn base58_version(kind: AddressType, network: Network) -> u8 {
    match (kind, network) {
        (AddressType::P2sh, Network::Mainnet) => MAINNET_P2SH,
        (AddressType::P2sh, Network::Testnet) => TESTNET_P2SH,
        (_, Network::Mainnet) => MAINNET_P2PKH,
        (_, Network::Testnet) => TESTNET_P2PKH,
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

impl std::str::FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}
