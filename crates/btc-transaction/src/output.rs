//! Transaction output: an amount and the locking script it pays to.

use btc_primitives::util::{ByteReader, ByteWriter};
use btc_script::{Address, AddressType, Script};

use crate::error::malformed;
use crate::template::{classify_locking_script, locking_script_for_address};
use crate::TransactionError;

/// A single output in a transaction.
///
/// # Wire format
///
/// | Field          | Size           |
/// |----------------|----------------|
/// | value          | 8 bytes (LE)   |
/// | script length  | VarInt         |
/// | locking_script | variable       |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// Destination address, when the output was built from one.
    pub address: Option<String>,
    /// Script kind of the locking script, when recognized.
    pub address_type: Option<AddressType>,
    /// The locking script (scriptPubKey).
    pub locking_script: Script,
    /// Amount in satoshis.
    pub value: u64,
}

impl TransactionOutput {
    /// Create an output paying `value` satoshis to `address`.
    pub fn from_address(address: &Address, value: u64) -> Result<Self, TransactionError> {
        Ok(TransactionOutput {
            address: Some(address.address_string.clone()),
            address_type: Some(address.address_type),
            locking_script: locking_script_for_address(address)?,
            value,
        })
    }

    /// Create an output paying `value` satoshis to a raw locking script.
    pub fn from_script(locking_script: Script, value: u64) -> Self {
        TransactionOutput {
            address: None,
            address_type: classify_locking_script(&locking_script),
            locking_script,
            value,
        }
    }

    /// Deserialize an output.
    ///
    /// The address is not recoverable from the wire (it needs a network),
    /// but the script kind is recognized from the locking script.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let value = reader.read_u64_le().map_err(malformed("output value"))?;
        let script = reader.read_var_bytes().map_err(malformed("locking script"))?;
        Ok(Self::from_script(Script::from_bytes(script), value))
    }

    /// Serialize this output.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.value);
        writer.write_var_bytes(self.locking_script.to_bytes());
    }
}
