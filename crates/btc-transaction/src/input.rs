//! Transaction input spending a previous output.
//!
//! Besides the wire fields, an input carries the spending context the
//! caller supplied when adding it (address, locking script, value and an
//! optional redeem script) plus the signatures collected so far. Only
//! the wire fields and the witness stack are serialized.

use btc_primitives::txid::TxId;
use btc_primitives::util::{ByteReader, ByteWriter, VarInt};
use btc_script::opcodes::small_int_value;
use btc_script::{AddressType, Script, ScriptChunk};

use crate::error::malformed;
use crate::template::classify_locking_script;
use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single input in a transaction.
///
/// # Wire format
///
/// | Field          | Size           |
/// |----------------|----------------|
/// | txid           | 32 bytes (LE)  |
/// | vout           | 4 bytes (LE)   |
/// | script length  | VarInt         |
/// | scriptSig      | variable       |
/// | sequence       | 4 bytes (LE)   |
///
/// The witness stack is written separately, after all outputs, when the
/// transaction is segwit-enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// Id of the transaction holding the spent output.
    pub txid: TxId,
    /// Index of the spent output.
    pub vout: u32,
    /// Sequence number. Defaults to `0xFFFFFFFF`.
    pub sequence: u32,
    /// Address of the spent output, when known.
    pub address: Option<String>,
    /// Script kind of the spent output, when known.
    pub address_type: Option<AddressType>,
    /// Locking script of the spent output. Empty for parsed inputs.
    pub locking_script: Script,
    /// The scriptSig. Empty until signed.
    pub unlocking_script: Script,
    /// Witness stack items. Empty until signed.
    pub witness: Vec<Vec<u8>>,
    /// Value of the spent output in satoshis. Required for witness inputs.
    pub value: Option<u64>,
    /// Redeem script for p2sh inputs.
    pub redeem_script: Option<Script>,
    /// Signatures collected so far (p2sh multisig), in signing order.
    pub signatures: Vec<Vec<u8>>,
}

impl TransactionInput {
    /// Create an input spending `vout` of `txid`, with no spending context.
    pub fn new(txid: TxId, vout: u32) -> Self {
        TransactionInput {
            txid,
            vout,
            sequence: DEFAULT_SEQUENCE_NUMBER,
            address: None,
            address_type: None,
            locking_script: Script::new(),
            unlocking_script: Script::new(),
            witness: Vec::new(),
            value: None,
            redeem_script: None,
            signatures: Vec::new(),
        }
    }

    /// Deserialize the wire fields of an input.
    ///
    /// # Returns
    /// The input, or `MalformedTransaction` if the data is truncated.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let txid = TxId::new(reader.read_array::<32>().map_err(malformed("input txid"))?);
        let vout = reader.read_u32_le().map_err(malformed("input vout"))?;
        let script = reader.read_var_bytes().map_err(malformed("scriptSig"))?;
        let sequence = reader.read_u32_le().map_err(malformed("input sequence"))?;

        let mut input = TransactionInput::new(txid, vout);
        input.unlocking_script = Script::from_bytes(script);
        input.sequence = sequence;
        Ok(input)
    }

    /// Serialize the wire fields of this input.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        self.write_with_script(writer, self.unlocking_script.to_bytes());
    }

    /// Serialize the wire fields with `script` in place of the scriptSig.
    pub(crate) fn write_with_script(&self, writer: &mut ByteWriter, script: &[u8]) {
        writer.write_bytes(self.txid.as_bytes());
        writer.write_u32_le(self.vout);
        writer.write_var_bytes(script);
        writer.write_u32_le(self.sequence);
    }

    /// Deserialize a witness stack into this input.
    pub fn read_witness(&mut self, reader: &mut ByteReader) -> Result<(), TransactionError> {
        let count = reader
            .read_varint()
            .and_then(|v| v.to_usize())
            .map_err(malformed("witness item count"))?;
        let mut items = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            items.push(reader.read_var_bytes().map_err(malformed("witness item"))?.to_vec());
        }
        self.witness = items;
        Ok(())
    }

    /// Serialize this input's witness stack. An empty stack is a single
    /// zero count byte.
    pub fn write_witness(&self, writer: &mut ByteWriter) {
        writer.write_varint(VarInt::from(self.witness.len()));
        for item in &self.witness {
            writer.write_var_bytes(item);
        }
    }

    /// The script kind this input spends: the declared address type, or
    /// the kind recognized from the locking script.
    pub fn script_kind(&self) -> Option<AddressType> {
        self.address_type
            .or_else(|| classify_locking_script(&self.locking_script))
    }

    /// Whether a scriptSig or witness has been installed.
    ///
    /// An input carrying a multisig redeem script is signed only once it
    /// holds the `n` signatures that script requires.
    pub fn is_signed(&self) -> bool {
        if let Some(required) = self.redeem_script.as_ref().and_then(required_signatures) {
            return self.signatures.len() >= required;
        }
        !self.unlocking_script.is_empty() || !self.witness.is_empty()
    }
}

/// The `n` of an `OP_n ... OP_m OP_CHECKMULTISIG` script.
fn required_signatures(script: &Script) -> Option<usize> {
    if !script.is_multisig_out() {
        return None;
    }
    match script.chunks().ok()?.first() {
        Some(ScriptChunk::Opcode(op)) => small_int_value(*op).map(usize::from),
        _ => None,
    }
}
