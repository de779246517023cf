//! Script chunks and the push-data compiler.
//!
//! A chunk is either a bare opcode or a buffer to be pushed. `compile`
//! turns an ordered chunk list into script bytes, choosing the shortest
//! push prefix for each buffer; `decode_script` is its structural inverse.

use btc_primitives::util::{ByteReader, ByteWriter};

use crate::opcodes::*;
use crate::script::Script;
use crate::ScriptError;

/// A single element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptChunk {
    /// A non-push opcode, emitted as one byte.
    Opcode(u8),
    /// Bytes to be length-prefixed and pushed.
    Data(Vec<u8>),
}

impl ScriptChunk {
    /// Number of bytes this chunk occupies once compiled.
    ///
    /// # Returns
    /// The encoded size, or `InvalidChunk` for a bare push opcode or a
    /// buffer longer than `u32::MAX`.
    pub fn encoded_len(&self) -> Result<usize, ScriptError> {
        match self {
            ScriptChunk::Opcode(op) => {
                if (0x01..=MAX_PUSH_OPCODE).contains(op) {
                    return Err(ScriptError::InvalidChunk(format!(
                        "{} needs push data",
                        opcode_name(*op)
                    )));
                }
                Ok(1)
            }
            ScriptChunk::Data(data) => Ok(push_prefix_len(data.len())? + data.len()),
        }
    }

    /// Render as assembly: hex for data, mnemonic for opcodes.
    pub fn to_asm_string(&self) -> String {
        match self {
            ScriptChunk::Opcode(op) => opcode_name(*op),
            ScriptChunk::Data(data) if data.is_empty() => opcode_name(OP_0),
            ScriptChunk::Data(data) => hex::encode(data),
        }
    }
}

impl From<u8> for ScriptChunk {
    fn from(op: u8) -> Self {
        ScriptChunk::Opcode(op)
    }
}

impl From<Vec<u8>> for ScriptChunk {
    fn from(data: Vec<u8>) -> Self {
        ScriptChunk::Data(data)
    }
}

impl From<&[u8]> for ScriptChunk {
    fn from(data: &[u8]) -> Self {
        ScriptChunk::Data(data.to_vec())
    }
}

fn push_prefix_len(len: usize) -> Result<usize, ScriptError> {
    match len {
        0..=0x4b => Ok(1),
        0x4c..=0xff => Ok(2),
        0x100..=0xffff => Ok(3),
        _ if u32::try_from(len).is_ok() => Ok(5),
        _ => Err(ScriptError::InvalidChunk(format!(
            "push of {} bytes exceeds OP_PUSHDATA4",
            len
        ))),
    }
}

fn write_push(writer: &mut ByteWriter, data: &[u8]) {
    let len = data.len();
    match len {
        0..=0x4b => writer.write_u8(len as u8),
        0x4c..=0xff => {
            writer.write_u8(OP_PUSHDATA1);
            writer.write_u8(len as u8);
        }
        0x100..=0xffff => {
            writer.write_u8(OP_PUSHDATA2);
            writer.write_u16_le(len as u16);
        }
        _ => {
            writer.write_u8(OP_PUSHDATA4);
            writer.write_u32_le(len as u32);
        }
    }
    writer.write_bytes(data);
}

/// Compile chunks into a script.
///
/// Buffers shorter than 0x4c bytes take a one-byte length; up to 0xff use
/// `OP_PUSHDATA1`; up to 0xffff use `OP_PUSHDATA2` with a little-endian
/// u16; anything larger uses `OP_PUSHDATA4` with a little-endian u32. The
/// output size is computed before writing.
///
/// # Arguments
/// * `chunks` - Ordered opcodes and push buffers.
///
/// # Returns
/// The compiled `Script`, or `InvalidChunk` if any chunk is unencodable.
pub fn compile(chunks: &[ScriptChunk]) -> Result<Script, ScriptError> {
    let mut size = 0usize;
    for chunk in chunks {
        size += chunk.encoded_len()?;
    }

    let mut writer = ByteWriter::with_capacity(size);
    for chunk in chunks {
        match chunk {
            ScriptChunk::Opcode(op) => writer.write_u8(*op),
            ScriptChunk::Data(data) => write_push(&mut writer, data),
        }
    }
    Ok(Script::from(writer.into_bytes()))
}

/// Decode raw script bytes into chunks.
///
/// Direct pushes and `OP_PUSHDATA1/2/4` yield `Data`; every other byte,
/// including `OP_0`, yields `Opcode`. Non-minimal pushes decode to the same
/// `Data` as minimal ones, so recompiling normalizes them.
///
/// # Returns
/// The chunk list, or `DataTooSmall` when a push runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut reader = ByteReader::new(bytes);
    let mut chunks = Vec::new();

    while reader.remaining() > 0 {
        let op = reader.read_u8().map_err(|_| ScriptError::DataTooSmall)?;
        let len = match op {
            0x01..=0x4b => Ok(op as usize),
            OP_PUSHDATA1 => reader.read_u8().map(usize::from),
            OP_PUSHDATA2 => reader.read_u16_le().map(usize::from),
            OP_PUSHDATA4 => reader.read_u32_le().map(|n| n as usize),
            _ => {
                chunks.push(ScriptChunk::Opcode(op));
                continue;
            }
        }
        .map_err(|_| ScriptError::DataTooSmall)?;
        let data = reader.read_bytes(len).map_err(|_| ScriptError::DataTooSmall)?;
        chunks.push(ScriptChunk::Data(data.to_vec()));
    }

    Ok(chunks)
}
