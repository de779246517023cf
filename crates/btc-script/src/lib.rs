/// Bitcoin SDK - Script compilation and address handling.
///
/// Provides the opcode table, the push-data script compiler and its
/// decoder, the `Script` newtype with standard-template recognition, and
/// address classification and decoding.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, AddressPayload, AddressType, Network};
pub use chunk::{compile, ScriptChunk};
