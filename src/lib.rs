//! # isopack — ISO-8583 message packing and unpacking
//!
//! Packs and unpacks financial transaction messages in the ISO-8583 wire
//! format: a 4-character message-type indicator (MTI), a hex-encoded 64- or
//! 128-bit field-presence bitmap, then the present data elements concatenated
//! in ascending field order over a single ASCII character stream.
//!
//! ## Components
//!
//! - [`convert`]: nibble-level hex/binary conversion, padding, character classes
//! - [`Bitmap`]: presence bitmap with binary/hex/field-set constructors
//! - [`Schema`] / [`MtiSet`]: caller-supplied, read-only lookup tables
//! - [`DataElement`]: per-field validate/encode/decode with fixed or
//!   length-prefixed framing
//! - [`Message`]: parse/serialize orchestration and incremental assembly
//! - [`parser`]: PEST-based loader for the field dictionary text format
//! - [`dump`]: plain-text rendering of a parsed message
//!
//! ## Example
//!
//! ```
//! use isopack::{Dictionary, Message};
//!
//! let dict = Dictionary::standard();
//! let raw = "080022380000008000009A000009031749581749581749580903FG001234";
//! let message = Message::parse(raw, &dict.schema, &dict.mtis).expect("parse");
//! assert_eq!(message.mti(), "0800");
//! assert_eq!(message.value(41), Some("FG001234"));
//! ```
//!
//! All fallible operations return `Result` with an [`IsoError`] describing
//! the validation, format, or truncation failure; nothing partially
//! constructed escapes.

pub mod bitmap;
pub mod convert;
pub mod dump;
pub mod element;
pub mod error;
pub mod message;
pub mod parser;
pub mod schema;

pub use bitmap::Bitmap;
pub use element::DataElement;
pub use error::IsoError;
pub use message::Message;
pub use parser::{parse, Dictionary};
pub use schema::{DataType, FieldSpec, LengthSpec, MtiSet, Schema};
