//! Message assembly and parsing: MTI validation, bitmap construction, and the
//! sequential field walk over the remaining character stream.
//!
//! A [`Message`] is produced either by [`Message::parse`] or by incremental
//! assembly ([`Message::new`] + [`Message::add_element`]); serialization reads
//! it without mutating. The element set and the bitmap's present set are kept
//! equal at all times (field 1 excluded — it is the secondary-bitmap flag).

use crate::bitmap::Bitmap;
use crate::element::DataElement;
use crate::error::IsoError;
use crate::schema::{MtiSet, Schema};
use std::collections::BTreeMap;

/// Recognized textual header token; messages carrying it are out of scope.
const TEXT_HEADER: &str = "ISO";

const MTI_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    mti: String,
    bitmap: Bitmap,
    elements: BTreeMap<u16, DataElement>,
}

impl Message {
    /// Start assembling a message with the given MTI and no elements yet.
    pub fn new(mti: &str, mtis: &MtiSet) -> Result<Message, IsoError> {
        if !mtis.contains(mti) {
            return Err(IsoError::Validation(format!(
                "MTI {:?} is not in the permitted set",
                mti
            )));
        }
        Ok(Message {
            mti: mti.to_string(),
            bitmap: Bitmap::empty(),
            elements: BTreeMap::new(),
        })
    }

    /// Add (or replace) a data element, rebuilding the bitmap from the element
    /// set. Field 1 and fields absent from the schema are rejected.
    pub fn add_element(&mut self, field: u16, value: &str, schema: &Schema) -> Result<(), IsoError> {
        let spec = schema.get(field).ok_or_else(|| {
            IsoError::Validation(format!("field {} has no schema entry", field))
        })?;
        let element = DataElement::encode(field, value, spec)?;
        self.elements.insert(field, element);
        let fields: Vec<u16> = self.elements.keys().copied().collect();
        self.bitmap = Bitmap::from_field_set(&fields, schema)?;
        Ok(())
    }

    /// Parse a raw wire string: MTI, hex bitmap, then each present field in
    /// ascending order, with one cursor advanced uniformly across all fields.
    pub fn parse(raw: &str, schema: &Schema, mtis: &MtiSet) -> Result<Message, IsoError> {
        if !raw.is_ascii() {
            return Err(IsoError::Validation(
                "message is not an ASCII character stream".to_string(),
            ));
        }
        if raw.starts_with(TEXT_HEADER) {
            return Err(IsoError::Validation(format!(
                "messages with a literal {:?} header are not supported",
                TEXT_HEADER
            )));
        }
        if raw.len() < MTI_LEN {
            return Err(IsoError::Truncation(format!(
                "message has {} characters, the MTI needs {}",
                raw.len(),
                MTI_LEN
            )));
        }
        let mti = &raw[..MTI_LEN];
        if !mtis.contains(mti) {
            return Err(IsoError::Validation(format!(
                "MTI {:?} is not in the permitted set",
                mti
            )));
        }

        let first_nibble = raw.as_bytes().get(MTI_LEN).copied().ok_or_else(|| {
            IsoError::Truncation("message ends before the bitmap".to_string())
        })?;
        let hex_digits = match first_nibble {
            b'8'..=b'9' | b'A'..=b'F' => 32,
            _ => 16,
        };
        let bitmap_end = MTI_LEN + hex_digits;
        if raw.len() < bitmap_end {
            return Err(IsoError::Truncation(format!(
                "bitmap needs {} hex digits, only {} remain",
                hex_digits,
                raw.len() - MTI_LEN
            )));
        }
        let bitmap = Bitmap::from_hex(&raw[MTI_LEN..bitmap_end])?;

        let mut elements = BTreeMap::new();
        let mut cursor = bitmap_end;
        for field in bitmap.present_fields() {
            let spec = schema.get(field).ok_or_else(|| {
                IsoError::Validation(format!("field {} has no schema entry", field))
            })?;
            let (element, next) = DataElement::decode(field, raw, cursor, spec)?;
            cursor = next;
            elements.insert(field, element);
        }

        Ok(Message {
            mti: mti.to_string(),
            bitmap,
            elements,
        })
    }

    /// Serialize to the wire string: MTI, hex bitmap rebuilt from the element
    /// set, then every element re-encoded in ascending field order.
    pub fn serialize(&self, schema: &Schema) -> Result<String, IsoError> {
        let fields: Vec<u16> = self.elements.keys().copied().collect();
        let bitmap = Bitmap::from_field_set(&fields, schema)?;
        let mut out = String::with_capacity(MTI_LEN + bitmap.len() / 4);
        out.push_str(&self.mti);
        out.push_str(&bitmap.as_hex_string());
        for (field, element) in &self.elements {
            let spec = schema.get(*field).ok_or_else(|| {
                IsoError::Validation(format!("field {} has no schema entry", field))
            })?;
            let encoded = DataElement::encode(*field, element.value(), spec)?;
            out.push_str(encoded.wire_value());
        }
        Ok(out)
    }

    pub fn mti(&self) -> &str {
        &self.mti
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Elements in ascending field order.
    pub fn elements(&self) -> impl Iterator<Item = &DataElement> {
        self.elements.values()
    }

    pub fn element(&self, field: u16) -> Option<&DataElement> {
        self.elements.get(&field)
    }

    /// Clean value of one field, if present.
    pub fn value(&self, field: u16) -> Option<&str> {
        self.elements.get(&field).map(|e| e.value())
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// First 16 hex digits of the bitmap (fields 1..64).
    pub fn primary_bitmap_hex(&self) -> String {
        self.bitmap.as_hex_string()[..16].to_string()
    }

    /// First 64 binary digits of the bitmap.
    pub fn primary_bitmap_binary(&self) -> String {
        self.bitmap.as_binary_string()[..64].to_string()
    }

    /// Last 16 hex digits of the bitmap, when the secondary half is present.
    pub fn secondary_bitmap_hex(&self) -> Option<String> {
        if !self.bitmap.has_secondary() {
            return None;
        }
        Some(self.bitmap.as_hex_string()[16..].to_string())
    }
}
