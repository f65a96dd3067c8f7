//! Field-presence bitmap: a 64- or 128-bit ordered vector indexed by field
//! number, with bit 1 signalling the presence of the secondary (65..128) half.
//!
//! A bitmap is built once — from a binary string, a hex string, or an explicit
//! field set — and is immutable afterwards. The textual form it was built from
//! stays canonical; the other form is derived on demand.

use crate::convert;
use crate::error::IsoError;
use crate::schema::Schema;

/// Which textual encoding a bitmap was constructed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Binary,
    Hex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// One entry per field; index 0 is field 1 (the secondary-bitmap flag).
    bits: Vec<bool>,
    /// The string the bitmap was constructed from (or rendered to, for field sets).
    raw: String,
    encoding: Encoding,
}

impl Bitmap {
    /// Build from a binary digit string. The length must be exactly 128 when
    /// the first character is `'1'` (secondary bitmap present), 64 otherwise.
    pub fn from_binary(binary: &str) -> Result<Bitmap, IsoError> {
        if binary.is_empty() || binary.chars().any(|c| c != '0' && c != '1') {
            return Err(IsoError::Validation(format!(
                "bitmap {:?} is not a binary digit string",
                binary
            )));
        }
        let has_secondary = binary.starts_with('1');
        if has_secondary && binary.len() != 128 {
            return Err(IsoError::Validation(format!(
                "bitmap length must be 128 when the first bit is 1, got {}",
                binary.len()
            )));
        }
        if !has_secondary && binary.len() != 64 {
            return Err(IsoError::Validation(format!(
                "bitmap length must be 64 when the first bit is 0, got {}",
                binary.len()
            )));
        }
        Ok(Bitmap {
            bits: binary.chars().map(|c| c == '1').collect(),
            raw: binary.to_string(),
            encoding: Encoding::Binary,
        })
    }

    /// Build from a hex nibble string. The length must be exactly 32 when the
    /// first nibble is >= 8 (secondary bitmap present), 16 otherwise.
    pub fn from_hex(hex: &str) -> Result<Bitmap, IsoError> {
        if hex.is_empty() || !hex.chars().all(convert::is_hex) {
            return Err(IsoError::Validation(format!(
                "bitmap {:?} is not an uppercase hex string",
                hex
            )));
        }
        let has_secondary = matches!(hex.as_bytes()[0], b'8'..=b'9' | b'A'..=b'F');
        if has_secondary && hex.len() != 32 {
            return Err(IsoError::Validation(format!(
                "bitmap length must be 32 hex digits when the first bit is set, got {}",
                hex.len()
            )));
        }
        if !has_secondary && hex.len() != 16 {
            return Err(IsoError::Validation(format!(
                "bitmap length must be 16 hex digits when the first bit is clear, got {}",
                hex.len()
            )));
        }
        let binary = convert::hex_to_binary(hex)?;
        Ok(Bitmap {
            bits: binary.chars().map(|c| c == '1').collect(),
            raw: hex.to_string(),
            encoding: Encoding::Hex,
        })
    }

    /// Build from an explicit set of field numbers (2..=128). Field 1 cannot
    /// be requested — its value is inferred from the set. Every requested
    /// field must have a schema entry. The result is 128 bits with bit 1 set
    /// when any field exceeds 64, and 64 bits otherwise.
    pub fn from_field_set(fields: &[u16], schema: &Schema) -> Result<Bitmap, IsoError> {
        let mut bits = vec![false; 128];
        let mut has_secondary = false;
        for &field in fields {
            if field == 1 {
                return Err(IsoError::Validation(
                    "field 1 cannot be requested explicitly; it is inferred from the set"
                        .to_string(),
                ));
            }
            if !schema.contains(field) {
                return Err(IsoError::Validation(format!(
                    "field {} has no schema entry",
                    field
                )));
            }
            bits[(field - 1) as usize] = true;
            if field > 64 {
                has_secondary = true;
            }
        }
        if has_secondary {
            bits[0] = true;
        } else {
            bits.truncate(64);
        }
        let raw: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
        Ok(Bitmap {
            bits,
            raw,
            encoding: Encoding::Binary,
        })
    }

    /// Empty 64-bit bitmap for a message with no elements yet.
    pub(crate) fn empty() -> Bitmap {
        Bitmap {
            bits: vec![false; 64],
            raw: "0".repeat(64),
            encoding: Encoding::Binary,
        }
    }

    /// Whether the secondary (fields 65..128) half is present.
    pub fn has_secondary(&self) -> bool {
        self.bits[0]
    }

    /// Whether `field`'s bit is set. Fields beyond the bitmap's length are unset.
    pub fn is_set(&self, field: u16) -> bool {
        field >= 1 && (field as usize) <= self.bits.len() && self.bits[(field - 1) as usize]
    }

    /// Ascending field numbers whose bit is set, excluding field 1.
    pub fn present_fields(&self) -> Vec<u16> {
        self.bits
            .iter()
            .enumerate()
            .filter(|&(i, &set)| set && i != 0)
            .map(|(i, _)| (i + 1) as u16)
            .collect()
    }

    /// The bitmap as binary digits (the canonical form, or derived from it).
    pub fn as_binary_string(&self) -> String {
        match self.encoding {
            Encoding::Binary => self.raw.clone(),
            Encoding::Hex => self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect(),
        }
    }

    /// The bitmap as hex nibbles (the canonical form, or derived from it).
    pub fn as_hex_string(&self) -> String {
        match self.encoding {
            Encoding::Hex => self.raw.clone(),
            Encoding::Binary => {
                let mut out = String::with_capacity(self.bits.len() / 4);
                for nibble in self.bits.chunks(4) {
                    let mut v = 0u8;
                    for &bit in nibble {
                        v = (v << 1) | bit as u8;
                    }
                    out.push(char::from_digit(v as u32, 16).unwrap_or('0').to_ascii_uppercase());
                }
                out
            }
        }
    }

    /// Total bit length: 64 or 128.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }
}
