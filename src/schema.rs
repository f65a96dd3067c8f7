//! Field schema types: data types, length specifications, the per-field lookup
//! table, and the permitted MTI set.
//!
//! `Schema` and `MtiSet` are the caller-supplied collaborator tables: built
//! once (by hand or via [`crate::parser`]), then passed by shared reference to
//! every core operation and never mutated afterwards.

use crate::convert;
use crate::error::IsoError;
use std::collections::{BTreeMap, BTreeSet};

/// Character class a data element's logical value must satisfy before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `a` — letters and space.
    Alpha,
    /// `n` — digits and decimal point.
    Numeric,
    /// `s` — special characters only.
    Special,
    /// `an` — letters, digits, space, decimal point.
    AlphaNumeric,
    /// `as` — letters, specials, space.
    AlphaSpecial,
    /// `ans` — letters, digits, specials, space.
    AlphaNumericSpecial,
    /// `b` — uppercase hex digit string.
    Binary,
    /// `z` — track data, passed through opaquely.
    TrackData,
}

impl DataType {
    /// The short tag used in dictionary files (`a`, `n`, `s`, `an`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            DataType::Alpha => "a",
            DataType::Numeric => "n",
            DataType::Special => "s",
            DataType::AlphaNumeric => "an",
            DataType::AlphaSpecial => "as",
            DataType::AlphaNumericSpecial => "ans",
            DataType::Binary => "b",
            DataType::TrackData => "z",
        }
    }

    pub fn from_tag(tag: &str) -> Option<DataType> {
        Some(match tag {
            "a" => DataType::Alpha,
            "n" => DataType::Numeric,
            "s" => DataType::Special,
            "an" => DataType::AlphaNumeric,
            "as" => DataType::AlphaSpecial,
            "ans" => DataType::AlphaNumericSpecial,
            "b" => DataType::Binary,
            "z" => DataType::TrackData,
            _ => return None,
        })
    }

    /// Whether one character belongs to this type's class.
    pub fn admits(self, c: char) -> bool {
        match self {
            DataType::Alpha => convert::is_alpha(c),
            DataType::Numeric => convert::is_numeric(c),
            DataType::Special => convert::is_special(c),
            DataType::AlphaNumeric => c.is_ascii_alphanumeric() || c == ' ' || c == '.',
            DataType::AlphaSpecial => convert::is_alpha(c) || convert::is_special(c),
            DataType::AlphaNumericSpecial => {
                convert::is_alpha(c) || c.is_ascii_digit() || convert::is_special(c)
            }
            DataType::Binary => convert::is_hex(c),
            // TODO: strict track-data validation (field separators, start/end sentinels)
            DataType::TrackData => true,
        }
    }

    /// Apply the class predicate over every character of `value`.
    pub fn validate(self, value: &str) -> bool {
        value.chars().all(|c| self.admits(c))
    }

    /// Types whose short fixed-length values are right-padded with spaces
    /// (and space-trimmed when cleaned).
    pub(crate) fn pads_with_spaces(self) -> bool {
        matches!(
            self,
            DataType::Alpha | DataType::AlphaNumeric | DataType::AlphaNumericSpecial
        )
    }
}

/// How a field's value occupies the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthSpec {
    /// Exactly this many characters, padded or validated to that width.
    Fixed(usize),
    /// A zero-padded decimal length of exactly `prefix_digits` characters,
    /// followed by that many value characters (at most `max`).
    Variable { prefix_digits: u8, max: usize },
}

/// One schema entry: the data type and length specification for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub data_type: DataType,
    pub length: LengthSpec,
}

/// Lookup table from field number (2..=128) to its [`FieldSpec`].
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: BTreeMap<u16, FieldSpec>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    /// Register a field definition. Field 1 is reserved for the bitmap and
    /// cannot be defined; field numbers outside 2..=128 are rejected; variable
    /// length specs must have 1..=3 prefix digits and a max the prefix can
    /// actually express.
    pub fn define(&mut self, field: u16, spec: FieldSpec) -> Result<(), IsoError> {
        if field == 1 {
            return Err(IsoError::Validation(
                "field 1 is reserved for the bitmap and cannot be defined".to_string(),
            ));
        }
        if !(2..=128).contains(&field) {
            return Err(IsoError::Validation(format!(
                "field number {} is outside 2..=128",
                field
            )));
        }
        if let LengthSpec::Variable { prefix_digits, max } = spec.length {
            if !(1..=3).contains(&prefix_digits) {
                return Err(IsoError::Format(format!(
                    "field {}: length-prefix digit count {} is outside 1..=3",
                    field, prefix_digits
                )));
            }
            let limit = 10usize.pow(prefix_digits as u32) - 1;
            if max > limit {
                return Err(IsoError::SchemaDefect(format!(
                    "field {}: max length {} does not fit in {} prefix digits",
                    field, max, prefix_digits
                )));
            }
        }
        self.fields.insert(field, spec);
        Ok(())
    }

    pub fn get(&self, field: u16) -> Option<&FieldSpec> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: u16) -> bool {
        self.fields.contains_key(&field)
    }

    /// Defined fields in ascending order.
    pub fn fields(&self) -> impl Iterator<Item = (u16, &FieldSpec)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The set of accepted 4-digit message-type indicator codes.
#[derive(Debug, Clone, Default)]
pub struct MtiSet {
    codes: BTreeSet<String>,
}

impl MtiSet {
    pub fn new() -> MtiSet {
        MtiSet::default()
    }

    /// Add a permitted MTI. Codes are exactly 4 ASCII digits.
    pub fn permit(&mut self, code: &str) -> Result<(), IsoError> {
        if code.len() != 4 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(IsoError::Validation(format!(
                "MTI {:?} must be exactly 4 decimal digits",
                code
            )));
        }
        self.codes.insert(code.to_string());
        Ok(())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
