//! Data element codec: validate a logical value against its data type, frame
//! it for the wire (fixed-width padding or a digit-counted length prefix), and
//! extract the clean logical value back out of a character stream.

use crate::convert;
use crate::error::IsoError;
use crate::schema::{DataType, FieldSpec, LengthSpec};

/// One numbered, typed, length-constrained message field, carrying both its
/// wire-encoded and logical (clean) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataElement {
    field: u16,
    spec: FieldSpec,
    wire: String,
    value: String,
}

impl DataElement {
    /// Encode a logical value for the wire.
    ///
    /// The value must satisfy the data type's character class. Fixed-length
    /// values shorter than the width are zero-padded (numeric) or space-padded
    /// (alpha/alphanumeric classes); other types must match the width exactly.
    /// Variable-length values get a zero-padded decimal length prefix.
    pub fn encode(field: u16, value: &str, spec: &FieldSpec) -> Result<DataElement, IsoError> {
        check_reserved(field)?;
        check_spec(field, spec)?;
        if !spec.data_type.validate(value) {
            return Err(IsoError::Validation(format!(
                "field {}: value {:?} is not compliant with data type {:?}",
                field,
                value,
                spec.data_type.tag()
            )));
        }
        let wire = match spec.length {
            LengthSpec::Fixed(width) => {
                if value.len() > width {
                    return Err(IsoError::Validation(format!(
                        "field {}: value length {} exceeds fixed length {}",
                        field,
                        value.len(),
                        width
                    )));
                }
                if value.len() == width {
                    value.to_string()
                } else if spec.data_type == DataType::Numeric {
                    convert::pad_numeric(value, width)
                } else if spec.data_type.pads_with_spaces() {
                    convert::pad_alnum(value, width)
                } else {
                    return Err(IsoError::Validation(format!(
                        "field {}: value length {} is not equal to fixed length {}",
                        field,
                        value.len(),
                        width
                    )));
                }
            }
            LengthSpec::Variable { prefix_digits, max } => {
                if value.len() > max {
                    return Err(IsoError::Validation(format!(
                        "field {}: value length {} exceeds max length {}",
                        field,
                        value.len(),
                        max
                    )));
                }
                let mut wire =
                    convert::pad_numeric(&value.len().to_string(), prefix_digits as usize);
                wire.push_str(value);
                wire
            }
        };
        Ok(DataElement {
            field,
            spec: *spec,
            wire,
            value: value.to_string(),
        })
    }

    /// Decode one field from `stream` starting at `cursor`.
    ///
    /// Returns the element and the new cursor position. For variable-length
    /// fields the cursor always advances by `prefix_digits + declared length`,
    /// whether the field is the first one decoded or not. Decoding does not
    /// re-apply the data type's character class; that guards encoding only.
    pub fn decode(
        field: u16,
        stream: &str,
        cursor: usize,
        spec: &FieldSpec,
    ) -> Result<(DataElement, usize), IsoError> {
        check_reserved(field)?;
        check_spec(field, spec)?;
        match spec.length {
            LengthSpec::Fixed(width) => {
                let wire = take(stream, cursor, width, field)?;
                let value = clean_fixed(wire, spec.data_type);
                Ok((
                    DataElement {
                        field,
                        spec: *spec,
                        wire: wire.to_string(),
                        value,
                    },
                    cursor + width,
                ))
            }
            LengthSpec::Variable { prefix_digits, max } => {
                let digits = prefix_digits as usize;
                let prefix = take(stream, cursor, digits, field)?;
                // str::parse would admit a leading '+'; the wire prefix is digits only
                if !prefix.chars().all(|c| c.is_ascii_digit()) {
                    return Err(IsoError::Format(format!(
                        "field {}: length prefix {:?} is not an unsigned decimal number",
                        field, prefix
                    )));
                }
                let declared: usize = prefix.parse().map_err(|_| {
                    IsoError::Format(format!(
                        "field {}: length prefix {:?} overflows",
                        field, prefix
                    ))
                })?;
                if declared > max {
                    return Err(IsoError::Validation(format!(
                        "field {}: declared length {} exceeds max length {}",
                        field, declared, max
                    )));
                }
                let value = take(stream, cursor + digits, declared, field)?;
                let mut wire = String::with_capacity(digits + declared);
                wire.push_str(prefix);
                wire.push_str(value);
                Ok((
                    DataElement {
                        field,
                        spec: *spec,
                        wire,
                        value: value.to_string(),
                    },
                    cursor + digits + declared,
                ))
            }
        }
    }

    pub fn field(&self) -> u16 {
        self.field
    }

    pub fn data_type(&self) -> DataType {
        self.spec.data_type
    }

    pub fn length_spec(&self) -> LengthSpec {
        self.spec.length
    }

    /// The wire-encoded form: padded to width, or length prefix + value.
    pub fn wire_value(&self) -> &str {
        &self.wire
    }

    /// The logical value: prefix stripped, padding removed.
    pub fn value(&self) -> &str {
        &self.value
    }
}

fn check_reserved(field: u16) -> Result<(), IsoError> {
    if field == 1 {
        return Err(IsoError::Validation(
            "field 1 is reserved for the bitmap and carries no data element".to_string(),
        ));
    }
    Ok(())
}

/// Reject length specs a well-formed schema can never contain. Kept here as
/// well as in `Schema::define` because `FieldSpec` values can be built
/// directly by callers.
fn check_spec(field: u16, spec: &FieldSpec) -> Result<(), IsoError> {
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
    Ok(())
}

/// Slice `count` characters of `stream` starting at `cursor`, or fail with a
/// truncation error naming the field.
fn take<'a>(stream: &'a str, cursor: usize, count: usize, field: u16) -> Result<&'a str, IsoError> {
    let end = cursor.checked_add(count).ok_or_else(|| {
        IsoError::Truncation(format!("field {}: extent overflows the stream", field))
    })?;
    if end > stream.len() {
        return Err(IsoError::Truncation(format!(
            "field {}: needs {} characters at position {}, only {} remain",
            field,
            count,
            cursor,
            stream.len().saturating_sub(cursor)
        )));
    }
    stream.get(cursor..end).ok_or_else(|| {
        IsoError::Validation(format!(
            "field {}: stream is not a single-byte character sequence",
            field
        ))
    })
}

/// Reverse the fixed-width padding: trailing spaces for the space-padded
/// classes, leading zeros for numeric (kept as an exact decimal string).
fn clean_fixed(wire: &str, data_type: DataType) -> String {
    if data_type.pads_with_spaces() {
        wire.trim_end_matches(' ').to_string()
    } else if data_type == DataType::Numeric {
        strip_leading_zeros(wire)
    } else {
        wire.to_string()
    }
}

fn strip_leading_zeros(value: &str) -> String {
    let stripped = value.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else if stripped.starts_with('.') {
        format!("0{}", stripped)
    } else {
        stripped.to_string()
    }
}
