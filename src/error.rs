//! Error taxonomy for bitmap construction, data element codecs, and message assembly.

/// Errors produced by the core pack/unpack operations.
///
/// `Validation` covers rejected user input, `Format` structurally malformed wire
/// data, `Truncation` streams that end before a declared field extent, and
/// `SchemaDefect` broken schema entries (a caller-side defect, kept distinct
/// from input validation).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IsoError {
    #[error("Validation: {0}")]
    Validation(String),
    #[error("Format: {0}")]
    Format(String),
    #[error("Truncated: {0}")]
    Truncation(String),
    #[error("Schema defect: {0}")]
    SchemaDefect(String),
}
