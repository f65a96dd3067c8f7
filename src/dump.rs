//! Format a parsed message for display: MTI, bitmap, one line per element.

use crate::message::Message;
use crate::schema::{LengthSpec, Schema};
use std::fmt::Write;

/// Render a message as a field table. Elements whose schema entry has been
/// removed since parsing are rendered with a `?` type column rather than
/// failing; display is best-effort.
pub fn dump_message(message: &Message, schema: &Schema) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "MTI:    {}", message.mti());
    let _ = writeln!(out, "Bitmap: {}", message.bitmap().as_hex_string());
    for element in message.elements() {
        let type_tag = schema
            .get(element.field())
            .map(|spec| spec.data_type.tag())
            .unwrap_or("?");
        let length = match element.length_spec() {
            LengthSpec::Fixed(n) => format!("fixed({})", n),
            LengthSpec::Variable { prefix_digits, max } => {
                format!("var({}, {})", prefix_digits, max)
            }
        };
        let _ = writeln!(
            out,
            "F{:03}  {:<4} {:<12} {:?}",
            element.field(),
            type_tag,
            length,
            element.value()
        );
    }
    out
}
