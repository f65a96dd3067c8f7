//! Decode an ISO-8583 message from the command line and print its fields.
//!
//! Usage: `isodump [--dict=FILE] RAW_MESSAGE`
//!
//! Without `--dict` the built-in ISO-8583 (1987) dictionary is used.

use isopack::{dump, Dictionary, Message};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let mut raw_args: Vec<String> = std::env::args().skip(1).collect();
    let dict_path: Option<PathBuf> = raw_args
        .iter()
        .position(|a| a.starts_with("--dict="))
        .and_then(|pos| {
            let arg = raw_args.remove(pos);
            arg.strip_prefix("--dict=").map(PathBuf::from)
        });
    let raw = raw_args
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: isodump [--dict=FILE] RAW_MESSAGE"))?;

    let dictionary = match dict_path {
        Some(path) => Dictionary::from_file(&path).map_err(|e| anyhow::anyhow!(e))?,
        None => Dictionary::standard().clone(),
    };

    let message = Message::parse(&raw, &dictionary.schema, &dictionary.mtis)?;
    print!("{}", dump::dump_message(&message, &dictionary.schema));
    Ok(())
}
