//! Message parse fuzz target: feed arbitrary text to Message::parse with the
//! standard dictionary. The parser must not panic; it should return Ok or Err.
//! Build with: cargo fuzz run parse_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let dict = isopack::Dictionary::standard();
    let _ = isopack::Message::parse(s, &dict.schema, &dict.mtis);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parse_fuzz");
}
