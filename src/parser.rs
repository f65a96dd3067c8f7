//! Parse field dictionary source into a [`Dictionary`] using PEST.
//!
//! The dictionary text format carries the two collaborator tables the core
//! consumes: the per-field schema and the permitted MTI set. The core never
//! reads files itself; it takes the materialized tables by reference.

use crate::schema::{DataType, FieldSpec, LengthSpec, MtiSet, Schema};
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::path::Path;
use std::sync::OnceLock;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct DictionaryParser;

/// A fully loaded field dictionary: schema plus permitted MTI set.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    pub schema: Schema,
    pub mtis: MtiSet,
}

impl Dictionary {
    /// Read and parse a dictionary file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Dictionary, String> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("read {}: {}", path.display(), e))?;
        parse(&source)
    }

    /// The built-in ISO-8583 (1987) dictionary, parsed once on first use.
    pub fn standard() -> &'static Dictionary {
        static STANDARD: OnceLock<Dictionary> = OnceLock::new();
        STANDARD.get_or_init(|| {
            parse(include_str!("../dictionaries/standard.dict"))
                .expect("embedded standard dictionary must parse")
        })
    }
}

/// Parse dictionary source into schema and MTI tables.
pub fn parse(source: &str) -> Result<Dictionary, String> {
    let pairs = DictionaryParser::parse(Rule::dictionary, source)
        .map_err(|e| format!("Parse error: {}", e))?;
    let root = pairs.into_iter().next().ok_or("Empty parse")?;

    let mut dictionary = Dictionary::default();
    for decl in root.into_inner() {
        match decl.as_rule() {
            Rule::mti_decl => {
                for code in decl.into_inner() {
                    if code.as_rule() == Rule::mti_code {
                        dictionary
                            .mtis
                            .permit(code.as_str())
                            .map_err(|e| e.to_string())?;
                    }
                }
            }
            Rule::field_decl => build_field(decl, &mut dictionary.schema)?,
            _ => {}
        }
    }
    Ok(dictionary)
}

fn build_field(
    pair: pest::iterators::Pair<Rule>,
    schema: &mut Schema,
) -> Result<(), String> {
    let mut inner = pair.into_inner();
    let number: u16 = inner
        .next()
        .ok_or("field: missing number")?
        .as_str()
        .parse()
        .map_err(|e| format!("field number: {}", e))?;
    let tag = inner.next().ok_or("field: missing type tag")?.as_str();
    let data_type =
        DataType::from_tag(tag).ok_or_else(|| format!("unknown data type tag: {}", tag))?;
    let spec_pair = inner.next().ok_or("field: missing length spec")?;
    let length = match spec_pair.as_rule() {
        Rule::fixed_spec => {
            let width = parse_number(spec_pair.into_inner().next(), "fixed length")?;
            LengthSpec::Fixed(width)
        }
        Rule::var_spec => {
            let mut nums = spec_pair.into_inner();
            let prefix_digits = parse_number(nums.next(), "prefix digits")?;
            let max = parse_number(nums.next(), "max length")?;
            LengthSpec::Variable {
                prefix_digits: prefix_digits as u8,
                max,
            }
        }
        other => return Err(format!("unexpected length spec: {:?}", other)),
    };
    schema
        .define(number, FieldSpec { data_type, length })
        .map_err(|e| e.to_string())
}

fn parse_number(
    pair: Option<pest::iterators::Pair<Rule>>,
    what: &str,
) -> Result<usize, String> {
    pair.ok_or_else(|| format!("missing {}", what))?
        .as_str()
        .parse()
        .map_err(|e| format!("{}: {}", what, e))
}
