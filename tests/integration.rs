//! Integration tests: data element codec properties, full-message parsing
//! against the standard dictionary, serialization round trips, and the error
//! taxonomy (validation vs format vs truncation vs schema defect).

use isopack::{
    DataElement, DataType, Dictionary, FieldSpec, IsoError, LengthSpec, Message, MtiSet, Schema,
};

/// Financial request carrying fields 3, 4, 7, 11 (fixed numeric), 44 (2-digit
/// length prefix) and 105 (3-digit length prefix, secondary bitmap).
const FINANCIAL_0200: &str = concat!(
    "0200",
    "B2200000001000000000000000800000",
    "000123",
    "000000000123",
    "0000000123",
    "000123",
    "14Value for DE44",
    "027This is the value for DE105",
);

/// Network management request, primary bitmap only.
const NETWORK_0800: &str = concat!(
    "0800",
    "2238000000800000",
    "9A000009031749581749581749580903FG001234",
);

fn numeric_fixed(width: usize) -> FieldSpec {
    FieldSpec {
        data_type: DataType::Numeric,
        length: LengthSpec::Fixed(width),
    }
}

fn alnum_var(prefix_digits: u8, max: usize) -> FieldSpec {
    FieldSpec {
        data_type: DataType::AlphaNumeric,
        length: LengthSpec::Variable { prefix_digits, max },
    }
}

// -----------------------------------------------------------------------------
// Data element codec
// -----------------------------------------------------------------------------

#[test]
fn fixed_numeric_pads_and_round_trips() {
    let spec = numeric_fixed(6);
    let encoded = DataElement::encode(3, "123", &spec).expect("encode");
    assert_eq!(encoded.wire_value(), "000123");
    assert_eq!(encoded.value(), "123");

    let (decoded, cursor) = DataElement::decode(3, "000123", 0, &spec).expect("decode");
    assert_eq!(decoded.value(), "123");
    assert_eq!(decoded.wire_value(), "000123");
    assert_eq!(cursor, 6);
}

#[test]
fn fixed_alnum_space_pads_and_trims() {
    let spec = FieldSpec {
        data_type: DataType::AlphaNumeric,
        length: LengthSpec::Fixed(6),
    };
    let encoded = DataElement::encode(38, "AB1", &spec).expect("encode");
    assert_eq!(encoded.wire_value(), "AB1   ");

    let (decoded, cursor) = DataElement::decode(38, "AB1   ", 0, &spec).expect("decode");
    assert_eq!(decoded.value(), "AB1");
    assert_eq!(cursor, 6);
}

#[test]
fn variable_prefixes_length_and_round_trips() {
    let spec = alnum_var(1, 9);
    let encoded = DataElement::encode(44, "AB", &spec).expect("encode");
    assert_eq!(encoded.wire_value(), "2AB");

    let (decoded, cursor) = DataElement::decode(44, "2AB", 0, &spec).expect("decode");
    assert_eq!(decoded.value(), "AB");
    assert_eq!(cursor, 3);
}

#[test]
fn variable_value_over_max_rejected() {
    let spec = alnum_var(1, 3);
    let err = DataElement::encode(44, "ABCD", &spec).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

#[test]
fn variable_declared_length_over_max_rejected() {
    let spec = alnum_var(1, 3);
    let err = DataElement::decode(44, "5ABCDE", 0, &spec).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

#[test]
fn non_numeric_length_prefix_is_a_format_error() {
    let spec = alnum_var(2, 25);
    let err = DataElement::decode(44, "XAValue", 0, &spec).unwrap_err();
    assert!(matches!(err, IsoError::Format(_)), "{:?}", err);
}

#[test]
fn short_stream_is_a_truncation_error() {
    let spec = numeric_fixed(6);
    let err = DataElement::decode(3, "123", 0, &spec).unwrap_err();
    assert!(matches!(err, IsoError::Truncation(_)), "{:?}", err);

    // declared length larger than what remains
    let spec = alnum_var(2, 25);
    let err = DataElement::decode(44, "09AB", 0, &spec).unwrap_err();
    assert!(matches!(err, IsoError::Truncation(_)), "{:?}", err);
}

#[test]
fn value_outside_character_class_rejected_on_encode() {
    let err = DataElement::encode(3, "12A", &numeric_fixed(6)).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

#[test]
fn fixed_value_longer_than_width_rejected() {
    let err = DataElement::encode(3, "1234567", &numeric_fixed(6)).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

#[test]
fn field_one_is_never_an_element() {
    let err = DataElement::encode(1, "0", &numeric_fixed(1)).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
    let err = DataElement::decode(1, "0", 0, &numeric_fixed(1)).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

#[test]
fn broken_length_specs_fail_loudly() {
    let bad_prefix = FieldSpec {
        data_type: DataType::AlphaNumeric,
        length: LengthSpec::Variable {
            prefix_digits: 4,
            max: 9999,
        },
    };
    let err = DataElement::encode(44, "AB", &bad_prefix).unwrap_err();
    assert!(matches!(err, IsoError::Format(_)), "{:?}", err);

    let unrepresentable_max = FieldSpec {
        data_type: DataType::AlphaNumeric,
        length: LengthSpec::Variable {
            prefix_digits: 2,
            max: 150,
        },
    };
    let err = DataElement::encode(44, "AB", &unrepresentable_max).unwrap_err();
    assert!(matches!(err, IsoError::SchemaDefect(_)), "{:?}", err);
}

#[test]
fn numeric_clean_values_stay_exact_decimal_strings() {
    let spec = numeric_fixed(16);
    // long digit strings survive without precision loss
    let (decoded, _) = DataElement::decode(87, "0091234567890123", 0, &spec).expect("decode");
    assert_eq!(decoded.value(), "91234567890123");
    // all zeros reduce to a single zero
    let (decoded, _) = DataElement::decode(87, "0000000000000000", 0, &spec).expect("decode");
    assert_eq!(decoded.value(), "0");
}

#[test]
fn track_data_passes_through_unvalidated() {
    let spec = FieldSpec {
        data_type: DataType::TrackData,
        length: LengthSpec::Variable {
            prefix_digits: 2,
            max: 37,
        },
    };
    let encoded = DataElement::encode(35, "4000001234567899=991233000123", &spec).expect("encode");
    assert_eq!(encoded.wire_value(), "294000001234567899=991233000123");
}

// -----------------------------------------------------------------------------
// Message parsing
// -----------------------------------------------------------------------------

#[test]
fn parse_financial_request() {
    let dict = Dictionary::standard();
    let message = Message::parse(FINANCIAL_0200, &dict.schema, &dict.mtis).expect("parse");

    assert_eq!(message.mti(), "0200");
    assert!(message.bitmap().has_secondary());
    assert_eq!(message.bitmap().present_fields(), vec![3, 4, 7, 11, 44, 105]);
    assert_eq!(message.element_count(), 6);
    assert_eq!(message.value(3), Some("123"));
    assert_eq!(message.value(4), Some("123"));
    assert_eq!(message.value(7), Some("123"));
    assert_eq!(message.value(11), Some("123"));
    assert_eq!(message.value(44), Some("Value for DE44"));
    assert_eq!(message.value(105), Some("This is the value for DE105"));
    assert_eq!(message.value(2), None);
}

#[test]
fn parse_network_request() {
    let dict = Dictionary::standard();
    let message = Message::parse(NETWORK_0800, &dict.schema, &dict.mtis).expect("parse");

    assert_eq!(message.mti(), "0800");
    assert!(!message.bitmap().has_secondary());
    assert_eq!(
        message.bitmap().present_fields(),
        vec![3, 7, 11, 12, 13, 41]
    );
    // decoding does not re-apply the character class; the raw capture carries
    // letters in a numeric field
    assert_eq!(message.value(3), Some("9A0000"));
    assert_eq!(message.value(7), Some("903174958"));
    assert_eq!(message.value(13), Some("903"));
    assert_eq!(message.value(41), Some("FG001234"));
}

#[test]
fn parse_serialize_round_trip_is_identity() {
    let dict = Dictionary::standard();
    let message = Message::parse(FINANCIAL_0200, &dict.schema, &dict.mtis).expect("parse");
    let wire = message.serialize(&dict.schema).expect("serialize");
    assert_eq!(wire, FINANCIAL_0200);
}

#[test]
fn bitmap_accessors_split_primary_and_secondary() {
    let dict = Dictionary::standard();
    let message = Message::parse(FINANCIAL_0200, &dict.schema, &dict.mtis).expect("parse");
    assert_eq!(message.primary_bitmap_hex(), "B220000000100000");
    assert_eq!(message.secondary_bitmap_hex().as_deref(), Some("0000000000800000"));
    assert_eq!(message.primary_bitmap_binary().len(), 64);

    let message = Message::parse(NETWORK_0800, &dict.schema, &dict.mtis).expect("parse");
    assert_eq!(message.primary_bitmap_hex(), "2238000000800000");
    assert_eq!(message.secondary_bitmap_hex(), None);
}

#[test]
fn parse_rejects_unknown_mti() {
    let dict = Dictionary::standard();
    let err = Message::parse(
        "09002238000000800000",
        &dict.schema,
        &dict.mtis,
    )
    .unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

#[test]
fn parse_rejects_textual_header() {
    let dict = Dictionary::standard();
    let raw = format!("ISO0150000{}", NETWORK_0800);
    let err = Message::parse(&raw, &dict.schema, &dict.mtis).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

#[test]
fn parse_rejects_non_ascii_stream() {
    let dict = Dictionary::standard();
    let err = Message::parse("0200é", &dict.schema, &dict.mtis).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

#[test]
fn parse_truncated_inputs() {
    let dict = Dictionary::standard();
    // shorter than the MTI
    let err = Message::parse("02", &dict.schema, &dict.mtis).unwrap_err();
    assert!(matches!(err, IsoError::Truncation(_)), "{:?}", err);
    // bitmap cut short
    let err = Message::parse("0200223800", &dict.schema, &dict.mtis).unwrap_err();
    assert!(matches!(err, IsoError::Truncation(_)), "{:?}", err);
    // last field cut short
    let cut = &FINANCIAL_0200[..FINANCIAL_0200.len() - 5];
    let err = Message::parse(cut, &dict.schema, &dict.mtis).unwrap_err();
    assert!(matches!(err, IsoError::Truncation(_)), "{:?}", err);
}

#[test]
fn variable_field_first_in_stream_uses_the_same_cursor_rule() {
    // fields 2 (variable, first in the stream) and 3 (fixed) present
    let mut schema = Schema::new();
    schema
        .define(
            2,
            FieldSpec {
                data_type: DataType::Numeric,
                length: LengthSpec::Variable {
                    prefix_digits: 2,
                    max: 19,
                },
            },
        )
        .expect("define 2");
    schema.define(3, numeric_fixed(6)).expect("define 3");
    let mut mtis = MtiSet::new();
    mtis.permit("0200").expect("mti");

    let raw = concat!("0200", "6000000000000000", "0512345", "000042");
    let message = Message::parse(raw, &schema, &mtis).expect("parse");
    assert_eq!(message.value(2), Some("12345"));
    assert_eq!(message.value(3), Some("42"));

    let wire = message.serialize(&schema).expect("serialize");
    assert_eq!(wire, raw);
}

#[test]
fn parse_fails_when_a_present_field_has_no_schema_entry() {
    // field 3 present in the bitmap but not defined in the schema
    let mut schema = Schema::new();
    schema.define(2, numeric_fixed(4)).expect("define 2");
    let mut mtis = MtiSet::new();
    mtis.permit("0200").expect("mti");

    let err = Message::parse("02002000000000000000000042", &schema, &mtis).unwrap_err();
    assert!(matches!(err, IsoError::Validation(_)), "{:?}", err);
}

// -----------------------------------------------------------------------------
// Message assembly
// -----------------------------------------------------------------------------

#[test]
fn assemble_serialize_parse_round_trip() {
    let dict = Dictionary::standard();
    let mut message = Message::new("0200", &dict.mtis).expect("new");
    message.add_element(3, "123", &dict.schema).expect("add 3");
    message.add_element(4, "123", &dict.schema).expect("add 4");
    message.add_element(7, "123", &dict.schema).expect("add 7");
    message.add_element(11, "123", &dict.schema).expect("add 11");
    message
        .add_element(44, "Value for DE44", &dict.schema)
        .expect("add 44");
    message
        .add_element(105, "This is the value for DE105", &dict.schema)
        .expect("add 105");

    let wire = message.serialize(&dict.schema).expect("serialize");
    assert_eq!(wire, FINANCIAL_0200);

    let reparsed = Message::parse(&wire, &dict.schema, &dict.mtis).expect("reparse");
    assert_eq!(reparsed.mti(), message.mti());
    assert_eq!(
        reparsed.bitmap().present_fields(),
        message.bitmap().present_fields()
    );
    for element in message.elements() {
        assert_eq!(reparsed.value(element.field()), Some(element.value()));
    }
}

#[test]
fn assembly_keeps_bitmap_in_sync_with_elements() {
    let dict = Dictionary::standard();
    let mut message = Message::new("0800", &dict.mtis).expect("new");
    assert!(message.bitmap().present_fields().is_empty());

    message.add_element(70, "301", &dict.schema).expect("add 70");
    assert_eq!(message.bitmap().present_fields(), vec![70]);
    assert!(message.bitmap().has_secondary());

    message.add_element(11, "000001", &dict.schema).expect("add 11");
    assert_eq!(message.bitmap().present_fields(), vec![11, 70]);
}

#[test]
fn assembly_rejects_bad_mti_and_fields() {
    let dict = Dictionary::standard();
    assert!(Message::new("9999", &dict.mtis).is_err());

    let mut message = Message::new("0200", &dict.mtis).expect("new");
    assert!(message.add_element(1, "0", &dict.schema).is_err());
    assert!(message.add_element(200, "0", &dict.schema).is_err());
    assert!(message.add_element(3, "not numeric", &dict.schema).is_err());
}

#[test]
fn dump_lists_every_field() {
    let dict = Dictionary::standard();
    let message = Message::parse(NETWORK_0800, &dict.schema, &dict.mtis).expect("parse");
    let text = isopack::dump::dump_message(&message, &dict.schema);
    assert!(text.contains("MTI:    0800"), "{}", text);
    assert!(text.contains("Bitmap: 2238000000800000"), "{}", text);
    assert!(text.contains("F041"), "{}", text);
    assert!(text.contains("\"FG001234\""), "{}", text);
}

#[test]
fn custom_dictionary_admits_custom_mtis() {
    let dict = isopack::parse(
        "mti 1800;\n\
         field 3: n, fixed(6);\n\
         field 11: n, fixed(6);\n",
    )
    .expect("parse dictionary");

    let mut message = Message::new("1800", &dict.mtis).expect("new");
    message.add_element(3, "301", &dict.schema).expect("add");
    message.add_element(11, "42", &dict.schema).expect("add");
    let wire = message.serialize(&dict.schema).expect("serialize");
    assert_eq!(wire, "18002020000000000000000301000042");

    // the standard set does not know 1800
    let standard = Dictionary::standard();
    assert!(Message::parse(&wire, &standard.schema, &standard.mtis).is_err());
}
