//! Array, struct and JSON payloads in each dialect's wire syntax.

mod common;
use common::*;

use oxide_dialect_core::codec::{
    ArrayCodec, EmbeddableSchema, Field, Kind, SerdeJsonMapper, StructCodec, StructSchema, Value,
};
use chrono::NaiveDate;
use oxide_dialect_core::dialect::{ArrayLiteralStyle, StructLiteralStyle};
use oxide_dialect_core::{DialectError, DialectFamily};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn text_or_null() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<String>().prop_map(Value::Text),
        Just(Value::Text(String::from("NULL"))),
    ]
}

const KINDS: [Kind; 6] = [
    Kind::Boolean,
    Kind::Integer,
    Kind::Float,
    Kind::Text,
    Kind::Date,
    Kind::Timestamp,
];

const ARRAY_STYLES: [ArrayLiteralStyle; 3] = [
    ArrayLiteralStyle::Braces,
    ArrayLiteralStyle::ArrayConstructor,
    ArrayLiteralStyle::TypeConstructor,
];

fn date() -> impl Strategy<Value = NaiveDate> {
    (1900..2100_i32, 1..=12_u32, 1..=28_u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Non-null values of one kind. Floats are multiples of 1/8 so their
/// decimal and JSON text is exact.
fn value_of(kind: Kind) -> BoxedStrategy<Value> {
    match kind {
        Kind::Boolean => any::<bool>().prop_map(Value::Boolean).boxed(),
        Kind::Integer => any::<i64>().prop_map(Value::Integer).boxed(),
        Kind::Float => (-1_000_000..1_000_000_i32)
            .prop_map(|n| Value::Float(f64::from(n) / 8.0))
            .boxed(),
        Kind::Text => any::<String>().prop_map(Value::Text).boxed(),
        Kind::Date => date().prop_map(Value::Date).boxed(),
        Kind::Timestamp => (date(), 0..24_u32, 0..60_u32, 0..60_u32, 0..1000_u32)
            .prop_map(|(d, h, m, s, ms)| {
                Value::Timestamp(d.and_hms_milli_opt(h, m, s, ms).unwrap())
            })
            .boxed(),
    }
}

/// A declared attribute and a value for it. Absent values are NULL and
/// force a nullable declaration.
fn attribute() -> impl Strategy<Value = (Kind, bool, Value)> {
    prop::sample::select(KINDS.to_vec()).prop_flat_map(|kind| {
        (Just(kind), any::<bool>(), prop::option::of(value_of(kind))).prop_map(
            |(kind, nullable, value)| match value {
                Some(value) => (kind, nullable, value),
                None => (kind, true, Value::Null),
            },
        )
    })
}

fn fields_and_values(attributes: Vec<(Kind, bool, Value)>) -> (Vec<Field>, Vec<Value>) {
    attributes
        .into_iter()
        .enumerate()
        .map(|(i, (kind, nullable, value))| {
            let name = format!("f{i}");
            let field = if nullable {
                Field::new(name, kind)
            } else {
                Field::required(name, kind)
            };
            (field, value)
        })
        .unzip()
}

/// Attributes with a random physical order.
fn struct_case() -> impl Strategy<Value = (Vec<(Kind, bool, Value)>, Vec<usize>)> {
    prop::collection::vec(attribute(), 1..6).prop_flat_map(|attributes| {
        let order: Vec<usize> = (0..attributes.len()).collect();
        (Just(attributes), Just(order).prop_shuffle())
    })
}

fn array_case() -> impl Strategy<Value = (Kind, Vec<Value>)> {
    prop::sample::select(KINDS.to_vec()).prop_flat_map(|kind| {
        let element = prop::option::of(value_of(kind))
            .prop_map(|value| value.unwrap_or(Value::Null));
        (Just(kind), prop::collection::vec(element, 0..6))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn embeddables_round_trip_every_kind(attributes in prop::collection::vec(attribute(), 1..6)) {
        let (fields, values) = fields_and_values(attributes);
        let schema = EmbeddableSchema::new("Embedded", fields);
        let text = schema.encode(&values, &SerdeJsonMapper).unwrap();
        prop_assert_eq!(schema.decode(&text, &SerdeJsonMapper).unwrap(), values);
    }

    #[test]
    fn structs_round_trip_in_any_physical_order((attributes, order) in struct_case()) {
        let (fields, values) = fields_and_values(attributes);
        for style in [StructLiteralStyle::Record, StructLiteralStyle::TypeConstructor] {
            let schema = StructSchema::new("shape_t", fields.clone())
                .with_physical_order(order.clone())
                .unwrap();
            let codec = StructCodec::new(style, schema);
            let encoded = codec.encode(&values).unwrap();
            prop_assert_eq!(codec.decode(&encoded).unwrap(), values.clone(), "{:?}: {}", style, encoded);
        }
    }

    #[test]
    fn arrays_round_trip_every_kind((kind, values) in array_case()) {
        for style in ARRAY_STYLES {
            let codec = ArrayCodec::new(style, kind).named("item_list");
            let encoded = codec.encode(&values).unwrap();
            prop_assert_eq!(codec.decode(&encoded).unwrap(), values.clone(), "{:?}: {}", style, encoded);
        }
    }

    #[test]
    fn decoding_arbitrary_text_never_panics(text in any::<String>(), kind in prop::sample::select(KINDS.to_vec())) {
        for style in ARRAY_STYLES {
            let codec = ArrayCodec::new(style, kind).named("item_list");
            for candidate in [text.clone(), format!("ARRAY[{text}"), format!("{{{text}"), format!("item_list({text})")] {
                let _ = codec.decode(&candidate);
            }
        }
        let schema = StructSchema::new("shape_t", vec![Field::new("a", kind), Field::new("b", Kind::Text)]);
        for style in [StructLiteralStyle::Record, StructLiteralStyle::TypeConstructor] {
            let codec = StructCodec::new(style, schema.clone());
            let _ = codec.decode(&text);
            let _ = codec.decode(&format!("({text})"));
            let _ = codec.decode(&format!("shape_t({text})"));
        }
    }

    #[test]
    fn brace_arrays_survive_any_text(values in prop::collection::vec(text_or_null(), 0..8)) {
        let codec = ArrayCodec::new(ArrayLiteralStyle::Braces, Kind::Text);
        let encoded = codec.encode(&values).unwrap();
        prop_assert_eq!(codec.decode(&encoded).unwrap(), values);
    }

    #[test]
    fn constructor_arrays_survive_any_text(values in prop::collection::vec(text_or_null(), 0..8)) {
        let codec = ArrayCodec::new(ArrayLiteralStyle::ArrayConstructor, Kind::Text);
        let encoded = codec.encode(&values).unwrap();
        prop_assert_eq!(codec.decode(&encoded).unwrap(), values);
    }

    #[test]
    fn embeddables_keep_declared_order(amount in any::<i64>(), currency in any::<String>()) {
        let schema = EmbeddableSchema::new(
            "Money",
            vec![Field::required("amount", Kind::Integer), Field::new("currency", Kind::Text)],
        );
        let values = vec![Value::Integer(amount), Value::Text(currency)];
        let text = schema.encode(&values, &SerdeJsonMapper).unwrap();
        prop_assert!(text.starts_with(r#"{"amount":"#), "{}", text);
        prop_assert_eq!(schema.decode(&text, &SerdeJsonMapper).unwrap(), values);
    }
}

#[test]
fn dialect_array_syntax() {
    let values = vec![Value::Integer(1), Value::Null, Value::Integer(3)];

    let pg = dialect(DialectFamily::PostgreSql, "16");
    let codec = ArrayCodec::new(pg.config().array_literal, Kind::Integer);
    assert_eq!(codec.encode(&values).unwrap(), "{1,NULL,3}");

    let h2 = dialect(DialectFamily::H2, "2.2");
    let codec = ArrayCodec::new(h2.config().array_literal, Kind::Integer);
    assert_eq!(codec.encode(&values).unwrap(), "ARRAY[1, NULL, 3]");

    let oracle = dialect(DialectFamily::Oracle, "19");
    let codec = ArrayCodec::new(oracle.config().array_literal, Kind::Integer).named("num_list");
    assert_eq!(codec.encode(&values).unwrap(), "num_list(1, NULL, 3)");
    assert_eq!(codec.decode("num_list(1, NULL, 3)").unwrap(), values);

    let mysql = dialect(DialectFamily::MySql, "8.0.30");
    let codec = ArrayCodec::new(mysql.config().array_literal, Kind::Integer);
    assert!(matches!(codec.encode(&values), Err(DialectError::FormatMapper(_))));
}

#[test]
fn struct_physical_order() {
    let schema = StructSchema::new(
        "address_t",
        vec![
            Field::new("street", Kind::Text),
            Field::new("number", Kind::Integer),
            Field::new("city", Kind::Text),
        ],
    )
    .with_physical_order(vec![2, 0, 1])
    .unwrap();
    let pg = dialect(DialectFamily::PostgreSql, "16");
    let codec = StructCodec::new(pg.config().struct_literal, schema);

    let values = vec![
        Value::Text(String::from("Main St")),
        Value::Integer(12),
        Value::Text(String::from("Springfield")),
    ];
    let encoded = codec.encode(&values).unwrap();
    assert_eq!(encoded, r#"(Springfield,"Main St",12)"#);
    assert_eq!(codec.decode(&encoded).unwrap(), values);
}

#[test]
fn malformed_payloads_report_positions() {
    let codec = ArrayCodec::new(ArrayLiteralStyle::Braces, Kind::Integer);
    assert!(matches!(
        codec.decode("{1,2"),
        Err(DialectError::MalformedPayload { .. })
    ));
    assert!(matches!(
        codec.decode("{1,two}"),
        Err(DialectError::AttributeTypeMismatch { .. })
    ));
}
