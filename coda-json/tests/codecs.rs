use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use coda_json::{
    CodecProvider, EmptyContext, EnumCodec, JsonErrorKind, Registry, Value, codable_scalar,
    from_str, from_str_with_registry, to_string, to_string_with_registry,
};
use coda_testhelpers::test;
use indexmap::IndexMap;
use insta::assert_snapshot;

#[test]
fn range_keys_follow_declaration_order() {
    assert_eq!(to_string(&(0..=1)).unwrap(), r#"{"start":0,"endInclusive":1}"#);

    let range: RangeInclusive<i64> =
        from_str(r#"{"endInclusive": 9000000000, "note": [1, {}], "start": -3}"#).unwrap();
    assert_eq!(range, -3..=9_000_000_000);

    // empty ranges are representable
    let empty: RangeInclusive<i32> = from_str(r#"{"start":5,"endInclusive":4}"#).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn range_bounds_are_required() {
    let err = from_str::<RangeInclusive<i32>>(r#"{"start": 0}"#).unwrap_err();
    assert_snapshot!(err.to_string(), @"missing required field `endInclusive` for IntRange");

    let err = from_str::<RangeInclusive<i64>>(r#"{"endInclusive": 0}"#).unwrap_err();
    assert!(matches!(
        err.kind,
        JsonErrorKind::MissingRequiredField { field: "start", .. }
    ));

    let err = from_str::<RangeInclusive<i32>>(r#"{"start": 0, "endInclusive": 1.5}"#).unwrap_err();
    assert_eq!(err.kind.code(), "json::number_out_of_range");
}

#[test]
fn options() {
    let values: Vec<Option<bool>> = from_str("[true, null, false]").unwrap();
    assert_eq!(values, [Some(true), None, Some(false)]);
    assert_eq!(to_string(&values).unwrap(), "[true,null,false]");

    let absent: Option<String> = from_str("null").unwrap();
    assert_eq!(absent, None);
}

#[test]
fn hash_maps() {
    let mut map = HashMap::new();
    map.insert("only".to_string(), vec![1.5f64, -2.0]);
    let text = to_string(&map).unwrap();
    assert_eq!(text, r#"{"only":[1.5,-2.0]}"#);
    let back: HashMap<String, Vec<f64>> = from_str(&text).unwrap();
    assert_eq!(back, map);
}

#[test]
fn insertion_order_survives_round_trips() {
    let text = r#"{"z":1,"a":2,"m":3}"#;
    let map: IndexMap<String, u8> = from_str(text).unwrap();
    assert_eq!(to_string(&map).unwrap(), text);

    let sorted: BTreeMap<String, u8> = from_str(text).unwrap();
    assert_eq!(to_string(&sorted).unwrap(), r#"{"a":2,"m":3,"z":1}"#);
}

#[test]
fn scalars() {
    assert_eq!(from_str::<char>(r#""é""#).unwrap(), 'é');
    assert_eq!(from_str::<char>(r#""ab""#).unwrap_err().kind.code(), "json::invalid_value");
    assert_eq!(
        from_str::<i128>("-170141183460469231731687303715884105728").unwrap(),
        i128::MIN
    );
    assert_eq!(from_str::<u32>("-0").unwrap(), 0);
    assert_eq!(from_str::<Vec<u8>>("[-0, 0]").unwrap(), [0, 0]);
    assert_eq!(from_str::<f32>("0.25").unwrap(), 0.25);
    assert_eq!(to_string(&u64::MAX).unwrap(), "18446744073709551615");
    assert_eq!(to_string(&"tab\there".to_string()).unwrap(), r#""tab\there""#);

    let err = from_str::<u8>("256").unwrap_err();
    assert_snapshot!(err.to_string(), @"number `256` out of range for u8");
    assert_eq!(err.offset, Some(0));

    let err = to_string(&f64::INFINITY).unwrap_err();
    assert_eq!(err.kind.code(), "json::non_finite_number");
}

#[test]
fn dynamic_values_round_trip() {
    let text = r#"{"a":[1,-2,18446744073709551615,0.5],"b":{"c":null,"d":"e"}}"#;
    let value: Value = from_str(text).unwrap();
    assert_eq!(to_string(&value).unwrap(), text);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Weekday {
    Monday,
    Tuesday,
    Sunday,
}
codable_scalar!(Weekday => "DayOfWeek");

fn weekdays() -> Registry {
    Registry::builder()
        .provider(CodecProvider::new().with_codec(EnumCodec::new([
            ("MONDAY", Weekday::Monday),
            ("TUESDAY", Weekday::Tuesday),
            ("SUNDAY", Weekday::Sunday),
        ])))
        .build()
}

#[test]
fn enumerations() {
    let registry = weekdays();
    let days: BTreeMap<String, Weekday> = from_str_with_registry(
        r#"{"start": "MONDAY", "rest": "SUNDAY"}"#,
        &registry,
        &EmptyContext,
    )
    .unwrap();
    assert_eq!(days["start"], Weekday::Monday);
    assert_eq!(
        to_string_with_registry(&vec![Weekday::Tuesday], &registry, &EmptyContext).unwrap(),
        r#"["TUESDAY"]"#
    );

    let err = from_str_with_registry::<Weekday>(r#""FUNDAY""#, &registry, &EmptyContext)
        .unwrap_err();
    assert_snapshot!(err.to_string(), @r#"unknown value "FUNDAY" for DayOfWeek"#);
}
