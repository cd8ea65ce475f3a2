use std::fmt::Debug;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlnull::{NullBool, NullFloat64, NullInt64, NullString, NullTime, ParseError};
use time::macros::datetime;
use time::OffsetDateTime;

/// Marshal through a reference, a box and by value, then read the output back.
fn check<T>(value: T, want: &str)
where
    T: Serialize + DeserializeOwned + PartialEq + Debug,
{
    assert_eq!(serde_json::to_string(&&value).unwrap(), want, "by reference");
    assert_eq!(serde_json::to_string(&Box::new(&value)).unwrap(), want, "boxed");
    let out = serde_json::to_string(&value).unwrap();
    assert_eq!(out, want, "by value");

    let back: T = serde_json::from_str(&out).unwrap();
    assert_eq!(back, value);
}

#[test]
fn it_marshals_present_values() {
    check(NullBool::new(true), "true");
    check(NullFloat64::new(1.618), "1.618");
    check(NullInt64::new(4211223344), "4211223344");
    check(NullString::from("wow"), r#""wow""#);
    check(
        NullTime::new(datetime!(2009-01-03 18:15:05 UTC)),
        r#""2009-01-03T18:15:05Z""#,
    );
}

#[test]
fn it_marshals_absent_values() {
    check(NullBool::default(), "null");
    check(NullFloat64::default(), "null");
    check(NullInt64::default(), "null");
    check(NullString::default(), "null");
    check(NullTime::default(), "null");
}

#[test]
fn it_marshals_present_zero_values() {
    check(NullBool::new(false), "false");
    check(NullFloat64::new(0.0), "0.0");
    check(NullInt64::new(0), "0");
    check(NullString::from(""), r#""""#);
    check(
        NullTime::new(OffsetDateTime::UNIX_EPOCH),
        r#""1970-01-01T00:00:00Z""#,
    );
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
struct Payload {
    string_val: NullString,
    int64_val: NullInt64,
    float64_val: NullFloat64,
    time_val: NullTime,
    bool_val: NullBool,
}

#[test]
fn it_marshals_struct_fields() -> anyhow::Result<()> {
    let filled = Payload {
        string_val: NullString::from("wow"),
        int64_val: NullInt64::new(4211223344),
        float64_val: NullFloat64::new(1.618),
        time_val: NullTime::new(datetime!(2009-01-03 18:15:05 UTC)),
        bool_val: NullBool::new(true),
    };
    let json = serde_json::to_string(&filled)?;
    assert_eq!(
        json,
        r#"{"string_val":"wow","int64_val":4211223344,"float64_val":1.618,"time_val":"2009-01-03T18:15:05Z","bool_val":true}"#
    );
    assert_eq!(serde_json::from_str::<Payload>(&json)?, filled);

    let empty = serde_json::to_string(&Payload::default())?;
    assert_eq!(
        empty,
        r#"{"string_val":null,"int64_val":null,"float64_val":null,"time_val":null,"bool_val":null}"#
    );
    assert_eq!(serde_json::from_str::<Payload>(&empty)?, Payload::default());

    Ok(())
}

#[test]
fn it_treats_missing_fields_as_absent() -> anyhow::Result<()> {
    let payload: Payload = serde_json::from_str(r#"{"int64_val":7}"#)?;
    assert_eq!(
        payload,
        Payload {
            int64_val: NullInt64::new(7),
            ..Default::default()
        }
    );
    Ok(())
}

#[test]
fn it_rejects_malformed_payloads() {
    let err: ParseError =
        serde_json::from_str::<Payload>(r#"{"float64_val":"not-a-number"}"#).unwrap_err();
    assert!(err.is_data());

    assert!(serde_json::from_str::<Payload>(r#"{"bool_val":1}"#).is_err());
    assert!(serde_json::from_str::<Payload>(r#"{"int64_val":"4211223344"}"#).is_err());
    assert!(serde_json::from_str::<Payload>(r#"{"string_val":["wow"]}"#).is_err());
    assert!(serde_json::from_str::<Payload>(r#"{"time_val":"2009-13-03T18:15:05Z"}"#).is_err());

    let err = serde_json::from_str::<NullInt64>("nulx").unwrap_err();
    assert!(err.is_syntax());
}
