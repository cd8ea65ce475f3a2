use std::borrow::Cow;

use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteValueRef},
    Decode, Encode, Sqlite, ValueRef,
};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime, UtcOffset,
};

use super::{coerced, lossy_text};
use crate::{error::ConversionError, storage::StorageClass};

const TARGET: &str = "NullTime";

/// Signed-year layout for timestamps RFC 3339 cannot hold. The driver's text decoder reads it.
const EXTENDED: &[BorrowedFormatItem<'_>] = format_description!(
    "[year sign:mandatory]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
);

nullable! {
    /// A nullable timestamp with an offset.
    ///
    /// The zero value is the Unix epoch. Values decoded from the database keep the offset they
    /// were stored with; compare instants (which `==` does) or convert with
    /// [`OffsetDateTime::to_offset`] when a fixed offset is needed. JSON output is always UTC.
    ///
    /// Timestamps are written as RFC 3339. Those it cannot express (years before 0000, offsets
    /// past 23 hours) are written with a signed year instead, e.g. `-0001-06-01T00:00:00.0+00:00`,
    /// and read back from either channel. Offsets with seconds are written in UTC.
    #[derive(Copy)]
    NullTime(OffsetDateTime),
    zero: OffsetDateTime::UNIX_EPOCH,
    accepts: Text | Integer
}

impl Eq for NullTime {}

/// Whether RFC 3339 can express `dt` as is.
fn fits_rfc3339(dt: &OffsetDateTime) -> bool {
    let offset = dt.offset();
    (0..10_000).contains(&dt.year())
        && offset.whole_hours().unsigned_abs() <= 23
        && offset.seconds_past_minute() == 0
}

/// Format `dt` as RFC 3339, or in the signed-year layout when RFC 3339 cannot hold it.
fn format_timestamp(dt: OffsetDateTime) -> Result<String, time::error::Format> {
    // Neither layout has offset seconds.
    let dt = if dt.offset().seconds_past_minute() != 0 {
        dt.checked_to_offset(UtcOffset::UTC).unwrap_or(dt)
    } else {
        dt
    };
    if fits_rfc3339(&dt) {
        dt.format(&Rfc3339)
    } else {
        dt.format(EXTENDED)
    }
}

fn parse_timestamp(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(text, &Rfc3339).or_else(|_| OffsetDateTime::parse(text, EXTENDED))
}

impl<'q> Encode<'q, Sqlite> for NullTime {
    fn encode_by_ref(&self, args: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        if !self.present {
            return IsNull::Yes;
        }
        if fits_rfc3339(&self.value) {
            return <OffsetDateTime as Encode<'q, Sqlite>>::encode_by_ref(&self.value, args);
        }
        match format_timestamp(self.value) {
            Ok(text) => {
                args.push(SqliteArgumentValue::Text(Cow::Owned(text)));
                IsNull::No
            }
            Err(e) => {
                log::error!("cannot bind {:?} as text: {e}", self.value);
                IsNull::Yes
            }
        }
    }
}

impl<'r> Decode<'r, Sqlite> for NullTime {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        match StorageClass::of_value(&value) {
            StorageClass::Null => Ok(Self::NULL),
            class @ (StorageClass::Text | StorageClass::Integer) => {
                if class == StorageClass::Integer {
                    coerced(class, TARGET);
                }
                let raw = ValueRef::to_owned(&value);
                let dt = <OffsetDateTime as Decode<Sqlite>>::decode(value).map_err(|e| {
                    ConversionError::value(TARGET, lossy_text(sqlx::Value::as_ref(&raw)), e)
                })?;
                Ok(Self::new(dt))
            }
            class => Err(ConversionError::data_type(TARGET, class).into()),
        }
    }
}

impl Serialize for NullTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.present {
            return serializer.serialize_none();
        }
        let utc = self
            .value
            .checked_to_offset(UtcOffset::UTC)
            .unwrap_or(self.value);
        let text = format_timestamp(utc).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for NullTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse_timestamp(&text)
                .map(Self::new)
                .map_err(|e| D::Error::custom(format!("invalid timestamp {text:?}: {e}"))),
            None => Ok(Self::NULL),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn json_is_utc_rfc3339() {
        let t = NullTime::new(datetime!(2009-01-03 18:15:05 UTC));
        assert_eq!(serde_json::to_string(&t).unwrap(), r#""2009-01-03T18:15:05Z""#);

        let shifted = NullTime::new(datetime!(2009-01-03 19:15:05 +1));
        assert_eq!(
            serde_json::to_string(&shifted).unwrap(),
            r#""2009-01-03T18:15:05Z""#
        );
    }

    #[test]
    fn json_keeps_subseconds() {
        let t = NullTime::new(datetime!(2009-01-03 18:15:05.25 UTC));
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#""2009-01-03T18:15:05.25Z""#);
        assert_eq!(serde_json::from_str::<NullTime>(&json).unwrap(), t);
    }

    #[test]
    fn json_keeps_offsets_on_decode() {
        let t: NullTime = serde_json::from_str(r#""2009-01-03T20:15:05+02:00""#).unwrap();
        assert_eq!(t.value.offset(), UtcOffset::from_hms(2, 0, 0).unwrap());
        assert_eq!(t, NullTime::new(datetime!(2009-01-03 18:15:05 UTC)));
    }

    #[test]
    fn zero_is_epoch() {
        assert_eq!(NullTime::NULL.value, OffsetDateTime::UNIX_EPOCH);
        let epoch = NullTime::new(OffsetDateTime::UNIX_EPOCH);
        let json = serde_json::to_string(&epoch).unwrap();
        assert_eq!(json, r#""1970-01-01T00:00:00Z""#);
        assert_eq!(serde_json::from_str::<NullTime>(&json).unwrap(), epoch);
        assert_ne!(epoch, NullTime::NULL);
    }

    #[test]
    fn json_rejects_bad_input() {
        assert!(serde_json::from_str::<NullTime>(r#""yesterday""#).is_err());
        assert!(serde_json::from_str::<NullTime>(r#""2009-01-03 18:15:05""#).is_err());
        assert!(serde_json::from_str::<NullTime>("1230999305").is_err());
    }

    #[test]
    fn json_writes_signed_years() {
        let t = NullTime::new(datetime!(-0001-06-01 0:00 UTC));
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#""-0001-06-01T00:00:00.0+00:00""#);
        assert_eq!(serde_json::from_str::<NullTime>(&json).unwrap(), t);

        let last = NullTime::new(datetime!(9999-12-31 23:59:59 UTC));
        assert_eq!(
            serde_json::to_string(&last).unwrap(),
            r#""9999-12-31T23:59:59Z""#
        );
    }

    #[test]
    fn signed_years_only_when_needed() {
        assert!(fits_rfc3339(&datetime!(0000-01-01 0:00 UTC)));
        assert!(fits_rfc3339(&datetime!(9999-12-31 23:59:59 -23:59)));
        assert!(!fits_rfc3339(&datetime!(-0001-06-01 0:00 UTC)));
        assert!(!fits_rfc3339(&datetime!(2009-01-03 18:15:05 +1:00:30)));

        assert_eq!(
            format_timestamp(datetime!(-0044-03-15 12:30:00.5 +2)).unwrap(),
            "-0044-03-15T12:30:00.5+02:00"
        );
        let odd = datetime!(2009-01-03 18:15:05 +1:00:30);
        let text = format_timestamp(odd).unwrap();
        assert_eq!(text, "2009-01-03T17:14:35Z");
        assert_eq!(parse_timestamp(&text).unwrap(), odd);
    }
}
