use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteValueRef},
    Decode, Encode, Sqlite,
};

use super::{coerced, decode_text};
use crate::{error::ConversionError, storage::StorageClass};

const TARGET: &str = "NullInt64";

nullable! {
    /// A nullable 64-bit signed integer.
    #[derive(Copy)]
    NullInt64(i64),
    zero: 0,
    accepts: Integer | Real | Text | Blob
}

impl Eq for NullInt64 {}

impl<'q> Encode<'q, Sqlite> for NullInt64 {
    fn encode_by_ref(&self, args: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        if !self.present {
            return IsNull::Yes;
        }
        args.push(SqliteArgumentValue::Int64(self.value));

        IsNull::No
    }
}

impl<'r> Decode<'r, Sqlite> for NullInt64 {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let v = match StorageClass::of_value(&value) {
            StorageClass::Null => return Ok(Self::NULL),
            StorageClass::Integer => <i64 as Decode<Sqlite>>::decode(value)?,
            class @ StorageClass::Real => {
                coerced(class, TARGET);
                let f = <f64 as Decode<Sqlite>>::decode(value)?;
                integral(f).ok_or_else(|| {
                    ConversionError::value(TARGET, f.to_string(), "not an integral value in range")
                })?
            }
            class @ (StorageClass::Text | StorageClass::Blob) => {
                coerced(class, TARGET);
                let text = decode_text(value, TARGET)?;
                text.parse::<i64>()
                    .map_err(|e| ConversionError::value(TARGET, text, e))?
            }
            class => return Err(ConversionError::data_type(TARGET, class).into()),
        };
        Ok(Self::new(v))
    }
}

/// The integer a float holds, if it holds one exactly.
fn integral(f: f64) -> Option<i64> {
    // i64::MAX is not representable; 2^63 is the first float out of range.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl Serialize for NullInt64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.present {
            serializer.serialize_i64(self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullInt64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<i64>::deserialize(deserializer).map(Self::from)
    }
}
