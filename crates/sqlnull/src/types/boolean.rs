use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteValueRef},
    Decode, Encode, Sqlite,
};

use super::{coerced, decode_text};
use crate::{error::ConversionError, storage::StorageClass};

const TARGET: &str = "NullBool";

nullable! {
    /// A nullable boolean, stored by SQLite as the integer `0` or `1`.
    #[derive(Copy)]
    NullBool(bool),
    zero: false,
    accepts: Integer | Text | Blob
}

impl Eq for NullBool {}

impl<'q> Encode<'q, Sqlite> for NullBool {
    fn encode_by_ref(&self, args: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        if !self.present {
            return IsNull::Yes;
        }
        args.push(SqliteArgumentValue::Int(self.value.into()));

        IsNull::No
    }
}

impl<'r> Decode<'r, Sqlite> for NullBool {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let v = match StorageClass::of_value(&value) {
            StorageClass::Null => return Ok(Self::NULL),
            StorageClass::Integer => match <i64 as Decode<Sqlite>>::decode(value)? {
                0 => false,
                1 => true,
                n => return Err(ConversionError::value(TARGET, n.to_string(), "not 0 or 1").into()),
            },
            class @ (StorageClass::Text | StorageClass::Blob) => {
                coerced(class, TARGET);
                let text = decode_text(value, TARGET)?;
                parse_bool(&text)
                    .ok_or_else(|| ConversionError::value(TARGET, text, "invalid boolean"))?
            }
            class => return Err(ConversionError::data_type(TARGET, class).into()),
        };
        Ok(Self::new(v))
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

impl Serialize for NullBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.present {
            serializer.serialize_bool(self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Self::from)
    }
}
