use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteValueRef},
    Decode, Encode, Sqlite,
};

use super::{coerced, decode_text};
use crate::{error::ConversionError, storage::StorageClass};

const TARGET: &str = "NullString";

nullable! {
    /// A nullable string.
    NullString(String),
    zero: String::new(),
    accepts: Text | Blob | Integer | Real
}

impl Eq for NullString {}

impl From<&str> for NullString {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl<'q> Encode<'q, Sqlite> for NullString {
    fn encode(self, args: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        if !self.present {
            return IsNull::Yes;
        }
        args.push(SqliteArgumentValue::Text(Cow::Owned(self.value)));

        IsNull::No
    }

    fn encode_by_ref(&self, args: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        if !self.present {
            return IsNull::Yes;
        }
        args.push(SqliteArgumentValue::Text(Cow::Owned(self.value.clone())));

        IsNull::No
    }
}

impl<'r> Decode<'r, Sqlite> for NullString {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = match StorageClass::of_value(&value) {
            StorageClass::Null => return Ok(Self::NULL),
            StorageClass::Text => decode_text(value, TARGET)?,
            class @ StorageClass::Blob => {
                coerced(class, TARGET);
                decode_text(value, TARGET)?
            }
            class @ StorageClass::Integer => {
                coerced(class, TARGET);
                <i64 as Decode<Sqlite>>::decode(value)?.to_string()
            }
            class @ StorageClass::Real => {
                coerced(class, TARGET);
                <f64 as Decode<Sqlite>>::decode(value)?.to_string()
            }
            class => return Err(ConversionError::data_type(TARGET, class).into()),
        };
        Ok(Self::new(s))
    }
}

impl Serialize for NullString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.present {
            serializer.serialize_str(&self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer).map(Self::from)
    }
}
