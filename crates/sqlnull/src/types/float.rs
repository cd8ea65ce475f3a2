use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteValueRef},
    Decode, Encode, Sqlite,
};

use super::{coerced, decode_text};
use crate::{error::ConversionError, storage::StorageClass};

const TARGET: &str = "NullFloat64";

nullable! {
    /// A nullable 64-bit float.
    ///
    /// Serializes in the shortest form that reads back to the same float, so `1.618` stays
    /// `1.618`. JSON has no representation for NaN or the infinities; `serde_json` writes them as
    /// `null`, which reads back as absent. SQLite likewise stores a bound NaN as `NULL`, so it
    /// also reads back from the database as absent.
    #[derive(Copy)]
    NullFloat64(f64),
    zero: 0.0,
    accepts: Real | Integer | Text | Blob | Numeric
}

impl<'q> Encode<'q, Sqlite> for NullFloat64 {
    fn encode_by_ref(&self, args: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        if !self.present {
            return IsNull::Yes;
        }
        args.push(SqliteArgumentValue::Double(self.value));

        IsNull::No
    }
}

impl<'r> Decode<'r, Sqlite> for NullFloat64 {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let v = match StorageClass::of_value(&value) {
            StorageClass::Null => return Ok(Self::NULL),
            StorageClass::Real => <f64 as Decode<Sqlite>>::decode(value)?,
            class @ StorageClass::Integer => {
                coerced(class, TARGET);
                <i64 as Decode<Sqlite>>::decode(value)? as f64
            }
            // Fixed-point decimals usually arrive as text.
            class @ (StorageClass::Text | StorageClass::Blob | StorageClass::Numeric) => {
                coerced(class, TARGET);
                let text = decode_text(value, TARGET)?;
                text.parse::<f64>()
                    .map_err(|e| ConversionError::value(TARGET, text, e))?
            }
        };
        Ok(Self::new(v))
    }
}

impl Serialize for NullFloat64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.present {
            serializer.serialize_f64(self.value)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for NullFloat64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<f64>::deserialize(deserializer).map(Self::from)
    }
}
