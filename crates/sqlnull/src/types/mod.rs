//! Nullable scalars and their conversions to and from **SQLite** and JSON.
//!
//! # Types
//!
//! | Rust type       | Bound as             | Decoded from                      | JSON                      |
//! |-----------------|----------------------|-----------------------------------|---------------------------|
//! | [`NullString`]  | TEXT                 | TEXT, BLOB (UTF-8), INTEGER, REAL | `"wow"`                   |
//! | [`NullInt64`]   | INTEGER              | INTEGER, integral REAL, TEXT      | `4211223344`              |
//! | [`NullFloat64`] | REAL                 | REAL, INTEGER, TEXT, NUMERIC      | `1.618`                   |
//! | [`NullBool`]    | INTEGER (`0` or `1`) | INTEGER, TEXT                     | `true`                    |
//! | [`NullTime`]    | DATETIME (RFC 3339)  | TEXT, INTEGER (Unix seconds)      | `"2009-01-03T18:15:05Z"`  |
//!
//! BLOB values are accepted wherever TEXT is, provided they hold valid UTF-8.
//!
//! # Nullable
//!
//! Every type binds as SQL `NULL` and serializes as JSON `null` when absent, and decodes SQL
//! `NULL` and JSON `null` into an absent value. Absent is the default:
//!
//! ```rust,ignore
//! assert!(NullInt64::default().is_null());
//! assert_eq!(NullInt64::default(), NullInt64::NULL);
//! assert_ne!(NullInt64::new(0), NullInt64::NULL);
//! ```

use sqlx::{sqlite::SqliteValueRef, Decode, Sqlite};

use crate::{error::ConversionError, storage::StorageClass};

macro_rules! nullable {
    (
        $(#[$meta:meta])*
        $name:ident($ty:ty),
        zero: $zero:expr,
        accepts: $($class:ident)|+
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            /// The wrapped value. Only meaningful when `present` is set.
            pub value: $ty,
            /// Whether this holds a value. `false` denotes SQL `NULL` and JSON `null`.
            pub present: bool,
        }

        impl $name {
            /// The absent value.
            pub const NULL: Self = Self {
                value: $zero,
                present: false,
            };

            /// A present value.
            pub fn new(value: $ty) -> Self {
                Self {
                    value,
                    present: true,
                }
            }

            pub fn is_null(&self) -> bool {
                !self.present
            }

            pub fn is_present(&self) -> bool {
                self.present
            }

            pub fn as_option(&self) -> Option<&$ty> {
                self.present.then_some(&self.value)
            }

            pub fn into_option(self) -> Option<$ty> {
                self.present.then_some(self.value)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NULL
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                match (self.present, other.present) {
                    (true, true) => self.value == other.value,
                    (false, false) => true,
                    _ => false,
                }
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.present {
                    f.debug_tuple(stringify!($name)).field(&self.value).finish()
                } else {
                    f.write_str(concat!(stringify!($name), "(NULL)"))
                }
            }
        }

        impl From<$ty> for $name {
            fn from(value: $ty) -> Self {
                Self::new(value)
            }
        }

        impl From<Option<$ty>> for $name {
            fn from(value: Option<$ty>) -> Self {
                value.map_or(Self::NULL, Self::new)
            }
        }

        impl From<$name> for Option<$ty> {
            fn from(value: $name) -> Self {
                value.into_option()
            }
        }

        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <$ty as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                matches!(
                    $crate::storage::StorageClass::of(ty),
                    $crate::storage::StorageClass::Null
                        $(| $crate::storage::StorageClass::$class)+
                )
            }
        }
    };
}

mod boolean;
mod float;
mod int;
mod string;
mod time;

pub use self::{
    boolean::NullBool, float::NullFloat64, int::NullInt64, string::NullString, time::NullTime,
};

/// Read a TEXT or BLOB value as UTF-8 text.
fn decode_text(value: SqliteValueRef<'_>, target: &'static str) -> Result<String, ConversionError> {
    let bytes = <Vec<u8> as Decode<Sqlite>>::decode(value)
        .map_err(|e| ConversionError::value(target, "", e))?;
    String::from_utf8(bytes).map_err(|e| {
        let text = String::from_utf8_lossy(e.as_bytes()).into_owned();
        ConversionError::value(target, text, e.utf8_error())
    })
}

/// Render any value as text for error messages.
fn lossy_text(value: SqliteValueRef<'_>) -> String {
    <Vec<u8> as Decode<Sqlite>>::decode(value)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn coerced(from: StorageClass, target: &'static str) {
    log::trace!("coercing {from} value into {target}");
}
