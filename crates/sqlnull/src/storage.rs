use std::fmt::{self, Display, Formatter};

use sqlx::{
    sqlite::{SqliteTypeInfo, SqliteValueRef},
    TypeInfo, ValueRef,
};

/// The SQLite storage class of a value.
///
/// For values read from a row the driver reports the runtime storage class. Declared column
/// types (`BOOLEAN`, `DATETIME`, ...) map onto the class SQLite stores them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Null,
    Integer,
    Real,
    Text,
    Blob,
    Numeric,
}

impl StorageClass {
    /// Classify driver type information.
    pub fn of(ty: &SqliteTypeInfo) -> Self {
        if ty.is_null() {
            return StorageClass::Null;
        }
        match ty.name() {
            "INTEGER" | "BOOLEAN" => StorageClass::Integer,
            "REAL" => StorageClass::Real,
            "TEXT" | "DATE" | "TIME" | "DATETIME" => StorageClass::Text,
            "BLOB" => StorageClass::Blob,
            _ => StorageClass::Numeric,
        }
    }

    /// Classify a value handed back by the driver.
    pub fn of_value(value: &SqliteValueRef<'_>) -> Self {
        if value.is_null() {
            StorageClass::Null
        } else {
            Self::of(&value.type_info())
        }
    }

    /// The SQL name of the storage class, e.g. `INTEGER`.
    pub fn name(&self) -> &'static str {
        match self {
            StorageClass::Null => "NULL",
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
            StorageClass::Numeric => "NUMERIC",
        }
    }
}

impl Display for StorageClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
