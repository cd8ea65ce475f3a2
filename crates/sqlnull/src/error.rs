//! Errors produced while decoding nullable values.

use std::fmt::Display;

use crate::storage::StorageClass;

/// Failure to decode JSON into a nullable value.
///
/// Deserialization goes through serde, so any deserializer reports its own error type. This is
/// the one produced by `serde_json`.
pub type ParseError = serde_json::Error;

/// A value handed back by the driver could not be converted into the target type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The storage class of the value is not accepted by the target type.
    #[error("cannot scan {found} value into {target}")]
    DataType {
        target: &'static str,
        found: StorageClass,
    },

    /// The storage class is accepted, but the content does not convert.
    #[error("cannot scan {value:?} into {target}: {reason}")]
    Value {
        target: &'static str,
        value: String,
        reason: String,
    },
}

impl ConversionError {
    pub(crate) fn data_type(target: &'static str, found: StorageClass) -> Self {
        ConversionError::DataType { target, found }
    }

    pub(crate) fn value(target: &'static str, value: impl Into<String>, reason: impl Display) -> Self {
        ConversionError::Value {
            target,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
