//! Nullable scalar types that keep SQL `NULL` and JSON `null` distinct from zero values.
//!
//! Each type pairs a value with a presence flag. An absent value binds as SQL `NULL`, decodes
//! from SQL `NULL`, serializes as `null` and deserializes from `null`. A present value behaves
//! like the bare scalar on both boundaries, including its zero value.
//!
//! ```rust,ignore
//! use sqlnull::{NullFloat64, NullString};
//!
//! let name = NullString::new("wow".to_owned());
//! assert_eq!(serde_json::to_string(&name)?, r#""wow""#);
//! assert_eq!(serde_json::to_string(&NullFloat64::NULL)?, "null");
//!
//! sqlx::query("INSERT INTO null_types (id, string_val) VALUES (?, ?)")
//!     .bind(1_i64)
//!     .bind(name)
//!     .execute(&mut conn)
//!     .await?;
//! ```

mod error;
mod storage;
pub mod types;

pub use crate::{
    error::{ConversionError, ParseError},
    storage::StorageClass,
    types::{NullBool, NullFloat64, NullInt64, NullString, NullTime},
};
