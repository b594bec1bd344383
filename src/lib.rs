//! SQL `TIMESTAMP` values carrying from zero to twelve fractional-second digits.
//!
//! A [`SqlTimestamp`] is always built through its factory functions, which round the raw
//! `(epoch micros, picos of micro)` pair to the declared precision. Its canonical text form,
//! produced by [`SqlTimestamp::format`], is also its only serialized form.

mod core;

pub use crate::core::timestamp::{
    SqlTimestamp, TimeZoneKey, TimestampError, JSON_FORMAT, MAX_PRECISION,
};

pub type Result<T> = std::result::Result<T, TimestampError>;
