//! The SQL `TIMESTAMP` value type.
//!
//! A value is a point on two fixed-point scales at once: microseconds since
//! `1970-01-01 00:00:00` and picoseconds within that microsecond. Its precision, the number of
//! fractional-second digits it claims, bounds how much of the picosecond remainder it may carry:
//!
//! - precision `0..=6` never carries picoseconds;
//! - precision `p > 6` carries a multiple of `10^(12 - p)` picoseconds.
//!
//! Values built with a session [`TimeZoneKey`] follow the legacy semantics, where the value is a
//! zoned instant. Values without one are zone-less local timestamps and format in UTC.

use rounding::{normalize, round_div, Normalized, PICOS_PER_MICRO};
use thiserror::Error;

pub use format::JSON_FORMAT;
pub use zone::TimeZoneKey;

mod format;
mod rounding;
mod zone;

/// The finest precision a timestamp can declare, picoseconds.
pub const MAX_PRECISION: u8 = 12;

const MICROS_PER_MILLI: i64 = 1_000;

/// A SQL `TIMESTAMP` with `0..=12` fractional-second digits.
///
/// Every value is normalized to its precision on construction and is immutable afterwards.
/// Equality and hashing cover the precision too, so the same instant at two precisions gives
/// two different values. There's no ordering: compare [`epoch_micros`](Self::epoch_micros)
/// and [`picos_of_micro`](Self::picos_of_micro) when one is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlTimestamp {
    precision: u8,
    epoch_micros: i64,
    picos_of_micro: u32,
    semantics: Semantics,
}

/// Whether a timestamp is zone-less or attached to a session time zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Semantics {
    Local,
    Legacy(TimeZoneKey),
}

/// Errors raised while building or formatting a [`SqlTimestamp`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("invalid timestamp precision {0}, must be between 0 and 12")]
    InvalidPrecision(u8),
    /// Sub-microsecond remainder that is a whole microsecond or more.
    #[error("invalid picoseconds of microsecond {0}, must be below 1000000")]
    InvalidPicos(u32),
    #[error("illegal state: {0}")]
    IllegalState(&'static str),
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("timestamp overflow")]
    Overflow,
    #[error("timestamp out of range: {0} seconds since epoch")]
    OutOfRange(i64),
}

impl SqlTimestamp {
    /// Timestamp at `millis` milliseconds since the epoch.
    pub fn from_millis(precision: u8, millis: i64) -> crate::Result<Self> {
        Self::new_instance(precision, to_micros(millis)?, 0)
    }

    /// Legacy timestamp at `millis_utc` milliseconds since the epoch in `session_time_zone_key`.
    #[deprecated(note = "legacy timestamp semantics, use `from_millis`")]
    pub fn legacy_from_millis(
        precision: u8,
        millis_utc: i64,
        session_time_zone_key: TimeZoneKey,
    ) -> crate::Result<Self> {
        Self::with_rounding(
            precision,
            to_micros(millis_utc)?,
            0,
            Semantics::Legacy(session_time_zone_key),
        )
    }

    /// Rounds the raw `(epoch_micros, picos_of_micro)` pair to `precision`.
    ///
    /// `picos_of_micro` must be below `1_000_000` but doesn't have to be rounded already.
    pub fn new_instance(
        precision: u8,
        epoch_micros: i64,
        picos_of_micro: u32,
    ) -> crate::Result<Self> {
        Self::with_rounding(precision, epoch_micros, picos_of_micro, Semantics::Local)
    }

    #[deprecated(note = "legacy timestamp semantics, use `new_instance`")]
    pub fn new_legacy_instance(
        precision: u8,
        epoch_micros: i64,
        picos_of_micro: u32,
        session_time_zone_key: TimeZoneKey,
    ) -> crate::Result<Self> {
        Self::with_rounding(
            precision,
            epoch_micros,
            picos_of_micro,
            Semantics::Legacy(session_time_zone_key),
        )
    }

    fn with_rounding(
        precision: u8,
        epoch_micros: i64,
        picos_of_micro: u32,
        semantics: Semantics,
    ) -> crate::Result<Self> {
        if precision > MAX_PRECISION {
            return Err(TimestampError::InvalidPrecision(precision));
        }

        if picos_of_micro as i64 >= PICOS_PER_MICRO {
            return Err(TimestampError::InvalidPicos(picos_of_micro));
        }

        let Normalized {
            epoch_micros,
            picos_of_micro,
        } = normalize(precision, epoch_micros, picos_of_micro)?;

        Ok(Self {
            precision,
            epoch_micros,
            picos_of_micro,
            semantics,
        })
    }

    /// The same timestamp rounded to `precision`, keeping its semantics.
    ///
    /// Rounding to a coarser precision drops digits for good. A finer one only pads zeros.
    pub fn round_to(&self, precision: u8) -> crate::Result<Self> {
        Self::with_rounding(
            precision,
            self.epoch_micros,
            self.picos_of_micro,
            self.semantics.clone(),
        )
    }

    pub const fn precision(&self) -> u8 {
        self.precision
    }

    /// Milliseconds since the epoch, rounded to the nearest one.
    ///
    /// Only zone-less timestamps have this, legacy ones must use `millis_utc`.
    pub fn millis(&self) -> crate::Result<i64> {
        if self.is_legacy_timestamp() {
            return Err(TimestampError::IllegalState(
                "millis() can be called in new timestamp semantics only",
            ));
        }

        Ok(round_div(self.epoch_micros, MICROS_PER_MILLI))
    }

    #[deprecated(note = "applicable in legacy timestamp semantics only")]
    pub fn millis_utc(&self) -> crate::Result<i64> {
        if !self.is_legacy_timestamp() {
            return Err(TimestampError::IllegalState(
                "millis_utc() can be called in legacy timestamp semantics only",
            ));
        }

        Ok(round_div(self.epoch_micros, MICROS_PER_MILLI))
    }

    pub const fn epoch_micros(&self) -> i64 {
        self.epoch_micros
    }

    /// Picoseconds within the current microsecond, always in `0..1_000_000`.
    pub const fn picos_of_micro(&self) -> u32 {
        self.picos_of_micro
    }

    #[deprecated(note = "applicable in legacy timestamp semantics only")]
    pub fn session_time_zone_key(&self) -> Option<&TimeZoneKey> {
        match &self.semantics {
            Semantics::Legacy(key) => Some(key),
            Semantics::Local => None,
        }
    }

    pub const fn is_legacy_timestamp(&self) -> bool {
        matches!(self.semantics, Semantics::Legacy(_))
    }
}

fn to_micros(millis: i64) -> crate::Result<i64> {
    millis
        .checked_mul(MICROS_PER_MILLI)
        .ok_or(TimestampError::Overflow)
}
