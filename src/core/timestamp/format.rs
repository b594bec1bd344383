//! The canonical text form of a timestamp, which is also its only serialized form.
//!
//! The grammar is `uuuu-MM-dd HH:mm:ss[.F]`, where `F` has exactly as many digits as the
//! precision and is left out at precision 0. Downstream systems parse it, it must not change.

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, TimeDelta};

use super::{
    rounding::{MICROS_PER_SECOND, PICOS_PER_MICRO, POWERS_OF_TEN},
    zone::Zone,
    Semantics, SqlTimestamp, TimestampError, MAX_PRECISION,
};

/// Pattern of the serialized form, in the notation clients use to describe date-time formats.
pub const JSON_FORMAT: &str = "uuuu-MM-dd HH:mm:ss[.SSS]";

/// Four-digit zero-padded year, signed outside `0000..=9999`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl SqlTimestamp {
    /// Renders the timestamp in its session zone if it has one, in UTC otherwise.
    ///
    /// Fails when the session zone can't be resolved or when the date-time is outside the
    /// calendar range.
    pub fn format(&self) -> crate::Result<String> {
        let zone = match &self.semantics {
            Semantics::Local => Zone::Utc,
            Semantics::Legacy(key) => key.resolve()?,
        };

        format_timestamp(self.precision, self.epoch_micros, self.picos_of_micro, zone)
    }
}

fn format_timestamp(
    precision: u8,
    epoch_micros: i64,
    picos_of_micro: u32,
    zone: Zone,
) -> crate::Result<String> {
    let seconds = epoch_micros.div_euclid(MICROS_PER_SECOND);
    let utc = utc_datetime(seconds).ok_or(TimestampError::OutOfRange(seconds))?;

    let mut formatted = zone.local(&utc).format(TIMESTAMP_FORMAT).to_string();

    if precision > 0 {
        let picos_of_second =
            epoch_micros.rem_euclid(MICROS_PER_SECOND) * PICOS_PER_MICRO + picos_of_micro as i64;
        let fraction = picos_of_second / POWERS_OF_TEN[(MAX_PRECISION - precision) as usize];

        formatted.push_str(&format!(".{fraction:0width$}", width = precision as usize));
    }

    Ok(formatted)
}

/// UTC date-time at `seconds` since the epoch, if it stays representable once shifted by any
/// zone offset.
fn utc_datetime(seconds: i64) -> Option<NaiveDateTime> {
    let utc = DateTime::from_timestamp(seconds, 0)?.naive_utc();

    // offsets never exceed a day
    utc.checked_add_signed(TimeDelta::days(1))?;
    utc.checked_sub_signed(TimeDelta::days(1))?;

    Some(utc)
}

/// Same text as [`SqlTimestamp::format`] whenever that succeeds.
///
/// Otherwise the text is still written: a legacy timestamp whose session zone has no known
/// rules renders in UTC followed by the raw zone id, and an instant outside the calendar range
/// renders its raw coordinates. Only `format()` reports those failures.
impl Display for SqlTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let err = match self.format() {
            Ok(formatted) => return f.write_str(&formatted),
            Err(err) => err,
        };

        log::debug!("displaying {self:?} without its canonical form: {err}");

        let utc = format_timestamp(
            self.precision,
            self.epoch_micros,
            self.picos_of_micro,
            Zone::Utc,
        );
        match (utc, &self.semantics) {
            (Ok(utc), Semantics::Legacy(key)) => write!(f, "{utc} {key}"),
            (Ok(utc), Semantics::Local) => f.write_str(&utc),
            (Err(_), _) => write!(f, "{}us+{}ps", self.epoch_micros, self.picos_of_micro),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SqlTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::Error as _;

        let formatted = self.format().map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}
