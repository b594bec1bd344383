//! Session time zone keys and their resolution to zone rules.
//!
//! A [`TimeZoneKey`] is an opaque identifier: nothing checks it when a timestamp is built. It
//! is only resolved when a legacy timestamp is formatted.

use std::{fmt::Display, str::FromStr, sync::Arc};

use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use super::TimestampError;

/// Identifier of a session time zone.
///
/// Ids that resolve when formatting:
///
/// - `Z`, which is UTC;
/// - a fixed offset `±HH:MM` or `±HHMM`, such as `+05:30` or `-0800`;
/// - the same offset prefixed by `UTC`, `GMT` or `UT`, such as `UTC+01:00`;
/// - an IANA name known to chrono-tz, such as `America/Sao_Paulo`, `UTC` or `Etc/GMT+3`.
///
/// Anything else is still a valid key, it just fails to format as `UnknownTimeZone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeZoneKey {
    id: Arc<str>,
}

/// Prefixes an offset id may carry, longest first so `UTC` wins over `UT`.
const OFFSET_PREFIXES: [&str; 3] = ["UTC", "GMT", "UT"];

/// Zone rules a [`TimeZoneKey`] resolves to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Zone {
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
}

impl TimeZoneKey {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Looks the identifier up, offsets first and IANA names second.
    pub(crate) fn resolve(&self) -> Result<Zone, TimestampError> {
        if &*self.id == "Z" {
            return Ok(Zone::Utc);
        }

        let offset = OFFSET_PREFIXES
            .iter()
            .find_map(|prefix| self.id.strip_prefix(*prefix))
            .filter(|offset| offset.starts_with(|c: char| c == '+' || c == '-'))
            .unwrap_or(&*self.id);

        if let Ok(offset) = FixedOffset::from_str(offset) {
            return Ok(Zone::Fixed(offset));
        }

        match Tz::from_str(&self.id) {
            Ok(tz) => Ok(Zone::Named(tz)),
            Err(_) => {
                log::debug!("session time zone {} has no known zone rules", self.id);
                Err(TimestampError::UnknownTimeZone(self.id.to_string()))
            }
        }
    }
}

impl Zone {
    /// Civil date-time observed in this zone at the UTC instant `utc`.
    pub(crate) fn local(&self, utc: &NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Utc => *utc,
            Self::Fixed(offset) => offset.from_utc_datetime(utc).naive_local(),
            Self::Named(tz) => tz.from_utc_datetime(utc).naive_local(),
        }
    }
}

impl Display for TimeZoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for TimeZoneKey {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TimeZoneKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.id)
    }
}
