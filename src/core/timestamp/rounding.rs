//! Reduction of a raw `(epoch micros, picos of micro)` pair to the canonical form of a precision.
//!
//! Three fixed-point scales are in play: whole seconds, microseconds since the epoch and
//! picoseconds within the current microsecond. Precisions below 6 round the microsecond
//! coordinate, precision 6 only decides whether the remainder carries, and precisions above 6
//! round the picosecond remainder.

use super::TimestampError;

pub(crate) const MICROS_PER_SECOND: i64 = 1_000_000;
pub(crate) const PICOS_PER_MICRO: i64 = 1_000_000;

/// Digits of a microsecond within a second.
const MICRO_DIGITS: u8 = 6;

/// `POWERS_OF_TEN[n] == 10^n`, up to the maximum precision.
pub(crate) const POWERS_OF_TEN: [i64; 13] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
];

/// Canonical coordinates of a timestamp for one precision.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct Normalized {
    pub epoch_micros: i64,
    pub picos_of_micro: u32,
}

/// Reduces the raw pair to the canonical form of `precision`.
///
/// Below microsecond precision the picosecond remainder is discarded without looking at it.
/// The caller validates `precision` and keeps `picos_of_micro` below `10^6`.
pub(crate) fn normalize(
    precision: u8,
    epoch_micros: i64,
    picos_of_micro: u32,
) -> Result<Normalized, TimestampError> {
    debug_assert!(precision <= super::MAX_PRECISION);
    debug_assert!((picos_of_micro as i64) < PICOS_PER_MICRO);

    let picos = picos_of_micro as i64;

    match precision {
        p if p < MICRO_DIGITS => Ok(Normalized {
            epoch_micros: round(epoch_micros, MICRO_DIGITS - p)?,
            picos_of_micro: 0,
        }),
        // the remainder only decides the carry, it is never kept
        MICRO_DIGITS => carry(epoch_micros, round(picos, MICRO_DIGITS)?),
        p => carry(epoch_micros, round(picos, super::MAX_PRECISION - p)?),
    }
}

/// Moves a remainder that rounded up to a whole microsecond into the microsecond coordinate.
fn carry(epoch_micros: i64, picos: i64) -> Result<Normalized, TimestampError> {
    if picos < PICOS_PER_MICRO {
        return Ok(Normalized {
            epoch_micros,
            picos_of_micro: picos as u32,
        });
    }

    log::trace!("sub-microsecond remainder of {epoch_micros} rounded up to a whole microsecond");

    Ok(Normalized {
        epoch_micros: epoch_micros
            .checked_add(1)
            .ok_or(TimestampError::Overflow)?,
        picos_of_micro: 0,
    })
}

/// Rounds `value` to the nearest multiple of `10^magnitude`.
#[inline]
fn round(value: i64, magnitude: u8) -> Result<i64, TimestampError> {
    let factor = POWERS_OF_TEN[magnitude as usize];

    round_div(value, factor)
        .checked_mul(factor)
        .ok_or(TimestampError::Overflow)
}

/// Divides `value` by `factor`, rounding to the nearest integer with ties towards positive
/// infinity on both sides of zero.
///
/// Negative values use `(value + 1 - factor / 2) / factor` with truncating division, so `-1.5`
/// rounds to `-1` and not `-2`. Persisted values depend on this exact tie-break.
#[inline]
pub(crate) fn round_div(value: i64, factor: i64) -> i64 {
    debug_assert!(factor > 1 || value >= 0);

    // widened so that `value + factor / 2` cannot overflow near the ends of the range
    let (value, factor) = (value as i128, factor as i128);
    let rounded = match value >= 0 {
        true => (value + factor / 2) / factor,
        _ => (value + 1 - factor / 2) / factor,
    };

    rounded as i64
}
