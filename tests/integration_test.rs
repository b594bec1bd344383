#![allow(deprecated)]

use std::collections::HashSet;

use fake::Fake;
use umbra_timestamp::{Result, SqlTimestamp, TimeZoneKey, TimestampError, MAX_PRECISION};

#[test]
fn epoch_text_form() -> Result<()> {
    assert_eq!(
        SqlTimestamp::new_instance(3, 0, 0)?.format()?,
        "1970-01-01 00:00:00.000"
    );
    assert_eq!(
        SqlTimestamp::new_instance(0, 0, 0)?.format()?,
        "1970-01-01 00:00:00"
    );

    Ok(())
}

#[test]
fn every_precision_prints_its_digits() -> Result<()> {
    let expected = [
        "2001-09-09 01:46:40",
        "2001-09-09 01:46:40.1",
        "2001-09-09 01:46:40.12",
        "2001-09-09 01:46:40.123",
        "2001-09-09 01:46:40.1235",
        "2001-09-09 01:46:40.12346",
        "2001-09-09 01:46:40.123457",
        "2001-09-09 01:46:40.1234568",
        "2001-09-09 01:46:40.12345679",
        "2001-09-09 01:46:40.123456789",
        "2001-09-09 01:46:40.1234567891",
        "2001-09-09 01:46:40.12345678912",
        "2001-09-09 01:46:40.123456789123",
    ];

    // 1_000_000_000 seconds after the epoch plus 0.123456789123
    let timestamp = SqlTimestamp::new_instance(MAX_PRECISION, 1_000_000_000_123_456, 789_123)?;

    for (precision, text) in (0..=MAX_PRECISION).zip(expected) {
        assert_eq!(timestamp.round_to(precision)?.format()?, text);
    }

    Ok(())
}

#[test]
fn micro_carry_reaches_the_second() -> Result<()> {
    let timestamp = SqlTimestamp::new_instance(6, 1_999_999, 500_000)?;

    assert_eq!(timestamp.epoch_micros(), 2_000_000);
    assert_eq!(timestamp.picos_of_micro(), 0);
    assert_eq!(timestamp.format()?, "1970-01-01 00:00:02.000000");

    Ok(())
}

#[test]
fn remainder_must_stay_within_a_microsecond() -> Result<()> {
    assert_eq!(
        SqlTimestamp::new_instance(6, 1_000_000, 999_999_500),
        Err(TimestampError::InvalidPicos(999_999_500))
    );

    let timestamp = SqlTimestamp::new_instance(6, 1_000_000, 999_500)?;
    assert_eq!(timestamp.epoch_micros(), 1_000_001);
    assert_eq!(timestamp.picos_of_micro(), 0);

    // seconds precision looks at the microseconds only
    assert_eq!(SqlTimestamp::new_instance(3, 499, 999_999)?.epoch_micros(), 0);

    Ok(())
}

#[test]
fn half_up_across_zero() -> Result<()> {
    let positive = SqlTimestamp::from_millis(3, 1_500)?.round_to(0)?;
    assert_eq!(positive.format()?, "1970-01-01 00:00:02");

    let negative = SqlTimestamp::from_millis(3, -1_500)?.round_to(0)?;
    assert_eq!(negative.epoch_micros(), -1_000_000);
    assert_eq!(negative.format()?, "1969-12-31 23:59:59");

    let negative = SqlTimestamp::from_millis(3, -500)?.round_to(0)?;
    assert_eq!(negative.epoch_micros(), 0);

    Ok(())
}

#[test]
fn coarse_rounding_is_lossy() -> Result<()> {
    let timestamp = SqlTimestamp::new_instance(9, 1_234_567, 891_000)?;
    let back = timestamp.round_to(3)?.round_to(9)?;

    assert_eq!(back.epoch_micros(), 1_235_000);
    assert_eq!(back.picos_of_micro(), 0);
    assert_ne!(back, timestamp);

    Ok(())
}

#[test]
fn semantics_accessors() -> Result<()> {
    let new = SqlTimestamp::from_millis(3, 42)?;
    let legacy = SqlTimestamp::legacy_from_millis(3, 42, TimeZoneKey::new("Europe/Paris"))?;

    assert!(!new.is_legacy_timestamp());
    assert!(legacy.is_legacy_timestamp());

    assert_eq!(new.millis()?, 42);
    assert_eq!(legacy.millis_utc()?, 42);

    assert!(matches!(legacy.millis(), Err(TimestampError::IllegalState(_))));
    assert!(matches!(new.millis_utc(), Err(TimestampError::IllegalState(_))));

    assert_eq!(new.session_time_zone_key(), None);
    assert_eq!(
        legacy.session_time_zone_key().map(TimeZoneKey::id),
        Some("Europe/Paris")
    );

    Ok(())
}

#[test]
fn legacy_formats_in_session_zone() -> Result<()> {
    // 2020-07-01T12:00:00Z, summer time in Paris
    let timestamp = SqlTimestamp::new_legacy_instance(
        6,
        1_593_604_800_000_001,
        0,
        TimeZoneKey::new("Europe/Paris"),
    )?;

    assert_eq!(timestamp.format()?, "2020-07-01 14:00:00.000001");

    Ok(())
}

#[test]
fn zone_key_is_not_validated_until_formatted() -> Result<()> {
    let timestamp = SqlTimestamp::legacy_from_millis(0, 0, TimeZoneKey::new("Atlantis/Capital"))?;

    assert_eq!(timestamp.millis_utc()?, 0);
    assert_eq!(
        timestamp.format(),
        Err(TimestampError::UnknownTimeZone("Atlantis/Capital".to_string()))
    );

    Ok(())
}

#[test]
fn unknown_zone_still_displays() -> Result<()> {
    let timestamp = SqlTimestamp::legacy_from_millis(0, 0, TimeZoneKey::new("Atlantis/Capital"))?;

    assert_eq!(timestamp.to_string(), "1970-01-01 00:00:00 Atlantis/Capital");
    assert_eq!(format!("[{timestamp}]"), "[1970-01-01 00:00:00 Atlantis/Capital]");

    Ok(())
}

#[test]
fn invalid_precision_is_rejected() {
    for precision in [13, 42, u8::MAX] {
        assert_eq!(
            SqlTimestamp::from_millis(precision, 0),
            Err(TimestampError::InvalidPrecision(precision))
        );
        assert_eq!(
            SqlTimestamp::new_legacy_instance(precision, 0, 0, TimeZoneKey::new("UTC")),
            Err(TimestampError::InvalidPrecision(precision))
        );
    }
}

#[test]
fn precision_is_part_of_identity() -> Result<()> {
    let values = (0..=MAX_PRECISION)
        .map(|precision| SqlTimestamp::from_millis(precision, 1_000))
        .collect::<Result<HashSet<_>>>()?;

    assert_eq!(values.len(), MAX_PRECISION as usize + 1);

    Ok(())
}

#[test]
fn random_values_are_canonical_and_stable() -> Result<()> {
    for _ in 0..1_024 {
        let precision = (0..=MAX_PRECISION).fake::<u8>();
        let micros = (-10_000_000_000_000_000_i64..10_000_000_000_000_000).fake::<i64>();
        let picos = (0..1_000_000_u32).fake::<u32>();

        let timestamp = SqlTimestamp::new_instance(precision, micros, picos)?;
        let text = timestamp.format()?;

        let digits = text.rsplit_once('.').map_or(0, |(_, fraction)| fraction.len());
        assert_eq!(digits, precision as usize, "{text}");

        if precision <= 6 {
            assert_eq!(timestamp.picos_of_micro(), 0);
        }

        assert_eq!(timestamp.round_to(precision)?, timestamp);
        assert_eq!(timestamp.round_to(precision)?.format()?, text);
    }

    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn serialized_form_is_the_text_form() -> Result<()> {
    #[derive(serde::Serialize)]
    struct Row {
        created_at: SqlTimestamp,
    }

    let row = Row {
        created_at: SqlTimestamp::new_instance(6, -1, 0)?,
    };

    assert_eq!(
        serde_json::to_string(&row).unwrap(),
        r#"{"created_at":"1969-12-31 23:59:59.999999"}"#
    );

    Ok(())
}
