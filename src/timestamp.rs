//! Calendar timestamps accepted by [`SequentialGuidGenerator::new_guid_at`].
//!
//! [`SequentialGuidGenerator::new_guid_at`]: crate::SequentialGuidGenerator::new_guid_at

use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

use crate::InvalidTimestamp;

/// A point in time together with what is known about its time zone.
///
/// Only values that resolve to a single UTC instant can be embedded in a GUID. A
/// [`NaiveDateTime`] carries no zone at all and is rejected rather than guessed at.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Timestamp {
    /// A UTC time, used as is.
    Utc(DateTime<Utc>),

    /// A local time with a known offset from UTC.
    Offset(DateTime<FixedOffset>),

    /// A wall-clock time in an unknown zone.
    Unspecified(NaiveDateTime),
}

impl Timestamp {
    /// Resolves the UTC instant, failing if the time zone is unspecified.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, InvalidTimestamp> {
        match self {
            Self::Utc(t) => Ok(*t),
            Self::Offset(t) => Ok(t.with_timezone(&Utc)),
            Self::Unspecified(_) => Err(InvalidTimestamp::Unspecified),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(src: DateTime<Utc>) -> Self {
        Self::Utc(src)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(src: DateTime<FixedOffset>) -> Self {
        Self::Offset(src)
    }
}

impl From<DateTime<Local>> for Timestamp {
    fn from(src: DateTime<Local>) -> Self {
        Self::Offset(src.fixed_offset())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(src: NaiveDateTime) -> Self {
        Self::Unspecified(src)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(src: SystemTime) -> Self {
        Self::Utc(src.into())
    }
}

#[cfg(test)]
mod tests {
    use super::Timestamp;
    use crate::InvalidTimestamp;
    use chrono::{FixedOffset, Local, NaiveDate, TimeZone, Utc};

    /// Resolves zone-aware values to the same UTC instant
    #[test]
    fn resolves_zone_aware_values_to_the_same_utc_instant() {
        let utc = Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let local = Local::now();

        assert_eq!(Timestamp::from(utc).to_utc(), Ok(utc));
        assert_eq!(Timestamp::from(utc.with_timezone(&tokyo)).to_utc(), Ok(utc));
        assert_eq!(
            Timestamp::from(local).to_utc(),
            Ok(local.with_timezone(&Utc))
        );
    }

    /// Rejects values without a time zone
    #[test]
    fn rejects_values_without_a_time_zone() {
        let naive = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            Timestamp::from(naive).to_utc(),
            Err(InvalidTimestamp::Unspecified)
        );
    }

    /// Treats system time as UTC
    #[test]
    fn treats_system_time_as_utc() {
        let now = std::time::SystemTime::now();
        assert!(matches!(Timestamp::from(now), Timestamp::Utc(_)));
    }
}
