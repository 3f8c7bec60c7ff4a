use std::{fmt, str};

use chrono::{DateTime, Utc};
use fstr::FStr;

use crate::{sort_order, ticks, ParseError, SqlGuid};

/// Represents a 128-bit globally unique identifier in native sort order.
///
/// The bytes are held in canonical order, i.e. the order in which they appear in the 8-4-4-4-12
/// text form, so the derived [`Ord`] sorts sequential GUIDs by their embedded timestamp.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Guid([u8; 16]);

impl Guid {
    /// Nil GUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max GUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Creates a GUID from bytes in canonical order.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array in canonical order.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a GUID from bytes in memory layout, where the leading 32-bit field and the two
    /// following 16-bit fields are stored little-endian.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqguid::Guid;
    ///
    /// let bytes = [4, 3, 2, 1, 6, 5, 8, 7, 9, 10, 11, 12, 13, 14, 15, 16];
    /// let guid = Guid::from_bytes_le(bytes);
    /// assert_eq!(guid.to_string(), "01020304-0506-0708-090a-0b0c0d0e0f10");
    /// assert_eq!(guid.to_bytes_le(), bytes);
    /// ```
    pub const fn from_bytes_le(b: [u8; 16]) -> Self {
        Self([
            b[3], b[2], b[1], b[0], b[5], b[4], b[7], b[6], b[8], b[9], b[10], b[11], b[12], b[13],
            b[14], b[15],
        ])
    }

    /// Returns the bytes in memory layout. See [`Guid::from_bytes_le`].
    pub const fn to_bytes_le(&self) -> [u8; 16] {
        let b = &self.0;
        [
            b[3], b[2], b[1], b[0], b[5], b[4], b[7], b[6], b[8], b[9], b[10], b[11], b[12], b[13],
            b[14], b[15],
        ]
    }

    /// Returns true if every byte is zero, i.e. the GUID has not been assigned.
    pub const fn is_nil(&self) -> bool {
        u128::from_be_bytes(self.0) == 0
    }

    /// Rearranges the bytes so that the result sorts in SQL Server in the order this GUID sorts
    /// natively.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqguid::Guid;
    ///
    /// let guid: Guid = "00000000-0000-0000-0000-000000000001".parse()?;
    /// let sql = guid.to_sql_guid();
    /// assert_eq!(sql.to_string(), "01000000-0000-0000-0000-000000000000");
    /// assert_eq!(sql.to_guid(), guid);
    /// # Ok::<(), seqguid::ParseError>(())
    /// ```
    pub const fn to_sql_guid(&self) -> SqlGuid {
        SqlGuid::from_guid(Self::from_bytes_le(sort_order::to_database_order(
            self.to_bytes_le(),
        )))
    }

    /// Returns the UTC timestamp embedded at generation, or `None` if this GUID does not carry
    /// one.
    ///
    /// The bytes are read in native sort order first. If that does not yield a timestamp between
    /// the Unix epoch and now, they are read again as a GUID in SQL Server sort order. Any value
    /// is a legitimate input; GUIDs from other sources simply return `None`.
    ///
    /// A GUID generated in SQL Server sort order is occasionally (about 0.1% of counter values)
    /// misread on the first attempt, because its counter bytes happen to decode to a valid native
    /// tick count. [`SqlGuid::timestamp`] reads such values in SQL Server order only and is exact.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqguid::SequentialGuidGenerator;
    ///
    /// let g = SequentialGuidGenerator::native();
    /// let created_at = g.new_guid().timestamp();
    /// assert!(created_at.is_some());
    ///
    /// let random: seqguid::Guid = "0f7b9d34-51ac-4e2b-a3c8-6d19e04b7a55".parse()?;
    /// assert_eq!(random.timestamp(), None);
    /// # Ok::<(), seqguid::ParseError>(())
    /// ```
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.ticks_at(ticks::now()).and_then(ticks::to_datetime)
    }

    /// Returns the embedded tick count if it is valid as of `now` (in ticks), trying native sort
    /// order first and SQL Server sort order second.
    pub fn ticks_at(&self, now: i64) -> Option<i64> {
        let bytes = self.to_bytes_le();
        let native = ticks::decode(leading_eight(&bytes));
        if ticks::is_valid_tick(native, now) {
            return Some(native);
        }

        let reordered = ticks::decode(leading_eight(&sort_order::to_native_order(bytes)));
        ticks::is_valid_tick(reordered, now).then_some(reordered)
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// structure that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqguid::Guid;
    ///
    /// let x = "08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2".parse::<Guid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2");
    /// assert_eq!(format!("{}", y), "08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2");
    /// # Ok::<(), seqguid::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut j = 0;
        for (i, e) in self.0.into_iter().enumerate() {
            buffer[j] = DIGITS[(e >> 4) as usize];
            buffer[j + 1] = DIGITS[(e & 15) as usize];
            j += 2;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                buffer[j] = b'-';
                j += 1;
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: every byte written above is an ASCII hex digit or a hyphen
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }
}

fn leading_eight(bytes: &[u8; 16]) -> [u8; 8] {
    let mut head = [0u8; 8];
    head.copy_from_slice(&bytes[..8]);
    head
}

impl fmt::Display for Guid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Guid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: ParseError = ParseError {};
        let mut dst = [0u8; 16];
        let mut iter = src.chars();
        for (i, e) in dst.iter_mut().enumerate() {
            let hi = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            let lo = iter.next().ok_or(ERR)?.to_digit(16).ok_or(ERR)? as u8;
            *e = (hi << 4) | lo;
            if (i == 3 || i == 5 || i == 7 || i == 9) && iter.next().ok_or(ERR)? != '-' {
                return Err(ERR);
            }
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(ERR)
        }
    }
}

impl From<Guid> for [u8; 16] {
    fn from(src: Guid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Guid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Guid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Guid> for u128 {
    fn from(src: Guid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Guid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

impl From<Guid> for String {
    fn from(src: Guid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Guid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Guid;

    impl From<Guid> for uuid::Uuid {
        fn from(src: Guid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Guid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Guid;

        /// Agrees with uuid on text and memory layout
        #[test]
        fn agrees_with_uuid_on_text_and_memory_layout() {
            let text = "08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2";
            let guid: Guid = text.parse().unwrap();
            let uuid = uuid::Uuid::from(guid);
            assert_eq!(uuid.to_string(), text);
            assert_eq!(uuid.to_bytes_le(), guid.to_bytes_le());
            assert_eq!(Guid::from(uuid), guid);
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Guid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Guid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Guid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Guid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a GUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::Guid;
    use crate::ticks::{self, UNIX_EPOCH_TICKS};

    /// Returns a collection of prepared cases in canonical and memory layouts
    fn prepare_cases() -> &'static [(&'static str, [u8; 16])] {
        &[
            ("00000000-0000-0000-0000-000000000000", [0; 16]),
            ("ffffffff-ffff-ffff-ffff-ffffffffffff", [0xff; 16]),
            (
                "00112233-4455-6677-8899-aabbccddeeff",
                [
                    0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc,
                    0xdd, 0xee, 0xff,
                ],
            ),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (text, le) in prepare_cases() {
            let e = Guid::from_bytes_le(*le);
            assert_eq!(Ok(e), text.parse());
            assert_eq!(Ok(e), text.to_uppercase().parse());
            assert_eq!(&e.encode() as &str, *text);
            assert_eq!(&e.to_string(), text);
            assert_eq!(&e.to_bytes_le(), le);
        }
    }

    /// Returns error to invalid string representation
    #[test]
    fn returns_error_to_invalid_string_representation() {
        let cases = [
            "",
            " 08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2",
            "08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2 ",
            "08dc2a5b6f3e1d279c417b03e8a1f0c2",
            "{08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2}",
            "08dc2a5b-6f3e1d27-9c41-7b03e8a1f0c2",
            "08dc2a5b-6f3e-1d 7-9c41-7b03e8a1f0c2",
            "08dc2a5g-6f3e-1d27-9c41-7b03e8a1f0c2",
            "08dc2a5b-6f3e-1d27-9c41_7b03e8a1f0c2",
        ];

        for e in cases {
            assert!(e.parse::<Guid>().is_err());
        }
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (text, _) in prepare_cases() {
            let e: Guid = text.parse().unwrap();
            assert_eq!(Guid::from(<[u8; 16]>::from(e)), e);
            assert_eq!(Guid::from(u128::from(e)), e);
            assert_eq!(Guid::from_bytes_le(e.to_bytes_le()), e);
            assert_eq!(Guid::try_from(String::from(e)), Ok(e));
            assert_eq!(e.to_sql_guid().to_guid(), e);
        }
    }

    /// Recognizes only the all-zero value as nil
    #[test]
    fn recognizes_only_the_all_zero_value_as_nil() {
        assert!(Guid::NIL.is_nil());
        assert!(Guid::default().is_nil());
        assert!(!Guid::MAX.is_nil());
        assert!(!Guid::from(1u128).is_nil());
    }

    /// Sorts single-byte values by canonical byte position
    #[test]
    fn sorts_single_byte_values_by_canonical_byte_position() {
        let sorted: Vec<Guid> = [
            "00000000-0000-0000-0000-000000000001",
            "00000000-0000-0000-0000-000000000100",
            "00000000-0000-0000-0000-000000010000",
            "00000000-0000-0000-0000-000001000000",
            "00000000-0000-0000-0000-000100000000",
            "00000000-0000-0000-0000-010000000000",
            "00000000-0000-0000-0001-000000000000",
            "00000000-0000-0000-0100-000000000000",
            "00000000-0000-0001-0000-000000000000",
            "00000000-0000-0100-0000-000000000000",
            "00000000-0001-0000-0000-000000000000",
            "00000000-0100-0000-0000-000000000000",
            "00000001-0000-0000-0000-000000000000",
            "00000100-0000-0000-0000-000000000000",
            "00010000-0000-0000-0000-000000000000",
            "01000000-0000-0000-0000-000000000000",
        ]
        .iter()
        .map(|e| e.parse().unwrap())
        .collect();

        let mut shuffled = sorted.clone();
        shuffled.reverse();
        shuffled.sort();
        assert_eq!(shuffled, sorted);
    }

    /// Extracts ticks stored in either sort order
    #[test]
    fn extracts_ticks_stored_in_either_sort_order() {
        let now = ticks::now();
        let t = UNIX_EPOCH_TICKS + 123_456_789;
        let mut le = [0xaau8; 16];
        le[..8].copy_from_slice(&ticks::encode(t));
        let native = Guid::from_bytes_le(le);

        assert_eq!(native.ticks_at(now), Some(t));
        assert_eq!(Guid::from(native.to_sql_guid()).ticks_at(now), Some(t));
        assert_eq!(native.to_sql_guid().timestamp(), ticks::to_datetime(t));
    }

    /// Returns None for values carrying no valid timestamp
    #[test]
    fn returns_none_for_values_carrying_no_valid_timestamp() {
        assert_eq!(Guid::NIL.timestamp(), None);
        assert_eq!(Guid::MAX.timestamp(), None);

        let now = ticks::now();
        for t in [UNIX_EPOCH_TICKS - 1, now + 1] {
            let mut le = [0xaau8; 16];
            le[..8].copy_from_slice(&ticks::encode(t));
            assert_eq!(Guid::from_bytes_le(le).ticks_at(now), None);
        }
    }

    /// Returns None for nearly all random values
    ///
    /// A uniformly random value decodes to a plausible timestamp under one of the two orders with
    /// probability of roughly 0.2%, so the bound below fails only with negligible probability.
    #[test]
    fn returns_none_for_nearly_all_random_values() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        const N_SAMPLES: usize = 10_000;
        let mut rng = StdRng::seed_from_u64(0x0a1b_2c3d);
        let hits = (0..N_SAMPLES)
            .filter(|_| Guid::from(rng.gen::<u128>()).timestamp().is_some())
            .count();
        assert!(hits < N_SAMPLES / 100, "{} random values decoded", hits);
    }
}
