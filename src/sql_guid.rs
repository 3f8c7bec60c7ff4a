use std::{cmp, fmt, str};

use chrono::{DateTime, Utc};
use fstr::FStr;

use crate::{sort_order, Guid, ParseError};

/// Represents a GUID as SQL Server's `uniqueidentifier` compares it.
///
/// The bytes are the same as those of the wrapped [`Guid`]; only ordering differs. [`Ord`]
/// compares the memory-layout bytes in [`SQL_COMPARE_ORDER`], so a sequence of `SqlGuid` values
/// sorts here exactly as it sorts in a SQL Server index.
///
/// Wrapping and unwrapping through [`From`] never moves bytes. Use [`Guid::to_sql_guid`] and
/// [`SqlGuid::to_guid`] to convert between the two sort orders while keeping the position on the
/// timeline.
///
/// [`SQL_COMPARE_ORDER`]: crate::sort_order::SQL_COMPARE_ORDER
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SqlGuid(Guid);

impl SqlGuid {
    /// Nil GUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self(Guid::NIL);

    /// Wraps `guid` without rearranging its bytes.
    pub const fn from_guid(guid: Guid) -> Self {
        Self(guid)
    }

    /// Returns the wrapped bytes as a [`Guid`] without rearranging them.
    pub const fn as_guid(&self) -> &Guid {
        &self.0
    }

    /// Rearranges the bytes into native sort order, keeping the relative order of values.
    pub const fn to_guid(&self) -> Guid {
        Guid::from_bytes_le(sort_order::to_native_order(self.0.to_bytes_le()))
    }

    /// Returns the UTC timestamp embedded at generation, or `None` if this value does not carry
    /// one.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.to_guid().timestamp()
    }

    /// Returns true if every byte is zero.
    pub const fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation of the wrapped bytes.
    pub fn encode(&self) -> FStr<36> {
        self.0.encode()
    }

    fn sort_key(&self) -> [u8; 16] {
        let le = self.0.to_bytes_le();
        sort_order::SQL_COMPARE_ORDER.map(|i| le[i])
    }
}

impl Ord for SqlGuid {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for SqlGuid {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SqlGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl str::FromStr for SqlGuid {
    type Err = ParseError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        src.parse::<Guid>().map(Self)
    }
}

impl From<Guid> for SqlGuid {
    fn from(src: Guid) -> Self {
        Self(src)
    }
}

impl From<SqlGuid> for Guid {
    fn from(src: SqlGuid) -> Self {
        src.0
    }
}

impl From<SqlGuid> for [u8; 16] {
    fn from(src: SqlGuid) -> Self {
        src.0.into()
    }
}

impl From<[u8; 16]> for SqlGuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src.into())
    }
}

impl AsRef<[u8]> for SqlGuid {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl From<SqlGuid> for u128 {
    fn from(src: SqlGuid) -> Self {
        src.0.into()
    }
}

impl From<u128> for SqlGuid {
    fn from(src: u128) -> Self {
        Self(src.into())
    }
}

impl From<SqlGuid> for String {
    fn from(src: SqlGuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for SqlGuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::{Guid, SqlGuid};

    impl From<SqlGuid> for uuid::Uuid {
        fn from(src: SqlGuid) -> Self {
            src.0.into()
        }
    }

    impl From<uuid::Uuid> for SqlGuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(Guid::from(src))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::SqlGuid;

        /// Converts to and from uuid without moving bytes
        #[test]
        fn converts_to_and_from_uuid_without_moving_bytes() {
            let text = "01000000-0000-0000-0000-000000000000";
            let sql: SqlGuid = text.parse().unwrap();
            let uuid = uuid::Uuid::from(sql);
            assert_eq!(uuid.to_string(), text);
            assert_eq!(SqlGuid::from(uuid), sql);
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{Guid, SqlGuid};
    use serde::{Deserializer, Serializer};

    impl serde::Serialize for SqlGuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serde::Serialize::serialize(&self.0, serializer)
        }
    }

    impl<'de> serde::Deserialize<'de> for SqlGuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            <Guid as serde::Deserialize>::deserialize(deserializer).map(Self)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::SqlGuid;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes the wrapped bytes as they are
        #[test]
        fn serializes_the_wrapped_bytes_as_they_are() {
            let text = "08dc2a5b-6f3e-1d27-9c41-7b03e8a1f0c2";
            let bytes: &[u8] = &[
                8, 220, 42, 91, 111, 62, 29, 39, 156, 65, 123, 3, 232, 161, 240, 194,
            ];
            let e = text.parse::<SqlGuid>().unwrap();
            assert_ne!(e.to_guid(), *e.as_guid());

            assert_tokens(&e.readable(), &[Token::String(text)]);
            assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
        }
    }
}
