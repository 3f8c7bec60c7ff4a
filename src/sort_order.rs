//! Byte permutations between native sort order and SQL Server sort order.
//!
//! SQL Server does not compare `uniqueidentifier` values byte by byte. It compares the last six
//! bytes of the memory layout first, then bytes 8-9, then 6-7, then 4-5, and the first four
//! bytes last (see [`SQL_COMPARE_ORDER`]). A GUID whose timestamp leads its native byte order
//! therefore lands at a random position in a clustered index unless its bytes are rearranged.
//!
//! [`to_database_order`] and [`to_native_order`] perform that rearrangement on any 16 bytes in
//! GUID memory layout. They are exact inverses of one another and know nothing about the payload.

/// Source index of each output byte when converting to SQL Server sort order.
pub const SQL_INDEX: [usize; 16] = [12, 13, 14, 15, 10, 11, 8, 9, 7, 6, 3, 2, 1, 0, 5, 4];

/// Source index of each output byte when converting back to native sort order.
pub const NATIVE_INDEX: [usize; 16] = [13, 12, 11, 10, 15, 14, 9, 8, 6, 7, 4, 5, 0, 1, 2, 3];

/// Memory-layout byte indices in the order SQL Server compares them, most significant first.
pub const SQL_COMPARE_ORDER: [usize; 16] = [10, 11, 12, 13, 14, 15, 8, 9, 6, 7, 4, 5, 0, 1, 2, 3];

/// Rearranges native-ordered bytes so that SQL Server sorts them the same way.
pub const fn to_database_order(bytes: [u8; 16]) -> [u8; 16] {
    gather(bytes, &SQL_INDEX)
}

/// Rearranges SQL Server-ordered bytes back into native sort order.
pub const fn to_native_order(bytes: [u8; 16]) -> [u8; 16] {
    gather(bytes, &NATIVE_INDEX)
}

const fn gather(src: [u8; 16], index: &[usize; 16]) -> [u8; 16] {
    let mut dst = [0u8; 16];
    let mut i = 0;
    while i < 16 {
        dst[i] = src[index[i]];
        i += 1;
    }
    dst
}
