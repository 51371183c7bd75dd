/// Key hashed to bucket a user into a test: the user id followed directly by
/// the test id
pub fn bucket_key(user_id: &str, test_id: &str) -> String {
    format!("{}{}", user_id, test_id)
}

/// 32-bit rolling hash over UTF-16 code units
///
/// `h = h * 31 + unit` with two's-complement wrap-around, then the absolute
/// value. Matches bucketing done by web clients on the same key, so a user
/// lands in the same variant whichever side assigns them.
pub fn bucket_hash(input: &str) -> u32 {
    let hash = input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    hash.unsigned_abs()
}
