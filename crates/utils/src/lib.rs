use rand::Rng;
use subtle::ConstantTimeEq;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";

/// Alphanumeric secret used for shared-key checks such as the cron trigger
/// and webhook headers
pub fn create_random_secret(secret_len: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..secret_len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Compares two secrets in constant time, so response timings do not leak
/// how much of a guess was right
pub fn secrets_match(expected: &str, given: &str) -> bool {
    expected.as_bytes().ct_eq(given.as_bytes()).unwrap_u8() == 1
}
