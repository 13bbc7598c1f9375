use rand::RngExt;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const GENERATED_ID_LEN: usize = 7;

/// Produces a candidate short identifier: 7 characters from the base-36
/// alphabet, non-cryptographic randomness.
///
/// No uniqueness check happens here and no retry happens anywhere: a
/// generated id that is already taken surfaces as a conflict from the
/// store's create step. The collision probability is small but non-zero;
/// this is a documented limitation of the allocation policy.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_ID_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
