//! Human-readable document numbers (`ET4KQ9ZD`, `VAT-7H2M0QXA`)

use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// `prefix` followed by `length` random upper-case alphanumerics.
pub fn generate_number<R: Rng + ?Sized>(rng: &mut R, prefix: &str, length: usize) -> String {
    let mut number = String::with_capacity(prefix.len() + length);
    number.push_str(prefix);
    number.extend((0..length).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char));
    number
}

/// [`generate_number`] with the thread-local RNG.
pub fn random_number(prefix: &str, length: usize) -> String {
    generate_number(&mut rand::rng(), prefix, length)
}
