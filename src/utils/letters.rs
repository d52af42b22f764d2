use rand::Rng;

/// Letters used to pad a puzzle around the hidden words
pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Draw an uppercase letter A-Z, every letter equally likely
pub fn random_letter(rng: &mut impl Rng) -> char {
    ALPHABET[rng.random_range(0..ALPHABET.len())] as char
}
