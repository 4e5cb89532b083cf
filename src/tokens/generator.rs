use rand::Rng;

/// Generate an opaque hex identifier from `len` random bytes.
///
/// Session ids use 16 bytes (32 hex characters); the value carries no
/// meaning beyond identity.
pub fn generate_hex(len: usize) -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_hex() {
        let id = generate_hex(16);
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        // Ensure randomness
        assert_ne!(generate_hex(16), generate_hex(16));
    }
}
