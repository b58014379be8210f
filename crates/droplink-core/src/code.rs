//! Share-code generation.
//!
//! Codes are 6 characters from an uppercase alphanumeric alphabet (36^6 ≈
//! 2.2e9 possibilities). The generator performs no uniqueness check; the
//! registry's primary key enforces uniqueness and the transfer service
//! retries with a fresh code on collision.

use rand::Rng;

/// Length of every share code.
pub const CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of share codes. Injected into the transfer service so tests can
/// force collisions.
pub trait CodeSource: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniformly random codes from the standard alphabet.
#[derive(Debug, Clone, Default)]
pub struct RandomCode;

impl CodeSource for RandomCode {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..CODE_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Normalize a client-supplied code for lookup. Codes are single-case so
/// sharing them verbally or via QR survives case mangling.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_fixed_length_and_in_alphabet() {
        let source = RandomCode;
        for _ in 0..200 {
            let code = source.generate();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn codes_are_already_normalized() {
        let source = RandomCode;
        let code = source.generate();
        assert_eq!(code, normalize_code(&code));
    }

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize_code(" ab12cd "), "AB12CD");
    }

    #[test]
    fn generator_does_not_trivially_repeat() {
        let source = RandomCode;
        let codes: HashSet<String> = (0..1000).map(|_| source.generate()).collect();
        // 1000 draws from 2.2e9 should essentially never collide.
        assert!(codes.len() > 995);
    }
}
