// Password reset tokens
// Decision: the raw token goes out by email only; the database stores a
// SHA-256 hash, so a leaked dump cannot reset passwords

use rand::Rng;
use sha2::{Digest, Sha256};

const RESET_TOKEN_LENGTH: usize = 32; // 32 random bytes = 64 hex chars

/// Generated reset token (raw value leaves the process only via email)
#[derive(Debug)]
pub struct GeneratedResetToken {
    /// Raw token embedded in the reset link
    pub token: String,
    /// SHA-256 hash for database storage
    pub token_hash: String,
}

/// Generate a new single-use reset token
pub fn generate_reset_token() -> GeneratedResetToken {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..RESET_TOKEN_LENGTH).map(|_| rng.gen()).collect();
    let token = hex::encode(&random_bytes);

    GeneratedResetToken {
        token_hash: hash_reset_token(&token),
        token,
    }
}

/// Hash a reset token for database storage/lookup
pub fn hash_reset_token(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    hex::encode(hash)
}

/// Validate reset token format before touching the database
pub fn is_valid_reset_token_format(token: &str) -> bool {
    token.len() == RESET_TOKEN_LENGTH * 2 && token.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reset_token() {
        let generated = generate_reset_token();

        assert!(is_valid_reset_token_format(&generated.token));
        assert_eq!(generated.token_hash, hash_reset_token(&generated.token));
        // The stored hash never equals the raw token.
        assert_ne!(generated.token, generated.token_hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_ne!(a.token, b.token);
        assert_ne!(a.token_hash, b.token_hash);
    }

    #[test]
    fn test_hash_consistency() {
        let token = "aa".repeat(32);
        assert_eq!(hash_reset_token(&token), hash_reset_token(&token));
    }

    #[test]
    fn test_format_validation() {
        assert!(is_valid_reset_token_format(&"ab".repeat(32)));
        // Too short
        assert!(!is_valid_reset_token_format("abcd"));
        // Right length, non-hex characters
        assert!(!is_valid_reset_token_format(&"zz".repeat(32)));
        assert!(!is_valid_reset_token_format(""));
    }
}
