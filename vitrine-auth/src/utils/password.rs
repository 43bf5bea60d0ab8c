use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString},
    Argon2,
};

/// Compares a plaintext password with a stored hash.
pub trait PasswordVerifier: Send + Sync {
    /// `Ok(())` when `plaintext` matches `hash`.
    fn compare_hash_and_password(&self, hash: &str, plaintext: &str) -> Result<(), anyhow::Error>;
}

/// Verifier that understands Argon2 (PHC string) and bcrypt hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashVerifier;

impl PasswordVerifier for HashVerifier {
    fn compare_hash_and_password(&self, hash: &str, plaintext: &str) -> Result<(), anyhow::Error> {
        if hash.starts_with("$argon2") {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed_hash)
                .map_err(|_| anyhow::anyhow!("Password verification failed"))
        } else if is_bcrypt(hash) {
            match bcrypt::verify(plaintext, hash) {
                Ok(true) => Ok(()),
                Ok(false) => Err(anyhow::anyhow!("Password verification failed")),
                Err(e) => Err(anyhow::anyhow!("Invalid password hash format: {}", e)),
            }
        } else {
            Err(anyhow::anyhow!("Unsupported password hash format"))
        }
    }
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(plaintext: &str) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2_hash_verifies() {
        let hash = hash_password("secret").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2"));

        assert!(HashVerifier.compare_hash_and_password(&hash, "secret").is_ok());
        assert!(HashVerifier.compare_hash_and_password(&hash, "wrong").is_err());
    }

    #[test]
    fn test_bcrypt_hash_verifies() {
        let hash = bcrypt::hash("secret", 4).expect("Failed to hash password");

        assert!(HashVerifier.compare_hash_and_password(&hash, "secret").is_ok());
        assert!(HashVerifier.compare_hash_and_password(&hash, "wrong").is_err());
    }

    #[test]
    fn test_unknown_hash_format_never_matches() {
        assert!(HashVerifier.compare_hash_and_password("secret", "secret").is_err());
        assert!(HashVerifier.compare_hash_and_password("", "").is_err());
    }

    #[test]
    fn test_salts_differ() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
    }
}
