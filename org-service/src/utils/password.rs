use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use std::fmt;

/// Newtype for password to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// One-way password digest capability.
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest of `password`.
    fn hash(&self, password: &Password) -> Result<String, anyhow::Error>;

    /// Check `password` against a digest produced by [`PasswordHasher::hash`].
    /// A malformed digest never verifies.
    fn verify(&self, password: &Password, digest: &str) -> bool;
}

/// Argon2id hasher producing PHC strings.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost parameters (memory in KiB). Digests made with any cost
    /// parameters still verify, since the parameters are stored in the digest.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, anyhow::Error> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| anyhow::anyhow!("Invalid argon2 parameters: {}", e))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &Password) -> Result<String, anyhow::Error> {
        let salt = SaltString::generate(&mut OsRng);

        let digest = self
            .argon2()
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        Ok(digest)
    }

    fn verify(&self, password: &Password, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            tracing::warn!("Stored password digest is not a valid PHC string");
            return false;
        };

        self.argon2()
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(64, 1, 1).expect("valid params")
    }

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let digest = hasher().hash(&Password::new("TestPass123!")).unwrap();
        assert!(digest.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify() {
        let hasher = hasher();
        let password = Password::new("TestPass123!");
        let digest = hasher.hash(&password).unwrap();

        assert!(hasher.verify(&password, &digest));
        assert!(!hasher.verify(&Password::new("wrongPassword"), &digest));
        assert!(!hasher.verify(&password, "not-a-digest"));
    }

    #[test]
    fn test_salted_digests_differ_but_both_verify() {
        let hasher = hasher();
        let password = Password::new("TestPass123!");
        let first = hasher.hash(&password).unwrap();
        let second = hasher.hash(&password).unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&password, &first));
        assert!(Argon2Hasher::new().verify(&password, &second));
    }

    #[test]
    fn test_debug_hides_plaintext() {
        let password = Password::new("TestPass123!");
        assert_eq!(format!("{:?}", password), "Password(***)");
    }
}
