//! Argon2 password hashing implementation.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use bazar_core::ports::{AuthError, PasswordService};

/// Argon2-based password service.
///
/// Defaults to Argon2id with the library's recommended parameters; the
/// memory cost can be lowered via `ARGON2_MEMORY_KIB` for
/// resource-constrained deployments.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    pub fn from_env() -> Self {
        let Some(memory_kib) = std::env::var("ARGON2_MEMORY_KIB")
            .ok()
            .and_then(|s| s.parse().ok())
        else {
            return Self::new();
        };

        match Params::new(
            memory_kib,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
            None,
        ) {
            Ok(params) => Self {
                argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Invalid ARGON2_MEMORY_KIB, using defaults");
                Self::new()
            }
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = Argon2PasswordService::new();
        let password = "correta-cavalo-bateria";

        let hash = service.hash(password).unwrap();
        assert!(service.verify(password, &hash).unwrap());
        assert!(!service.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = Argon2PasswordService::new();

        let a = service.hash("mesma-senha").unwrap();
        let b = service.hash("mesma-senha").unwrap();
        assert_ne!(a, b);
        assert!(service.verify("mesma-senha", &a).unwrap());
        assert!(service.verify("mesma-senha", &b).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let service = Argon2PasswordService::new();
        assert!(service.verify("qualquer", "not-a-phc-string").is_err());
    }
}
