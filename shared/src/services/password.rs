//! PBKDF2-HMAC-SHA256 password hashing.
//!
//! Stored format: `pbkdf2-sha256$<rounds>$<salt>$<hash>`, with salt and hash
//! base64 encoded without padding.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{Error, Result};

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    rounds: u32,
}

impl PasswordHasher {
    pub fn new(rounds: u32) -> Self {
        Self { rounds: rounds.max(1) }
    }

    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let mut hash = [0u8; HASH_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, self.rounds, &mut hash);

        format!(
            "{}${}${}${}",
            SCHEME,
            self.rounds,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(hash)
        )
    }

    /// Check `password` against a stored hash.
    ///
    /// The round count comes from the stored value, so hashes made with an
    /// older `PASSWORD_HASH_ROUNDS` keep verifying.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool> {
        let mut parts = stored.split('$');
        let (scheme, rounds, salt, expected) =
            match (parts.next(), parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(scheme), Some(rounds), Some(salt), Some(hash), None) => {
                    (scheme, rounds, salt, hash)
                }
                _ => return Err(Error::PasswordHash("malformed password hash".to_string())),
            };
        if scheme != SCHEME {
            return Err(Error::PasswordHash(format!("unsupported scheme '{}'", scheme)));
        }

        let rounds: u32 = rounds
            .parse()
            .ok()
            .filter(|r| *r > 0)
            .ok_or_else(|| Error::PasswordHash(format!("invalid round count '{}'", rounds)))?;
        let salt = STANDARD_NO_PAD
            .decode(salt)
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        let expected = STANDARD_NO_PAD
            .decode(expected)
            .map_err(|e| Error::PasswordHash(e.to_string()))?;

        let mut actual = vec![0u8; expected.len()];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, rounds, &mut actual);

        // constant time over the full length
        let diff = actual
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        Ok(diff == 0 && !expected.is_empty())
    }
}
