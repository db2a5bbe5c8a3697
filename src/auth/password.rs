use base64::{Engine, engine::general_purpose::STANDARD as B64};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use uuid::Uuid;

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

const KEY_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 credential. Salt and hash are base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
    pub iterations: u32,
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

pub fn hash_password(password: &str, iterations: u32) -> PasswordHash {
    let salt = Uuid::new_v4().into_bytes();
    let key = derive_key(password, &salt, iterations);
    PasswordHash {
        salt: B64.encode(salt),
        hash: B64.encode(key),
        iterations,
    }
}

pub fn verify_password(password: &str, stored: &PasswordHash) -> bool {
    let (Ok(salt), Ok(expected)) = (B64.decode(&stored.salt), B64.decode(&stored.hash)) else {
        return false;
    };
    let key = derive_key(password, &salt, stored.iterations);
    constant_time_eq(&key, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b) {
        result |= x ^ y;
    }

    result == 0
}
