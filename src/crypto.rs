use anyhow::{anyhow, Result};
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};
use std::num::NonZeroU32;

const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// Derives the 32-byte AES key used for token-at-rest encryption from the
/// configured secret.
fn derive_key(secret: &str) -> [u8; 32] {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

pub fn encrypt_token(secret: &str, plaintext: &str) -> Result<String> {
    let unbound = UnboundKey::new(&AES_256_GCM, &derive_key(secret))
        .map_err(|_| anyhow!("invalid encryption key"))?;
    let key = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| anyhow!("failed to generate nonce"))?;

    let mut in_out = plaintext.as_bytes().to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| anyhow!("token encryption failed"))?;

    let mut payload = nonce_bytes.to_vec();
    payload.extend_from_slice(&in_out);
    Ok(b64().encode(payload))
}

pub fn decrypt_token(secret: &str, encoded: &str) -> Result<String> {
    let payload = b64().decode(encoded)?;
    if payload.len() <= NONCE_LEN {
        return Err(anyhow!("ciphertext too short"));
    }

    let unbound = UnboundKey::new(&AES_256_GCM, &derive_key(secret))
        .map_err(|_| anyhow!("invalid encryption key"))?;
    let key = LessSafeKey::new(unbound);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&payload[..NONCE_LEN]);
    let mut in_out = payload[NONCE_LEN..].to_vec();

    let plaintext = key
        .open_in_place(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| anyhow!("token decryption failed"))?;

    Ok(String::from_utf8(plaintext.to_vec())?)
}

/// PBKDF2-HMAC-SHA256 password hash, stored as `base64(salt)$base64(derived)`.
pub fn hash_password(password: &str) -> Result<String> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| anyhow!("failed to generate salt"))?;

    let mut derived = [0u8; 32];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(PBKDF2_ITERATIONS).expect("nonzero iterations"),
        &salt,
        password.as_bytes(),
        &mut derived,
    );

    Ok(format!("{}${}", b64().encode(salt), b64().encode(derived)))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_part, hash_part)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (b64().decode(salt_part), b64().decode(hash_part)) else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(PBKDF2_ITERATIONS).expect("nonzero iterations"),
        &salt,
        password.as_bytes(),
        &expected,
    )
    .is_ok()
}

/// Random url-safe token for sessions and invitations.
pub fn generate_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Sessions are stored server-side by digest only.
pub fn token_digest(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert_ne!(hash, "hunter2-but-longer");
        assert!(verify_password("hunter2-but-longer", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn token_encryption_roundtrip() {
        let secret = "unit-test-secret";
        let encrypted = encrypt_token(secret, "ya29.access-token").unwrap();
        assert_ne!(encrypted, "ya29.access-token");
        assert_eq!(decrypt_token(secret, &encrypted).unwrap(), "ya29.access-token");
        assert!(decrypt_token("other-secret", &encrypted).is_err());
    }

    #[test]
    fn digest_is_stable() {
        assert_eq!(token_digest("abc"), token_digest("abc"));
        assert_ne!(token_digest("abc"), token_digest("abd"));
    }
}
