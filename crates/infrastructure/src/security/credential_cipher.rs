use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use porttrace_domain::config::SecurityConfig;
use porttrace_domain::DomainError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const KEY_LEN: usize = 32;

/// Seals switch passwords with AES-256-GCM.
///
/// The stored form is `base64(nonce || ciphertext || tag)` with a fresh random
/// 96-bit nonce per value.
pub struct CredentialCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl CredentialCipher {
    pub fn new(key: &[u8]) -> Result<Self, DomainError> {
        if key.len() != KEY_LEN {
            return Err(DomainError::CredentialError(format!(
                "encryption key must be {} bytes, got {}",
                KEY_LEN,
                key.len()
            )));
        }
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| DomainError::CredentialError("invalid encryption key".to_string()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    pub fn from_base64(encoded: &str) -> Result<Self, DomainError> {
        let key = STANDARD.decode(encoded.trim()).map_err(|e| {
            DomainError::CredentialError(format!("encryption key is not valid base64: {}", e))
        })?;
        Self::new(&key)
    }

    /// Uses the configured key (env var first), otherwise the key file,
    /// generating and writing a new one when the file does not exist yet.
    pub fn load_or_create(config: &SecurityConfig) -> Result<Self, DomainError> {
        if let Some(encoded) = config.resolved_key() {
            return Self::from_base64(&encoded);
        }

        let path = Path::new(&config.key_file);
        if path.exists() {
            let encoded = fs::read_to_string(path).map_err(|e| {
                DomainError::CredentialError(format!(
                    "cannot read key file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            return Self::from_base64(&encoded);
        }

        let encoded = Self::generate_key()?;
        fs::write(path, &encoded).map_err(|e| {
            DomainError::CredentialError(format!(
                "cannot write key file {}: {}",
                path.display(),
                e
            ))
        })?;
        restrict_permissions(path);
        info!(path = %path.display(), "Generated new credential encryption key");
        Self::from_base64(&encoded)
    }

    /// A fresh random key, base64 encoded.
    pub fn generate_key() -> Result<String, DomainError> {
        let mut key = [0u8; KEY_LEN];
        SystemRandom::new()
            .fill(&mut key)
            .map_err(|_| DomainError::CredentialError("random source unavailable".to_string()))?;
        Ok(STANDARD.encode(key))
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, DomainError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| DomainError::CredentialError("random source unavailable".to_string()))?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| DomainError::CredentialError("encryption failed".to_string()))?;

        let mut envelope = Vec::with_capacity(NONCE_LEN + in_out.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&in_out);
        Ok(STANDARD.encode(envelope))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, DomainError> {
        let envelope = STANDARD
            .decode(encoded)
            .map_err(|e| DomainError::CredentialError(format!("malformed credential: {}", e)))?;
        if envelope.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(DomainError::CredentialError(
                "malformed credential: envelope too short".to_string(),
            ));
        }

        let (nonce_bytes, sealed) = envelope.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| DomainError::CredentialError("malformed nonce".to_string()))?;

        let mut in_out = sealed.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| {
                DomainError::CredentialError(
                    "credential could not be decrypted with the configured key".to_string(),
                )
            })?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| DomainError::CredentialError("credential is not valid UTF-8".to_string()))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        warn!(error = %e, path = %path.display(), "Failed to restrict key file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> CredentialCipher {
        CredentialCipher::new(&[7u8; KEY_LEN]).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let cipher = cipher();
        let sealed = cipher.encrypt("s3cr3t!").unwrap();
        assert_ne!(sealed, "s3cr3t!");
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "s3cr3t!");
    }

    #[test]
    fn test_nonce_is_fresh_per_value() {
        let cipher = cipher();
        assert_ne!(cipher.encrypt("same").unwrap(), cipher.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = cipher().encrypt("s3cr3t!").unwrap();
        let other = CredentialCipher::new(&[9u8; KEY_LEN]).unwrap();
        assert!(matches!(
            other.decrypt(&sealed),
            Err(DomainError::CredentialError(_))
        ));
    }

    #[test]
    fn test_tampered_envelope_fails() {
        let cipher = cipher();
        let mut raw = STANDARD.decode(cipher.encrypt("s3cr3t!").unwrap()).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        assert!(cipher.decrypt(&STANDARD.encode(raw)).is_err());
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(CredentialCipher::new(&[1u8; 16]).is_err());
    }

    #[test]
    fn test_generated_key_is_usable() {
        let key = CredentialCipher::generate_key().unwrap();
        let cipher = CredentialCipher::from_base64(&key).unwrap();
        let sealed = cipher.encrypt("enable").unwrap();
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "enable");
    }

    #[test]
    fn test_load_or_create_persists_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let key_file = dir.path().join("porttrace.key");
        let config = SecurityConfig {
            encryption_key: None,
            key_file: key_file.to_string_lossy().into_owned(),
        };
        if std::env::var(porttrace_domain::config::ENCRYPTION_KEY_ENV).is_ok() {
            return;
        }

        let first = CredentialCipher::load_or_create(&config).unwrap();
        let sealed = first.encrypt("pw").unwrap();
        assert!(key_file.exists());

        let second = CredentialCipher::load_or_create(&config).unwrap();
        assert_eq!(second.decrypt(&sealed).unwrap(), "pw");
    }
}
