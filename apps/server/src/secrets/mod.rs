use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("Failed to read secrets file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid secrets file: {0}")]
    Format(#[from] serde_json::Error),
    #[error("{0}")]
    Secret(String),
}

pub type Result<T> = std::result::Result<T, SecretsError>;

/// Read-only secrets file.
///
/// The file holds `{"version": 1, "secrets": {"NAME": "value"}}`, either in
/// plain JSON or encrypted as `{"version", "nonce", "ciphertext"}` with
/// ChaCha20-Poly1305 under `FW_SECRET_KEY`.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    encryption_key: Option<[u8; 32]>,
}

#[derive(Deserialize)]
struct PlainSecrets {
    #[allow(dead_code)]
    version: u32,
    secrets: HashMap<String, String>,
}

#[derive(Deserialize)]
struct EncryptedSecrets {
    #[allow(dead_code)]
    version: u32,
    nonce: String,
    ciphertext: String,
}

impl FileSecretStore {
    pub fn new(path: PathBuf, encryption_key: Option<&str>) -> Result<Self> {
        let key = match encryption_key {
            Some(value) if !value.trim().is_empty() => Some(decode_encryption_key(value)?),
            _ => None,
        };

        Ok(Self {
            path,
            encryption_key: key,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[allow(deprecated)]
    fn load_store(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read(&self.path).map_err(|source| SecretsError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }

        let value: serde_json::Value = serde_json::from_slice(&raw)?;

        if value.get("ciphertext").is_some() {
            let key = self.encryption_key.ok_or_else(|| {
                SecretsError::Secret("FW_SECRET_KEY must be set to decrypt the secrets file".into())
            })?;
            let enc: EncryptedSecrets = serde_json::from_value(value)?;
            let nonce_bytes = BASE64
                .decode(enc.nonce)
                .map_err(|e| SecretsError::Secret(format!("Failed to decode nonce: {e}")))?;
            if nonce_bytes.len() != 12 {
                return Err(SecretsError::Secret(
                    "Secrets file nonce must be 12 bytes".into(),
                ));
            }
            let cipher_bytes = BASE64
                .decode(enc.ciphertext)
                .map_err(|e| SecretsError::Secret(format!("Failed to decode ciphertext: {e}")))?;

            let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
            let nonce = Nonce::from_slice(&nonce_bytes);
            let plaintext = cipher
                .decrypt(nonce, cipher_bytes.as_ref())
                .map_err(|_| SecretsError::Secret("Failed to decrypt secrets file".into()))?;
            let plain: PlainSecrets = serde_json::from_slice(&plaintext)?;
            Ok(plain.secrets)
        } else {
            let plain: PlainSecrets = serde_json::from_value(value)?;
            Ok(plain.secrets)
        }
    }

    /// Value stored under `name`; blank values count as absent.
    pub fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let store = self.load_store()?;
        Ok(store
            .get(name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }
}

fn decode_encryption_key(raw: &str) -> Result<[u8; 32]> {
    let trimmed = raw.trim();
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            return Err(SecretsError::Secret(
                "FW_SECRET_KEY must be a base64 string or 32-byte ascii value".into(),
            ))
        }
    };

    if decoded.len() != 32 {
        return Err(SecretsError::Secret(
            "FW_SECRET_KEY must decode to exactly 32 bytes".into(),
        ));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&decoded);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ASCII_KEY: &str = "fixwatch-test-key-0123456789abcd";

    #[allow(deprecated)]
    fn encrypt(plain: &serde_json::Value, key: &[u8; 32]) -> serde_json::Value {
        let nonce_bytes = [7u8; 12];
        let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                serde_json::to_vec(plain).unwrap().as_ref(),
            )
            .unwrap();
        serde_json::json!({
            "version": 1,
            "nonce": BASE64.encode(nonce_bytes),
            "ciphertext": BASE64.encode(ciphertext),
        })
    }

    #[test]
    fn reads_plain_secret() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(
            &path,
            r#"{"version":1,"secrets":{"BANXICO_TOKEN":" abc123 ","EMPTY":"  "}}"#,
        )
        .unwrap();

        let store = FileSecretStore::new(path, None).unwrap();
        assert_eq!(
            store.get_secret("BANXICO_TOKEN").unwrap().as_deref(),
            Some("abc123")
        );
        assert_eq!(store.get_secret("EMPTY").unwrap(), None);
        assert_eq!(store.get_secret("OTHER").unwrap(), None);
    }

    #[test]
    fn missing_or_blank_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileSecretStore::new(dir.path().join("absent.json"), None).unwrap();
        assert_eq!(store.get_secret("BANXICO_TOKEN").unwrap(), None);

        let blank = dir.path().join("blank.json");
        fs::write(&blank, "\n").unwrap();
        let store = FileSecretStore::new(blank, None).unwrap();
        assert_eq!(store.get_secret("BANXICO_TOKEN").unwrap(), None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, "BANXICO_TOKEN = \"abc\"").unwrap();

        let store = FileSecretStore::new(path, None).unwrap();
        assert!(matches!(
            store.get_secret("BANXICO_TOKEN"),
            Err(SecretsError::Format(_))
        ));
    }

    #[test]
    fn reads_encrypted_secret() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        let key = decode_encryption_key(ASCII_KEY).unwrap();
        let plain = serde_json::json!({ "version": 1, "secrets": { "BANXICO_TOKEN": "sealed" } });
        fs::write(&path, encrypt(&plain, &key).to_string()).unwrap();

        let store = FileSecretStore::new(path.clone(), Some(ASCII_KEY)).unwrap();
        assert_eq!(
            store.get_secret("BANXICO_TOKEN").unwrap().as_deref(),
            Some("sealed")
        );

        let keyless = FileSecretStore::new(path, None).unwrap();
        assert!(matches!(
            keyless.get_secret("BANXICO_TOKEN"),
            Err(SecretsError::Secret(_))
        ));
    }

    #[test]
    fn rejects_short_key() {
        assert!(FileSecretStore::new(PathBuf::from("secrets.json"), Some("too-short")).is_err());
    }
}
