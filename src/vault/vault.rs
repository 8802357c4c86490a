use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use base64::engine::general_purpose;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, Secret, SecretString};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Environment variable holding the base64 vault key
pub const KEY_ENV_VAR: &str = "EXCHANGE_CREDENTIALS_KEY";

/// Development fallback used when no key is configured. Never use in production.
pub const DEFAULT_DEV_KEY: &str = "Pjk+k4hske5KkKtbaKSVDOgpllRl+0EI6oCAdx88XqI=";

pub const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Vault key is not valid base64")]
    InvalidKeyEncoding,

    #[error("Vault key must decode to 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Encrypted value is not valid base64")]
    MalformedCiphertext,

    #[error("Encrypted value is too short")]
    CiphertextTooShort,

    #[error("Encrypted value failed authentication")]
    AuthenticationFailed,

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decrypted value is not valid UTF-8")]
    InvalidUtf8,
}

impl VaultError {
    /// True for key loading failures, false for unreadable ciphertexts
    pub const fn is_key_error(&self) -> bool {
        matches!(self, Self::InvalidKeyEncoding | Self::InvalidKeyLength(_))
    }
}

/// Where the vault reads its key from
#[derive(Clone)]
pub enum KeySource {
    /// Named environment variable; unset or blank falls back to [`DEFAULT_DEV_KEY`]
    Env(String),
    Static(SecretString),
}

impl KeySource {
    fn load(&self) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        let encoded = match self {
            Self::Env(var) => match env::var(var) {
                Ok(value) if !value.trim().is_empty() => Zeroizing::new(value),
                _ => {
                    warn!(
                        env_var = %var,
                        "No vault key configured, using the development default key"
                    );
                    Zeroizing::new(DEFAULT_DEV_KEY.to_string())
                }
            },
            Self::Static(secret) => Zeroizing::new(secret.expose_secret().clone()),
        };

        general_purpose::STANDARD
            .decode(encoded.trim())
            .map(Zeroizing::new)
            .map_err(|_| VaultError::InvalidKeyEncoding)
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(var) => f.debug_tuple("Env").field(var).finish(),
            Self::Static(_) => f.write_str("Static([REDACTED])"),
        }
    }
}

impl Default for KeySource {
    fn default() -> Self {
        Self::Env(KEY_ENV_VAR.to_string())
    }
}

enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl Cipher {
    fn from_key(key: &[u8]) -> Result<Self, VaultError> {
        let invalid = |_| VaultError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => Aes192Gcm::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => Aes256Gcm::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            other => Err(VaultError::InvalidKeyLength(other)),
        }
    }

    const fn bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }

    fn seal(&self, nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        }
    }

    fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
    }
}

/// Base64 `nonce || ciphertext || tag` as stored at rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedSecret(String);

impl EncryptedSecret {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for EncryptedSecret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EncryptedSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type CipherState = Option<Result<Arc<Cipher>, VaultError>>;

/// AES-GCM vault for exchange credentials
///
/// The key is read lazily on first use and cached for the lifetime of the
/// vault; a key that fails to load keeps failing until [`reset`](Self::reset).
pub struct CredentialVault {
    source: KeySource,
    cipher: RwLock<CipherState>,
    loads: AtomicUsize,
}

impl fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVault")
            .field("source", &self.source)
            .field("key_loads", &self.key_loads())
            .finish_non_exhaustive()
    }
}

impl Default for CredentialVault {
    fn default() -> Self {
        Self::new(KeySource::default())
    }
}

impl CredentialVault {
    pub fn new(source: KeySource) -> Self {
        Self {
            source,
            cipher: RwLock::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Vault reading [`KEY_ENV_VAR`]
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Vault with an explicit base64 key
    pub fn with_key(key_b64: impl Into<String>) -> Self {
        Self::new(KeySource::Static(Secret::new(key_b64.into())))
    }

    /// Process-wide vault reading [`KEY_ENV_VAR`]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<CredentialVault> = OnceLock::new();
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Number of times key material has been read from the source
    pub fn key_loads(&self) -> usize {
        self.loads.load(Ordering::Acquire)
    }

    fn cipher(&self) -> Result<Arc<Cipher>, VaultError> {
        {
            let state = self.cipher.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(loaded) = state.as_ref() {
                return loaded.clone();
            }
        }

        let mut state = self.cipher.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(loaded) = state.as_ref() {
            return loaded.clone();
        }

        self.loads.fetch_add(1, Ordering::AcqRel);
        let loaded = self
            .source
            .load()
            .and_then(|key| Cipher::from_key(&key))
            .map(Arc::new);

        match &loaded {
            Ok(cipher) => info!(bits = cipher.bits(), "Credential vault key loaded"),
            Err(e) => warn!(error = %e, "Credential vault key rejected"),
        }

        *state = Some(loaded.clone());
        loaded
    }

    /// Encrypt `plaintext` under a fresh random nonce
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedSecret, VaultError> {
        let cipher = self.cipher()?;

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let sealed = cipher
            .seal(&nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);

        Ok(EncryptedSecret(general_purpose::STANDARD.encode(out)))
    }

    /// Decrypt a value produced by [`encrypt`](Self::encrypt)
    pub fn decrypt(&self, encrypted: impl AsRef<str>) -> Result<SecretString, VaultError> {
        let cipher = self.cipher()?;

        let data = general_purpose::STANDARD
            .decode(encrypted.as_ref().trim())
            .map_err(|_| VaultError::MalformedCiphertext)?;

        if data.len() < NONCE_SIZE + TAG_SIZE {
            return Err(VaultError::CiphertextTooShort);
        }

        let (nonce, sealed) = data.split_at(NONCE_SIZE);
        let plaintext = Zeroizing::new(
            cipher
                .open(nonce, sealed)
                .map_err(|_| VaultError::AuthenticationFailed)?,
        );

        let text = std::str::from_utf8(&plaintext).map_err(|_| VaultError::InvalidUtf8)?;
        Ok(Secret::new(text.to_string()))
    }

    /// Forget the cached key so the next call reloads it from the source
    pub fn reset(&self) {
        let mut state = self.cipher.write().unwrap_or_else(PoisonError::into_inner);
        *state = None;
    }
}

/// Fresh random 256-bit key, base64 encoded
pub fn generate_key() -> String {
    let mut key = Zeroizing::new([0u8; 32]);
    OsRng.fill_bytes(&mut key[..]);
    general_purpose::STANDARD.encode(&key[..])
}
