pub mod record;
#[allow(clippy::module_inception)]
pub mod vault;

pub use record::{CredentialSubmission, UserExchangeCredential};
pub use vault::{
    generate_key, CredentialVault, EncryptedSecret, KeySource, VaultError, DEFAULT_DEV_KEY,
    KEY_ENV_VAR,
};
