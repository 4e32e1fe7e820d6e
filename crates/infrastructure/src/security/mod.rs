pub mod credential_cipher;

pub use credential_cipher::CredentialCipher;
