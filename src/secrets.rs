use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

/// Length of a generated database password.
pub const PASSWORD_LEN: usize = 25;

/// Generate a database password: 32 random bytes, base64
/// encoded, `=+/` stripped, truncated to [`PASSWORD_LEN`].
#[must_use]
pub fn generate_password() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    STANDARD
        .encode(bytes)
        .chars()
        .filter(|c| !matches!(c, '=' | '+' | '/'))
        .take(PASSWORD_LEN)
        .collect()
}

/// Generate the application secret key: 64 random bytes, hex
/// encoded (128 characters).
#[must_use]
pub fn generate_secret_key() -> String {
    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
