use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{
    engine::general_purpose::{STANDARD as BASE64_STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand_core::{OsRng, RngCore};
use uuid::Uuid;

pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Random bearer secret. Only its hash is ever stored.
pub fn new_token() -> String {
    let mut buf = [0u8; 32];
    let mut rng = OsRng;
    rng.fill_bytes(&mut buf);
    format!("tok_{}", URL_SAFE_NO_PAD.encode(buf))
}

/// Six digit one-time code, uniform over 100000..=999999.
pub fn new_otp() -> String {
    OsRng.gen_range(100_000..=999_999u32).to_string()
}

pub fn hash_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let mut rng = OsRng;
    let salt = SaltString::generate(&mut rng);
    let hash = Argon2::default().hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default().verify_password(secret.as_bytes(), &parsed).is_ok())
}

/// `now + ttl`, for stamping OTPs, sessions and grants.
pub fn expiry_from_now(ttl: std::time::Duration) -> Option<DateTime<Utc>> {
    Utc::now().checked_add_signed(chrono::Duration::from_std(ttl).ok()?)
}

/// What the client holds: `base64("{record_id}.{secret}")`.
pub fn construct_token(record_id: &Uuid, secret: &str) -> String {
    BASE64_STANDARD.encode(format!("{record_id}.{secret}"))
}

/// Inverse of [`construct_token`]. `None` for anything malformed.
pub fn extract_token_parts(token: &str) -> Option<(Uuid, String)> {
    let decoded = BASE64_STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once('.')?;
    if secret.is_empty() {
        return None;
    }
    Some((Uuid::parse_str(id).ok()?, secret.to_string()))
}
