/// Bearer token support for the blog services
///
/// Tokens are signed with RS256 only. The identity provider holds the private
/// key; the blog service loads just the public key and validates incoming
/// `Authorization: Bearer` headers against it.
///
/// Keys are installed once at startup into process-wide cells and are
/// immutable afterwards:
///
/// ```no_run
/// use crypto_core::jwt;
///
/// let public_key = jwt::load_validation_key().expect("JWT public key");
/// jwt::initialize_jwt_validation_only(&public_key).expect("valid RSA key");
/// ```
use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;

const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// Environment variable holding the PEM-encoded public key inline.
pub const PUBLIC_KEY_ENV: &str = "JWT_PUBLIC_KEY_PEM";

/// Environment variable pointing at a PEM file with the public key.
pub const PUBLIC_KEY_FILE_ENV: &str = "JWT_PUBLIC_KEY_FILE";

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the acting user's UUID
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub username: String,
}

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Install both halves of the key pair.
///
/// Only token issuers (and tests) need the private key. Fails if either key
/// is malformed or keys were already installed.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    initialize_jwt_validation_only(public_key_pem)
}

/// Install the public key used to validate tokens.
pub fn initialize_jwt_validation_only(public_key_pem: &str) -> Result<()> {
    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    tracing::debug!("JWT validation key installed");
    Ok(())
}

/// Read the validation key from `JWT_PUBLIC_KEY_PEM`, falling back to the file
/// named by `JWT_PUBLIC_KEY_FILE`.
pub fn load_validation_key() -> Result<String> {
    if let Ok(pem) = std::env::var(PUBLIC_KEY_ENV) {
        if !pem.trim().is_empty() {
            return Ok(pem);
        }
    }

    let path = std::env::var(PUBLIC_KEY_FILE_ENV)
        .map_err(|_| anyhow!("neither {PUBLIC_KEY_ENV} nor {PUBLIC_KEY_FILE_ENV} is set"))?;

    std::fs::read_to_string(&path).with_context(|| format!("Failed to read JWT public key {path}"))
}

fn encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT signing key not initialized"))
}

fn decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT validation key not initialized"))
}

/// Issue a one-hour access token for `user_id`.
pub fn generate_access_token(user_id: Uuid, username: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS)).timestamp(),
        username: username.to_string(),
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key()?)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

/// Verify signature and expiry, returning the decoded claims.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key()?, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Validate `token` and parse its subject as a user id.
pub fn user_id_from_token(token: &str) -> Result<Uuid> {
    let data = validate_token(token)?;
    Uuid::parse_str(&data.claims.sub).map_err(|e| anyhow!("Invalid user ID in token: {e}"))
}
