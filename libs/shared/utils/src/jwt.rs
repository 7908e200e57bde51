use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, JwtHeader};

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of an identity token.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Invalid token format: {0}")]
    Malformed(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,
}

fn sign(signing_input: &str, jwt_secret: &str) -> Result<HmacSha256, TokenError> {
    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| TokenError::MissingSecret)?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

/// Issues a compact HS256 token for `subject`, valid for [`TOKEN_TTL_DAYS`]
/// from `issued_at`.
pub fn issue_token(subject: &str, jwt_secret: &str, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let claims = JwtClaims {
        sub: subject.to_string(),
        iat: issued_at.timestamp(),
        exp: (issued_at + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    let header_json = serde_json::to_vec(&header)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;
    let claims_json = serde_json::to_vec(&claims)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = sign(&signing_input, jwt_secret)?.finalize().into_bytes();

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<JwtClaims, TokenError> {
    validate_token_at(token, jwt_secret, Utc::now())
}

/// Verifies signature and expiry of `token` as of `now`. Never touches a store.
pub fn validate_token_at(token: &str, jwt_secret: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed("expected three segments".to_string()));
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::Malformed("invalid signature encoding".to_string())
    })?;

    let signing_input = format!("{}.{}", header_b64, claims_b64);
    if sign(&signing_input, jwt_secret)?.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::InvalidSignature);
    }

    let header: JwtHeader = URL_SAFE_NO_PAD
        .decode(header_b64)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(|| TokenError::Malformed("invalid header".to_string()))?;
    if header.alg != "HS256" {
        return Err(TokenError::Malformed(format!("unsupported algorithm {}", header.alg)));
    }

    let claims: JwtClaims = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::Malformed("invalid claims encoding".to_string()))
        .and_then(|bytes| {
            serde_json::from_slice(&bytes).map_err(|e| {
                debug!("Failed to parse claims: {}", e);
                TokenError::Malformed("invalid claims format".to_string())
            })
        })?;

    let now_ts = now.timestamp();
    if claims.exp < now_ts {
        debug!("Token expired at {} (now: {})", claims.exp, now_ts);
        return Err(TokenError::Expired);
    }

    debug!("Token validated successfully for subject: {}", claims.sub);
    Ok(claims)
}
