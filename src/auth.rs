use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{info, warn};

use crate::db::AdminStore;
use crate::error::AppError;
use crate::models::AdminUser;
use crate::state::AppState;

const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Bearer-token payload for the admin dashboard. HS256 over base64url
/// without padding; verification checks signature and expiry, nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub uid: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn issue(&self, user: &AdminUser) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: user.username.clone(),
            uid: user.id,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &AdminClaims) -> Result<String, AppError> {
        let header = TokenHeader {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };
        let header_json = serde_json::to_vec(&header)
            .map_err(|e| AppError::Internal(format!("Failed to serialize token header: {}", e)))?;
        let claims_json = serde_json::to_vec(claims)
            .map_err(|e| AppError::Internal(format!("Failed to serialize token claims: {}", e)))?;

        let header_b64 = URL_SAFE_NO_PAD.encode(header_json);
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json);
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
    }

    pub fn verify(&self, token: &str) -> Result<AdminClaims, AppError> {
        let mut parts = token.split('.');
        let Some(header_b64) = parts.next() else {
            return Err(AppError::Unauthorized);
        };
        let Some(claims_b64) = parts.next() else {
            return Err(AppError::Unauthorized);
        };
        let Some(sig_b64) = parts.next() else {
            return Err(AppError::Unauthorized);
        };
        if parts.next().is_some() {
            return Err(AppError::Unauthorized);
        }

        let header_raw = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| AppError::Unauthorized)?;
        let header: TokenHeader =
            serde_json::from_slice(&header_raw).map_err(|_| AppError::Unauthorized)?;
        if header.alg != "HS256" || header.typ.to_ascii_uppercase() != "JWT" {
            return Err(AppError::Unauthorized);
        }

        let signing_input = format!("{}.{}", header_b64, claims_b64);
        let signature = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| AppError::Unauthorized)?;
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AppError::Unauthorized)?;

        let claims_raw = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .map_err(|_| AppError::Unauthorized)?;
        let claims: AdminClaims =
            serde_json::from_slice(&claims_raw).map_err(|_| AppError::Unauthorized)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<Hmac<Sha256>, AppError> {
        Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid signing key: {}", e)))
    }
}

/// Handlers take `AdminClaims` as an argument to require a valid bearer
/// token; routes without it stay public.
impl FromRequestParts<AppState> for AdminClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
        state.tokens.verify(token)
    }
}

/// Checks credentials against the stored hash and records the login time.
/// A wrong username and a wrong password fail the same way.
pub async fn authenticate(
    admins: &AdminStore,
    username: &str,
    password: &str,
) -> Result<AdminUser, AppError> {
    let Some(user) = admins.find_by_username(username).await? else {
        warn!("login failed for unknown username: {}", username);
        return Err(AppError::Unauthorized);
    };

    let valid = match bcrypt::verify(password, &user.password_hash) {
        Ok(valid) => valid,
        Err(_) => false,
    };
    if !valid {
        warn!("login failed for username: {}", username);
        return Err(AppError::Unauthorized);
    }

    admins.touch_last_login(user.id).await?;
    info!("admin logged in: {}", user.username);
    Ok(user)
}

/// Creates the configured admin account on first boot. Existing accounts
/// are left alone, so a changed env password never overwrites the stored one.
pub async fn ensure_admin(
    admins: &AdminStore,
    username: &str,
    password: &str,
) -> Result<(), AppError> {
    if admins.find_by_username(username).await?.is_some() {
        info!("admin account already provisioned: {}", username);
        return Ok(());
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let id = admins.create(username, &password_hash).await?;
    info!("admin account created: {} (id {})", username, id);
    Ok(())
}
