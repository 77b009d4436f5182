use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::models::{Credentials, User, UserSession};
use crate::services::store::{StoreError, UserStore};
use crate::utils::{random_base64, validate_email};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;
const SCRYPT_KEY_LEN: usize = 128;
// Only bounds-checked by `Params`; the derived key length is the output buffer's.
const SCRYPT_PARAMS_LEN: usize = 32;
const USER_ID_BYTES: usize = 64;
const SALT_BYTES: usize = 128;
const MAX_ID_ATTEMPTS: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    uid: String,
    exp: u64,
    jti: String,
}

/// Derives the scrypt key for `password` and encodes it as `log_n$r$p$hash`.
pub fn hash_password(password: &str, salt: &str, log_n: u8) -> Result<String, ApiError> {
    let params = scrypt::Params::new(log_n, SCRYPT_R, SCRYPT_P, SCRYPT_PARAMS_LEN)
        .map_err(|e| ApiError::Internal(format!("invalid scrypt parameters: {}", e)))?;
    let mut key = vec![0u8; SCRYPT_KEY_LEN];
    scrypt::scrypt(password.as_bytes(), salt.as_bytes(), &params, &mut key)
        .map_err(|e| ApiError::Internal(format!("scrypt failed: {}", e)))?;
    Ok(format!(
        "{}${}${}${}",
        log_n,
        SCRYPT_R,
        SCRYPT_P,
        STANDARD_NO_PAD.encode(key)
    ))
}

/// Checks `password` against an encoded hash, using the cost stored with the hash.
pub fn verify_password(password: &str, salt: &str, encoded: &str) -> bool {
    let mut parts = encoded.splitn(4, '$');
    let (Some(log_n), Some(r), Some(p), Some(hash)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let (Ok(log_n), Ok(r), Ok(p), Ok(expected)) = (
        log_n.parse::<u8>(),
        r.parse::<u32>(),
        p.parse::<u32>(),
        STANDARD_NO_PAD.decode(hash),
    ) else {
        return false;
    };
    let Ok(params) = scrypt::Params::new(log_n, r, p, SCRYPT_PARAMS_LEN) else {
        return false;
    };
    if expected.len() != SCRYPT_KEY_LEN {
        return false;
    }
    let mut key = vec![0u8; SCRYPT_KEY_LEN];
    if scrypt::scrypt(password.as_bytes(), salt.as_bytes(), &params, &mut key).is_err() {
        return false;
    }
    key.as_slice().ct_eq(expected.as_slice()).into()
}

pub struct AuthService {
    store: Arc<dyn UserStore>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    scrypt_log_n: u8,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, config: &AuthConfig) -> Self {
        let secret = match &config.jwt_secret {
            Some(secret) => secret.clone(),
            None => random_base64(128),
        };
        Self {
            store,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::from_secs(config.token_ttl_secs),
            scrypt_log_n: config.scrypt_log_n,
        }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub fn generate_token(&self, user_id: &str) -> Result<String, ApiError> {
        let exp = Utc::now().timestamp().max(0) as u64 + self.token_ttl.as_secs();
        let claims = Claims {
            uid: user_id.to_string(),
            exp,
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            ApiError::Internal("Unable to provide web token".to_string())
        })
    }

    /// True when the token is signed by us, unexpired, and issued to `user_id`.
    pub fn validate_token(&self, token: &str, user_id: &str) -> bool {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => data.claims.uid == user_id,
            Err(e) => {
                debug!("Rejected web token: {}", e);
                false
            }
        }
    }

    async fn unique_identifier(&self, bytes: usize) -> Result<String, ApiError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = random_base64(bytes);
            if self.store.is_unique_identifier(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(ApiError::Internal(
            "Unable to generate a unique identifier".to_string(),
        ))
    }

    async fn open_session(&self, user_id: &str) -> Result<String, ApiError> {
        let token = self.generate_token(user_id)?;
        let now = Utc::now();
        self.store
            .insert_session(&UserSession {
                session_key: token.clone(),
                user_id: user_id.to_string(),
                login_time: now,
                last_seen: now,
            })
            .await?;
        Ok(token)
    }

    pub async fn register(&self, credentials: Credentials) -> Result<String, ApiError> {
        if let Err(e) = validate_email(&credentials.email) {
            return Err(ApiError::BadRequest(e.to_string()));
        }
        if credentials.password.is_empty() {
            return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
        }

        let user_id = self.unique_identifier(USER_ID_BYTES).await?;
        let salt = self.unique_identifier(SALT_BYTES).await?;
        let password = {
            let (plain, salt, log_n) = (credentials.password, salt.clone(), self.scrypt_log_n);
            tokio::task::spawn_blocking(move || hash_password(&plain, &salt, log_n))
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))??
        };

        let user = User {
            email: credentials.email,
            user_id,
            password,
            salt,
        };
        self.store.add_user(&user).await?;
        info!("Registered new user");

        self.open_session(&user.user_id).await
    }

    pub async fn login(&self, credentials: Credentials) -> Result<String, ApiError> {
        let user = self.store.lookup_user(&credentials.email).await?;
        let matches = {
            let (plain, salt, encoded) = (credentials.password, user.salt.clone(), user.password.clone());
            tokio::task::spawn_blocking(move || verify_password(&plain, &salt, &encoded))
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?
        };
        if !matches {
            warn!("Failed login attempt");
            return Err(ApiError::IncorrectCredentials);
        }
        self.open_session(&user.user_id).await
    }

    /// Resolves an `Authorization` header value to the caller's live session.
    pub async fn authorize(&self, authorization: Option<&str>) -> Result<UserSession, ApiError> {
        let header = authorization.unwrap_or_default();
        let parts: Vec<&str> = header.split(' ').collect();
        if parts.len() != 2 {
            return Err(ApiError::BadRequest(
                "Invalid number of tokens provided".to_string(),
            ));
        }

        let session = self.store.get_session(parts[1]).await?;
        if !self.validate_token(&session.session_key, &session.user_id) {
            return Err(ApiError::Unauthorized("Invalid web token".to_string()));
        }
        Ok(session)
    }

    pub async fn refresh(&self, authorization: Option<&str>) -> Result<String, ApiError> {
        let session = self.authorize(authorization).await?;
        let token = self.generate_token(&session.user_id)?;
        self.store
            .rotate_session(&session.session_key, &token, Utc::now())
            .await?;
        Ok(token)
    }

    pub async fn logout(&self, authorization: Option<&str>) -> Result<(), ApiError> {
        let session = self.authorize(authorization).await?;
        match self.store.remove_session(&session.session_key).await {
            Ok(()) => Ok(()),
            Err(StoreError::NoSession) => {
                Err(ApiError::NoContent("Not currently logged in".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
