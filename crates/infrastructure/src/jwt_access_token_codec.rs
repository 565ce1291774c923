//! HS256 JWT access tokens.

use atrium_application::{AccessTokenCodec, IssuedAccessToken};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{AdminIdentity, AdminUserId};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Minimum accepted length of the signing secret.
pub const JWT_SECRET_MIN_LENGTH: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    tid: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256-signed bearer tokens.
#[derive(Clone)]
pub struct JwtAccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    time_to_live: Duration,
}

impl JwtAccessTokenCodec {
    /// Creates a codec; the secret must be at least [`JWT_SECRET_MIN_LENGTH`] bytes.
    pub fn new(secret: &str, time_to_live: Duration) -> AppResult<Self> {
        if secret.len() < JWT_SECRET_MIN_LENGTH {
            return Err(AppError::Configuration(format!(
                "JWT secret must be at least {JWT_SECRET_MIN_LENGTH} characters"
            )));
        }
        if time_to_live <= Duration::zero() {
            return Err(AppError::Configuration(
                "token lifetime must be positive".to_owned(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            time_to_live,
        })
    }

    fn sign(&self, claims: &AccessClaims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign access token: {error}")))
    }

    fn issue_at(
        &self,
        identity: &AdminIdentity,
        issued_at: DateTime<Utc>,
    ) -> AppResult<IssuedAccessToken> {
        let expires_at = issued_at + self.time_to_live;
        let claims = AccessClaims {
            sub: identity.subject().to_owned(),
            tid: identity.tenant_id().to_string(),
            name: identity.display_name().to_owned(),
            email: identity.email().map(str::to_owned),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(IssuedAccessToken {
            token: self.sign(&claims)?,
            expires_at,
        })
    }
}

impl AccessTokenCodec for JwtAccessTokenCodec {
    fn issue(&self, identity: &AdminIdentity) -> AppResult<IssuedAccessToken> {
        self.issue_at(identity, Utc::now())
    }

    fn verify(&self, token: &str) -> AppResult<AdminIdentity> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| {
                tracing::debug!(error = %error, "access token rejected");
                AppError::Unauthorized("invalid or expired access token".to_owned())
            })?;

        let claims = data.claims;
        let admin_id = claims.sub.parse::<AdminUserId>().map_err(|_| {
            AppError::Unauthorized("access token carries an invalid subject".to_owned())
        })?;
        let tenant_id = claims.tid.parse::<TenantId>().map_err(|_| {
            AppError::Unauthorized("access token carries an invalid tenant".to_owned())
        })?;

        Ok(AdminIdentity::new(
            admin_id,
            claims.name,
            claims.email,
            tenant_id,
        ))
    }
}
