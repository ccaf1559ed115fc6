use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// Claims shared by access and refresh tokens, told apart by `token_type`
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for generating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
    refresh_token_days: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64, refresh_token_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
            refresh_token_days,
        }
    }

    /// Create JwtService from the current config
    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self::new(
            &config.api.jwt_secret,
            config.api.access_token_minutes,
            config.api.refresh_token_days,
        )
    }

    pub fn access_token_minutes(&self) -> u64 {
        self.access_token_minutes
    }

    fn generate(&self, token_type: &str, lifetime: Duration) -> jsonwebtoken::errors::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: "admin".to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Generate Access Token (short-lived)
    pub fn generate_access_token(&self) -> jsonwebtoken::errors::Result<String> {
        self.generate(ACCESS, Duration::minutes(self.access_token_minutes as i64))
    }

    /// Generate Refresh Token (long-lived)
    pub fn generate_refresh_token(&self) -> jsonwebtoken::errors::Result<String> {
        self.generate(REFRESH, Duration::days(self.refresh_token_days as i64))
    }

    fn validate(&self, token: &str, token_type: &str) -> jsonwebtoken::errors::Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != token_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }

    pub fn validate_access_token(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        self.validate(token, ACCESS)
    }

    pub fn validate_refresh_token(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        self.validate(token, REFRESH)
    }
}
