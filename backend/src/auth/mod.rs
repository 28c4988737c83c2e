use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config_loader;

/// Claims carried by the dashboard access token. `sub` is the company id;
/// every tenant-scoped query hangs off it.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub company_name: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthCompany {
    pub company_id: Uuid,
    pub company_name: Option<String>,
}

pub fn validate_access_token(token: &str, secret: &str) -> anyhow::Result<AccessClaims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<AccessClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthCompany
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let auth_str = auth_header.to_str().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            )
        })?;

        let Some(token) = auth_str.strip_prefix("Bearer ") else {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format".to_string(),
            ));
        };

        let secret = config_loader::get_jwt_secret().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Auth secret is not configured".to_string(),
            )
        })?;

        let claims = validate_access_token(token, &secret)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

        let company_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid company ID in token".to_string(),
            )
        })?;

        Ok(AuthCompany {
            company_id,
            company_name: claims.company_name,
        })
    }
}

#[cfg(test)]
mod tests;
