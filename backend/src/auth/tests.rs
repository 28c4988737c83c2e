use super::*;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

fn make_token(company_id: Uuid, secret: &str, expires_in: Duration) -> String {
    let claims = AccessClaims {
        sub: company_id.to_string(),
        company_name: Some("Empresa Exemplo".to_string()),
        exp: (Utc::now() + expires_in).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn valid_token_round_trips_company_id() {
    let company_id = Uuid::new_v4();
    let token = make_token(company_id, "test-secret", Duration::hours(1));

    let claims = validate_access_token(&token, "test-secret").unwrap();
    assert_eq!(claims.sub, company_id.to_string());
}

#[test]
fn wrong_secret_is_rejected() {
    let token = make_token(Uuid::new_v4(), "test-secret", Duration::hours(1));
    assert!(validate_access_token(&token, "other-secret").is_err());
}

#[test]
fn expired_token_is_rejected() {
    let token = make_token(Uuid::new_v4(), "test-secret", Duration::hours(-1));
    assert!(validate_access_token(&token, "test-secret").is_err());
}
