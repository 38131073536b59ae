use anyhow::Result;
use backoffice_common::UserRole;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User uid
    pub role: UserRole,
    pub exp: usize, // Expiration timestamp
}

/// Sign a new JWT token for a user.
pub fn sign(uid: &str, role: UserRole, ttl_hours: i64, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?
        .timestamp();

    let claims = Claims {
        sub: uid.to_owned(),
        role,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_round_trips_claims() {
        let token = sign("0195f3a2", UserRole::Manager, 1, "secret").unwrap();
        let claims = verify(&token, "secret").unwrap();
        assert_eq!(claims.sub, "0195f3a2");
        assert_eq!(claims.role, UserRole::Manager);
    }

    #[test]
    fn wrong_secret_or_expired_token_is_rejected() {
        let token = sign("0195f3a2", UserRole::Admin, 1, "secret").unwrap();
        assert!(verify(&token, "other").is_err());

        let expired = sign("0195f3a2", UserRole::Admin, -2, "secret").unwrap();
        assert!(verify(&expired, "secret").is_err());
    }
}
