use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::WebError;

/// Claims of the access tokens issued by the identity provider. `sub` is the
/// profile id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: u64,
}

/// The authenticated caller, injected by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
}

#[derive(Clone)]
pub struct AuthKeys {
    decoding: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl AuthKeys {
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
        }
    }

    pub fn verify(&self, token: &str) -> Option<Session> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| Session {
                user_id: data.claims.sub,
            })
            .ok()
    }
}

pub async fn require_auth(
    State(keys): State<AuthKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(WebError::Unauthorized)?;

    let Some(session) = keys.verify(token) else {
        tracing::warn!("Rejected invalid or expired access token");
        return Err(WebError::Unauthorized);
    };

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .copied()
            .ok_or(WebError::Unauthorized)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};

    pub(crate) const TEST_SECRET: &str = "test-secret-for-unit-tests";

    pub(crate) fn token_for(user_id: Uuid, secret: &str, exp: u64) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &Claims { sub: user_id, exp },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_session() {
        let keys = AuthKeys::from_secret(TEST_SECRET);
        let user_id = Uuid::new_v4();
        let token = token_for(user_id, TEST_SECRET, get_current_timestamp() + 3600);

        assert_eq!(keys.verify(&token), Some(Session { user_id }));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let keys = AuthKeys::from_secret(TEST_SECRET);
        let token = token_for(Uuid::new_v4(), "another-secret", get_current_timestamp() + 3600);

        assert_eq!(keys.verify(&token), None);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = AuthKeys::from_secret(TEST_SECRET);
        let token = token_for(Uuid::new_v4(), TEST_SECRET, get_current_timestamp() - 3600);

        assert_eq!(keys.verify(&token), None);
    }
}
