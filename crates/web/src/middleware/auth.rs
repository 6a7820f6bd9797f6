use std::collections::HashSet;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use storage::models::UserRole;
use uuid::Uuid;

use crate::error::WebError;

const ACTOR_ID_HEADER: &str = "x-actor-id";
const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Already-authenticated identity, resolved by the external auth
/// collaborator and forwarded by the gateway. The core never authenticates;
/// it only consumes the actor id and role.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admin-only operations take the resolved admin id explicitly.
    pub fn require_admin(&self) -> Result<Uuid, WebError> {
        if self.is_admin() {
            Ok(self.id)
        } else {
            Err(WebError::Forbidden(
                "This action requires an admin account".to_string(),
            ))
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, WebError> {
        let id = headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(WebError::Unauthorized)?;
        let id = id.parse::<Uuid>().map_err(|_| WebError::Unauthorized)?;

        let role = headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(WebError::Unauthorized)?;
        let role = role.parse::<UserRole>().map_err(|_| WebError::Unauthorized)?;

        Ok(Self { id, role })
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Actor::from_headers(&parts.headers)
    }
}

/// Bearer keys trusted to forward actor identities (one per gateway
/// deployment).
#[derive(Clone)]
pub struct ApiKeys {
    keys: HashSet<String>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self { keys }
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// Gateway authentication for admin routes: a valid bearer key must
/// accompany the forwarded identity headers.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(WebError::Unauthorized)?;

    if !api_keys.is_valid(token) {
        tracing::warn!("Invalid API key attempt");
        return Err(WebError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn keys_parse_from_comma_separated_list() {
        let keys = ApiKeys::from_comma_separated("alpha, beta ,,gamma");
        assert!(keys.is_valid("alpha"));
        assert!(keys.is_valid("beta"));
        assert!(keys.is_valid("gamma"));
        assert!(!keys.is_valid(""));
        assert!(!keys.is_valid("delta"));
    }

    #[test]
    fn actor_parses_from_forwarded_headers() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        headers.insert(ACTOR_ROLE_HEADER, HeaderValue::from_static("admin"));

        let actor = Actor::from_headers(&headers).unwrap();
        assert_eq!(actor.id, id);
        assert!(actor.is_admin());
        assert_eq!(actor.require_admin().unwrap(), id);
    }

    #[test]
    fn participant_actor_fails_admin_check() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACTOR_ID_HEADER,
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        );
        headers.insert(ACTOR_ROLE_HEADER, HeaderValue::from_static("participant"));

        let actor = Actor::from_headers(&headers).unwrap();
        assert!(actor.require_admin().is_err());
    }

    #[test]
    fn missing_or_malformed_headers_are_rejected() {
        assert!(Actor::from_headers(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        headers.insert(ACTOR_ROLE_HEADER, HeaderValue::from_static("admin"));
        assert!(Actor::from_headers(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(
            ACTOR_ID_HEADER,
            HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
        );
        headers.insert(ACTOR_ROLE_HEADER, HeaderValue::from_static("root"));
        assert!(Actor::from_headers(&headers).is_err());
    }
}
